//! # Configuration Tests
//!
//! Defaults, JSON deserialization and validation of the core configuration.

use bellatrix_core::common::ConfigError;
use bellatrix_core::config::{CacheConfig, Config};
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_config_is_minimal_core() {
    let config = Config::default();
    assert_eq!(config.core.reset_address, 0x8000_0000);
    assert!(!config.isa.enable_rv32m);
    assert!(!config.isa.enable_extra_csr);
    assert!(!config.isa.enable_user_mode);
    assert!(!config.predictor.enable);
    assert_eq!(config.predictor.size, 64);
    assert!(!config.icache.enable);
    assert!(!config.dcache.enable);
    assert!(!config.trigger.enable);
    assert_eq!(config.trigger.ntriggers, 4);
}

#[test]
fn default_cache_geometry() {
    let cache = CacheConfig::default();
    assert_eq!(cache.nlines, 128);
    assert_eq!(cache.nwords, 8);
    assert_eq!(cache.nways, 1);
    assert_eq!(cache.start_addr, 0x8000_0000);
    assert_eq!(cache.end_addr, 0xFFFF_FFFF);
}

#[test]
fn default_config_validates() {
    assert!(Config::default().validate().is_ok());
}

// ══════════════════════════════════════════════════════════
// 2. JSON loading
// ══════════════════════════════════════════════════════════

#[test]
fn empty_document_takes_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.core.reset_address, 0x8000_0000);
    assert_eq!(config.icache.nwords, 8);
}

#[test]
fn partial_sections_keep_field_defaults() {
    let json = r#"{
        "core": { "reset_address": 4096 },
        "dcache": { "enable": true, "nways": 2 },
        "trigger": { "enable": true }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.core.reset_address, 0x1000);
    assert!(config.dcache.enable);
    assert_eq!(config.dcache.nways, 2);
    assert_eq!(config.dcache.nlines, 128);
    assert!(config.trigger.enable);
    assert_eq!(config.trigger.ntriggers, 4);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json("{ \"core\": ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn json_is_validated() {
    let err = Config::from_json(r#"{ "icache": { "nwords": 5 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::LineWords {
            cache: "icache",
            nwords: 5
        }
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x8000_0002)]
#[case(0x0000_0001)]
fn misaligned_reset_address_rejected(#[case] addr: u32) {
    let mut config = Config::default();
    config.core.reset_address = addr;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MisalignedResetAddress(a)) if a == addr
    ));
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(100)]
fn predictor_size_must_be_power_of_two(#[case] size: usize) {
    let mut config = Config::default();
    config.predictor.size = size;
    assert!(matches!(config.validate(), Err(ConfigError::PredictorSize(s)) if s == size));
}

#[rstest]
#[case(0)]
#[case(6)]
fn line_count_must_be_power_of_two(#[case] nlines: usize) {
    let mut config = Config::default();
    config.dcache.nlines = nlines;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::LineCount { cache: "dcache", .. })
    ));
}

#[rstest]
#[case(4, true)]
#[case(8, true)]
#[case(16, true)]
#[case(2, false)]
#[case(32, false)]
fn words_per_line(#[case] nwords: usize, #[case] ok: bool) {
    let cache = CacheConfig {
        nwords,
        ..CacheConfig::default()
    };
    assert_eq!(cache.validate("icache").is_ok(), ok);
}

#[rstest]
#[case(1, true)]
#[case(2, true)]
#[case(0, false)]
#[case(4, false)]
fn associativity(#[case] nways: usize, #[case] ok: bool) {
    let cache = CacheConfig {
        nways,
        ..CacheConfig::default()
    };
    assert_eq!(cache.validate("icache").is_ok(), ok);
}

#[test]
fn empty_cacheable_range_rejected() {
    let cache = CacheConfig {
        start_addr: 0x2000,
        end_addr: 0x1000,
        ..CacheConfig::default()
    };
    assert!(matches!(
        cache.validate("dcache"),
        Err(ConfigError::CacheableRange {
            start: 0x2000,
            end: 0x1000,
            ..
        })
    ));
}

#[rstest]
#[case(0)]
#[case(17)]
fn trigger_count_out_of_range(#[case] count: usize) {
    let mut config = Config::default();
    config.trigger.ntriggers = count;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TriggerCount { max: 16, .. })
    ));
}

#[test]
fn disabled_sections_are_still_checked() {
    let mut config = Config::default();
    config.icache.enable = false;
    config.icache.nways = 3;
    assert!(config.validate().is_err());
}

#[test]
fn cacheable_window_is_inclusive() {
    let cache = CacheConfig {
        start_addr: 0x1000,
        end_addr: 0x1fff,
        ..CacheConfig::default()
    };
    assert!(!cache.is_cacheable(0x0fff));
    assert!(cache.is_cacheable(0x1000));
    assert!(cache.is_cacheable(0x1fff));
    assert!(!cache.is_cacheable(0x2000));
}

#[test]
fn error_messages_name_the_cache() {
    let err = CacheConfig {
        nlines: 3,
        ..CacheConfig::default()
    }
    .validate("icache")
    .unwrap_err();
    assert_eq!(err.to_string(), "icache: line count 3 is not a power of two");
}
