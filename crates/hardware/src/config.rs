//! Configuration system for the core.
//!
//! This module defines the static configuration record consumed by the core. It provides:
//! 1. **Defaults:** Baseline feature toggles and cache/predictor geometry.
//! 2. **Structures:** Per-section config for the core, ISA options, predictor, caches, and triggers.
//! 3. **Validation:** Geometry checks performed before any instance is built.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built from `Config::default()`
//! and adjusted field by field. It is fixed for the lifetime of a core instance.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Reset vector (start of the main memory window).
    pub const RESET_ADDRESS: u32 = crate::common::constants::DEFAULT_RESET_ADDRESS;

    /// Branch predictor entries.
    pub const PREDICTOR_SIZE: usize = 64;

    /// Lines per cache way.
    pub const CACHE_LINES: usize = 128;

    /// Words per cache line.
    pub const CACHE_WORDS: usize = 8;

    /// Cache associativity (1 way = direct-mapped).
    pub const CACHE_WAYS: usize = 1;

    /// First cacheable address.
    pub const CACHE_START: u32 = 0x8000_0000;

    /// Last cacheable address.
    pub const CACHE_END: u32 = 0xffff_ffff;

    /// Number of hardware triggers.
    pub const NTRIGGERS: usize = 4;

    /// Largest supported number of hardware triggers.
    pub const MAX_TRIGGERS: usize = 16;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use bellatrix_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.core.reset_address, 0x8000_0000);
/// assert!(!config.icache.enable);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use bellatrix_core::config::Config;
///
/// let json = r#"{
///     "isa": { "enable_rv32m": true, "enable_user_mode": true },
///     "predictor": { "enable": true, "size": 128 },
///     "icache": { "enable": true, "nlines": 64, "nwords": 4, "nways": 2 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.isa.enable_rv32m);
/// assert_eq!(config.predictor.size, 128);
/// assert_eq!(config.icache.nways, 2);
/// assert!(!config.dcache.enable);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Reset behaviour.
    #[serde(default)]
    pub core: CoreConfig,
    /// Optional ISA features.
    #[serde(default)]
    pub isa: IsaConfig,
    /// Branch predictor.
    #[serde(default)]
    pub predictor: PredictorConfig,
    /// Instruction cache.
    #[serde(default)]
    pub icache: CacheConfig,
    /// Data cache.
    #[serde(default)]
    pub dcache: CacheConfig,
    /// Hardware triggers.
    #[serde(default)]
    pub trigger: TriggerConfig,
}

impl Config {
    /// Parses a JSON document and validates the result.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first geometry violation
    /// found by [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section for values the hardware cannot realise.
    ///
    /// Disabled sections are checked too, so a configuration stays valid when a feature
    /// is toggled on later.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.core.reset_address & 0b11 != 0 {
            return Err(ConfigError::MisalignedResetAddress(self.core.reset_address));
        }
        if !self.predictor.size.is_power_of_two() {
            return Err(ConfigError::PredictorSize(self.predictor.size));
        }
        self.icache.validate("icache")?;
        self.dcache.validate("dcache")?;
        let count = self.trigger.ntriggers;
        if count == 0 || count > defaults::MAX_TRIGGERS {
            return Err(ConfigError::TriggerCount {
                count,
                max: defaults::MAX_TRIGGERS,
            });
        }
        Ok(())
    }
}

/// Reset behaviour of the core.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Address of the first instruction fetched after reset; also the reset value of `mtvec`.
    #[serde(default = "CoreConfig::default_reset_address")]
    pub reset_address: u32,
}

impl CoreConfig {
    /// Returns the default reset vector.
    const fn default_reset_address() -> u32 {
        defaults::RESET_ADDRESS
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            reset_address: defaults::RESET_ADDRESS,
        }
    }
}

/// Optional ISA features.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IsaConfig {
    /// Decode and execute the M extension (multi-cycle multiplier and divider).
    #[serde(default)]
    pub enable_rv32m: bool,
    /// Implement `misa`, the identification CSRs, and the cycle/instret counters.
    #[serde(default)]
    pub enable_extra_csr: bool,
    /// Implement User mode (`mstatus.MPP` may hold U, `ecall` from U, user counters).
    #[serde(default)]
    pub enable_user_mode: bool,
}

/// Branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// When false, fetch always predicts not-taken.
    #[serde(default)]
    pub enable: bool,
    /// Number of entries; must be a power of two.
    #[serde(default = "PredictorConfig::default_size")]
    pub size: usize,
}

impl PredictorConfig {
    /// Returns the default number of predictor entries.
    const fn default_size() -> usize {
        defaults::PREDICTOR_SIZE
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            enable: false,
            size: defaults::PREDICTOR_SIZE,
        }
    }
}

/// Geometry of one cache instance.
///
/// An address is cacheable when `start_addr <= addr <= end_addr`. Accesses outside that
/// window, or any access while `enable` is false, go straight to the bus.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Enable the cache.
    #[serde(default)]
    pub enable: bool,
    /// Lines per way; must be a power of two.
    #[serde(default = "CacheConfig::default_nlines")]
    pub nlines: usize,
    /// Words per line: 4, 8 or 16.
    #[serde(default = "CacheConfig::default_nwords")]
    pub nwords: usize,
    /// Associativity: 1 or 2.
    #[serde(default = "CacheConfig::default_nways")]
    pub nways: usize,
    /// First cacheable address.
    #[serde(default = "CacheConfig::default_start_addr")]
    pub start_addr: u32,
    /// Last cacheable address (inclusive).
    #[serde(default = "CacheConfig::default_end_addr")]
    pub end_addr: u32,
}

impl CacheConfig {
    /// Returns the default number of lines per way.
    const fn default_nlines() -> usize {
        defaults::CACHE_LINES
    }

    /// Returns the default number of words per line.
    const fn default_nwords() -> usize {
        defaults::CACHE_WORDS
    }

    /// Returns the default associativity.
    const fn default_nways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default first cacheable address.
    const fn default_start_addr() -> u32 {
        defaults::CACHE_START
    }

    /// Returns the default last cacheable address.
    const fn default_end_addr() -> u32 {
        defaults::CACHE_END
    }

    /// Returns `true` if `addr` falls inside the cacheable window.
    pub const fn is_cacheable(&self, addr: u32) -> bool {
        self.start_addr <= addr && addr <= self.end_addr
    }

    /// Checks the geometry of this cache.
    ///
    /// # Errors
    ///
    /// Returns the first violation found; `cache` names the instance in the error.
    pub fn validate(&self, cache: &'static str) -> Result<(), ConfigError> {
        if !self.nlines.is_power_of_two() {
            return Err(ConfigError::LineCount {
                cache,
                nlines: self.nlines,
            });
        }
        if !matches!(self.nwords, 4 | 8 | 16) {
            return Err(ConfigError::LineWords {
                cache,
                nwords: self.nwords,
            });
        }
        if !matches!(self.nways, 1 | 2) {
            return Err(ConfigError::Ways {
                cache,
                nways: self.nways,
            });
        }
        if self.start_addr > self.end_addr {
            return Err(ConfigError::CacheableRange {
                cache,
                start: self.start_addr,
                end: self.end_addr,
            });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: false,
            nlines: defaults::CACHE_LINES,
            nwords: defaults::CACHE_WORDS,
            nways: defaults::CACHE_WAYS,
            start_addr: defaults::CACHE_START,
            end_addr: defaults::CACHE_END,
        }
    }
}

/// Hardware trigger (breakpoint/watchpoint) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
    /// Implement `tselect`/`tdata1`/`tdata2` and the match logic.
    #[serde(default)]
    pub enable: bool,
    /// Number of triggers.
    #[serde(default = "TriggerConfig::default_ntriggers")]
    pub ntriggers: usize,
}

impl TriggerConfig {
    /// Returns the default number of triggers.
    const fn default_ntriggers() -> usize {
        defaults::NTRIGGERS
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            enable: false,
            ntriggers: defaults::NTRIGGERS,
        }
    }
}
