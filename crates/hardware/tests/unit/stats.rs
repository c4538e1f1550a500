//! # Statistics Tests
//!
//! Derived ratios, JSON export and the counters the pipeline maintains.

use std::io;
use std::sync::{Arc, Mutex};

use bellatrix_core::stats::SimStats;
use pretty_assertions::assert_eq;

use crate::common::builder::asm;
use crate::common::harness::{DATA_BASE, TestContext};

// ══════════════════════════════════════════════════════════
// 1. Derived ratios
// ══════════════════════════════════════════════════════════

#[test]
fn ratios_with_zero_denominator_are_zero() {
    let stats = SimStats::default();
    assert_eq!(stats.ipc(), 0.0);
    assert_eq!(stats.cpi(), 0.0);
    assert_eq!(stats.misprediction_rate(), 0.0);
    assert_eq!(stats.icache_hit_rate(), 0.0);
    assert_eq!(stats.dcache_hit_rate(), 0.0);
}

#[test]
fn ipc_and_cpi_are_reciprocal() {
    let stats = SimStats {
        cycles: 200,
        instructions_retired: 100,
        ..SimStats::default()
    };
    assert!((stats.ipc() - 0.5).abs() < f64::EPSILON);
    assert!((stats.cpi() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn hit_rates_and_trap_total() {
    let stats = SimStats {
        icache_hits: 3,
        icache_misses: 1,
        dcache_hits: 1,
        dcache_misses: 1,
        branches: 10,
        mispredictions: 2,
        exceptions: 4,
        interrupts: 1,
        ..SimStats::default()
    };
    assert!((stats.icache_hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!((stats.dcache_hit_rate() - 0.5).abs() < f64::EPSILON);
    assert!((stats.misprediction_rate() - 0.2).abs() < f64::EPSILON);
    assert_eq!(stats.traps_taken(), 5);
}

#[test]
fn json_export_names_every_counter() {
    let stats = SimStats {
        cycles: 7,
        write_errors: 1,
        ..SimStats::default()
    };
    let json = stats.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cycles"], 7);
    assert_eq!(value["write_errors"], 1);
    assert_eq!(value["instructions_retired"], 0);
    assert!(value.get("stalls_muldiv").is_some());
}

// ══════════════════════════════════════════════════════════
// 2. Pipeline counters
// ══════════════════════════════════════════════════════════

#[test]
fn cycles_and_retirement_are_counted() {
    let mut ctx =
        TestContext::new().load_program(&[asm::addi(1, 0, 1), asm::addi(2, 0, 2), asm::halt()]);
    let _ = ctx.run_until_retired(2);
    let stats = ctx.sim.stats();
    assert!(stats.instructions_retired >= 2);
    assert!(stats.cycles >= stats.instructions_retired);
    assert_eq!(stats.exceptions, 0);
}

#[test]
fn load_use_stalls_are_counted() {
    let [hi, lo] = asm::li(5, DATA_BASE);
    let mut ctx = TestContext::new().load_program(&[
        hi,
        lo,
        asm::lw(1, 5, 0),
        asm::addi(2, 1, 1),
        asm::halt(),
    ]);
    let _ = ctx.run_until_retired(4);
    assert!(ctx.sim.stats().stalls_data > 0);
}

// ══════════════════════════════════════════════════════════
// 3. Summary log
// ══════════════════════════════════════════════════════════

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log sink").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn summary_is_logged_at_info() {
    let stats = SimStats {
        cycles: 200,
        instructions_retired: 100,
        branches: 10,
        mispredictions: 3,
        ..SimStats::default()
    };
    let sink = Captured::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || stats.log_summary());

    let output = String::from_utf8(sink.0.lock().expect("log sink").clone()).expect("utf-8 log");
    for expected in [
        "core summary",
        "retired=100",
        "ipc=0.5000",
        "stall cycles",
        "mispredictions=3",
        "rate=30.00%",
        "caches",
    ] {
        assert!(output.contains(expected), "missing {expected:?} in\n{output}");
    }
}
