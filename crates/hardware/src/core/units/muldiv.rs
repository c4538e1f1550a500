//! Multi-cycle multiplier and divider.
//!
//! The M extension is executed by two sequential units in the Execute stage:
//! 1. **Multiplier:** Produces the 64-bit product after a fixed two-cycle latency and
//!    selects the low or high half.
//! 2. **Divider:** A restoring divider working on magnitudes, one quotient bit per cycle,
//!    followed by a sign fix-up cycle.
//!
//! Each unit remembers the sequence number of the instruction it is working on. When
//! Execute presents a different instruction (the previous one was flushed) the unit
//! restarts.

use crate::core::pipeline::signals::MulDivOp;

/// Cycles from issue to result for the multiplier.
pub const MUL_LATENCY: u32 = 2;

/// Quotient bits produced by the divider (one per cycle).
const DIV_STEPS: u32 = 32;

/// Pipelined-in-time multiplier.
#[derive(Clone, Copy, Debug, Default)]
pub struct Multiplier {
    seq: Option<u64>,
    elapsed: u32,
}

impl Multiplier {
    /// Advances the multiplication for the instruction `seq` by one cycle.
    ///
    /// # Returns
    ///
    /// The result once [`MUL_LATENCY`] cycles have elapsed for this instruction.
    pub fn step(&mut self, seq: u64, op: MulDivOp, a: u32, b: u32) -> Option<u32> {
        if self.seq != Some(seq) {
            self.seq = Some(seq);
            self.elapsed = 0;
        }
        self.elapsed += 1;
        (self.elapsed >= MUL_LATENCY).then(|| multiply(op, a, b))
    }
}

/// Computes a multiply result combinationally.
pub const fn multiply(op: MulDivOp, a: u32, b: u32) -> u32 {
    let sa = a as i32 as i64;
    let sb = b as i32 as i64;
    let ua = a as u64;
    let ub = b as u64;
    match op {
        MulDivOp::Mul => a.wrapping_mul(b),
        MulDivOp::Mulh => (sa.wrapping_mul(sb) >> 32) as u32,
        MulDivOp::Mulhsu => (sa.wrapping_mul(ub as i64) >> 32) as u32,
        MulDivOp::Mulhu => (ua.wrapping_mul(ub) >> 32) as u32,
        _ => 0,
    }
}

/// Restoring-division state.
#[derive(Clone, Copy, Debug, Default)]
struct DivState {
    quotient: u32,
    remainder: u32,
    divisor: u32,
    dividend: u32,
    step: u32,
    negate_q: bool,
    negate_r: bool,
}

/// Sequential restoring divider.
#[derive(Clone, Copy, Debug, Default)]
pub struct Divider {
    seq: Option<u64>,
    state: DivState,
}

impl Divider {
    /// Advances the division for the instruction `seq` by one cycle.
    ///
    /// The first cycle latches the operands and computes magnitudes; then one quotient
    /// bit is produced per cycle, and a final cycle applies signs.
    ///
    /// # Returns
    ///
    /// The quotient or remainder (per `op`) once the sign fix-up cycle has run.
    pub fn step(&mut self, seq: u64, op: MulDivOp, a: u32, b: u32) -> Option<u32> {
        if self.seq != Some(seq) {
            self.seq = Some(seq);
            self.start(op, a, b);
            return None;
        }
        let s = &mut self.state;
        if s.step < DIV_STEPS {
            // Shift in the next dividend bit and try to subtract.
            let bit = (s.dividend >> (DIV_STEPS - 1 - s.step)) & 1;
            let partial = (u64::from(s.remainder) << 1) | u64::from(bit);
            if partial >= u64::from(s.divisor) {
                s.remainder = (partial - u64::from(s.divisor)) as u32;
                s.quotient = (s.quotient << 1) | 1;
            } else {
                s.remainder = partial as u32;
                s.quotient <<= 1;
            }
            s.step += 1;
            return None;
        }
        Some(self.finish(op, a, b))
    }

    fn start(&mut self, op: MulDivOp, a: u32, b: u32) {
        let signed = matches!(op, MulDivOp::Div | MulDivOp::Rem);
        let neg_a = signed && (a as i32) < 0;
        let neg_b = signed && (b as i32) < 0;
        self.state = DivState {
            quotient: 0,
            remainder: 0,
            divisor: if neg_b { b.wrapping_neg() } else { b },
            dividend: if neg_a { a.wrapping_neg() } else { a },
            step: 0,
            negate_q: neg_a != neg_b,
            negate_r: neg_a,
        };
    }

    fn finish(&self, op: MulDivOp, a: u32, b: u32) -> u32 {
        let s = &self.state;
        if b == 0 {
            return match op {
                MulDivOp::Div | MulDivOp::Divu => u32::MAX,
                _ => a,
            };
        }
        let signed = matches!(op, MulDivOp::Div | MulDivOp::Rem);
        if signed && a == 0x8000_0000 && b == u32::MAX {
            return match op {
                MulDivOp::Div => a,
                _ => 0,
            };
        }
        match op {
            MulDivOp::Div | MulDivOp::Divu => {
                if s.negate_q {
                    s.quotient.wrapping_neg()
                } else {
                    s.quotient
                }
            }
            _ => {
                if s.negate_r {
                    s.remainder.wrapping_neg()
                } else {
                    s.remainder
                }
            }
        }
    }
}

/// The M-extension functional unit seen by Execute.
#[derive(Clone, Copy, Debug, Default)]
pub struct MulDivUnit {
    mul: Multiplier,
    div: Divider,
}

impl MulDivUnit {
    /// Advances `op` for instruction `seq` by one cycle.
    ///
    /// # Returns
    ///
    /// `Some(result)` in the cycle the unit becomes ready.
    pub fn step(&mut self, seq: u64, op: MulDivOp, a: u32, b: u32) -> Option<u32> {
        if op.is_divide() {
            self.div.step(seq, op, a, b)
        } else {
            self.mul.step(seq, op, a, b)
        }
    }
}
