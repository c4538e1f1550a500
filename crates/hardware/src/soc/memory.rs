//! RAM slave.
//!
//! A word-organised memory with byte-select writes, a configurable number of wait
//! states, and burst support. The first beat of every bus cycle waits `wait_states`
//! cycles; the remaining beats of a burst are acknowledged back to back.

use crate::common::constants::WORD_BYTES;
use crate::common::error::LoadError;
use crate::core::units::cache::lane_mask;
use crate::soc::traits::Slave;
use crate::soc::wishbone::{BusRequest, BusResponse};

/// Word-addressed RAM.
#[derive(Clone, Debug)]
pub struct Ram {
    name: String,
    words: Vec<u32>,
    wait_states: u32,
    /// Cycles left before the pending first beat is acknowledged.
    countdown: Option<u32>,
    /// A burst is open: the previous beat was acknowledged and did not end the cycle.
    in_burst: bool,
}

impl Ram {
    /// Creates a zero-filled RAM.
    ///
    /// # Arguments
    ///
    /// * `name` - Diagnostic name.
    /// * `size_bytes` - Capacity; rounded up to a whole word.
    /// * `wait_states` - Cycles inserted before the first beat of each bus cycle.
    pub fn new(name: impl Into<String>, size_bytes: usize, wait_states: u32) -> Self {
        let words = size_bytes.div_ceil(WORD_BYTES as usize);
        Self {
            name: name.into(),
            words: vec![0; words],
            wait_states,
            countdown: None,
            in_burst: false,
        }
    }

    /// Capacity in bytes.
    pub fn size(&self) -> usize {
        self.words.len() * WORD_BYTES as usize
    }

    /// Reads the word containing `offset`, or `None` past the end.
    pub fn read_word(&self, offset: u32) -> Option<u32> {
        self.words.get((offset / WORD_BYTES) as usize).copied()
    }

    /// Writes the word containing `offset`. Out-of-range writes are ignored.
    pub fn write_word(&mut self, offset: u32, val: u32) {
        if let Some(w) = self.words.get_mut((offset / WORD_BYTES) as usize) {
            *w = val;
        }
    }

    fn transfer(&mut self, req: &BusRequest) -> BusResponse {
        let idx = (req.adr / WORD_BYTES) as usize;
        let Some(word) = self.words.get_mut(idx) else {
            return BusResponse::error();
        };
        if req.we {
            let mask = lane_mask(req.sel);
            *word = (*word & !mask) | (req.dat_w & mask);
            BusResponse::ack(0)
        } else {
            BusResponse::ack(*word)
        }
    }
}

impl Slave for Ram {
    fn name(&self) -> &str {
        &self.name
    }

    fn access(&mut self, req: &BusRequest) -> Option<BusResponse> {
        if !self.in_burst {
            let left = self.countdown.get_or_insert(self.wait_states);
            if *left > 0 {
                *left -= 1;
                return None;
            }
        }
        self.countdown = None;
        let resp = self.transfer(req);
        self.in_burst = resp.ack && !req.is_last();
        Some(resp)
    }

    fn load(&mut self, offset: u32, data: &[u8]) -> Result<(), LoadError> {
        let start = offset as usize;
        if start.checked_add(data.len()).is_none_or(|end| end > self.size()) {
            return Err(LoadError::OutOfRange {
                slave: self.name.clone(),
                addr: offset,
                len: data.len(),
            });
        }
        for (i, byte) in data.iter().enumerate() {
            let pos = start + i;
            let idx = pos / WORD_BYTES as usize;
            let shift = (pos % WORD_BYTES as usize) * 8;
            if let Some(w) = self.words.get_mut(idx) {
                *w = (*w & !(0xff << shift)) | (u32::from(*byte) << shift);
            }
        }
        Ok(())
    }
}
