//! Fixed-priority bus arbiter.
//!
//! Grants one of several requesters per bus cycle, lowest index first. A grant is held
//! until the owner's cycle completes (a classic beat is terminated, or the end-of-burst
//! beat is), so bursts are never interleaved with another requester's beats.
//!
//! The same arbiter sits in front of the system interconnect and inside the fetch and
//! load/store units, where it orders refill, write-buffer and uncached traffic.

use tracing::trace;

/// Fixed-priority arbiter with grant holding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Arbiter {
    owner: Option<usize>,
}

impl Arbiter {
    /// Creates an idle arbiter.
    pub const fn new() -> Self {
        Self { owner: None }
    }

    /// Selects the requester that may drive the bus this cycle.
    ///
    /// # Arguments
    ///
    /// * `requests` - One flag per requester; index 0 has the highest priority.
    ///
    /// # Returns
    ///
    /// The granted index, or `None` if nobody is requesting. The current owner keeps the
    /// grant while it is still requesting.
    pub fn arbitrate(&mut self, requests: &[bool]) -> Option<usize> {
        let held = self.owner.filter(|&o| requests.get(o).copied().unwrap_or(false));
        if held.is_some() {
            return held;
        }
        self.owner = requests.iter().position(|&r| r);
        if let Some(granted) = self.owner {
            trace!(granted, "arbiter grant");
        }
        self.owner
    }

    /// Releases the grant at the end of the owner's bus cycle.
    pub const fn release(&mut self) {
        self.owner = None;
    }

    /// Current grant holder.
    pub const fn owner(&self) -> Option<usize> {
        self.owner
    }
}
