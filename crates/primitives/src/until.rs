//! Polling until a readiness predicate holds.
//!
//! Each attempt happens on a caller tick at least one interval after the
//! previous one; a failed attempt re-arms for another interval. The attempt
//! count is unbounded and nothing blocks between attempts.

use std::time::{Duration, Instant};

/// Fixed-interval retry loop over a readiness predicate.
#[derive(Debug)]
pub struct PollUntil {
	interval: Duration,
	next_attempt: Option<Instant>,
	attempts: u32,
}

impl PollUntil {
	pub fn new(interval: Duration) -> Self {
		Self {
			interval,
			next_attempt: None,
			attempts: 0,
		}
	}

	/// Schedules the first attempt one interval from `now`. Re-arming an armed
	/// loop pushes the attempt back, matching a debounced wrapper.
	pub fn arm(&mut self, now: Instant) {
		self.next_attempt = Some(now + self.interval);
	}

	pub fn is_armed(&self) -> bool {
		self.next_attempt.is_some()
	}

	/// Number of predicate evaluations since construction.
	pub fn attempts(&self) -> u32 {
		self.attempts
	}

	/// Evaluates `ready` if an attempt is due. Returns true exactly once, on the
	/// attempt that observes readiness, and disarms.
	pub fn poll(&mut self, now: Instant, ready: impl FnOnce() -> bool) -> bool {
		let Some(due) = self.next_attempt else {
			return false;
		};
		if now < due {
			return false;
		}
		self.attempts += 1;
		if ready() {
			self.next_attempt = None;
			true
		} else {
			self.next_attempt = Some(now + self.interval);
			false
		}
	}
}
