//! Trailing-edge debounce driven by caller-supplied instants.
//!
//! Every [`Debounce::trigger`] pushes the deadline out by the quiet period and
//! replaces the pending payload. [`Debounce::poll`] yields the payload once the
//! deadline has passed. Superseded triggers never fire; there is no other
//! cancellation path.

use std::time::{Duration, Instant};

/// Coalesces bursts of triggers into one delayed firing.
#[derive(Debug)]
pub struct Debounce<T> {
	quiet: Duration,
	pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
	/// Creates an idle debounce with the given quiet period.
	pub fn new(quiet: Duration) -> Self {
		Self { quiet, pending: None }
	}

	/// Records a trigger. The last payload wins.
	pub fn trigger(&mut self, now: Instant, payload: T) {
		self.pending = Some((now + self.quiet, payload));
	}

	/// Returns the payload if the quiet period has elapsed, leaving the
	/// debounce idle.
	pub fn poll(&mut self, now: Instant) -> Option<T> {
		match &self.pending {
			Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, payload)| payload),
			_ => None,
		}
	}

	/// Drops any pending trigger without firing it.
	pub fn cancel(&mut self) -> Option<T> {
		self.pending.take().map(|(_, payload)| payload)
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// When the pending trigger will fire, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|(deadline, _)| *deadline)
	}

	pub fn quiet(&self) -> Duration {
		self.quiet
	}
}
