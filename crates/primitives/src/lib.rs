//! Shared building blocks for the editing widget.
//!
//! Nothing in this crate reads the clock. Every time-dependent primitive is
//! driven by an [`Instant`](std::time::Instant) supplied by the caller's main
//! loop, so the owner decides what a "task boundary" is.

/// The command protocol shared by toolbar, controller, and handlers.
pub mod command;
/// Trailing-edge debounce.
pub mod debounce;
/// Fire-and-forget listener lists.
pub mod emitter;
/// Points and rectangles in client coordinates.
pub mod geometry;
/// Fixed-interval polling until a predicate holds.
pub mod until;

pub use command::{Command, CommandCallback, CommandSpec, CommandValue};
pub use debounce::Debounce;
pub use emitter::{Emitter, ListenerId};
pub use geometry::{Point, Rect};
pub use until::PollUntil;
