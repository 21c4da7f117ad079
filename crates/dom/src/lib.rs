//! In-memory browsing context for the editing surface.
//!
//! A [`Window`] owns one [`Document`] (an arena of nodes under
//! `<html><head/><body/></html>`), the window [`Selection`], focus state, and
//! a [`Layout`] used for point-to-range resolution. Native editing commands
//! (`insertText`, `bold`, `undo`, ...) live on the window because they act on
//! its selection.
//!
//! Live ranges are registered with the document and handed out as
//! non-cloneable [`RangeId`]s; whoever holds the id owns the registration.
#![cfg_attr(test, allow(unused_crate_dependencies))]

/// Tree mutation and lookup errors.
mod error;
/// Native editing commands and per-root undo history.
mod exec;
/// Markup parsing and serialization.
mod html;
/// Point-to-caret resolution and node boxes.
mod layout;
/// The node arena.
mod node;
/// Static boundaries and live range registrations.
mod range;
/// The window selection.
mod selection;
/// Document, selection, focus and layout bundled together.
mod window;

pub use error::{DomError, Result};
pub use layout::{Layout, LineLayout};
pub use node::{Document, Element, NodeData, NodeId};
pub use range::{Boundary, Range, RangeId};
pub use selection::Selection;
pub use window::Window;
