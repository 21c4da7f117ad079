//! Toolbar controls and the panel that owns them.
//!
//! Controls never talk to the editor directly. Commands flow upward through
//! a [`PanelHost`] supplied by whoever drives the panel, and replies come back
//! as return values.

pub mod builtin;
mod control;
mod panel;

use inkstone_primitives::Command;
use serde_json::Value;

pub use control::{AfterRender, Behavior, ClickAction, ControlFlags, ControlState, StatusCache, StatusEvaluator, ToolbarControl, truthy};
pub use panel::ToolbarPanel;

/// Upward channel of a toolbar panel.
pub trait PanelHost {
	/// Dispatches a command and returns its result. `None` means no reply:
	/// the command was gated or had no result.
	fn command(&mut self, command: Command) -> Option<Value>;

	fn is_read_only(&self) -> bool;

	/// Requests a read-only change. The host applies it once the panel is no
	/// longer borrowed, together with the panel-wide enable or disable.
	fn set_read_only(&mut self, read_only: bool);
}
