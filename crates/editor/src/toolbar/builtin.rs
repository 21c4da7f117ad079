//! Stock controls.

use inkstone_primitives::CommandSpec;

use super::{ToolbarControl, truthy};
use crate::commands::{NATIVE_COMMAND, query_command_name};

/// Bold toggle. Sends `nativeCommand` with `"bold"` and is active while the
/// selection start sits inside bold text.
pub fn bold() -> ToolbarControl {
	ToolbarControl::new("bold", "Bold")
		.with_command(CommandSpec::new(NATIVE_COMMAND).with_value("bold"))
		.with_query(CommandSpec::new(query_command_name("bold")))
		.on_status(|state, reply| {
			if truthy(reply) {
				state.activate();
			} else {
				state.deactivate();
			}
			Ok(())
		})
}

/// Read-only switch. Works while the rest of the toolbar is disabled.
pub fn toggle() -> ToolbarControl {
	ToolbarControl::new("toggle", "Toggle").ignore_disabled().on_click(|_, host| {
		let read_only = !host.is_read_only();
		host.set_read_only(read_only);
	})
}
