//! Stock command handlers.

use inkstone_primitives::CommandSpec;
use serde_json::Value;
use tracing::debug;

use super::CommandRegistry;

/// Runs a native editing primitive on the surface document. The value is the
/// primitive's name, or `{ "name": ..., "value": ... }`.
pub const NATIVE_COMMAND: &str = "nativeCommand";

/// Prefix of the commands answering whether an inline style applies at the
/// selection, e.g. `queryCommandState:bold`.
pub const QUERY_COMMAND_STATE: &str = "queryCommandState:";

const QUERYABLE: [&str; 3] = ["bold", "italic", "underline"];

pub fn query_command_name(style: &str) -> String {
	format!("{QUERY_COMMAND_STATE}{style}")
}

/// Registers `nativeCommand` and the inline style queries.
pub fn register_builtins(registry: &mut CommandRegistry) {
	registry.register(NATIVE_COMMAND, |state, _, value| {
		let value = value?;
		let Some(spec) = CommandSpec::from_json(value) else {
			debug!(%value, "command.native_malformed");
			return None;
		};
		let arg = spec.value.map(|v| match v {
			Value::String(s) => s,
			other => other.to_string(),
		});
		Some(Value::Bool(state.exec_native(&spec.name, arg.as_deref())))
	});

	let queries = QUERYABLE.map(query_command_name).join(",");
	registry.register(&queries, |state, name, _| {
		let style = name.strip_prefix(QUERY_COMMAND_STATE)?;
		Some(Value::Bool(state.query_native(style)))
	});
}
