//! Command data model.
//!
//! A [`Command`] names an editor action, carries an optional JSON argument,
//! and optionally a one-shot callback that receives the handler's reply. The
//! name is fixed at construction; nothing downstream can rename a command that
//! is already in flight.
//!
//! [`CommandSpec`] is the cloneable, deserializable description that toolbar
//! controls keep in their configuration and turn into fresh commands on
//! demand.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Argument and reply type carried by commands.
pub type CommandValue = Value;

/// One-shot reply callback attached to a command.
pub type CommandCallback = Box<dyn FnOnce(Option<&Value>)>;

/// A formatting or editor action travelling toward the command registry.
pub struct Command {
	name: String,
	value: Option<Value>,
	callback: Option<CommandCallback>,
}

impl Command {
	/// Creates a command with no argument and no callback.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: None,
			callback: None,
		}
	}

	/// Attaches an argument.
	pub fn with_value(mut self, value: impl Into<Value>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Attaches a callback receiving the handler's reply.
	pub fn with_callback(mut self, callback: impl FnOnce(Option<&Value>) + 'static) -> Self {
		self.callback = Some(Box::new(callback));
		self
	}

	/// Normalizes a JSON description: either a bare name string or an object
	/// with `name` and optional `value`.
	pub fn from_json(spec: &Value) -> Option<Self> {
		CommandSpec::from_json(spec).map(|spec| spec.to_command())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> Option<&Value> {
		self.value.as_ref()
	}

	pub fn has_callback(&self) -> bool {
		self.callback.is_some()
	}

	/// Removes the callback so the dispatcher can invoke it exactly once.
	pub fn take_callback(&mut self) -> Option<CommandCallback> {
		self.callback.take()
	}
}

impl fmt::Debug for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("name", &self.name)
			.field("value", &self.value)
			.field("callback", &self.callback.is_some())
			.finish()
	}
}

impl From<&str> for Command {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for Command {
	fn from(name: String) -> Self {
		Self::new(name)
	}
}

impl From<&CommandSpec> for Command {
	fn from(spec: &CommandSpec) -> Self {
		spec.to_command()
	}
}

/// Static, cloneable command description.
///
/// Deserializes from either `"bold"` or `{ "name": "nativeCommand", "value": "bold" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSpec", into = "RawSpec")]
pub struct CommandSpec {
	/// Registered command name.
	pub name: String,
	/// Optional argument passed to the handler.
	pub value: Option<Value>,
}

impl CommandSpec {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), value: None }
	}

	pub fn with_value(mut self, value: impl Into<Value>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Normalizes a bare name or `{name, value}` object. Anything else is rejected.
	pub fn from_json(spec: &Value) -> Option<Self> {
		match spec {
			Value::String(name) => Some(Self::new(name.clone())),
			Value::Object(map) => {
				let name = map.get("name")?.as_str()?;
				Some(Self {
					name: name.to_owned(),
					value: map.get("value").cloned(),
				})
			}
			_ => None,
		}
	}

	/// Builds a fresh command without a callback.
	pub fn to_command(&self) -> Command {
		Command {
			name: self.name.clone(),
			value: self.value.clone(),
			callback: None,
		}
	}
}

impl From<&str> for CommandSpec {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSpec {
	Name(String),
	Full {
		name: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value: Option<Value>,
	},
}

impl From<RawSpec> for CommandSpec {
	fn from(raw: RawSpec) -> Self {
		match raw {
			RawSpec::Name(name) => Self::new(name),
			RawSpec::Full { name, value } => Self { name, value },
		}
	}
}

impl From<CommandSpec> for RawSpec {
	fn from(spec: CommandSpec) -> Self {
		match spec.value {
			None => RawSpec::Name(spec.name),
			value => RawSpec::Full { name: spec.name, value },
		}
	}
}
