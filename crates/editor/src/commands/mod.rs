//! Name-to-handler dispatch table for editor commands.
//!
//! Names are registered comma separated and trimmed, so one handler can serve
//! several commands. A later registration for a name replaces the earlier one;
//! registration order otherwise does not matter. There is no removal.

mod builtin;

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, error};

pub use builtin::{NATIVE_COMMAND, QUERY_COMMAND_STATE, query_command_name, register_builtins};

use crate::editor::EditorState;

/// A command handler. Receives the editor, the name it was dispatched under,
/// and the command value; returns the command's reply, if any.
pub type CommandHandler = Rc<dyn Fn(&mut EditorState, &str, Option<&Value>) -> Option<Value>>;

/// Maps command names to handlers.
#[derive(Clone, Default)]
pub struct CommandRegistry {
	handlers: FxHashMap<String, CommandHandler>,
}

impl fmt::Debug for CommandRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.handlers.keys().collect();
		names.sort();
		f.debug_struct("CommandRegistry").field("names", &names).finish()
	}
}

impl CommandRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `handler` to every name in the comma-separated `names`. Empty
	/// segments are skipped. Last registration for a name wins.
	pub fn register(&mut self, names: &str, handler: impl Fn(&mut EditorState, &str, Option<&Value>) -> Option<Value> + 'static) {
		let handler: CommandHandler = Rc::new(handler);
		for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
			if self.handlers.insert(name.to_owned(), handler.clone()).is_some() {
				debug!(name, "command.replaced");
			}
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.handlers.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Runs the handler registered for `name` and returns its reply.
	///
	/// A missing handler yields `None`. In development mode it is also
	/// reported through the host's alert diagnostic.
	pub fn dispatch(&self, state: &mut EditorState, name: &str, value: Option<&Value>) -> Option<Value> {
		let Some(handler) = self.handlers.get(name).cloned() else {
			if state.config().dev_mode {
				error!(name, "command.missing");
				state.bridge_mut().alert(&format!("no handler registered for command {name}"));
			} else {
				debug!(name, "command.missing");
			}
			return None;
		};
		debug!(name, has_value = value.is_some(), "command.dispatch");
		handler(state, name, value)
	}
}
