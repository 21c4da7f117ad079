//! A single toolbar button.

use std::fmt;
use std::rc::Rc;

use inkstone_primitives::CommandSpec;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use tracing::warn;

use super::PanelHost;
use crate::error::StatusError;

bitflags::bitflags! {
	/// Orthogonal visual states of a control.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct ControlFlags: u8 {
		/// Accepts user clicks.
		const ENABLED = 1 << 0;
		/// The control's formatting applies at the selection.
		const ACTIVE = 1 << 1;
		const HIGHLIGHTED = 1 << 2;
	}
}

impl Default for ControlFlags {
	fn default() -> Self {
		Self::ENABLED
	}
}

/// Name and flags of a control. Status evaluators and click actions receive
/// this rather than the whole control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
	name: String,
	flags: ControlFlags,
}

impl ControlState {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			flags: ControlFlags::default(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn flags(&self) -> ControlFlags {
		self.flags
	}

	pub fn is_enabled(&self) -> bool {
		self.flags.contains(ControlFlags::ENABLED)
	}

	pub fn is_active(&self) -> bool {
		self.flags.contains(ControlFlags::ACTIVE)
	}

	pub fn is_highlighted(&self) -> bool {
		self.flags.contains(ControlFlags::HIGHLIGHTED)
	}

	pub fn enable(&mut self) {
		self.flags.insert(ControlFlags::ENABLED);
	}

	/// Stops accepting clicks. The active flag is left alone.
	pub fn disable(&mut self) {
		self.flags.remove(ControlFlags::ENABLED);
	}

	pub fn activate(&mut self) {
		self.flags.insert(ControlFlags::ACTIVE);
	}

	pub fn deactivate(&mut self) {
		self.flags.remove(ControlFlags::ACTIVE);
	}

	pub fn highlight(&mut self) {
		self.flags.insert(ControlFlags::HIGHLIGHTED);
	}

	pub fn unhighlight(&mut self) {
		self.flags.remove(ControlFlags::HIGHLIGHTED);
	}
}

/// Query results gathered during one status cycle.
///
/// A `None` entry records a query that was issued but got no reply (for
/// example because the editor is read-only); it still counts as answered so
/// the query is not repeated within the cycle.
#[derive(Debug, Default)]
pub struct StatusCache {
	entries: FxHashMap<String, Option<Value>>,
}

impl StatusCache {
	pub fn get(&self, query: &str) -> Option<&Option<Value>> {
		self.entries.get(query)
	}

	pub fn insert(&mut self, query: impl Into<String>, reply: Option<Value>) {
		self.entries.insert(query.into(), reply);
	}

	/// Distinct queries issued this cycle.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Interprets a query reply for a control.
pub type StatusEvaluator = Rc<dyn Fn(&mut ControlState, &Value) -> Result<(), StatusError>>;

/// Replaces the default click behaviour.
pub type ClickAction = Rc<dyn Fn(&mut ControlState, &mut dyn PanelHost)>;

/// Runs after each render.
pub type AfterRender = Rc<dyn Fn(&mut ControlState)>;

/// Behaviour overrides layered onto the base control.
#[derive(Clone, Default)]
pub struct Behavior {
	pub click: Option<ClickAction>,
	pub status: Option<StatusEvaluator>,
	pub after_render: Option<AfterRender>,
	/// Clicks are honoured even while the control is disabled.
	pub ignores_disabled: bool,
}

impl fmt::Debug for Behavior {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Behavior")
			.field("click", &self.click.is_some())
			.field("status", &self.status.is_some())
			.field("after_render", &self.after_render.is_some())
			.field("ignores_disabled", &self.ignores_disabled)
			.finish()
	}
}

/// Default status evaluation: active iff the reply is truthy.
pub fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// A toolbar button.
#[derive(Debug, Clone)]
pub struct ToolbarControl {
	state: ControlState,
	label: String,
	command: Option<CommandSpec>,
	deactivate_command: Option<CommandSpec>,
	queries: SmallVec<[CommandSpec; 1]>,
	no_activate: bool,
	template_data: Map<String, Value>,
	behavior: Behavior,
}

impl ToolbarControl {
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
		let name = name.into();
		let label = label.into();
		let mut template_data = Map::new();
		template_data.insert("className".into(), Value::String(format!("button-{name}")));
		template_data.insert("label".into(), Value::String(label.clone()));
		Self {
			state: ControlState::new(name),
			label,
			command: None,
			deactivate_command: None,
			queries: SmallVec::new(),
			no_activate: false,
			template_data,
			behavior: Behavior::default(),
		}
	}

	/// Command sent on click while inactive.
	pub fn with_command(mut self, command: impl Into<CommandSpec>) -> Self {
		self.command = Some(command.into());
		self
	}

	/// Command sent on click while active. Falls back to the regular command.
	pub fn with_deactivate_command(mut self, command: impl Into<CommandSpec>) -> Self {
		self.deactivate_command = Some(command.into());
		self
	}

	/// Adds a status query. A control without queries never takes part in
	/// status cycles.
	pub fn with_query(mut self, query: impl Into<CommandSpec>) -> Self {
		self.queries.push(query.into());
		self
	}

	/// Clicks leave the active flag untouched.
	pub fn no_activate(mut self) -> Self {
		self.no_activate = true;
		self
	}

	/// Extra values for the button template. `className` and `label` are
	/// always present.
	pub fn with_template_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.template_data.insert(key.into(), value.into());
		self
	}

	pub fn on_click(mut self, action: impl Fn(&mut ControlState, &mut dyn PanelHost) + 'static) -> Self {
		self.behavior.click = Some(Rc::new(action));
		self
	}

	pub fn on_status(mut self, evaluator: impl Fn(&mut ControlState, &Value) -> Result<(), StatusError> + 'static) -> Self {
		self.behavior.status = Some(Rc::new(evaluator));
		self
	}

	pub fn after_render(mut self, hook: impl Fn(&mut ControlState) + 'static) -> Self {
		self.behavior.after_render = Some(Rc::new(hook));
		self
	}

	pub fn ignore_disabled(mut self) -> Self {
		self.behavior.ignores_disabled = true;
		self
	}

	pub fn name(&self) -> &str {
		self.state.name()
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn state(&self) -> &ControlState {
		&self.state
	}

	pub fn template_data(&self) -> &Map<String, Value> {
		&self.template_data
	}

	pub fn queries(&self) -> &[CommandSpec] {
		&self.queries
	}

	pub fn is_enabled(&self) -> bool {
		self.state.is_enabled()
	}

	pub fn is_active(&self) -> bool {
		self.state.is_active()
	}

	pub fn is_highlighted(&self) -> bool {
		self.state.is_highlighted()
	}

	pub fn enable(&mut self) {
		self.state.enable();
	}

	pub fn disable(&mut self) {
		self.state.disable();
	}

	/// Flips between enabled and disabled.
	pub fn toggle(&mut self) {
		if self.is_enabled() {
			self.disable();
		} else {
			self.enable();
		}
	}

	pub fn activate(&mut self) {
		self.state.activate();
	}

	pub fn deactivate(&mut self) {
		self.state.deactivate();
	}

	pub fn highlight(&mut self) {
		self.state.highlight();
	}

	pub fn unhighlight(&mut self) {
		self.state.unhighlight();
	}

	/// Markup for the button, then the `after_render` hook.
	pub fn render(&mut self) -> String {
		let mut wrap = format!("button-wrap button-wrap-{}", self.name());
		let mut button = "button".to_owned();
		if let Some(Value::String(class)) = self.template_data.get("className") {
			button.push(' ');
			button.push_str(class);
		}
		if !self.is_enabled() {
			wrap.push_str(" disabled");
			button.push_str(" disabled");
		}
		if self.is_active() {
			wrap.push_str(" button-active");
		}
		if self.is_highlighted() {
			button.push_str(" highlight");
		}
		let label = match self.template_data.get("label") {
			Some(Value::String(label)) => label.as_str(),
			_ => self.label.as_str(),
		};
		let label = escape(label);
		let markup = format!("<div class=\"{}\"><button class=\"{}\" title=\"{label}\">{label}</button></div>", escape(&wrap), escape(&button));

		if let Some(hook) = self.behavior.after_render.clone() {
			hook(&mut self.state);
		}
		markup
	}

	/// Resolves this control's queries against the cycle's cache, asking the
	/// host only for queries nobody has asked yet.
	pub fn check_status(&mut self, cache: &mut StatusCache, host: &mut dyn PanelHost) {
		if self.queries.is_empty() {
			return;
		}
		for query in &self.queries {
			let reply = match cache.get(&query.name) {
				Some(cached) => cached.clone(),
				None => {
					let reply = host.command(query.to_command());
					cache.insert(query.name.clone(), reply.clone());
					reply
				}
			};
			let Some(reply) = reply else { continue };

			let outcome = match &self.behavior.status {
				Some(evaluate) => evaluate(&mut self.state, &reply),
				None => {
					if truthy(&reply) {
						self.state.activate();
					} else {
						self.state.deactivate();
					}
					Ok(())
				}
			};
			if let Err(err) = outcome {
				warn!(control = self.state.name(), query = %query.name, %err, "toolbar.status_failed");
			}
		}
	}

	/// Handles a user click. Returns false when the click was ignored because
	/// the control is disabled.
	pub fn click(&mut self, host: &mut dyn PanelHost) -> bool {
		if !self.is_enabled() && !self.behavior.ignores_disabled {
			return false;
		}
		if let Some(action) = self.behavior.click.clone() {
			action(&mut self.state, host);
			return true;
		}

		let spec = if self.is_active() {
			self.deactivate_command.as_ref().or(self.command.as_ref())
		} else {
			self.command.as_ref()
		};
		if let Some(spec) = spec {
			host.command(spec.to_command());
		}
		if !self.no_activate {
			if self.is_active() {
				self.deactivate();
			} else {
				self.activate();
			}
		}
		true
	}
}

fn escape(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	for ch in raw.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			_ => out.push(ch),
		}
	}
	out
}
