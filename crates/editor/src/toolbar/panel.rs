use std::time::{Duration, Instant};

use inkstone_primitives::Debounce;
use tracing::{debug, trace};

use super::{PanelHost, StatusCache, ToolbarControl};
use crate::error::PanelError;

/// Ordered collection of toolbar controls.
///
/// Insertion order is display order and status-check order. Status checks
/// are debounced: [`check_status`](Self::check_status) only schedules a
/// cycle, which [`tick`](Self::tick) runs once the quiet period has passed.
#[derive(Debug)]
pub struct ToolbarPanel {
	items: Vec<ToolbarControl>,
	status: Debounce<()>,
	shown: bool,
	deep_shadow: bool,
}

impl ToolbarPanel {
	pub fn new(status_quiet: Duration) -> Self {
		Self {
			items: Vec::new(),
			status: Debounce::new(status_quiet),
			shown: true,
			deep_shadow: false,
		}
	}

	pub fn add_item(&mut self, control: ToolbarControl) {
		debug!(control = control.name(), "toolbar.add_item");
		self.items.push(control);
	}

	pub fn add_items(&mut self, controls: impl IntoIterator<Item = ToolbarControl>) {
		for control in controls {
			self.add_item(control);
		}
	}

	/// The most recently added control with this name.
	pub fn get_item(&self, name: &str) -> Option<&ToolbarControl> {
		self.items.iter().rev().find(|c| c.name() == name)
	}

	pub fn get_item_mut(&mut self, name: &str) -> Option<&mut ToolbarControl> {
		self.items.iter_mut().rev().find(|c| c.name() == name)
	}

	pub fn items(&self) -> &[ToolbarControl] {
		&self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Schedules a status cycle, superseding any cycle already scheduled.
	pub fn check_status(&mut self, now: Instant) {
		self.status.trigger(now, ());
	}

	pub fn is_status_pending(&self) -> bool {
		self.status.is_pending()
	}

	/// When the scheduled status cycle is due, if one is scheduled.
	pub fn status_deadline(&self) -> Option<Instant> {
		self.status.deadline()
	}

	/// Runs the scheduled status cycle if its quiet period has elapsed.
	/// Returns whether a cycle ran.
	pub fn tick(&mut self, now: Instant, host: &mut dyn PanelHost) -> bool {
		if self.status.poll(now).is_none() {
			return false;
		}
		self.run_status_cycle(host);
		true
	}

	/// Checks every control against one fresh cache, in insertion order.
	/// Returns the number of distinct queries sent upward.
	pub fn run_status_cycle(&mut self, host: &mut dyn PanelHost) -> usize {
		let mut cache = StatusCache::default();
		for control in &mut self.items {
			control.check_status(&mut cache, host);
		}
		debug!(controls = self.items.len(), queries = cache.len(), "toolbar.status_cycle");
		cache.len()
	}

	/// Clicks the named control. Returns whether the click was acted on.
	pub fn click(&mut self, name: &str, host: &mut dyn PanelHost) -> Result<bool, PanelError> {
		let control = self.get_item_mut(name).ok_or_else(|| PanelError::ControlNotFound(name.to_owned()))?;
		Ok(control.click(host))
	}

	/// Disables every control except those named in `exceptions`.
	pub fn disable(&mut self, exceptions: &[&str]) {
		for control in &mut self.items {
			if !exceptions.contains(&control.name()) {
				control.disable();
			}
		}
	}

	pub fn enable(&mut self) {
		for control in &mut self.items {
			control.enable();
		}
	}

	/// Whether the named control is hidden, which is the case exactly when the
	/// panel is hidden. Asking about a control that does not exist is a wiring
	/// error.
	pub fn is_button_hidden(&self, name: &str) -> Result<bool, PanelError> {
		if name.is_empty() {
			return Err(PanelError::EmptyName);
		}
		if !self.items.iter().any(|c| c.name() == name) {
			return Err(PanelError::ControlNotFound(name.to_owned()));
		}
		Ok(!self.shown)
	}

	pub fn show(&mut self) {
		if self.shown {
			return;
		}
		self.shown = true;
	}

	pub fn hide(&mut self) {
		if !self.shown {
			return;
		}
		self.shown = false;
	}

	pub fn is_shown(&self) -> bool {
		self.shown
	}

	/// Re-lays out the controls for the current width. Does nothing while the
	/// panel is hidden; returns whether a layout pass ran.
	pub fn fit_size(&mut self) -> bool {
		if !self.shown {
			return false;
		}
		trace!(controls = self.items.len(), "toolbar.fit_size");
		true
	}

	/// Deepens the panel's shadow while the editing surface has focus.
	pub fn deepen_shadow(&mut self, deep: bool) {
		self.deep_shadow = deep;
	}

	pub fn has_deep_shadow(&self) -> bool {
		self.deep_shadow
	}

	/// Panel markup with every control rendered in order.
	pub fn render(&mut self) -> String {
		let mut class = "panel-wrap".to_owned();
		if self.deep_shadow {
			class.push_str(" deep-shadow");
		}
		let style = if self.shown { "" } else { " style=\"display: none\"" };
		let buttons: String = self.items.iter_mut().map(ToolbarControl::render).collect();
		format!("<div class=\"{class}\"{style}><div class=\"panel\">{buttons}</div></div>")
	}
}
