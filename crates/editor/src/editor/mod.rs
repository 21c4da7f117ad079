//! The editor controller.
//!
//! [`Editor`] owns the editing surface, the command registry, the toolbar
//! panel, and the host bridge, and routes everything between them. It is
//! driven by [`Editor::tick`], which the embedder calls from its event loop
//! with the current time; debounced work and deferred focus fire from there.

mod content;
mod selection;
mod state;
#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

use std::fmt;
use std::time::Instant;

use inkstone_bridge::{BridgeClient, HostApi, HostInstance};
use inkstone_primitives::{Command, Debounce, Emitter, ListenerId, Point};
use serde_json::{Value, json};
use tracing::{debug, info};

pub use content::{ContentFilter, ContentOptions};
pub use selection::SelectOptions;
pub use state::{EditorState, Phase};

use crate::commands::{CommandRegistry, register_builtins};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::surface::{EditingSurface, NativeEvent, SurfaceEvent, SurfaceEventKind, SurfaceLoader};
use crate::toolbar::{PanelHost, ToolbarControl, ToolbarPanel};

/// Notifications for listeners outside the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
	/// The surface is bound and ready callbacks have run.
	Ready,
	/// Content changed while change monitoring was on, after the change
	/// quiet period.
	ContentChanged,
	ReadOnlyChanged(bool),
	/// The host asked for the whole editor to be reloaded.
	ReloadRequested,
	/// A native surface event was handled.
	Surface(SurfaceEventKind),
}

/// What the embedder should do with the native event it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
	/// The surface accepted and handled the event.
	pub forwarded: bool,
	/// The event's default action must be suppressed (link clicks).
	pub prevent_default: bool,
}

type ReadyCallback = Box<dyn FnOnce(&mut Editor)>;

/// A rich-text editor instance.
pub struct Editor {
	state: EditorState,
	registry: CommandRegistry,
	panel: ToolbarPanel,
	ready_callbacks: Vec<ReadyCallback>,
	events: Emitter<EditorEvent>,
	change: Debounce<()>,
	resize: Debounce<()>,
	paste: Debounce<()>,
	/// When a click's deferred refocus is due.
	click_focus_at: Option<Instant>,
}

impl fmt::Debug for Editor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Editor")
			.field("state", &self.state)
			.field("registry", &self.registry)
			.field("panel", &self.panel)
			.field("ready_callbacks", &self.ready_callbacks.len())
			.finish_non_exhaustive()
	}
}

impl Editor {
	/// Builds an editor with the stock commands registered. Nothing is
	/// rendered until [`render`](Self::render).
	pub fn new(config: EditorConfig, loader: impl SurfaceLoader + 'static, host: impl HostInstance + 'static) -> Result<Self> {
		config.validate()?;
		let surface = EditingSurface::new(
			loader,
			config.surface_poll(),
			config.head_template.clone(),
			config.body_template.clone(),
			config.root_class.clone(),
		);
		let bridge = BridgeClient::new(host, config.dev_mode);
		let panel = ToolbarPanel::new(config.status_debounce());
		let change = Debounce::new(config.change_debounce());
		let resize = Debounce::new(config.resize_debounce());
		let paste = Debounce::new(config.paste_defer());

		let mut registry = CommandRegistry::new();
		register_builtins(&mut registry);
		Ok(Self {
			state: EditorState::new(config, surface, bridge)?,
			registry,
			panel,
			ready_callbacks: Vec::new(),
			events: Emitter::new(),
			change,
			resize,
			paste,
			click_focus_at: None,
		})
	}

	/// Registers a command handler under comma-separated `names`. A later
	/// registration for the same name replaces the earlier one.
	pub fn add_command(&mut self, names: &str, handler: impl Fn(&mut EditorState, &str, Option<&Value>) -> Option<Value> + 'static) {
		self.registry.register(names, handler);
	}

	pub fn registry(&self) -> &CommandRegistry {
		&self.registry
	}

	pub fn add_item(&mut self, control: ToolbarControl) {
		self.panel.add_item(control);
	}

	pub fn add_items(&mut self, controls: impl IntoIterator<Item = ToolbarControl>) {
		self.panel.add_items(controls);
	}

	pub fn panel(&self) -> &ToolbarPanel {
		&self.panel
	}

	pub fn panel_mut(&mut self) -> &mut ToolbarPanel {
		&mut self.panel
	}

	pub fn state(&self) -> &EditorState {
		&self.state
	}

	pub fn state_mut(&mut self) -> &mut EditorState {
		&mut self.state
	}

	pub fn phase(&self) -> Phase {
		self.state.phase
	}

	/// Renders the toolbar and starts binding the surface. Returns the panel
	/// markup.
	pub fn render(&mut self, now: Instant) -> Result<String> {
		match self.state.phase {
			Phase::TornDown => return Err(EditorError::TornDown),
			Phase::Constructing => self.state.phase = Phase::SurfaceBinding,
			Phase::SurfaceBinding | Phase::Ready => {}
		}
		self.state.surface.render(now);
		Ok(self.panel.render())
	}

	/// Queues work for when the editor becomes ready. Callbacks run once, in
	/// registration order. Once ready, the callback runs immediately.
	pub fn ready(&mut self, callback: impl FnOnce(&mut Editor) + 'static) {
		if self.state.is_ready() {
			callback(self);
		} else {
			self.ready_callbacks.push(Box::new(callback));
		}
	}

	pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> ListenerId {
		self.events.subscribe(listener)
	}

	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		self.events.unsubscribe(id)
	}

	/// Advances the editor to `now`: binds the surface when it becomes
	/// reachable, handles queued surface events, and fires whatever debounced
	/// or deferred work has come due.
	pub fn tick(&mut self, now: Instant) -> Result<()> {
		if self.state.phase == Phase::TornDown {
			return Ok(());
		}
		self.state.surface.tick(now)?;
		for event in self.state.surface.drain_events() {
			match event {
				SurfaceEvent::Ready => self.on_surface_ready()?,
				SurfaceEvent::Native(event) => {
					self.handle_native(&event, now)?;
				}
			}
		}
		if !self.state.is_ready() {
			return Ok(());
		}

		if self.paste.poll(now).is_some()
			&& let Some(window) = self.state.surface.window_mut()
		{
			window.document_mut().touch();
		}
		if self.state.take_change() {
			self.change.trigger(now, ());
		}
		if self.change.poll(now).is_some() {
			self.on_area_change(now)?;
		}
		if self.resize.poll(now).is_some() {
			self.panel.fit_size();
		}
		if self.click_focus_at.is_some_and(|due| now >= due) {
			self.click_focus_at = None;
			self.state.focus_article(None)?;
		}

		let mut sink = CommandSink {
			state: &mut self.state,
			registry: &self.registry,
		};
		self.panel.tick(now, &mut sink);
		self.apply_pending_read_only()
	}

	/// Dispatches a command through the read-only gate and the registry.
	///
	/// In read-only mode the command is dropped: no handler runs and the
	/// callback is not called. Otherwise the handler's reply goes to the
	/// callback, if any, and is returned.
	pub fn command(&mut self, command: Command) -> Option<Value> {
		dispatch_command(&mut self.state, &self.registry, command)
	}

	/// Clicks a toolbar control as the user would.
	pub fn click_control(&mut self, name: &str) -> Result<bool> {
		let mut sink = CommandSink {
			state: &mut self.state,
			registry: &self.registry,
		};
		let clicked = self.panel.click(name, &mut sink)?;
		self.apply_pending_read_only()?;
		Ok(clicked)
	}

	pub fn is_read_only(&self) -> bool {
		self.state.read_only
	}

	/// Switches read-only mode. The root's mutability, the toolbar's enabled
	/// state, and the command gate change together.
	pub fn set_read_only(&mut self, read_only: bool) -> Result<()> {
		self.state.apply_read_only(read_only)?;
		if read_only {
			self.panel.disable(&[]);
		} else {
			self.panel.enable();
		}
		info!(read_only, "editor.read_only");
		self.events.emit(&EditorEvent::ReadOnlyChanged(read_only));
		Ok(())
	}

	fn apply_pending_read_only(&mut self) -> Result<()> {
		match self.state.pending_read_only.take() {
			Some(read_only) => self.set_read_only(read_only),
			None => Ok(()),
		}
	}

	/// Hands a native event from the nested window to the surface and, if
	/// the surface forwards it, handles it.
	pub fn dispatch_native(&mut self, event: NativeEvent, now: Instant) -> Result<DispatchOutcome> {
		if !self.state.surface.dispatch(event) {
			return Ok(DispatchOutcome::default());
		}
		let mut outcome = DispatchOutcome {
			forwarded: true,
			prevent_default: false,
		};
		for queued in self.state.surface.drain_events() {
			match queued {
				SurfaceEvent::Ready => self.on_surface_ready()?,
				SurfaceEvent::Native(native) => outcome.prevent_default |= self.handle_native(&native, now)?,
			}
		}
		Ok(outcome)
	}

	/// Mouse released anywhere in the host page, typically after a toolbar
	/// click: give focus back to the root.
	pub fn document_mouseup(&mut self) -> Result<()> {
		self.state.focus_article(None)
	}

	/// The host window was resized. Re-fits the toolbar after the resize
	/// quiet period.
	pub fn resize(&mut self, now: Instant) {
		self.resize.trigger(now, ());
	}

	/// Asks the host to reload the editor.
	pub fn reload(&mut self) -> Result<()> {
		info!("editor.reload");
		self.state.bridge.call(HostApi::ReloadEditor, &[])?;
		self.events.emit(&EditorEvent::ReloadRequested);
		Ok(())
	}

	/// Tears the editor down. Pending callbacks, debounced work, and the
	/// surface are dropped; later API calls fail with
	/// [`EditorError::TornDown`].
	pub fn destroy(&mut self) {
		if self.state.phase == Phase::TornDown {
			return;
		}
		if let (Some(id), Some(window)) = (self.state.range.take(), self.state.surface.window_mut()) {
			window.document_mut().detach_range(id);
		}
		self.state.surface.teardown();
		self.state.phase = Phase::TornDown;
		self.ready_callbacks.clear();
		self.change.cancel();
		self.resize.cancel();
		self.paste.cancel();
		self.click_focus_at = None;
		info!("editor.destroyed");
	}

	fn on_surface_ready(&mut self) -> Result<()> {
		self.state.phase = Phase::Ready;
		let (window, _) = self.state.parts()?;
		let range = window.document_mut().create_range();
		self.state.range = Some(range);
		self.set_read_only(false)?;
		self.state.focus_article(None)?;
		self.state.start_monitor_change();
		self.state.bridge.ready();
		info!("editor.ready");

		for callback in std::mem::take(&mut self.ready_callbacks) {
			callback(self);
		}
		self.events.emit(&EditorEvent::Ready);
		Ok(())
	}

	fn on_area_change(&mut self, now: Instant) -> Result<()> {
		debug!("editor.content_changed");
		self.panel.check_status(now);
		self.state.bridge.call(HostApi::OnDocumentChange, &[])?;
		self.events.emit(&EditorEvent::ContentChanged);
		Ok(())
	}

	/// Returns whether the event's default action must be prevented.
	fn handle_native(&mut self, event: &NativeEvent, now: Instant) -> Result<bool> {
		let mut prevent_default = false;
		match event.kind {
			SurfaceEventKind::Focus => self.panel.deepen_shadow(true),
			SurfaceEventKind::Blur => self.panel.deepen_shadow(false),
			SurfaceEventKind::Paste => self.paste.trigger(now, ()),
			SurfaceEventKind::Click => prevent_default = self.on_area_click(event, now)?,
			SurfaceEventKind::SelectionChange => {
				self.panel.check_status(now);
				if let Some(range) = self.state.get_range() {
					self.state.last_selection = Some(range);
				}
			}
			SurfaceEventKind::MouseUp => self.document_mouseup()?,
			SurfaceEventKind::Cut
			| SurfaceEventKind::DblClick
			| SurfaceEventKind::ContextMenu
			| SurfaceEventKind::DragEnter
			| SurfaceEventKind::DragEnd
			| SurfaceEventKind::KeyDown => {}
		}
		self.events.emit(&EditorEvent::Surface(event.kind));
		Ok(prevent_default)
	}

	fn on_area_click(&mut self, event: &NativeEvent, now: Instant) -> Result<bool> {
		let was_read_only = self.state.read_only;
		let (target_tag, in_link) = {
			let (window, _) = self.state.parts()?;
			let doc = window.document();
			let in_link = doc.ancestors(event.target).any(|n| doc.tag_name(n) == Some("a") && doc.attr(n, "href").is_some());
			(doc.tag_name(event.target).map(str::to_owned), in_link)
		};

		if matches!(target_tag.as_deref(), Some("html" | "body")) {
			self.state.focus_article_last_line(event.point)?;
		}
		let point = event.point.unwrap_or(Point::new(0.0, 0.0));
		self.state.bridge.call(HostApi::OnAreaClick, &[json!(point.x), json!(point.y)])?;

		if !was_read_only {
			self.click_focus_at = Some(now + self.state.config.click_focus_delay());
		}
		Ok(in_link)
	}
}

/// Dispatch with the read-only gate, shared by direct and toolbar commands.
fn dispatch_command(state: &mut EditorState, registry: &CommandRegistry, mut command: Command) -> Option<Value> {
	if state.read_only {
		debug!(name = command.name(), "command.read_only");
		return None;
	}
	let callback = command.take_callback();
	let reply = registry.dispatch(state, command.name(), command.value());
	if let Some(callback) = callback {
		callback(reply.as_ref());
	}
	reply
}

/// The upward channel handed to the toolbar while it runs.
struct CommandSink<'a> {
	state: &'a mut EditorState,
	registry: &'a CommandRegistry,
}

impl PanelHost for CommandSink<'_> {
	fn command(&mut self, command: Command) -> Option<Value> {
		dispatch_command(self.state, self.registry, command)
	}

	fn is_read_only(&self) -> bool {
		self.state.read_only
	}

	fn set_read_only(&mut self, read_only: bool) {
		self.state.pending_read_only = Some(read_only);
	}
}
