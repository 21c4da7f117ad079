use inkstone_bridge::BridgeClient;
use inkstone_dom::{NodeId, Range, RangeId, Window};
use inkstone_primitives::Point;
use regex::Regex;
use strum::Display;
use tracing::debug;

use super::content::ContentFilter;
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::surface::EditingSurface;

/// Readiness of an editor.
///
/// Constructing until [`Editor::render`](super::Editor::render), surface
/// binding until the nested window is reachable, then ready until torn down.
/// Read-only mode is orthogonal to the ready phase.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
	Constructing,
	SurfaceBinding,
	Ready,
	TornDown,
}

/// Everything a command handler may touch: the surface, its selection and
/// content, read-only mode, and the host bridge.
///
/// Selection and content operations require the ready phase and fail with
/// [`EditorError::NotReady`] or [`EditorError::TornDown`] otherwise.
pub struct EditorState {
	pub(super) config: EditorConfig,
	pub(super) phase: Phase,
	pub(super) surface: EditingSurface,
	pub(super) bridge: BridgeClient,
	pub(super) read_only: bool,
	/// Read-only change requested from inside a toolbar pass.
	pub(super) pending_read_only: Option<bool>,
	/// The current live range. Only one is ever held.
	pub(super) range: Option<RangeId>,
	/// Last selection seen inside the surface, kept for focus restoration.
	pub(super) last_selection: Option<Range>,
	/// Where the surface's viewport sits on the host page.
	pub(super) frame_origin: Point,
	monitoring: bool,
	seen_version: u64,
	/// A change observed while monitoring that the driver has not picked up.
	change_pending: bool,
	pub(super) img_tag: Regex,
	pub(super) get_filters: Vec<ContentFilter>,
	pub(super) set_filters: Vec<ContentFilter>,
}

impl std::fmt::Debug for EditorState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EditorState")
			.field("phase", &self.phase)
			.field("read_only", &self.read_only)
			.field("monitoring", &self.monitoring)
			.field("surface", &self.surface)
			.field("bridge", &self.bridge)
			.finish_non_exhaustive()
	}
}

impl EditorState {
	pub(super) fn new(config: EditorConfig, surface: EditingSurface, bridge: BridgeClient) -> Result<Self> {
		Ok(Self {
			config,
			phase: Phase::Constructing,
			surface,
			bridge,
			read_only: false,
			pending_read_only: None,
			range: None,
			last_selection: None,
			frame_origin: Point::default(),
			monitoring: false,
			seen_version: 0,
			change_pending: false,
			img_tag: Regex::new(r#"(?i)(<img\b(?:"[^"]*"|'[^']*'|[^"'>])*)>"#)?,
			get_filters: Vec::new(),
			set_filters: Vec::new(),
		})
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn is_ready(&self) -> bool {
		self.phase == Phase::Ready
	}

	pub fn is_read_only(&self) -> bool {
		self.read_only
	}

	pub fn surface(&self) -> &EditingSurface {
		&self.surface
	}

	pub fn bridge_mut(&mut self) -> &mut BridgeClient {
		&mut self.bridge
	}

	pub(super) fn ensure_ready(&self) -> Result<()> {
		ensure_ready(self.phase)
	}

	/// The surface window and the editable root.
	pub(super) fn parts(&mut self) -> Result<(&mut Window, NodeId)> {
		surface_parts(self.phase, &mut self.surface)
	}

	pub fn window(&self) -> Option<&Window> {
		self.surface.window()
	}

	/// The surface window, for hit testing and focus changes made by the
	/// embedder.
	pub fn window_mut(&mut self) -> Option<&mut Window> {
		self.surface.window_mut()
	}

	/// The editable root.
	pub fn root(&self) -> Option<NodeId> {
		self.surface.root()
	}

	/// Flips the root's mutability attribute and the read-only gate together.
	/// The attribute write is not reported as a content change.
	pub(super) fn apply_read_only(&mut self, read_only: bool) -> Result<()> {
		let (window, root) = self.parts()?;
		let doc = window.document_mut();
		doc.set_attr(root, "contenteditable", if read_only { "false" } else { "true" })?;
		self.read_only = read_only;
		self.forget_changes();
		Ok(())
	}

	pub fn start_monitor_change(&mut self) {
		self.forget_changes();
		self.monitoring = true;
	}

	pub fn stop_monitor_change(&mut self) {
		self.observe_changes();
		self.monitoring = false;
	}

	pub fn is_monitoring(&self) -> bool {
		self.monitoring
	}

	/// Runs `f` with change monitoring off, then restores whatever monitoring
	/// state was in effect. Nested calls leave the toggling to the outermost.
	pub fn silent_do<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
		let was_monitoring = self.monitoring;
		if was_monitoring {
			self.stop_monitor_change();
		}
		let out = f(self);
		if was_monitoring {
			self.start_monitor_change();
		}
		out
	}

	/// Records a pending change if the document moved on since the last look
	/// while monitoring was on.
	pub(super) fn observe_changes(&mut self) {
		let Some(version) = self.document_version() else { return };
		if self.monitoring && version != self.seen_version {
			self.change_pending = true;
		}
		self.seen_version = version;
	}

	/// Takes the pending change flag, looking at the document first.
	pub(super) fn take_change(&mut self) -> bool {
		self.observe_changes();
		std::mem::take(&mut self.change_pending)
	}

	/// Marks the document's current state as seen without reporting it.
	fn forget_changes(&mut self) {
		if let Some(version) = self.document_version() {
			self.seen_version = version;
		}
	}

	fn document_version(&self) -> Option<u64> {
		self.surface.window().map(|w| w.document().version())
	}

	/// Runs a native editing primitive against the surface selection.
	pub fn exec_native(&mut self, name: &str, value: Option<&str>) -> bool {
		let Ok((window, _)) = self.parts() else {
			return false;
		};
		let done = window.exec_command(name, value);
		debug!(command = name, done, "editor.exec_native");
		done
	}

	/// Whether an inline style applies at the selection start.
	pub fn query_native(&self, style: &str) -> bool {
		self.is_ready() && self.window().is_some_and(|w| w.query_command_state(style))
	}
}

fn ensure_ready(phase: Phase) -> Result<()> {
	match phase {
		Phase::Ready => Ok(()),
		Phase::TornDown => Err(EditorError::TornDown),
		Phase::Constructing | Phase::SurfaceBinding => Err(EditorError::NotReady),
	}
}

/// Window and root borrowed from the surface alone, leaving the other state
/// fields free.
pub(super) fn surface_parts(phase: Phase, surface: &mut EditingSurface) -> Result<(&mut Window, NodeId)> {
	ensure_ready(phase)?;
	let root = surface.root().ok_or(EditorError::NotReady)?;
	let window = surface.window_mut().ok_or(EditorError::NotReady)?;
	Ok((window, root))
}
