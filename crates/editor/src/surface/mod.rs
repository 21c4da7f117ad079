//! The isolated rendering context hosting the editable root.
//!
//! The nested window may not exist when the surface is built. [`render`]
//! arms a poll loop; each [`tick`] retries until the loader hands over a
//! window, then the surface fills its head and body from templates, locates
//! the editable root, and queues [`SurfaceEvent::Ready`] exactly once.
//!
//! [`render`]: EditingSurface::render
//! [`tick`]: EditingSurface::tick


use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use inkstone_dom::{NodeId, Window};
use inkstone_primitives::{Point, PollUntil};
use strum::{Display, EnumString};
use tracing::{debug, trace};

use crate::error::{EditorError, Result};

/// Source of the surface's nested window.
pub trait SurfaceLoader {
	/// Returns the window once its document is reachable.
	fn load(&mut self) -> Option<Window>;
}

impl<F> SurfaceLoader for F
where
	F: FnMut() -> Option<Window>,
{
	fn load(&mut self) -> Option<Window> {
		self()
	}
}

/// Loader whose window is available on the first attempt.
#[derive(Debug, Default)]
pub struct PreparedWindow(Option<Window>);

impl PreparedWindow {
	pub fn new(window: Window) -> Self {
		Self(Some(window))
	}
}

impl SurfaceLoader for PreparedWindow {
	fn load(&mut self) -> Option<Window> {
		self.0.take()
	}
}

/// Native events the surface forwards.
#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum SurfaceEventKind {
	Focus,
	Blur,
	Paste,
	Cut,
	Click,
	DblClick,
	SelectionChange,
	ContextMenu,
	DragEnter,
	DragEnd,
	KeyDown,
	MouseUp,
}

impl SurfaceEventKind {
	/// Kinds listened for on the editable root rather than its document.
	/// These are the bindings a root replacement has to move.
	pub fn is_root_bound(self) -> bool {
		matches!(self, Self::Focus | Self::Blur | Self::Paste | Self::Cut)
	}
}

/// A native event as delivered by the nested window.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
	pub kind: SurfaceEventKind,
	pub target: NodeId,
	/// Client coordinates, for pointer events.
	pub point: Option<Point>,
	/// Key name, for keyboard events.
	pub key: Option<String>,
}

impl NativeEvent {
	pub fn new(kind: SurfaceEventKind, target: NodeId) -> Self {
		Self {
			kind,
			target,
			point: None,
			key: None,
		}
	}

	pub fn at(mut self, point: Point) -> Self {
		self.point = Some(point);
		self
	}

	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}
}

/// What the surface emits toward the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
	Ready,
	Native(NativeEvent),
}

/// The editing surface.
pub struct EditingSurface {
	loader: Box<dyn SurfaceLoader>,
	window: Option<Window>,
	poll: PollUntil,
	head_template: String,
	body_template: String,
	root_class: String,
	root: Option<NodeId>,
	queue: VecDeque<SurfaceEvent>,
}

impl fmt::Debug for EditingSurface {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EditingSurface")
			.field("ready", &self.is_ready())
			.field("root", &self.root)
			.field("queued", &self.queue.len())
			.finish_non_exhaustive()
	}
}

impl EditingSurface {
	pub fn new(
		loader: impl SurfaceLoader + 'static,
		poll_interval: Duration,
		head_template: impl Into<String>,
		body_template: impl Into<String>,
		root_class: impl Into<String>,
	) -> Self {
		Self {
			loader: Box::new(loader),
			window: None,
			poll: PollUntil::new(poll_interval),
			head_template: head_template.into(),
			body_template: body_template.into(),
			root_class: root_class.into(),
			root: None,
			queue: VecDeque::new(),
		}
	}

	/// Starts polling for the nested window. Calling again before readiness
	/// postpones the next attempt; after readiness it does nothing.
	pub fn render(&mut self, now: Instant) {
		if self.is_ready() {
			return;
		}
		self.poll.arm(now);
	}

	/// Makes a due load attempt. Returns true on the tick that binds the
	/// surface.
	pub fn tick(&mut self, now: Instant) -> Result<bool> {
		if self.is_ready() {
			return Ok(false);
		}
		let mut loaded = None;
		let loader = &mut self.loader;
		if !self.poll.poll(now, || {
			loaded = loader.load();
			loaded.is_some()
		}) {
			if self.poll.is_armed() {
				trace!(attempts = self.poll.attempts(), "surface.waiting");
			}
			return Ok(false);
		}
		let Some(mut window) = loaded else {
			return Ok(false);
		};

		let doc = window.document_mut();
		let (head, body) = (doc.head(), doc.body());
		doc.set_inner_html(head, &self.head_template)?;
		doc.set_inner_html(body, &self.body_template)?;
		let root = doc
			.query_class(body, &self.root_class)
			.ok_or_else(|| EditorError::MissingRoot(self.root_class.clone()))?;

		self.window = Some(window);
		self.root = Some(root);
		debug!(attempts = self.poll.attempts(), "surface.ready");
		self.queue.push_back(SurfaceEvent::Ready);
		Ok(true)
	}

	pub fn is_ready(&self) -> bool {
		self.window.is_some()
	}

	pub fn window(&self) -> Option<&Window> {
		self.window.as_ref()
	}

	pub fn window_mut(&mut self) -> Option<&mut Window> {
		self.window.as_mut()
	}

	/// The editable root the root-bound events are attached to.
	pub fn root(&self) -> Option<NodeId> {
		self.root
	}

	/// Moves the root-bound listeners to a replacement root. Listeners on the
	/// old node are abandoned with it.
	pub fn bind_root(&mut self, root: NodeId) {
		debug!(?root, "surface.bind_root");
		self.root = Some(root);
	}

	/// Forwards a native event from the nested window. Events arriving before
	/// readiness, or aimed at nodes nothing is listening on, are dropped.
	pub fn dispatch(&mut self, event: NativeEvent) -> bool {
		let (Some(window), Some(root)) = (&self.window, self.root) else {
			return false;
		};
		let doc = window.document();
		let bound = if event.kind.is_root_bound() {
			doc.contains(root, event.target)
		} else {
			doc.is_connected(event.target)
		};
		if !bound {
			trace!(kind = %event.kind, "surface.event_dropped");
			return false;
		}
		self.queue.push_back(SurfaceEvent::Native(event));
		true
	}

	pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
		self.queue.drain(..).collect()
	}

	/// Drops the window and everything bound to it.
	pub fn teardown(&mut self) {
		self.window = None;
		self.root = None;
		self.queue.clear();
	}
}
