//! Selection and focus management.

use inkstone_dom::{DomError, NodeId, Range, RangeId, Window};
use inkstone_primitives::{Point, Rect};
use tracing::{debug, trace};

use super::EditorState;
use super::state::surface_parts;
use crate::error::{EditorError, Result};

/// Markup inserted when focus lands in an empty root.
const EMPTY_LINE: &str = "<div><br/></div>";

/// How `select_node` and `select_node_contents` shape the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectOptions {
	pub collapsed: bool,
	/// With `collapsed`, keep the start rather than the end.
	pub collapse_to_start: bool,
}

impl SelectOptions {
	/// A caret at the end of the selected span.
	pub const CARET_AT_END: Self = Self {
		collapsed: true,
		collapse_to_start: false,
	};
}

impl EditorState {
	/// Makes `range` the current range and the window selection. The previous
	/// current range is released first unless it is the same registration.
	pub fn select_range(&mut self, range: RangeId) -> Result<()> {
		let (window, _) = surface_parts(self.phase, &mut self.surface)?;
		if let Some(old) = self.range.take() {
			if old.same(&range) {
				trace!("editor.reselect");
			} else {
				window.document_mut().detach_range(old);
			}
		}
		let bounds = window.document().range(&range);
		window.remove_all_ranges();
		if let Some(bounds) = bounds
			&& window.add_range(bounds)
		{
			self.last_selection = Some(bounds);
		}
		self.range = Some(range);
		Ok(())
	}

	/// Moves the current range to `bounds` and selects it.
	fn select_bounds(&mut self, bounds: Range) -> Result<()> {
		let (window, _) = surface_parts(self.phase, &mut self.surface)?;
		let doc = window.document_mut();
		let id = match self.range.take() {
			Some(id) if doc.set_range(&id, bounds) => id,
			Some(stale) => {
				doc.detach_range(stale);
				doc.create_range_at(bounds)
			}
			None => doc.create_range_at(bounds),
		};
		self.select_range(id)
	}

	/// Places the caret at a client point. Returns false, leaving the current
	/// range untouched, when the point hits no content.
	pub fn select_position(&mut self, point: Point) -> Result<bool> {
		let (window, _) = self.parts()?;
		let Some(id) = window.caret_range_from_point(point) else {
			trace!(x = point.x, y = point.y, "editor.select_position_miss");
			return Ok(false);
		};
		self.select_range(id)?;
		Ok(true)
	}

	/// Retries [`select_position`](Self::select_position) at x positions
	/// stepping from the point toward 0, then once more along a line slightly
	/// lower. Tolerates clicks just past the end of a line.
	pub fn select_nearby(&mut self, point: Point) -> Result<bool> {
		if self.select_row(point.x, point.y)? {
			return Ok(true);
		}
		let y = point.y + self.config.nearby_vertical_offset;
		self.select_row(point.x, y)
	}

	fn select_row(&mut self, max_x: f32, y: f32) -> Result<bool> {
		let steps = self.config.nearby_steps;
		for counter in (1..=steps).rev() {
			let x = max_x * counter as f32 / steps as f32;
			if self.select_position(Point::new(x, y))? {
				return Ok(true);
			}
		}
		Ok(false)
	}

	/// Selects `node` itself within its parent.
	pub fn select_node(&mut self, node: NodeId, options: SelectOptions) -> Result<()> {
		let (window, _) = self.parts()?;
		let bounds = Range::selecting_node(window.document(), node).ok_or(DomError::UnknownNode(node))?;
		self.select_bounds(shape(bounds, options))
	}

	/// Selects everything inside `node`.
	pub fn select_node_contents(&mut self, node: NodeId, options: SelectOptions) -> Result<()> {
		let (window, _) = self.parts()?;
		if !window.document().exists(node) {
			return Err(DomError::UnknownNode(node).into());
		}
		let bounds = Range::selecting_contents(window.document(), node);
		self.select_bounds(shape(bounds, options))
	}

	/// The window selection's first range, unless there is none or it starts
	/// at the body (nothing inside the surface content is selected).
	pub fn get_range(&self) -> Option<Range> {
		let window = self.window()?;
		let range = window.range_at(0)?;
		(range.start.node != window.document().body()).then_some(range)
	}

	/// Bounds of the current live range.
	pub fn current_range(&self) -> Option<Range> {
		let id = self.range.as_ref()?;
		self.window()?.document().range(id)
	}

	pub fn last_selection(&self) -> Option<Range> {
		self.last_selection
	}

	/// Puts input focus in the editable root.
	///
	/// Does nothing in read-only mode or when focus is already inside the
	/// root. Otherwise tries, in order: the caret near `point`, the last known
	/// selection, then the end of the last line, adding an empty line to an
	/// empty root.
	pub fn focus_article(&mut self, point: Option<Point>) -> Result<()> {
		if self.read_only {
			return Ok(());
		}
		let (window, root) = self.parts()?;
		let focused = window.has_focus() && window.document().active_element() == Some(root);
		if !focused {
			window.focus();
			if let Some(point) = point
				&& self.select_nearby(point)?
			{
				return Ok(());
			}
		}
		if self.get_range().is_some() {
			return Ok(());
		}

		if let Some(last) = self.last_selection {
			let (window, _) = self.parts()?;
			window.focus();
			debug!("editor.restore_selection");
			let id = window.document_mut().create_range_at(last);
			self.select_range(id)?;
		}
		if self.get_range().is_some() {
			return Ok(());
		}

		if let Some(point) = point {
			let (window, _) = self.parts()?;
			window.focus();
			if self.select_nearby(point)? {
				return Ok(());
			}
		}
		let (window, root) = self.parts()?;
		let doc = window.document_mut();
		if doc.last_child(root).is_none() {
			doc.append_html(root, EMPTY_LINE)?;
		}
		let Some(child) = doc.last_child(root) else {
			return Ok(());
		};
		if doc.first_child(child).is_some() {
			self.select_node_contents(child, SelectOptions::CARET_AT_END)
		} else {
			self.select_node(child, SelectOptions::CARET_AT_END)
		}
	}

	/// Places the caret on the root's last line, as close to `point`'s x as
	/// possible. Returns whether a caret was placed.
	pub fn focus_article_last_line(&mut self, point: Option<Point>) -> Result<bool> {
		let (window, root) = self.parts()?;
		let Some(rect) = window.node_rect(root) else {
			return Ok(false);
		};
		let x = point.map_or(0.0, |p| p.x);
		self.select_position(Point::new(x, rect.bottom() - 1.0))
	}

	/// Tells the editor where the surface's viewport sits on the host page.
	/// Page coordinates returned by [`offset_in_article`](Self::offset_in_article)
	/// and [`article_visible_rect`](Self::article_visible_rect) are relative
	/// to the same origin.
	pub fn set_frame_origin(&mut self, origin: Point) {
		self.frame_origin = origin;
	}

	pub fn frame_origin(&self) -> Point {
		self.frame_origin
	}

	/// Top-left corner of `node` in page coordinates, for placing host popups
	/// over it. `None` when the node is not laid out.
	pub fn offset_in_article(&self, node: NodeId) -> Result<Option<Point>> {
		let (window, _) = self.laid_out()?;
		Ok(window
			.node_rect(node)
			.map(|rect| Point::new(rect.x + self.frame_origin.x, rect.y + self.frame_origin.y)))
	}

	/// The editable root's box in page coordinates.
	pub fn article_visible_rect(&self) -> Result<Option<Rect>> {
		let (window, root) = self.laid_out()?;
		Ok(window
			.node_rect(root)
			.map(|rect| Rect::new(rect.x + self.frame_origin.x, rect.y + self.frame_origin.y, rect.width, rect.height)))
	}

	fn laid_out(&self) -> Result<(&Window, NodeId)> {
		self.ensure_ready()?;
		match (self.window(), self.root()) {
			(Some(window), Some(root)) => Ok((window, root)),
			_ => Err(EditorError::NotReady),
		}
	}
}

fn shape(range: Range, options: SelectOptions) -> Range {
	if options.collapsed {
		range.collapse(options.collapse_to_start)
	} else {
		range
	}
}
