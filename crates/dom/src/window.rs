//! The nested browsing context: a document plus its selection, focus, and
//! layout.

use inkstone_primitives::{Point, Rect};
use rustc_hash::FxHashMap;

use crate::exec::UndoHistory;
use crate::{Document, Layout, LineLayout, NodeId, Range, RangeId, Selection};

/// A window owning one [`Document`].
///
/// The selection holds static ranges. Mutations may leave them pointing at
/// discarded nodes or past the end of shortened text, so reads go through
/// [`Window::range_at`], which filters out ranges that no longer resolve.
pub struct Window {
	document: Document,
	selection: Selection,
	layout: Box<dyn Layout>,
	focused: bool,
	pub(crate) history: FxHashMap<NodeId, UndoHistory>,
}

impl Default for Window {
	fn default() -> Self {
		Self::new(LineLayout::default())
	}
}

impl std::fmt::Debug for Window {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Window")
			.field("document", &self.document)
			.field("selection", &self.selection)
			.field("focused", &self.focused)
			.finish_non_exhaustive()
	}
}

impl Window {
	pub fn new(layout: impl Layout + 'static) -> Self {
		Self {
			document: Document::new(),
			selection: Selection::default(),
			layout: Box::new(layout),
			focused: false,
			history: FxHashMap::default(),
		}
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	pub fn document_mut(&mut self) -> &mut Document {
		&mut self.document
	}

	/// Raw selection, possibly holding stale ranges.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Number of selection ranges that still resolve.
	pub fn range_count(&self) -> usize {
		(0..self.selection.range_count()).filter(|i| self.range_at(*i).is_some()).count()
	}

	/// The `index`th selection range, if it still resolves against the tree.
	pub fn range_at(&self, index: usize) -> Option<Range> {
		self.selection.range_at(index).filter(|r| resolves(&self.document, r))
	}

	pub fn remove_all_ranges(&mut self) {
		self.selection.remove_all_ranges();
	}

	/// Adds a range to the selection. Ranges that do not resolve are ignored.
	///
	/// While the window has focus, the editing host containing the range
	/// becomes the active element, as a caret placed inside it would.
	pub fn add_range(&mut self, range: Range) -> bool {
		if !resolves(&self.document, &range) {
			return false;
		}
		self.selection.add_range(range);
		if self.focused
			&& let Some(host) = self.document.editing_host(range.start.node)
		{
			self.document.set_active_element(Some(host));
		}
		true
	}

	/// Drops selection ranges that no longer resolve.
	pub fn sanitize_selection(&mut self) {
		let doc = &self.document;
		self.selection.retain(|r| resolves(doc, r));
	}

	/// Gives the window input focus. The editing host under the selection, if
	/// any, becomes the active element.
	pub fn focus(&mut self) {
		self.focused = true;
		if let Some(range) = self.range_at(0)
			&& let Some(host) = self.document.editing_host(range.start.node)
		{
			self.document.set_active_element(Some(host));
		}
	}

	pub fn blur(&mut self) {
		self.focused = false;
		let body = self.document.body();
		self.document.set_active_element(Some(body));
	}

	pub fn has_focus(&self) -> bool {
		self.focused
	}

	/// Resolves a client point to a new collapsed live range, or `None` when
	/// the point hits no content.
	pub fn caret_range_from_point(&mut self, point: Point) -> Option<RangeId> {
		let at = self.layout.caret_from_point(&self.document, point)?;
		Some(self.document.create_range_at(Range::collapsed_at(at)))
	}

	pub fn node_rect(&self, node: NodeId) -> Option<Rect> {
		self.layout.node_rect(&self.document, node)
	}

	pub fn set_layout(&mut self, layout: impl Layout + 'static) {
		self.layout = Box::new(layout);
	}
}

fn resolves(doc: &Document, range: &Range) -> bool {
	[range.start, range.end]
		.iter()
		.all(|b| doc.is_connected(b.node) && b.offset <= doc.len(b.node))
}
