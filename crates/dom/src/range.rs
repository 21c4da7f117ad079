//! Boundary points, ranges, and live range handles.

use crate::{Document, NodeId};

/// A position inside a node: a character offset for text nodes, a child
/// index otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
	pub node: NodeId,
	pub offset: usize,
}

impl Boundary {
	pub const fn new(node: NodeId, offset: usize) -> Self {
		Self { node, offset }
	}
}

/// A span between two boundary points. Collapsed when both are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
	pub start: Boundary,
	pub end: Boundary,
}

impl Range {
	pub const fn new(start: Boundary, end: Boundary) -> Self {
		Self { start, end }
	}

	pub const fn collapsed_at(at: Boundary) -> Self {
		Self { start: at, end: at }
	}

	pub fn is_collapsed(&self) -> bool {
		self.start == self.end
	}

	/// Collapses onto the start or the end boundary.
	pub fn collapse(self, to_start: bool) -> Self {
		Self::collapsed_at(if to_start { self.start } else { self.end })
	}

	/// Range around `node` within its parent. `None` for detached nodes.
	pub fn selecting_node(doc: &Document, node: NodeId) -> Option<Self> {
		let parent = doc.parent(node)?;
		let index = doc.index_of(node)?;
		Some(Self::new(Boundary::new(parent, index), Boundary::new(parent, index + 1)))
	}

	/// Range spanning all of `node`'s contents.
	pub fn selecting_contents(doc: &Document, node: NodeId) -> Self {
		Self::new(Boundary::new(node, 0), Boundary::new(node, doc.len(node)))
	}

	/// Whether both boundaries sit inside `scope` (inclusive).
	pub fn is_within(&self, doc: &Document, scope: NodeId) -> bool {
		doc.contains(scope, self.start.node) && doc.contains(scope, self.end.node)
	}

	pub(crate) fn boundaries_mut(&mut self) -> [&mut Boundary; 2] {
		[&mut self.start, &mut self.end]
	}
}

/// Handle to a range registered in a [`Document`]'s live range table.
///
/// The handle is not `Clone`: whoever holds it owns the registration and is
/// responsible for releasing it with [`Document::detach_range`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RangeId(pub(crate) usize);

impl RangeId {
	/// Compares identity without consuming either handle.
	pub fn same(&self, other: &RangeId) -> bool {
		self.0 == other.0
	}
}
