//! Arena-backed document tree.
//!
//! Nodes live in a flat arena indexed by [`NodeId`]. Slots of discarded nodes
//! are never reused, so a stale id reliably reports [`DomError::UnknownNode`]
//! instead of aliasing a newer node.
//!
//! The document also owns the live range table: every structural mutation
//! adjusts registered ranges the way DOM live ranges are adjusted, so a range
//! never points into a subtree that has left the tree.

use std::fmt;

use slab::Slab;
use smallvec::SmallVec;

use crate::error::{DomError, Result};
use crate::range::{Boundary, Range, RangeId};

/// Identifier of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Element tag and attributes. Tag names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	pub tag: String,
	pub attrs: SmallVec<[(String, String); 2]>,
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
	/// The document node at the top of the tree.
	Document,
	/// Detached container whose children move as a unit on insertion.
	Fragment,
	Element(Element),
	Text(String),
}

#[derive(Debug, Clone)]
struct Node {
	data: NodeData,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

type Arena = Vec<Option<Node>>;

/// An isolated document: `<html><head/><body/></html>` plus whatever the
/// owner builds under it.
#[derive(Debug)]
pub struct Document {
	nodes: Arena,
	root: NodeId,
	head: NodeId,
	body: NodeId,
	ranges: Slab<Range>,
	version: u64,
	active: Option<NodeId>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	pub fn new() -> Self {
		let mut doc = Self {
			nodes: Vec::new(),
			root: NodeId(0),
			head: NodeId(0),
			body: NodeId(0),
			ranges: Slab::new(),
			version: 0,
			active: None,
		};
		doc.root = doc.alloc(NodeData::Document);
		let html = doc.create_element("html");
		doc.head = doc.create_element("head");
		doc.body = doc.create_element("body");
		doc.link(doc.root, html);
		doc.link(html, doc.head);
		doc.link(html, doc.body);
		doc.active = Some(doc.body);
		doc.version = 0;
		doc
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	pub fn head(&self) -> NodeId {
		self.head
	}

	pub fn body(&self) -> NodeId {
		self.body
	}

	/// Monotonic counter bumped by every mutation.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Marks the document as mutated without changing it.
	pub fn touch(&mut self) {
		self.version += 1;
	}

	fn alloc(&mut self, data: NodeData) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Some(Node {
			data,
			parent: None,
			children: Vec::new(),
		}));
		id
	}

	/// Appends without range bookkeeping. Only for building detached trees.
	pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
		if let Some(Some(node)) = self.nodes.get_mut(child.0) {
			node.parent = Some(parent);
		}
		if let Some(Some(node)) = self.nodes.get_mut(parent.0) {
			node.children.push(child);
		}
	}

	fn slot(&self, id: NodeId) -> Result<&Node> {
		self.nodes.get(id.0).and_then(Option::as_ref).ok_or(DomError::UnknownNode(id))
	}

	fn slot_mut(&mut self, id: NodeId) -> Result<&mut Node> {
		self.nodes.get_mut(id.0).and_then(Option::as_mut).ok_or(DomError::UnknownNode(id))
	}

	pub fn create_element(&mut self, tag: &str) -> NodeId {
		self.alloc(NodeData::Element(Element {
			tag: tag.to_ascii_lowercase(),
			attrs: SmallVec::new(),
		}))
	}

	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.alloc(NodeData::Text(text.into()))
	}

	pub fn create_fragment(&mut self) -> NodeId {
		self.alloc(NodeData::Fragment)
	}

	pub fn exists(&self, id: NodeId) -> bool {
		self.slot(id).is_ok()
	}

	pub fn data(&self, id: NodeId) -> Option<&NodeData> {
		self.slot(id).ok().map(|n| &n.data)
	}

	pub fn tag_name(&self, id: NodeId) -> Option<&str> {
		match self.data(id)? {
			NodeData::Element(el) => Some(&el.tag),
			_ => None,
		}
	}

	pub fn text(&self, id: NodeId) -> Option<&str> {
		match self.data(id)? {
			NodeData::Text(text) => Some(text),
			_ => None,
		}
	}

	pub fn is_text(&self, id: NodeId) -> bool {
		matches!(self.data(id), Some(NodeData::Text(_)))
	}

	pub fn is_element(&self, id: NodeId) -> bool {
		matches!(self.data(id), Some(NodeData::Element(_)))
	}

	/// Replaces the content of a text node, clamping range offsets into it.
	pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
		let text = text.into();
		let len = text.chars().count();
		match &mut self.slot_mut(id)?.data {
			NodeData::Text(old) => *old = text,
			_ => return Err(DomError::NotText(id)),
		}
		for (_, range) in self.ranges.iter_mut() {
			for b in range.boundaries_mut() {
				if b.node == id && b.offset > len {
					b.offset = len;
				}
			}
		}
		self.version += 1;
		Ok(())
	}

	pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
		match self.data(id)? {
			NodeData::Element(el) => el.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()),
			_ => None,
		}
	}

	pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
		let NodeData::Element(el) = &mut self.slot_mut(id)?.data else {
			return Err(DomError::NotAnElement(id));
		};
		match el.attrs.iter_mut().find(|(k, _)| k == name) {
			Some((_, v)) => *v = value.to_owned(),
			None => el.attrs.push((name.to_owned(), value.to_owned())),
		}
		self.version += 1;
		Ok(())
	}

	/// Adds an attribute to a freshly built node without counting a mutation.
	pub(crate) fn push_attr(&mut self, id: NodeId, name: String, value: String) {
		if let Ok(Node {
			data: NodeData::Element(el),
			..
		}) = self.slot_mut(id)
		{
			el.attrs.push((name, value));
		}
	}

	pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<()> {
		let NodeData::Element(el) = &mut self.slot_mut(id)?.data else {
			return Err(DomError::NotAnElement(id));
		};
		el.attrs.retain(|(k, _)| k != name);
		self.version += 1;
		Ok(())
	}

	pub fn has_class(&self, id: NodeId, class: &str) -> bool {
		self.attr(id, "class").is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.slot(id).ok()?.parent
	}

	/// Children in order; empty for unknown nodes.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.slot(id).map(|n| n.children.as_slice()).unwrap_or(&[])
	}

	pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
		self.children(id).first().copied()
	}

	pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
		self.children(id).last().copied()
	}

	/// Position of the node among its parent's children.
	pub fn index_of(&self, id: NodeId) -> Option<usize> {
		let parent = self.parent(id)?;
		self.children(parent).iter().position(|c| *c == id)
	}

	/// DOM node length: characters for text, child count otherwise.
	pub fn len(&self, id: NodeId) -> usize {
		match self.data(id) {
			Some(NodeData::Text(text)) => text.chars().count(),
			Some(_) => self.children(id).len(),
			None => 0,
		}
	}

	/// Inclusive ancestry test.
	pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		contains_in(&self.nodes, ancestor, node)
	}

	/// Whether the node is reachable from the document node.
	pub fn is_connected(&self, id: NodeId) -> bool {
		self.contains(self.root, id)
	}

	/// Inclusive ancestors, nearest first.
	pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.exists(id).then_some(id), move |n| self.parent(*n))
	}

	/// Descendants in tree order, excluding `id` itself.
	pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
		let mut out = Vec::new();
		let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
		while let Some(next) = stack.pop() {
			out.push(next);
			stack.extend(self.children(next).iter().rev().copied());
		}
		out
	}

	/// First descendant element carrying `class`.
	pub fn query_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
		self.descendants(scope).into_iter().find(|n| self.has_class(*n, class))
	}

	/// Nearest inclusive ancestor element with the given tag.
	pub fn closest_tag(&self, id: NodeId, tags: &[&str]) -> Option<NodeId> {
		self.ancestors(id).find(|n| self.tag_name(*n).is_some_and(|t| tags.contains(&t)))
	}

	/// The element whose `contenteditable` makes `id` editable, if any.
	pub fn editing_host(&self, id: NodeId) -> Option<NodeId> {
		for node in self.ancestors(id) {
			match self.attr(node, "contenteditable") {
				Some("true") | Some("") => return Some(node),
				Some(_) => return None,
				None => {}
			}
		}
		None
	}

	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		let index = self.children(parent).len();
		self.insert_at(parent, child, index)
	}

	/// Inserts before `reference`, or appends when `reference` is `None`.
	pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> Result<()> {
		let index = match reference {
			Some(r) if self.parent(r) == Some(parent) => self.index_of(r).unwrap_or(0),
			Some(r) => return Err(DomError::NotAChild { parent, child: r }),
			None => self.children(parent).len(),
		};
		self.insert_at(parent, child, index)
	}

	/// Inserts `child` at `index`. Fragments contribute their children instead
	/// of themselves.
	pub fn insert_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
		if matches!(self.slot(parent)?.data, NodeData::Text(_)) || self.contains(child, parent) {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		if matches!(self.slot(child)?.data, NodeData::Document) {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		if matches!(self.slot(child)?.data, NodeData::Fragment) {
			let moved = self.slot(child)?.children.clone();
			for (i, node) in moved.into_iter().enumerate() {
				self.insert_at(parent, node, index + i)?;
			}
			return Ok(());
		}

		let mut index = index;
		if let Some(old_parent) = self.parent(child) {
			if old_parent == parent && self.index_of(child).is_some_and(|old| old < index) {
				index -= 1;
			}
			self.detach(child)?;
		}
		let siblings = &mut self.slot_mut(parent)?.children;
		let index = index.min(siblings.len());
		siblings.insert(index, child);
		self.slot_mut(child)?.parent = Some(parent);

		for (_, range) in self.ranges.iter_mut() {
			for b in range.boundaries_mut() {
				if b.node == parent && b.offset > index {
					b.offset += 1;
				}
			}
		}
		self.version += 1;
		Ok(())
	}

	pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		if self.parent(child) != Some(parent) {
			return Err(DomError::NotAChild { parent, child });
		}
		self.detach(child)
	}

	/// Swaps `old` out for `new` at the same position.
	pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> Result<()> {
		if self.parent(old) != Some(parent) {
			return Err(DomError::NotAChild { parent, child: old });
		}
		let index = self.index_of(old).unwrap_or(0);
		self.insert_at(parent, new, index)?;
		self.remove_child(parent, old)
	}

	/// Unlinks a node from its parent, moving range boundaries inside it to
	/// the parent.
	fn detach(&mut self, child: NodeId) -> Result<()> {
		let Some(parent) = self.parent(child) else {
			return Ok(());
		};
		let index = self.index_of(child).unwrap_or(0);

		let nodes = &self.nodes;
		for (_, range) in self.ranges.iter_mut() {
			for b in range.boundaries_mut() {
				if contains_in(nodes, child, b.node) {
					*b = Boundary::new(parent, index);
				} else if b.node == parent && b.offset > index {
					b.offset -= 1;
				}
			}
		}
		if self.active.is_some_and(|a| contains_in(&self.nodes, child, a)) {
			self.active = None;
		}

		self.slot_mut(parent)?.children.retain(|c| *c != child);
		self.slot_mut(child)?.parent = None;
		self.version += 1;
		Ok(())
	}

	/// Detaches every child of `id` and frees them.
	pub fn remove_children(&mut self, id: NodeId) -> Result<()> {
		let children = self.slot(id)?.children.clone();
		for child in children {
			self.discard(child)?;
		}
		Ok(())
	}

	/// Detaches a node if attached and frees its whole subtree. Ids into the
	/// subtree become unknown.
	pub fn discard(&mut self, id: NodeId) -> Result<()> {
		self.detach(id)?;
		let mut doomed = self.descendants(id);
		doomed.push(id);
		for node in doomed {
			if let Some(slot) = self.nodes.get_mut(node.0) {
				*slot = None;
			}
		}
		Ok(())
	}

	/// Copies a node into a new detached node, with its subtree when `deep`.
	pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Result<NodeId> {
		let data = self.slot(id)?.data.clone();
		let copy = self.alloc(data);
		if deep {
			let children = self.slot(id)?.children.clone();
			for child in children {
				let child_copy = self.clone_node(child, true)?;
				self.link(copy, child_copy);
			}
		}
		Ok(copy)
	}

	/// Deep copies of `id`'s children gathered into a detached fragment. The
	/// node itself is excluded.
	pub fn clone_contents(&mut self, id: NodeId) -> Result<NodeId> {
		let fragment = self.create_fragment();
		let children = self.slot(id)?.children.clone();
		for child in children {
			let copy = self.clone_node(child, true)?;
			self.link(fragment, copy);
		}
		Ok(fragment)
	}

	/// The focused element, if any.
	pub fn active_element(&self) -> Option<NodeId> {
		self.active
	}

	pub fn set_active_element(&mut self, id: Option<NodeId>) {
		self.active = id.filter(|n| self.exists(*n));
	}

	/// Registers a live range collapsed at the start of the body.
	pub fn create_range(&mut self) -> RangeId {
		let body = self.body;
		self.create_range_at(Range::collapsed_at(Boundary::new(body, 0)))
	}

	/// Registers a live range with the given boundaries.
	pub fn create_range_at(&mut self, range: Range) -> RangeId {
		RangeId(self.ranges.insert(range))
	}

	/// Current boundaries of a live range.
	pub fn range(&self, id: &RangeId) -> Option<Range> {
		self.ranges.get(id.0).copied()
	}

	/// Moves a live range. Returns false if it was detached.
	pub fn set_range(&mut self, id: &RangeId, range: Range) -> bool {
		match self.ranges.get_mut(id.0) {
			Some(slot) => {
				*slot = range;
				true
			}
			None => false,
		}
	}

	/// Releases a live range, consuming its handle.
	pub fn detach_range(&mut self, id: RangeId) -> bool {
		self.ranges.try_remove(id.0).is_some()
	}

	pub fn live_range_count(&self) -> usize {
		self.ranges.len()
	}
}

fn contains_in(nodes: &Arena, ancestor: NodeId, node: NodeId) -> bool {
	let mut current = Some(node);
	while let Some(id) = current {
		if id == ancestor {
			return true;
		}
		current = nodes.get(id.0).and_then(Option::as_ref).and_then(|n| n.parent);
	}
	false
}
