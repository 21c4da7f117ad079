//! Markup parsing and serialization on the html5ever stack.
//!
//! Fragments are parsed in a `<body>` context with the HTML5 tree builder,
//! then copied into the node arena. Comments, doctypes and template contents
//! are dropped; adjacent text is merged. Serialization walks the arena
//! through html5ever's serializer, so void elements come out without a
//! trailing slash, as browser `innerHTML` does.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData as ParsedData, RcDom};

use crate::error::{DomError, Result};
use crate::node::{Document, NodeData, NodeId};

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

fn html_name(local: &str) -> QualName {
	QualName::new(None, Namespace::from(HTML_NS), LocalName::from(local))
}

fn attr_name(local: &str) -> QualName {
	QualName::new(None, Namespace::from(""), LocalName::from(local))
}

impl Document {
	/// Parses markup into a new detached fragment.
	pub fn parse_fragment(&mut self, html: &str) -> NodeId {
		let parsed = parse_fragment(RcDom::default(), ParseOpts::default(), html_name("body"), Vec::new()).one(html);
		let fragment = self.create_fragment();
		// The tree builder wraps fragment content in a synthetic <html> root.
		let root = parsed.document.children.borrow().first().cloned();
		if let Some(root) = root {
			self.import_children(&root, fragment);
		}
		fragment
	}

	fn import_children(&mut self, from: &Handle, parent: NodeId) {
		let mut text = String::new();
		for child in from.children.borrow().iter() {
			match &child.data {
				ParsedData::Text { contents } => text.push_str(&contents.borrow()),
				ParsedData::Element { name, attrs, .. } => {
					self.flush_text(&mut text, parent);
					let el = self.create_element(&name.local);
					for attr in attrs.borrow().iter() {
						self.push_attr(el, attr.name.local.to_string(), attr.value.to_string());
					}
					self.link(parent, el);
					self.import_children(child, el);
				}
				_ => {}
			}
		}
		self.flush_text(&mut text, parent);
	}

	fn flush_text(&mut self, text: &mut String, parent: NodeId) {
		if text.is_empty() {
			return;
		}
		let node = self.create_text(std::mem::take(text));
		self.link(parent, node);
	}

	/// Serialized children of `id`.
	pub fn inner_html(&self, id: NodeId) -> Result<String> {
		self.serialize_subtree(id, TraversalScope::ChildrenOnly(None))
	}

	/// Serialized node including its own tag.
	pub fn outer_html(&self, id: NodeId) -> Result<String> {
		self.serialize_subtree(id, TraversalScope::IncludeNode)
	}

	fn serialize_subtree(&self, id: NodeId, scope: TraversalScope) -> Result<String> {
		if !self.exists(id) {
			return Err(DomError::UnknownNode(id));
		}
		let mut out = Vec::new();
		let opts = SerializeOpts {
			traversal_scope: scope,
			..SerializeOpts::default()
		};
		serialize(&mut out, &Subtree { doc: self, id }, opts).map_err(|err| DomError::Serialize(err.to_string()))?;
		String::from_utf8(out).map_err(|err| DomError::Serialize(err.to_string()))
	}

	/// Replaces the children of `id` with parsed markup.
	pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<()> {
		match self.data(id) {
			None => return Err(DomError::UnknownNode(id)),
			Some(NodeData::Text(_)) => return Err(DomError::NotAnElement(id)),
			Some(_) => {}
		}
		self.remove_children(id)?;
		self.append_html(id, html)
	}

	/// Parses markup and appends it after the last child of `id`.
	pub fn append_html(&mut self, id: NodeId, html: &str) -> Result<()> {
		let fragment = self.parse_fragment(html);
		self.append_child(id, fragment)?;
		self.discard(fragment)
	}

	fn write_node<S: Serializer>(&self, id: NodeId, serializer: &mut S) -> io::Result<()> {
		match self.data(id) {
			Some(NodeData::Text(text)) => serializer.write_text(text),
			Some(NodeData::Element(el)) => {
				let name = html_name(&el.tag);
				let attrs: Vec<(QualName, &str)> = el.attrs.iter().map(|(key, value)| (attr_name(key), value.as_str())).collect();
				serializer.start_elem(name.clone(), attrs.iter().map(|(key, value)| (key, *value)))?;
				self.write_children(id, serializer)?;
				serializer.end_elem(name)
			}
			Some(NodeData::Document | NodeData::Fragment) => self.write_children(id, serializer),
			None => Ok(()),
		}
	}

	fn write_children<S: Serializer>(&self, id: NodeId, serializer: &mut S) -> io::Result<()> {
		for child in self.children(id) {
			self.write_node(*child, serializer)?;
		}
		Ok(())
	}
}

/// A node of the arena as seen by the html5ever serializer.
struct Subtree<'a> {
	doc: &'a Document,
	id: NodeId,
}

impl Serialize for Subtree<'_> {
	fn serialize<S: Serializer>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()> {
		match traversal_scope {
			TraversalScope::IncludeNode => self.doc.write_node(self.id, serializer),
			TraversalScope::ChildrenOnly(_) => self.doc.write_children(self.id, serializer),
		}
	}
}
