//! Native editing primitives (`execCommand` and `queryCommandState`).
//!
//! Every command acts on the first selection range and only inside an
//! editing host. Commands that mutate content snapshot the host's markup
//! first; `undo`/`redo` walk those snapshots. History is keyed by the host
//! node, so a host that is replaced by a clone starts with no history.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::Result;
use crate::{Boundary, Document, NodeId, Range, Window};

/// Snapshots of one editing host's markup.
#[derive(Debug, Default)]
pub(crate) struct UndoHistory {
	undo: Vec<String>,
	redo: Vec<String>,
}

/// Inline formatting commands and the tags that satisfy them.
const INLINE_STYLES: &[(&str, &str, &[&str])] = &[
	("bold", "b", &["b", "strong"]),
	("italic", "i", &["i", "em"]),
	("underline", "u", &["u"]),
];

fn inline_style(name: &str) -> Option<(&'static str, &'static [&'static str])> {
	INLINE_STYLES
		.iter()
		.find(|(cmd, ..)| cmd.eq_ignore_ascii_case(name))
		.map(|(_, tag, matches)| (*tag, *matches))
}

impl Window {
	/// Runs a native editing command. Returns whether it was carried out.
	pub fn exec_command(&mut self, name: &str, value: Option<&str>) -> bool {
		let Some(range) = self.range_at(0) else {
			debug!(command = name, "exec.no_selection");
			return false;
		};
		let Some(host) = self.document().editing_host(range.start.node) else {
			debug!(command = name, "exec.not_editable");
			return false;
		};
		if !range.is_within(self.document(), host) {
			return false;
		}

		let outcome = match name.to_ascii_lowercase().as_str() {
			"undo" => return self.step_history(host, true),
			"redo" => return self.step_history(host, false),
			"selectall" => {
				let contents = Range::selecting_contents(self.document(), host);
				self.select(contents);
				return true;
			}
			"inserttext" => {
				self.record(host);
				self.insert_text(range, value.unwrap_or_default())
			}
			"inserthtml" => {
				self.record(host);
				self.insert_html(range, value.unwrap_or_default())
			}
			"delete" => {
				self.record(host);
				self.delete(range)
			}
			other => match inline_style(other) {
				Some((tag, matches)) if !range.is_collapsed() => {
					self.record(host);
					self.toggle_inline(range, host, tag, matches)
				}
				_ => {
					debug!(command = name, "exec.unsupported");
					return false;
				}
			},
		};

		match outcome {
			Ok(Some(caret)) => {
				self.select(caret);
				true
			}
			Ok(None) => {
				self.discard_record(host);
				false
			}
			Err(err) => {
				debug!(command = name, %err, "exec.failed");
				self.discard_record(host);
				false
			}
		}
	}

	/// Whether an inline style applies at the start of the selection.
	pub fn query_command_state(&self, name: &str) -> bool {
		let Some((_, matches)) = inline_style(name) else {
			return false;
		};
		let Some(range) = self.range_at(0) else {
			return false;
		};
		let doc = self.document();
		let Some(host) = doc.editing_host(range.start.node) else {
			return false;
		};
		doc.closest_tag(range.start.node, matches).is_some_and(|n| n != host && doc.contains(host, n))
	}

	/// Whether `host` has anything to undo.
	pub fn has_undo(&self, host: NodeId) -> bool {
		self.history.get(&host).is_some_and(|h| !h.undo.is_empty())
	}

	pub fn has_redo(&self, host: NodeId) -> bool {
		self.history.get(&host).is_some_and(|h| !h.redo.is_empty())
	}

	fn select(&mut self, range: Range) {
		self.remove_all_ranges();
		self.add_range(range);
	}

	fn record(&mut self, host: NodeId) {
		let Ok(snapshot) = self.document().inner_html(host) else {
			return;
		};
		let doc = self.document();
		let live: Vec<NodeId> = self.history.keys().copied().filter(|id| doc.exists(*id)).collect();
		self.history.retain(|id, _| live.contains(id));

		let history = self.history.entry(host).or_default();
		history.undo.push(snapshot);
		history.redo.clear();
	}

	fn discard_record(&mut self, host: NodeId) {
		if let Some(history) = self.history.get_mut(&host) {
			history.undo.pop();
		}
	}

	fn step_history(&mut self, host: NodeId, undo: bool) -> bool {
		let Ok(current) = self.document().inner_html(host) else {
			return false;
		};
		let Some(history) = self.history.get_mut(&host) else {
			return false;
		};
		let (from, to) = if undo {
			(&mut history.undo, &mut history.redo)
		} else {
			(&mut history.redo, &mut history.undo)
		};
		let Some(snapshot) = from.pop() else {
			return false;
		};
		to.push(current);

		if self.document_mut().set_inner_html(host, &snapshot).is_err() {
			return false;
		}
		let len = self.document().len(host);
		self.select(Range::collapsed_at(Boundary::new(host, len)));
		true
	}

	fn insert_text(&mut self, range: Range, text: &str) -> Result<Option<Range>> {
		let at = self.delete_contents(range)?;
		let doc = self.document_mut();
		if doc.is_text(at.node) {
			let current = doc.text(at.node).unwrap_or_default();
			let byte = byte_offset(current, at.offset);
			let mut updated = current.to_owned();
			updated.insert_str(byte, text);
			doc.set_text(at.node, updated)?;
			return Ok(Some(Range::collapsed_at(Boundary::new(at.node, at.offset + text.chars().count()))));
		}
		let node = doc.create_text(text);
		doc.insert_at(at.node, node, at.offset)?;
		Ok(Some(Range::collapsed_at(Boundary::new(node, text.chars().count()))))
	}

	fn insert_html(&mut self, range: Range, html: &str) -> Result<Option<Range>> {
		let at = self.delete_contents(range)?;
		let doc = self.document_mut();
		let (parent, index) = split_at(doc, at)?;
		let fragment = doc.parse_fragment(html);
		let count = doc.children(fragment).len();
		doc.insert_at(parent, fragment, index)?;
		doc.discard(fragment)?;
		Ok(Some(Range::collapsed_at(Boundary::new(parent, index + count))))
	}

	fn delete(&mut self, range: Range) -> Result<Option<Range>> {
		if !range.is_collapsed() {
			let at = self.delete_contents(range)?;
			return Ok(Some(Range::collapsed_at(at)));
		}
		let at = range.start;
		let doc = self.document_mut();
		if let Some(text) = doc.text(at.node) {
			if at.offset == 0 {
				return Ok(None);
			}
			let mut updated = text.to_owned();
			updated.replace_range(byte_offset(text, at.offset - 1)..byte_offset(text, at.offset), "");
			doc.set_text(at.node, updated)?;
			return Ok(Some(Range::collapsed_at(Boundary::new(at.node, at.offset - 1))));
		}
		if at.offset == 0 {
			return Ok(None);
		}
		let Some(&previous) = doc.children(at.node).get(at.offset - 1) else {
			return Ok(None);
		};
		if let Some(text) = doc.text(previous)
			&& !text.is_empty()
		{
			let mut updated = text.to_owned();
			updated.pop();
			let len = updated.chars().count();
			doc.set_text(previous, updated)?;
			return Ok(Some(Range::collapsed_at(Boundary::new(previous, len))));
		}
		doc.discard(previous)?;
		Ok(Some(Range::collapsed_at(Boundary::new(at.node, at.offset - 1))))
	}

	/// Removes everything between the range's boundaries and returns the
	/// collapsed insertion point.
	fn delete_contents(&mut self, range: Range) -> Result<Boundary> {
		let doc = self.document_mut();
		let (start, mut end) = (range.start, range.end);
		if start.node == end.node {
			end.offset = end.offset.clamp(start.offset, doc.len(end.node));
		}
		if range.is_collapsed() {
			return Ok(start);
		}

		if start.node == end.node {
			if let Some(text) = doc.text(start.node) {
				let mut updated = text.to_owned();
				updated.replace_range(byte_offset(text, start.offset)..byte_offset(text, end.offset), "");
				doc.set_text(start.node, updated)?;
			} else {
				let doomed: Vec<NodeId> = doc.children(start.node)[start.offset..end.offset].to_vec();
				for node in doomed {
					doc.discard(node)?;
				}
			}
			return Ok(start);
		}

		let Some(common) = doc.ancestors(start.node).find(|a| doc.contains(*a, end.node)) else {
			return Ok(start);
		};
		let (start_path, end_path) = (path_of(doc, start), path_of(doc, end));
		let mut doomed: Vec<NodeId> = Vec::new();
		for node in doc.descendants(common) {
			if doomed.iter().any(|d| doc.contains(*d, node)) {
				continue;
			}
			let (Some(parent), Some(index)) = (doc.parent(node), doc.index_of(node)) else {
				continue;
			};
			let before = path_of(doc, Boundary::new(parent, index));
			let after = path_of(doc, Boundary::new(parent, index + 1));
			if before.cmp(&start_path) != Ordering::Less && after.cmp(&end_path) != Ordering::Greater {
				doomed.push(node);
			}
		}

		if let Some(text) = doc.text(start.node) {
			let kept: String = text.chars().take(start.offset).collect();
			doc.set_text(start.node, kept)?;
		}
		if let Some(text) = doc.text(end.node) {
			let kept: String = text.chars().skip(end.offset).collect();
			doc.set_text(end.node, kept)?;
		}
		for node in doomed {
			doc.discard(node)?;
		}
		Ok(start)
	}

	/// Wraps or unwraps a range inside a single text node.
	fn toggle_inline(&mut self, range: Range, host: NodeId, tag: &str, matches: &[&str]) -> Result<Option<Range>> {
		let doc = self.document_mut();
		let node = range.start.node;

		if let Some(styled) = doc
			.closest_tag(node, matches)
			.filter(|n| *n != host && doc.contains(host, *n) && doc.contains(*n, range.end.node))
		{
			let Some(parent) = doc.parent(styled) else {
				return Ok(None);
			};
			let index = doc.index_of(styled).unwrap_or(0);
			let children = doc.children(styled).to_vec();
			let count = children.len();
			for (i, child) in children.into_iter().enumerate() {
				doc.insert_at(parent, child, index + i)?;
			}
			doc.discard(styled)?;
			return Ok(Some(Range::new(Boundary::new(parent, index), Boundary::new(parent, index + count))));
		}

		if node != range.end.node || !doc.is_text(node) {
			debug!(tag, "exec.inline_spans_nodes");
			return Ok(None);
		}

		let (start, end) = (range.start.offset.min(range.end.offset), range.start.offset.max(range.end.offset));
		let tail_at = Boundary::new(node, end);
		split_at(doc, tail_at)?;
		let (parent, index) = split_at(doc, Boundary::new(node, start))?;
		let Some(&middle) = doc.children(parent).get(index) else {
			return Ok(None);
		};
		let wrapper = doc.create_element(tag);
		doc.insert_at(parent, wrapper, index)?;
		doc.append_child(wrapper, middle)?;
		Ok(Some(Range::selecting_contents(doc, wrapper)))
	}
}

/// Splits a text node at the boundary so that content can be inserted between
/// the halves. Returns the `(parent, index)` insertion point.
fn split_at(doc: &mut Document, at: Boundary) -> Result<(NodeId, usize)> {
	let Some(text) = doc.text(at.node) else {
		return Ok((at.node, at.offset));
	};
	let parent = doc.parent(at.node).ok_or(crate::DomError::UnknownNode(at.node))?;
	let index = doc.index_of(at.node).unwrap_or(0);
	let len = text.chars().count();
	if at.offset == 0 {
		return Ok((parent, index));
	}
	if at.offset >= len {
		return Ok((parent, index + 1));
	}
	let byte = byte_offset(text, at.offset);
	let (head, tail) = (text[..byte].to_owned(), text[byte..].to_owned());
	doc.set_text(at.node, head)?;
	let rest = doc.create_text(tail);
	doc.insert_at(parent, rest, index + 1)?;
	Ok((parent, index + 1))
}

fn byte_offset(text: &str, chars: usize) -> usize {
	text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Tree-order key of a boundary: child indices from the root, then the offset.
fn path_of(doc: &Document, at: Boundary) -> Vec<usize> {
	let mut path: Vec<usize> = doc.ancestors(at.node).filter_map(|n| doc.index_of(n)).collect();
	path.reverse();
	path.push(at.offset);
	path
}
