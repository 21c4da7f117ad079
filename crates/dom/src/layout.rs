//! Geometry for point-to-range resolution.
//!
//! [`Layout`] is the seam where a real rendering engine plugs in.
//! [`LineLayout`] is a deterministic stand-in: every block element or `<br>`
//! starts a new line of fixed height and every character has a fixed advance.

use inkstone_primitives::{Point, Rect};

use crate::{Boundary, Document, NodeId};

/// Resolves client coordinates against a document.
pub trait Layout {
	/// Caret position under `point`, or `None` when the point hits no content.
	fn caret_from_point(&self, doc: &Document, point: Point) -> Option<Boundary>;

	/// Bounding box of the lines a node's content occupies.
	fn node_rect(&self, doc: &Document, node: NodeId) -> Option<Rect>;
}

const BLOCK_TAGS: &[&str] = &[
	"address", "article", "blockquote", "div", "dl", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "ol", "p", "pre", "section", "table", "tr", "ul",
];

const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "template"];

/// Monospace line-box layout of the document body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
	/// Top-left corner of the first line.
	pub origin: Point,
	pub line_height: f32,
	pub char_width: f32,
}

impl Default for LineLayout {
	fn default() -> Self {
		Self {
			origin: Point::new(0.0, 0.0),
			line_height: 20.0,
			char_width: 8.0,
		}
	}
}

#[derive(Debug)]
struct Segment {
	node: NodeId,
	/// Column where the segment starts.
	column: usize,
	chars: usize,
}

#[derive(Debug, Default)]
struct Line {
	segments: Vec<Segment>,
	/// Caret position for a line without text.
	anchor: Option<Boundary>,
	/// Nodes that contributed to this line.
	nodes: Vec<NodeId>,
	width: usize,
}

impl Line {
	fn is_blank(&self) -> bool {
		self.segments.is_empty() && self.nodes.is_empty()
	}
}

impl LineLayout {
	fn lines(&self, doc: &Document) -> Vec<Line> {
		let mut lines = vec![Line::default()];
		self.walk(doc, doc.body(), &mut lines);
		if lines.last().is_some_and(Line::is_blank) {
			lines.pop();
		}
		lines
	}

	fn walk(&self, doc: &Document, node: NodeId, lines: &mut Vec<Line>) {
		for &child in doc.children(node) {
			if let Some(text) = doc.text(child) {
				let chars = text.chars().count();
				if chars == 0 {
					continue;
				}
				let Some(line) = lines.last_mut() else { continue };
				line.segments.push(Segment {
					node: child,
					column: line.width,
					chars,
				});
				line.nodes.push(child);
				line.width += chars;
				continue;
			}
			let Some(tag) = doc.tag_name(child) else { continue };
			if SKIPPED_TAGS.contains(&tag) {
				continue;
			}
			if tag == "br" {
				if let Some(line) = lines.last_mut() {
					line.nodes.push(child);
					if line.segments.is_empty() && line.anchor.is_none() {
						line.anchor = doc.index_of(child).map(|i| Boundary::new(node, i));
					}
				}
				lines.push(Line::default());
			} else if BLOCK_TAGS.contains(&tag) {
				if lines.last().is_some_and(|l| !l.segments.is_empty()) {
					lines.push(Line::default());
				}
				if let Some(line) = lines.last_mut() {
					line.anchor.get_or_insert(Boundary::new(child, 0));
					line.nodes.push(child);
				}
				self.walk(doc, child, lines);
				if lines.last().is_some_and(|l| !l.segments.is_empty()) {
					lines.push(Line::default());
				}
			} else {
				if let Some(line) = lines.last_mut() {
					line.nodes.push(child);
				}
				self.walk(doc, child, lines);
			}
		}
	}

	fn line_rect(&self, index: usize, width: usize) -> Rect {
		Rect::new(
			self.origin.x,
			self.origin.y + index as f32 * self.line_height,
			width as f32 * self.char_width,
			self.line_height,
		)
	}
}

impl Layout for LineLayout {
	fn caret_from_point(&self, doc: &Document, point: Point) -> Option<Boundary> {
		if point.x < self.origin.x || point.y < self.origin.y {
			return None;
		}
		let lines = self.lines(doc);
		let index = ((point.y - self.origin.y) / self.line_height) as usize;
		let line = lines.get(index)?;

		let dx = point.x - self.origin.x;
		if line.segments.is_empty() {
			return if dx <= self.char_width { line.anchor } else { None };
		}
		if dx > line.width as f32 * self.char_width {
			return None;
		}
		let column = ((dx / self.char_width).round() as usize).min(line.width);
		line.segments
			.iter()
			.find(|seg| column <= seg.column + seg.chars)
			.map(|seg| Boundary::new(seg.node, column.saturating_sub(seg.column)))
	}

	fn node_rect(&self, doc: &Document, node: NodeId) -> Option<Rect> {
		let lines = self.lines(doc);
		let mut hit = lines
			.iter()
			.enumerate()
			.filter(|(_, line)| line.nodes.iter().any(|n| doc.contains(node, *n)));
		let (first, first_line) = hit.next()?;
		let (last, width) = hit.fold((first, first_line.width), |(_, w), (i, line)| (i, w.max(line.width)));
		let top = self.line_rect(first, width);
		Some(Rect::new(top.x, top.y, top.width, (last - first + 1) as f32 * self.line_height))
	}
}
