//! Content extraction, replacement, and undo-history reset.

use regex::Captures;
use tracing::info;

use super::EditorState;
use crate::error::{EditorError, Result};

/// Markup that stands for one empty paragraph.
const EMPTY_PARAGRAPH: &str = "<div><br/></div>";

/// Rewrites content on its way in or out of the editor.
pub type ContentFilter = Box<dyn Fn(String) -> String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentOptions {
	/// Skip the registered content filters.
	pub ignore_filter: bool,
}

impl ContentOptions {
	pub const RAW: Self = Self { ignore_filter: true };
}

impl EditorState {
	/// Serialized contents of the editable root, without the root itself.
	///
	/// `<img ...>` tags come out closed as `<img ... />`; tags that already
	/// end in a slash are left alone.
	pub fn get_content(&mut self, options: ContentOptions) -> Result<String> {
		let (window, root) = self.parts()?;
		let doc = window.document_mut();
		let fragment = doc.clone_contents(root)?;
		let serialized = doc.inner_html(fragment);
		doc.discard(fragment)?;

		let html = self
			.img_tag
			.replace_all(&serialized?, |caps: &Captures<'_>| {
				let open = &caps[1];
				if open.ends_with('/') { format!("{open}>") } else { format!("{open} />") }
			})
			.into_owned();

		if options.ignore_filter {
			return Ok(html);
		}
		Ok(self.get_filters.iter().fold(html, |html, filter| filter(html)))
	}

	/// Replaces the root's contents. `None` leaves them alone; an empty string
	/// or a lone line break becomes one empty paragraph.
	pub fn set_content(&mut self, html: Option<&str>, options: ContentOptions) -> Result<()> {
		let Some(html) = html else {
			return Ok(());
		};
		let html = match html {
			"" | "<br>" | "<br/>" => EMPTY_PARAGRAPH,
			other => other,
		};
		let html = if options.ignore_filter {
			html.to_owned()
		} else {
			self.set_filters.iter().fold(html.to_owned(), |html, filter| filter(html))
		};
		let (window, root) = self.parts()?;
		window.document_mut().set_inner_html(root, &html)?;
		Ok(())
	}

	/// Filter applied to [`get_content`](Self::get_content) output, after
	/// any filters added earlier.
	pub fn add_get_filter(&mut self, filter: impl Fn(String) -> String + 'static) {
		self.get_filters.push(Box::new(filter));
	}

	/// Filter applied to [`set_content`](Self::set_content) input.
	pub fn add_set_filter(&mut self, filter: impl Fn(String) -> String + 'static) {
		self.set_filters.push(Box::new(filter));
	}

	/// Clears the native undo and redo stacks by replacing the editable root
	/// with a clone: deep when `keep_content`, empty otherwise. Root-bound
	/// surface events move to the new root.
	pub fn reset_undo_history(&mut self, keep_content: bool) -> Result<()> {
		let root_class = self.config.root_class.clone();
		let (window, root) = self.parts()?;
		let doc = window.document_mut();
		let parent = doc.parent(root).ok_or(EditorError::MissingRoot(root_class))?;
		let replacement = doc.clone_node(root, keep_content)?;
		doc.replace_child(parent, replacement, root)?;
		doc.discard(root)?;
		window.sanitize_selection();

		self.surface.bind_root(replacement);
		info!(keep_content, "editor.undo_history_reset");
		Ok(())
	}
}
