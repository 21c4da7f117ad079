use strum::{Display, EnumString};

/// Operations exposed by the native host.
///
/// The string form is the wire name. Asynchronous operations answer through
/// the one-shot event `"on" + name`.
#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostApi {
	/// Paste clipboard content as plain text.
	PasteAsText,
	/// Whether the clipboard holds usable content.
	ClipboardAvailable,
	/// The editor content changed.
	OnDocumentChange,
	/// The editing area was clicked.
	OnAreaClick,
	/// Open `url` in the system browser.
	OpenLink,
	OpenImage,
	/// Host-side paste.
	Paste,
	/// Open the find dialog.
	FindText,
	/// Open an attachment: `(resource_id, guid)`.
	OpenAttachment,
	/// Save the image at a local path to a user-chosen location.
	SaveImage,
	IsImageSavedToNote,
	/// Show the link dialog. Replies with the entered link, or null on cancel.
	ShowInsertLinkDialogAsync,
	/// Give the host window input focus.
	GetFocus,
	/// Reload the whole editor page.
	ReloadEditor,
	/// Take a screenshot: `(hide_window)`.
	SnapScreen,
	GetFeatureHighlightEnable,
	SetFeatureHighlightEnable,
	AsyncSetText,
	OnCopy,
	/// Host log sink: `(level, message)`.
	Log,
	ShowNoteCharNum,
}

impl HostApi {
	/// Name of the one-shot event that carries this operation's reply.
	pub fn reply_event(self) -> String {
		format!("on{self}")
	}
}
