use std::time::{Duration, Instant};

use inkstone_bridge::LoggingHost;
use inkstone_dom::Window;

use super::Editor;
use crate::config::EditorConfig;
use crate::surface::PreparedWindow;

pub(crate) fn editor_with(config: EditorConfig) -> (Editor, LoggingHost) {
	let host = LoggingHost::new();
	let editor = Editor::new(config, PreparedWindow::new(Window::default()), host.clone()).unwrap();
	(editor, host)
}

/// An editor past its ready transition. Returns the instant it became ready.
pub(crate) fn ready_editor() -> (Editor, LoggingHost, Instant) {
	let (mut editor, host) = editor_with(EditorConfig::default());
	let t0 = Instant::now();
	editor.render(t0).unwrap();
	let now = t0 + Duration::from_millis(10);
	editor.tick(now).unwrap();
	assert!(editor.state().is_ready());
	(editor, host, now)
}
