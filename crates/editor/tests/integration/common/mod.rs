//! Common utilities for editor integration tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use inkstone_bridge::LoggingHost;
use inkstone_dom::{NodeId, Window};
use inkstone_editor::{Editor, EditorConfig, PreparedWindow};
use serde_json::Value;

pub const MS: Duration = Duration::from_millis(1);

/// Builds an editor and drives it through its ready transition. Returns the
/// instant it became ready.
pub fn ready_editor_with(config: EditorConfig) -> (Editor, LoggingHost, Instant) {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let host = LoggingHost::new();
	let mut editor = Editor::new(config, PreparedWindow::new(Window::default()), host.clone()).unwrap();
	let t0 = Instant::now();
	editor.render(t0).unwrap();
	let now = t0 + 10 * MS;
	editor.tick(now).unwrap();
	assert!(editor.state().is_ready());
	(editor, host, now)
}

pub fn ready_editor() -> (Editor, LoggingHost, Instant) {
	ready_editor_with(EditorConfig::default())
}

/// Registers `name` as a command answering `reply` and counting its calls.
pub fn counting_command(editor: &mut Editor, name: &str, reply: Value) -> Rc<Cell<usize>> {
	let calls = Rc::new(Cell::new(0));
	let counter = calls.clone();
	editor.add_command(name, move |_, _, _| {
		counter.set(counter.get() + 1);
		Some(reply.clone())
	});
	calls
}

pub fn root(editor: &Editor) -> NodeId {
	editor.state().root().unwrap()
}
