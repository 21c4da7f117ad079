use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use inkstone_bridge::{HostApi, LoggingHost};
use inkstone_dom::{Boundary, NodeId, Window};
use inkstone_primitives::{Command, Point, Rect};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use super::test_support::{editor_with, ready_editor};
use super::*;
use crate::toolbar::builtin;

const MS: Duration = Duration::from_millis(1);

fn root(editor: &Editor) -> NodeId {
	editor.state().root().unwrap()
}

/// First text node under the root's `index`th child.
fn text_in(editor: &Editor, index: usize) -> NodeId {
	let doc = editor.state().window().unwrap().document();
	let block = doc.children(root(editor))[index];
	doc.first_child(block).unwrap()
}

fn live_ranges(editor: &Editor) -> usize {
	editor.state().window().unwrap().document().live_range_count()
}

fn record_events(editor: &mut Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	editor.subscribe(move |e| sink.borrow_mut().push(e.clone()));
	seen
}

#[test]
fn operations_before_ready_fail() {
	let (mut editor, _) = editor_with(EditorConfig::default());
	assert_eq!(editor.phase(), Phase::Constructing);
	assert!(matches!(editor.state_mut().get_content(ContentOptions::default()), Err(EditorError::NotReady)));
	assert!(matches!(editor.set_read_only(true), Err(EditorError::NotReady)));

	editor.render(Instant::now()).unwrap();
	assert_eq!(editor.phase(), Phase::SurfaceBinding);
	assert!(matches!(editor.state_mut().select_position(Point::new(0.0, 0.0)), Err(EditorError::NotReady)));
}

#[test]
fn ready_transition_prepares_the_root() {
	let (mut editor, _) = editor_with(EditorConfig::default());
	let order = Rc::new(RefCell::new(Vec::new()));
	for tag in ["first", "second"] {
		let order = order.clone();
		editor.ready(move |ed| order.borrow_mut().push((tag, ed.phase())));
	}
	let events = record_events(&mut editor);

	let t0 = Instant::now();
	editor.render(t0).unwrap();
	editor.tick(t0 + 10 * MS).unwrap();

	assert_eq!(*order.borrow(), vec![("first", Phase::Ready), ("second", Phase::Ready)]);
	assert_eq!(*events.borrow(), vec![EditorEvent::ReadOnlyChanged(false), EditorEvent::Ready]);

	let state = editor.state_mut();
	assert!(state.bridge_mut().is_ready());
	assert!(state.is_monitoring());
	let root = state.root().unwrap();
	let window = state.window().unwrap();
	assert_eq!(window.document().attr(root, "contenteditable"), Some("true"));
	assert_eq!(window.document().active_element(), Some(root));
	assert_eq!(state.get_content(ContentOptions::default()).unwrap(), "<div><br></div>");
	assert!(state.get_range().is_some());
}

#[test]
fn ready_callback_after_ready_runs_immediately() {
	let (mut editor, _, _) = ready_editor();
	let ran = Rc::new(RefCell::new(false));
	let flag = ran.clone();
	editor.ready(move |_| *flag.borrow_mut() = true);
	assert!(*ran.borrow());
}

#[test]
fn surface_binding_waits_for_the_window() {
	let attempts = Rc::new(RefCell::new(0));
	let counter = attempts.clone();
	let loader = move || {
		*counter.borrow_mut() += 1;
		(*counter.borrow() >= 3).then(Window::default)
	};
	let mut editor = Editor::new(EditorConfig::default(), loader, LoggingHost::new()).unwrap();
	let t0 = Instant::now();
	editor.render(t0).unwrap();
	for step in 1..=2 {
		editor.tick(t0 + step * 10 * MS).unwrap();
		assert_eq!(editor.phase(), Phase::SurfaceBinding);
	}
	editor.tick(t0 + 30 * MS).unwrap();
	assert_eq!(editor.phase(), Phase::Ready);
	assert_eq!(*attempts.borrow(), 3);
}

#[test]
fn destroy_tears_down() {
	let (mut editor, _, now) = ready_editor();
	editor.destroy();
	assert_eq!(editor.phase(), Phase::TornDown);
	assert!(matches!(editor.state_mut().get_content(ContentOptions::default()), Err(EditorError::TornDown)));
	assert!(matches!(editor.render(now), Err(EditorError::TornDown)));
	assert!(editor.tick(now + 100 * MS).is_ok());
}

#[test]
fn command_reply_reaches_callback() {
	let (mut editor, _, _) = ready_editor();
	editor.add_command("echo, shout", |_, name, value| Some(json!({ "name": name, "value": value.cloned() })));

	let seen = Rc::new(RefCell::new(None));
	let sink = seen.clone();
	let reply = editor.command(Command::new("shout").with_value(1).with_callback(move |r| *sink.borrow_mut() = r.cloned()));
	let expected = json!({ "name": "shout", "value": 1 });
	assert_eq!(reply, Some(expected.clone()));
	assert_eq!(*seen.borrow(), Some(expected));
}

#[test]
fn read_only_gates_commands_without_callback() {
	let (mut editor, _, _) = ready_editor();
	let ran = Rc::new(RefCell::new(0));
	let counter = ran.clone();
	editor.add_command("count", move |_, _, _| {
		*counter.borrow_mut() += 1;
		Some(Value::Null)
	});
	editor.set_read_only(true).unwrap();

	let called = Rc::new(RefCell::new(false));
	let flag = called.clone();
	assert_eq!(editor.command(Command::new("count").with_callback(move |_| *flag.borrow_mut() = true)), None);
	assert_eq!(*ran.borrow(), 0);
	assert!(!*called.borrow());
}

#[test]
fn missing_handler_alerts_only_in_dev_mode() {
	let (mut editor, host, _) = ready_editor();
	assert_eq!(editor.command(Command::new("nope")), None);
	assert!(host.alerts().is_empty());

	let config = EditorConfig {
		dev_mode: true,
		..EditorConfig::default()
	};
	let (mut editor, host) = editor_with(config);
	let called = Rc::new(RefCell::new(None));
	let sink = called.clone();
	editor.command(Command::new("nope").with_callback(move |r| *sink.borrow_mut() = Some(r.cloned())));
	assert_eq!(host.alerts(), vec!["no handler registered for command nope".to_owned()]);
	assert_eq!(*called.borrow(), Some(None));
}

#[test]
fn native_command_accepts_both_value_forms() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div>"), ContentOptions::default()).unwrap();
	let text = text_in(&editor, 0);
	editor.state_mut().select_position(Point::new(40.0, 5.0)).unwrap();
	assert_eq!(editor.state().get_range().map(|r| r.start), Some(Boundary::new(text, 5)));

	let reply = editor.command(Command::new("nativeCommand").with_value(json!({ "name": "insertText", "value": "!" })));
	assert_eq!(reply, Some(json!(true)));
	let reply = editor.command(Command::new("nativeCommand").with_value("selectAll"));
	assert_eq!(reply, Some(json!(true)));
	assert_eq!(editor.state_mut().get_content(ContentOptions::default()).unwrap(), "<div>hello!</div>");
	assert_eq!(editor.command(Command::new("nativeCommand").with_value(3)), None);
}

#[test]
fn select_range_holds_one_live_range() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div><div>world</div>"), ContentOptions::default()).unwrap();
	assert_eq!(live_ranges(&editor), 1);

	for point in [Point::new(16.0, 5.0), Point::new(8.0, 25.0), Point::new(0.0, 5.0)] {
		assert!(editor.state_mut().select_position(point).unwrap());
		assert_eq!(live_ranges(&editor), 1);
	}
	let text = text_in(&editor, 0);
	assert_eq!(editor.state().current_range().map(|r| r.start), Some(Boundary::new(text, 0)));
}

#[test]
fn select_position_miss_keeps_range() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div>"), ContentOptions::default()).unwrap();
	editor.state_mut().select_position(Point::new(16.0, 5.0)).unwrap();
	let before = editor.state().current_range();

	assert!(!editor.state_mut().select_position(Point::new(500.0, 5.0)).unwrap());
	assert!(!editor.state_mut().select_position(Point::new(8.0, 300.0)).unwrap());
	assert_eq!(editor.state().current_range(), before);
	assert_eq!(live_ranges(&editor), 1);
}

#[test]
fn select_nearby_steps_toward_the_line() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div><div>world</div>"), ContentOptions::default()).unwrap();

	// 80, 64, and 48 are past "hello"; 32 lands on column 4.
	assert!(editor.state_mut().select_nearby(Point::new(80.0, 5.0)).unwrap());
	let hello = text_in(&editor, 0);
	assert_eq!(editor.state().get_range().map(|r| r.start), Some(Boundary::new(hello, 4)));

	// Above the first line, only the lower retry hits.
	assert!(editor.state_mut().select_nearby(Point::new(10.0, -3.0)).unwrap());
	assert_eq!(editor.state().get_range().map(|r| r.start), Some(Boundary::new(hello, 1)));

	assert!(!editor.state_mut().select_nearby(Point::new(10.0, 200.0)).unwrap());
}

#[test]
fn offset_in_article_adds_frame_origin() {
	let (mut editor, _, _) = ready_editor();
	let state = editor.state_mut();
	state.set_content(Some("<div>hello</div><div>world wide</div>"), ContentOptions::default()).unwrap();
	let second = text_in(&editor, 1);
	let block = editor.state().window().unwrap().document().parent(second).unwrap();

	assert_eq!(editor.state().offset_in_article(block).unwrap(), Some(Point::new(0.0, 20.0)));
	editor.state_mut().set_frame_origin(Point::new(100.0, 50.0));
	assert_eq!(editor.state().offset_in_article(block).unwrap(), Some(Point::new(100.0, 70.0)));
	assert_eq!(editor.state().offset_in_article(second).unwrap(), Some(Point::new(100.0, 70.0)));
}

#[test]
fn article_visible_rect_covers_the_root() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div><div>world wide</div>"), ContentOptions::default()).unwrap();
	editor.state_mut().set_frame_origin(Point::new(100.0, 50.0));

	let rect = editor.state().article_visible_rect().unwrap().unwrap();
	assert_eq!(rect, Rect::new(100.0, 50.0, 80.0, 40.0));
	assert_eq!(rect.bottom(), 90.0);
	assert_eq!(rect.right(), 180.0);
}

#[test]
fn article_geometry_needs_a_ready_surface() {
	let (editor, _) = editor_with(EditorConfig::default());
	assert!(matches!(editor.state().article_visible_rect(), Err(EditorError::NotReady)));
}

#[test]
fn select_node_shapes_range() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div><div>world</div>"), ContentOptions::default()).unwrap();
	let root = root(&editor);
	let second = editor.state().window().unwrap().document().children(root)[1];

	editor.state_mut().select_node(second, SelectOptions::default()).unwrap();
	let range = editor.state().get_range().unwrap();
	assert_eq!((range.start, range.end), (Boundary::new(root, 1), Boundary::new(root, 2)));

	let start = SelectOptions {
		collapsed: true,
		collapse_to_start: true,
	};
	editor.state_mut().select_node_contents(second, start).unwrap();
	let range = editor.state().get_range().unwrap();
	assert!(range.is_collapsed());
	assert_eq!(range.start, Boundary::new(second, 0));
	assert_eq!(live_ranges(&editor), 1);
}

#[test]
fn focus_article_keeps_existing_focus() {
	let (mut editor, _, _) = ready_editor();
	let before = editor.state().get_range();
	editor.state_mut().focus_article(Some(Point::new(500.0, 500.0))).unwrap();
	assert_eq!(editor.state().get_range(), before);
}

#[test]
fn focus_article_restores_last_selection() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div>"), ContentOptions::default()).unwrap();
	editor.state_mut().select_position(Point::new(16.0, 5.0)).unwrap();
	let window = editor.state_mut().window_mut().unwrap();
	window.blur();
	window.remove_all_ranges();

	editor.state_mut().focus_article(None).unwrap();
	let text = text_in(&editor, 0);
	let window = editor.state().window().unwrap();
	assert!(window.has_focus());
	assert_eq!(window.document().active_element(), Some(root(&editor)));
	assert_eq!(editor.state().get_range().map(|r| r.start), Some(Boundary::new(text, 2)));
}

#[test]
fn focus_article_is_inert_when_read_only() {
	let (mut editor, _, _) = ready_editor();
	editor.set_read_only(true).unwrap();
	editor.state_mut().window_mut().unwrap().blur();
	editor.state_mut().focus_article(None).unwrap();
	assert!(!editor.state().window().unwrap().has_focus());
}

#[test]
fn focus_article_creates_a_line_in_an_empty_root() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().reset_undo_history(false).unwrap();
	assert_eq!(editor.state_mut().get_content(ContentOptions::default()).unwrap(), "");

	editor.state_mut().focus_article(None).unwrap();
	assert_eq!(editor.state_mut().get_content(ContentOptions::default()).unwrap(), "<div><br></div>");
	let root = root(&editor);
	let line = editor.state().window().unwrap().document().first_child(root).unwrap();
	assert_eq!(editor.state().get_range().map(|r| r.start), Some(Boundary::new(line, 1)));
	assert_eq!(live_ranges(&editor), 1);
}

#[test]
fn focus_last_line_from_body_click() {
	let (mut editor, _, now) = ready_editor();
	editor.state_mut().set_content(Some("<div>hello</div><div>world</div>"), ContentOptions::default()).unwrap();
	let body = editor.state().window().unwrap().document().body();

	let outcome = editor.dispatch_native(NativeEvent::new(SurfaceEventKind::Click, body).at(Point::new(0.0, 300.0)), now).unwrap();
	assert_eq!(
		outcome,
		DispatchOutcome {
			forwarded: true,
			prevent_default: false
		}
	);
	let world = text_in(&editor, 1);
	assert_eq!(editor.state().get_range().map(|r| r.start), Some(Boundary::new(world, 0)));
}

#[test]
fn link_click_prevents_default_and_defers_focus() {
	let (mut editor, host, now) = ready_editor();
	editor.state_mut().set_content(Some("<div><a href=\"https://example.com\">link</a></div>"), ContentOptions::default()).unwrap();
	let doc = editor.state().window().unwrap().document();
	let anchor = doc.first_child(doc.first_child(root(&editor)).unwrap()).unwrap();
	let text = doc.first_child(anchor).unwrap();

	let outcome = editor.dispatch_native(NativeEvent::new(SurfaceEventKind::Click, text).at(Point::new(8.0, 5.0)), now).unwrap();
	assert!(outcome.prevent_default);
	assert_eq!(host.count(HostApi::OnAreaClick), 1);

	editor.state_mut().window_mut().unwrap().blur();
	editor.tick(now + 5 * MS).unwrap();
	assert!(!editor.state().window().unwrap().has_focus());
	editor.tick(now + 10 * MS).unwrap();
	assert!(editor.state().window().unwrap().has_focus());
}

#[test]
fn content_round_trip_normalizes_empty_markup() {
	let (mut editor, _, _) = ready_editor();
	let state = editor.state_mut();
	for empty in ["", "<br>", "<br/>"] {
		state.set_content(Some("<p>x</p>"), ContentOptions::default()).unwrap();
		state.set_content(Some(empty), ContentOptions::default()).unwrap();
		assert_eq!(state.get_content(ContentOptions::default()).unwrap(), "<div><br></div>");
	}
	state.set_content(None, ContentOptions::default()).unwrap();
	assert_eq!(state.get_content(ContentOptions::default()).unwrap(), "<div><br></div>");
}

#[test]
fn get_content_closes_img_tags() {
	let (mut editor, _, _) = ready_editor();
	let state = editor.state_mut();
	state
		.set_content(Some("<p><img src=\"a.png\"><IMG src=\"b.png\" /> text</p>"), ContentOptions::default())
		.unwrap();
	let html = state.get_content(ContentOptions::default()).unwrap();
	assert_eq!(html, "<p><img src=\"a.png\" /><img src=\"b.png\" /> text</p>");

	state.set_content(Some(&html), ContentOptions::default()).unwrap();
	assert_eq!(state.get_content(ContentOptions::default()).unwrap(), html);
}

#[test]
fn img_closing_skips_brackets_inside_attribute_values() {
	let (mut editor, _, _) = ready_editor();
	let state = editor.state_mut();
	state
		.set_content(Some("<p><img alt=\"a>b\" src=\"x.png\"></p>"), ContentOptions::default())
		.unwrap();
	let html = state.get_content(ContentOptions::default()).unwrap();
	assert!(html.ends_with("src=\"x.png\" /></p>"), "{html}");

	state.set_content(Some(&html), ContentOptions::default()).unwrap();
	let (window, root) = (state.window().unwrap(), state.root().unwrap());
	let doc = window.document();
	let img = doc.first_child(doc.first_child(root).unwrap()).unwrap();
	assert_eq!(doc.attr(img, "alt"), Some("a>b"));
	assert_eq!(doc.attr(img, "src"), Some("x.png"));
}

#[test]
fn named_entities_reach_the_document() {
	let (mut editor, _, _) = ready_editor();
	let state = editor.state_mut();
	state.set_content(Some("<p>&copy; 2024 &mdash; x</p>"), ContentOptions::default()).unwrap();
	assert_eq!(state.get_content(ContentOptions::default()).unwrap(), "<p>© 2024 — x</p>");
}

#[test]
fn content_filters_apply_unless_ignored() {
	let (mut editor, _, _) = ready_editor();
	let state = editor.state_mut();
	state.add_set_filter(|html| html.replace("<b>", "<strong>").replace("</b>", "</strong>"));
	state.add_get_filter(|html| format!("<section>{html}</section>"));

	state.set_content(Some("<p><b>x</b></p>"), ContentOptions::default()).unwrap();
	assert_eq!(state.get_content(ContentOptions::RAW).unwrap(), "<p><strong>x</strong></p>");
	assert_eq!(state.get_content(ContentOptions::default()).unwrap(), "<section><p><strong>x</strong></p></section>");

	state.set_content(Some("<p><b>y</b></p>"), ContentOptions::RAW).unwrap();
	assert_eq!(state.get_content(ContentOptions::RAW).unwrap(), "<p><b>y</b></p>");
}

#[test]
fn reset_undo_history_replaces_root() {
	let (mut editor, _, now) = ready_editor();
	assert!(editor.state_mut().exec_native("insertText", Some("x")));
	let old_root = root(&editor);
	assert!(editor.state().window().unwrap().has_undo(old_root));

	editor.state_mut().reset_undo_history(true).unwrap();
	let new_root = root(&editor);
	assert_ne!(new_root, old_root);
	let doc = editor.state().window().unwrap().document();
	assert!(!doc.exists(old_root));
	assert!(doc.has_class(new_root, "editor-area"));
	assert!(!editor.state().window().unwrap().has_undo(new_root));
	assert_eq!(editor.state_mut().get_content(ContentOptions::default()).unwrap(), "<div><br>x</div>");
	assert!(!editor.state_mut().exec_native("undo", None));

	// Root-bound events follow the new root.
	let focus = editor.dispatch_native(NativeEvent::new(SurfaceEventKind::Focus, new_root), now).unwrap();
	assert!(focus.forwarded);
	assert!(editor.panel().has_deep_shadow());
}

#[test]
fn silent_do_hides_changes_and_nests() {
	let (mut editor, host, now) = ready_editor();
	let events = record_events(&mut editor);

	let depth_state = editor.state_mut().silent_do(|state| {
		state.set_content(Some("<p>quiet</p>"), ContentOptions::default()).unwrap();
		state.silent_do(|inner| inner.is_monitoring())
	});
	assert!(!depth_state);
	assert!(editor.state().is_monitoring());
	editor.tick(now).unwrap();
	editor.tick(now + 100 * MS).unwrap();
	assert!(events.borrow().is_empty());
	assert_eq!(host.count(HostApi::OnDocumentChange), 0);

	editor.state_mut().stop_monitor_change();
	editor.state_mut().silent_do(|_| ());
	assert!(!editor.state().is_monitoring());
}

#[test]
fn content_change_is_debounced() {
	let (mut editor, host, now) = ready_editor();
	let events = record_events(&mut editor);

	editor.state_mut().set_content(Some("<p>a</p>"), ContentOptions::default()).unwrap();
	editor.tick(now).unwrap();
	editor.state_mut().set_content(Some("<p>ab</p>"), ContentOptions::default()).unwrap();
	editor.tick(now + 10 * MS).unwrap();
	editor.tick(now + 30 * MS).unwrap();
	assert!(events.borrow().is_empty());

	editor.tick(now + 35 * MS).unwrap();
	assert_eq!(*events.borrow(), vec![EditorEvent::ContentChanged]);
	assert_eq!(host.count(HostApi::OnDocumentChange), 1);
	assert!(editor.panel().is_status_pending());
}

#[test]
fn paste_is_picked_up_after_the_defer() {
	let (mut editor, _, now) = ready_editor();
	let events = record_events(&mut editor);
	let root = root(&editor);

	editor.dispatch_native(NativeEvent::new(SurfaceEventKind::Paste, root), now).unwrap();
	editor.tick(now + 25 * MS).unwrap();
	editor.tick(now + 50 * MS).unwrap();
	assert_eq!(
		*events.borrow(),
		vec![EditorEvent::Surface(SurfaceEventKind::Paste), EditorEvent::ContentChanged]
	);
}

#[test]
fn read_only_switches_root_and_toolbar_together() {
	let (mut editor, _, now) = ready_editor();
	editor.add_items([builtin::bold(), builtin::toggle()]);
	let events = record_events(&mut editor);

	editor.set_read_only(true).unwrap();
	let root = root(&editor);
	let doc = editor.state().window().unwrap().document();
	assert_eq!(doc.attr(root, "contenteditable"), Some("false"));
	assert!(editor.is_read_only());
	assert!(editor.panel().items().iter().all(|c| !c.is_enabled()));

	// Not a content change.
	editor.tick(now + 100 * MS).unwrap();
	assert_eq!(*events.borrow(), vec![EditorEvent::ReadOnlyChanged(true)]);

	assert!(!editor.click_control("bold").unwrap());
	assert!(editor.click_control("toggle").unwrap());
	assert!(!editor.is_read_only());
	assert!(editor.panel().items().iter().all(ToolbarControl::is_enabled));
	assert!(editor.click_control("toggle").unwrap());
	assert!(editor.is_read_only());
}

#[test]
fn selection_change_refreshes_toolbar() {
	let (mut editor, _, now) = ready_editor();
	editor.add_item(builtin::bold());
	editor
		.state_mut()
		.silent_do(|state| state.set_content(Some("<div><b>bold</b> plain</div>"), ContentOptions::default()))
		.unwrap();
	editor.state_mut().select_position(Point::new(8.0, 5.0)).unwrap();

	let root = root(&editor);
	editor.dispatch_native(NativeEvent::new(SurfaceEventKind::SelectionChange, root), now).unwrap();
	editor.tick(now + 50 * MS).unwrap();
	assert!(!editor.panel().get_item("bold").unwrap().is_active());
	editor.tick(now + 100 * MS).unwrap();
	assert!(editor.panel().get_item("bold").unwrap().is_active());

	editor.state_mut().select_position(Point::new(64.0, 5.0)).unwrap();
	editor.dispatch_native(NativeEvent::new(SurfaceEventKind::SelectionChange, root), now + 200 * MS).unwrap();
	editor.tick(now + 300 * MS).unwrap();
	assert!(!editor.panel().get_item("bold").unwrap().is_active());
}

#[test]
fn bold_click_formats_selection() {
	let (mut editor, _, _) = ready_editor();
	editor.add_item(builtin::bold());
	editor.state_mut().set_content(Some("<div>hello</div>"), ContentOptions::default()).unwrap();
	let text = text_in(&editor, 0);
	let doc_range = inkstone_dom::Range::new(Boundary::new(text, 0), Boundary::new(text, 5));
	let window = editor.state_mut().window_mut().unwrap();
	let id = window.document_mut().create_range_at(doc_range);
	editor.state_mut().select_range(id).unwrap();

	assert!(editor.click_control("bold").unwrap());
	assert!(editor.panel().get_item("bold").unwrap().is_active());
	assert_eq!(editor.state_mut().get_content(ContentOptions::default()).unwrap(), "<div><b>hello</b></div>");
}

#[test]
fn focus_and_blur_drive_panel_shadow() {
	let (mut editor, _, now) = ready_editor();
	let root = root(&editor);
	editor.dispatch_native(NativeEvent::new(SurfaceEventKind::Focus, root), now).unwrap();
	assert!(editor.panel().has_deep_shadow());
	editor.dispatch_native(NativeEvent::new(SurfaceEventKind::Blur, root), now).unwrap();
	assert!(!editor.panel().has_deep_shadow());
}

#[test]
fn reload_asks_the_host() {
	let (mut editor, host, _) = ready_editor();
	let events = record_events(&mut editor);
	editor.reload().unwrap();
	assert_eq!(host.count(HostApi::ReloadEditor), 1);
	assert_eq!(*events.borrow(), vec![EditorEvent::ReloadRequested]);
}

#[test]
fn resize_refits_after_quiet_period() {
	let (mut editor, _, now) = ready_editor();
	editor.resize(now);
	editor.resize(now + 20 * MS);
	editor.tick(now + 25 * MS).unwrap();
	assert!(editor.resize.is_pending());
	editor.tick(now + 45 * MS).unwrap();
	assert!(!editor.resize.is_pending());
}
