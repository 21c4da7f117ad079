use inkstone_bridge::{BridgeError, HostApi};
use inkstone_dom::{Boundary, Range};
use inkstone_editor::toolbar::builtin;
use inkstone_editor::{ContentOptions, EditorConfig, EditorEvent, NativeEvent, SurfaceEventKind, ToolbarControl};
use inkstone_primitives::Command;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::common::{MS, counting_command, ready_editor, ready_editor_with, root};

#[test]
fn status_cycle_without_queries_sends_nothing() {
	let (mut editor, _, now) = ready_editor();
	let calls = counting_command(&mut editor, "refresh", json!(true));
	editor.add_items([builtin::toggle(), ToolbarControl::new("plain", "Plain").with_command("refresh")]);

	editor.panel_mut().check_status(now);
	editor.tick(now + 100 * MS).unwrap();
	assert!(!editor.panel().is_status_pending());
	assert_eq!(calls.get(), 0);
}

#[test]
fn empty_content_reads_back_as_one_empty_paragraph() {
	let (mut editor, _, _) = ready_editor();
	editor.state_mut().set_content(Some(""), ContentOptions::default()).unwrap();
	assert_eq!(editor.state_mut().get_content(ContentOptions::default()).unwrap(), "<div><br></div>");
}

#[test]
fn controls_sharing_a_query_trigger_one_command() {
	let (mut editor, _, now) = ready_editor();
	let calls = counting_command(&mut editor, "queryCommandState:bold", json!(false));
	editor.add_items([
		builtin::bold(),
		ToolbarControl::new("bold-mirror", "B").with_query("queryCommandState:bold"),
	]);
	for control in ["bold", "bold-mirror"] {
		editor.panel_mut().get_item_mut(control).unwrap().activate();
	}

	editor.panel_mut().check_status(now);
	editor.tick(now + 100 * MS).unwrap();
	assert_eq!(calls.get(), 1);
	assert!(editor.panel().items().iter().all(|c| !c.is_active()));
}

#[test]
fn bold_round_trip_through_the_toolbar() {
	let (mut editor, host, now) = ready_editor();
	editor.add_item(builtin::bold());
	let events = {
		let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
		let sink = seen.clone();
		editor.subscribe(move |e| sink.borrow_mut().push(e.clone()));
		seen
	};

	editor.state_mut().set_content(Some("<div>hello world</div>"), ContentOptions::default()).unwrap();
	let root = root(&editor);
	let window = editor.state_mut().window_mut().unwrap();
	let doc = window.document_mut();
	let text = doc.first_child(doc.first_child(root).unwrap()).unwrap();
	let id = doc.create_range_at(Range::new(Boundary::new(text, 0), Boundary::new(text, 5)));
	editor.state_mut().select_range(id).unwrap();

	assert!(editor.click_control("bold").unwrap());
	assert_eq!(
		editor.state_mut().get_content(ContentOptions::default()).unwrap(),
		"<div><b>hello</b> world</div>"
	);

	// Change notification, then a status cycle that confirms the state.
	editor.tick(now).unwrap();
	editor.tick(now + 25 * MS).unwrap();
	assert_eq!(host.count(HostApi::OnDocumentChange), 1);
	editor.panel_mut().get_item_mut("bold").unwrap().deactivate();
	editor.tick(now + 125 * MS).unwrap();
	assert!(editor.panel().get_item("bold").unwrap().is_active());
	assert!(events.borrow().contains(&EditorEvent::ContentChanged));

	// Clicking again sends the same command, which unwraps.
	assert!(editor.click_control("bold").unwrap());
	assert_eq!(
		editor.state_mut().get_content(ContentOptions::default()).unwrap(),
		"<div>hello world</div>"
	);
	assert!(!editor.panel().get_item("bold").unwrap().is_active());
}

#[test]
fn config_from_toml_drives_the_surface() {
	let config = EditorConfig::from_toml(
		r#"
		body_template = '<section class="doc"><div class="page"></div></section>'
		root_class = "page"
		change_debounce_ms = 5
		"#,
	)
	.unwrap();
	let (mut editor, host, now) = ready_editor_with(config);

	let root = root(&editor);
	let doc = editor.state().window().unwrap().document();
	assert!(doc.has_class(root, "page"));
	assert_eq!(doc.tag_name(doc.parent(root).unwrap()), Some("section"));

	editor.state_mut().set_content(Some("<p>x</p>"), ContentOptions::default()).unwrap();
	editor.tick(now).unwrap();
	editor.tick(now + 5 * MS).unwrap();
	assert_eq!(host.count(HostApi::OnDocumentChange), 1);
}

#[test]
fn host_calls_provided_apis() {
	let (mut editor, _, _) = ready_editor();
	let bridge = editor.state_mut().bridge_mut();
	bridge.provide("getVersion", |_| Ok(json!("1.0")));
	bridge.provide("fails", |_| {
		Err(BridgeError::Api {
			api: "fails".into(),
			message: "broken".into(),
		})
	});

	assert_eq!(bridge.exec_api("getVersion", &[]), Ok(json!("1.0")));
	assert_eq!(bridge.exec_api("fails", &[]), Ok(Value::Null));
}

#[test]
fn async_host_reply_reenters_through_commands() {
	let (mut editor, host, _) = ready_editor();
	let link = std::rc::Rc::new(std::cell::RefCell::new(None));
	let sink = link.clone();
	editor.add_command("insertLink", move |state, _, value| {
		let text = value.and_then(Value::as_str).unwrap_or_default().to_owned();
		let sink = sink.clone();
		state
			.bridge_mut()
			.call_async(HostApi::ShowInsertLinkDialogAsync, &[json!(text)], move |reply| *sink.borrow_mut() = Some(reply))
			.ok()?;
		Some(Value::Bool(true))
	});

	assert_eq!(editor.command(Command::new("insertLink").with_value("docs")), Some(json!(true)));
	assert_eq!(host.count(HostApi::ShowInsertLinkDialogAsync), 1);
	let bridge = editor.state_mut().bridge_mut();
	assert!(bridge.fire("onShowInsertLinkDialogAsync", json!("https://example.com")));
	assert_eq!(*link.borrow(), Some(json!("https://example.com")));
}

#[test]
fn native_events_reach_listeners() {
	let (mut editor, _, now) = ready_editor();
	let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
	let sink = seen.clone();
	let id = editor.subscribe(move |e| sink.borrow_mut().push(e.clone()));
	let root = root(&editor);

	for kind in [SurfaceEventKind::KeyDown, SurfaceEventKind::DblClick, SurfaceEventKind::ContextMenu] {
		let outcome = editor.dispatch_native(NativeEvent::new(kind, root).with_key("a"), now).unwrap();
		assert!(outcome.forwarded);
	}
	assert!(editor.unsubscribe(id));
	editor.dispatch_native(NativeEvent::new(SurfaceEventKind::DragEnd, root), now).unwrap();

	assert_eq!(
		*seen.borrow(),
		vec![
			EditorEvent::Surface(SurfaceEventKind::KeyDown),
			EditorEvent::Surface(SurfaceEventKind::DblClick),
			EditorEvent::Surface(SurfaceEventKind::ContextMenu),
		]
	);
}
