use inkstone_editor::{ContentOptions, EditorState, ToolbarControl, ToolbarPanel};
use inkstone_primitives::{Command, Point};
use proptest::prelude::*;
use serde_json::json;

use crate::common::{MS, counting_command, ready_editor, root};

fn nest(state: &mut EditorState, depth: usize) -> bool {
	if depth == 0 {
		state.is_monitoring()
	} else {
		state.silent_do(|inner| nest(inner, depth - 1))
	}
}

const TOKENS: &[&str] = &[
	"<p>",
	"</p>",
	"<div>",
	"</div>",
	"<b>",
	"</b>",
	"text",
	" ",
	"<br>",
	"<img src=\"a.png\">",
	"<img src=\"b.png\"/>",
	"<IMG alt=\"x\" src=\"c.png\" />",
	"<img alt=\"a>b\" src=\"d.png\">",
];

fn markup() -> impl Strategy<Value = String> {
	prop::collection::vec(prop::sample::select(TOKENS), 0..12).prop_map(|tokens| tokens.concat())
}

/// Every `<img` tag ends in ` />`. Quoted attribute values may hold `>`.
fn img_tags_are_closed(html: &str) -> bool {
	html.match_indices("<img").all(|(at, _)| {
		let mut quote = None;
		let end = html[at..].char_indices().find(|(_, ch)| match (quote, *ch) {
			(None, '"' | '\'') => {
				quote = Some(*ch);
				false
			}
			(Some(open), ch) if ch == open => {
				quote = None;
				false
			}
			(None, '>') => true,
			_ => false,
		});
		end.is_some_and(|(end, _)| html[at..at + end].ends_with(" /"))
	})
}

proptest! {
	#[test]
	fn get_item_returns_latest_with_name(adds in prop::collection::vec(0usize..4, 0..16)) {
		let names = ["bold", "italic", "toggle", "link"];
		let mut panel = ToolbarPanel::new(100 * MS);
		for (i, name) in adds.iter().enumerate() {
			panel.add_item(ToolbarControl::new(names[*name], i.to_string()));
		}
		for (n, name) in names.iter().enumerate() {
			let expected = adds.iter().rposition(|a| *a == n).map(|i| i.to_string());
			prop_assert_eq!(panel.get_item(name).map(|c| c.label().to_owned()), expected);
		}
		prop_assert_eq!(panel.len(), adds.len());
	}

	#[test]
	fn shared_query_is_asked_once(controls in 1usize..6) {
		let (mut editor, _, now) = ready_editor();
		let calls = counting_command(&mut editor, "refresh", json!(true));
		for i in 0..controls {
			editor.add_item(ToolbarControl::new(format!("c{i}"), "C").with_query("refresh"));
		}
		editor.panel_mut().check_status(now);
		editor.tick(now + 100 * MS).unwrap();
		prop_assert_eq!(calls.get(), 1);
		prop_assert!(editor.panel().items().iter().all(ToolbarControl::is_active));
	}

	#[test]
	fn at_most_one_live_range(points in prop::collection::vec((-20.0f32..120.0, -20.0f32..80.0), 1..12)) {
		let (mut editor, _, _) = ready_editor();
		editor.state_mut().set_content(Some("<div>hello</div><div>world wide</div>"), ContentOptions::default()).unwrap();
		for (x, y) in points {
			let before = editor.state().current_range();
			let hit = editor.state_mut().select_position(Point::new(x, y)).unwrap();
			if !hit {
				prop_assert_eq!(editor.state().current_range(), before);
			}
			prop_assert_eq!(editor.state().window().unwrap().document().live_range_count(), 1);
		}
	}

	#[test]
	fn silent_do_restores_monitoring(depth in 1usize..8, monitoring in any::<bool>()) {
		let (mut editor, _, _) = ready_editor();
		let state = editor.state_mut();
		if !monitoring {
			state.stop_monitor_change();
		}
		let innermost = nest(state, depth);
		prop_assert!(!innermost);
		prop_assert_eq!(state.is_monitoring(), monitoring);
	}

	#[test]
	fn content_repair_and_round_trip(html in markup()) {
		let (mut editor, _, _) = ready_editor();
		let state = editor.state_mut();
		state.set_content(Some(&html), ContentOptions::default()).unwrap();
		let first = state.get_content(ContentOptions::default()).unwrap();
		prop_assert!(img_tags_are_closed(&first), "unclosed img in {}", first);

		state.set_content(Some(&first), ContentOptions::default()).unwrap();
		let second = state.get_content(ContentOptions::default()).unwrap();
		state.set_content(Some(&second), ContentOptions::default()).unwrap();
		let third = state.get_content(ContentOptions::default()).unwrap();
		prop_assert_eq!(&second, &third);
		if !matches!(first.as_str(), "" | "<br>") {
			prop_assert_eq!(&first, &second);
		}
	}

	#[test]
	fn read_only_changes_are_atomic(toggles in prop::collection::vec(any::<bool>(), 1..8)) {
		let (mut editor, _, _) = ready_editor();
		editor.add_items([
			inkstone_editor::toolbar::builtin::bold(),
			inkstone_editor::toolbar::builtin::toggle(),
		]);
		let calls = counting_command(&mut editor, "refresh", json!(1));
		for (i, read_only) in toggles.into_iter().enumerate() {
			editor.set_read_only(read_only).unwrap();
			let root = root(&editor);
			let attr = editor.state().window().unwrap().document().attr(root, "contenteditable").map(str::to_owned);
			prop_assert_eq!(attr.as_deref(), Some(if read_only { "false" } else { "true" }));
			prop_assert!(editor.panel().items().iter().all(|c| c.is_enabled() != read_only));
			prop_assert_eq!(editor.is_read_only(), read_only);

			let before = calls.get();
			let reply = editor.command(Command::new("refresh"));
			prop_assert_eq!(reply.is_none(), read_only, "toggle {}", i);
			prop_assert_eq!(calls.get() - before, usize::from(!read_only));
		}
	}
}
