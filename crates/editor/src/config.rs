//! Editor configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Durations are stored in milliseconds and exposed as
//! [`Duration`]s.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid editor config: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("invalid editor config: {field} {reason}")]
	Invalid { field: &'static str, reason: &'static str },
}

/// Tunables for one editor instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
	/// Loud diagnostics: missing command handlers raise a host alert and bridge
	/// failures propagate instead of being swallowed.
	pub dev_mode: bool,
	/// Quiet period before a content change is acted on.
	pub change_debounce_ms: u64,
	pub resize_debounce_ms: u64,
	/// Quiet period before a toolbar status cycle runs.
	pub status_debounce_ms: u64,
	/// Interval between attempts to reach the surface's nested document.
	pub surface_poll_ms: u64,
	/// Delay before refocusing the editable root after a click.
	pub click_focus_delay_ms: u64,
	/// Delay before pasted content is assumed to be attached.
	pub paste_defer_ms: u64,
	/// Horizontal retries made by `select_nearby`, from the click x toward 0.
	pub nearby_steps: u32,
	/// Vertical offset, in pixels, of `select_nearby`'s second pass.
	pub nearby_vertical_offset: f32,
	/// Markup placed in the surface document's `<head>`.
	pub head_template: String,
	/// Markup placed in the surface document's `<body>`. Must contain an
	/// element carrying [`root_class`](Self::root_class).
	pub body_template: String,
	/// Class identifying the editable root.
	pub root_class: String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			dev_mode: false,
			change_debounce_ms: 25,
			resize_debounce_ms: 25,
			status_debounce_ms: 100,
			surface_poll_ms: 10,
			click_focus_delay_ms: 10,
			paste_defer_ms: 25,
			nearby_steps: 5,
			nearby_vertical_offset: 6.0,
			head_template: "<meta charset=\"utf-8\">".to_owned(),
			body_template: "<div class=\"editor-area\"></div>".to_owned(),
			root_class: "editor-area".to_owned(),
		}
	}
}

impl EditorConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Rejects values the editor cannot run with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.nearby_steps == 0 {
			return Err(ConfigError::Invalid {
				field: "nearby_steps",
				reason: "must be at least 1",
			});
		}
		if self.root_class.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "root_class",
				reason: "must not be empty",
			});
		}
		Ok(())
	}

	pub fn change_debounce(&self) -> Duration {
		Duration::from_millis(self.change_debounce_ms)
	}

	pub fn resize_debounce(&self) -> Duration {
		Duration::from_millis(self.resize_debounce_ms)
	}

	pub fn status_debounce(&self) -> Duration {
		Duration::from_millis(self.status_debounce_ms)
	}

	pub fn surface_poll(&self) -> Duration {
		Duration::from_millis(self.surface_poll_ms)
	}

	pub fn click_focus_delay(&self) -> Duration {
		Duration::from_millis(self.click_focus_delay_ms)
	}

	pub fn paste_defer(&self) -> Duration {
		Duration::from_millis(self.paste_defer_ms)
	}
}
