//! Editor error types.

use inkstone_bridge::BridgeError;
use inkstone_dom::DomError;
use thiserror::Error;

use crate::config::ConfigError;

/// Wiring mistakes in the toolbar. These are setup-time errors, not runtime
/// conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
	#[error("toolbar control name is empty")]
	EmptyName,
	#[error("no toolbar control named {0:?}")]
	ControlNotFound(String),
}

/// Failure reported by a control's status evaluator. It only affects the
/// control that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StatusError(pub String);

/// Errors surfaced by the editor's public API.
#[derive(Debug, Error)]
pub enum EditorError {
	/// The editing surface has not finished binding yet.
	#[error("editing surface is not ready")]
	NotReady,
	/// The editor was destroyed.
	#[error("editor has been torn down")]
	TornDown,
	/// The surface body holds no element with the configured root class.
	#[error("no editable root with class {0:?} in the surface body")]
	MissingRoot(String),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Dom(#[from] DomError),
	#[error(transparent)]
	Panel(#[from] PanelError),
	#[error(transparent)]
	Bridge(#[from] BridgeError),
	#[error("invalid content pattern: {0}")]
	Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
