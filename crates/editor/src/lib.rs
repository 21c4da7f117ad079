//! Editing-surface control for an embeddable rich-text editor.
//!
//! The pieces, leaves first:
//!
//! * [`CommandRegistry`]: command name to handler.
//! * [`ToolbarControl`] and [`ToolbarPanel`]: buttons whose state tracks the
//!   selection, refreshed by debounced status cycles sharing one query cache.
//! * [`EditingSurface`]: the nested window holding the editable root,
//!   bound lazily once it is reachable.
//! * [`Editor`]: owns all of the above plus the host bridge, the current
//!   range, and read-only mode.
//!
//! Everything is single-threaded and clock-free. The embedder drives the
//! editor with [`Editor::tick`] and forwards native events with
//! [`Editor::dispatch_native`].
#![cfg_attr(test, allow(unused_crate_dependencies))]

/// Command name to handler dispatch, plus the stock handlers.
pub mod commands;
/// Editor tunables loaded from TOML.
pub mod config;
/// The controller: selection, content, read-only mode and the tick loop.
pub mod editor;
/// Error types for setup and editor operations.
pub mod error;
/// The nested window hosting the editable root.
pub mod surface;
/// Toolbar buttons and the panel that refreshes their status.
pub mod toolbar;

pub use commands::{CommandHandler, CommandRegistry};
pub use config::{ConfigError, EditorConfig};
pub use editor::{ContentOptions, DispatchOutcome, Editor, EditorEvent, EditorState, Phase, SelectOptions};
pub use error::{EditorError, PanelError, Result, StatusError};
pub use surface::{EditingSurface, NativeEvent, PreparedWindow, SurfaceEvent, SurfaceEventKind, SurfaceLoader};
pub use toolbar::{ControlFlags, PanelHost, ToolbarControl, ToolbarPanel};
