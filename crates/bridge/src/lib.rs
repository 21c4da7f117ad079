//! Native host bridge.
//!
//! The host is a desktop shell embedding the editor. Traffic goes both ways:
//! the editor invokes [`HostApi`] operations with positional JSON arguments,
//! and the host calls back into APIs the editor [`provide`](BridgeClient::provide)s.
//! Asynchronous host operations reply through a one-shot event named
//! `"on" + operation`.
#![cfg_attr(test, allow(unused_crate_dependencies))]

/// Host operations known to the editor.
mod api;
/// The editor's side of the bridge.
mod client;
mod error;
/// The host seam and its development stand-in.
mod host;

pub use api::HostApi;
pub use client::{BridgeClient, OneShot, ProvidedApi};
pub use error::{BridgeError, Result};
pub use host::{CallLog, HostInstance, LoggingHost};
