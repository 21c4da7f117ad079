//! Bridge error types.

use thiserror::Error;

use crate::HostApi;

/// Failures crossing the host bridge.
///
/// In production these are logged and swallowed by [`BridgeClient`](crate::BridgeClient);
/// development mode hands them back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
	/// The host asked for an API the editor never provided.
	#[error("no api named {0:?} is provided")]
	UnknownApi(String),
	/// A host operation reported failure.
	#[error("host call {api} failed: {message}")]
	Host { api: HostApi, message: String },
	/// A provided API failed while the host was calling into it.
	#[error("provided api {api:?} failed: {message}")]
	Api { api: String, message: String },
}

impl BridgeError {
	/// Convenience constructor for host implementations.
	pub fn host(api: HostApi, message: impl Into<String>) -> Self {
		Self::Host {
			api,
			message: message.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, BridgeError>;
