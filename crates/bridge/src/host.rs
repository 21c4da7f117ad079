//! The host side of the bridge.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{info, warn};

use crate::{HostApi, Result};

/// A native host the editor can call into.
pub trait HostInstance {
	/// The editor finished initializing; the host may start calling provided APIs.
	fn ready(&mut self) {}

	/// Runs a host operation with positional arguments.
	fn invoke(&mut self, api: HostApi, args: &[Value]) -> Result<Value>;

	/// Shows a blocking diagnostic. Only used in development mode.
	fn alert(&mut self, message: &str) {
		warn!(alert = message, "bridge.alert");
	}
}

/// Shared record of the calls a [`LoggingHost`] received.
pub type CallLog = Rc<RefCell<Vec<(HostApi, Vec<Value>)>>>;

/// Stand-in host for running without a native shell.
///
/// Logs every call and answers with the values a real host returns when it
/// has nothing better to say.
#[derive(Debug, Default, Clone)]
pub struct LoggingHost {
	calls: CallLog,
	alerts: Rc<RefCell<Vec<String>>>,
}

impl LoggingHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Handle on the recorded calls, shared with clones of this host.
	pub fn calls(&self) -> CallLog {
		self.calls.clone()
	}

	/// Alerts raised so far.
	pub fn alerts(&self) -> Vec<String> {
		self.alerts.borrow().clone()
	}

	/// Number of times `api` was invoked.
	pub fn count(&self, api: HostApi) -> usize {
		self.calls.borrow().iter().filter(|(a, _)| *a == api).count()
	}

	fn default_reply(api: HostApi) -> Value {
		match api {
			HostApi::ClipboardAvailable | HostApi::GetFeatureHighlightEnable | HostApi::ShowNoteCharNum => Value::Bool(true),
			HostApi::IsImageSavedToNote => Value::Bool(false),
			_ => Value::Null,
		}
	}
}

impl HostInstance for LoggingHost {
	fn ready(&mut self) {
		info!("host.ready");
	}

	fn invoke(&mut self, api: HostApi, args: &[Value]) -> Result<Value> {
		info!(%api, ?args, "host.invoke");
		self.calls.borrow_mut().push((api, args.to_vec()));
		Ok(Self::default_reply(api))
	}

	fn alert(&mut self, message: &str) {
		warn!(alert = message, "host.alert");
		self.alerts.borrow_mut().push(message.to_owned());
	}
}
