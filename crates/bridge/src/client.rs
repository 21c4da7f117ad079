//! The editor's single handle on the native host.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{BridgeError, HostApi, HostInstance, Result};

/// An API the editor exposes for the host to call.
pub type ProvidedApi = Box<dyn FnMut(&[Value]) -> Result<Value>>;

/// Reply handler for an asynchronous host call.
pub type OneShot = Box<dyn FnOnce(Value)>;

/// Both directions of the host bridge.
///
/// Constructed once per editor and owned by it. Failures are isolated per
/// call: in production a failing host operation or provided API is logged and
/// treated as returning `null`; in development mode the error is returned.
pub struct BridgeClient {
	host: Box<dyn HostInstance>,
	dev_mode: bool,
	apis: FxHashMap<String, ProvidedApi>,
	pending: FxHashMap<String, OneShot>,
	ready: bool,
}

impl std::fmt::Debug for BridgeClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BridgeClient")
			.field("dev_mode", &self.dev_mode)
			.field("apis", &self.apis.keys().collect::<Vec<_>>())
			.field("pending", &self.pending.keys().collect::<Vec<_>>())
			.field("ready", &self.ready)
			.finish()
	}
}

impl BridgeClient {
	pub fn new(host: impl HostInstance + 'static, dev_mode: bool) -> Self {
		Self {
			host: Box::new(host),
			dev_mode,
			apis: FxHashMap::default(),
			pending: FxHashMap::default(),
			ready: false,
		}
	}

	pub fn is_dev_mode(&self) -> bool {
		self.dev_mode
	}

	/// Exposes an API to the host. A later registration under the same name
	/// replaces the earlier one.
	pub fn provide(&mut self, name: impl Into<String>, api: impl FnMut(&[Value]) -> Result<Value> + 'static) {
		self.apis.insert(name.into(), Box::new(api));
	}

	pub fn provides(&self, name: &str) -> bool {
		self.apis.contains_key(name)
	}

	/// Entry point the host uses to call a provided API.
	pub fn exec_api(&mut self, name: &str, args: &[Value]) -> Result<Value> {
		let result = match self.apis.get_mut(name) {
			Some(api) => api(args),
			None => Err(BridgeError::UnknownApi(name.to_owned())),
		};
		self.isolate(result)
	}

	/// Tells the host the editor is initialized. Only the first call reaches
	/// the host.
	pub fn ready(&mut self) {
		if self.ready {
			return;
		}
		self.ready = true;
		debug!("bridge.ready");
		self.host.ready();
	}

	pub fn is_ready(&self) -> bool {
		self.ready
	}

	/// Invokes a host operation with positional arguments.
	pub fn call(&mut self, api: HostApi, args: &[Value]) -> Result<Value> {
		debug!(%api, args = args.len(), "bridge.call");
		let result = self.host.invoke(api, args);
		self.isolate(result)
	}

	/// Invokes a host operation whose reply arrives later as the event
	/// `"on" + api`.
	///
	/// Any reply handler still waiting on the same event is dropped first, so
	/// at most one is pending per operation. The handler runs once and is then
	/// unregistered.
	pub fn call_async(&mut self, api: HostApi, args: &[Value], reply: impl FnOnce(Value) + 'static) -> Result<()> {
		let event = api.reply_event();
		if self.pending.remove(&event).is_some() {
			debug!(%event, "bridge.reply_superseded");
		}
		debug!(%api, args = args.len(), "bridge.call_async");
		match self.host.invoke(api, args) {
			Ok(_) => {
				self.pending.insert(event, Box::new(reply));
				Ok(())
			}
			Err(err) => self.isolate(Err(err)).map(drop),
		}
	}

	/// Delivers a host reply. Returns false when nothing was waiting for it.
	pub fn fire(&mut self, event: &str, payload: Value) -> bool {
		match self.pending.remove(event) {
			Some(reply) => {
				reply(payload);
				true
			}
			None => {
				debug!(%event, "bridge.reply_unclaimed");
				false
			}
		}
	}

	pub fn is_pending(&self, event: &str) -> bool {
		self.pending.contains_key(event)
	}

	/// Blocking development diagnostic.
	pub fn alert(&mut self, message: &str) {
		self.host.alert(message);
	}

	fn isolate(&self, result: Result<Value>) -> Result<Value> {
		match result {
			Err(err) if !self.dev_mode => {
				warn!(%err, "bridge call failed");
				Ok(Value::Null)
			}
			other => other,
		}
	}
}
