//! Typed listener lists.
//!
//! Any number of independent listeners may subscribe; emission is
//! fire-and-forget and follows subscription order.

/// Handle returned by [`Emitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of listeners for events of type `E`.
pub struct Emitter<E> {
	listeners: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
	next_id: u64,
}

impl<E> Default for Emitter<E> {
	fn default() -> Self {
		Self {
			listeners: Vec::new(),
			next_id: 0,
		}
	}
}

impl<E> std::fmt::Debug for Emitter<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Emitter").field("listeners", &self.listeners.len()).finish()
	}
}

impl<E> Emitter<E> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
		let id = ListenerId(self.next_id);
		self.next_id += 1;
		self.listeners.push((id, Box::new(listener)));
		id
	}

	/// Removes a listener. Returns false if it was already gone.
	pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(lid, _)| *lid != id);
		before != self.listeners.len()
	}

	pub fn emit(&mut self, event: &E) {
		for (_, listener) in &mut self.listeners {
			listener(event);
		}
	}

	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}
}
