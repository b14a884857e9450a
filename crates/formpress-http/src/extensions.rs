//! Typed per-request storage.
//!
//! Middleware attaches values here (the resolved client IP, the request id)
//! so handlers further down the chain can read them without re-parsing
//! headers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A map keyed by type, holding at most one value per type.
#[derive(Default)]
pub struct Extensions {
	map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, returning the previous value of the same type.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// assert_eq!(extensions.insert(5u32), None);
	/// assert_eq!(extensions.insert(7u32), Some(5));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
		self.map
			.insert(TypeId::of::<T>(), Box::new(value))
			.and_then(|previous| previous.downcast::<T>().ok())
			.map(|boxed| *boxed)
	}

	/// Borrows the value of type `T`, if present.
	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.map
			.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
	}

	/// Returns whether a value of type `T` is stored.
	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.map.contains_key(&TypeId::of::<T>())
	}

	/// Removes and returns the value of type `T`.
	pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
		self.map
			.remove(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast::<T>().ok())
			.map(|boxed| *boxed)
	}

	/// Number of stored values.
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}
}

impl fmt::Debug for Extensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extensions")
			.field("len", &self.map.len())
			.finish()
	}
}
