//! Interning pool (§4.1). Generalizes the teacher's `schema::r#type::TypePool`
//! / `schema::heaps::StringHeap` pattern - a dedup map guarding an owning
//! store - to every interned kind this crate needs (strings, type
//! references, attribute records, constant values), swapping the teacher's
//! single-threaded bump arena for `Arc` so canonical values can be shared
//! with concurrent readers once an assembly is frozen.
//!
//! A value-equal group is represented by one canonical `Arc<T>`; repeated
//! `intern` calls for an equal value return a clone of the same `Arc`, so
//! "physically shared" becomes "pointer-equal `Arc`", the `Arc` analogue of
//! the teacher's bump-pointer identity. Immutable lists aren't given their
//! own dedup table: elements are already-interned `Arc`s by the time a list
//! is built, so a list is just `Arc<[T]>` around already-canonical parts
//! (see DESIGN.md).

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use fxhash::{FxBuildHasher, FxHashMap};

/// Canonicalizes values of type `T` by `Eq`/`Hash`.
pub struct InternPool<T: Eq + Hash + Clone> {
	table: Mutex<FxHashMap<T, Arc<T>>>,
}

impl<T: Eq + Hash + Clone> Default for InternPool<T> {
	fn default() -> Self {
		Self { table: Mutex::new(FxHashMap::default()) }
	}
}

impl<T: Eq + Hash + Clone> InternPool<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the canonical representative for `value`, inserting it as
	/// the canonical representative of its value-equality group if this is
	/// the first time it has been seen.
	pub fn intern(&self, value: T) -> Arc<T> {
		let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
		if let Some(existing) = table.get(&value) {
			return existing.clone();
		}
		let arc = Arc::new(value.clone());
		table.insert(value, arc.clone());
		arc
	}

	pub fn len(&self) -> usize {
		self.table.lock().unwrap_or_else(|e| e.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Dedicated string table, mirroring the teacher's `StringHeap`: interned
/// strings are looked up by borrowed `&str` so callers never allocate on a
/// cache hit.
#[derive(Default)]
pub struct StringPool {
	set: Mutex<HashSet<Arc<str>, FxBuildHasher>>,
}

impl StringPool {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn intern(&self, value: &str) -> Arc<str> {
		let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
		if let Some(existing) = set.get(value) {
			return existing.clone();
		}
		let arc: Arc<str> = Arc::from(value);
		set.insert(arc.clone());
		arc
	}

	pub fn len(&self) -> usize {
		self.set.lock().unwrap_or_else(|e| e.into_inner()).len()
	}
}

/// The "dummy" pool of §4.1: wraps its input in a fresh `Arc` without
/// deduplication. Used by the lazy proxy (§4.6): the real pool above is
/// `Mutex`-guarded and technically callable from any thread, but spec.md
/// requires lazy materialization to go through a *non-interning* pool so a
/// lazy type's results stay correct independent of its owning assembly's
/// interning pool lifetime and occupancy.
#[derive(Default, Clone, Copy)]
pub struct DummyPool;

impl DummyPool {
	pub fn intern<T>(&self, value: T) -> Arc<T> {
		Arc::new(value)
	}

	pub fn intern_str(&self, value: &str) -> Arc<str> {
		Arc::from(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn interns_equal_values_to_the_same_allocation() {
		let pool: InternPool<String> = InternPool::new();
		let a = pool.intern("hello".to_string());
		let b = pool.intern("hello".to_string());
		assert!(Arc::ptr_eq(&a, &b));
	}

	#[test]
	fn distinguishes_unequal_values() {
		let pool: InternPool<String> = InternPool::new();
		let a = pool.intern("hello".to_string());
		let b = pool.intern("world".to_string());
		assert!(!Arc::ptr_eq(&a, &b));
	}

	#[test]
	fn string_pool_looks_up_by_borrowed_str() {
		let pool = StringPool::new();
		let a = pool.intern("System.Int32");
		let b = pool.intern("System.Int32");
		assert!(Arc::ptr_eq(&a, &b));
		assert_eq!(pool.len(), 1);
	}

	#[test]
	fn dummy_pool_never_shares_allocations() {
		let pool = DummyPool;
		let a = pool.intern("hello".to_string());
		let b = pool.intern("hello".to_string());
		assert!(!Arc::ptr_eq(&a, &b));
	}
}
