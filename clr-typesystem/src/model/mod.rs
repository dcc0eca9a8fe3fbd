//! The unresolved type system (spec.md §3): the frozen, interned,
//! in-memory domain model this crate produces.

pub mod assembly;
pub mod attribute;
pub mod lazy;
pub mod member;
pub mod type_def;
pub mod type_ref;

use std::sync::Arc;

use crate::intern::{DummyPool, InternPool, StringPool};
use attribute::UnresolvedAttribute;
use type_ref::{ConstantValue, UnresolvedTypeReference};

/// Every kind of canonicalization the loader needs (§4.1), behind one
/// object-safe trait so the eager (real, shared) and lazy (dummy,
/// per-call) pools can be swapped without generic parameters threaded
/// through every builder function.
pub trait Interner: Send + Sync {
	fn intern_str(&self, value: &str) -> Arc<str>;
	fn intern_type_ref(&self, value: UnresolvedTypeReference) -> Arc<UnresolvedTypeReference>;
	fn intern_attribute(&self, value: UnresolvedAttribute) -> Arc<UnresolvedAttribute>;
	fn intern_constant(&self, value: ConstantValue) -> Arc<ConstantValue>;
}

/// The real pool: one dedup table per kind, §4.1 "Required kinds".
#[derive(Default)]
pub struct RealInterner {
	pub strings: StringPool,
	pub type_refs: InternPool<UnresolvedTypeReference>,
	pub attributes: InternPool<UnresolvedAttribute>,
	pub constants: InternPool<ConstantValue>,
}

impl RealInterner {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Interner for RealInterner {
	fn intern_str(&self, value: &str) -> Arc<str> {
		self.strings.intern(value)
	}
	fn intern_type_ref(&self, value: UnresolvedTypeReference) -> Arc<UnresolvedTypeReference> {
		self.type_refs.intern(value)
	}
	fn intern_attribute(&self, value: UnresolvedAttribute) -> Arc<UnresolvedAttribute> {
		self.attributes.intern(value)
	}
	fn intern_constant(&self, value: ConstantValue) -> Arc<ConstantValue> {
		self.constants.intern(value)
	}
}

/// The dummy pool of §4.1 applied to every kind: used by the lazy proxy
/// (§4.6) because the real pool is shared module-wide and not meant to be
/// mutated off the loader's own thread once other types may be reading it
/// concurrently.
#[derive(Default, Clone, Copy)]
pub struct LazyInterner(DummyPool);

impl LazyInterner {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Interner for LazyInterner {
	fn intern_str(&self, value: &str) -> Arc<str> {
		self.0.intern_str(value)
	}
	fn intern_type_ref(&self, value: UnresolvedTypeReference) -> Arc<UnresolvedTypeReference> {
		self.0.intern(value)
	}
	fn intern_attribute(&self, value: UnresolvedAttribute) -> Arc<UnresolvedAttribute> {
		self.0.intern(value)
	}
	fn intern_constant(&self, value: ConstantValue) -> Arc<ConstantValue> {
		self.0.intern(value)
	}
}

/// Helper for interning an already-built slice into an `Arc<[T]>` - lists
/// aren't separately deduplicated (see intern.rs), they just take ownership
/// of already-canonical elements.
pub(crate) fn arc_slice<T>(items: Vec<T>) -> Arc<[T]> {
	items.into()
}
