//! Lazy type-definition proxy (§4.6): a type definition whose kind,
//! modifiers, type parameters, and attributes are computed up front, but
//! whose `base_types`, `nested_types`, and `members` lists are deferred to
//! first access.
//!
//! Each deferred list is a `OnceLock` - publish-once, safe to read
//! concurrently once filled. Filling one, though, walks the same metadata
//! graph the *other* two lazy types in this module might be walking at the
//! same instant, and the graph (a simulated non-reentrant parser API) is not
//! safe for concurrent traversal. So every `get_or_init` additionally
//! acquires a `Mutex<()>` shared by every lazy type in the assembly being
//! loaded before it touches the source record - spec.md's words for this are
//! "an OnceCell/Lazy-style primitive parameterized by a shared mutex".
//!
//! Once all three lists are filled, the record/configuration/lock this type
//! needed to compute them are no longer reachable from anywhere but this
//! type's own three `OnceLock`s, so the context holding them is dropped
//! (§4.6 "loader and source references are released once materialization
//! completes").

use std::sync::atomic::{self, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use derivative::Derivative;

use crate::config::Configuration;
use crate::error::Result;
use crate::metadata::TypeDefRecord;
use crate::model::attribute::UnresolvedAttribute;
use crate::model::member::{Accessibility, UnresolvedMember, UnresolvedTypeParameter};
use crate::model::type_def::{compute_attributes, compute_base_types, compute_kind, compute_members, compute_modifiers, compute_nested_types, compute_type_parameters, NestedMode, TypeDefinitionHandle, TypeKind, TypeModifiers};
use crate::model::type_ref::UnresolvedTypeReference;
use crate::model::LazyInterner;
use crate::token::MetadataToken;

struct LazyBuildContext {
	record: Arc<TypeDefRecord>,
	config: Arc<Configuration>,
	module_lock: Arc<Mutex<()>>,
}

/// `Debug` is derived field-by-field except `context`, which holds the
/// `Configuration` (itself carrying opaque `Fn` trait objects for the
/// entity-loaded/cancellation hooks) and is only ever relevant internally -
/// mirrors the teacher's own `#[derivative(Debug = "ignore")]` on `Type`'s
/// back-reference to its owning `TypePool`.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct LazyTypeDefinition {
	pub token: MetadataToken,
	pub namespace: Arc<str>,
	pub name: Arc<str>,
	pub kind: TypeKind,
	pub accessibility: Accessibility,
	pub modifiers: TypeModifiers,
	pub type_parameters: Arc<[Arc<UnresolvedTypeParameter>]>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
	pub has_extension_methods: bool,
	pub add_default_constructor_if_required: bool,

	base_types: OnceLock<Arc<[Arc<UnresolvedTypeReference>]>>,
	nested_types: OnceLock<Arc<[TypeDefinitionHandle]>>,
	members: OnceLock<Arc<[UnresolvedMember]>>,
	#[derivative(Debug = "ignore")]
	context: Mutex<Option<LazyBuildContext>>,
}

impl LazyTypeDefinition {
	/// Computes everything but the three deferred lists, using a per-call
	/// (non-deduplicating) interner: a lazy type's eager portion is built off
	/// whatever thread first reaches this nested type, which may run
	/// concurrently with the assembly's main eager pass, so it does not share
	/// the main `RealInterner` (§4.1's dummy pool exists for exactly this).
	pub fn new(record: &TypeDefRecord, config: Arc<Configuration>, module_lock: Arc<Mutex<()>>) -> Result<Arc<Self>> {
		let interner = LazyInterner::new();
		let kind = compute_kind(record);
		let (accessibility, modifiers) = compute_modifiers(record);
		let type_parameters = compute_type_parameters(record, &config, &interner)?;
		let (attributes, has_extension_methods) = compute_attributes(record, kind, &config, &interner)?;

		Ok(Arc::new(Self {
			token: record.token,
			namespace: interner.intern_str(&record.namespace),
			name: interner.intern_str(&record.short_name),
			kind,
			accessibility,
			modifiers,
			type_parameters,
			attributes,
			has_extension_methods,
			add_default_constructor_if_required: matches!(kind, TypeKind::Struct | TypeKind::Enum),
			base_types: OnceLock::new(),
			nested_types: OnceLock::new(),
			members: OnceLock::new(),
			context: Mutex::new(Some(LazyBuildContext { record: Arc::new(record.clone()), config, module_lock })),
		}))
	}

	fn with_context<T>(&self, f: impl FnOnce(&LazyBuildContext, &dyn crate::model::Interner) -> T) -> Option<T> {
		let guard = self.context.lock().unwrap();
		let ctx = guard.as_ref()?;
		#[cfg(feature = "tracing")]
		tracing::trace!(r#type = %self.name, "materializing lazy type under module lock");
		let _module_guard = ctx.module_lock.lock().unwrap();
		let interner = LazyInterner::new();
		Some(f(ctx, &interner))
	}

	pub fn base_types(&self) -> Arc<[Arc<UnresolvedTypeReference>]> {
		let result = self
			.base_types
			.get_or_init(|| {
				self.with_context(|ctx, interner| compute_base_types(&ctx.record, self.kind, &ctx.config, interner).unwrap_or_else(|_| crate::model::arc_slice(Vec::new())))
					.unwrap_or_else(|| crate::model::arc_slice(Vec::new()))
			})
			.clone();
		self.maybe_release();
		result
	}

	pub fn nested_types(&self) -> Arc<[TypeDefinitionHandle]> {
		let result = self
			.nested_types
			.get_or_init(|| {
				self.with_context(|ctx, _interner| {
					let mode = NestedMode::Lazy { module_lock: ctx.module_lock.clone() };
					compute_nested_types(&ctx.record, &ctx.config, &mode).unwrap_or_else(|_| crate::model::arc_slice(Vec::new()))
				})
				.unwrap_or_else(|| crate::model::arc_slice(Vec::new()))
			})
			.clone();
		self.maybe_release();
		result
	}

	pub fn members(&self) -> Arc<[UnresolvedMember]> {
		let result = self
			.members
			.get_or_init(|| {
				self.with_context(|ctx, interner| compute_members(&ctx.record, self.kind, &ctx.config, interner).unwrap_or_else(|_| crate::model::arc_slice(Vec::new())))
					.unwrap_or_else(|| crate::model::arc_slice(Vec::new()))
			})
			.clone();
		self.maybe_release();
		result
	}

	/// Drops the source record/configuration/lock once nothing can still
	/// need them - all three deferred lists are in place.
	fn maybe_release(&self) {
		if self.base_types.get().is_some() && self.nested_types.get().is_some() && self.members.get().is_some() {
			*self.context.lock().unwrap() = None;
		}
	}

	/// Forces all three deferred lists (used by an assembly-wide `finish()`
	/// before freezing). Issues a memory barrier afterwards so a reader that
	/// observes the assembly as finished also observes every lazy type as
	/// fully materialized, without itself taking the module lock.
	pub fn force(&self) {
		let _ = self.base_types();
		let nested = self.nested_types();
		for child in nested.iter() {
			if let TypeDefinitionHandle::Lazy(lazy) = child {
				lazy.force();
			}
		}
		let _ = self.members();
		atomic::fence(Ordering::SeqCst);
	}
}
