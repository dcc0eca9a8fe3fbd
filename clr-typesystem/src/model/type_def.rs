//! Type-definition reader (§4.5): builds an unresolved type definition from
//! a metadata type, in the mandatory order spec.md lays out (later steps
//! reference state earlier steps established).
//!
//! The `compute_*` functions below are shared between the eager builder
//! (`build_type_definition`, used directly by the assembly driver) and the
//! lazy proxy (`crate::model::lazy`), which defers exactly the three lists
//! §4.6 names (`base_types`, `nested_types`, `members`) to first access but
//! computes everything else - kind, modifiers, type parameters, attributes -
//! up front, using the very same helpers.

use std::sync::{Arc, Mutex};

use crate::config::Configuration;
use crate::error::Result;
use crate::metadata::{FieldFlags, TypeDefFlags, TypeDefRecord, TypeVisibility};
use crate::model::attribute::{decode_type_attributes, has_attribute, UnresolvedAttribute};
use crate::model::lazy::LazyTypeDefinition;
use crate::model::member::{
	build_event, build_field, build_method, build_property, build_type_parameter, decode_default_member_name, is_member_visible,
	is_top_level_method, Accessibility, UnresolvedMember, UnresolvedTypeParameter,
};
use crate::model::type_ref::{build_type_reference, Cursors, TypeRefContext, UnresolvedTypeReference};
use crate::model::{arc_slice, Interner};
use crate::token::MetadataToken;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TypeKind {
	Class,
	Struct,
	Interface,
	Enum,
	Delegate,
	Module,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TypeModifiers {
	pub is_sealed: bool,
	pub is_abstract: bool,
}

/// A reference to a type definition that may or may not have materialized
/// its base types, nested types, and members yet (§4.6). Every place the
/// unresolved model holds a child type definition - an assembly's top-level
/// list, a type's own nested-type list - goes through this handle so eager
/// and lazy loading share one shape.
#[derive(Clone)]
pub enum TypeDefinitionHandle {
	Eager(Arc<UnresolvedTypeDefinition>),
	Lazy(Arc<LazyTypeDefinition>),
}

impl std::fmt::Debug for TypeDefinitionHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TypeDefinitionHandle::Eager(t) => t.fmt(f),
			TypeDefinitionHandle::Lazy(t) => t.fmt(f),
		}
	}
}

impl TypeDefinitionHandle {
	pub fn token(&self) -> MetadataToken {
		match self {
			TypeDefinitionHandle::Eager(t) => t.token,
			TypeDefinitionHandle::Lazy(t) => t.token,
		}
	}

	pub fn namespace(&self) -> &Arc<str> {
		match self {
			TypeDefinitionHandle::Eager(t) => &t.namespace,
			TypeDefinitionHandle::Lazy(t) => &t.namespace,
		}
	}

	pub fn name(&self) -> &Arc<str> {
		match self {
			TypeDefinitionHandle::Eager(t) => &t.name,
			TypeDefinitionHandle::Lazy(t) => &t.name,
		}
	}

	pub fn kind(&self) -> TypeKind {
		match self {
			TypeDefinitionHandle::Eager(t) => t.kind,
			TypeDefinitionHandle::Lazy(t) => t.kind,
		}
	}

	pub fn accessibility(&self) -> Accessibility {
		match self {
			TypeDefinitionHandle::Eager(t) => t.accessibility,
			TypeDefinitionHandle::Lazy(t) => t.accessibility,
		}
	}

	pub fn modifiers(&self) -> TypeModifiers {
		match self {
			TypeDefinitionHandle::Eager(t) => t.modifiers,
			TypeDefinitionHandle::Lazy(t) => t.modifiers,
		}
	}

	pub fn attributes(&self) -> Arc<[Arc<UnresolvedAttribute>]> {
		match self {
			TypeDefinitionHandle::Eager(t) => t.attributes.clone(),
			TypeDefinitionHandle::Lazy(t) => t.attributes.clone(),
		}
	}

	pub fn has_extension_methods(&self) -> bool {
		match self {
			TypeDefinitionHandle::Eager(t) => t.has_extension_methods,
			TypeDefinitionHandle::Lazy(t) => t.has_extension_methods,
		}
	}

	pub fn add_default_constructor_if_required(&self) -> bool {
		match self {
			TypeDefinitionHandle::Eager(t) => t.add_default_constructor_if_required,
			TypeDefinitionHandle::Lazy(t) => t.add_default_constructor_if_required,
		}
	}

	/// §4.6: the only suspension points in lazy mode - materializes under
	/// the module-wide lock on first access for a lazy handle, a plain field
	/// read for an eager one.
	pub fn base_types(&self) -> Arc<[Arc<UnresolvedTypeReference>]> {
		match self {
			TypeDefinitionHandle::Eager(t) => t.base_types.clone(),
			TypeDefinitionHandle::Lazy(t) => t.base_types(),
		}
	}

	pub fn nested_types(&self) -> Arc<[TypeDefinitionHandle]> {
		match self {
			TypeDefinitionHandle::Eager(t) => t.nested_types.clone(),
			TypeDefinitionHandle::Lazy(t) => t.nested_types(),
		}
	}

	pub fn members(&self) -> Arc<[UnresolvedMember]> {
		match self {
			TypeDefinitionHandle::Eager(t) => t.members.clone(),
			TypeDefinitionHandle::Lazy(t) => t.members(),
		}
	}
}

#[derive(Debug)]
pub struct UnresolvedTypeDefinition {
	pub token: MetadataToken,
	pub namespace: Arc<str>,
	pub name: Arc<str>,
	pub kind: TypeKind,
	pub accessibility: Accessibility,
	pub modifiers: TypeModifiers,
	pub type_parameters: Arc<[Arc<UnresolvedTypeParameter>]>,
	pub base_types: Arc<[Arc<UnresolvedTypeReference>]>,
	pub nested_types: Arc<[TypeDefinitionHandle]>,
	pub members: Arc<[UnresolvedMember]>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
	pub has_extension_methods: bool,
	pub add_default_constructor_if_required: bool,
}

/// §4.5 step 6 / §4.7 "visibility filter": nested types require at least
/// `NestedFamily`/`NestedFamOrAssem`/`NestedPublic`, or internals-inclusion.
pub fn is_nested_type_visible(visibility: TypeVisibility, config: &Configuration) -> bool {
	use TypeVisibility::*;
	matches!(visibility, NestedPublic | NestedFamily | NestedFamOrAssem) || config.include_internal_members
}

/// Top-level types only ever carry `NotPublic`/`Public` (§3): the
/// configured-internal escape hatch is the only way a `NotPublic` top-level
/// type is loaded.
pub fn is_top_level_type_visible(visibility: TypeVisibility, config: &Configuration) -> bool {
	matches!(visibility, TypeVisibility::Public) || config.include_internal_members
}

fn translate_type_visibility(visibility: TypeVisibility) -> Accessibility {
	match visibility {
		TypeVisibility::NotPublic => Accessibility::Internal,
		TypeVisibility::Public | TypeVisibility::NestedPublic => Accessibility::Public,
		TypeVisibility::NestedPrivate => Accessibility::Private,
		TypeVisibility::NestedFamily => Accessibility::Protected,
		TypeVisibility::NestedAssembly => Accessibility::Internal,
		TypeVisibility::NestedFamAndAssem => Accessibility::PrivateProtected,
		TypeVisibility::NestedFamOrAssem => Accessibility::ProtectedInternal,
	}
}

/// §4.5 step 3: interface > enum > struct > delegate > module > class.
pub fn compute_kind(record: &TypeDefRecord) -> TypeKind {
	if record.flags.contains(TypeDefFlags::INTERFACE) {
		return TypeKind::Interface;
	}
	if is_named_base(record, "System", "Enum") {
		return TypeKind::Enum;
	}
	if is_named_base(record, "System", "ValueType") {
		return TypeKind::Struct;
	}
	if is_named_base(record, "System", "MulticastDelegate") {
		return TypeKind::Delegate;
	}
	if is_named_base(record, "System", "Delegate") && record.short_name != "MulticastDelegate" {
		return TypeKind::Delegate;
	}
	if has_attribute(&record.attributes, "Microsoft.VisualBasic.CompilerServices", "StandardModuleAttribute")
		|| has_attribute(&record.attributes, "Microsoft.VisualBasic", "CompilerGlobalScopeAttribute")
	{
		return TypeKind::Module;
	}
	TypeKind::Class
}

fn is_named_base(record: &TypeDefRecord, namespace: &str, name: &str) -> bool {
	matches!(&record.base_type, Some(sig) if sig.simple_name() == Some((namespace, name)))
}

/// §4.5 step 4: sealed/abstract/accessibility.
pub fn compute_modifiers(record: &TypeDefRecord) -> (Accessibility, TypeModifiers) {
	let accessibility = translate_type_visibility(record.visibility);
	let modifiers = TypeModifiers {
		is_sealed: record.flags.contains(TypeDefFlags::SEALED),
		is_abstract: record.flags.contains(TypeDefFlags::ABSTRACT),
	};
	(accessibility, modifiers)
}

/// §4.5 step 5: type-parameter constraints and attributes.
pub fn compute_type_parameters(record: &TypeDefRecord, config: &Configuration, interner: &dyn Interner) -> Result<Arc<[Arc<UnresolvedTypeParameter>]>> {
	let mut out = Vec::with_capacity(record.type_parameters.len());
	for tp in &record.type_parameters {
		out.push(build_type_parameter(tp, config, interner)?);
	}
	Ok(arc_slice(out))
}

/// §4.5 step 8: for enums, the underlying type is the first *instance*
/// field's type; otherwise the explicit base type followed by all
/// interfaces.
pub fn compute_base_types(record: &TypeDefRecord, kind: TypeKind, config: &Configuration, interner: &dyn Interner) -> Result<Arc<[Arc<UnresolvedTypeReference>]>> {
	if kind == TypeKind::Enum {
		let Some(field) = record.fields.iter().find(|f| !f.flags.contains(FieldFlags::STATIC)) else {
			return Ok(arc_slice(Vec::new()));
		};
		let ctx = TypeRefContext::from_attributes(&field.attributes, config);
		let mut cursor = Cursors::default();
		let underlying = build_type_reference(&field.ty, &ctx, &mut cursor, interner, true)?;
		return Ok(arc_slice(vec![underlying]));
	}

	let empty_ctx = TypeRefContext::from_attributes(&[], config);
	let mut out = Vec::with_capacity(1 + record.interfaces.len());
	if let Some(base) = &record.base_type {
		let mut cursor = Cursors::default();
		out.push(build_type_reference(base, &empty_ctx, &mut cursor, interner, true)?);
	}
	for interface in &record.interfaces {
		let mut cursor = Cursors::default();
		out.push(build_type_reference(interface, &empty_ctx, &mut cursor, interner, true)?);
	}
	Ok(arc_slice(out))
}

/// §4.5 step 7: attributes plus the `hasExtensionMethods` flag - set when
/// any method is both static and `[Extension]`-decorated.
pub fn compute_attributes(record: &TypeDefRecord, kind: TypeKind, config: &Configuration, interner: &dyn Interner) -> Result<(Arc<[Arc<UnresolvedAttribute>]>, bool)> {
	let attributes = decode_type_attributes(record, kind, config, interner)?;
	let has_extension_methods = record
		.methods
		.iter()
		.any(|m| m.flags.contains(crate::metadata::MethodFlags::STATIC) && has_attribute(&m.attributes, "System.Runtime.CompilerServices", "ExtensionAttribute"));
	Ok((arc_slice(attributes), has_extension_methods))
}

/// §4.5 step 6: recursive nested-type reads, each respecting the nested
/// visibility filter. `eager` builds each child eagerly with `interner`;
/// `lazy` defers each child the same way its parent is deferred.
pub enum NestedMode<'a> {
	Eager { interner: &'a dyn Interner },
	Lazy { module_lock: Arc<Mutex<()>> },
}

pub fn compute_nested_types(record: &TypeDefRecord, config: &Arc<Configuration>, mode: &NestedMode<'_>) -> Result<Arc<[TypeDefinitionHandle]>> {
	let mut out = Vec::new();
	for child in &record.nested_types {
		if !is_nested_type_visible(child.visibility, config) {
			continue;
		}
		let handle = match mode {
			NestedMode::Eager { interner } => TypeDefinitionHandle::Eager(build_type_definition(child, config, *interner)?),
			NestedMode::Lazy { module_lock } => TypeDefinitionHandle::Lazy(LazyTypeDefinition::new(child, config.clone(), module_lock.clone())?),
		};
		out.push(handle);
	}
	Ok(arc_slice(out))
}

/// §4.5 step 10: fields, properties, events, then non-accessor methods, each
/// respecting the member visibility filter (§4.4). Accessor methods are
/// embedded in their owning property/event, never emitted separately.
pub fn compute_members(record: &TypeDefRecord, kind: TypeKind, config: &Configuration, interner: &dyn Interner) -> Result<Arc<[UnresolvedMember]>> {
	let is_interface = kind == TypeKind::Interface;
	let default_member_name = decode_default_member_name(&record.attributes);
	let mut out = Vec::new();

	for field in &record.fields {
		if !is_member_visible(field.access, config) {
			continue;
		}
		out.push(UnresolvedMember::Field(build_field(field, record.token, config, interner)?));
	}

	for property in &record.properties {
		if let Some(p) = build_property(property, record.token, is_interface, default_member_name.as_deref(), config, interner)? {
			out.push(UnresolvedMember::Property(p));
		}
	}

	for event in &record.events {
		if let Some(e) = build_event(event, record.token, is_interface, config, interner)? {
			out.push(UnresolvedMember::Event(e));
		}
	}

	for method in &record.methods {
		if !is_top_level_method(method.semantics) {
			continue;
		}
		if !is_member_visible(method.access, config) {
			continue;
		}
		out.push(UnresolvedMember::Method(build_method(method, record.token, is_interface, config, interner)?));
	}

	Ok(arc_slice(out))
}

/// Entry point: builds an eager [`UnresolvedTypeDefinition`] in the mandatory
/// order of §4.5.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(r#type = %record.short_name)))]
pub fn build_type_definition(record: &TypeDefRecord, config: &Arc<Configuration>, interner: &dyn Interner) -> Result<Arc<UnresolvedTypeDefinition>> {
	let kind = compute_kind(record);
	let (accessibility, modifiers) = compute_modifiers(record);
	let type_parameters = compute_type_parameters(record, config, interner)?;
	let nested_types = compute_nested_types(record, config, &NestedMode::Eager { interner })?;
	let (attributes, has_extension_methods) = compute_attributes(record, kind, config, interner)?;
	let base_types = compute_base_types(record, kind, config, interner)?;
	let members = compute_members(record, kind, config, interner)?;

	Ok(Arc::new(UnresolvedTypeDefinition {
		token: record.token,
		namespace: interner.intern_str(&record.namespace),
		name: interner.intern_str(&record.short_name),
		kind,
		accessibility,
		modifiers,
		type_parameters,
		base_types,
		nested_types,
		members,
		attributes,
		has_extension_methods,
		add_default_constructor_if_required: matches!(kind, TypeKind::Struct | TypeKind::Enum),
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metadata::{Access, MethodSemantics, PrimitiveKind, ResolutionScope, TypeSignature};
	use crate::model::RealInterner;
	use crate::testutil::{empty_method, empty_type_def, getter_only_property, primitive_field};

	#[test]
	fn public_class_with_one_public_field_is_loaded() {
		let mut record = empty_type_def("N", "C");
		record.fields.push(primitive_field("F", Access::Public, PrimitiveKind::Int32));
		let config = Arc::new(Configuration::new());
		let interner = RealInterner::new();
		let def = build_type_definition(&record, &config, &interner).unwrap();
		assert_eq!(&*def.namespace, "N");
		assert_eq!(&*def.name, "C");
		assert_eq!(def.kind, TypeKind::Class);
		assert_eq!(def.members.len(), 1);
		match &def.members[0] {
			UnresolvedMember::Field(f) => {
				assert_eq!(f.accessibility, Accessibility::Public);
				assert!(!f.is_static);
				assert!(!f.is_readonly);
			}
			other => panic!("expected a field, got {other:?}"),
		}
	}

	#[test]
	fn enum_underlying_type_comes_from_first_instance_field() {
		let mut record = empty_type_def("N", "Color");
		record.base_type = Some(TypeSignature::TypeRef {
			scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
			namespace: "System".into(),
			name: "Enum".into(),
			is_value_type: false,
		});
		record.fields.push(primitive_field("value__", Access::Public, PrimitiveKind::Int32));
		let config = Arc::new(Configuration::new());
		let interner = RealInterner::new();
		let def = build_type_definition(&record, &config, &interner).unwrap();
		assert_eq!(def.kind, TypeKind::Enum);
		assert_eq!(def.base_types.len(), 1);
	}

	/// spec.md §8 scenario 2: `interface I { int P { get; } }` yields one
	/// property and its getter accessor, both public and abstract, no setter.
	#[test]
	fn interface_with_getter_only_property_is_public_abstract_with_no_setter() {
		let mut record = empty_type_def("N", "I");
		record.flags |= crate::metadata::TypeDefFlags::INTERFACE | crate::metadata::TypeDefFlags::ABSTRACT;
		record.properties.push(getter_only_property("P", PrimitiveKind::Int32));
		let config = Arc::new(Configuration::new());
		let interner = RealInterner::new();
		let def = build_type_definition(&record, &config, &interner).unwrap();

		assert_eq!(def.kind, TypeKind::Interface);
		assert_eq!(def.members.len(), 1);
		match &def.members[0] {
			UnresolvedMember::Property(p) => {
				assert_eq!(p.accessibility, Accessibility::Public);
				assert!(p.modifiers.is_abstract);
				assert!(p.setter.is_none());
				let getter = p.getter.as_ref().expect("getter must be present");
				assert_eq!(getter.accessibility, Accessibility::Public);
				assert!(getter.modifiers.is_abstract);
			}
			other => panic!("expected a property, got {other:?}"),
		}
	}

	/// spec.md §8 scenario 3: a static `[Extension]`-decorated method flags
	/// both the method and its owning type, and the attribute itself never
	/// appears in the output.
	#[test]
	fn extension_method_flags_type_and_method_without_leaking_the_attribute() {
		let mut record = empty_type_def("N", "Extensions");
		record.flags |= TypeDefFlags::SEALED | TypeDefFlags::ABSTRACT;
		let mut method = empty_method("Ext", Access::Public, MethodSemantics::None, TypeSignature::Primitive(PrimitiveKind::Int32));
		method.flags |= crate::metadata::MethodFlags::STATIC;
		method.attributes.push(crate::metadata::RawAttribute {
			attribute_type: TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System.Runtime.CompilerServices".into(),
				name: "ExtensionAttribute".into(),
				is_value_type: false,
			},
			ctor_param_types: Vec::new(),
			blob: vec![0x01, 0x00],
		});
		record.methods.push(method);

		let config = Arc::new(Configuration::new());
		let interner = RealInterner::new();
		let def = build_type_definition(&record, &config, &interner).unwrap();

		assert!(def.has_extension_methods);
		assert_eq!(def.members.len(), 1);
		match &def.members[0] {
			UnresolvedMember::Method(m) => {
				assert!(m.is_extension_method);
				assert!(m.attributes.is_empty());
			}
			other => panic!("expected a method, got {other:?}"),
		}
	}
}
