//! Member reader (§4.4): methods, fields, properties, events, parameters,
//! and type parameters, translated into unresolved members.
//!
//! Unlike type references, attribute records, and constants, members are not
//! an interned kind (§4.1's "required kinds" list names strings, boxed
//! primitives, immutable lists, attribute records, type references, and
//! constant values only) - each built member is simply wrapped in its own
//! `Arc` and owned by its declaring type's member list. A member's
//! `declaring_type` is carried as a bare [`MetadataToken`] rather than a
//! strong reference back to the owning [`UnresolvedTypeDefinition`](crate::model::type_def::UnresolvedTypeDefinition):
//! the type is itself built from this very member list, so a strong
//! back-reference would be a cycle. §8's "M.declaringType == T" invariant is
//! then just token equality, which callers can check against `T.token()`.

use std::sync::Arc;

use crate::config::Configuration;
use crate::error::Result;
use crate::metadata::{
	Access, EventRecord, FieldFlags, FieldRecord, GenericParamKind, MethodFlags, MethodOverride, MethodRecord, MethodSemantics,
	ParamFlags, ParameterRecord, PropertyRecord, RawAttribute, RawConstant, SpecialConstraints, TypeParameterRecord, TypeSignature,
	Variance,
};
use crate::model::attribute::{decode_custom_attributes, decode_method_attributes, field_synthesized_attributes, has_attribute, UnresolvedAttribute};
use crate::model::type_ref::{build_type_reference, ConstantPayload, ConstantValue, Cursors, TypeRefContext, UnresolvedTypeReference};
use crate::model::{arc_slice, Interner};
use crate::token::MetadataToken;

/// Translated CLI accessibility (§4.4): collapses the seven-way CLI `Access`
/// enum into the six C#-shaped buckets the rest of the model works with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Accessibility {
	Private,
	PrivateProtected,
	Internal,
	Protected,
	ProtectedInternal,
	Public,
}

/// Translates a CLI access level. `force_public` is set for members of
/// interface types, which §4.4 requires to read as `public abstract`
/// regardless of their own declared access.
pub fn translate_access(access: Access, force_public: bool) -> Accessibility {
	if force_public {
		return Accessibility::Public;
	}
	match access {
		Access::PrivateScope | Access::Private => Accessibility::Private,
		Access::FamAndAssem => Accessibility::PrivateProtected,
		Access::Assembly => Accessibility::Internal,
		Access::Family => Accessibility::Protected,
		Access::FamOrAssem => Accessibility::ProtectedInternal,
		Access::Public => Accessibility::Public,
	}
}

/// §4.4 "Properties": union (most permissive) of two visible accessors'
/// accessibility under the standard C# promotion rules - `protected ∪
/// internal` promotes to `protected internal`, everything else just takes
/// the more permissive of the two.
pub fn promote_accessibility(a: Accessibility, b: Accessibility) -> Accessibility {
	use Accessibility::*;
	fn rank(a: Accessibility) -> u8 {
		match a {
			Public => 5,
			ProtectedInternal => 4,
			Protected | Internal => 3,
			PrivateProtected => 1,
			Private => 0,
		}
	}
	match (a, b) {
		(Protected, Internal) | (Internal, Protected) => ProtectedInternal,
		_ if rank(a) >= rank(b) => a,
		_ => b,
	}
}

/// §4.4: a member is loaded iff its access level is public, family, or
/// fam-or-assem, or the loader is configured to include internals.
pub fn is_member_visible(access: Access, config: &Configuration) -> bool {
	matches!(access, Access::Public | Access::Family | Access::FamOrAssem) || config.include_internal_members
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Modifiers {
	pub is_static: bool,
	pub is_abstract: bool,
	pub is_sealed: bool,
	pub is_virtual: bool,
	pub is_override: bool,
}

/// §4.4's virtual/abstract/sealed/override derivation table.
fn derive_method_modifiers(is_static: bool, flags: MethodFlags) -> Modifiers {
	let abstract_ = flags.contains(MethodFlags::ABSTRACT);
	let final_ = flags.contains(MethodFlags::FINAL);
	let virtual_ = flags.contains(MethodFlags::VIRTUAL);
	let new_slot = flags.contains(MethodFlags::NEW_SLOT);
	let (is_abstract, is_sealed, is_virtual, is_override) = match (abstract_, final_, virtual_, new_slot) {
		(true, _, _, true) => (true, false, false, false),
		(true, _, _, false) => (true, false, false, true),
		(false, true, _, false) => (false, true, false, true),
		(false, false, true, true) => (false, false, true, false),
		(false, false, true, false) => (false, false, false, true),
		// Plain member, or a combination the table doesn't name (§7, §9:
		// internal assertions are diagnostic only - recover to "plain").
		_ => (false, false, false, false),
	};
	Modifiers { is_static, is_abstract, is_sealed, is_virtual, is_override }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParamPassing {
	Out,
	Ref,
	In,
}

fn passing_mode(ty: &TypeSignature, flags: ParamFlags) -> ParamPassing {
	match (matches!(ty, TypeSignature::ByRef(_)), flags.contains(ParamFlags::OUT)) {
		(true, true) => ParamPassing::Out,
		(true, false) => ParamPassing::Ref,
		(false, _) => ParamPassing::In,
	}
}

#[derive(Debug, Clone)]
pub struct UnresolvedParameter {
	pub name: Arc<str>,
	pub ty: Arc<UnresolvedTypeReference>,
	pub passing: ParamPassing,
	pub is_params: bool,
	pub default_value: Option<Arc<ConstantValue>>,
	pub marshal: Option<crate::metadata::MarshalAsInfo>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
}

pub fn build_raw_constant(raw: &RawConstant, ty: Arc<UnresolvedTypeReference>, interner: &dyn Interner) -> Arc<ConstantValue> {
	let payload = match raw {
		RawConstant::Bool(v) => ConstantPayload::Bool(*v),
		RawConstant::Char(v) => ConstantPayload::Char(*v),
		RawConstant::I1(v) => ConstantPayload::I1(*v),
		RawConstant::U1(v) => ConstantPayload::U1(*v),
		RawConstant::I2(v) => ConstantPayload::I2(*v),
		RawConstant::U2(v) => ConstantPayload::U2(*v),
		RawConstant::I4(v) => ConstantPayload::I4(*v),
		RawConstant::U4(v) => ConstantPayload::U4(*v),
		RawConstant::I8(v) => ConstantPayload::I8(*v),
		RawConstant::U8(v) => ConstantPayload::U8(*v),
		RawConstant::R4(v) => ConstantPayload::Single(*v),
		RawConstant::R8(v) => ConstantPayload::Double(*v),
		RawConstant::Str(v) => ConstantPayload::String(interner.intern_str(v)),
		RawConstant::NullRef => ConstantPayload::NullRef,
	};
	interner.intern_constant(ConstantValue { ty, payload })
}

fn build_parameter(
	record: &ParameterRecord,
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<UnresolvedParameter> {
	let ctx = TypeRefContext::from_attributes(&record.attributes, config);
	let mut cursor = Cursors::default();
	let ty = build_type_reference(&record.ty, &ctx, &mut cursor, interner, true)?;
	let is_params = matches!(record.ty, TypeSignature::Array { .. }) && has_attribute(&record.attributes, "System", "ParamArrayAttribute");
	let default_value = record
		.flags
		.contains(ParamFlags::OPTIONAL)
		.then(|| record.default_value.as_ref().map(|c| build_raw_constant(c, ty.clone(), interner)))
		.flatten();
	let mut attributes = decode_custom_attributes(&record.attributes, config, interner)?;
	if let Some(marshal) = &record.marshal {
		attributes.push(interner.intern_attribute(UnresolvedAttribute::MarshalAs(marshal.clone())));
	}
	Ok(UnresolvedParameter {
		name: interner.intern_str(&record.name),
		passing: passing_mode(&record.ty, record.flags),
		is_params,
		ty,
		default_value,
		marshal: record.marshal.clone(),
		attributes: arc_slice(attributes),
	})
}

/// Builds a method's fixed parameter list, appending the synthesized
/// trailing `__arglist` parameter for vararg methods (§4.4).
fn build_parameters(method: &MethodRecord, config: &Configuration, interner: &dyn Interner) -> Result<Vec<UnresolvedParameter>> {
	let mut out = Vec::with_capacity(method.parameters.len() + method.is_vararg as usize);
	for param in &method.parameters {
		out.push(build_parameter(param, config, interner)?);
	}
	if method.is_vararg {
		out.push(UnresolvedParameter {
			name: interner.intern_str(""),
			ty: interner.intern_type_ref(UnresolvedTypeReference::Known(crate::model::type_ref::KnownType::ArgList)),
			passing: ParamPassing::In,
			is_params: false,
			default_value: None,
			marshal: None,
			attributes: arc_slice(Vec::new()),
		});
	}
	Ok(out)
}

#[derive(Debug, Clone)]
pub struct UnresolvedTypeParameter {
	pub name: Arc<str>,
	pub position: u32,
	pub kind: GenericParamKind,
	pub variance: Variance,
	pub special_constraints: SpecialConstraints,
	pub constraints: Arc<[Arc<UnresolvedTypeReference>]>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
}

pub fn build_type_parameter(record: &TypeParameterRecord, config: &Configuration, interner: &dyn Interner) -> Result<Arc<UnresolvedTypeParameter>> {
	let ctx = TypeRefContext::from_attributes(&record.attributes, config);
	let mut constraints = Vec::with_capacity(record.constraints.len());
	for constraint in &record.constraints {
		let mut cursor = Cursors::default();
		constraints.push(build_type_reference(constraint, &ctx, &mut cursor, interner, true)?);
	}
	Ok(Arc::new(UnresolvedTypeParameter {
		name: interner.intern_str(&record.name),
		position: record.position,
		kind: record.kind,
		variance: record.variance,
		special_constraints: record.special_constraints,
		constraints: arc_slice(constraints),
		attributes: arc_slice(decode_custom_attributes(&record.attributes, config, interner)?),
	}))
}

/// §4.4 "Explicit interface implementations are detected by the presence of
/// method overrides together with a dot in the method name".
fn explicit_impl(
	name: &str,
	overrides: &[MethodOverride],
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<(Arc<str>, Vec<Arc<UnresolvedTypeReference>>)> {
	if overrides.is_empty() || !name.contains('.') {
		return Ok((interner.intern_str(name), Vec::new()));
	}
	let short = match config.shorten_interface_impl_names {
		true => name.rsplit('.').next().unwrap_or(name),
		false => name,
	};
	let empty_ctx = TypeRefContext::from_attributes(&[], config);
	let mut refs = Vec::with_capacity(overrides.len());
	for over in overrides {
		let mut cursor = Cursors::default();
		refs.push(build_type_reference(&over.interface_type, &empty_ctx, &mut cursor, interner, true)?);
	}
	Ok((interner.intern_str(short), refs))
}

#[derive(Debug, Clone)]
pub struct UnresolvedMethod {
	pub token: MetadataToken,
	pub declaring_type: MetadataToken,
	pub name: Arc<str>,
	pub accessibility: Accessibility,
	pub modifiers: Modifiers,
	pub is_extension_method: bool,
	pub type_parameters: Arc<[Arc<UnresolvedTypeParameter>]>,
	pub parameters: Arc<[UnresolvedParameter]>,
	pub return_type: Arc<UnresolvedTypeReference>,
	pub explicit_interface_impls: Arc<[Arc<UnresolvedTypeReference>]>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
	pub security_declarations: Arc<[Arc<crate::model::attribute::UnresolvedSecurityDeclaration>]>,
}

/// Builds a single method (§4.4). Used both for top-level methods and for
/// the accessor methods owned by properties and events - the semantic-flags
/// top-level filter lives in the caller (`type_def.rs`), not here.
pub fn build_method(
	record: &MethodRecord,
	declaring_type: MetadataToken,
	declaring_type_is_interface: bool,
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<Arc<UnresolvedMethod>> {
	let is_static = record.flags.contains(MethodFlags::STATIC);
	let (name, explicit_interface_impls) = explicit_impl(&record.name, &record.overrides, config, interner)?;

	let return_ctx = TypeRefContext::from_attributes(&record.return_attributes, config);
	let mut cursor = Cursors::default();
	let return_type = build_type_reference(&record.return_type, &return_ctx, &mut cursor, interner, true)?;

	let mut type_parameters = Vec::with_capacity(record.generic_parameters.len());
	for tp in &record.generic_parameters {
		type_parameters.push(build_type_parameter(tp, config, interner)?);
	}

	let is_extension_method = is_static && has_attribute(&record.attributes, "System.Runtime.CompilerServices", "ExtensionAttribute");

	// §4.4 "members of interface types force `public abstract`" - accessibility
	// above, modifiers here. Static interface members (C# 8+ default/virtual
	// statics) keep their own derived modifiers since they may carry a body.
	let modifiers = match declaring_type_is_interface && !is_static {
		true => Modifiers { is_abstract: true, ..Default::default() },
		false => derive_method_modifiers(is_static, record.flags),
	};

	Ok(Arc::new(UnresolvedMethod {
		token: record.token,
		declaring_type,
		name,
		accessibility: translate_access(record.access, declaring_type_is_interface),
		modifiers,
		is_extension_method,
		type_parameters: arc_slice(type_parameters),
		parameters: build_parameters(record, config, interner)?.into(),
		return_type,
		explicit_interface_impls: arc_slice(explicit_interface_impls),
		attributes: arc_slice(decode_method_attributes(record, config, interner)?),
		security_declarations: arc_slice(crate::model::attribute::decode_security_declarations(&record.security_declarations)),
	}))
}

#[derive(Debug, Clone)]
pub struct UnresolvedField {
	pub token: MetadataToken,
	pub declaring_type: MetadataToken,
	pub name: Arc<str>,
	pub accessibility: Accessibility,
	pub is_static: bool,
	pub is_readonly: bool,
	pub is_volatile: bool,
	pub ty: Arc<UnresolvedTypeReference>,
	pub constant: Option<Arc<ConstantValue>>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
}

fn has_volatile_modifier(ty: &TypeSignature) -> bool {
	match ty {
		TypeSignature::Modifier { required: true, namespace, name, element } => {
			(namespace == "System.Runtime.CompilerServices" && name == "IsVolatile") || has_volatile_modifier(element)
		}
		TypeSignature::Modifier { element, .. } | TypeSignature::Pinned(element) => has_volatile_modifier(element),
		_ => false,
	}
}

/// §4.4 "Fields": a `DecimalConstantAttribute` reconstructs a 128-bit
/// decimal, overriding the field's own constant slot. Any malformed blob
/// (wrong arity, wrong argument types, wrong prolog) silently yields no
/// constant at all (§7) - it does not fall back to the raw constant slot.
fn build_field_constant(field: &FieldRecord, ty: Arc<UnresolvedTypeReference>, interner: &dyn Interner) -> Option<Arc<ConstantValue>> {
	if has_attribute(&field.attributes, "System.Runtime.CompilerServices", "DecimalConstantAttribute") {
		return crate::model::type_ref::decode_decimal_constant(&field.attributes)
			.map(|d| interner.intern_constant(ConstantValue { ty, payload: ConstantPayload::Decimal(d) }));
	}
	field.constant.as_ref().map(|c| build_raw_constant(c, ty, interner))
}

pub fn build_field(record: &FieldRecord, declaring_type: MetadataToken, config: &Configuration, interner: &dyn Interner) -> Result<Arc<UnresolvedField>> {
	let ctx = TypeRefContext::from_attributes(&record.attributes, config);
	let mut cursor = Cursors::default();
	let ty = build_type_reference(&record.ty, &ctx, &mut cursor, interner, true)?;

	let mut attributes = decode_custom_attributes(&record.attributes, config, interner)?;
	attributes.extend(field_synthesized_attributes(
		record.offset,
		record.flags.contains(FieldFlags::NOT_SERIALIZED),
		record.marshal.as_ref(),
		interner,
	));

	Ok(Arc::new(UnresolvedField {
		token: record.token,
		declaring_type,
		name: interner.intern_str(&record.name),
		accessibility: translate_access(record.access, false),
		is_static: record.flags.contains(FieldFlags::STATIC),
		is_readonly: record.flags.contains(FieldFlags::INIT_ONLY),
		is_volatile: has_volatile_modifier(&record.ty),
		constant: build_field_constant(record, ty.clone(), interner),
		ty,
		attributes: arc_slice(attributes),
	}))
}

#[derive(Debug, Clone)]
pub struct UnresolvedProperty {
	pub token: MetadataToken,
	pub declaring_type: MetadataToken,
	pub name: Arc<str>,
	pub accessibility: Accessibility,
	pub modifiers: Modifiers,
	pub ty: Arc<UnresolvedTypeReference>,
	pub is_indexer: bool,
	pub parameters: Arc<[UnresolvedParameter]>,
	pub getter: Option<Arc<UnresolvedMethod>>,
	pub setter: Option<Arc<UnresolvedMethod>>,
	pub explicit_interface_impls: Arc<[Arc<UnresolvedTypeReference>]>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
}

/// Decodes an owning type's `DefaultMemberAttribute` constructor string, used
/// by the indexer heuristic below.
pub fn decode_default_member_name(type_attributes: &[RawAttribute]) -> Option<String> {
	let attr = type_attributes.iter().find(|a| a.is_named("System.Reflection", "DefaultMemberAttribute"))?;
	let mut reader = crate::blob::BlobReader::new(&attr.blob);
	reader.expect_prolog()?;
	reader.read_ser_string()?
}

/// §4.4 "Kind = indexer when the property has parameters and either the
/// property name matches the default-member name, or the property name ends
/// in `.Item` with overrides". Known to misclassify a property literally
/// named `Item` that isn't an indexer (§9 Open Question) - preserved as
/// specified, not fixed here.
fn is_indexer(name: &str, has_parameters: bool, has_overrides: bool, default_member_name: Option<&str>) -> bool {
	has_parameters && (default_member_name == Some(name) || (has_overrides && name.ends_with(".Item")))
}

pub fn build_property(
	record: &PropertyRecord,
	declaring_type: MetadataToken,
	declaring_type_is_interface: bool,
	default_member_name: Option<&str>,
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<Option<Arc<UnresolvedProperty>>> {
	let getter = record
		.getter
		.as_ref()
		.filter(|m| is_member_visible(m.access, config))
		.map(|m| build_method(m, declaring_type, declaring_type_is_interface, config, interner))
		.transpose()?;
	let setter = record
		.setter
		.as_ref()
		.filter(|m| is_member_visible(m.access, config))
		.map(|m| build_method(m, declaring_type, declaring_type_is_interface, config, interner))
		.transpose()?;

	if getter.is_none() && setter.is_none() {
		return Ok(None);
	}

	let accessibility = match (&getter, &setter) {
		(Some(g), Some(s)) => promote_accessibility(g.accessibility, s.accessibility),
		(Some(g), None) => g.accessibility,
		(None, Some(s)) => s.accessibility,
		(None, None) => unreachable!(),
	};
	let modifiers = getter.as_ref().or(setter.as_ref()).map(|m| m.modifiers).unwrap_or_default();
	let (name, explicit_interface_impls) = getter
		.as_ref()
		.or(setter.as_ref())
		.map(|m| (m.name.clone(), m.explicit_interface_impls.clone()))
		.unwrap_or_else(|| (interner.intern_str(&record.name), arc_slice(Vec::new())));

	let ctx = TypeRefContext::from_attributes(&record.attributes, config);
	let mut cursor = Cursors::default();
	let ty = build_type_reference(&record.ty, &ctx, &mut cursor, interner, true)?;

	let mut parameters = Vec::with_capacity(record.parameters.len());
	for param in &record.parameters {
		parameters.push(build_parameter(param, config, interner)?);
	}

	let has_overrides = record.getter.as_ref().is_some_and(|m| !m.overrides.is_empty())
		|| record.setter.as_ref().is_some_and(|m| !m.overrides.is_empty());

	Ok(Some(Arc::new(UnresolvedProperty {
		token: record.token,
		declaring_type,
		is_indexer: is_indexer(&record.name, !parameters.is_empty(), has_overrides, default_member_name),
		name,
		accessibility,
		modifiers,
		ty,
		parameters: parameters.into(),
		getter,
		setter,
		explicit_interface_impls,
		attributes: arc_slice(decode_custom_attributes(&record.attributes, config, interner)?),
	})))
}

#[derive(Debug, Clone)]
pub struct UnresolvedEvent {
	pub token: MetadataToken,
	pub declaring_type: MetadataToken,
	pub name: Arc<str>,
	pub accessibility: Accessibility,
	pub modifiers: Modifiers,
	pub event_type: Arc<UnresolvedTypeReference>,
	pub add: Arc<UnresolvedMethod>,
	pub remove: Arc<UnresolvedMethod>,
	pub invoke: Option<Arc<UnresolvedMethod>>,
	pub explicit_interface_impls: Arc<[Arc<UnresolvedTypeReference>]>,
	pub attributes: Arc<[Arc<UnresolvedAttribute>]>,
}

pub fn build_event(
	record: &EventRecord,
	declaring_type: MetadataToken,
	declaring_type_is_interface: bool,
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<Option<Arc<UnresolvedEvent>>> {
	if !is_member_visible(record.add.access, config) {
		return Ok(None);
	}
	let add = build_method(&record.add, declaring_type, declaring_type_is_interface, config, interner)?;
	let remove = build_method(&record.remove, declaring_type, declaring_type_is_interface, config, interner)?;
	let invoke = record
		.invoke
		.as_ref()
		.map(|m| build_method(m, declaring_type, declaring_type_is_interface, config, interner))
		.transpose()?;

	let explicit_interface_impls =
		(!add.explicit_interface_impls.is_empty()).then(|| add.explicit_interface_impls.clone()).unwrap_or_else(|| remove.explicit_interface_impls.clone());

	let ctx = TypeRefContext::from_attributes(&record.attributes, config);
	let mut cursor = Cursors::default();
	let event_type = build_type_reference(&record.event_type, &ctx, &mut cursor, interner, true)?;

	Ok(Some(Arc::new(UnresolvedEvent {
		token: record.token,
		declaring_type,
		name: add.name.clone(),
		accessibility: add.accessibility,
		modifiers: add.modifiers,
		event_type,
		add: add.clone(),
		remove,
		invoke,
		explicit_interface_impls,
		attributes: arc_slice(decode_custom_attributes(&record.attributes, config, interner)?),
	})))
}

/// A top-level (or accessor-less) member, keyed by the four kinds §3 names.
#[derive(Debug, Clone)]
pub enum UnresolvedMember {
	Method(Arc<UnresolvedMethod>),
	Field(Arc<UnresolvedField>),
	Property(Arc<UnresolvedProperty>),
	Event(Arc<UnresolvedEvent>),
}

impl UnresolvedMember {
	pub fn declaring_type(&self) -> MetadataToken {
		match self {
			UnresolvedMember::Method(m) => m.declaring_type,
			UnresolvedMember::Field(f) => f.declaring_type,
			UnresolvedMember::Property(p) => p.declaring_type,
			UnresolvedMember::Event(e) => e.declaring_type,
		}
	}

	pub fn name(&self) -> &Arc<str> {
		match self {
			UnresolvedMember::Method(m) => &m.name,
			UnresolvedMember::Field(f) => &f.name,
			UnresolvedMember::Property(p) => &p.name,
			UnresolvedMember::Event(e) => &e.name,
		}
	}
}

/// §4.4 "Methods with non-`None`/`Other` semantic flags (accessors) are not
/// emitted as top-level members". Applied by the type-definition reader when
/// assembling a type's member list.
pub fn is_top_level_method(semantics: MethodSemantics) -> bool {
	matches!(semantics, MethodSemantics::None | MethodSemantics::Other)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn abstract_newslot_is_abstract() {
		let m = derive_method_modifiers(false, MethodFlags::ABSTRACT | MethodFlags::NEW_SLOT | MethodFlags::VIRTUAL);
		assert!(m.is_abstract && !m.is_override);
	}

	#[test]
	fn abstract_without_newslot_is_abstract_override() {
		let m = derive_method_modifiers(false, MethodFlags::ABSTRACT | MethodFlags::VIRTUAL);
		assert!(m.is_abstract && m.is_override);
	}

	#[test]
	fn final_without_newslot_is_sealed_override() {
		let m = derive_method_modifiers(false, MethodFlags::FINAL | MethodFlags::VIRTUAL);
		assert!(m.is_sealed && m.is_override && !m.is_virtual);
	}

	#[test]
	fn virtual_newslot_is_plain_virtual() {
		let m = derive_method_modifiers(false, MethodFlags::VIRTUAL | MethodFlags::NEW_SLOT);
		assert!(m.is_virtual && !m.is_override);
	}

	#[test]
	fn virtual_without_newslot_is_override() {
		let m = derive_method_modifiers(false, MethodFlags::VIRTUAL);
		assert!(m.is_override && !m.is_virtual);
	}

	#[test]
	fn plain_method_has_no_modifiers() {
		let m = derive_method_modifiers(false, MethodFlags::empty());
		assert_eq!(m, Modifiers { is_static: false, ..Default::default() });
	}

	#[test]
	fn protected_union_internal_promotes_to_protected_internal() {
		let promoted = promote_accessibility(Accessibility::Protected, Accessibility::Internal);
		assert_eq!(promoted, Accessibility::ProtectedInternal);
	}

	#[test]
	fn public_dominates_every_other_accessibility() {
		assert_eq!(promote_accessibility(Accessibility::Public, Accessibility::Private), Accessibility::Public);
	}
}
