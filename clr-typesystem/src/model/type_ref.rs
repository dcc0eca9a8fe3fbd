//! Type-reference builder (§4.2) and value-tuple flattening (§4.2.1).
//!
//! Translates the recursive [`TypeSignature`](crate::metadata::TypeSignature)
//! grammar into an [`UnresolvedTypeReference`], threading the `dynamicIndex`/
//! `tupleIndex` cursors spec.md describes as "parallel attribute-driven
//! state": both track a position in a pre-order walk of the signature being
//! translated, consulted against the entity's own `DynamicAttribute`/
//! `TupleElementNamesAttribute` markers.

use std::sync::Arc;

use crate::blob::BlobReader;
use crate::config::Configuration;
use crate::error::Result;
use crate::metadata::{GenericParamKind, PrimitiveKind, RawAttribute, ResolutionScope, TypeSignature};
use crate::model::{arc_slice, Interner};
use crate::token::MetadataToken;

/// A known singleton the loader never needs to construct more than
/// structurally: primitives, `void`, `object`, `dynamic`, `arglist`,
/// `unknown` (§9, "Global state is limited to a few singleton type-
/// references").
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KnownType {
	Void,
	Object,
	Dynamic,
	ArgList,
	Unknown,
	Primitive(NumericPrimitive),
}

/// Primitives other than `void`/`object`, which get their own `KnownType`
/// variants because they participate in the dynamic-index/object-slot logic
/// of §4.2 case 7.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NumericPrimitive {
	Boolean,
	Char,
	Int8,
	UInt8,
	Int16,
	UInt16,
	Int32,
	UInt32,
	Int64,
	UInt64,
	Float32,
	Float64,
	String,
	IntPtr,
	UIntPtr,
	TypedReference,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum AssemblyRef {
	CurrentAssembly,
	Named(Arc<str>),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum UnresolvedTypeReference {
	Known(KnownType),
	Pointer(Arc<UnresolvedTypeReference>),
	ByRef(Arc<UnresolvedTypeReference>),
	Array { element: Arc<UnresolvedTypeReference>, rank: u32 },
	GenericInstance { open: Arc<UnresolvedTypeReference>, args: Arc<[Arc<UnresolvedTypeReference>]> },
	Tuple { elements: Arc<[Arc<UnresolvedTypeReference>]>, names: Arc<[Option<Arc<str>>]> },
	TypeParameter { kind: GenericParamKind, position: u32 },
	Nested { declaring: Arc<UnresolvedTypeReference>, name: Arc<str>, arity: u32, is_reference_type: Option<bool> },
	Named { assembly: AssemblyRef, namespace: Arc<str>, name: Arc<str>, arity: u32, is_reference_type: Option<bool> },
	/// A reference to a `TypeDefinition` within the assembly being loaded,
	/// resolved later (§4.2 case 10) once the rest of the assembly exists.
	Token(MetadataToken),
}

impl std::fmt::Display for UnresolvedTypeReference {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			UnresolvedTypeReference::Known(KnownType::Void) => write!(f, "void"),
			UnresolvedTypeReference::Known(KnownType::Object) => write!(f, "object"),
			UnresolvedTypeReference::Known(KnownType::Dynamic) => write!(f, "dynamic"),
			UnresolvedTypeReference::Known(KnownType::ArgList) => write!(f, "__arglist"),
			UnresolvedTypeReference::Known(KnownType::Unknown) => write!(f, "?"),
			UnresolvedTypeReference::Known(KnownType::Primitive(p)) => write!(f, "{}", numeric_primitive_name(*p)),
			UnresolvedTypeReference::Pointer(inner) => write!(f, "{inner}*"),
			UnresolvedTypeReference::ByRef(inner) => write!(f, "{inner}&"),
			UnresolvedTypeReference::Array { element, rank } => {
				write!(f, "{element}[{}]", ",".repeat(rank.saturating_sub(1) as usize))
			}
			UnresolvedTypeReference::GenericInstance { open, args } => {
				write!(f, "{open}<")?;
				for (i, a) in args.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{a}")?;
				}
				write!(f, ">")
			}
			UnresolvedTypeReference::Tuple { elements, .. } => {
				write!(f, "(")?;
				for (i, a) in elements.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{a}")?;
				}
				write!(f, ")")
			}
			UnresolvedTypeReference::TypeParameter { kind, position } => match kind {
				GenericParamKind::Type => write!(f, "!{position}"),
				GenericParamKind::Method => write!(f, "!!{position}"),
			},
			UnresolvedTypeReference::Nested { declaring, name, .. } => write!(f, "{declaring}.{name}"),
			UnresolvedTypeReference::Named { namespace, name, .. } => match namespace.is_empty() {
				true => write!(f, "{name}"),
				false => write!(f, "{namespace}.{name}"),
			},
			UnresolvedTypeReference::Token(token) => write!(f, "{token:?}"),
		}
	}
}

fn numeric_primitive_name(p: NumericPrimitive) -> &'static str {
	match p {
		NumericPrimitive::Boolean => "bool",
		NumericPrimitive::Char => "char",
		NumericPrimitive::Int8 => "sbyte",
		NumericPrimitive::UInt8 => "byte",
		NumericPrimitive::Int16 => "short",
		NumericPrimitive::UInt16 => "ushort",
		NumericPrimitive::Int32 => "int",
		NumericPrimitive::UInt32 => "uint",
		NumericPrimitive::Int64 => "long",
		NumericPrimitive::UInt64 => "ulong",
		NumericPrimitive::Float32 => "float",
		NumericPrimitive::Float64 => "double",
		NumericPrimitive::String => "string",
		NumericPrimitive::IntPtr => "System.IntPtr",
		NumericPrimitive::UIntPtr => "System.UIntPtr",
		NumericPrimitive::TypedReference => "System.TypedReference",
	}
}

/// §4.2's `dynamicIndex`/`tupleIndex` cursors, threaded by mutable
/// reference through the recursive builder.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cursors {
	pub dynamic_index: u32,
	pub tuple_index: u32,
}

/// Which positions of the signature being built are flagged `dynamic`, read
/// once from the attribute-provider's `DynamicAttribute` (§4.2 case 7).
#[derive(Debug, Clone)]
pub enum DynamicFlags {
	/// A parameterless `[Dynamic]` - every `object` slot is `dynamic`.
	All,
	PerIndex(Vec<bool>),
}

impl DynamicFlags {
	pub fn at(&self, index: u32) -> bool {
		match self {
			DynamicFlags::All => true,
			DynamicFlags::PerIndex(flags) => flags.get(index as usize).copied().unwrap_or(false),
		}
	}
}

/// Decodes a `DynamicAttribute` from an entity's raw attribute list, if
/// present. A malformed blob yields `None` (§7): the slot then reads as "not
/// dynamic" everywhere, never aborts the load.
pub fn decode_dynamic_flags(attributes: &[RawAttribute]) -> Option<DynamicFlags> {
	let attr = attributes
		.iter()
		.find(|a| a.is_named("System.Runtime.CompilerServices", "DynamicAttribute"))?;
	if attr.ctor_param_types.is_empty() {
		return Some(DynamicFlags::All);
	}
	let mut reader = BlobReader::new(&attr.blob);
	reader.expect_prolog()?;
	let flags = reader.read_array(|r| r.read_u8().map(|b| b != 0))?;
	Some(DynamicFlags::PerIndex(flags))
}

/// Decodes a `TupleElementNamesAttribute`'s `string[]` constructor argument.
/// Missing attribute or malformed blob yields an empty list, which reads as
/// "every tuple element is unnamed" (§7).
pub fn decode_tuple_names(attributes: &[RawAttribute]) -> Vec<Option<String>> {
	let Some(attr) = attributes
		.iter()
		.find(|a| a.is_named("System.Runtime.CompilerServices", "TupleElementNamesAttribute"))
	else {
		return Vec::new();
	};
	let mut reader = BlobReader::new(&attr.blob);
	(|| -> Option<Vec<Option<String>>> {
		reader.expect_prolog()?;
		reader.read_array(|r| r.read_ser_string())
	})()
	.unwrap_or_default()
}

/// Everything the builder needs about the entity whose attributes carry the
/// `Dynamic`/`TupleElementNames` markers for the signature being translated.
pub struct TypeRefContext {
	pub dynamic: Option<DynamicFlags>,
	pub tuple_names: Vec<Option<String>>,
	pub use_dynamic_type: bool,
	pub use_tuple_types: bool,
}

impl TypeRefContext {
	pub fn from_attributes(attributes: &[RawAttribute], config: &Configuration) -> Self {
		Self {
			dynamic: config.use_dynamic_type.then(|| decode_dynamic_flags(attributes)).flatten(),
			tuple_names: if config.use_tuple_types { decode_tuple_names(attributes) } else { Vec::new() },
			use_dynamic_type: config.use_dynamic_type,
			use_tuple_types: config.use_tuple_types,
		}
	}

	fn is_dynamic_at(&self, index: u32) -> bool {
		self.use_dynamic_type && self.dynamic.as_ref().is_some_and(|d| d.at(index))
	}

	fn tuple_name_at(&self, index: u32) -> Option<&str> {
		self.tuple_names.get(index as usize).and_then(|n| n.as_deref())
	}
}

fn known_primitive(kind: PrimitiveKind) -> UnresolvedTypeReference {
	use NumericPrimitive as N;
	UnresolvedTypeReference::Known(match kind {
		PrimitiveKind::Void => KnownType::Void,
		PrimitiveKind::Object => KnownType::Object,
		PrimitiveKind::Boolean => KnownType::Primitive(N::Boolean),
		PrimitiveKind::Char => KnownType::Primitive(N::Char),
		PrimitiveKind::Int8 => KnownType::Primitive(N::Int8),
		PrimitiveKind::UInt8 => KnownType::Primitive(N::UInt8),
		PrimitiveKind::Int16 => KnownType::Primitive(N::Int16),
		PrimitiveKind::UInt16 => KnownType::Primitive(N::UInt16),
		PrimitiveKind::Int32 => KnownType::Primitive(N::Int32),
		PrimitiveKind::UInt32 => KnownType::Primitive(N::UInt32),
		PrimitiveKind::Int64 => KnownType::Primitive(N::Int64),
		PrimitiveKind::UInt64 => KnownType::Primitive(N::UInt64),
		PrimitiveKind::Float32 => KnownType::Primitive(N::Float32),
		PrimitiveKind::Float64 => KnownType::Primitive(N::Float64),
		PrimitiveKind::String => KnownType::Primitive(N::String),
		PrimitiveKind::IntPtr => KnownType::Primitive(N::IntPtr),
		PrimitiveKind::UIntPtr => KnownType::Primitive(N::UIntPtr),
		PrimitiveKind::TypedReference => KnownType::Primitive(N::TypedReference),
	})
}

/// §4.2.1: `open`'s display name starts with `ValueTuple\`` in namespace
/// `System`, and its arity matches the instantiation's argument count.
fn is_value_tuple_open(open: &TypeSignature, arity: usize) -> bool {
	match open.simple_name() {
		Some(("System", name)) => {
			let (base, n) = TypeSignature::split_arity(name);
			base == "ValueTuple" && n as usize == arity
		}
		_ => false,
	}
}

fn as_value_tuple_instance(sig: &TypeSignature) -> Option<&[TypeSignature]> {
	match sig {
		TypeSignature::GenericInstance { open, args } if is_value_tuple_open(open, args.len()) => Some(args),
		_ => None,
	}
}

/// Entry point: translate `sig` into an [`UnresolvedTypeReference`].
///
/// `attribute_provider` is the attribute list of the entity `sig` belongs to
/// (the "attribute provider A" of §4.2); `is_from_signature` is the context
/// flag of the same section, true whenever `sig` came from a method/field
/// signature or type-spec (where `IsValueType` can be trusted).
pub fn build_type_reference(
	sig: &TypeSignature,
	ctx: &TypeRefContext,
	cursor: &mut Cursors,
	interner: &dyn Interner,
	is_from_signature: bool,
) -> Result<Arc<UnresolvedTypeReference>> {
	let reference = match sig {
		// `dynamicIndex` was already advanced to this slot's position by
		// whichever caller entered it (a compound-constructor entry point,
		// or a generic-arg slot); consuming the slot itself is a second,
		// separate advance (§4.2: "incremented on entering a compound
		// constructor ... and once for each consumed object slot").
		TypeSignature::Primitive(PrimitiveKind::Object) => {
			let index = cursor.dynamic_index;
			cursor.dynamic_index += 1;
			match ctx.is_dynamic_at(index) {
				true => UnresolvedTypeReference::Known(KnownType::Dynamic),
				false => UnresolvedTypeReference::Known(KnownType::Object),
			}
		}
		TypeSignature::Primitive(p) => known_primitive(*p),

		TypeSignature::Pointer(inner) => {
			cursor.dynamic_index += 1;
			let elem = build_type_reference(inner, ctx, cursor, interner, is_from_signature)?;
			UnresolvedTypeReference::Pointer(elem)
		}
		TypeSignature::ByRef(inner) => {
			cursor.dynamic_index += 1;
			let elem = build_type_reference(inner, ctx, cursor, interner, is_from_signature)?;
			UnresolvedTypeReference::ByRef(elem)
		}
		TypeSignature::GenericParam { kind, position } => {
			UnresolvedTypeReference::TypeParameter { kind: *kind, position: *position }
		}
		TypeSignature::Array { element, rank } => {
			cursor.dynamic_index += 1;
			let elem = build_type_reference(element, ctx, cursor, interner, is_from_signature)?;
			UnresolvedTypeReference::Array { element: elem, rank: *rank }
		}
		TypeSignature::GenericInstance { open, args } => {
			if ctx.use_tuple_types && as_value_tuple_instance(sig).is_some() {
				return build_value_tuple(args, ctx, cursor, interner, is_from_signature);
			}
			let open_ref = build_type_reference(open, ctx, cursor, interner, is_from_signature)?;
			let mut built_args = Vec::with_capacity(args.len());
			for arg in args {
				cursor.dynamic_index += 1;
				built_args.push(build_type_reference(arg, ctx, cursor, interner, is_from_signature)?);
			}
			UnresolvedTypeReference::GenericInstance { open: open_ref, args: arc_slice(built_args) }
		}
		// §4.2 case 6: unrepresentable in this type system, substitute native int.
		TypeSignature::FunctionPointer => UnresolvedTypeReference::Known(KnownType::Primitive(NumericPrimitive::IntPtr)),
		// §4.2 case 8: modreq/modopt/pinned transparently unwrap, consuming
		// no slot of their own.
		TypeSignature::Modifier { element, .. } => {
			return build_type_reference(element, ctx, cursor, interner, is_from_signature);
		}
		TypeSignature::Pinned(inner) => {
			return build_type_reference(inner, ctx, cursor, interner, is_from_signature);
		}
		TypeSignature::Sentinel => UnresolvedTypeReference::Known(KnownType::ArgList),
		TypeSignature::TypeDef(token) => UnresolvedTypeReference::Token(*token),
		TypeSignature::TypeRef { scope, namespace, name, is_value_type } => {
			let (base, arity) = TypeSignature::split_arity(name);
			UnresolvedTypeReference::Named {
				assembly: build_scope(scope, interner),
				namespace: interner.intern_str(namespace),
				name: interner.intern_str(base),
				arity,
				is_reference_type: is_from_signature.then_some(!is_value_type),
			}
		}
		TypeSignature::NestedTypeRef { declaring, name, is_value_type } => {
			let decl = build_type_reference(declaring, ctx, cursor, interner, is_from_signature)?;
			let (base, arity) = TypeSignature::split_arity(name);
			UnresolvedTypeReference::Nested {
				declaring: decl,
				name: interner.intern_str(base),
				arity,
				is_reference_type: is_from_signature.then_some(!is_value_type),
			}
		}
	};
	Ok(interner.intern_type_ref(reference))
}

fn build_scope(scope: &ResolutionScope, interner: &dyn Interner) -> AssemblyRef {
	match scope {
		ResolutionScope::CurrentModule => AssemblyRef::CurrentAssembly,
		ResolutionScope::AssemblyRef(name) => AssemblyRef::Named(interner.intern_str(name)),
	}
}

/// §4.2.1: flattens the `TRest` chain depth-first, threading the same
/// dynamic-index discipline case 5 applies to ordinary generic arguments.
fn collect_tuple_elements(
	args: &[TypeSignature],
	ctx: &TypeRefContext,
	cursor: &mut Cursors,
	interner: &dyn Interner,
	is_from_signature: bool,
	out: &mut Vec<Arc<UnresolvedTypeReference>>,
) -> Result<()> {
	let direct = args.len().min(7);
	for arg in &args[..direct] {
		cursor.dynamic_index += 1;
		out.push(build_type_reference(arg, ctx, cursor, interner, is_from_signature)?);
	}
	if args.len() == 8 {
		cursor.dynamic_index += 1;
		match as_value_tuple_instance(&args[7]) {
			Some(rest) => collect_tuple_elements(rest, ctx, cursor, interner, is_from_signature, out)?,
			// Internal assertion failure (§7, §9): TRest wasn't itself a
			// value tuple. Diagnostic only - recover by treating it as an
			// ordinary element instead of aborting the load.
			None => out.push(build_type_reference(&args[7], ctx, cursor, interner, is_from_signature)?),
		}
	}
	Ok(())
}

fn build_value_tuple(
	args: &[TypeSignature],
	ctx: &TypeRefContext,
	cursor: &mut Cursors,
	interner: &dyn Interner,
	is_from_signature: bool,
) -> Result<Arc<UnresolvedTypeReference>> {
	let mut elements = Vec::new();
	collect_tuple_elements(args, ctx, cursor, interner, is_from_signature, &mut elements)?;

	// §4.2.1: cardinality 1 is unrepresentable and collapses to its single
	// argument, but still consumes a tuple-name slot.
	if elements.len() == 1 {
		cursor.tuple_index += 1;
		return Ok(elements.into_iter().next().unwrap());
	}

	let mut names = Vec::with_capacity(elements.len());
	for i in 0..elements.len() {
		let name = ctx.tuple_name_at(cursor.tuple_index + i as u32).map(|n| interner.intern_str(n));
		names.push(name);
	}
	cursor.tuple_index += elements.len() as u32;

	Ok(interner.intern_type_ref(UnresolvedTypeReference::Tuple {
		elements: arc_slice(elements),
		names: arc_slice(names),
	}))
}

/// §3 "Constant value": a type paired with a boxed primitive payload.
#[derive(Debug, Clone)]
pub struct ConstantValue {
	pub ty: Arc<UnresolvedTypeReference>,
	pub payload: ConstantPayload,
}

impl PartialEq for ConstantValue {
	fn eq(&self, other: &Self) -> bool {
		self.ty == other.ty && self.payload == other.payload
	}
}
impl Eq for ConstantValue {}
impl std::hash::Hash for ConstantValue {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.ty.hash(state);
		self.payload.hash(state);
	}
}

#[derive(Debug, Clone)]
pub enum ConstantPayload {
	Bool(bool),
	Char(char),
	I1(i8),
	U1(u8),
	I2(i16),
	U2(u16),
	I4(i32),
	U4(u32),
	I8(i64),
	U8(u64),
	Single(f32),
	Double(f64),
	String(Arc<str>),
	NullRef,
	Decimal(Decimal128),
}

impl PartialEq for ConstantPayload {
	fn eq(&self, other: &Self) -> bool {
		use ConstantPayload::*;
		match (self, other) {
			(Bool(a), Bool(b)) => a == b,
			(Char(a), Char(b)) => a == b,
			(I1(a), I1(b)) => a == b,
			(U1(a), U1(b)) => a == b,
			(I2(a), I2(b)) => a == b,
			(U2(a), U2(b)) => a == b,
			(I4(a), I4(b)) => a == b,
			(U4(a), U4(b)) => a == b,
			(I8(a), I8(b)) => a == b,
			(U8(a), U8(b)) => a == b,
			(Single(a), Single(b)) => a.to_bits() == b.to_bits(),
			(Double(a), Double(b)) => a.to_bits() == b.to_bits(),
			(String(a), String(b)) => a == b,
			(NullRef, NullRef) => true,
			(Decimal(a), Decimal(b)) => a == b,
			_ => false,
		}
	}
}
impl Eq for ConstantPayload {}
impl std::hash::Hash for ConstantPayload {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		use ConstantPayload::*;
		match self {
			Bool(v) => v.hash(state),
			Char(v) => v.hash(state),
			I1(v) => v.hash(state),
			U1(v) => v.hash(state),
			I2(v) => v.hash(state),
			U2(v) => v.hash(state),
			I4(v) => v.hash(state),
			U4(v) => v.hash(state),
			I8(v) => v.hash(state),
			U8(v) => v.hash(state),
			Single(v) => v.to_bits().hash(state),
			Double(v) => v.to_bits().hash(state),
			String(v) => v.hash(state),
			NullRef => {}
			Decimal(v) => v.hash(state),
		}
	}
}

/// A 128-bit decimal reconstructed from a `DecimalConstantAttribute` blob
/// (§4.4 "Fields"): `(hi, mid, low)` form a 96-bit unsigned mantissa, scaled
/// by `10^-scale`, negated when `negative`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Decimal128 {
	pub low: u32,
	pub mid: u32,
	pub high: u32,
	pub scale: u8,
	pub negative: bool,
}

impl std::fmt::Display for Decimal128 {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mantissa = ((self.high as u128) << 64) | ((self.mid as u128) << 32) | self.low as u128;
		let digits = mantissa.to_string();
		let scale = self.scale as usize;
		if self.negative {
			write!(f, "-")?;
		}
		if scale == 0 {
			return write!(f, "{digits}");
		}
		if digits.len() <= scale {
			let padded = format!("{:0>width$}", digits, width = scale + 1);
			let (int_part, frac_part) = padded.split_at(padded.len() - scale);
			write!(f, "{int_part}.{frac_part}")
		} else {
			let (int_part, frac_part) = digits.split_at(digits.len() - scale);
			write!(f, "{int_part}.{frac_part}")
		}
	}
}

/// §4.4 "Fields": reconstructs a 128-bit decimal from a `DecimalConstantAttribute`
/// blob of exactly five arguments of types `{byte, byte, (int or uint),
/// (int or uint), (int or uint)}`, preceded by the standard `0x0001` prolog.
/// Any deviation - wrong arity, wrong argument types, truncated blob -
/// silently yields `None` (§7): the caller then reports no constant, rather
/// than aborting the load.
pub fn decode_decimal_constant(attributes: &[RawAttribute]) -> Option<Decimal128> {
	let attr = attributes
		.iter()
		.find(|a| a.is_named("System.Runtime.CompilerServices", "DecimalConstantAttribute"))?;
	if attr.ctor_param_types.len() != 5 {
		return None;
	}
	let is_byte = |sig: &TypeSignature| matches!(sig, TypeSignature::Primitive(PrimitiveKind::UInt8));
	let is_int_or_uint =
		|sig: &TypeSignature| matches!(sig, TypeSignature::Primitive(PrimitiveKind::Int32) | TypeSignature::Primitive(PrimitiveKind::UInt32));
	if !is_byte(&attr.ctor_param_types[0])
		|| !is_byte(&attr.ctor_param_types[1])
		|| !is_int_or_uint(&attr.ctor_param_types[2])
		|| !is_int_or_uint(&attr.ctor_param_types[3])
		|| !is_int_or_uint(&attr.ctor_param_types[4])
	{
		return None;
	}
	let mut reader = BlobReader::new(&attr.blob);
	reader.expect_prolog()?;
	let scale = reader.read_u8()?;
	let sign = reader.read_u8()?;
	let high = reader.read_u32_le()?;
	let mid = reader.read_u32_le()?;
	let low = reader.read_u32_le()?;
	Some(Decimal128 { low, mid, high, scale, negative: sign != 0 })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::LazyInterner;

	fn sig_object() -> TypeSignature {
		TypeSignature::Primitive(PrimitiveKind::Object)
	}

	fn dict_of_object_object() -> TypeSignature {
		TypeSignature::GenericInstance {
			open: Box::new(TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System.Collections.Generic".into(),
				name: "Dictionary`2".into(),
				is_value_type: false,
			}),
			args: vec![sig_object(), sig_object()],
		}
	}

	#[test]
	fn dynamic_attribute_flags_the_first_object_slot() {
		let interner = LazyInterner::new();
		let attrs = vec![RawAttribute {
			attribute_type: TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System.Runtime.CompilerServices".into(),
				name: "DynamicAttribute".into(),
				is_value_type: false,
			},
			ctor_param_types: vec![],
			blob: vec![],
		}];
		// Manually craft a per-index encoding instead of the parameterless form.
		let attrs = vec![RawAttribute {
			blob: {
				let mut b = vec![0x01, 0x00]; // prolog
				// matches spec.md's worked example: {false, true, false} -
				// index 1 (the first `object` arg) is flagged dynamic.
				b.extend_from_slice(&3u32.to_le_bytes());
				b.extend_from_slice(&[0, 1, 0]);
				b
			},
			ctor_param_types: vec![TypeSignature::Array {
				element: Box::new(TypeSignature::Primitive(PrimitiveKind::Boolean)),
				rank: 1,
			}],
			..attrs.into_iter().next().unwrap()
		}];

		let ctx = TypeRefContext::from_attributes(&attrs, &Configuration::new());
		let mut cursor = Cursors::default();
		let result = build_type_reference(&dict_of_object_object(), &ctx, &mut cursor, &interner, true).unwrap();
		match &*result {
			UnresolvedTypeReference::GenericInstance { args, .. } => {
				assert_eq!(*args[0], UnresolvedTypeReference::Known(KnownType::Dynamic));
				assert_eq!(*args[1], UnresolvedTypeReference::Known(KnownType::Object));
			}
			other => panic!("expected generic instance, got {other:?}"),
		}
	}

	#[test]
	fn flattens_nine_element_value_tuple() {
		let interner = LazyInterner::new();
		fn tuple_type(name: &str, arity: u32) -> TypeSignature {
			TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System".into(),
				name: format!("{name}`{arity}"),
				is_value_type: true,
			}
		}
		fn primitive(kind: PrimitiveKind) -> TypeSignature {
			TypeSignature::Primitive(kind)
		}

		let letters = [
			PrimitiveKind::Int32,
			PrimitiveKind::Int32,
			PrimitiveKind::Int32,
			PrimitiveKind::Int32,
			PrimitiveKind::Int32,
			PrimitiveKind::Int32,
			PrimitiveKind::Int32,
		];
		let rest = TypeSignature::GenericInstance {
			open: Box::new(tuple_type("ValueTuple", 2)),
			args: vec![primitive(PrimitiveKind::Int32), primitive(PrimitiveKind::Int32)],
		};
		let sig = TypeSignature::GenericInstance {
			open: Box::new(tuple_type("ValueTuple", 8)),
			args: letters.iter().map(|k| primitive(*k)).chain(std::iter::once(rest)).collect(),
		};

		let ctx = TypeRefContext::from_attributes(&[], &Configuration::new());
		let mut cursor = Cursors::default();
		let result = build_type_reference(&sig, &ctx, &mut cursor, &interner, true).unwrap();
		match &*result {
			UnresolvedTypeReference::Tuple { elements, .. } => assert_eq!(elements.len(), 9),
			other => panic!("expected tuple, got {other:?}"),
		}
	}

	#[test]
	fn single_element_tuple_collapses() {
		let interner = LazyInterner::new();
		let sig = TypeSignature::GenericInstance {
			open: Box::new(TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System".into(),
				name: "ValueTuple`1".into(),
				is_value_type: true,
			}),
			args: vec![TypeSignature::Primitive(PrimitiveKind::Int32)],
		};
		let ctx = TypeRefContext::from_attributes(&[], &Configuration::new());
		let mut cursor = Cursors::default();
		let result = build_type_reference(&sig, &ctx, &mut cursor, &interner, true).unwrap();
		assert_eq!(*result, UnresolvedTypeReference::Known(KnownType::Primitive(NumericPrimitive::Int32)));
		assert_eq!(cursor.tuple_index, 1);
	}

	#[test]
	fn function_pointer_recovers_as_native_int() {
		let interner = LazyInterner::new();
		let ctx = TypeRefContext::from_attributes(&[], &Configuration::new());
		let mut cursor = Cursors::default();
		let result = build_type_reference(&TypeSignature::FunctionPointer, &ctx, &mut cursor, &interner, true).unwrap();
		assert_eq!(*result, UnresolvedTypeReference::Known(KnownType::Primitive(NumericPrimitive::IntPtr)));
	}

	#[test]
	fn decimal_constant_attribute_decodes_one_point_five() {
		// 1.5m = mantissa 15, scale 1, positive.
		let attr = RawAttribute {
			attribute_type: TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System.Runtime.CompilerServices".into(),
				name: "DecimalConstantAttribute".into(),
				is_value_type: false,
			},
			ctor_param_types: vec![
				TypeSignature::Primitive(PrimitiveKind::UInt8),
				TypeSignature::Primitive(PrimitiveKind::UInt8),
				TypeSignature::Primitive(PrimitiveKind::UInt32),
				TypeSignature::Primitive(PrimitiveKind::UInt32),
				TypeSignature::Primitive(PrimitiveKind::UInt32),
			],
			blob: {
				let mut b = vec![0x01, 0x00]; // prolog
				b.push(1); // scale
				b.push(0); // sign (positive)
				b.extend_from_slice(&0u32.to_le_bytes()); // hi
				b.extend_from_slice(&0u32.to_le_bytes()); // mid
				b.extend_from_slice(&15u32.to_le_bytes()); // low
				b
			},
		};
		let decimal = decode_decimal_constant(&[attr]).expect("decimal should decode");
		assert_eq!(decimal.to_string(), "1.5");
	}

	#[test]
	fn decimal_constant_attribute_with_wrong_arity_yields_none() {
		let attr = RawAttribute {
			attribute_type: TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System.Runtime.CompilerServices".into(),
				name: "DecimalConstantAttribute".into(),
				is_value_type: false,
			},
			ctor_param_types: vec![TypeSignature::Primitive(PrimitiveKind::UInt8)],
			blob: vec![0x01, 0x00],
		};
		assert!(decode_decimal_constant(&[attr]).is_none());
	}

	#[test]
	fn modreq_unwraps_transparently() {
		let interner = LazyInterner::new();
		let ctx = TypeRefContext::from_attributes(&[], &Configuration::new());
		let mut cursor = Cursors::default();
		let sig = TypeSignature::Modifier {
			required: true,
			namespace: "System.Runtime.CompilerServices".into(),
			name: "IsVolatile".into(),
			element: Box::new(TypeSignature::Primitive(PrimitiveKind::Int32)),
		};
		let result = build_type_reference(&sig, &ctx, &mut cursor, &interner, true).unwrap();
		assert_eq!(*result, UnresolvedTypeReference::Known(KnownType::Primitive(NumericPrimitive::Int32)));
	}
}
