//! The external collaborator interface (spec.md §1, §6 "Inputs"): the
//! object graph a byte-level CLI metadata parser is *assumed* to expose.
//! Nothing in this module parses bytes; it only names the shapes the rest
//! of the crate consumes. A real parser (built the way the teacher's own
//! `raw`/`schema` layers are built) would construct these records from a
//! PE image; `testutil` builds them by hand for this crate's tests.
//!
//! `MetadataModule` is the one trait boundary - it lets the loader (§4.7)
//! stay generic over whatever produces the graph. Everything reachable
//! from it (`TypeDefRecord` and friends) is plain data: the CLI metadata
//! tables this crate cares about are already a tree once a parser has
//! digested coded indices and heap offsets, so there is no polymorphism
//! left to model below the module boundary.

use crate::token::MetadataToken;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct AssemblyVersion {
	pub major: u16,
	pub minor: u16,
	pub build: u16,
	pub revision: u16,
}

impl std::fmt::Display for AssemblyVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
	}
}

/// The recursive type-reference grammar of §4.2, as data rather than bytes:
/// this *is* the "small recursive language" spec.md §1 describes.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSignature {
	Primitive(PrimitiveKind),
	Pointer(Box<TypeSignature>),
	ByRef(Box<TypeSignature>),
	Array { element: Box<TypeSignature>, rank: u32 },
	GenericParam { kind: GenericParamKind, position: u32 },
	GenericInstance { open: Box<TypeSignature>, args: Vec<TypeSignature> },
	FunctionPointer,
	Modifier { required: bool, namespace: String, name: String, element: Box<TypeSignature> },
	Pinned(Box<TypeSignature>),
	/// The vararg sentinel separating fixed from variable arguments.
	Sentinel,
	/// A raw `TypeDefinition` local to the module being loaded.
	TypeDef(MetadataToken),
	/// A non-nested `TypeReference`. `is_value_type` reflects the
	/// `ELEMENT_TYPE_CLASS`/`ELEMENT_TYPE_VALUETYPE` tag the signature blob
	/// itself carries for a `TypeDefOrRef` token - only trustworthy when
	/// the signature came from a real signature/type-spec context (§4.2,
	/// "isFromSignature").
	TypeRef { scope: ResolutionScope, namespace: String, name: String, is_value_type: bool },
	NestedTypeRef { declaring: Box<TypeSignature>, name: String, is_value_type: bool },
}

impl TypeSignature {
	/// `(namespace, name)` for a bare named reference, used to match
	/// well-known types (`System.Object`, `System.ValueTuple`...) without
	/// threading a full builder through the lookup.
	pub fn simple_name(&self) -> Option<(&str, &str)> {
		match self {
			TypeSignature::TypeRef { namespace, name, .. } => Some((namespace, name)),
			_ => None,
		}
	}

	/// Splits a CLR display name like `List\`1` into (`"List"`, 1).
	pub fn split_arity(name: &str) -> (&str, u32) {
		match name.rsplit_once('`') {
			Some((base, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
				(base, digits.parse().unwrap_or(0))
			}
			_ => (name, 0),
		}
	}
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
	Void,
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
	Object,
	TypedReference,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GenericParamKind {
	/// `!0`, `!1`, ... - a type's own generic parameter.
	Type,
	/// `!!0`, `!!1`, ... - a method's own generic parameter.
	Method,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ResolutionScope {
	/// The scope is the module being loaded, or unspecified - §4.2 case 11.
	CurrentModule,
	AssemblyRef(String),
}

/// An attribute, security declaration, or custom-modifier's raw constructor
/// argument blob, preserved undecoded per §4.3 ("Deferred Decode") until a
/// consumer asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
	pub attribute_type: TypeSignature,
	pub ctor_param_types: Vec<TypeSignature>,
	pub blob: Vec<u8>,
}

impl RawAttribute {
	pub fn is_named(&self, namespace: &str, name: &str) -> bool {
		matches!(self.attribute_type.simple_name(), Some((ns, n)) if ns == namespace && n == name)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSecurityDeclaration {
	pub action: u16,
	pub blob: Vec<u8>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CharSet {
	None,
	Ansi,
	Unicode,
	Auto,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PInvokeCallingConvention {
	Winapi,
	Cdecl,
	StdCall,
	ThisCall,
	FastCall,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PInvokeRecord {
	pub library_name: String,
	pub entry_point: String,
	pub best_fit_mapping: bool,
	pub calling_convention: PInvokeCallingConvention,
	pub character_set: CharSet,
	pub exact_spelling: bool,
	pub last_error: bool,
	pub throw_on_unmappable_char: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnmanagedType {
	Bool,
	I1,
	U1,
	I2,
	U2,
	I4,
	U4,
	I8,
	U8,
	R4,
	R8,
	LPStr,
	LPWStr,
	LPTStr,
	BStr,
	IUnknown,
	IDispatch,
	Struct,
	Interface,
	Currency,
	Error,
	FunctionPtr,
	SysInt,
	SysUInt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarshalAsInfo {
	Simple(UnmanagedType),
	Array { element_type: Option<UnmanagedType>, size_param_index: Option<u16>, size_const: Option<u32> },
	SafeArray { sub_type: Option<UnmanagedType> },
	CustomMarshaler { cookie: String, managed_type: String },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum LayoutKind {
	#[default]
	Auto,
	Sequential,
	Explicit,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TypeLayout {
	pub kind: LayoutKind,
	pub char_set: CharSet,
	pub packing_size: u16,
	pub class_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawConstant {
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
	R4(f32),
	R8(f64),
	Str(String),
	NullRef,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct ParamFlags: u16 {
		const IN = 0x0001;
		const OUT = 0x0002;
		const OPTIONAL = 0x0010;
		const HAS_DEFAULT = 0x1000;
		const HAS_FIELD_MARSHAL = 0x2000;
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
	pub name: String,
	/// By-ref-ness is carried on `ty` itself (`TypeSignature::ByRef`); this
	/// flag set is the CLI `Param` row's own flags.
	pub ty: TypeSignature,
	pub flags: ParamFlags,
	pub default_value: Option<RawConstant>,
	pub marshal: Option<MarshalAsInfo>,
	pub attributes: Vec<RawAttribute>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Variance {
	None,
	Covariant,
	Contravariant,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct SpecialConstraints: u8 {
		const REFERENCE_TYPE = 0x01;
		const NOT_NULLABLE_VALUE_TYPE = 0x02;
		const DEFAULT_CONSTRUCTOR = 0x04;
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameterRecord {
	pub name: String,
	pub position: u32,
	pub kind: GenericParamKind,
	pub variance: Variance,
	pub special_constraints: SpecialConstraints,
	pub constraints: Vec<TypeSignature>,
	pub attributes: Vec<RawAttribute>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Access {
	PrivateScope,
	Private,
	FamAndAssem,
	Assembly,
	Family,
	FamOrAssem,
	Public,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct MethodFlags: u32 {
		const STATIC = 0x0010;
		const FINAL = 0x0020;
		const VIRTUAL = 0x0040;
		const HIDE_BY_SIG = 0x0080;
		const NEW_SLOT = 0x0100;
		const ABSTRACT = 0x0400;
		const SPECIAL_NAME = 0x0800;
		const PINVOKE_IMPL = 0x2000;
	}

	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct MethodImplFlags: u16 {
		const NATIVE = 0x0001;
		const RUNTIME = 0x0003;
		const SYNCHRONIZED = 0x0020;
		const NO_INLINING = 0x0008;
		const FORWARD_REF = 0x0010;
		const PRESERVE_SIG = 0x0080;
		const INTERNAL_CALL = 0x1000;
		const AGGRESSIVE_INLINING = 0x0100;
		const NO_OPTIMIZATION = 0x0040;
	}
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MethodSemantics {
	None,
	Getter,
	Setter,
	AddOn,
	RemoveOn,
	Fire,
	Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CallingConvention {
	Default,
	VarArg,
	Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodOverride {
	pub interface_type: TypeSignature,
	pub method_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodRecord {
	pub token: MetadataToken,
	pub name: String,
	pub access: Access,
	pub flags: MethodFlags,
	pub impl_flags: MethodImplFlags,
	pub semantics: MethodSemantics,
	pub is_vararg: bool,
	pub generic_parameters: Vec<TypeParameterRecord>,
	pub parameters: Vec<ParameterRecord>,
	pub return_type: TypeSignature,
	pub return_attributes: Vec<RawAttribute>,
	pub pinvoke: Option<PInvokeRecord>,
	pub overrides: Vec<MethodOverride>,
	pub attributes: Vec<RawAttribute>,
	pub security_declarations: Vec<RawSecurityDeclaration>,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct FieldFlags: u16 {
		const STATIC = 0x0010;
		const INIT_ONLY = 0x0020;
		const LITERAL = 0x0040;
		const NOT_SERIALIZED = 0x0080;
		const SPECIAL_NAME = 0x0200;
		const PINVOKE_IMPL = 0x2000;
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
	pub token: MetadataToken,
	pub name: String,
	pub access: Access,
	pub flags: FieldFlags,
	pub ty: TypeSignature,
	pub constant: Option<RawConstant>,
	pub marshal: Option<MarshalAsInfo>,
	pub offset: Option<u32>,
	pub attributes: Vec<RawAttribute>,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct PropertyFlags: u16 {
		const SPECIAL_NAME = 0x0200;
		const HAS_DEFAULT = 0x1000;
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
	pub token: MetadataToken,
	pub name: String,
	pub flags: PropertyFlags,
	pub ty: TypeSignature,
	pub parameters: Vec<ParameterRecord>,
	pub getter: Option<MethodRecord>,
	pub setter: Option<MethodRecord>,
	pub default_value: Option<RawConstant>,
	pub attributes: Vec<RawAttribute>,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct EventFlags: u16 {
		const SPECIAL_NAME = 0x0200;
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
	pub token: MetadataToken,
	pub name: String,
	pub flags: EventFlags,
	pub event_type: TypeSignature,
	pub add: MethodRecord,
	pub remove: MethodRecord,
	pub invoke: Option<MethodRecord>,
	pub attributes: Vec<RawAttribute>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TypeVisibility {
	NotPublic,
	Public,
	NestedPublic,
	NestedPrivate,
	NestedFamily,
	NestedAssembly,
	NestedFamAndAssem,
	NestedFamOrAssem,
}

bitflags::bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
	pub struct TypeDefFlags: u32 {
		const INTERFACE = 0x0020;
		const ABSTRACT = 0x0080;
		const SEALED = 0x0100;
		const SPECIAL_NAME = 0x0400;
		const SERIALIZABLE = 0x2000;
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefRecord {
	pub token: MetadataToken,
	pub short_name: String,
	pub namespace: String,
	pub visibility: TypeVisibility,
	pub flags: TypeDefFlags,
	pub layout: TypeLayout,
	pub is_com_import: bool,
	pub type_parameters: Vec<TypeParameterRecord>,
	pub base_type: Option<TypeSignature>,
	pub interfaces: Vec<TypeSignature>,
	pub nested_types: Vec<TypeDefRecord>,
	pub fields: Vec<FieldRecord>,
	pub methods: Vec<MethodRecord>,
	pub properties: Vec<PropertyRecord>,
	pub events: Vec<EventRecord>,
	pub attributes: Vec<RawAttribute>,
	pub security_declarations: Vec<RawSecurityDeclaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForwarderRecord {
	pub namespace: String,
	pub name: String,
	pub arity: u32,
	pub target_assembly: String,
}

/// The module/assembly object graph this crate loads (spec.md §1, §6).
///
/// A real implementation over a parsed PE image is a downstream concern;
/// this trait is the seam it would plug into.
pub trait MetadataModule {
	fn assembly_name(&self) -> &str;
	fn assembly_version(&self) -> AssemblyVersion;
	fn location(&self) -> &str;
	fn assembly_attributes(&self) -> &[RawAttribute];
	fn module_attributes(&self) -> &[RawAttribute];
	fn top_level_types(&self) -> &[TypeDefRecord];
	fn exported_forwarders(&self) -> &[ForwarderRecord];
}
