//! Hand-built fake metadata graph (§1 "testing strategy"), used only by
//! this crate's own unit and integration tests. Never reachable from a
//! non-test build - there is no byte-level metadata parser in this crate
//! (`metadata.rs` names the shapes a real one would produce).

use crate::metadata::{
	Access, AssemblyVersion, FieldFlags, FieldRecord, ForwarderRecord, MetadataModule, MethodFlags, MethodImplFlags, MethodRecord,
	MethodSemantics, PrimitiveKind, PropertyFlags, PropertyRecord, RawAttribute, TypeDefFlags, TypeDefRecord, TypeLayout, TypeSignature,
	TypeVisibility,
};
use crate::token::{MetadataToken, MetadataTokenKind};

pub fn empty_type_def(namespace: &str, name: &str) -> TypeDefRecord {
	TypeDefRecord {
		token: MetadataToken::new(MetadataTokenKind::TypeDef, 1),
		short_name: name.to_string(),
		namespace: namespace.to_string(),
		visibility: TypeVisibility::Public,
		flags: TypeDefFlags::empty(),
		layout: TypeLayout { kind: Default::default(), char_set: crate::metadata::CharSet::Ansi, packing_size: 0, class_size: 0 },
		is_com_import: false,
		type_parameters: Vec::new(),
		base_type: None,
		interfaces: Vec::new(),
		nested_types: Vec::new(),
		fields: Vec::new(),
		methods: Vec::new(),
		properties: Vec::new(),
		events: Vec::new(),
		attributes: Vec::new(),
		security_declarations: Vec::new(),
	}
}

pub fn primitive_field(name: &str, access: Access, kind: PrimitiveKind) -> FieldRecord {
	FieldRecord {
		token: MetadataToken::new(MetadataTokenKind::Field, 1),
		name: name.to_string(),
		access,
		flags: FieldFlags::empty(),
		ty: TypeSignature::Primitive(kind),
		constant: None,
		marshal: None,
		offset: None,
		attributes: Vec::new(),
	}
}

/// A minimal method record, access/semantics/return-type supplied by the
/// caller; every other field is left at its "doesn't contribute" default.
pub fn empty_method(name: &str, access: Access, semantics: MethodSemantics, return_type: TypeSignature) -> MethodRecord {
	MethodRecord {
		token: MetadataToken::new(MetadataTokenKind::Method, 1),
		name: name.to_string(),
		access,
		flags: MethodFlags::empty(),
		impl_flags: MethodImplFlags::empty(),
		semantics,
		is_vararg: false,
		generic_parameters: Vec::new(),
		parameters: Vec::new(),
		return_type,
		return_attributes: Vec::new(),
		pinvoke: None,
		overrides: Vec::new(),
		attributes: Vec::new(),
		security_declarations: Vec::new(),
	}
}

/// A read-only property with just a getter, the shape spec.md §8 scenario 2
/// (`int P { get; }` on an interface) exercises.
pub fn getter_only_property(name: &str, ty: PrimitiveKind) -> PropertyRecord {
	PropertyRecord {
		token: MetadataToken::new(MetadataTokenKind::Property, 1),
		name: name.to_string(),
		flags: PropertyFlags::empty(),
		ty: TypeSignature::Primitive(ty),
		parameters: Vec::new(),
		getter: Some(empty_method(&format!("get_{name}"), Access::Public, MethodSemantics::Getter, TypeSignature::Primitive(ty))),
		setter: None,
		default_value: None,
		attributes: Vec::new(),
	}
}

pub struct TestModule {
	name: String,
	version: AssemblyVersion,
	location: String,
	assembly_attributes: Vec<RawAttribute>,
	module_attributes: Vec<RawAttribute>,
	top_level_types: Vec<TypeDefRecord>,
	exported_forwarders: Vec<ForwarderRecord>,
}

impl MetadataModule for TestModule {
	fn assembly_name(&self) -> &str {
		&self.name
	}

	fn assembly_version(&self) -> AssemblyVersion {
		self.version
	}

	fn location(&self) -> &str {
		&self.location
	}

	fn assembly_attributes(&self) -> &[RawAttribute] {
		&self.assembly_attributes
	}

	fn module_attributes(&self) -> &[RawAttribute] {
		&self.module_attributes
	}

	fn top_level_types(&self) -> &[TypeDefRecord] {
		&self.top_level_types
	}

	fn exported_forwarders(&self) -> &[ForwarderRecord] {
		&self.exported_forwarders
	}
}

pub fn empty_module(name: &str, top_level_types: Vec<TypeDefRecord>) -> TestModule {
	TestModule {
		name: name.to_string(),
		version: AssemblyVersion { major: 1, minor: 0, build: 0, revision: 0 },
		location: format!("{name}.dll"),
		assembly_attributes: Vec::new(),
		module_attributes: Vec::new(),
		top_level_types,
		exported_forwarders: Vec::new(),
	}
}
