//! Attribute decoder (§4.3): custom attributes, security declarations, and
//! the synthesized attributes derived from non-attribute metadata
//! (`DllImport`, `PreserveSig`, `MethodImpl`, `Serializable`, `ComImport`,
//! `StructLayout`, `FieldOffset`, `NonSerialized`, `MarshalAs`).
//!
//! User custom attributes are preserved blob-backed (§3 "Unresolved
//! attribute"); nothing here decodes a user attribute's arguments beyond the
//! handful of well-known shapes the type-reference builder and the member
//! reader need for themselves (`DynamicAttribute`, `TupleElementNamesAttribute`,
//! `DecimalConstantAttribute`), which live in `type_ref.rs` next to the code
//! that consumes them.

use std::sync::Arc;

use crate::blob::BlobReader;
use crate::config::Configuration;
use crate::error::Result;
use crate::metadata::{
	CharSet, LayoutKind, MarshalAsInfo, MethodImplFlags, MethodRecord, PInvokeCallingConvention, RawAttribute,
	RawSecurityDeclaration, TypeDefFlags, TypeDefRecord, TypeLayout,
};
use crate::model::type_def::TypeKind;
use crate::model::type_ref::{build_type_reference, Cursors, TypeRefContext};
use crate::model::{arc_slice, Interner};

/// Names filtered out of every attribute list because they are represented
/// structurally elsewhere in the unresolved model (§4.3).
fn is_always_filtered(attr: &RawAttribute) -> bool {
	matches!(
		attr.attribute_type.simple_name(),
		Some(("System.Runtime.CompilerServices", "ExtensionAttribute"))
			| Some(("System.Runtime.CompilerServices", "DecimalConstantAttribute"))
			| Some(("System", "ParamArrayAttribute"))
			| Some(("System.Reflection", "DefaultMemberAttribute"))
	)
}

fn is_conditionally_filtered(attr: &RawAttribute, config: &Configuration) -> bool {
	match attr.attribute_type.simple_name() {
		Some(("System.Runtime.CompilerServices", "DynamicAttribute")) => config.use_dynamic_type,
		Some(("System.Runtime.CompilerServices", "TupleElementNamesAttribute")) => config.use_tuple_types,
		_ => false,
	}
}

pub fn has_attribute(attributes: &[RawAttribute], namespace: &str, name: &str) -> bool {
	attributes.iter().any(|a| a.is_named(namespace, name))
}

/// Decodes an entity's raw custom attributes into the preserved, blob-backed
/// records of §3, applying the §4.3 filter list.
pub fn decode_custom_attributes(
	attributes: &[RawAttribute],
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<Vec<Arc<UnresolvedAttribute>>> {
	let empty_ctx = TypeRefContext::from_attributes(&[], config);
	let mut out = Vec::new();
	for attr in attributes {
		if is_always_filtered(attr) || is_conditionally_filtered(attr, config) {
			continue;
		}
		let mut cursor = Cursors::default();
		let attribute_type = build_type_reference(&attr.attribute_type, &empty_ctx, &mut cursor, interner, false)?;
		let mut ctor_param_types = Vec::with_capacity(attr.ctor_param_types.len());
		for param in &attr.ctor_param_types {
			let mut cursor = Cursors::default();
			ctor_param_types.push(build_type_reference(param, &empty_ctx, &mut cursor, interner, false)?);
		}
		out.push(interner.intern_attribute(UnresolvedAttribute::Custom {
			attribute_type,
			ctor_param_types: arc_slice(ctor_param_types),
			blob: attr.blob.clone().into(),
		}));
	}
	Ok(out)
}

/// Security declarations (§3, §4.3): wrapped keyed by action code, blob
/// decode deferred. Not an interned kind (§4.1 only lists strings, boxed
/// primitives, immutable lists, attribute records, type references, and
/// constant values) - plain `Arc`-wrapped records.
pub fn decode_security_declarations(declarations: &[RawSecurityDeclaration]) -> Vec<Arc<UnresolvedSecurityDeclaration>> {
	declarations
		.iter()
		.map(|d| Arc::new(UnresolvedSecurityDeclaration { action: d.action, blob: d.blob.clone().into() }))
		.collect()
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct UnresolvedSecurityDeclaration {
	pub action: u16,
	pub blob: Arc<[u8]>,
}

/// A decoded custom attribute, security declaration's sibling record, or a
/// synthesized attribute standing in for non-attribute metadata (§4.3).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum UnresolvedAttribute {
	/// A user attribute, preserved blob-backed per §3.
	Custom {
		attribute_type: Arc<crate::model::type_ref::UnresolvedTypeReference>,
		ctor_param_types: Arc<[Arc<crate::model::type_ref::UnresolvedTypeReference>]>,
		blob: Arc<[u8]>,
	},
	DllImport(Box<DllImportAttribute>),
	PreserveSig,
	MethodImpl { flags: MethodImplFlags },
	Serializable,
	ComImport,
	StructLayout { kind: LayoutKind, char_set: Option<CharSet>, pack: Option<u16>, size: Option<u32> },
	FieldOffset(u32),
	NonSerialized,
	MarshalAs(MarshalAsInfo),
	AssemblyVersion(Arc<str>),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DllImportAttribute {
	pub library: Arc<str>,
	pub calling_convention: Option<PInvokeCallingConvention>,
	pub character_set: Option<CharSet>,
	pub entry_point: Option<Arc<str>>,
	pub exact_spelling: Option<bool>,
	pub preserve_sig: Option<bool>,
	pub best_fit_mapping: Option<bool>,
	pub set_last_error: Option<bool>,
	pub throw_on_unmappable_char: Option<bool>,
}

/// Synthesizes the `AssemblyVersion` attribute (§4.3), the one always
/// present entry in an assembly's attribute list.
pub fn assembly_version_attribute(version_string: &str, interner: &dyn Interner) -> Arc<UnresolvedAttribute> {
	interner.intern_attribute(UnresolvedAttribute::AssemblyVersion(interner.intern_str(version_string)))
}

/// §4.3 "DllImport"/"PreserveSig"/"MethodImpl": synthesizes 0-2 attributes
/// from a method's P/Invoke record and residual impl flags, returning them
/// already folded into the method's custom-attribute list.
pub fn decode_method_attributes(
	method: &MethodRecord,
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<Vec<Arc<UnresolvedAttribute>>> {
	let mut out = decode_custom_attributes(&method.attributes, config, interner)?;

	let mut residual = method.impl_flags;
	if let Some(pinvoke) = &method.pinvoke {
		let preserve_sig_absorbed = residual.contains(MethodImplFlags::PRESERVE_SIG);
		if preserve_sig_absorbed {
			residual.remove(MethodImplFlags::PRESERVE_SIG);
		}
		out.push(interner.intern_attribute(UnresolvedAttribute::DllImport(Box::new(DllImportAttribute {
			library: interner.intern_str(&pinvoke.library_name),
			calling_convention: (pinvoke.calling_convention != PInvokeCallingConvention::Winapi)
				.then_some(pinvoke.calling_convention),
			character_set: (pinvoke.character_set != CharSet::None).then_some(pinvoke.character_set),
			entry_point: (pinvoke.entry_point != method.name).then(|| interner.intern_str(&pinvoke.entry_point)),
			exact_spelling: pinvoke.exact_spelling.then_some(true),
			preserve_sig: preserve_sig_absorbed.then_some(true),
			best_fit_mapping: (!pinvoke.best_fit_mapping).then_some(false),
			set_last_error: pinvoke.last_error.then_some(true),
			throw_on_unmappable_char: pinvoke.throw_on_unmappable_char.then_some(true),
		}))));
	}

	if residual == MethodImplFlags::PRESERVE_SIG {
		out.push(interner.intern_attribute(UnresolvedAttribute::PreserveSig));
	} else if !residual.is_empty() {
		out.push(interner.intern_attribute(UnresolvedAttribute::MethodImpl { flags: residual }));
	}

	Ok(out)
}

/// §4.3 "Serializable, ComImport", "StructLayout": type-level synthesized
/// attributes, folded into the type's custom-attribute list. Returns the
/// attribute list plus `hasExtensionMethods` (§4.5 step 7).
pub fn decode_type_attributes(
	type_def: &TypeDefRecord,
	kind: TypeKind,
	config: &Configuration,
	interner: &dyn Interner,
) -> Result<Vec<Arc<UnresolvedAttribute>>> {
	let mut out = decode_custom_attributes(&type_def.attributes, config, interner)?;

	if type_def.flags.contains(TypeDefFlags::SERIALIZABLE) {
		out.push(interner.intern_attribute(UnresolvedAttribute::Serializable));
	}
	if type_def.is_com_import {
		out.push(interner.intern_attribute(UnresolvedAttribute::ComImport));
	}
	if let Some(layout) = struct_layout_attribute(&type_def.layout, kind) {
		out.push(interner.intern_attribute(layout));
	}

	Ok(out)
}

fn struct_layout_attribute(layout: &TypeLayout, kind: TypeKind) -> Option<UnresolvedAttribute> {
	let default_kind = match kind {
		TypeKind::Struct => LayoutKind::Sequential,
		_ => LayoutKind::Auto,
	};
	let default_char_set = CharSet::Ansi;
	let differs =
		layout.kind != default_kind || layout.char_set != default_char_set || layout.packing_size != 0 || layout.class_size != 0;
	if !differs {
		return None;
	}
	Some(UnresolvedAttribute::StructLayout {
		kind: layout.kind,
		char_set: (layout.char_set != default_char_set).then_some(layout.char_set),
		pack: (layout.packing_size != 0).then_some(layout.packing_size),
		size: (layout.class_size != 0).then_some(layout.class_size),
	})
}

/// §4.3 "FieldOffset, NonSerialized": flag-derived field attributes, plus
/// `MarshalAs` when the field carries marshaling info.
pub fn field_synthesized_attributes(
	offset: Option<u32>,
	not_serialized: bool,
	marshal: Option<&MarshalAsInfo>,
	interner: &dyn Interner,
) -> Vec<Arc<UnresolvedAttribute>> {
	let mut out = Vec::new();
	if let Some(offset) = offset {
		out.push(interner.intern_attribute(UnresolvedAttribute::FieldOffset(offset)));
	}
	if not_serialized {
		out.push(interner.intern_attribute(UnresolvedAttribute::NonSerialized));
	}
	if let Some(marshal) = marshal {
		out.push(interner.intern_attribute(UnresolvedAttribute::MarshalAs(marshal.clone())));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metadata::{PrimitiveKind, ResolutionScope, TypeSignature};
	use crate::model::LazyInterner;

	fn extension_attribute() -> RawAttribute {
		RawAttribute {
			attribute_type: TypeSignature::TypeRef {
				scope: ResolutionScope::AssemblyRef("System.Private.CoreLib".into()),
				namespace: "System.Runtime.CompilerServices".into(),
				name: "ExtensionAttribute".into(),
				is_value_type: false,
			},
			ctor_param_types: vec![],
			blob: vec![0x01, 0x00],
		}
	}

	#[test]
	fn extension_attribute_is_filtered_out() {
		let interner = LazyInterner::new();
		let config = Configuration::new();
		let attrs = vec![extension_attribute()];
		let decoded = decode_custom_attributes(&attrs, &config, &interner).unwrap();
		assert!(decoded.is_empty());
	}

	#[test]
	fn struct_layout_omitted_for_sequential_struct_default() {
		let layout = TypeLayout { kind: LayoutKind::Sequential, char_set: CharSet::Ansi, packing_size: 0, class_size: 0 };
		assert!(struct_layout_attribute(&layout, TypeKind::Struct).is_none());
	}

	#[test]
	fn struct_layout_carries_only_pack_when_that_alone_differs() {
		let layout = TypeLayout { kind: LayoutKind::Sequential, char_set: CharSet::Ansi, packing_size: 4, class_size: 0 };
		let attr = struct_layout_attribute(&layout, TypeKind::Struct).unwrap();
		match attr {
			UnresolvedAttribute::StructLayout { pack: Some(4), char_set: None, size: None, .. } => {}
			other => panic!("expected pack-only StructLayout, got {other:?}"),
		}
	}

	#[test]
	fn non_struct_class_default_layout_is_auto() {
		let layout = TypeLayout { kind: LayoutKind::Auto, char_set: CharSet::Ansi, packing_size: 0, class_size: 0 };
		assert!(struct_layout_attribute(&layout, TypeKind::Class).is_none());
	}
}
