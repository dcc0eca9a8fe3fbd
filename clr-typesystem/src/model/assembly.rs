//! Assembly-level model (§4.7): the frozen result of loading one module,
//! plus the reference kind the `on_entity_loaded` callback hands back to a
//! caller as each entity finishes loading (§4.8).

use std::sync::Arc;

use fxhash::FxHashMap;
use nohash_hasher::BuildNoHashHasher;

use crate::metadata::AssemblyVersion;
use crate::model::member::{UnresolvedEvent, UnresolvedField, UnresolvedMethod, UnresolvedProperty};
use crate::model::type_def::TypeDefinitionHandle;
use crate::token::MetadataToken;

/// Token-keyed lookup table for every top-level type definition loaded into
/// an assembly (nested types are not indexed here, see `type_by_token`'s own
/// doc), built once at load time. This is the concrete accessor shape the
/// resolve phase (out of scope here, §1) will need to turn an
/// `UnresolvedTypeReference::Token` (§4.2 case 10) back into the definition
/// it names, without re-walking the whole nested-type tree.
type TokenIndex = std::collections::HashMap<MetadataToken, TypeDefinitionHandle, BuildNoHashHasher<MetadataToken>>;

/// One fully-registered entity, as handed to `Configuration::on_entity_loaded`
/// (§4.8). Carries no declaring-type back-reference beyond what the entity
/// itself already stores.
#[derive(Clone)]
pub enum UnresolvedEntityRef {
	Type(TypeDefinitionHandle),
	Method(Arc<UnresolvedMethod>),
	Field(Arc<UnresolvedField>),
	Property(Arc<UnresolvedProperty>),
	Event(Arc<UnresolvedEvent>),
}

/// A type forwarded to another assembly (§4.7 "type forwarders"), keyed by
/// its full name and arity so a lookup doesn't need to re-split a display
/// name.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TypeForwarderKey {
	pub namespace: Arc<str>,
	pub name: Arc<str>,
	pub arity: u32,
}

/// The frozen result of loading one module (§3 "Unresolved assembly", §4.7).
/// Every field is read-only once construction finishes; there is no
/// in-place mutation after `Loader::load` returns.
pub struct UnresolvedAssembly {
	name: Arc<str>,
	version: AssemblyVersion,
	location: Arc<str>,
	assembly_attributes: Arc<[Arc<crate::model::attribute::UnresolvedAttribute>]>,
	module_attributes: Arc<[Arc<crate::model::attribute::UnresolvedAttribute>]>,
	top_level_types: Arc<[TypeDefinitionHandle]>,
	type_forwarders: FxHashMap<TypeForwarderKey, Arc<str>>,
	by_token: TokenIndex,
}

impl UnresolvedAssembly {
	pub(crate) fn new(
		name: Arc<str>,
		version: AssemblyVersion,
		location: Arc<str>,
		assembly_attributes: Arc<[Arc<crate::model::attribute::UnresolvedAttribute>]>,
		module_attributes: Arc<[Arc<crate::model::attribute::UnresolvedAttribute>]>,
		top_level_types: Arc<[TypeDefinitionHandle]>,
		type_forwarders: FxHashMap<TypeForwarderKey, Arc<str>>,
	) -> Self {
		let by_token = top_level_types.iter().map(|t| (t.token(), t.clone())).collect();
		Self { name, version, location, assembly_attributes, module_attributes, top_level_types, type_forwarders, by_token }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> AssemblyVersion {
		self.version
	}

	pub fn location(&self) -> &str {
		&self.location
	}

	/// §3 "two attribute lists (assembly, module)": the assembly-scoped
	/// list, including the synthesized `AssemblyVersion` attribute (§4.3).
	pub fn assembly_attributes(&self) -> &[Arc<crate::model::attribute::UnresolvedAttribute>] {
		&self.assembly_attributes
	}

	/// §3 "two attribute lists (assembly, module)": the module-scoped list.
	pub fn module_attributes(&self) -> &[Arc<crate::model::attribute::UnresolvedAttribute>] {
		&self.module_attributes
	}

	pub fn top_level_types(&self) -> &[TypeDefinitionHandle] {
		&self.top_level_types
	}

	/// Looks up a forwarded type by its full name and arity, returning the
	/// assembly name it was forwarded to, if any (§4.7).
	pub fn resolve_forwarder(&self, namespace: &str, name: &str, arity: u32) -> Option<&str> {
		self.type_forwarders
			.get(&TypeForwarderKey { namespace: Arc::from(namespace), name: Arc::from(name), arity })
			.map(|target| target.as_ref())
	}

	pub fn type_forwarder_count(&self) -> usize {
		self.type_forwarders.len()
	}

	/// Looks up a top-level type definition by its metadata token in
	/// constant time, without re-walking `top_level_types` (§4.2 case 10:
	/// "a token reference, resolved later within the owning assembly").
	/// Nested types are not indexed here - reaching one means walking down
	/// from its declaring type via `TypeDefinitionHandle::nested_types()`,
	/// which is also the only way to materialize a lazy declaring type's
	/// nested-type list without forcing it ahead of time.
	pub fn type_by_token(&self, token: MetadataToken) -> Option<&TypeDefinitionHandle> {
		self.by_token.get(&token)
	}

	/// Forces every lazily-loaded top-level type (and transitively, their
	/// nested types), per §4.6's `finish()`.
	pub(crate) fn finish(&self) {
		for handle in self.top_level_types.iter() {
			if let TypeDefinitionHandle::Lazy(lazy) = handle {
				lazy.force();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn forwarder_lookup_round_trips() {
		let mut forwarders = FxHashMap::default();
		forwarders.insert(
			TypeForwarderKey { namespace: Arc::from("N"), name: Arc::from("Moved"), arity: 0 },
			Arc::from("Other.Assembly"),
		);
		let assembly = UnresolvedAssembly::new(
			Arc::from("Test"),
			AssemblyVersion::default(),
			Arc::from("test.dll"),
			Arc::from(Vec::new()),
			Arc::from(Vec::new()),
			Arc::from(Vec::new()),
			forwarders,
		);
		assert_eq!(assembly.resolve_forwarder("N", "Moved", 0), Some("Other.Assembly"));
		assert_eq!(assembly.resolve_forwarder("N", "Missing", 0), None);
	}
}
