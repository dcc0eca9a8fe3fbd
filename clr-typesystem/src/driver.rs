//! Assembly loader (§4.7): the single entry point that walks a
//! [`MetadataModule`] and produces a frozen [`UnresolvedAssembly`].
//!
//! There is exactly one loader shape - no virtual dispatch over loading
//! strategies (§9 Design Notes: "a single concrete loader, not a strategy
//! hierarchy"). Eager vs. lazy loading is a per-type branch inside the same
//! function, selected once from `Configuration::lazy_load`.

use std::sync::{Arc, Mutex};

use fxhash::FxHashMap;

use crate::config::Configuration;
use crate::error::{LoaderError, Result};
use crate::metadata::MetadataModule;
use crate::model::assembly::{TypeForwarderKey, UnresolvedAssembly, UnresolvedEntityRef};
use crate::model::attribute::{assembly_version_attribute, decode_custom_attributes};
use crate::model::type_def::{build_type_definition, is_top_level_type_visible, TypeDefinitionHandle};
use crate::model::RealInterner;

/// Loads one assembly's unresolved type system from its metadata graph
/// (§4.7). Stateless: every call is an independent load with its own
/// interning pool, matching §4.1's "interning is scoped to a single
/// assembly load, never shared across assemblies".
#[derive(Default)]
pub struct Loader;

impl Loader {
	pub fn new() -> Self {
		Self
	}

	#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(assembly = module.assembly_name())))]
	pub fn load(&self, module: &dyn MetadataModule, config: Configuration) -> Result<UnresolvedAssembly> {
		let config = Arc::new(config);
		let interner = RealInterner::new();

		// §3 "two attribute lists (assembly, module)", §4.7 step 1: captured
		// distinctly, never merged. The synthesized `AssemblyVersion`
		// attribute (§4.3) belongs to the assembly list only.
		let mut assembly_attributes = decode_custom_attributes(module.assembly_attributes(), &config, &interner)?;
		assembly_attributes.push(assembly_version_attribute(&module.assembly_version().to_string(), &interner));
		let module_attributes = decode_custom_attributes(module.module_attributes(), &config, &interner)?;

		let module_lock = Arc::new(Mutex::new(()));
		let mut top_level_types = Vec::with_capacity(module.top_level_types().len());
		for record in module.top_level_types() {
			if config.is_cancelled() {
				#[cfg(feature = "tracing")]
				tracing::debug!(assembly = module.assembly_name(), "load cancelled before visiting {}", record.short_name);
				return Err(LoaderError::Cancelled);
			}
			if !is_top_level_type_visible(record.visibility, &config) {
				continue;
			}
			let handle = match config.lazy_load {
				true => TypeDefinitionHandle::Lazy(crate::model::lazy::LazyTypeDefinition::new(record, config.clone(), module_lock.clone())?),
				false => TypeDefinitionHandle::Eager(build_type_definition(record, &config, &interner)?),
			};
			notify_entity_loaded(&handle, &config);
			top_level_types.push(handle);
		}
		#[cfg(feature = "tracing")]
		tracing::debug!(assembly = module.assembly_name(), count = top_level_types.len(), "top-level types loaded");

		let type_forwarders = build_forwarder_map(module.exported_forwarders());

		Ok(UnresolvedAssembly::new(
			interner.intern_str(module.assembly_name()),
			module.assembly_version(),
			interner.intern_str(module.location()),
			crate::model::arc_slice(assembly_attributes),
			crate::model::arc_slice(module_attributes),
			crate::model::arc_slice(top_level_types),
			type_forwarders,
		))
	}
}

/// Forces every deferred list on every lazily-loaded type in `assembly`
/// (§4.6 "finish"), then issues a memory barrier so later reads across
/// threads observe the materialized state.
pub fn finish(assembly: &UnresolvedAssembly) {
	assembly.finish();
}

fn notify_entity_loaded(handle: &TypeDefinitionHandle, config: &Configuration) {
	config.notify_loaded(UnresolvedEntityRef::Type(handle.clone()));
	if let TypeDefinitionHandle::Eager(def) = handle {
		for member in def.members.iter() {
			let entity = match member {
				crate::model::member::UnresolvedMember::Method(m) => UnresolvedEntityRef::Method(m.clone()),
				crate::model::member::UnresolvedMember::Field(f) => UnresolvedEntityRef::Field(f.clone()),
				crate::model::member::UnresolvedMember::Property(p) => UnresolvedEntityRef::Property(p.clone()),
				crate::model::member::UnresolvedMember::Event(e) => UnresolvedEntityRef::Event(e.clone()),
			};
			config.notify_loaded(entity);
		}
	}
}

fn build_forwarder_map(forwarders: &[crate::metadata::ForwarderRecord]) -> FxHashMap<TypeForwarderKey, Arc<str>> {
	forwarders
		.iter()
		.map(|f| {
			(
				TypeForwarderKey { namespace: Arc::from(f.namespace.as_str()), name: Arc::from(f.name.as_str()), arity: f.arity },
				Arc::from(f.target_assembly.as_str()),
			)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metadata::{Access, PrimitiveKind};
	use crate::testutil::{empty_module, empty_type_def, primitive_field};

	#[test]
	fn loads_a_single_public_type_with_one_field() {
		let mut type_def = empty_type_def("N", "C");
		type_def.fields.push(primitive_field("F", Access::Public, PrimitiveKind::Int32));
		let module = empty_module("Test", vec![type_def]);

		let loader = Loader::new();
		let assembly = loader.load(&module, Configuration::new()).unwrap();

		assert_eq!(assembly.name(), "Test");
		assert_eq!(assembly.top_level_types().len(), 1);
		assert_eq!(assembly.top_level_types()[0].name().as_ref(), "C");
	}

	#[test]
	fn internal_top_level_type_is_skipped_by_default() {
		let mut type_def = empty_type_def("N", "Internal");
		type_def.visibility = crate::metadata::TypeVisibility::NotPublic;
		let module = empty_module("Test", vec![type_def]);

		let loader = Loader::new();
		let assembly = loader.load(&module, Configuration::new()).unwrap();
		assert!(assembly.top_level_types().is_empty());
	}

	#[test]
	fn cancellation_stops_the_load_before_further_types_are_visited() {
		let types = vec![empty_type_def("N", "A"), empty_type_def("N", "B")];
		let module = empty_module("Test", types);
		let config = Configuration::new().with_cancellation(Arc::new(|| true));

		let loader = Loader::new();
		let result = loader.load(&module, config);
		assert!(matches!(result, Err(LoaderError::Cancelled)));
	}
}
