//! Loader configuration (§6). Builder-style, mirrors the options spec.md
//! enumerates verbatim; nothing here is invented beyond what the spec names.

use std::sync::Arc;

use crate::model::assembly::UnresolvedEntityRef;

/// Callback invoked after each unresolved entity is fully registered (§4.8).
/// May fire from multiple threads when `lazy_load` is enabled (§4.8, §5).
pub type OnEntityLoaded = Arc<dyn Fn(UnresolvedEntityRef) + Send + Sync>;

/// Cooperative cancellation hook, checked once per top-level type during
/// eager loading (§5 "Cancellation").
pub type CancellationToken = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
pub struct Configuration {
	pub include_internal_members: bool,
	pub lazy_load: bool,
	pub use_dynamic_type: bool,
	pub use_tuple_types: bool,
	pub shorten_interface_impl_names: bool,
	pub on_entity_loaded: Option<OnEntityLoaded>,
	pub cancellation: Option<CancellationToken>,
}

impl Configuration {
	pub fn new() -> Self {
		Self {
			include_internal_members: false,
			lazy_load: false,
			use_dynamic_type: true,
			use_tuple_types: true,
			shorten_interface_impl_names: true,
			on_entity_loaded: None,
			cancellation: None,
		}
	}

	pub fn with_internal_members(mut self, include: bool) -> Self {
		self.include_internal_members = include;
		self
	}

	pub fn with_lazy_load(mut self, lazy: bool) -> Self {
		self.lazy_load = lazy;
		self
	}

	pub fn with_dynamic_type(mut self, enabled: bool) -> Self {
		self.use_dynamic_type = enabled;
		self
	}

	pub fn with_tuple_types(mut self, enabled: bool) -> Self {
		self.use_tuple_types = enabled;
		self
	}

	pub fn with_shortened_interface_impl_names(mut self, enabled: bool) -> Self {
		self.shorten_interface_impl_names = enabled;
		self
	}

	pub fn with_entity_loaded_callback(mut self, callback: OnEntityLoaded) -> Self {
		self.on_entity_loaded = Some(callback);
		self
	}

	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancellation = Some(token);
		self
	}

	pub(crate) fn notify_loaded(&self, entity: UnresolvedEntityRef) {
		if let Some(callback) = &self.on_entity_loaded {
			callback(entity);
		}
	}

	pub(crate) fn is_cancelled(&self) -> bool {
		match &self.cancellation {
			Some(token) => token(),
			None => false,
		}
	}
}

// Hand-rolled rather than derived: spec.md §6 defaults `use_dynamic_type`
// and `use_tuple_types` to `true`, which `#[derive(Default)]` cannot express.
impl Default for Configuration {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for Configuration {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Configuration")
			.field("include_internal_members", &self.include_internal_members)
			.field("lazy_load", &self.lazy_load)
			.field("use_dynamic_type", &self.use_dynamic_type)
			.field("use_tuple_types", &self.use_tuple_types)
			.field("shorten_interface_impl_names", &self.shorten_interface_impl_names)
			.field("on_entity_loaded", &self.on_entity_loaded.is_some())
			.field("cancellation", &self.cancellation.is_some())
			.finish()
	}
}
