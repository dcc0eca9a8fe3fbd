//! A managed-assembly metadata loader: ingests a compiled binary conforming
//! to the Common Language Infrastructure (CLI) metadata format and produces
//! an **unresolved type system** - a frozen, in-memory description of every
//! publicly visible (optionally internal) type, member, parameter,
//! attribute, and type parameter in that binary.
//!
//! This crate occupies one layer only: the translation from a low-level
//! metadata graph (the [`metadata`] module's traits - type references, method
//! signatures, custom-attribute blobs, P/Invoke tables, security
//! declarations, marshaling descriptors, generic parameter tables) into the
//! higher-level, self-consistent domain model of [`model`]: interned,
//! lazily-materializable, thread-safe under concurrent reads once frozen.
//!
//! What this crate does *not* do: parse bytes off a PE image (that's the
//! `metadata` traits' job, implemented elsewhere), bind type references
//! across assemblies, execute code, emit IL, decompile method bodies, or
//! check generic constraints. Those are downstream concerns.
//!
//! The entry point is [`Loader::load`]; [`Configuration`] controls internals
//! visibility, lazy vs. eager materialization, and the optional
//! per-entity-loaded callback.

pub mod config;
pub mod driver;
pub mod error;
pub mod metadata;
pub mod model;
pub mod token;

mod blob;
mod intern;

#[cfg(test)]
mod testutil;

pub use config::Configuration;
pub use driver::{finish, Loader};
pub use error::{LoaderError, Result};
pub use model::assembly::UnresolvedAssembly;
