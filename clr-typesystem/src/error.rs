//! Error type for the loader, in the teacher's manner
//! (`schema::errors::ReadError`): a plain enum with `Display`/`Error` impls,
//! no `thiserror` (the teacher never depends on it).

use std::fmt::{Display, Formatter};

use crate::token::MetadataToken;

/// Calling convention or signature shape the loader does not understand.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Unsupported {
	CallingConvention(u8),
	SignatureShape(&'static str),
}

#[derive(Debug)]
pub enum LoaderError {
	/// A required input was null/empty before any state was mutated (§7).
	InvalidArgument(&'static str),
	/// A metadata construct the loader does not model and cannot recover from locally.
	Unsupported(Unsupported),
	/// Cooperative cancellation observed at a type-iteration boundary (§5).
	Cancelled,
	/// A referenced entity could not be located by its token.
	DanglingToken(MetadataToken),
	/// A malformed blob that spec.md says to recover from locally by *not*
	/// producing a result, surfaced here only for diagnostics/logging -
	/// callers of the functions that can produce this never see it escape
	/// as an `Err`, they see `None` (see `attributes` and `members`).
	Malformed(&'static str),
}

impl Display for LoaderError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			LoaderError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
			LoaderError::Unsupported(Unsupported::CallingConvention(cc)) => {
				write!(f, "unsupported calling convention: 0x{cc:02x}")
			}
			LoaderError::Unsupported(Unsupported::SignatureShape(shape)) => {
				write!(f, "unsupported signature shape: {shape}")
			}
			LoaderError::Cancelled => write!(f, "load cancelled"),
			LoaderError::DanglingToken(token) => write!(f, "dangling metadata token: {token:?}"),
			LoaderError::Malformed(what) => write!(f, "malformed metadata: {what}"),
		}
	}
}

impl std::error::Error for LoaderError {}

pub type Result<T> = std::result::Result<T, LoaderError>;
