//! CLI metadata tokens, kept close to the teacher's byte-level encoding so
//! that entities produced by this crate can be cross-referenced against the
//! metadata graph they were built from.

use std::fmt::{Debug, Formatter};

macro_rules! define_metadata_token {
    ($($id: ident = $discriminant: literal),* $(,)?) => {
		#[repr(u32)]
		#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
		pub enum MetadataTokenKind {
			$($id = $discriminant),*
		}

		#[derive(Copy, Clone, Eq, PartialEq, Hash)]
		pub struct MetadataToken(u32);

		impl MetadataToken {
			pub fn new(kind: MetadataTokenKind, index: u32) -> Self {
				debug_assert!(index & 0xFF000000 == 0);
				Self(((kind as u32) << 24) | index)
			}

			pub fn kind(&self) -> MetadataTokenKind {
				let discriminant = (self.0 & 0xFF000000) >> 24;
				match discriminant {
					$($discriminant => MetadataTokenKind::$id,)*
					_ => unreachable!("invalid metadata token discriminant"),
				}
			}

			pub fn index(&self) -> usize {
				(self.0 & 0x00FFFFFF) as usize
			}

			pub fn raw(&self) -> u32 {
				self.0
			}
		}

		impl TryFrom<u32> for MetadataToken {
			type Error = ();
			fn try_from(value: u32) -> Result<Self, Self::Error> {
				let discriminant = (value & 0xFF000000) >> 24;
				match discriminant {
					$($discriminant => Ok(Self(value)),)*
					_ => Err(()),
				}
			}
		}
	};
}

define_metadata_token! {
	Module = 0x00,
	TypeRef = 0x01,
	TypeDef = 0x02,
	Field = 0x04,
	Method = 0x06,
	Param = 0x08,
	InterfaceImpl = 0x09,
	MemberRef = 0x0a,
	CustomAttribute = 0x0c,
	Permission = 0x0e,
	Signature = 0x11,
	Event = 0x14,
	Property = 0x17,
	ModuleRef = 0x1a,
	TypeSpec = 0x1b,
	Assembly = 0x20,
	AssemblyRef = 0x23,
	File = 0x26,
	ExportedType = 0x27,
	ManifestResource = 0x28,
	GenericParam = 0x2a,
	MethodSpec = 0x2b,
	GenericParamConstraint = 0x2c,
}

impl Debug for MetadataToken {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "MetadataToken::{:?}({})", self.kind(), self.index())
	}
}

/// Marks `MetadataToken` safe for `nohash_hasher::NoHashHasher`: its derived
/// `Hash` impl writes the single `u32` field verbatim (newtype, one field),
/// so hashing is the identity function already - no bucket mixing needed for
/// a token-keyed map (mirrors the teacher's own `BuildNoHashHasher<u32>`
/// generic-parameter tables in `schema::r#type::TypePool`).
impl nohash_hasher::IsEnabled for MetadataToken {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_kind_and_index() {
		let token = MetadataToken::new(MetadataTokenKind::TypeDef, 7);
		assert_eq!(token.kind(), MetadataTokenKind::TypeDef);
		assert_eq!(token.index(), 7);
	}

	#[test]
	fn rejects_unknown_discriminant() {
		assert!(MetadataToken::try_from(0xFF000001u32).is_err());
	}
}
