//! Minimal cursor over a custom-attribute/constant blob (ECMA-335 §II.23.3),
//! just enough to decode the handful of well-known attribute shapes §4.3 and
//! §4.2.1 need (`DynamicAttribute`, `TupleElementNamesAttribute`,
//! `DecimalConstantAttribute`). Malformed input yields `None` everywhere -
//! callers turn that into "no constant"/"no flags", never a hard error, per
//! spec.md §7.

pub struct BlobReader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> BlobReader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	pub fn remaining(&self) -> usize {
		self.data.len().saturating_sub(self.pos)
	}

	pub fn read_u8(&mut self) -> Option<u8> {
		let b = *self.data.get(self.pos)?;
		self.pos += 1;
		Some(b)
	}

	pub fn read_u16_le(&mut self) -> Option<u16> {
		let bytes = self.data.get(self.pos..self.pos + 2)?;
		self.pos += 2;
		Some(u16::from_le_bytes(bytes.try_into().unwrap()))
	}

	pub fn read_u32_le(&mut self) -> Option<u32> {
		let bytes = self.data.get(self.pos..self.pos + 4)?;
		self.pos += 4;
		Some(u32::from_le_bytes(bytes.try_into().unwrap()))
	}

	pub fn read_i32_le(&mut self) -> Option<i32> {
		self.read_u32_le().map(|v| v as i32)
	}

	/// ECMA-335 §II.23.2 compressed unsigned integer.
	pub fn read_compressed_uint(&mut self) -> Option<u32> {
		let b0 = self.read_u8()?;
		if b0 & 0x80 == 0 {
			return Some(b0 as u32);
		}
		if b0 & 0xC0 == 0x80 {
			let b1 = self.read_u8()?;
			return Some((((b0 & 0x3F) as u32) << 8) | b1 as u32);
		}
		let b1 = self.read_u8()?;
		let b2 = self.read_u8()?;
		let b3 = self.read_u8()?;
		Some((((b0 & 0x1F) as u32) << 24) | ((b1 as u32) << 16) | ((b2 as u32) << 8) | b3 as u32)
	}

	/// A `SerString`: `0xFF` for null, otherwise a compressed length prefix
	/// followed by UTF-8 bytes.
	pub fn read_ser_string(&mut self) -> Option<Option<String>> {
		if *self.data.get(self.pos)? == 0xFF {
			self.pos += 1;
			return Some(None);
		}
		let len = self.read_compressed_uint()? as usize;
		let bytes = self.data.get(self.pos..self.pos + len)?;
		self.pos += len;
		Some(Some(String::from_utf8_lossy(bytes).into_owned()))
	}

	/// Checks and consumes the two-byte `0x0001` custom-attribute prolog.
	pub fn expect_prolog(&mut self) -> Option<()> {
		(self.read_u16_le()? == 0x0001).then_some(())
	}

	/// A fixed `SZArray` argument: 4-byte element count (`0xFFFFFFFF` = null)
	/// followed by that many elements, decoded with `read_elem`.
	pub fn read_array<T>(&mut self, mut read_elem: impl FnMut(&mut Self) -> Option<T>) -> Option<Vec<T>> {
		let count = self.read_u32_le()?;
		if count == 0xFFFFFFFF {
			return Some(Vec::new());
		}
		let mut out = Vec::with_capacity(count as usize);
		for _ in 0..count {
			out.push(read_elem(self)?);
		}
		Some(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn compressed_uint_single_byte() {
		let mut r = BlobReader::new(&[0x03]);
		assert_eq!(r.read_compressed_uint(), Some(3));
	}

	#[test]
	fn compressed_uint_two_byte() {
		let mut r = BlobReader::new(&[0x80, 0x80]);
		assert_eq!(r.read_compressed_uint(), Some(128));
	}

	#[test]
	fn ser_string_null() {
		let mut r = BlobReader::new(&[0xFF]);
		assert_eq!(r.read_ser_string(), Some(None));
	}

	#[test]
	fn ser_string_value() {
		let mut r = BlobReader::new(&[0x03, b'f', b'o', b'o']);
		assert_eq!(r.read_ser_string(), Some(Some("foo".to_string())));
	}

	#[test]
	fn bool_array_roundtrip() {
		let mut data = vec![0x01, 0x00, 0x00, 0x00u8.wrapping_add(0)];
		// 1-element array: count = 1
		data = vec![1, 0, 0, 0, 1u8];
		let mut r = BlobReader::new(&data);
		let arr = r.read_array(|r| r.read_u8().map(|b| b != 0));
		assert_eq!(arr, Some(vec![true]));
	}
}
