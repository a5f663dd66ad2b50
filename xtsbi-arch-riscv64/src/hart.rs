//! Hart identifiers.

use core::fmt;

use crate::{Csr, HartCsrs};

/// Identifies one hart (`0..N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HartId(u32);

impl HartId {
	/// Wraps a raw hart number.
	#[must_use]
	pub const fn new(id: u32) -> Self {
		Self(id)
	}

	/// Returns the raw hart number.
	#[must_use]
	pub const fn get(self) -> u32 {
		self.0
	}

	/// Reads the identifier of the hart that owns `csrs`.
	#[must_use]
	pub fn current(csrs: &impl HartCsrs) -> Self {
		Self(csrs.read(Csr::Mhartid) as u32)
	}

	/// The single-bit mask selecting this hart in per-hart bitmap
	/// registers, or `None` if the hart does not fit in a register.
	#[must_use]
	pub const fn mask(self) -> Option<usize> {
		1_usize.checked_shl(self.0)
	}
}

impl From<u32> for HartId {
	fn from(id: u32) -> Self {
		Self(id)
	}
}

impl fmt::Display for HartId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "hart{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mask_selects_one_bit() {
		assert_eq!(HartId::new(0).mask(), Some(1));
		assert_eq!(HartId::new(5).mask(), Some(0b10_0000));
		assert_eq!(HartId::new(63).mask(), Some(1 << 63));
		assert_eq!(HartId::new(64).mask(), None);
	}

	#[test]
	fn display() {
		assert_eq!(HartId::new(3).to_string(), "hart3");
	}
}
