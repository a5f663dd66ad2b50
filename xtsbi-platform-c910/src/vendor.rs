//! Vendor extension call routing.

use crate::pmu::PmuRequest;

/// First SBI extension id of the vendor-specific range.
pub const SBI_EXT_VENDOR_START: usize = 0x0900_0000;

/// Extension id of the C910 performance-counter call.
pub const SBI_EXT_VENDOR_C910_SET_PMU: usize = SBI_EXT_VENDOR_START + 1;

/// Trap details a vendor call may hand back to the framework for
/// redirection to S-mode.
///
/// No C910 vendor call produces one; the router leaves it untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrapInfo {
	/// Faulting program counter.
	pub epc:   usize,
	/// Trap cause.
	pub cause: usize,
	/// Trap value.
	pub tval:  usize,
}

/// A recognized vendor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorCall {
	/// `SBI_EXT_VENDOR_C910_SET_PMU`.
	SetPmu(PmuRequest),
}

impl VendorCall {
	/// Decodes a call from its extension id and first three arguments.
	///
	/// Returns `None` for extension ids this platform does not implement.
	#[must_use]
	pub const fn decode(ext_id: usize, args: &[usize; 3]) -> Option<Self> {
		match ext_id {
			SBI_EXT_VENDOR_C910_SET_PMU => {
				Some(Self::SetPmu(PmuRequest::decode(args[0], args[1], args[2])))
			}
			_ => None,
		}
	}
}
