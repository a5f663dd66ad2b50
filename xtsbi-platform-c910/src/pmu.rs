//! Hardware performance counter configuration.
//!
//! Counter slots 3 through 31 each have an `mhpmevent` selector that
//! picks the micro-architectural event the counter counts. There is no
//! software-side table: bindings live only in the selector registers.

use core::ops::RangeInclusive;

use xtsbi_arch_riscv64::{Csr, HartCsrs, MHPMEVENT_SLOTS};
use xtsbi_debug::dbg_warn;

/// `mideleg` bit of the counter-overflow interrupt.
pub const OVERFLOW_IRQ: u32 = 17;

/// Slots bound by [`init_counters`].
pub const DEFAULT_SLOTS: RangeInclusive<usize> = 3..=28;

/// Value written to `mcounterwen` to let S-mode write every counter.
pub const ALL_COUNTERS_WRITABLE: usize = 0xffff_ffff;

/// The event selector [`init_counters`] binds to `slot`.
///
/// Slot 3 counts event 1, slot 4 event 2, and so on up to slot 28.
#[must_use]
pub fn default_event(slot: usize) -> Option<usize> {
	DEFAULT_SLOTS
		.contains(&slot)
		.then(|| slot.wrapping_sub(2))
}

/// Establishes the default counting configuration on the executing hart.
///
/// Delegates the counter-overflow interrupt to S-mode, opens every
/// counter for writing and binds slots 3..=28 to events 1..=26.
pub fn init_counters(hart: &mut impl HartCsrs) {
	hart.set_bits(Csr::Mideleg, 1 << OVERFLOW_IRQ);

	// `mcounteren` is already set up by the framework's mstatus init.
	hart.write(Csr::Mcounterwen, ALL_COUNTERS_WRITABLE);

	for slot in DEFAULT_SLOTS {
		if let (Some(csr), Some(event)) = (Csr::mhpmevent(slot), default_event(slot)) {
			hart.write(csr, event);
		}
	}
}

/// Binds `event` to counter `slot` on the executing hart.
///
/// Slots outside 3..=31 are accepted and ignored; nothing is written
/// and nothing is reported to the caller.
pub fn configure_counter(hart: &mut impl HartCsrs, slot: usize, event: usize) {
	match Csr::mhpmevent(slot) {
		Some(csr) => hart.write(csr, event),
		None => dbg_warn!(
			"ignoring event {event:#x} for counter slot {slot} (valid: {:?})",
			MHPMEVENT_SLOTS
		),
	}
}

/// A decoded counter configuration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmuRequest {
	/// Restore the default configuration ([`init_counters`]).
	Reset,
	/// Bind one slot ([`configure_counter`]).
	Map {
		/// Counter slot.
		slot:  usize,
		/// Event selector.
		event: usize,
	},
}

impl PmuRequest {
	/// Request type that maps a single slot.
	pub const TYPE_MAP: usize = 2;

	/// Decodes `(type, slot, event)`.
	///
	/// Only [`PmuRequest::TYPE_MAP`] selects a mapping; every other
	/// type, known or not, resets to the defaults and ignores
	/// `slot`/`event`.
	#[must_use]
	pub const fn decode(ty: usize, slot: usize, event: usize) -> Self {
		match ty {
			Self::TYPE_MAP => Self::Map { slot, event },
			_ => Self::Reset,
		}
	}

	/// Applies the request to the executing hart.
	pub fn apply(self, hart: &mut impl HartCsrs) {
		match self {
			Self::Reset => init_counters(hart),
			Self::Map { slot, event } => configure_counter(hart, slot, event),
		}
	}
}

#[cfg(test)]
mod tests {
	use xtsbi_arch_riscv64::{HartId, sim::SimHart};

	use super::*;

	#[test]
	fn init_binds_default_events() {
		let mut hart = SimHart::new(HartId::new(0)).with(Csr::Mideleg, 0b10_0010_0010);
		init_counters(&mut hart);

		for slot in 3..=28 {
			let csr = Csr::mhpmevent(slot).unwrap();
			assert_eq!(hart.read(csr), slot - 2, "{csr}");
		}
		for slot in 29..=31 {
			assert_eq!(hart.read(Csr::mhpmevent(slot).unwrap()), 0);
		}
		assert_eq!(hart.read(Csr::Mideleg), 0b10_0010_0010 | (1 << 17));
		assert_eq!(hart.read(Csr::Mcounterwen), 0xffff_ffff);
	}

	#[test]
	fn init_sets_exactly_one_delegation_bit() {
		let before = 0b10_0010_0010_usize;
		let mut hart = SimHart::new(HartId::new(0)).with(Csr::Mideleg, before);
		init_counters(&mut hart);
		let after = hart.read(Csr::Mideleg);
		assert_eq!((after ^ before).count_ones(), 1);
		assert_eq!(after & !before, 1 << 17);
	}

	#[test]
	fn configure_touches_exactly_one_selector() {
		for slot in MHPMEVENT_SLOTS {
			let mut hart = SimHart::new(HartId::new(0));
			configure_counter(&mut hart, slot, 0x42);
			assert_eq!(hart.writes(), [(Csr::mhpmevent(slot).unwrap(), 0x42)]);
		}
	}

	#[test]
	fn configure_ignores_out_of_range_slots() {
		for slot in [0, 1, 2, 32, 1000, usize::MAX] {
			let mut hart = SimHart::new(HartId::new(0));
			configure_counter(&mut hart, slot, 0x42);
			assert!(hart.writes().is_empty(), "slot {slot}");
		}
	}

	#[test]
	fn decode() {
		assert_eq!(PmuRequest::decode(2, 5, 42), PmuRequest::Map {
			slot:  5,
			event: 42,
		});
		assert_eq!(PmuRequest::decode(1, 5, 42), PmuRequest::Reset);
		assert_eq!(PmuRequest::decode(0, 5, 42), PmuRequest::Reset);
		assert_eq!(PmuRequest::decode(usize::MAX, 5, 42), PmuRequest::Reset);
	}

	#[test]
	fn default_events() {
		assert_eq!(default_event(3), Some(1));
		assert_eq!(default_event(28), Some(26));
		assert_eq!(default_event(29), None);
		assert_eq!(default_event(2), None);
	}
}
