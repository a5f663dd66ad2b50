//! Control and status registers touched by the platform layer.

use core::{fmt, ops::RangeInclusive};

/// Invokes `$m!` with the full CSR table.
///
/// Each entry is `Variant = number, "name"`, optionally followed by
/// `, ro` for registers that are read-only to machine mode. Every
/// consumer (the [`Csr`] enum itself, the hardware accessors, the
/// simulator) expands from this single table.
macro_rules! for_each_csr {
	($m:ident) => {
		$m! {
			// Standard machine-mode registers.
			Mideleg = 0x303, "mideleg";
			Mhartid = 0xf14, "mhartid", ro;
			Pmpcfg0 = 0x3a0, "pmpcfg0";
			Pmpaddr0 = 0x3b0, "pmpaddr0";
			Pmpaddr1 = 0x3b1, "pmpaddr1";
			Pmpaddr2 = 0x3b2, "pmpaddr2";
			Pmpaddr3 = 0x3b3, "pmpaddr3";
			Pmpaddr4 = 0x3b4, "pmpaddr4";
			Pmpaddr5 = 0x3b5, "pmpaddr5";
			Pmpaddr6 = 0x3b6, "pmpaddr6";
			Pmpaddr7 = 0x3b7, "pmpaddr7";
			Mhpmevent3 = 0x323, "mhpmevent3";
			Mhpmevent4 = 0x324, "mhpmevent4";
			Mhpmevent5 = 0x325, "mhpmevent5";
			Mhpmevent6 = 0x326, "mhpmevent6";
			Mhpmevent7 = 0x327, "mhpmevent7";
			Mhpmevent8 = 0x328, "mhpmevent8";
			Mhpmevent9 = 0x329, "mhpmevent9";
			Mhpmevent10 = 0x32a, "mhpmevent10";
			Mhpmevent11 = 0x32b, "mhpmevent11";
			Mhpmevent12 = 0x32c, "mhpmevent12";
			Mhpmevent13 = 0x32d, "mhpmevent13";
			Mhpmevent14 = 0x32e, "mhpmevent14";
			Mhpmevent15 = 0x32f, "mhpmevent15";
			Mhpmevent16 = 0x330, "mhpmevent16";
			Mhpmevent17 = 0x331, "mhpmevent17";
			Mhpmevent18 = 0x332, "mhpmevent18";
			Mhpmevent19 = 0x333, "mhpmevent19";
			Mhpmevent20 = 0x334, "mhpmevent20";
			Mhpmevent21 = 0x335, "mhpmevent21";
			Mhpmevent22 = 0x336, "mhpmevent22";
			Mhpmevent23 = 0x337, "mhpmevent23";
			Mhpmevent24 = 0x338, "mhpmevent24";
			Mhpmevent25 = 0x339, "mhpmevent25";
			Mhpmevent26 = 0x33a, "mhpmevent26";
			Mhpmevent27 = 0x33b, "mhpmevent27";
			Mhpmevent28 = 0x33c, "mhpmevent28";
			Mhpmevent29 = 0x33d, "mhpmevent29";
			Mhpmevent30 = 0x33e, "mhpmevent30";
			Mhpmevent31 = 0x33f, "mhpmevent31";
			// T-HEAD XuanTie extensions.
			Mxstatus = 0x7c0, "mxstatus";
			Mhcr = 0x7c1, "mhcr";
			Mcor = 0x7c2, "mcor";
			Mccr2 = 0x7c3, "mccr2";
			Mhint = 0x7c5, "mhint";
			Mrmr = 0x7c6, "mrmr";
			Mrvbr = 0x7c7, "mrvbr";
			Mcounterwen = 0x7c9, "mcounterwen";
			PlicBase = 0xfc1, "plic_base", ro;
		}
	};
}

#[cfg(target_arch = "riscv64")]
pub(crate) use for_each_csr;

/// Expands the CSR table into the [`Csr`] enum.
macro_rules! define_csr_enum {
	($( $variant:ident = $num:literal, $name:literal $(, $ro:ident)?; )*) => {
		/// A machine-mode control and status register.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		#[repr(u16)]
		pub enum Csr {
			$(
				#[doc = concat!("The `", $name, "` register.")]
				$variant = $num,
			)*
		}

		impl Csr {
			/// Every register in the table.
			pub const ALL: &'static [Self] = &[$(Self::$variant),*];

			/// The architectural CSR number.
			#[must_use]
			pub const fn number(self) -> u16 {
				self as u16
			}

			/// The assembler name of the register.
			#[must_use]
			pub const fn name(self) -> &'static str {
				match self {
					$(Self::$variant => $name,)*
				}
			}

			/// Whether machine mode may only read the register.
			#[must_use]
			pub const fn is_read_only(self) -> bool {
				match self {
					$(Self::$variant => define_csr_enum!(@ro $($ro)?),)*
				}
			}
		}
	};
	(@ro ro) => { true };
	(@ro) => { false };
}

for_each_csr!(define_csr_enum);

/// Counter slots backed by an `mhpmevent` selector register.
pub const MHPMEVENT_SLOTS: RangeInclusive<usize> = 3..=31;

/// `mhpmevent` selector registers, indexed by `slot - 3`.
const MHPMEVENT: [Csr; 29] = [
	Csr::Mhpmevent3,
	Csr::Mhpmevent4,
	Csr::Mhpmevent5,
	Csr::Mhpmevent6,
	Csr::Mhpmevent7,
	Csr::Mhpmevent8,
	Csr::Mhpmevent9,
	Csr::Mhpmevent10,
	Csr::Mhpmevent11,
	Csr::Mhpmevent12,
	Csr::Mhpmevent13,
	Csr::Mhpmevent14,
	Csr::Mhpmevent15,
	Csr::Mhpmevent16,
	Csr::Mhpmevent17,
	Csr::Mhpmevent18,
	Csr::Mhpmevent19,
	Csr::Mhpmevent20,
	Csr::Mhpmevent21,
	Csr::Mhpmevent22,
	Csr::Mhpmevent23,
	Csr::Mhpmevent24,
	Csr::Mhpmevent25,
	Csr::Mhpmevent26,
	Csr::Mhpmevent27,
	Csr::Mhpmevent28,
	Csr::Mhpmevent29,
	Csr::Mhpmevent30,
	Csr::Mhpmevent31,
];

impl Csr {
	/// The event selector register for the given counter slot, or
	/// `None` if the slot has no selector.
	#[must_use]
	pub fn mhpmevent(slot: usize) -> Option<Self> {
		slot.checked_sub(*MHPMEVENT_SLOTS.start())
			.and_then(|idx| MHPMEVENT.get(idx))
			.copied()
	}
}

impl fmt::Display for Csr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({:#05x})", self.name(), self.number())
	}
}

/// The register file of the hart that is currently executing.
///
/// CSRs are per-hart hardware state; an implementation only ever
/// observes the hart it runs on, so no synchronization is involved.
pub trait HartCsrs {
	/// Reads a register.
	fn read(&self, csr: Csr) -> usize;

	/// Writes a register.
	///
	/// Writes to read-only registers are discarded.
	fn write(&mut self, csr: Csr, value: usize);

	/// Sets the bits of `mask` in a register, leaving all others as they are.
	fn set_bits(&mut self, csr: Csr, mask: usize) {
		let value = self.read(csr);
		self.write(csr, value | mask);
	}
}
