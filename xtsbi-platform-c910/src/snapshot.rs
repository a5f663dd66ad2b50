//! The boot hart's privileged register snapshot.
//!
//! Protection and micro-architecture CSRs are per-hart, and harts come
//! out of reset with implementation-defined values. The boot hart's
//! configuration is therefore captured once during cold boot and
//! replayed onto every hart that is started later, so software above
//! sees the same configuration wherever it runs.

use xtsbi_arch_riscv64::{Csr, HartCsrs, HartId};
use xtsbi_debug::dbg;
use xtsbi_sync::Once;

use crate::PlatformError;

/// Privileged configuration captured from the boot hart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
	/// Captured values, indexed like [`RegisterSnapshot::REPLAYED`].
	values:         [usize; 14],
	/// Base address of the PLIC, from the vendor `plic_base` register.
	pub plic_base:  usize,
	/// Base address of the CLINT, at a fixed offset from the PLIC.
	pub clint_base: usize,
}

impl RegisterSnapshot {
	/// Registers replayed onto warm-booting harts, in write order.
	///
	/// The eight PMP address registers and `pmpcfg0`, followed by the
	/// micro-architecture registers: `mcor` (cache operations), `mhcr`
	/// (hardware configuration), `mccr2` (L2 cache control), `mhint`
	/// (prefetch and branch prediction hints) and `mxstatus`.
	pub const REPLAYED: [Csr; 14] = [
		Csr::Pmpaddr0,
		Csr::Pmpaddr1,
		Csr::Pmpaddr2,
		Csr::Pmpaddr3,
		Csr::Pmpaddr4,
		Csr::Pmpaddr5,
		Csr::Pmpaddr6,
		Csr::Pmpaddr7,
		Csr::Pmpcfg0,
		Csr::Mcor,
		Csr::Mhcr,
		Csr::Mccr2,
		Csr::Mhint,
		Csr::Mxstatus,
	];

	/// Reads the snapshot from the given hart.
	#[must_use]
	pub fn read_from(hart: &impl HartCsrs, plic_clint_offset: usize) -> Self {
		let plic_base = hart.read(Csr::PlicBase);

		Self {
			values: Self::REPLAYED.map(|csr| hart.read(csr)),
			plic_base,
			clint_base: plic_base.wrapping_add(plic_clint_offset),
		}
	}

	/// Writes every replayed register onto the given hart.
	pub fn write_to(&self, hart: &mut impl HartCsrs) {
		for (csr, value) in Self::REPLAYED.into_iter().zip(self.values) {
			hart.write(csr, value);
		}
	}
}

/// Owns the boot hart's [`RegisterSnapshot`].
///
/// Written exactly once by [`SnapshotStore::capture`]; read-only after.
/// The snapshot is published with release/acquire ordering, so a hart
/// that observes it also observes every captured value.
#[derive(Debug, Default)]
pub struct SnapshotStore {
	/// The snapshot, once captured.
	snapshot: Once<RegisterSnapshot>,
}

impl SnapshotStore {
	/// Creates an empty store.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			snapshot: Once::new(),
		}
	}

	/// Captures the executing hart's configuration.
	///
	/// Must run on the cold-boot hart before any other hart is started.
	///
	/// # Errors
	/// Returns [`PlatformError::SnapshotAlreadyCaptured`] if a snapshot
	/// exists; the existing snapshot is left untouched.
	pub fn capture(
		&self,
		hart: &impl HartCsrs,
		plic_clint_offset: usize,
	) -> Result<&RegisterSnapshot, PlatformError> {
		self.snapshot
			.init_with(|| RegisterSnapshot::read_from(hart, plic_clint_offset))
			.map_err(|_| PlatformError::SnapshotAlreadyCaptured)
	}

	/// Replays the captured configuration onto the executing hart.
	///
	/// # Errors
	/// Returns [`PlatformError::SnapshotMissing`] if nothing has been
	/// captured yet; no register is written in that case.
	pub fn replay(&self, hart: &mut impl HartCsrs) -> Result<&RegisterSnapshot, PlatformError> {
		let snapshot = self.require()?;
		snapshot.write_to(hart);
		dbg!("replayed boot register snapshot onto {}", HartId::current(&*hart));
		Ok(snapshot)
	}

	/// The captured snapshot, if any.
	#[must_use]
	pub fn get(&self) -> Option<&RegisterSnapshot> {
		self.snapshot.get()
	}

	/// The captured snapshot.
	///
	/// # Errors
	/// Returns [`PlatformError::SnapshotMissing`] if nothing has been
	/// captured yet.
	pub fn require(&self) -> Result<&RegisterSnapshot, PlatformError> {
		self.get().ok_or(PlatformError::SnapshotMissing)
	}
}
