//! In-memory stand-ins for hart register files, the system bus and the
//! debug monitor.
//!
//! These let the boot sequence run on a host: each simulated hart gets
//! its own [`SimHart`] (typically on its own thread), all of them share
//! one [`SimBus`], and the monitor records or aborts instead of
//! stopping the machine.

use std::{
	collections::BTreeMap,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use crate::{Csr, HartCsrs, HartId, Mmio, Monitor};

/// A simulated hart register file.
///
/// Registers that were never written read as zero, except `mhartid`,
/// which holds the hart's identifier. Every accepted write is also
/// appended to a write log so tests can assert exactly which
/// registers an operation touched.
#[derive(Debug, Clone)]
pub struct SimHart {
	/// Current register values.
	regs:   BTreeMap<Csr, usize>,
	/// Accepted writes, oldest first.
	writes: Vec<(Csr, usize)>,
}

impl SimHart {
	/// Creates a hart with every register zeroed.
	#[must_use]
	pub fn new(id: HartId) -> Self {
		let mut regs = BTreeMap::new();
		regs.insert(Csr::Mhartid, id.get() as usize);
		Self {
			regs,
			writes: Vec::new(),
		}
	}

	/// Creates a hart whose writable registers hold arbitrary
	/// power-on junk derived from `seed`.
	#[must_use]
	pub fn scrambled(id: HartId, seed: u64) -> Self {
		let mut hart = Self::new(id);
		let mut state = seed | 1;
		for &csr in Csr::ALL {
			if csr.is_read_only() {
				continue;
			}
			// xorshift64
			state ^= state << 13;
			state ^= state >> 7;
			state ^= state << 17;
			hart.regs.insert(csr, state as usize);
		}
		hart
	}

	/// Sets a register without going through [`HartCsrs::write`]:
	/// read-only registers can be seeded and the write log is untouched.
	pub fn poke(&mut self, csr: Csr, value: usize) -> &mut Self {
		self.regs.insert(csr, value);
		self
	}

	/// Builder form of [`SimHart::poke`].
	#[must_use]
	pub fn with(mut self, csr: Csr, value: usize) -> Self {
		self.poke(csr, value);
		self
	}

	/// The identifier in `mhartid`.
	#[must_use]
	pub fn id(&self) -> HartId {
		HartId::current(self)
	}

	/// Every accepted write, oldest first.
	#[must_use]
	pub fn writes(&self) -> &[(Csr, usize)] {
		&self.writes
	}

	/// Returns a copy of the given registers' values.
	#[must_use]
	pub fn dump(&self, csrs: &[Csr]) -> Vec<(Csr, usize)> {
		csrs.iter().map(|&csr| (csr, self.read(csr))).collect()
	}
}

impl HartCsrs for SimHart {
	fn read(&self, csr: Csr) -> usize {
		self.regs.get(&csr).copied().unwrap_or(0)
	}

	fn write(&mut self, csr: Csr, value: usize) {
		if csr.is_read_only() {
			return;
		}
		self.regs.insert(csr, value);
		self.writes.push((csr, value));
	}
}

/// A simulated system bus: sparse 32-bit registers plus a write log.
#[derive(Debug, Default)]
pub struct SimBus {
	/// Register values by address.
	cells:  Mutex<BTreeMap<usize, u32>>,
	/// Writes, oldest first.
	writes: Mutex<Vec<(usize, u32)>>,
}

impl SimBus {
	/// Creates an empty bus; unwritten registers read as zero.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The current value of a register.
	#[must_use]
	pub fn peek(&self, addr: usize) -> u32 {
		self.cells
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
			.get(&addr)
			.copied()
			.unwrap_or(0)
	}

	/// Every write, oldest first.
	#[must_use]
	pub fn writes(&self) -> Vec<(usize, u32)> {
		self.writes
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
			.clone()
	}
}

impl Mmio for SimBus {
	unsafe fn write32(&self, addr: usize, value: u32) {
		self.cells
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
			.insert(addr, value);
		self.writes
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
			.push((addr, value));
	}
}

/// A monitor that counts traps and then lets execution continue.
#[derive(Debug, Default)]
pub struct RecordingMonitor {
	/// Number of traps taken.
	hits: AtomicUsize,
}

impl RecordingMonitor {
	/// Creates a monitor that has not trapped yet.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			hits: AtomicUsize::new(0),
		}
	}

	/// Number of traps taken so far.
	#[must_use]
	pub fn hits(&self) -> usize {
		self.hits.load(Ordering::SeqCst)
	}
}

impl Monitor for RecordingMonitor {
	fn breakpoint(&self) {
		self.hits.fetch_add(1, Ordering::SeqCst);
	}
}

/// A monitor that never returns: it panics, standing in for a halted
/// machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbortingMonitor;

impl Monitor for AbortingMonitor {
	fn breakpoint(&self) {
		panic!("ebreak: unrecoverable platform trap");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unwritten_registers_read_zero() {
		let hart = SimHart::new(HartId::new(2));
		assert_eq!(hart.read(Csr::Mxstatus), 0);
		assert_eq!(hart.id(), HartId::new(2));
	}

	#[test]
	fn read_only_writes_are_discarded() {
		let mut hart = SimHart::new(HartId::new(1)).with(Csr::PlicBase, 0x1000);
		hart.write(Csr::PlicBase, 0x2000);
		hart.write(Csr::Mhartid, 9);
		assert_eq!(hart.read(Csr::PlicBase), 0x1000);
		assert_eq!(hart.id(), HartId::new(1));
		assert!(hart.writes().is_empty());
	}

	#[test]
	fn writes_are_logged() {
		let mut hart = SimHart::new(HartId::new(0));
		hart.set_bits(Csr::Mideleg, 1 << 17);
		hart.set_bits(Csr::Mideleg, 1 << 1);
		assert_eq!(hart.read(Csr::Mideleg), (1 << 17) | (1 << 1));
		assert_eq!(
			hart.writes(),
			[(Csr::Mideleg, 1 << 17), (Csr::Mideleg, (1 << 17) | (1 << 1))]
		);
	}

	#[test]
	fn scrambled_harts_differ() {
		let a = SimHart::scrambled(HartId::new(1), 1);
		let b = SimHart::scrambled(HartId::new(2), 2);
		assert_ne!(a.read(Csr::Pmpaddr0), b.read(Csr::Pmpaddr0));
		assert_eq!(a.id(), HartId::new(1));
	}

	#[test]
	fn bus_round_trip() {
		let bus = SimBus::new();
		// SAFETY: Simulated bus.
		unsafe { bus.write32(0x100, 5) };
		assert_eq!(bus.peek(0x100), 5);
		assert_eq!(bus.writes(), [(0x100, 5)]);
	}

	#[test]
	fn recording_monitor_counts() {
		let monitor = RecordingMonitor::new();
		monitor.breakpoint();
		monitor.breakpoint();
		assert_eq!(monitor.hits(), 2);
	}

	#[test]
	#[should_panic(expected = "unrecoverable platform trap")]
	fn aborting_monitor_never_returns() {
		AbortingMonitor.breakpoint();
	}
}
