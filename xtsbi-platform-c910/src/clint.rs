//! Interface to the CLINT driver (IPIs and the machine timer).
//!
//! The driver itself lives in the framework; the platform decides
//! when it is initialized and with which base address.

use core::num::NonZeroI32;

use xtsbi_arch_riscv64::HartId;

/// CLINT instance description handed to the driver at cold boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClintConfig {
	/// Base address of the CLINT register block.
	pub addr:           usize,
	/// First hart served by this CLINT.
	pub first_hart_id:  HartId,
	/// Number of harts served by this CLINT.
	pub hart_count:     u32,
	/// Whether `mtime`/`mtimecmp` may be accessed with 64-bit loads and stores.
	pub has_64bit_mmio: bool,
}

/// The CLINT driver.
///
/// Failures are the driver's nonzero status codes; the platform passes
/// them through unchanged.
pub trait Clint: Sync {
	/// One-time, system-wide IPI setup. Called on the cold-boot hart only.
	fn cold_ipi_init(&self, config: &ClintConfig) -> Result<(), NonZeroI32>;

	/// Per-hart IPI registration.
	fn warm_ipi_init(&self, hart: HartId) -> Result<(), NonZeroI32>;

	/// Raises a software interrupt on `target`.
	fn ipi_send(&self, target: HartId);

	/// Clears the software interrupt of `target`.
	fn ipi_clear(&self, target: HartId);

	/// One-time, system-wide timer setup. Called on the cold-boot hart only.
	fn cold_timer_init(&self, config: &ClintConfig) -> Result<(), NonZeroI32>;

	/// Per-hart timer registration.
	fn warm_timer_init(&self, hart: HartId) -> Result<(), NonZeroI32>;

	/// Arms `hart`'s timer to fire at `next_event` (in `mtime` ticks).
	fn timer_event_start(&self, hart: HartId, next_event: u64);
}
