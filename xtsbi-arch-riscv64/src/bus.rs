//! Memory-mapped device access over the system bus.

/// The system bus, shared by every hart.
///
/// Unlike [`crate::HartCsrs`], writes through this are visible to all
/// harts, so implementations take `&self` and must be usable from any hart.
pub trait Mmio: Sync {
	/// Writes a 32-bit device register.
	///
	/// # Safety
	/// `addr` must be the address of a 32-bit device register whose
	/// write side effects the caller intends.
	unsafe fn write32(&self, addr: usize, value: u32);
}

/// The physical system bus, accessed with volatile loads and stores.
#[cfg(target_arch = "riscv64")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBus;

#[cfg(target_arch = "riscv64")]
impl Mmio for SystemBus {
	unsafe fn write32(&self, addr: usize, value: u32) {
		// SAFETY: Register validity is offloaded to the caller.
		match unsafe { xtsbi_type::Volatile::<u32>::at(addr) } {
			Some(reg) => reg.set(value),
			None => xtsbi_debug::dbg_err!("refusing misaligned 32-bit write to {addr:#x}"),
		}
	}
}
