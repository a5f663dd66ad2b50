//! The debug monitor trap.

/// Traps into the debug monitor.
///
/// On hardware this is an `ebreak` in machine mode; whether control
/// comes back depends entirely on the monitor (a JTAG probe or a
/// board-level handler). Callers treat a return as "the monitor
/// declined to stop us", never as success.
pub trait Monitor: Sync {
	/// Executes the trap.
	fn breakpoint(&self);
}

/// Traps with the `ebreak` instruction.
#[cfg(target_arch = "riscv64")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Ebreak;

#[cfg(target_arch = "riscv64")]
impl Monitor for Ebreak {
	fn breakpoint(&self) {
		// SAFETY: `ebreak` only transfers control to the debug monitor.
		unsafe {
			core::arch::asm!("ebreak", options(nostack));
		}
	}
}
