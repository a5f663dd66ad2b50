//! The operations table the dispatch framework drives.

use xtsbi_arch_riscv64::{HartCsrs, HartId};

use crate::{
	descriptor::PlatformDescriptor,
	error::{PlatformError, ResetType},
	vendor::TrapInfo,
};

/// A platform as seen by the dispatch framework.
///
/// Every hook runs on the hart it configures; `hart` is that hart's
/// register file. The cold-boot hart runs each lifecycle hook with
/// `cold_boot == true` exactly once, before any other hart is started.
/// Every other hart (and every re-entry) runs them with
/// `cold_boot == false`.
///
/// Implementations must be shareable across harts; the only state they
/// may hold is written once during cold boot.
pub trait Platform<H: HartCsrs>: Sync {
	/// The static platform descriptor.
	fn descriptor(&self) -> &PlatformDescriptor;

	/// Captures (cold) or restores (warm) the per-hart privileged
	/// configuration.
	///
	/// # Errors
	/// Fails if the configuration was already captured (cold) or has
	/// not been captured yet (warm).
	fn early_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError>;

	/// Hands interrupt-controller ownership to S-mode.
	///
	/// # Errors
	/// Fails if the interrupt controller's base is not yet known.
	fn irqchip_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError>;

	/// Initializes inter-processor interrupts.
	///
	/// # Errors
	/// Propagates the IPI backend's status verbatim.
	fn ipi_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError>;

	/// Initializes the machine timer.
	///
	/// # Errors
	/// Propagates the timer backend's status verbatim.
	fn timer_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError>;

	/// Last hook before the hart enters S-mode.
	///
	/// # Errors
	/// Platform dependent.
	fn final_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError>;

	/// Sends an IPI to `target`.
	fn ipi_send(&self, target: HartId);

	/// Clears `target`'s pending IPI.
	fn ipi_clear(&self, target: HartId);

	/// Arms the executing hart's timer.
	fn timer_event_start(&self, hart: &H, next_event: u64);

	/// Releases `target` from reset. `start_addr` may be ignored by
	/// platforms that always start harts at the firmware entry point.
	///
	/// # Errors
	/// Fails if `target` is not one of the platform's harts.
	fn hart_start(&self, hart: &mut H, target: HartId, start_addr: usize)
	-> Result<(), PlatformError>;

	/// Resets the system.
	///
	/// # Errors
	/// Only returns if the reset did not take effect, in which case the
	/// error is terminal.
	fn system_reset(&self, reset_type: ResetType) -> Result<(), PlatformError>;

	/// Serves a vendor extension call.
	///
	/// # Errors
	/// Unknown extensions are terminal.
	fn vendor_ext_provider(
		&self,
		hart: &mut H,
		ext_id: usize,
		func_id: usize,
		args: &[usize; 3],
		out_value: &mut usize,
		out_trap: &mut TrapInfo,
	) -> Result<(), PlatformError>;
}
