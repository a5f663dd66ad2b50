//! Drives a hart through the platform's lifecycle hooks.

use xtsbi_arch_riscv64::{HartCsrs, HartId};
use xtsbi_debug::{dbg, dbg_err};

use crate::{error::PlatformError, ops::Platform};

/// The last lifecycle phase a hart completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BootStage {
	/// Out of reset; no hook has run.
	Reset,
	/// Per-hart privileged configuration is in place.
	EarlyInit,
	/// Interrupt controller ownership is delegated.
	IrqInit,
	/// IPIs are initialized.
	IpiInit,
	/// The timer is initialized.
	TimerInit,
	/// The final hook ran.
	FinalInit,
	/// The hart may enter S-mode.
	Ready,
}

impl BootStage {
	/// The stage that follows this one. `Ready` is final.
	#[must_use]
	pub const fn next(self) -> Self {
		match self {
			Self::Reset => Self::EarlyInit,
			Self::EarlyInit => Self::IrqInit,
			Self::IrqInit => Self::IpiInit,
			Self::IpiInit => Self::TimerInit,
			Self::TimerInit => Self::FinalInit,
			Self::FinalInit | Self::Ready => Self::Ready,
		}
	}
}

/// A lifecycle hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("boot failed entering {stage:?}: {error}")]
pub struct BootFailure {
	/// The stage whose hook failed.
	pub stage: BootStage,
	/// The hook's error.
	pub error: PlatformError,
}

/// Runs every lifecycle hook on the executing hart, in order.
///
/// The cold-boot hart must pass `cold_boot == true` and finish before
/// any other hart is started. Stops at the first failing hook; no hook
/// is retried.
///
/// # Errors
/// Returns the stage that failed along with the hook's error.
pub fn boot_hart<H, P>(platform: &P, hart: &mut H, cold_boot: bool) -> Result<BootStage, BootFailure>
where
	H: HartCsrs,
	P: Platform<H> + ?Sized,
{
	let id = HartId::current(&*hart);
	let mut stage = BootStage::Reset;

	while stage != BootStage::FinalInit {
		let target = stage.next();
		let result = match target {
			BootStage::EarlyInit => platform.early_init(hart, cold_boot),
			BootStage::IrqInit => platform.irqchip_init(hart, cold_boot),
			BootStage::IpiInit => platform.ipi_init(hart, cold_boot),
			BootStage::TimerInit => platform.timer_init(hart, cold_boot),
			BootStage::FinalInit => platform.final_init(hart, cold_boot),
			BootStage::Reset | BootStage::Ready => Ok(()),
		};

		if let Err(error) = result {
			dbg_err!("{id}: {target:?} failed: {error}");
			return Err(BootFailure {
				stage: target,
				error,
			});
		}

		stage = target;
	}

	dbg!("{id} ready ({})", if cold_boot { "cold" } else { "warm" });
	Ok(stage.next())
}
