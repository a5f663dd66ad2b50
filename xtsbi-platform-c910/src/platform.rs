//! The XuanTie C910 platform.

use xtsbi_arch_riscv64::{Csr, HartCsrs, HartId, Mmio, Monitor};
use xtsbi_debug::{dbg, dbg_err, dbg_warn};

use crate::{
	clint::{Clint, ClintConfig},
	config::PlatformConfig,
	descriptor::PlatformDescriptor,
	error::{PlatformError, ResetType, TrapReason},
	ops::Platform,
	snapshot::{RegisterSnapshot, SnapshotStore},
	vendor::{TrapInfo, VendorCall},
};

/// The C910 platform layer.
///
/// `C` is the CLINT driver, `M` the system bus used to reach the PLIC
/// and `T` the debug monitor that reset and unknown vendor calls trap
/// into. One instance is shared by every hart.
#[derive(Debug)]
pub struct C910<C: Clint, M: Mmio, T: Monitor> {
	/// Build and board configuration.
	config:     PlatformConfig,
	/// The descriptor derived from `config`.
	descriptor: PlatformDescriptor,
	/// The boot hart's register snapshot.
	snapshot:   SnapshotStore,
	/// IPI and timer backend.
	clint:      C,
	/// System bus.
	bus:        M,
	/// Debug monitor.
	monitor:    T,
}

impl<C: Clint, M: Mmio, T: Monitor> C910<C, M, T> {
	/// Creates the platform. Nothing is touched until the first hook runs.
	#[must_use]
	pub const fn new(config: PlatformConfig, clint: C, bus: M, monitor: T) -> Self {
		Self {
			descriptor: PlatformDescriptor::c910(&config),
			config,
			snapshot: SnapshotStore::new(),
			clint,
			bus,
			monitor,
		}
	}

	/// The boot hart's register snapshot, if captured.
	#[must_use]
	pub fn snapshot(&self) -> Option<&RegisterSnapshot> {
		self.snapshot.get()
	}

	/// The CLINT backend.
	#[must_use]
	pub const fn clint(&self) -> &C {
		&self.clint
	}

	/// The system bus.
	#[must_use]
	pub const fn bus(&self) -> &M {
		&self.bus
	}

	/// The debug monitor.
	#[must_use]
	pub const fn monitor(&self) -> &T {
		&self.monitor
	}

	/// The CLINT instance description, derived from the snapshot.
	fn clint_config(&self) -> Result<ClintConfig, PlatformError> {
		let snapshot = self.snapshot.require()?;
		Ok(ClintConfig {
			addr:           snapshot.clint_base,
			first_hart_id:  HartId::new(0),
			hart_count:     self.config.hart_count,
			has_64bit_mmio: false,
		})
	}

	/// Traps into the monitor. Only returns if the monitor lets
	/// execution continue.
	fn trap(&self, reason: TrapReason) -> PlatformError {
		self.monitor.breakpoint();
		PlatformError::UnrecoverableTrap(reason)
	}
}

impl<H, C, M, T> Platform<H> for C910<C, M, T>
where
	H: HartCsrs,
	C: Clint,
	M: Mmio,
	T: Monitor,
{
	fn descriptor(&self) -> &PlatformDescriptor {
		&self.descriptor
	}

	fn early_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError> {
		if cold_boot {
			let snapshot = self
				.snapshot
				.capture(&*hart, self.config.plic_clint_offset)?;
			dbg!(
				"captured boot register snapshot on {} (plic={:#x}, clint={:#x})",
				HartId::current(&*hart),
				snapshot.plic_base,
				snapshot.clint_base
			);
		} else {
			self.snapshot.replay(hart)?;
		}

		Ok(())
	}

	fn irqchip_init(&self, _hart: &mut H, _cold_boot: bool) -> Result<(), PlatformError> {
		let snapshot = self.snapshot.require()?;
		let addr = snapshot
			.plic_base
			.wrapping_add(self.config.plic_deleg_offset);

		// SAFETY: `plic_base` was read from the hart's own `plic_base`
		// SAFETY: register, and the delegation register is a 32-bit,
		// SAFETY: naturally aligned register inside the PLIC block.
		unsafe {
			self.bus.write32(addr, self.config.plic_deleg_enable);
		}

		Ok(())
	}

	fn ipi_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError> {
		if cold_boot {
			let config = self.clint_config()?;
			self.clint
				.cold_ipi_init(&config)
				.map_err(PlatformError::Ipi)?;
		}

		self.clint
			.warm_ipi_init(HartId::current(&*hart))
			.map_err(PlatformError::Ipi)
	}

	fn timer_init(&self, hart: &mut H, cold_boot: bool) -> Result<(), PlatformError> {
		if cold_boot {
			let config = self.clint_config()?;
			self.clint
				.cold_timer_init(&config)
				.map_err(PlatformError::Timer)?;
		}

		self.clint
			.warm_timer_init(HartId::current(&*hart))
			.map_err(PlatformError::Timer)
	}

	fn final_init(&self, _hart: &mut H, _cold_boot: bool) -> Result<(), PlatformError> {
		Ok(())
	}

	fn ipi_send(&self, target: HartId) {
		self.clint.ipi_send(target);
	}

	fn ipi_clear(&self, target: HartId) {
		self.clint.ipi_clear(target);
	}

	fn timer_event_start(&self, hart: &H, next_event: u64) {
		self.clint.timer_event_start(HartId::current(hart), next_event);
	}

	fn hart_start(
		&self,
		hart: &mut H,
		target: HartId,
		_start_addr: usize,
	) -> Result<(), PlatformError> {
		// Released harts always enter at the firmware entry point; the
		// framework routes them to `start_addr` afterwards.
		let mask = target
			.mask()
			.filter(|_| target.get() < self.config.hart_count)
			.ok_or(PlatformError::InvalidHart(target))?;

		hart.write(Csr::Mrvbr, self.config.fw_text_start);
		hart.set_bits(Csr::Mrmr, mask);

		dbg!("released {target} from reset");

		Ok(())
	}

	fn system_reset(&self, reset_type: ResetType) -> Result<(), PlatformError> {
		dbg_warn!("system reset requested: {reset_type}");
		Err(self.trap(TrapReason::SystemReset(reset_type)))
	}

	fn vendor_ext_provider(
		&self,
		hart: &mut H,
		ext_id: usize,
		_func_id: usize,
		args: &[usize; 3],
		_out_value: &mut usize,
		_out_trap: &mut TrapInfo,
	) -> Result<(), PlatformError> {
		match VendorCall::decode(ext_id, args) {
			Some(VendorCall::SetPmu(request)) => {
				request.apply(hart);
				Ok(())
			}
			None => {
				dbg_err!("Unsupported private sbi call: {ext_id:#x}");
				Err(self.trap(TrapReason::UnsupportedVendorExtension(ext_id)))
			}
		}
	}
}
