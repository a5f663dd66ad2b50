//! Boots simulated multi-hart systems end to end.

use std::{
	num::NonZeroI32,
	sync::atomic::{AtomicU32, AtomicUsize, Ordering},
	thread,
};

use xtsbi_arch_riscv64::sim::{RecordingMonitor, SimBus, SimHart};
use xtsbi_platform_c910::{
	BootFailure, BootStage, C910, Clint, ClintConfig, Csr, HartCsrs, HartId, Platform,
	PlatformConfig, PlatformError, RegisterSnapshot, TrapReason, boot_hart,
	config::PLIC_DELEG_OFFSET, status, vendor::TrapInfo,
};

const PLIC_BASE: usize = 0x0800_0000;

/// Counts backend calls; optionally fails the cold IPI init.
#[derive(Debug, Default)]
struct CountingClint {
	cold_ipi:   AtomicUsize,
	warm_ipi:   AtomicUsize,
	cold_timer: AtomicUsize,
	warm_timer: AtomicUsize,
	clint_addr: AtomicUsize,
	hart_count: AtomicU32,
	fail_ipi:   Option<NonZeroI32>,
}

impl Clint for CountingClint {
	fn cold_ipi_init(&self, config: &ClintConfig) -> Result<(), NonZeroI32> {
		self.cold_ipi.fetch_add(1, Ordering::SeqCst);
		self.clint_addr.store(config.addr, Ordering::SeqCst);
		self.hart_count.store(config.hart_count, Ordering::SeqCst);
		self.fail_ipi.map_or(Ok(()), Err)
	}

	fn warm_ipi_init(&self, _hart: HartId) -> Result<(), NonZeroI32> {
		self.warm_ipi.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	fn ipi_send(&self, _target: HartId) {}

	fn ipi_clear(&self, _target: HartId) {}

	fn cold_timer_init(&self, _config: &ClintConfig) -> Result<(), NonZeroI32> {
		self.cold_timer.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	fn warm_timer_init(&self, _hart: HartId) -> Result<(), NonZeroI32> {
		self.warm_timer.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	fn timer_event_start(&self, _hart: HartId, _next_event: u64) {}
}

type SimPlatform = C910<CountingClint, SimBus, RecordingMonitor>;

fn platform(clint: CountingClint) -> SimPlatform {
	C910::new(
		PlatformConfig::DEFAULT.with_fw_text_start(0x0020_0000),
		clint,
		SimBus::new(),
		RecordingMonitor::new(),
	)
}

fn boot_hart0() -> SimHart {
	let mut hart = SimHart::new(HartId::new(0)).with(Csr::PlicBase, PLIC_BASE);
	for (i, &csr) in RegisterSnapshot::REPLAYED.iter().enumerate() {
		hart.poke(csr, 0xc910_0000 + i);
	}
	hart
}

#[test]
fn four_harts_share_boot_configuration() {
	let platform = C910::new(
		PlatformConfig::DEFAULT
			.with_fw_text_start(0x0020_0000)
			.with_hart_count(4),
		CountingClint::default(),
		SimBus::new(),
		RecordingMonitor::new(),
	);
	assert_eq!(Platform::<SimHart>::descriptor(&platform).hart_count, 4);
	let mut boot = boot_hart0();

	assert_eq!(boot_hart(&platform, &mut boot, true), Ok(BootStage::Ready));
	for id in 1..4 {
		platform.hart_start(&mut boot, HartId::new(id), 0).unwrap();
	}
	assert_eq!(
		platform.hart_start(&mut boot, HartId::new(4), 0),
		Err(PlatformError::InvalidHart(HartId::new(4)))
	);
	assert_eq!(boot.read(Csr::Mrmr), 0b1110);
	assert_eq!(boot.read(Csr::Mrvbr), 0x0020_0000);
	assert_eq!(platform.snapshot().map(|s| s.clint_base), Some(0x0c00_0000));

	let expected = boot.dump(&RegisterSnapshot::REPLAYED);
	thread::scope(|scope| {
		for id in 1..4_u32 {
			let platform = &platform;
			let expected = &expected;
			scope.spawn(move || {
				let mut hart = SimHart::scrambled(HartId::new(id), u64::from(id) * 0x9e37);
				assert_eq!(boot_hart(platform, &mut hart, false), Ok(BootStage::Ready));
				assert_eq!(&hart.dump(&RegisterSnapshot::REPLAYED), expected);
			});
		}
	});

	let clint = platform.clint();
	assert_eq!(clint.cold_ipi.load(Ordering::SeqCst), 1);
	assert_eq!(clint.cold_timer.load(Ordering::SeqCst), 1);
	assert_eq!(clint.warm_ipi.load(Ordering::SeqCst), 4);
	assert_eq!(clint.warm_timer.load(Ordering::SeqCst), 4);
	assert_eq!(clint.clint_addr.load(Ordering::SeqCst), 0x0c00_0000);
	assert_eq!(clint.hart_count.load(Ordering::SeqCst), 4);

	let deleg = PLIC_BASE + PLIC_DELEG_OFFSET;
	let writes = platform.bus().writes();
	assert_eq!(writes.len(), 4);
	assert!(writes.iter().all(|&w| w == (deleg, 1)));
}

#[test]
fn warm_boot_before_cold_boot_fails_early() {
	let platform = platform(CountingClint::default());
	let mut hart = SimHart::scrambled(HartId::new(2), 11);

	assert_eq!(
		boot_hart(&platform, &mut hart, false),
		Err(BootFailure {
			stage: BootStage::EarlyInit,
			error: PlatformError::SnapshotMissing,
		})
	);
	assert!(hart.writes().is_empty());
}

#[test]
fn cold_ipi_failure_stops_the_boot() {
	let code = NonZeroI32::new(-3).unwrap();
	let platform = platform(CountingClint {
		fail_ipi: Some(code),
		..CountingClint::default()
	});
	let mut boot = boot_hart0();

	let failure = boot_hart(&platform, &mut boot, true).unwrap_err();
	assert_eq!(failure.stage, BootStage::IpiInit);
	assert_eq!(failure.error, PlatformError::Ipi(code));
	assert_eq!(status(Err(failure.error)), -3);

	let clint = platform.clint();
	assert_eq!(clint.warm_ipi.load(Ordering::SeqCst), 0);
	assert_eq!(clint.cold_timer.load(Ordering::SeqCst), 0);
}

#[test]
fn vendor_calls_after_boot() {
	let platform = platform(CountingClint::default());
	let mut boot = boot_hart0();
	boot_hart(&platform, &mut boot, true).unwrap();

	let before = boot.dump(Csr::ALL);
	let mut value = 0;
	let mut trap = TrapInfo::default();
	platform
		.vendor_ext_provider(&mut boot, 0x0900_0001, 0, &[2, 5, 42], &mut value, &mut trap)
		.unwrap();

	let after = boot.dump(Csr::ALL);
	let changed: Vec<_> = before
		.iter()
		.zip(&after)
		.filter(|(b, a)| b != a)
		.map(|(_, &a)| a)
		.collect();
	assert_eq!(changed, [(Csr::Mhpmevent5, 42)]);

	let err = platform
		.vendor_ext_provider(&mut boot, 0x0900_00ff, 0, &[2, 6, 42], &mut value, &mut trap)
		.unwrap_err();
	assert_eq!(
		err,
		PlatformError::UnrecoverableTrap(TrapReason::UnsupportedVendorExtension(0x0900_00ff))
	);
	assert_eq!(boot.dump(Csr::ALL), after);
	assert_eq!(platform.monitor().hits(), 1);
}

#[test]
fn hart_start_bits() {
	let platform = platform(CountingClint::default());
	let mut boot = boot_hart0();

	for id in [15, 3, 15, 0] {
		let before = boot.read(Csr::Mrmr);
		platform.hart_start(&mut boot, HartId::new(id), 0).unwrap();
		let after = boot.read(Csr::Mrmr);
		assert_eq!(after, before | (1 << id));
		assert_eq!(after & before, before);
	}
	assert_eq!(boot.read(Csr::Mrmr), (1 << 15) | (1 << 3) | 1);
	assert_eq!(
		platform.hart_start(&mut boot, HartId::new(16), 0),
		Err(PlatformError::InvalidHart(HartId::new(16)))
	);
}
