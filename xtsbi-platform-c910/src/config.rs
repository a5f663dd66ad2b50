//! Build- and construction-time configuration of the platform.

include!(concat!(env!("OUT_DIR"), "/fw_text_start.rs"));

/// Number of harts in a C910 cluster.
pub const HART_COUNT: u32 = 16;

/// Stack reserved per hart by the framework, in bytes.
pub const HART_STACK_SIZE: u32 = 8192;

/// Distance from the PLIC base to the CLINT base (64 MiB).
pub const PLIC_CLINT_OFFSET: usize = 0x0400_0000;

/// Offset of the PLIC's S-mode delegation control register.
pub const PLIC_DELEG_OFFSET: usize = 0x001f_fffc;

/// Value written to the delegation register to hand PLIC enables to S-mode.
pub const PLIC_DELEG_ENABLE: u32 = 0x1;

/// Static configuration of a platform instance.
///
/// The defaults describe a stock C910 cluster; boards that relink the
/// firmware or fuse off harts override individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
	/// Address started harts begin fetching firmware instructions from.
	pub fw_text_start:     usize,
	/// Number of harts the framework may start.
	pub hart_count:        u32,
	/// Distance from the PLIC base to the CLINT base.
	pub plic_clint_offset: usize,
	/// Offset of the PLIC delegation register from the PLIC base.
	pub plic_deleg_offset: usize,
	/// Value written to the PLIC delegation register.
	pub plic_deleg_enable: u32,
}

impl PlatformConfig {
	/// The stock C910 configuration.
	pub const DEFAULT: Self = Self {
		fw_text_start:     FW_TEXT_START,
		hart_count:        HART_COUNT,
		plic_clint_offset: PLIC_CLINT_OFFSET,
		plic_deleg_offset: PLIC_DELEG_OFFSET,
		plic_deleg_enable: PLIC_DELEG_ENABLE,
	};

	/// Returns the configuration with a different firmware start address.
	#[must_use]
	pub const fn with_fw_text_start(mut self, fw_text_start: usize) -> Self {
		self.fw_text_start = fw_text_start;
		self
	}

	/// Returns the configuration with a different hart count.
	#[must_use]
	pub const fn with_hart_count(mut self, hart_count: u32) -> Self {
		self.hart_count = hart_count;
		self
	}
}

impl Default for PlatformConfig {
	fn default() -> Self {
		Self::DEFAULT
	}
}
