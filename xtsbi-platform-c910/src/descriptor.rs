//! The static platform descriptor handed to the framework at startup.

use bitflags::bitflags;

use crate::config::{HART_STACK_SIZE, PlatformConfig};

bitflags! {
	/// Optional capabilities the framework may rely on.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct Features: u64 {
		/// The platform can read the timer value.
		const TIMER_VALUE = 1 << 0;
		/// Harts can be hot-plugged.
		const HART_HOTPLUG = 1 << 1;
		/// Physical memory protection is implemented.
		const PMP = 1 << 2;
		/// `scounteren` is implemented.
		const SCOUNTEREN = 1 << 3;
		/// `mcounteren` is implemented.
		const MCOUNTEREN = 1 << 4;
		/// Machine-mode faults may be delegated.
		const MFAULTS_DELEGATION = 1 << 5;
		/// Secondary harts are booted by the platform.
		const HART_SECONDARY_BOOT = 1 << 6;
	}
}

/// A `major.minor` platform version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformVersion {
	/// Major version.
	pub major: u16,
	/// Minor version.
	pub minor: u16,
}

impl PlatformVersion {
	/// The `(major << 16) | minor` encoding used on the SBI wire.
	#[must_use]
	pub const fn encode(self) -> u32 {
		((self.major as u32) << 16) | self.minor as u32
	}
}

/// Describes the platform to the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDescriptor {
	/// Human readable platform name.
	pub name:            &'static str,
	/// Platform layer version.
	pub version:         PlatformVersion,
	/// Capabilities.
	pub features:        Features,
	/// Number of harts.
	pub hart_count:      u32,
	/// Per-hart stack size in bytes.
	pub hart_stack_size: u32,
}

impl PlatformDescriptor {
	/// The C910 descriptor for the given configuration.
	#[must_use]
	pub const fn c910(config: &PlatformConfig) -> Self {
		Self {
			name:            "T-HEAD Xuantie c910",
			version:         PlatformVersion { major: 0, minor: 1 },
			features:        Features::SCOUNTEREN
				.union(Features::MCOUNTEREN)
				.union(Features::MFAULTS_DELEGATION),
			hart_count:      config.hart_count,
			hart_stack_size: HART_STACK_SIZE,
		}
	}
}
