//! Platform errors and their SBI status codes.

use core::{fmt, num::NonZeroI32};

use xtsbi_arch_riscv64::HartId;

/// SBI status: success.
pub const SBI_SUCCESS: i32 = 0;
/// SBI status: generic failure.
pub const SBI_ERR_FAILED: i32 = -1;
/// SBI status: a parameter is invalid.
pub const SBI_ERR_INVALID_PARAM: i32 = -3;
/// SBI status: the resource is already available.
pub const SBI_ERR_ALREADY_AVAILABLE: i32 = -6;

/// Errors reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
	/// The CLINT backend rejected IPI initialization. The backend's
	/// status is carried verbatim.
	#[error("IPI backend initialization failed with status {0}")]
	Ipi(NonZeroI32),
	/// The CLINT backend rejected timer initialization. The backend's
	/// status is carried verbatim.
	#[error("timer backend initialization failed with status {0}")]
	Timer(NonZeroI32),
	/// A hook that depends on the boot hart's register snapshot ran
	/// before the cold-boot early init captured it.
	#[error("boot hart register snapshot has not been captured")]
	SnapshotMissing,
	/// Cold-boot early init ran a second time.
	#[error("boot hart register snapshot was already captured")]
	SnapshotAlreadyCaptured,
	/// The hart is outside the platform's hart range.
	#[error("{0} is outside the platform's hart range")]
	InvalidHart(HartId),
	/// Control trapped into the debug monitor and came back. The
	/// caller must not continue as if the request was served.
	#[error("unrecoverable platform trap: {0}")]
	UnrecoverableTrap(TrapReason),
}

impl PlatformError {
	/// The SBI status code reported to the framework.
	///
	/// Backend failures are returned verbatim.
	#[must_use]
	pub const fn status(self) -> i32 {
		match self {
			Self::Ipi(code) | Self::Timer(code) => code.get(),
			Self::SnapshotMissing | Self::UnrecoverableTrap(_) => SBI_ERR_FAILED,
			Self::SnapshotAlreadyCaptured => SBI_ERR_ALREADY_AVAILABLE,
			Self::InvalidHart(_) => SBI_ERR_INVALID_PARAM,
		}
	}

	/// Whether the error came from a path that is meant never to return.
	#[must_use]
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::UnrecoverableTrap(_))
	}
}

/// Converts a hook result into the integer status the framework expects.
#[must_use]
pub const fn status(result: Result<(), PlatformError>) -> i32 {
	match result {
		Ok(()) => SBI_SUCCESS,
		Err(err) => err.status(),
	}
}

/// Why the platform trapped into the debug monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapReason {
	/// A system reset was requested.
	SystemReset(ResetType),
	/// A vendor extension this platform does not implement was called.
	UnsupportedVendorExtension(usize),
}

impl fmt::Display for TrapReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::SystemReset(ty) => write!(f, "system reset ({ty})"),
			Self::UnsupportedVendorExtension(id) => {
				write!(f, "unsupported vendor extension {id:#x}")
			}
		}
	}
}

/// The kind of reset requested by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetType {
	/// Power the system off.
	Shutdown,
	/// Full power-cycle reboot.
	ColdReboot,
	/// Reboot without power-cycling.
	WarmReboot,
	/// Any other (reserved or vendor) reset type.
	Other(u32),
}

impl From<u32> for ResetType {
	fn from(raw: u32) -> Self {
		match raw {
			0 => Self::Shutdown,
			1 => Self::ColdReboot,
			2 => Self::WarmReboot,
			other => Self::Other(other),
		}
	}
}

impl fmt::Display for ResetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Shutdown => f.write_str("shutdown"),
			Self::ColdReboot => f.write_str("cold reboot"),
			Self::WarmReboot => f.write_str("warm reboot"),
			Self::Other(raw) => write!(f, "type {raw:#x}"),
		}
	}
}
