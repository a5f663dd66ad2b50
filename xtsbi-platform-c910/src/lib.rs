#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

pub mod clint;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod lifecycle;
mod ops;
mod platform;
pub mod pmu;
mod snapshot;
pub mod vendor;

pub use clint::{Clint, ClintConfig};
pub use config::PlatformConfig;
pub use descriptor::{Features, PlatformDescriptor, PlatformVersion};
pub use error::{PlatformError, ResetType, TrapReason, status};
pub use lifecycle::{BootFailure, BootStage, boot_hart};
pub use ops::Platform;
pub use platform::C910;
pub use snapshot::{RegisterSnapshot, SnapshotStore};
pub use xtsbi_arch_riscv64::{Csr, HartCsrs, HartId, Mmio, Monitor};
