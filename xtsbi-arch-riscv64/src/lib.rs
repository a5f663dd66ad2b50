#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(any(test, feature = "sim")), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

mod bus;
mod csr;
mod hart;
#[cfg(target_arch = "riscv64")]
mod local;
mod monitor;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use bus::Mmio;
#[cfg(target_arch = "riscv64")]
pub use bus::SystemBus;
pub use csr::{Csr, HartCsrs, MHPMEVENT_SLOTS};
pub use hart::HartId;
#[cfg(target_arch = "riscv64")]
pub use local::LocalHart;
#[cfg(target_arch = "riscv64")]
pub use monitor::Ebreak;
pub use monitor::Monitor;
