//! Register access for the hart executing this code.

use core::{arch::asm, marker::PhantomData};

use crate::{Csr, HartCsrs, csr::for_each_csr};

/// The register file of the hart executing this code.
///
/// Deliberately neither `Send` nor `Sync`: moving it to another
/// hart would silently change which registers it refers to.
#[derive(Debug)]
pub struct LocalHart {
	/// Pins the handle to the current hart.
	_local: PhantomData<*const ()>,
}

impl LocalHart {
	/// Returns the register file of the executing hart.
	///
	/// # Safety
	/// Must be called in machine mode. Writes through the handle take
	/// effect immediately; the caller is responsible for the
	/// consequences of reconfiguring protection, caches and delegation
	/// underneath running code.
	#[must_use]
	pub unsafe fn new() -> Self {
		Self {
			_local: PhantomData,
		}
	}
}

/// Expands the CSR table into `csrr`/`csrw` match arms.
macro_rules! impl_local_access {
	($( $variant:ident = $num:literal, $name:literal $(, $ro:ident)?; )*) => {
		impl HartCsrs for LocalHart {
			fn read(&self, csr: Csr) -> usize {
				let value: usize;
				match csr {
					$(
						// SAFETY: Reading a CSR has no side effects for any register in the table.
						Csr::$variant => unsafe {
							asm!("csrr {0}, {csr}", out(reg) value, csr = const $num, options(nomem, nostack));
						},
					)*
				}
				value
			}

			fn write(&mut self, csr: Csr, value: usize) {
				if csr.is_read_only() {
					xtsbi_debug::dbg_warn!("discarding write of {value:#x} to read-only {csr}");
					return;
				}

				match csr {
					$(
						// SAFETY: Machine mode is guaranteed by `LocalHart::new`'s contract.
						Csr::$variant => unsafe {
							asm!("csrw {csr}, {0}", in(reg) value, csr = const $num, options(nostack));
						},
					)*
				}
			}
		}
	};
}

for_each_csr!(impl_local_access);
