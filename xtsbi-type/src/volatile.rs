//! Volatile cells for memory-mapped registers.

use core::cell::UnsafeCell;

/// A volatile cell.
///
/// Every access goes through [`core::ptr::read_volatile`] /
/// [`core::ptr::write_volatile`], so the compiler never elides,
/// merges or reorders them with respect to other volatile accesses.
#[repr(transparent)]
pub struct Volatile<T> {
	/// The wrapped value.
	///
	/// `UnsafeCell` is used as it is a special case in the compiler
	/// when it comes to UB prevention and optimization.
	value: UnsafeCell<T>,
}

// SAFETY: Accesses are whole-value volatile loads/stores of `Copy` data;
// SAFETY: the cell hands out no references to its interior.
unsafe impl<T: Copy + Send> Sync for Volatile<T> {}

impl<T> Volatile<T>
where
	T: Copy + Send,
{
	/// Creates a new volatile cell.
	///
	/// # Discouraged
	/// You probably don't want to create a `Volatile` directly.
	/// It's intended to be laid over memory-mapped registers
	/// via [`Volatile::at`].
	#[inline(always)]
	#[must_use]
	pub const fn new(value: T) -> Self {
		Self {
			value: UnsafeCell::new(value),
		}
	}

	/// Lays a volatile cell over the register at the given
	/// bus address.
	///
	/// Returns `None` if the address is null or not aligned to `T`.
	///
	/// # Safety
	/// The address must refer to a register (or memory) that remains
	/// valid for the rest of the firmware's lifetime, and which has
	/// no side effects beyond what the caller expects when read or
	/// written at the width of `T`.
	#[inline(always)]
	#[must_use]
	pub unsafe fn at(addr: usize) -> Option<&'static Self> {
		let ptr = core::ptr::with_exposed_provenance::<Self>(addr);
		if ptr.is_aligned() {
			// SAFETY: Validity of the pointee is offloaded to the caller;
			// SAFETY: `as_ref` handles the null case.
			unsafe { ptr.as_ref() }
		} else {
			None
		}
	}

	/// Writes the value.
	#[inline(always)]
	pub fn set(&self, value: T) {
		// SAFETY: A valid reference to `self` implies a valid pointee.
		unsafe { self.value.get().write_volatile(value) }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn peek<T: Copy>(cell: &Volatile<T>) -> T {
		// SAFETY: The cell is alive for the duration of the borrow.
		unsafe { cell.value.get().read_volatile() }
	}

	#[test]
	fn set_is_visible() {
		let cell = Volatile::new(0_u32);
		cell.set(0xdead_beef);
		assert_eq!(peek(&cell), 0xdead_beef);
	}

	#[test]
	fn at_rejects_null_and_misaligned() {
		// SAFETY: The addresses are rejected before any access happens.
		unsafe {
			assert!(Volatile::<u32>::at(0).is_none());
			assert!(Volatile::<u32>::at(0x1002).is_none());
		}
	}

	#[test]
	fn at_overlays_existing_storage() {
		static REG: Volatile<u32> = Volatile::new(0);
		let addr = core::ptr::from_ref(&REG).expose_provenance();
		// SAFETY: `REG` is a static and lives forever.
		let overlay = unsafe { Volatile::<u32>::at(addr) }.unwrap();
		overlay.set(7);
		assert_eq!(peek(&REG), 7);
	}
}
