//! A write-once, read-many cell.

use core::{
	cell::UnsafeCell,
	fmt,
	mem::MaybeUninit,
	sync::atomic::{
		AtomicU8,
		Ordering::{Acquire, Relaxed, Release},
	},
};

/// Nothing has been written yet.
const EMPTY: u8 = 0;
/// A writer has claimed the cell and is filling it in.
const WRITING: u8 = 1;
/// The value is published and may be read.
const READY: u8 = 2;

/// A cell that is written at most once and read any number of times
/// afterwards, from any hart.
///
/// The write is claimed with a single compare-exchange; whoever loses
/// the race gets [`AlreadyInitialized`] back and the closure is never
/// run. Readers only ever observe a fully written value: the value is
/// published with `Release` and observed with `Acquire`.
pub struct Once<T> {
	/// The (possibly uninitialized) value.
	value: UnsafeCell<MaybeUninit<T>>,
	/// One of [`EMPTY`], [`WRITING`] or [`READY`].
	state: AtomicU8,
}

// SAFETY: The value is written by exactly one thread, before `READY`
// SAFETY: is published, and only shared references are handed out after.
unsafe impl<T: Send + Sync> Sync for Once<T> {}

impl<T> Once<T> {
	/// Creates a new, empty cell.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			value: UnsafeCell::new(MaybeUninit::uninit()),
			state: AtomicU8::new(EMPTY),
		}
	}

	/// Initializes the cell with the value produced by `init`.
	///
	/// `init` runs only if this call wins the right to write the cell.
	/// Returns a reference to the freshly stored value.
	///
	/// # Errors
	/// Returns [`AlreadyInitialized`] if the cell has been (or is
	/// being) written by an earlier call.
	pub fn init_with<F>(&self, init: F) -> Result<&T, AlreadyInitialized>
	where
		F: FnOnce() -> T,
	{
		if self
			.state
			.compare_exchange(EMPTY, WRITING, Acquire, Relaxed)
			.is_err()
		{
			return Err(AlreadyInitialized);
		}

		// SAFETY: Winning the exchange above grants exclusive write access;
		// SAFETY: no reader touches the value until `READY` is stored.
		let value = unsafe { (*self.value.get()).write(init()) };
		self.state.store(READY, Release);

		Ok(value)
	}

	/// Returns the value if it has been published.
	#[must_use]
	pub fn get(&self) -> Option<&T> {
		if self.state.load(Acquire) == READY {
			// SAFETY: `READY` is only stored after the value was written,
			// SAFETY: and the value is never written again.
			Some(unsafe { (*self.value.get()).assume_init_ref() })
		} else {
			None
		}
	}

	/// Whether the value has been published.
	#[must_use]
	pub fn is_initialized(&self) -> bool {
		self.state.load(Acquire) == READY
	}
}

impl<T> Default for Once<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Drop for Once<T> {
	fn drop(&mut self) {
		if *self.state.get_mut() == READY {
			// SAFETY: `READY` means the value was fully written.
			unsafe { self.value.get_mut().assume_init_drop() };
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Once<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.get() {
			Some(value) => f.debug_tuple("Once").field(value).finish(),
			None => f.write_str("Once(<empty>)"),
		}
	}
}

/// Returned by [`Once::init_with`] when the cell was already claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyInitialized;

impl fmt::Display for AlreadyInitialized {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("cell was already initialized")
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	use super::*;

	#[test]
	fn empty_until_written() {
		let once = Once::<u32>::new();
		assert!(once.get().is_none());
		assert!(!once.is_initialized());

		assert_eq!(once.init_with(|| 42), Ok(&42));
		assert_eq!(once.get(), Some(&42));
		assert!(once.is_initialized());
	}

	#[test]
	fn second_write_is_rejected() {
		let once = Once::new();
		once.init_with(|| 1_u32).unwrap();

		let mut ran = false;
		assert_eq!(
			once.init_with(|| {
				ran = true;
				2
			}),
			Err(AlreadyInitialized)
		);
		assert!(!ran, "losing initializer must not run");
		assert_eq!(once.get(), Some(&1));
	}

	#[test]
	fn drops_written_value() {
		let drops = Arc::new(AtomicUsize::new(0));

		struct Tracked(Arc<AtomicUsize>);
		impl Drop for Tracked {
			fn drop(&mut self) {
				self.0.fetch_add(1, Ordering::SeqCst);
			}
		}

		{
			let once = Once::new();
			let _ = once.init_with(|| Tracked(drops.clone()));
		}
		{
			let _empty = Once::<Tracked>::new();
		}

		assert_eq!(drops.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn exactly_one_racing_writer_wins() {
		let once = Once::new();
		let wins = AtomicUsize::new(0);

		std::thread::scope(|s| {
			for id in 0..8_usize {
				let once = &once;
				let wins = &wins;
				s.spawn(move || {
					if once.init_with(|| id).is_ok() {
						wins.fetch_add(1, Ordering::SeqCst);
					}
				});
			}
		});

		assert_eq!(wins.load(Ordering::SeqCst), 1);
		assert!(once.get().is_some());
	}
}
