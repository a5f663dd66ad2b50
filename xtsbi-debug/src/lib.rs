#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

use core::fmt;

#[cfg(feature = "console")]
use xtsbi_sync::{AlreadyInitialized, Once};

/// Severity of a debug record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
	/// General progress information.
	Info,
	/// Something unexpected that the layer recovered from.
	Warn,
	/// A failure being reported to the caller.
	Error,
}

impl Level {
	/// The single-letter tag written into each record.
	#[must_use]
	pub const fn tag(self) -> char {
		match self {
			Self::Info => 'I',
			Self::Warn => 'W',
			Self::Error => 'E',
		}
	}
}

/// A console sink. Receives one fully formatted record per call,
/// without a trailing newline.
pub type Sink = fn(fmt::Arguments<'_>);

/// The registered console sink.
#[cfg(feature = "console")]
static SINK: Once<Sink> = Once::new();

/// Registers the console sink.
///
/// The console is owned by the firmware framework; this is called
/// once, after it has brought up the UART.
///
/// # Errors
/// Returns [`AlreadyInitialized`] if a sink was already registered.
#[cfg(feature = "console")]
pub fn set_sink(sink: Sink) -> Result<(), AlreadyInitialized> {
	SINK.init_with(|| sink).map(|_| ())
}

/// Logs a record to every enabled backend.
///
/// Shouldn't be used directly; use the `dbg!` macros instead.
#[cfg_attr(
	not(feature = "kernel-debug"),
	expect(unused_variables, reason = "all backends are compiled out")
)]
pub fn log(level: Level, file: &str, line: u32, message: fmt::Arguments<'_>) {
	#[cfg(all(feature = "kernel-debug", feature = "console"))]
	if let Some(sink) = SINK.get() {
		sink(format_args!("{file}:{line}:{}:{message}", level.tag()));
	}

	#[cfg(all(feature = "kernel-debug", feature = "log"))]
	{
		let level = match level {
			Level::Info => log::Level::Info,
			Level::Warn => log::Level::Warn,
			Level::Error => log::Level::Error,
		};
		log::log!(target: "xtsbi", level, "{file}:{line}: {message}");
	}
}

/// Sends a general debug message to the enabled debug backends.
#[macro_export]
macro_rules! dbg {
	($($arg:tt)*) => {{
		$crate::log($crate::Level::Info, ::core::file!(), ::core::line!(), format_args!($($arg)*));
	}};
}

/// Sends a warning debug message to the enabled debug backends.
#[macro_export]
macro_rules! dbg_warn {
	($($arg:tt)*) => {{
		$crate::log($crate::Level::Warn, ::core::file!(), ::core::line!(), format_args!($($arg)*));
	}};
}

/// Sends an error debug message to the enabled debug backends.
#[macro_export]
macro_rules! dbg_err {
	($($arg:tt)*) => {{
		$crate::log($crate::Level::Error, ::core::file!(), ::core::line!(), format_args!($($arg)*));
	}};
}
