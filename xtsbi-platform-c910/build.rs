#![expect(missing_docs, clippy::missing_docs_in_private_items)]

use std::{env, fs, path::Path};

/// Overrides the firmware text start address (hex with `0x`, or decimal).
const FW_TEXT_START_ENV: &str = "XTSBI_FW_TEXT_START";

fn parse_address(raw: &str) -> usize {
	let raw = raw.trim().replace('_', "");
	let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
		Some(hex) => usize::from_str_radix(hex, 16),
		None => raw.parse(),
	};
	parsed.unwrap_or_else(|err| panic!("{FW_TEXT_START_ENV}={raw:?} is not an address: {err}"))
}

fn main() {
	println!("cargo::rerun-if-env-changed={FW_TEXT_START_ENV}");

	let fw_text_start = env::var(FW_TEXT_START_ENV)
		.map(|raw| parse_address(&raw))
		.unwrap_or(0);

	let out_dir = env::var_os("OUT_DIR").unwrap();
	fs::write(
		Path::new(&out_dir).join("fw_text_start.rs"),
		format!(
			"/// Address the firmware image is linked at; started harts begin fetching here.\n\
			 pub const FW_TEXT_START: usize = {fw_text_start:#x};\n"
		),
	)
	.unwrap();
}
