//! CLI command implementations.
//!
//! - **convert**: read one construct, route it through the IR, emit another
//! - **detect**: report the dialect of a docstring
//! - **init**: write a default `.doctrans.toml`

pub mod convert;
pub mod detect;
pub mod init;

pub use convert::{convert, ConvertConfig};
pub use detect::detect;
pub use init::init_config;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Contents of `path`, or of stdin when `path` is `-`
pub(crate) fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read stdin")?;
        return Ok(contents);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
