use super::read_input;
use crate::docstring::detect_dialect;
use anyhow::Result;
use std::path::Path;

/// Print the detected dialect and its confidence
pub fn detect(input: &Path) -> Result<()> {
    let text = read_input(input)?;
    let detection = detect_dialect(&text);
    println!("{} (confidence {:.2})", detection.format, detection.confidence);
    Ok(())
}
