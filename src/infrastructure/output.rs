//! Output destination for rendered templates.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::domain::{AppError, Result};

/// Open the output file for appending, creating it if needed, or fall back
/// to standard output.
///
/// # Errors
/// Returns error if the file cannot be opened.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdout().lock()));
    };

    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o664);
    }

    let file = options
        .open(path)
        .map_err(|e| AppError::io(format!("Failed to open output file {}", path.display()), e))?;

    tracing::debug!(path = %path.display(), "Appending output");

    Ok(Box::new(file))
}
