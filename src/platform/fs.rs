// LogLens - platform/fs.rs
//
// Filesystem access for log files and user pattern files.
// Everything above this layer works on in-memory text.

use crate::core::pattern::{parse_pattern_toml, LinePattern};
use crate::util::constants;
use crate::util::error::{LogLensError, Result};
use std::path::Path;

/// Read a log file as text, refusing files above `max_size` bytes.
///
/// Invalid UTF-8 is replaced rather than rejected: a few corrupt bytes must
/// not prevent the rest of the file from being ingested.
pub fn read_log_file(path: &Path, max_size: u64) -> Result<String> {
    let io_err = |operation: &'static str| {
        move |source: std::io::Error| LogLensError::Io {
            path: path.to_path_buf(),
            operation,
            source,
        }
    };

    let size = std::fs::metadata(path).map_err(io_err("stat"))?.len();
    if size > max_size {
        return Err(LogLensError::Io {
            path: path.to_path_buf(),
            operation: "read",
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("file is {size} bytes, exceeds maximum of {max_size} bytes"),
            ),
        });
    }

    let bytes = std::fs::read(path).map_err(io_err("read"))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "Log file is not valid UTF-8; replacing invalid bytes"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    tracing::debug!(path = %path.display(), bytes = size, "Log file read");
    Ok(text)
}

/// Load and compile a user-defined line pattern from a TOML file.
pub fn load_pattern_file(path: &Path) -> Result<LinePattern> {
    let io_err = |source| LogLensError::Io {
        path: path.to_path_buf(),
        operation: "read pattern file",
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_PATTERN_FILE_SIZE {
        return Err(LogLensError::Io {
            path: path.to_path_buf(),
            operation: "read pattern file",
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "pattern file is {size} bytes, exceeds maximum of {} bytes",
                    constants::MAX_PATTERN_FILE_SIZE
                ),
            ),
        });
    }

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    Ok(parse_pattern_toml(&content, path)?)
}
