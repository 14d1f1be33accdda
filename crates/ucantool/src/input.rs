//! Input acquisition. The whole input is read before any decoding starts.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::error::InputError;

/// Read the file at `path`, or drain `stdin` when no path is given.
pub fn read_input<R: Read>(path: Option<&Path>, mut stdin: R) -> Result<Vec<u8>, InputError> {
    let bytes = match path {
        Some(path) => fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => InputError::FileNotFound(path.to_path_buf()),
            _ => InputError::Io(e),
        })?,
        None => {
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf)?;
            if buf.is_empty() {
                return Err(InputError::EmptyStdin);
            }
            buf
        }
    };
    debug!(len = bytes.len(), from_file = path.is_some(), "read input");
    Ok(bytes)
}
