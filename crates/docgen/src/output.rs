use std::io::{self, Write};
use std::path::Path;

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Write raw bytes to `path`, or to stdout when no path is given
pub fn write_bytes(path: Option<&Path>, bytes: &[u8]) -> io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes),
        None => {
            let mut out = io::stdout().lock();
            out.write_all(bytes)?;
            out.flush()
        }
    }
}
