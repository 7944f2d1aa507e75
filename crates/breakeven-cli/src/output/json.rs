use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the envelope to stdout. Decimals are already strings, so
/// amounts keep their exact scale.
pub fn print_json(value: &Value) {
    if let Err(e) = write_json(io::stdout().lock(), value) {
        eprintln!("JSON serialization error: {}", e);
    }
}

fn write_json<W: Write>(mut out: W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)
}
