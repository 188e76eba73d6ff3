//! JSON lines reading.

use std::io::BufRead;

use serde_json::Value;

use crate::error::Result;

/// Parse each non-blank line of `reader` as JSON and pass it to `callback`
///
/// # Returns
/// Number of records read
pub fn for_each_json_line<R, F>(mut reader: R, mut callback: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Value) -> Result<()>,
{
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        callback(serde_json::from_str(line)?)?;
        count += 1;
    }
    Ok(count)
}
