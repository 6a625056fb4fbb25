//! Line-range reading for the file driver.

use std::path::Path;

use crate::base::Token;
use crate::error::{Error, Result};

/// Read lines `[start, end)` of a text file, trimmed, with blank lines
/// dropped.
///
/// A negative `start` reads from the first line; `end == -1` or an `end`
/// past the last line reads to the end. An empty range yields no lines.
pub fn read_line_range<P: AsRef<Path>>(path: P, start: i64, end: i64) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(select_lines(&content, start, end))
}

pub fn select_lines(content: &str, start: i64, end: i64) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len() as i64;

    let start = start.max(0);
    let end = if end == -1 || end >= total { total } else { end };
    if start >= end {
        return Vec::new();
    }

    lines[start as usize..end as usize]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a whitespace-separated list of token ids.
pub fn parse_ids(line: &str) -> std::result::Result<Vec<Token>, std::num::ParseIntError> {
    line.split_whitespace().map(str::parse).collect()
}
