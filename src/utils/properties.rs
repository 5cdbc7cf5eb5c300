use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Reads a properties file and returns its entries in file order
pub fn read_properties(path: &Path) -> Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileOperation {
        path: path.to_path_buf(),
        message: format!("Failed to read properties file: {}", e),
    })?;
    let entries = parse_properties(&content);
    debug!("Loaded {} properties from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parses properties text (`key=value`, `key:value` or `key value` per logical line).
///
/// Comment lines start with `#` or `!`. A line ending in an odd number of
/// backslashes continues on the next line. A key that appears twice keeps its
/// first position but takes the later value.
pub fn parse_properties(content: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();

    for logical in logical_lines(content) {
        let (key, value) = split_entry(&logical);
        let key = unescape(&key);
        let value = unescape(&value);
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }

    entries
}

/// Formats entries as `key=value` lines
pub fn format_properties<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// Updates existing properties text with new entries.
///
/// Lines for keys that are already present get their value replaced in place,
/// remaining entries are appended. Comments and unrelated lines are preserved.
pub fn upsert_properties<'a, I>(content: &str, entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pending: Vec<(&str, &str)> = entries.into_iter().collect();
    let mut out = String::with_capacity(content.len());
    let mut skipping_continuation = false;

    for line in content.lines() {
        if skipping_continuation {
            skipping_continuation = ends_with_continuation(line);
            continue;
        }
        let trimmed = line.trim_start();
        if !is_comment_or_blank(trimmed) {
            let (key, _) = split_entry(trimmed);
            let key = unescape(&key);
            if let Some(position) = pending.iter().position(|(k, _)| *k == key) {
                let (k, v) = pending.remove(position);
                out.push_str(&format_properties([(k, v)]));
                skipping_continuation = ends_with_continuation(line);
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }

    out.push_str(&format_properties(pending));
    out
}

fn is_comment_or_blank(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!')
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Joins physical lines into logical lines, dropping comments and blanks
fn logical_lines(content: &str) -> Vec<String> {
    let mut logical = Vec::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        match current.as_mut() {
            Some(buffer) => buffer.push_str(trimmed),
            None => {
                if is_comment_or_blank(trimmed) {
                    continue;
                }
                current = Some(trimmed.to_string());
            }
        }

        if ends_with_continuation(line) {
            if let Some(buffer) = current.as_mut() {
                buffer.pop();
            }
        } else if let Some(buffer) = current.take() {
            logical.push(buffer);
        }
    }

    if let Some(buffer) = current {
        logical.push(buffer);
    }
    logical
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace
fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let key = line[..key_end].to_string();
    let rest = line[key_end..].trim_start_matches([' ', '\t']);
    let rest = rest
        .strip_prefix(['=', ':'])
        .unwrap_or(rest)
        .trim_start_matches([' ', '\t']);
    (key, rest.to_string())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
