//! ARFF read-through cache for parsed datasets.
//!
//! Parsed records are kept next to the raw file in ARFF form and read back on
//! later runs.
//!
//! ```text
//! @relation 'SMS spam'
//!
//! @attribute label {spam,ham}
//! @attribute text string
//!
//! @data
//! spam,'WINNER!! Claim your \'prize\' now'
//! ```
//!
//! A cache is fresh only when it was modified strictly after the raw file.
//! Stale or unreadable caches are rebuilt from the raw file. A raw file that
//! has disappeared leaves the cache authoritative.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::dataset::{Dataset, Label, Record};
use crate::error::{Result, SpamsiftError};

/// A raw dataset file paired with its ARFF cache.
#[derive(Clone, Debug)]
pub struct DatasetCache {
    raw_path: PathBuf,
    cache_path: PathBuf,
}

impl DatasetCache {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(raw_path: P, cache_path: Q) -> Self {
        DatasetCache {
            raw_path: raw_path.into(),
            cache_path: cache_path.into(),
        }
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Whether the cache file can be used instead of the raw file.
    pub fn is_fresh(&self) -> bool {
        let Ok(cache_meta) = fs::metadata(&self.cache_path) else {
            return false;
        };
        let Ok(raw_meta) = fs::metadata(&self.raw_path) else {
            return true;
        };
        match (raw_meta.modified(), cache_meta.modified()) {
            (Ok(raw_modified), Ok(cache_modified)) => cache_modified > raw_modified,
            _ => true,
        }
    }

    /// Read the cache if it is fresh, otherwise parse the raw file and
    /// rewrite the cache.
    ///
    /// A fresh cache that cannot be read is rebuilt when the raw file is
    /// still there.
    pub fn load_or_build(&self) -> Result<Dataset> {
        if self.is_fresh() {
            debug!("Reading cached dataset {}", self.cache_path.display());
            match load_arff(&self.cache_path) {
                Ok(dataset) => return Ok(dataset),
                Err(e) if self.raw_path.exists() => {
                    warn!(
                        "Error reading ARFF cache {}: {}, rebuilding.",
                        self.cache_path.display(),
                        e
                    );
                    return self.rebuild();
                }
                Err(e) => return Err(e),
            }
        }

        if self.cache_path.exists() {
            info!(
                "Cached dataset {} is older than {}, rebuilding.",
                self.cache_path.display(),
                self.raw_path.display()
            );
        }
        self.rebuild()
    }

    /// Parse the raw file and write the cache unconditionally.
    ///
    /// Failing to write the cache is logged; the parsed dataset is still
    /// returned.
    pub fn rebuild(&self) -> Result<Dataset> {
        let dataset = Dataset::load_raw(&self.raw_path)?;
        if let Err(e) = save_arff(&dataset, &self.cache_path) {
            warn!(
                "Error saving ARFF cache {}: {}",
                self.cache_path.display(),
                e
            );
        }
        Ok(dataset)
    }
}

/// Write a dataset as ARFF to `path`, creating parent directories.
pub fn save_arff<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_arff(dataset, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read an ARFF file written by [`save_arff`].
pub fn load_arff<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_arff(BufReader::new(File::open(path)?))
}

/// Serialize a dataset in ARFF form.
pub fn write_arff<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    let labels = Label::ALL.map(Label::as_str).join(",");

    writeln!(writer, "@relation {}", quote(dataset.name()))?;
    writeln!(writer)?;
    writeln!(writer, "@attribute label {{{labels}}}")?;
    writeln!(writer, "@attribute text string")?;
    writeln!(writer)?;
    writeln!(writer, "@data")?;
    for record in dataset {
        writeln!(writer, "{},{}", record.label, quote(&record.text))?;
    }
    Ok(())
}

/// Section of the ARFF file currently being read.
enum Section {
    Header,
    Data,
}

/// Parse ARFF content with the (label nominal, text string) schema.
pub fn read_arff<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut name = String::new();
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut records = Vec::new();
    let mut section = Section::Header;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let line_num = line_num + 1;

        match section {
            Section::Header => {
                let (keyword, rest) = trimmed
                    .split_once(char::is_whitespace)
                    .unwrap_or((trimmed, ""));
                match keyword.to_ascii_lowercase().as_str() {
                    "@relation" => name = unquote(rest.trim(), line_num)?,
                    "@attribute" => attributes.push(parse_attribute(rest.trim(), line_num)?),
                    "@data" => {
                        check_schema(&attributes)?;
                        section = Section::Data;
                    }
                    _ => {
                        return Err(SpamsiftError::parse(format!(
                            "line {line_num}: unexpected header entry '{keyword}'"
                        )));
                    }
                }
            }
            Section::Data => {
                let values = split_row(trimmed, line_num)?;
                let [label, text] = values.as_slice() else {
                    return Err(SpamsiftError::parse(format!(
                        "line {line_num}: expected 2 values, found {}",
                        values.len()
                    )));
                };
                let (Some(label), Some(text)) = (label, text) else {
                    info!("Missing value at line {line_num}, skipping.");
                    continue;
                };
                let label = label
                    .parse::<Label>()
                    .map_err(|e| SpamsiftError::parse(format!("line {line_num}: {e}")))?;
                records.push(Record::new(label, text.clone()));
            }
        }
    }

    if matches!(section, Section::Header) {
        return Err(SpamsiftError::parse("missing @data section"));
    }

    let mut dataset = Dataset::new(name);
    for record in records {
        dataset.push(record);
    }
    Ok(dataset)
}

fn parse_attribute(rest: &str, line_num: usize) -> Result<(String, String)> {
    let (name, kind) = if rest.starts_with('\'') || rest.starts_with('"') {
        let end = closing_quote(rest, line_num)?;
        (unquote(&rest[..=end], line_num)?, rest[end + 1..].trim())
    } else {
        let (name, kind) = rest.split_once(char::is_whitespace).ok_or_else(|| {
            SpamsiftError::parse(format!("line {line_num}: attribute without a type"))
        })?;
        (name.to_string(), kind.trim())
    };
    let kind = kind.split_whitespace().collect::<String>();
    Ok((name, kind))
}

fn check_schema(attributes: &[(String, String)]) -> Result<()> {
    let expected_labels = format!("{{{}}}", Label::ALL.map(Label::as_str).join(","));
    match attributes {
        [(label, label_kind), (text, text_kind)]
            if label == "label"
                && *label_kind == expected_labels
                && text == "text"
                && text_kind.eq_ignore_ascii_case("string") =>
        {
            Ok(())
        }
        _ => Err(SpamsiftError::parse(format!(
            "unsupported schema {attributes:?}, expected label {expected_labels} and text string"
        ))),
    }
}

/// Split a data row into values; `None` marks a missing (`?`) value.
fn split_row(line: &str, line_num: usize) -> Result<Vec<Option<String>>> {
    let mut values = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start();
        let (value, remainder) = if rest.starts_with('\'') || rest.starts_with('"') {
            let end = closing_quote(rest, line_num)?;
            (Some(unquote(&rest[..=end], line_num)?), &rest[end + 1..])
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            let raw = rest[..end].trim();
            let value = if raw == "?" { None } else { Some(raw.to_string()) };
            (value, &rest[end..])
        };
        values.push(value);

        let remainder = remainder.trim_start();
        match remainder.strip_prefix(',') {
            Some(next) => rest = next,
            None if remainder.is_empty() => break,
            None => {
                return Err(SpamsiftError::parse(format!(
                    "line {line_num}: unexpected '{remainder}' after value"
                )));
            }
        }
    }

    Ok(values)
}

/// Byte index of the quote closing the one at `s[0]`.
fn closing_quote(s: &str, line_num: usize) -> Result<usize> {
    let quote = s.as_bytes()[0];
    let mut escaped = false;
    for (i, b) in s.bytes().enumerate().skip(1) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == quote {
            return Ok(i);
        }
    }
    Err(SpamsiftError::parse(format!(
        "line {line_num}: unterminated quoted value"
    )))
}

/// Single-quote a value, escaping backslashes, quotes and control characters.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Undo [`quote`]; unquoted input is returned as is.
fn unquote(value: &str, line_num: usize) -> Result<String> {
    let bytes = value.as_bytes();
    let quoted = bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0];
    if !quoted {
        return Ok(value.to_string());
    }

    let inner = &value[1..value.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {
                return Err(SpamsiftError::parse(format!(
                    "line {line_num}: dangling escape"
                )));
            }
        }
    }
    Ok(out)
}
