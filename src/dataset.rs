//! Labeled SMS datasets and the raw two-column loader.
//!
//! The raw format is one message per line: a label, a run of whitespace,
//! then the message text.
//!
//! ```text
//! spam	WINNER!! Claim your prize now
//! ham	Ok lar... Joking wif u oni...
//! ```
//!
//! # Examples
//!
//! ```
//! use spamsift::dataset::{Dataset, Label};
//!
//! let raw = "spam win money now\nham let's meet for lunch\nbogus\n";
//! let dataset = Dataset::parse_raw("demo", raw.as_bytes()).unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.records()[0].label, Label::Spam);
//! assert_eq!(dataset.records()[1].text, "let's meet for lunch");
//! ```

pub mod cache;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamsiftError};

/// Relation name given to datasets read from raw files.
pub const RELATION_NAME: &str = "SMS spam";

/// Class label of a message.
///
/// Declaration order matters: it is the index order of class distributions
/// and confusion matrices, and the tie-break order of predictions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    /// All labels in declaration order.
    pub const ALL: [Label; 2] = [Label::Spam, Label::Ham];

    /// Number of classes.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this label in [`Label::ALL`].
    pub fn index(self) -> usize {
        match self {
            Label::Spam => 0,
            Label::Ham => 1,
        }
    }

    /// Label at a position of [`Label::ALL`].
    pub fn from_index(index: usize) -> Option<Label> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Spam => "spam",
            Label::Ham => "ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SpamsiftError;

    /// Case-sensitive exact match on `spam` / `ham`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "spam" => Ok(Label::Spam),
            "ham" => Ok(Label::Ham),
            other => Err(SpamsiftError::parse(format!("unknown label '{other}'"))),
        }
    }
}

/// A single labeled message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub label: Label,
    pub text: String,
}

impl Record {
    pub fn new<S: Into<String>>(label: Label, text: S) -> Self {
        Record {
            label,
            text: text.into(),
        }
    }
}

/// An ordered collection of records sharing the (label, text) schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    records: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset with the given relation name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Dataset {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Create a dataset from records.
    pub fn from_records<S: Into<String>>(name: S, records: Vec<Record>) -> Self {
        Dataset {
            name: name.into(),
            records,
        }
    }

    /// Read a raw two-column file.
    ///
    /// Invalid rows are skipped and logged; a missing or unreadable file is an
    /// [`SpamsiftError::Io`].
    pub fn load_raw<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::parse_raw(RELATION_NAME, BufReader::new(file))?;
        debug!(
            "Loaded {} records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse raw two-column lines from any buffered reader.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn parse_raw<R: BufRead>(name: &str, mut reader: R) -> Result<Self> {
        let mut dataset = Dataset::new(name);
        let mut buf = Vec::new();
        let mut line_num = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_num += 1;

            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.strip_suffix('\n').unwrap_or(&decoded);
            match parse_line(line) {
                Some(record) => dataset.push(record),
                None => info!("Invalid row at line {line_num}, skipping."),
            }
        }

        Ok(dataset)
    }

    /// Relation name of this dataset.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record. Records with empty text are ignored.
    pub fn push(&mut self, record: Record) {
        if !record.text.is_empty() {
            self.records.push(record);
        }
    }

    /// Number of records per class, indexed like [`Label::ALL`].
    pub fn class_counts(&self) -> [usize; Label::COUNT] {
        let mut counts = [0; Label::COUNT];
        for record in &self.records {
            counts[record.label.index()] += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Split a raw line at its first run of whitespace.
///
/// Returns `None` when either part is empty or the label is unknown.
fn parse_line(line: &str) -> Option<Record> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (label, rest) = line.split_once(char::is_whitespace)?;
    let text = rest.trim_start();
    if label.is_empty() || text.is_empty() {
        return None;
    }
    let label = label.parse::<Label>().ok()?;
    Some(Record::new(label, text))
}
