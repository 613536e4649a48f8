//! One-shot dataset loading.
//!
//! The `csv` reader drops blank lines, but a blank line in the dataset is a
//! row with no fields and must fail validation like any other short row. A
//! quote-aware line scan runs alongside the reader so those rows are kept,
//! and every row carries its physical line number.

use crate::error::CsvRowsError;
use csv::{Position, ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Rows of a CSV file held in memory, header removed, in file order.
///
/// The dataset is read once and never touched on disk again.
#[derive(Debug, Clone)]
pub struct Dataset {
    header: StringRecord,
    rows: Vec<StringRecord>,
}

impl Dataset {
    /// Open and fully read a comma-delimited file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CsvRowsError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| CsvRowsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Opened for reading: {}", path.display());
        Self::from_bytes(&data)
    }

    /// Read a dataset from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CsvRowsError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(CsvRowsError::Read)?;
        Self::from_bytes(&data)
    }

    /// Parse a dataset already held in memory.
    ///
    /// Rows are not checked against the schema here; a short, long or blank
    /// row only fails once it is unpacked into a [`crate::Record`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, CsvRowsError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .flexible(true)
            .from_reader(data);

        let header = csv_reader.headers()?.clone();
        if header.is_empty() {
            return Err(CsvRowsError::MissingHeader);
        }
        info!("Skipped header row: {:?}", header.iter().collect::<Vec<_>>());

        let mut records = csv_reader.into_records();
        let mut rows = Vec::new();
        // Blank lines ahead of the header are not rows.
        for start in scan_row_starts(data)
            .into_iter()
            .skip_while(|s| s.blank)
            .skip(1)
        {
            let mut row = if start.blank {
                StringRecord::new()
            } else {
                match records.next() {
                    Some(record) => record?,
                    None => break,
                }
            };
            let mut position = Position::new();
            position.set_line(start.line);
            row.set_position(Some(position));
            rows.push(row);
        }
        // The scan and the reader agree on well-formed input; keep anything
        // the reader still has rather than dropping it.
        for record in records {
            rows.push(record?);
        }
        debug!("Loaded {} rows", rows.len());

        Ok(Self { header, rows })
    }

    /// The discarded header line.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    /// Data rows in load order.
    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where a logical row begins, and whether the line is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowStart {
    line: u64,
    blank: bool,
}

#[derive(Clone, Copy)]
enum ScanState {
    LineStart,
    FieldStart,
    InField,
    InQuoted,
    QuoteInQuoted,
}

/// Find the first physical line of every row, including empty ones.
///
/// Newlines inside quoted fields continue the current row. A final line with
/// no terminator and no content is not a row.
fn scan_row_starts(data: &[u8]) -> Vec<RowStart> {
    let mut starts = Vec::new();
    let mut line = 1u64;
    let mut state = ScanState::LineStart;
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        let (next, consumed) = match state {
            ScanState::LineStart => {
                let crlf = byte == b'\r' && data.get(i + 1) == Some(&b'\n');
                if byte == b'\n' || crlf {
                    starts.push(RowStart { line, blank: true });
                    line += 1;
                    (ScanState::LineStart, if crlf { 2 } else { 1 })
                } else {
                    starts.push(RowStart { line, blank: false });
                    // The byte is the first of a field; read it again there.
                    (ScanState::FieldStart, 0)
                }
            }
            ScanState::FieldStart => match byte {
                b'"' => (ScanState::InQuoted, 1),
                b',' => (ScanState::FieldStart, 1),
                b'\n' => (end_of_line(&mut line), 1),
                _ => (ScanState::InField, 1),
            },
            ScanState::InField => match byte {
                b',' => (ScanState::FieldStart, 1),
                b'\n' => (end_of_line(&mut line), 1),
                _ => (ScanState::InField, 1),
            },
            ScanState::InQuoted => match byte {
                b'"' => (ScanState::QuoteInQuoted, 1),
                b'\n' => {
                    line += 1;
                    (ScanState::InQuoted, 1)
                }
                _ => (ScanState::InQuoted, 1),
            },
            ScanState::QuoteInQuoted => match byte {
                b'"' => (ScanState::InQuoted, 1),
                b',' => (ScanState::FieldStart, 1),
                b'\n' => (end_of_line(&mut line), 1),
                _ => (ScanState::InField, 1),
            },
        };
        state = next;
        i += consumed;
    }

    starts
}

fn end_of_line(line: &mut u64) -> ScanState {
    *line += 1;
    ScanState::LineStart
}
