//! The fixed fifteen-field record and its bracketed message form.

use crate::error::CsvRowsError;
use csv::StringRecord;

/// Number of fields every data row must unpack into.
pub const FIELD_COUNT: usize = 15;

/// Field names in schema order.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "Country",
    "Year",
    "Status",
    "Life expectancy",
    "Adult Mortality",
    "Alcohol",
    "percentage expenditure",
    "Hepatitis B",
    "BMI",
    "Total expenditure",
    "HIV/AIDS",
    "GDP",
    "Population",
    "Income composition of resources",
    "Schooling",
];

/// One data row, unpacked positionally. Fields stay text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: [String; FIELD_COUNT],
}

impl Record {
    /// Unpack a CSV row into exactly [`FIELD_COUNT`] fields.
    ///
    /// The row's source line (when known) is carried into the error so a
    /// malformed dataset can be fixed without guessing.
    pub fn try_from_row(row: &StringRecord) -> Result<Self, CsvRowsError> {
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        Self::try_from_fields(row.iter().map(str::to_string).collect(), line)
    }

    /// Unpack an already-split row. `line` is only used for error reporting.
    pub fn try_from_fields(fields: Vec<String>, line: u64) -> Result<Self, CsvRowsError> {
        let found = fields.len();
        let fields: [String; FIELD_COUNT] =
            fields
                .try_into()
                .map_err(|_: Vec<String>| CsvRowsError::FieldCount {
                    line,
                    expected: FIELD_COUNT,
                    found,
                })?;
        Ok(Self { fields })
    }

    /// All fields in schema order.
    pub fn fields(&self) -> &[String; FIELD_COUNT] {
        &self.fields
    }

    /// Look up a field by its schema name (see [`FIELD_NAMES`]).
    pub fn get(&self, name: &str) -> Option<&str> {
        FIELD_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.fields[i].as_str())
    }

    /// Render as `[Country, Year, ..., Schooling]`.
    ///
    /// Fields are emitted verbatim: no quoting, escaping or trimming.
    pub fn to_message(&self) -> String {
        format!("[{}]", self.fields.join(", "))
    }

    /// The message as the raw bytes put on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_message().into_bytes()
    }
}
