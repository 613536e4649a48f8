//! Dataset loading and message formatting for row-streamer.
//!
//! A dataset is a comma-delimited file whose first line is a header. Every
//! other line is a [`Record`] of exactly fifteen text fields describing one
//! country-year of life-expectancy statistics.
//!
//! # Example
//!
//! ```ignore
//! use row_streamer_csv::Dataset;
//!
//! let dataset = Dataset::load("Life expectancy.csv")?;
//! for row in dataset.rows() {
//!     let record = row_streamer_csv::Record::try_from_row(row)?;
//!     println!("{}", record.to_message());
//! }
//! ```

mod dataset;
mod error;
mod record;

pub use dataset::Dataset;
pub use error::CsvRowsError;
pub use record::{Record, FIELD_COUNT, FIELD_NAMES};
