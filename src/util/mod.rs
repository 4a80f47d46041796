//! Utility modules for gridview.

mod date_parser;

pub use date_parser::{DateParseError, parse_date_value};
