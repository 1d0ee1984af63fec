use chrono::NaiveDate;
use thiserror::Error;

/// `03/December/24`
pub const DISPLAY_DATE_FORMAT: &str = "%d/%B/%y";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("The date must be in format dd/Month/yy, e.g., 03/December/24 (got {0:?})")]
pub struct DateFormatError(pub String);

pub fn parse(input: &str) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::parse_from_str(input.trim(), DISPLAY_DATE_FORMAT)
        .map_err(|_| DateFormatError(input.to_string()))
}

pub fn format(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
