//! Value normalizer - database cells to their wire representation
//!
//! Temporal values become ISO-8601 strings and every other non-null value
//! becomes its plain string form, so integers and floats arrive as strings
//! too. NULL is the only value that stays non-string.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use serde_json::Value;

/// A single cell as read from the database, independent of the driver
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    /// Exact numerics keep the text the server sent
    Decimal(String),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(TimeValue),
}

/// A TIME cell: a signed interval, not bounded to one day
/// (MySQL allows -838:59:59 to 838:59:59)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub negative: bool,
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub microseconds: u32,
}

impl TimeValue {
    pub fn new(hours: u32, minutes: u8, seconds: u8) -> Self {
        Self {
            negative: false,
            hours,
            minutes,
            seconds,
            microseconds: 0,
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.microseconds != 0 {
            write!(f, ".{:06}", self.microseconds)?;
        }
        Ok(())
    }
}

impl DbValue {
    /// Render the cell as its normalized string, `None` for NULL
    pub fn to_normalized(&self) -> Option<String> {
        let text = match self {
            DbValue::Null => return None,
            DbValue::Int(v) => v.to_string(),
            DbValue::UInt(v) => v.to_string(),
            // Debug keeps the decimal point on whole numbers ("1.0")
            DbValue::Float(v) => format!("{:?}", v),
            DbValue::Double(v) => format!("{:?}", v),
            DbValue::Decimal(s) | DbValue::Text(s) => s.clone(),
            DbValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            DbValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            DbValue::DateTime(dt) => {
                if dt.nanosecond() == 0 {
                    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
                } else {
                    dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
                }
            }
            DbValue::Time(t) => t.to_string(),
        };
        Some(text)
    }
}

/// Normalize a cell into the JSON value placed in a result row
///
/// SQL NULL becomes JSON `null`. Clients that expect the text `"None"` for
/// missing values must treat `null` the same way.
pub fn normalize(value: &DbValue) -> Value {
    value
        .to_normalized()
        .map(Value::String)
        .unwrap_or(Value::Null)
}
