// src/data/datetime.rs

//! Datetime aliases and the [`DateTimeExtractor`].
//!
//! The `DateTimeExtractor` owns the record schema: which JSON key holds the
//! record's datetime string, and the chrono [strftime] pattern that string
//! is written in. The search engine only ever asks "give me a comparable
//! datetime for this line, or tell me you cannot"; everything about the
//! framing of the record lives here.
//!
//! [`DateTimeExtractor`]: self::DateTimeExtractor
//! [strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html

extern crate chrono;
pub use chrono::{DateTime, Duration, FixedOffset, Local};

extern crate serde_json;
use serde_json::Value;

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime typing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The "main" datetime type used in all processing; a timezone-aware
/// instant. Comparisons between `DateTimeL` compare instants, regardless
/// of differing fixed offsets.
pub type DateTimeL = DateTime<FixedOffset>;

/// Optional [`DateTimeL`].
pub type DateTimeLOpt = Option<DateTimeL>;

/// A chrono [strftime] pattern, as a `str`.
///
/// [strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html
#[allow(non_camel_case_types)]
pub type DateTimePattern_str = str;

/// Default JSON key of the datetime value within one log record;
/// the nginx access-log field name.
pub const DATETIME_KEY_DEFAULT: &str = "time_local";

/// Default chrono pattern of the datetime value; the nginx `$time_local`
/// format, e.g. `02/Jan/2006:15:04:05 -0700`.
pub const DATETIME_PATTERN_DEFAULT: &DateTimePattern_str = "%d/%b/%Y:%H:%M:%S %z";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// parsing helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Call [`chrono::DateTime::parse_from_str`] on `data` with `pattern`.
/// `None` if chrono cannot parse it.
///
/// The passed `pattern` must include a timezone specifier (`%z` and
/// friends); patterns without one never match a `DateTime<FixedOffset>`.
///
/// [`chrono::DateTime::parse_from_str`]: https://docs.rs/chrono/latest/chrono/struct.DateTime.html#method.parse_from_str
pub fn datetime_parse_from_str(
    data: &str,
    pattern: &DateTimePattern_str,
) -> DateTimeLOpt {
    match DateTime::parse_from_str(data, pattern) {
        Ok(val) => {
            defñ!("parse_from_str({:?}, {:?}) returned {:?}", data, pattern, val);

            Some(val)
        }
        Err(_err) => {
            defñ!("parse_from_str({:?}, {:?}) failed; ParseError {}", data, pattern, _err);

            None
        }
    }
}

/// The Threshold of one run: the instant `now − seconds`.
/// Records after this instant are "within the window".
pub fn datetime_window_start(
    now: &DateTimeL,
    seconds: u64,
) -> DateTimeL {
    *now - Duration::seconds(seconds as i64)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTimeExtractor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derives a [`DateTimeL`] from one JSON-encoded log line.
///
/// Every failure mode is a `None`: the line is not UTF-8, not JSON, not a
/// JSON object, the key is absent, the value is not a string, or the string
/// does not match the pattern. A failed extraction is never an error; the
/// caller skips the line.
#[derive(Clone, Debug)]
pub struct DateTimeExtractor {
    /// JSON key of the datetime value within one record.
    key: String,
    /// chrono strftime pattern of the datetime value.
    pattern: String,
}

impl DateTimeExtractor {
    pub fn new(
        key: &str,
        pattern: &DateTimePattern_str,
    ) -> DateTimeExtractor {
        defñ!("DateTimeExtractor::new({:?}, {:?})", key, pattern);
        DateTimeExtractor {
            key: String::from(key),
            pattern: String::from(pattern),
        }
    }

    /// JSON key of the datetime value.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// chrono pattern of the datetime value.
    pub fn pattern(&self) -> &DateTimePattern_str {
        self.pattern.as_str()
    }

    /// Attempt to derive a datetime from the bytes of one line.
    pub fn extract(
        &self,
        line: &[u8],
    ) -> DateTimeLOpt {
        let value: Value = match serde_json::from_slice(line) {
            Ok(val) => val,
            Err(_err) => {
                defñ!("from_slice (len {}) failed; {}", line.len(), _err);

                return None;
            }
        };
        let data: &str = match value
            .get(self.key.as_str())
            .and_then(Value::as_str)
        {
            Some(val) => val,
            None => {
                defñ!("no string value at key {:?}", self.key);

                return None;
            }
        };

        datetime_parse_from_str(data, self.pattern.as_str())
    }
}

impl Default for DateTimeExtractor {
    fn default() -> DateTimeExtractor {
        DateTimeExtractor::new(DATETIME_KEY_DEFAULT, DATETIME_PATTERN_DEFAULT)
    }
}
