// src/tests/common.rs

//! Shared helpers for _ttlib_ tests: temporary log files, canonical
//! record datetimes, and record-line builders.

#![allow(non_upper_case_globals)]

use crate::common::FPath;
use crate::data::datetime::{
    datetime_parse_from_str,
    DateTimeL,
    DATETIME_PATTERN_DEFAULT,
};

use std::io::Write; // for `NamedTempFile.write_all`

extern crate tempfile;
pub use tempfile::NamedTempFile;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix,
/// for easier cleanup of any leftovers.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-tt-test-";

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(
        ntf.path()
            .to_str()
            .unwrap(),
    )
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    let mut ntf = match tempfile::Builder::new()
        .prefix(STR_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// record builders and canonical datetimes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One JSON access-log record (without line terminator) carrying
/// `time_local` datetime `dtstr`.
pub fn record_line(dtstr: &str) -> String {
    format!(
        "{{\"remote_addr\":\"192.0.2.1\",\"time_local\":\"{}\",\"request\":\"GET / HTTP/1.1\",\"status\":\"200\"}}",
        dtstr
    )
}

/// Parse `data` in the default record pattern; panic if it does not parse.
pub fn dt_(data: &str) -> DateTimeL {
    match datetime_parse_from_str(data, DATETIME_PATTERN_DEFAULT) {
        Some(val) => val,
        None => panic!("bad test datetime {:?}", data),
    }
}

// canonical record datetimes, one minute apart
pub const DTSTR_0: &str = "01/Jan/2022:12:00:00 +0000";
pub const DTSTR_1: &str = "01/Jan/2022:12:01:00 +0000";
pub const DTSTR_2: &str = "01/Jan/2022:12:02:00 +0000";
pub const DTSTR_3: &str = "01/Jan/2022:12:03:00 +0000";

// threshold instants around and between the canonical datetimes
pub const DTSTR_BEFORE_0: &str = "01/Jan/2022:11:00:00 +0000";
pub const DTSTR_BETWEEN_0_1: &str = "01/Jan/2022:12:00:30 +0000";
pub const DTSTR_BETWEEN_1_2: &str = "01/Jan/2022:12:01:30 +0000";
pub const DTSTR_BETWEEN_2_3: &str = "01/Jan/2022:12:02:30 +0000";
pub const DTSTR_AFTER_3: &str = "01/Jan/2022:13:00:00 +0000";
