// src/data/mod.rs

//! The "data" of _ttlib_: datetime type aliases and the extractor that
//! derives a comparable datetime from one JSON-encoded log line.

pub mod datetime;
