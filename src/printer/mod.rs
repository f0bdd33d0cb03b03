// src/printer/mod.rs

//! Print the tail of the log file to the output sink.

pub mod printers;
