// src/lib.rs

//! _ttlib_ implements the _tt_ (_timetail_) program.
//!
//! _tt_ prints the last _N_ seconds of a large chronologically-ordered log
//! file. A [`WindowLocator`] binary searches the file by datetime for the
//! byte offset where the trailing time window begins, then the
//! [`printer`] streams every line from that offset to the end of the file.
//!
//! [`WindowLocator`]: crate::readers::windowlocator::WindowLocator
//! [`printer`]: crate::printer

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
