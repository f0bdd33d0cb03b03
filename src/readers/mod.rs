// src/readers/mod.rs

//! "Readers" for _ttlib_.
//!
//! ## Overview of readers
//!
//! * A [`WindowLocator`] drives a [`LineReader`] to find the byte offset
//!   where the trailing time window begins.
//! * A `LineReader` only handles `u8` bytes: it normalizes arbitrary byte
//!   offsets to line starts and derives whole lines.
//!
//! The _tt_ binary program uses one `WindowLocator` instance per run to
//! drive the search, then hands the located offset to the
//! [`printer`] to stream the remainder of the file.
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`WindowLocator`]: crate::readers::windowlocator::WindowLocator
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`printer`]: crate::printer

pub mod linereader;
pub mod summary;
pub mod windowlocator;
