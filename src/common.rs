// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

pub use std::fs::File;
pub use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileMetadata = std::fs::Metadata;
pub type FileOpenOptions = std::fs::OpenOptions;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// offsets, bytes, lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Offset into a file in bytes.
pub type FileOffset = u64;

/// Size of a file in bytes.
pub type FileSz = u64;

/// A general-purpose counter, typically used for internal statistics.
pub type Count = u64;

/// Sequence of bytes; the payload of one [`Line`] without its terminator.
///
/// [`Line`]: crate::readers::linereader::LineReader#method.read_line
pub type Bytes = Vec<u8>;

/// Single-byte newline character as `u8`.
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = b'\n';

/// Newline in a byte buffer.
#[allow(non_upper_case_globals)]
pub const NLu8a: [u8; 1] = [NLu8];

/// Single-byte carriage return character as `u8`.
#[allow(non_upper_case_globals)]
pub const CRu8: u8 = b'\r';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Result enum for the *Reader find and read functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` Simplified in 3 states, for line reading and offset searching
/// functions.
///
/// Distinguishes "found data" from "clean end of data" from "an error
/// occurred". End-of-file during a search is an expected terminal outcome,
/// not an error, so it must not be conflated with `Err`.
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the found data.
    Found(T),

    /// File is empty, or the read ran off the end of the file, or other
    /// condition that means "Done", nothing to return, but no bad errors
    /// happened.
    Done,

    /// Contains the error value, something bad happened.
    Err(E),
}

impl<T, E> ResultS3<T, E> {
    /// Returns `true` if the result is [`Found`] or [`Done`].
    ///
    /// [`Found`]: self::ResultS3#variant.Found
    /// [`Done`]: self::ResultS3#variant.Done
    #[inline(always)]
    pub const fn is_ok(&self) -> bool {
        matches!(*self, ResultS3::Found(_) | ResultS3::Done)
    }

    /// Returns `true` if the result is [`Err`].
    ///
    /// [`Err`]: self::ResultS3#variant.Err
    #[inline(always)]
    pub const fn is_err(&self) -> bool {
        matches!(*self, ResultS3::Err(_))
    }

    /// Returns `true` if the result is [`Found`].
    ///
    /// [`Found`]: self::ResultS3#variant.Found
    #[inline(always)]
    pub const fn is_found(&self) -> bool {
        matches!(*self, ResultS3::Found(_))
    }

    /// Returns `true` if the result is [`Done`].
    ///
    /// [`Done`]: self::ResultS3#variant.Done
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultS3::Done)
    }

    /// Converts from `ResultS3<T, E>` to [`Option<T>`], discarding any error.
    #[allow(dead_code)]
    #[inline(always)]
    pub fn ok(self) -> Option<T> {
        match self {
            ResultS3::Found(x) => Some(x),
            ResultS3::Done => None,
            ResultS3::Err(_) => None,
        }
    }

    /// Converts from `ResultS3<T, E>` to [`Option<E>`], discarding any data.
    #[allow(dead_code)]
    #[inline(always)]
    pub fn err(self) -> Option<E> {
        match self {
            ResultS3::Found(_) => None,
            ResultS3::Done => None,
            ResultS3::Err(x) => Some(x),
        }
    }
}

impl<T, E> std::fmt::Display for ResultS3<T, E>
where
    E: std::fmt::Display,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        match self {
            ResultS3::Found(_) => {
                write!(f, "ResultS3::Found")
            }
            ResultS3::Done => {
                write!(f, "ResultS3::Done")
            }
            ResultS3::Err(err) => {
                write!(f, "ResultS3::Err({})", err)
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// run-time verbose toggle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Should the search narrate every seek, probe, and decision to stderr?
/// Set once at program start, from CLI option `--debug`.
static VERBOSE_TRACE: AtomicBool = AtomicBool::new(false);

/// Enable narration of the search to stderr (macro [`vo!`]).
///
/// [`vo!`]: crate::debug::printers::vo
pub fn verbose_enable() {
    VERBOSE_TRACE.store(true, Ordering::SeqCst);
}

/// Is narration of the search enabled?
#[inline(always)]
pub fn verbose_enabled() -> bool {
    VERBOSE_TRACE.load(Ordering::SeqCst)
}
