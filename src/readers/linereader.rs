// src/readers/linereader.rs

//! Implements a [`LineReader`], the low-level byte handler of _ttlib_:
//! it owns the opened log file, normalizes arbitrary byte offsets to
//! line-start offsets, and derives whole lines.
//!
//! [`LineReader`]: self::LineReader

use crate::common::{
    Bytes,
    CRu8,
    Count,
    FPath,
    File,
    FileOffset,
    FileOpenOptions,
    FileSz,
    NLu8,
    ResultS3,
};
use crate::debug::printers::vo;

use std::io::{Error, ErrorKind, Read, Result, Seek, SeekFrom};
use std::path::Path;

extern crate memchr;
use memchr::memchr;

extern crate more_asserts;
use more_asserts::{assert_ge, assert_le, debug_assert_le};

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LineReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Block Size in bytes; the most bytes read from the file in one syscall.
pub type BlockSz = u64;

/// Minimum allowed `BlockSz`.
pub const BLOCKSZ_MIN: BlockSz = 1;

/// Maximum allowed `BlockSz`.
pub const BLOCKSZ_MAX: BlockSz = 0xFFFFFF;

/// Default `BlockSz`. A line longer than this is transparently reassembled
/// from multiple reads by [`LineReader::read_line`].
///
/// [`LineReader::read_line`]: self::LineReader#method.read_line
pub const BLOCKSZ_DEF: BlockSz = 0x4000;

/// [`LineReader::read_line`] result: the bytes of one line without its
/// terminator, or `Done` for a clean end-of-file, or a fatal `Err`.
///
/// [`LineReader::read_line`]: self::LineReader#method.read_line
pub type ResultS3ReadLine = ResultS3<Bytes, Error>;

/// A reader of lines within one log file.
///
/// A `LineReader` keeps a _logical_ cursor, `fo_cursor`, that is always
/// either a line-start offset, a mid-line offset requested by
/// [`seek`], or the end-of-file offset. Reads pull `blocksz` bytes at a
/// time from the underlying [`File`] but never let over-read bytes disturb
/// the logical cursor; after [`read_line`] the cursor is exactly the offset
/// of the byte after the consumed line terminator. The search engine
/// depends on that exactness for its convergence bookkeeping.
///
/// The file size is captured once at open; the file is assumed not to
/// change for the lifetime of the `LineReader`.
///
/// _XXX: not a rust "Reader"; does not implement trait [`Read`]._
///
/// [`seek`]: self::LineReader#method.seek
/// [`read_line`]: self::LineReader#method.read_line
/// [`File`]: crate::common::File
/// [`Read`]: std::io::Read
pub struct LineReader {
    file: File,
    path: FPath,
    /// File size in bytes, read from metadata once at open.
    filesz: FileSz,
    blocksz: BlockSz,
    /// The logical read cursor, a byte offset into the file.
    fo_cursor: FileOffset,
    /// `Count` of lines returned by [`read_line`].
    ///
    /// [`read_line`]: self::LineReader#method.read_line
    pub(super) count_lines_read: Count,
    /// `Count` of bytes pulled from the underlying file, including
    /// over-read bytes beyond consumed line terminators.
    pub(super) count_bytes_read: Count,
    /// `Count` of single bytes inspected by backward scans in
    /// [`seek_to_line_start`].
    ///
    /// [`seek_to_line_start`]: self::LineReader#method.seek_to_line_start
    pub(super) count_bytes_scanback: Count,
}

impl std::fmt::Debug for LineReader {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("path", &self.path)
            .field("filesz", &self.filesz)
            .field("blocksz", &self.blocksz)
            .field("fo_cursor", &self.fo_cursor)
            .finish()
    }
}

/// Implement the LineReader.
impl LineReader {
    /// Create a new `LineReader`.
    ///
    /// Opens the file at `path` read-only and snapshots its size.
    pub fn new(
        path: FPath,
        blocksz: BlockSz,
    ) -> Result<LineReader> {
        defn!("({:?}, {:?})", path, blocksz);
        assert_ge!(blocksz, BLOCKSZ_MIN, "BlockSz {} is too small", blocksz);
        assert_le!(blocksz, BLOCKSZ_MAX, "BlockSz {} is too big", blocksz);

        let path_std: &Path = Path::new(&path);
        let mut open_options = FileOpenOptions::new();
        defo!("open_options.read(true).open({:?})", path);
        let file: File = match open_options
            .read(true)
            .open(path_std)
        {
            Ok(val) => val,
            Err(err) => {
                defx!("return {:?}", err);
                return Err(err);
            }
        };
        let filesz: FileSz = match file.metadata() {
            Ok(val) => val.len() as FileSz,
            Err(err) => {
                defx!("file.metadata() failed; return {:?}", err);
                return Err(err);
            }
        };
        defx!("opened {:?} filesz {}", path, filesz);

        Ok(LineReader {
            file,
            path,
            filesz,
            blocksz,
            fo_cursor: 0,
            count_lines_read: 0,
            count_bytes_read: 0,
            count_bytes_scanback: 0,
        })
    }

    /// File size in bytes, as snapshotted at open.
    #[inline(always)]
    pub const fn filesz(&self) -> FileSz {
        self.filesz
    }

    /// The largest single read size in bytes.
    #[inline(always)]
    pub const fn blocksz(&self) -> BlockSz {
        self.blocksz
    }

    /// Path of the opened file.
    #[inline(always)]
    pub const fn path(&self) -> &FPath {
        &self.path
    }

    /// The logical read cursor: the `FileOffset` the next
    /// [`read_line`] would read from.
    ///
    /// [`read_line`]: self::LineReader#method.read_line
    #[inline(always)]
    pub const fn fileoffset_current(&self) -> FileOffset {
        self.fo_cursor
    }

    /// Is the logical cursor at the end of the file?
    #[inline(always)]
    pub const fn is_eof(&self) -> bool {
        self.fo_cursor >= self.filesz
    }

    /// Move the logical cursor to `fileoffset`. No I/O occurs until the
    /// next read.
    pub fn seek(
        &mut self,
        fileoffset: FileOffset,
    ) {
        debug_assert_le!(
            fileoffset,
            self.filesz,
            "fileoffset {} is past filesz {}",
            fileoffset,
            self.filesz
        );
        defñ!("fo_cursor {} ⟶ {}", self.fo_cursor, fileoffset);
        self.fo_cursor = fileoffset;
    }

    /// `Count` of lines returned by [`read_line`] so far.
    ///
    /// [`read_line`]: self::LineReader#method.read_line
    #[inline(always)]
    pub const fn count_lines_read(&self) -> Count {
        self.count_lines_read
    }

    /// `Count` of bytes pulled from the underlying file so far.
    #[inline(always)]
    pub const fn count_bytes_read(&self) -> Count {
        self.count_bytes_read
    }

    /// `Count` of single bytes inspected by backward scans so far.
    #[inline(always)]
    pub const fn count_bytes_scanback(&self) -> Count {
        self.count_bytes_scanback
    }

    /// Normalize the logical cursor to a line-start offset: scan backward
    /// one byte at a time, beginning with the byte *at* the cursor, until a
    /// line terminator (newline or carriage return) is found, and leave the
    /// cursor one byte past that terminator. Reaching offset 0 without
    /// finding a terminator leaves the cursor at 0 (the first line of the
    /// file has no preceding terminator). A cursor at end-of-file is left
    /// unchanged.
    ///
    /// Returns the new cursor.
    ///
    /// Idempotent at the start of a non-empty line: the byte at such a
    /// cursor is not a terminator and the byte before it is, so a repeated
    /// call cannot walk backward past it. At the start of an *empty* line
    /// the byte at the cursor is itself the empty line's terminator, so the
    /// cursor advances past the empty line; the search engine counts on
    /// this when it skips forward over lines it cannot use.
    pub fn seek_to_line_start(&mut self) -> Result<FileOffset> {
        defn!("fo_cursor {}", self.fo_cursor);
        vo!("seek_to_line_start: rewind to previous line terminator from fileoffset {}", self.fo_cursor);
        if self.fo_cursor >= self.filesz {
            defx!("at end-of-file; fo_cursor {} unchanged", self.fo_cursor);
            return Ok(self.fo_cursor);
        }
        let mut cursor: FileOffset = self.fo_cursor;
        let mut byte_at: [u8; 1] = [0; 1];
        loop {
            self.file
                .seek(SeekFrom::Start(cursor))?;
            let n: usize = self.file.read(&mut byte_at)?;
            if n == 0 {
                // the file shrank beneath the size snapshot; treat the
                // current cursor as the line start
                self.fo_cursor = cursor;
                break;
            }
            self.count_bytes_scanback += 1;
            if byte_at[0] == NLu8 || byte_at[0] == CRu8 {
                self.fo_cursor = cursor + 1;
                break;
            }
            if cursor == 0 {
                self.fo_cursor = 0;
                break;
            }
            cursor -= 1;
        }
        vo!("seek_to_line_start: line start is fileoffset {}", self.fo_cursor);
        defx!("fo_cursor {}", self.fo_cursor);

        Ok(self.fo_cursor)
    }

    /// Read one whole line forward from the logical cursor.
    ///
    /// Pulls `blocksz` bytes at a time, concatenating until a newline is
    /// found; a line longer than `blocksz` is reassembled across reads and
    /// returned unbroken. The returned bytes exclude the newline and any
    /// carriage return immediately preceding it. Afterward the cursor is
    /// the offset of the byte after the newline.
    ///
    /// Returns `Done` when the cursor is at end-of-file before any byte is
    /// read. A final line without a terminator is returned as `Found` with
    /// the cursor left at end-of-file; the `Done` occurs on the *next*
    /// call.
    pub fn read_line(&mut self) -> ResultS3ReadLine {
        defn!("fo_cursor {}", self.fo_cursor);
        vo!("read_line: one line forward from fileoffset {}", self.fo_cursor);
        let mut block: Bytes = vec![0; self.blocksz as usize];
        let mut line: Bytes = Bytes::new();
        loop {
            if let Err(err) = self
                .file
                .seek(SeekFrom::Start(self.fo_cursor + line.len() as FileOffset))
            {
                defx!("return Err({:?})", err);
                return ResultS3ReadLine::Err(err);
            }
            let n: usize = match self.file.read(block.as_mut_slice()) {
                Ok(val) => val,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    defx!("return Err({:?})", err);
                    return ResultS3ReadLine::Err(err);
                }
            };
            if n == 0 {
                if line.is_empty() {
                    vo!("read_line: end-of-file at fileoffset {}", self.fo_cursor);
                    defx!("return Done; end-of-file before any byte");
                    return ResultS3ReadLine::Done;
                }
                // a final line without a terminator
                self.fo_cursor += line.len() as FileOffset;
                self.count_lines_read += 1;
                vo!("read_line: unterminated final line, len {}", line.len());
                defx!("return Found; unterminated final line len {} fo_cursor {}", line.len(), self.fo_cursor);
                return ResultS3ReadLine::Found(line);
            }
            self.count_bytes_read += n as Count;
            match memchr(NLu8, &block[..n]) {
                Some(index) => {
                    line.extend_from_slice(&block[..index]);
                    // the cursor advances past the newline; the line
                    // excludes it and any preceding carriage return
                    self.fo_cursor += (line.len() + 1) as FileOffset;
                    self.count_lines_read += 1;
                    if line.last() == Some(&CRu8) {
                        line.pop();
                    }
                    defx!("return Found; line len {} fo_cursor {}", line.len(), self.fo_cursor);
                    return ResultS3ReadLine::Found(line);
                }
                None => {
                    line.extend_from_slice(&block[..n]);
                }
            }
        }
    }
}
