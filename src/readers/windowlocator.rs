// src/readers/windowlocator.rs

//! Implements a [`WindowLocator`], the offset search engine of _ttlib_:
//! a byte-offset binary search over the file that finds where the trailing
//! time window begins, driving a [`LineReader`] to derive the lines it
//! probes.
//!
//! [`WindowLocator`]: self::WindowLocator
//! [`LineReader`]: crate::readers::linereader::LineReader

use crate::common::{Count, FPath, FileOffset, FileSz, ResultS3};
use crate::data::datetime::{DateTimeExtractor, DateTimeL, DateTimeLOpt};
use crate::debug::printers::vo;
use crate::readers::linereader::LineReader;
use crate::readers::summary::Summary;

use std::collections::HashMap;
use std::io::{Error, Result};

extern crate bstr;
use bstr::ByteSlice;

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WindowLocator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Line-start offsets already read and tested during one search, mapped to
/// the datetime extracted from the line beginning there (`None` when the
/// line yielded no datetime). Append-only for the duration of one search;
/// membership is exact-match on the offset.
///
/// A probe revisiting a key of this map is the search's sole termination
/// signal, and the stored value lets the locator reason about the converged
/// line without reading it again.
pub type KnownPositions = HashMap<FileOffset, DateTimeLOpt>;

/// [`WindowLocator::find_window_start`] result: the `FileOffset` at which
/// streaming should begin, or `Done` for an empty file, or a fatal `Err`.
///
/// [`WindowLocator::find_window_start`]: self::WindowLocator#method.find_window_start
pub type ResultFindStart = ResultS3<FileOffset, Error>;

/// A specialized searcher that uses a [`LineReader`] to find the byte
/// offset of the first line whose datetime is after a threshold instant.
///
/// The search assumes datetimes are non-decreasing with file offset.
/// It repeatedly halves a byte interval `[fo_start, fo_end)`, normalizing
/// each midpoint to a line start, skipping forward over lines without an
/// extractable datetime, and recording every line start inspected in
/// [`KnownPositions`]. Revisiting a recorded line start, or running off the
/// end of the file, ends the search; there is no `fo_start == fo_end`
/// comparison. A final settle walk then pins the exact window boundary.
///
/// One `WindowLocator` performs one search; all search state lives in the
/// instance.
///
/// [`LineReader`]: crate::readers::linereader::LineReader
/// [`KnownPositions`]: self::KnownPositions
pub struct WindowLocator {
    pub(crate) linereader: LineReader,
    extractor: DateTimeExtractor,
    /// Line-start offsets inspected so far; the convergence tracker.
    known_positions: KnownPositions,
    /// `Count` of outer binary-search iterations.
    count_probes: Count,
    /// `Count` of lines read that yielded no datetime.
    count_extract_fails: Count,
    /// `Count` of lines inspected by the post-convergence settle walk.
    count_settle_steps: Count,
}

impl std::fmt::Debug for WindowLocator {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("WindowLocator")
            .field("linereader", &self.linereader)
            .field("extractor", &self.extractor)
            .field("known_positions", &self.known_positions.len())
            .field("probes", &self.count_probes)
            .finish()
    }
}

impl WindowLocator {
    /// Create a new `WindowLocator` around an opened `LineReader`.
    pub fn new(
        linereader: LineReader,
        extractor: DateTimeExtractor,
    ) -> WindowLocator {
        defñ!("WindowLocator::new(LineReader({:?}), {:?})", linereader.path(), extractor);
        WindowLocator {
            linereader,
            extractor,
            known_positions: KnownPositions::new(),
            count_probes: 0,
            count_extract_fails: 0,
            count_settle_steps: 0,
        }
    }

    /// See [`LineReader::filesz`].
    ///
    /// [`LineReader::filesz`]: crate::readers::linereader::LineReader#method.filesz
    #[inline(always)]
    pub const fn filesz(&self) -> FileSz {
        self.linereader.filesz()
    }

    /// See [`LineReader::path`].
    ///
    /// [`LineReader::path`]: crate::readers::linereader::LineReader#method.path
    #[inline(always)]
    pub const fn path(&self) -> &FPath {
        self.linereader.path()
    }

    /// The wrapped `LineReader`, for streaming the remainder of the file
    /// after the search.
    pub fn linereader_mut(&mut self) -> &mut LineReader {
        &mut self.linereader
    }

    /// Gather this run's internal counters.
    pub fn summary(&self) -> Summary {
        Summary {
            filesz: self.linereader.filesz(),
            count_probes: self.count_probes,
            count_lines_read: self.linereader.count_lines_read(),
            count_bytes_read: self.linereader.count_bytes_read(),
            count_bytes_scanback: self.linereader.count_bytes_scanback(),
            count_extract_fails: self.count_extract_fails,
            count_positions_known: self.known_positions.len() as Count,
            count_settle_steps: self.count_settle_steps,
            fileoffset_located: None,
            count_lines_printed: 0,
            count_bytes_printed: 0,
        }
    }

    /// Attempt to derive a datetime from `line`, updating counters and
    /// narrating failures.
    fn extract_dt(
        &mut self,
        fo_line: FileOffset,
        line: &[u8],
    ) -> DateTimeLOpt {
        match self.extractor.extract(line) {
            Some(dt) => Some(dt),
            None => {
                self.count_extract_fails += 1;
                vo!(
                    "no datetime in line at fileoffset {} (len {}): {:?}",
                    fo_line,
                    line.len(),
                    line.as_bstr()
                );

                None
            }
        }
    }

    /// Find the `FileOffset` of the line at which the trailing time window
    /// begins: the first line whose extractable datetime is after
    /// `dt_threshold`. Streaming the file from the returned offset emits no
    /// line with an extractable datetime at or before `dt_threshold`, and
    /// omits no line with an extractable datetime after it.
    ///
    /// Returns `Done` for an empty file. Returns `Found(filesz)` when the
    /// window begins at or after the end of the file (streaming will emit
    /// nothing). Any I/O failure is `Err`.
    pub fn find_window_start(
        &mut self,
        dt_threshold: &DateTimeL,
    ) -> ResultFindStart {
        defn!("({:?})", dt_threshold);
        let filesz: FileSz = self.linereader.filesz();
        if filesz == 0 {
            vo!("find_window_start: file is empty; nothing to locate");
            defx!("return Done; empty file");
            return ResultFindStart::Done;
        }
        vo!("find_window_start: log size {}, threshold {}", filesz, dt_threshold);
        let mut fo_start: FileOffset = 0;
        let mut fo_end: FileOffset = filesz;
        // offset where the search converged and the datetime of the line
        // beginning there, if that line had one
        let (fo_converged, dt_converged): (FileOffset, DateTimeLOpt) = 'searching: loop {
            let fo_half: FileOffset = fo_start + (fo_end - fo_start) / 2;
            self.count_probes += 1;
            vo!(
                "find_window_start: probe {}: fo_start {} fo_end {} fo_half {}",
                self.count_probes,
                fo_start,
                fo_end,
                fo_half
            );
            self.linereader.seek(fo_half);
            if let Err(err) = self.linereader.seek_to_line_start() {
                defx!("return Err({:?})", err);
                return ResultFindStart::Err(err);
            }
            // inner convergence/skip loop: ends this probe with a datetime
            // to compare, or ends the whole search
            let dt: DateTimeL = loop {
                let fo_line: FileOffset = self.linereader.fileoffset_current();
                if let Some(dt_known) = self.known_positions.get(&fo_line) {
                    vo!("find_window_start: line start {} was already inspected; converged", fo_line);
                    break 'searching (fo_line, *dt_known);
                }
                match self.linereader.read_line() {
                    ResultS3::Done => {
                        // the probe ran off the end of the file
                        vo!("find_window_start: end-of-file at {}; converged", fo_line);
                        break 'searching (self.linereader.fileoffset_current(), None);
                    }
                    ResultS3::Err(err) => {
                        defx!("return Err({:?})", err);
                        return ResultFindStart::Err(err);
                    }
                    ResultS3::Found(line) => {
                        // record the line start before attempting to parse
                        // so this line is never read twice
                        let dt_opt: DateTimeLOpt = self.extract_dt(fo_line, &line);
                        self.known_positions
                            .insert(fo_line, dt_opt);
                        match dt_opt {
                            Some(dt) => break dt,
                            None => {
                                // skip forward; the cursor is already at
                                // the start of the next line
                                continue;
                            }
                        }
                    }
                }
            };
            if dt > *dt_threshold {
                vo!(
                    "find_window_start: datetime {} is after threshold; move fo_end {} to {}",
                    dt,
                    fo_end,
                    fo_half
                );
                fo_end = fo_half;
            } else {
                vo!(
                    "find_window_start: datetime {} is at/before threshold; move fo_start {} to {}",
                    dt,
                    fo_start,
                    fo_half
                );
                fo_start = fo_half;
            }
        };
        defo!("converged at fileoffset {} dt {:?}", fo_converged, dt_converged);

        let fo_located: FileOffset = match self.settle(fo_converged, dt_converged, dt_threshold) {
            Ok(val) => val,
            Err(err) => {
                defx!("return Err({:?})", err);
                return ResultFindStart::Err(err);
            }
        };
        vo!("find_window_start: window starts at fileoffset {}", fo_located);
        defx!("return Found({})", fo_located);

        ResultFindStart::Found(fo_located)
    }

    /// Pin the exact window boundary from the convergence offset.
    ///
    /// The raw convergence offset can sit a line or more away from the true
    /// boundary on either side: interval halving happens in byte space, so
    /// with uneven line lengths the revisit that ends the search may fire
    /// before a probe ever lands inside the boundary line. From the first
    /// line at or after the convergence offset with an extractable
    /// datetime, walk forward while lines are at/before the threshold, or
    /// walk backward while predecessor lines are after the threshold or
    /// yield no datetime.
    fn settle(
        &mut self,
        fo_converged: FileOffset,
        dt_converged: DateTimeLOpt,
        dt_threshold: &DateTimeL,
    ) -> Result<FileOffset> {
        defn!("({}, {:?})", fo_converged, dt_converged);
        let (fo_first, dt_first): (FileOffset, DateTimeLOpt) = match dt_converged {
            Some(dt) => (fo_converged, Some(dt)),
            None => self.first_extractable_at_or_after(fo_converged)?,
        };
        let fo_located: FileOffset = match dt_first {
            Some(dt) if dt <= *dt_threshold => self.walk_forward_to_window(fo_first, dt_threshold)?,
            // the line at `fo_first` is within the window, or no line at or
            // after the convergence offset has a datetime; either way the
            // boundary can only be at or before `fo_first`
            _ => self.walk_back_to_window(fo_first, dt_threshold)?,
        };
        defx!("return {}", fo_located);

        Ok(fo_located)
    }

    /// Find the first line at or after `fileoffset` with an extractable
    /// datetime. Returns that line's start offset and datetime, or
    /// `(filesz, None)` when no remaining line has one.
    fn first_extractable_at_or_after(
        &mut self,
        fileoffset: FileOffset,
    ) -> Result<(FileOffset, DateTimeLOpt)> {
        defn!("({})", fileoffset);
        self.linereader.seek(fileoffset);
        loop {
            let fo_line: FileOffset = self.linereader.fileoffset_current();
            match self.linereader.read_line() {
                ResultS3::Done => {
                    defx!("return ({}, None); end-of-file", fo_line);
                    return Ok((self.linereader.fileoffset_current(), None));
                }
                ResultS3::Err(err) => {
                    defx!("return Err({:?})", err);
                    return Err(err);
                }
                ResultS3::Found(line) => {
                    self.count_settle_steps += 1;
                    if let Some(dt) = self.extract_dt(fo_line, &line) {
                        defx!("return ({}, Some({:?}))", fo_line, dt);
                        return Ok((fo_line, Some(dt)));
                    }
                }
            }
        }
    }

    /// From the line at `fo_line`, known to be at/before the threshold,
    /// walk forward to the start of the first line with an extractable
    /// datetime after the threshold. End-of-file means the window begins
    /// at the end of the file (nothing to stream).
    fn walk_forward_to_window(
        &mut self,
        fo_line: FileOffset,
        dt_threshold: &DateTimeL,
    ) -> Result<FileOffset> {
        defn!("({})", fo_line);
        vo!("settle: walk forward from fileoffset {}", fo_line);
        self.linereader.seek(fo_line);
        // consume the too-old line
        match self.linereader.read_line() {
            ResultS3::Done => {
                defx!("return {}; end-of-file", fo_line);
                return Ok(self.linereader.fileoffset_current());
            }
            ResultS3::Err(err) => {
                defx!("return Err({:?})", err);
                return Err(err);
            }
            ResultS3::Found(_line) => {}
        }
        loop {
            let fo_next: FileOffset = self.linereader.fileoffset_current();
            match self.linereader.read_line() {
                ResultS3::Done => {
                    vo!("settle: end-of-file; the window is empty");
                    defx!("return {}; end-of-file", fo_next);
                    return Ok(self.linereader.fileoffset_current());
                }
                ResultS3::Err(err) => {
                    defx!("return Err({:?})", err);
                    return Err(err);
                }
                ResultS3::Found(line) => {
                    self.count_settle_steps += 1;
                    match self.extract_dt(fo_next, &line) {
                        Some(dt) if dt > *dt_threshold => {
                            vo!("settle: line at {} is within the window", fo_next);
                            defx!("return {}", fo_next);
                            return Ok(fo_next);
                        }
                        _ => {
                            vo!("settle: line at {} is still at/before the threshold", fo_next);
                        }
                    }
                }
            }
        }
    }

    /// From `fo_from`, the start of a line within the window or the
    /// end-of-file offset, walk backward while the predecessor line is
    /// after the threshold or yields no datetime. Stops at a predecessor
    /// at/before the threshold, or at offset 0 (the window covers the whole
    /// file). Lines without a datetime are kept inside the window so that
    /// no line after the last too-old record is ever dropped.
    fn walk_back_to_window(
        &mut self,
        fo_from: FileOffset,
        dt_threshold: &DateTimeL,
    ) -> Result<FileOffset> {
        defn!("({})", fo_from);
        vo!("settle: walk backward from fileoffset {}", fo_from);
        let mut fo_window: FileOffset = fo_from;
        while fo_window > 0 {
            // start of the predecessor line; the byte at `fo_window - 1`
            // is the predecessor's terminator, so scan from the byte
            // before it
            let fo_prev: FileOffset = if fo_window <= 2 {
                self.linereader.seek(0);
                0
            } else {
                self.linereader
                    .seek(fo_window - 2);
                self.linereader.seek_to_line_start()?
            };
            match self.linereader.read_line() {
                ResultS3::Done => {
                    break;
                }
                ResultS3::Err(err) => {
                    defx!("return Err({:?})", err);
                    return Err(err);
                }
                ResultS3::Found(line) => {
                    self.count_settle_steps += 1;
                    match self.extract_dt(fo_prev, &line) {
                        Some(dt) if dt <= *dt_threshold => {
                            vo!("settle: predecessor at {} is at/before the threshold", fo_prev);
                            break;
                        }
                        _ => {
                            vo!("settle: predecessor at {} belongs to the window", fo_prev);
                            fo_window = fo_prev;
                        }
                    }
                }
            }
        }
        defx!("return {}", fo_window);

        Ok(fo_window)
    }
}
