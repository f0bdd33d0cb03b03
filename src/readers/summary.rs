// src/readers/summary.rs

//! Accumulated statistics of one _tt_ run.

use crate::common::{Count, FileOffset, FileSz};

use std::fmt;

/// Internal counters of one run, gathered from the
/// [`WindowLocator`] and its [`LineReader`] after the search, and from the
/// [`printer`] after streaming. Printed to stderr by the CLI under
/// `--summary`.
///
/// [`WindowLocator`]: crate::readers::windowlocator::WindowLocator
/// [`LineReader`]: crate::readers::linereader::LineReader
/// [`printer`]: crate::printer
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// File size in bytes.
    pub filesz: FileSz,
    /// `Count` of binary-search probes.
    pub count_probes: Count,
    /// `Count` of lines read during the search, the settle walk, and
    /// streaming.
    pub count_lines_read: Count,
    /// `Count` of bytes pulled from the file, including over-reads.
    pub count_bytes_read: Count,
    /// `Count` of single bytes inspected by backward line-start scans.
    pub count_bytes_scanback: Count,
    /// `Count` of lines that yielded no datetime.
    pub count_extract_fails: Count,
    /// `Count` of distinct line-start offsets recorded by the search.
    pub count_positions_known: Count,
    /// `Count` of lines inspected by the settle walk.
    pub count_settle_steps: Count,
    /// The located `FileOffset` where streaming began; `None` when the
    /// file was empty.
    pub fileoffset_located: Option<FileOffset>,
    /// `Count` of lines written to the output sink.
    pub count_lines_printed: Count,
    /// `Count` of bytes written to the output sink, terminators included.
    pub count_bytes_printed: Count,
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "   file size           {}", self.filesz)?;
        match self.fileoffset_located {
            Some(fo) => writeln!(f, "   window starts at    {}", fo)?,
            None => writeln!(f, "   window starts at    (not located)")?,
        }
        writeln!(f, "   search probes       {}", self.count_probes)?;
        writeln!(f, "   positions recorded  {}", self.count_positions_known)?;
        writeln!(f, "   settle steps        {}", self.count_settle_steps)?;
        writeln!(f, "   lines read          {}", self.count_lines_read)?;
        writeln!(f, "   lines no datetime   {}", self.count_extract_fails)?;
        writeln!(f, "   bytes read          {}", self.count_bytes_read)?;
        writeln!(f, "   bytes scanned back  {}", self.count_bytes_scanback)?;
        writeln!(f, "   lines printed       {}", self.count_lines_printed)?;
        write!(f, "   bytes printed       {}", self.count_bytes_printed)
    }
}
