// src/printer/printers.rs

//! Stream every line from a located `FileOffset` to the end of the file.
//!
//! No datetime filtering happens here: once the [`WindowLocator`] has
//! picked the starting offset, everything after it is emitted verbatim,
//! including lines the search could not derive a datetime from.
//!
//! [`WindowLocator`]: crate::readers::windowlocator::WindowLocator

use crate::common::{Count, FileOffset, NLu8a, ResultS3};
use crate::debug::printers::vo;
use crate::readers::linereader::LineReader;

use std::io::{ErrorKind, Result, Write};

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// streaming
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Write one line and its newline terminator.
///
/// `Ok(false)` when the sink reports a broken pipe: the downstream
/// consumer (`head`, a closed pager) is gone and streaming should stop
/// quietly, matching ordinary Unix tool behavior. Any other write error
/// is fatal.
fn write_line(
    writer: &mut impl Write,
    line: &[u8],
) -> Result<bool> {
    match writer
        .write_all(line)
        .and_then(|_| writer.write_all(&NLu8a))
    {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(false),
        Err(err) => Err(err),
    }
}

/// Stream every line from `fileoffset` to the end of the file into
/// `writer`, each terminated by a newline. A final line without a
/// terminator in the file is still emitted with one.
///
/// Returns the `Count` of lines and of bytes written (terminators
/// included).
pub fn stream_to_end(
    linereader: &mut LineReader,
    fileoffset: FileOffset,
    writer: &mut impl Write,
) -> Result<(Count, Count)> {
    defn!("({}, …)", fileoffset);
    vo!("stream_to_end: print from fileoffset {} to the end of the file", fileoffset);
    let mut count_lines: Count = 0;
    let mut count_bytes: Count = 0;
    linereader.seek(fileoffset);
    loop {
        match linereader.read_line() {
            ResultS3::Done => {
                break;
            }
            ResultS3::Err(err) => {
                defx!("return Err({:?})", err);
                return Err(err);
            }
            ResultS3::Found(line) => match write_line(writer, &line) {
                Ok(true) => {
                    count_lines += 1;
                    count_bytes += line.len() as Count + 1;
                }
                Ok(false) => {
                    vo!("stream_to_end: output sink is gone; stop");
                    defo!("broken pipe after {} lines", count_lines);
                    break;
                }
                Err(err) => {
                    defx!("return Err({:?})", err);
                    return Err(err);
                }
            },
        }
    }
    match writer.flush() {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
        Err(err) => {
            defx!("return Err({:?})", err);
            return Err(err);
        }
    }
    defx!("return ({} lines, {} bytes)", count_lines, count_bytes);

    Ok((count_lines, count_bytes))
}
