// src/bin/tt.rs

//! Driver program _tt_ drives the [_ttlib_].
//!
//! Processes user-passed command-line arguments, opens the passed log
//! file, computes the threshold instant `now − SECONDS`, runs a
//! [`WindowLocator`] search for the byte offset where the trailing time
//! window begins, then streams every line from that offset to stdout.
//!
//! If passed CLI option `--summary`, prints a [`Summary`] of the run's
//! internal counters to stderr afterward.
//!
//! `tt.rs` is the only file that prints to stdout.
//!
//! [_ttlib_]: ttlib
//! [`WindowLocator`]: ttlib::readers::windowlocator::WindowLocator
//! [`Summary`]: ttlib::readers::summary::Summary

#![allow(non_camel_case_types)]

use std::io::BufWriter;
use std::process::ExitCode;

use ::chrono::Local;
use ::clap::Parser;
use ::const_format::concatcp;
use ::si_trace_print::stack::stack_offset_set;
use ::si_trace_print::{
    defn,
    defo,
    defx,
};
use ::ttlib::common::{
    verbose_enable,
    Count,
    FPath,
    FileOffset,
};
use ::ttlib::data::datetime::{
    datetime_window_start,
    DateTimeExtractor,
    DateTimeL,
    DATETIME_KEY_DEFAULT,
    DATETIME_PATTERN_DEFAULT,
};
use ::ttlib::debug::printers::{e_err, vo};
use ::ttlib::printer::printers::stream_to_end;
use ::ttlib::readers::linereader::{
    BlockSz,
    LineReader,
    BLOCKSZ_DEF,
    BLOCKSZ_MAX,
    BLOCKSZ_MIN,
};
use ::ttlib::readers::summary::Summary;
use ::ttlib::readers::windowlocator::{ResultFindStart, WindowLocator};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const CLI_HELP_AFTER: &str = concatcp!(
    r#"Example:

    tt --seconds 300 /var/log/nginx/access.log

prints the records of the last five minutes.

The file must hold one JSON record per line, in chronological order, each
record carrying its datetime as a string at KEY, written in the chrono
strftime pattern FORMAT (the pattern must include a timezone specifier).
Lines without an extractable datetime never decide the search but are
printed verbatim when they fall inside the window.

---

Version: "#,
    env!("CARGO_PKG_VERSION"),
    r#"
MSRV: "#,
    env!("CARGO_PKG_RUST_VERSION"),
    r#"
License: "#,
    env!("CARGO_PKG_LICENSE"),
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "tt",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(timetail)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"),
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of the log file to tail.
    #[clap(required = true)]
    path: String,

    /// Print records from the last SECONDS seconds, i.e. records with a
    /// datetime after `now − SECONDS`.
    #[clap(
        short = 's',
        long,
        verbatim_doc_comment,
    )]
    seconds: u64,

    /// JSON key of the datetime value within one record.
    #[clap(
        short = 'k',
        long,
        default_value_t = String::from(DATETIME_KEY_DEFAULT),
    )]
    key: String,

    /// chrono strftime pattern of the datetime value.
    #[clap(
        short = 'f',
        long,
        default_value_t = String::from(DATETIME_PATTERN_DEFAULT),
    )]
    format: String,

    /// Read blocks of this size in bytes.
    /// May pass value as any radix (hexadecimal, decimal, octal, binary).
    /// Using the default value is recommended.
    /// Most useful for developers.
    #[clap(
        required = false,
        long,
        verbatim_doc_comment,
        default_value_t = BLOCKSZ_DEF,
        value_parser = cli_parse_blocksz,
    )]
    blocksz: BlockSz,

    /// Narrate every seek, probe, and decision of the search to stderr.
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print a summary of the run to stderr.
    /// Most useful for developers.
    #[clap(long)]
    summary: bool,
}

/// `clap` argument validator for `--blocksz`.
///
/// Tolerant of multiple radix prefixes.
fn cli_parse_blocksz(blockszs: &str) -> std::result::Result<BlockSz, String> {
    let parsed = if blockszs.starts_with("0x") || blockszs.starts_with("0X") {
        BlockSz::from_str_radix(&blockszs[2..], 16)
    } else if blockszs.starts_with("0o") || blockszs.starts_with("0O") {
        BlockSz::from_str_radix(&blockszs[2..], 8)
    } else if blockszs.starts_with("0b") || blockszs.starts_with("0B") {
        BlockSz::from_str_radix(&blockszs[2..], 2)
    } else {
        blockszs.parse::<BlockSz>()
    };
    let blocksz: BlockSz = match parsed {
        Ok(val) => val,
        Err(err) => {
            return Err(format!("unable to parse --blocksz {:?}: {}", blockszs, err));
        }
    };
    if !(BLOCKSZ_MIN..=BLOCKSZ_MAX).contains(&blocksz) {
        return Err(format!(
            "--blocksz must be {} ≤ BLOCKSZ ≤ {}, it was {:?}",
            BLOCKSZ_MIN, BLOCKSZ_MAX, blockszs
        ));
    }

    Ok(blocksz)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// main
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args = CLI_Args::parse();
    defo!("args {:?}", args);
    if args.debug {
        verbose_enable();
    }

    let now: DateTimeL = Local::now().fixed_offset();
    let dt_threshold: DateTimeL = datetime_window_start(&now, args.seconds);
    vo!("window threshold is {} (now {} − {} seconds)", dt_threshold, now, args.seconds);

    let path: FPath = args.path.clone();
    let linereader: LineReader = match LineReader::new(path, args.blocksz) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{} for file {:?}", err, args.path);
            defx!("return ExitCode::FAILURE");
            return ExitCode::FAILURE;
        }
    };
    let extractor = DateTimeExtractor::new(args.key.as_str(), args.format.as_str());
    let mut locator = WindowLocator::new(linereader, extractor);

    let mut fileoffset_located: Option<FileOffset> = None;
    let mut count_lines_printed: Count = 0;
    let mut count_bytes_printed: Count = 0;
    let exitcode: ExitCode = match locator.find_window_start(&dt_threshold) {
        ResultFindStart::Found(fileoffset) => {
            fileoffset_located = Some(fileoffset);
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            match stream_to_end(locator.linereader_mut(), fileoffset, &mut writer) {
                Ok((count_lines, count_bytes)) => {
                    count_lines_printed = count_lines;
                    count_bytes_printed = count_bytes;
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    e_err!("{} while printing {:?}", err, args.path);
                    ExitCode::FAILURE
                }
            }
        }
        ResultFindStart::Done => {
            // an empty file; nothing to locate, nothing to print
            ExitCode::SUCCESS
        }
        ResultFindStart::Err(err) => {
            e_err!("{} while searching {:?}", err, args.path);
            ExitCode::FAILURE
        }
    };
    if args.summary {
        let mut summary: Summary = locator.summary();
        summary.fileoffset_located = fileoffset_located;
        summary.count_lines_printed = count_lines_printed;
        summary.count_bytes_printed = count_bytes_printed;
        eprintln!("{}", summary);
    }
    defx!("return {:?}", exitcode);

    exitcode
}
