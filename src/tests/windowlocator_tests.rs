// src/tests/windowlocator_tests.rs

#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

use crate::common::{FPath, FileOffset};
use crate::data::datetime::{DateTimeExtractor, DateTimeL};
use crate::printer::printers::stream_to_end;
use crate::readers::linereader::{BlockSz, LineReader};
use crate::readers::summary::Summary;
use crate::readers::windowlocator::{ResultFindStart, WindowLocator};
use crate::tests::common::{
    create_temp_file,
    dt_,
    ntf_fpath,
    record_line,
    DTSTR_0,
    DTSTR_1,
    DTSTR_2,
    DTSTR_3,
    DTSTR_AFTER_3,
    DTSTR_BEFORE_0,
    DTSTR_BETWEEN_0_1,
    DTSTR_BETWEEN_1_2,
    DTSTR_BETWEEN_2_3,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// block sizes exercised by every scenario; the located offset must not
/// depend on the read granularity
const BLOCKSZS_TEST: [BlockSz; 4] = [2, 3, 0x10, 0x4000];

/// helper to wrap the match and panic checks
fn new_WindowLocator(
    path: &FPath,
    blocksz: BlockSz,
) -> WindowLocator {
    let linereader: LineReader = match LineReader::new(path.clone(), blocksz) {
        Ok(val) => val,
        Err(err) => {
            panic!("ERROR: LineReader::new({:?}, {}) failed {}", path, blocksz, err);
        }
    };

    WindowLocator::new(linereader, DateTimeExtractor::default())
}

/// run `find_window_start` over `data` with threshold `dtstr_threshold`,
/// stream from the located offset, and assert the streamed bytes; repeated
/// for every block size in `BLOCKSZS_TEST`
fn do_test_locate_and_stream(
    data: &str,
    dtstr_threshold: &str,
    expect: &str,
) {
    let ntf = create_temp_file(data);
    let path = ntf_fpath(&ntf);
    let dt_threshold: DateTimeL = dt_(dtstr_threshold);
    for blocksz in BLOCKSZS_TEST.iter() {
        let mut locator: WindowLocator = new_WindowLocator(&path, *blocksz);
        let fileoffset: FileOffset = match locator.find_window_start(&dt_threshold) {
            ResultFindStart::Found(val) => val,
            result => {
                panic!("ERROR: find_window_start returned {}, expected Found; blocksz {}", result, blocksz);
            }
        };
        let mut output: Vec<u8> = Vec::new();
        match stream_to_end(locator.linereader_mut(), fileoffset, &mut output) {
            Ok(_) => {}
            Err(err) => {
                panic!("ERROR: stream_to_end({}, …) failed {}; blocksz {}", fileoffset, err, blocksz);
            }
        }
        assert_eq!(
            expect.as_bytes(),
            output.as_slice(),
            "\nblocksz {} located fileoffset {}\nexpected output {:?}\ngot      output {:?}\n",
            blocksz,
            fileoffset,
            expect,
            String::from_utf8_lossy(&output),
        );
    }
}

/// the canonical four-record file
fn data4() -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        record_line(DTSTR_0),
        record_line(DTSTR_1),
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    )
}

// -------------------------------------------------------------------------------------------------

/// threshold between the second and third record: only the last two
/// records are within the window
#[test]
fn test_find_window_start_threshold_between_1_2() {
    let expect: String = format!("{}\n{}\n", record_line(DTSTR_2), record_line(DTSTR_3));
    do_test_locate_and_stream(data4().as_str(), DTSTR_BETWEEN_1_2, expect.as_str());
}

/// a record exactly at the threshold is "too old" and excluded
#[test]
fn test_find_window_start_threshold_at_record_1() {
    let expect: String = format!("{}\n{}\n", record_line(DTSTR_2), record_line(DTSTR_3));
    do_test_locate_and_stream(data4().as_str(), DTSTR_1, expect.as_str());
}

#[test]
fn test_find_window_start_threshold_between_0_1() {
    let expect: String = format!(
        "{}\n{}\n{}\n",
        record_line(DTSTR_1),
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    );
    do_test_locate_and_stream(data4().as_str(), DTSTR_BETWEEN_0_1, expect.as_str());
}

#[test]
fn test_find_window_start_threshold_between_2_3() {
    let expect: String = format!("{}\n", record_line(DTSTR_3));
    do_test_locate_and_stream(data4().as_str(), DTSTR_BETWEEN_2_3, expect.as_str());
}

/// a window larger than the file's time span streams the whole file
#[test]
fn test_find_window_start_window_covers_whole_file() {
    let data: String = data4();
    do_test_locate_and_stream(data.as_str(), DTSTR_BEFORE_0, data.as_str());
}

/// a window beginning after the last record streams nothing
#[test]
fn test_find_window_start_window_after_all_records() {
    do_test_locate_and_stream(data4().as_str(), DTSTR_AFTER_3, "");
}

/// a final record without a terminator is still found and streamed
#[test]
fn test_find_window_start_unterminated_final_record() {
    let data: String = format!(
        "{}\n{}\n{}\n{}",
        record_line(DTSTR_0),
        record_line(DTSTR_1),
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    );
    let expect: String = format!("{}\n{}\n", record_line(DTSTR_2), record_line(DTSTR_3));
    do_test_locate_and_stream(data.as_str(), DTSTR_BETWEEN_1_2, expect.as_str());
}

/// a single record within the window streams the whole file
#[test]
fn test_find_window_start_single_record_within() {
    let data: String = format!("{}\n", record_line(DTSTR_0));
    do_test_locate_and_stream(data.as_str(), DTSTR_BEFORE_0, data.as_str());
}

/// a single record at/before the threshold streams nothing
#[test]
fn test_find_window_start_single_record_too_old() {
    let data: String = format!("{}\n", record_line(DTSTR_0));
    do_test_locate_and_stream(data.as_str(), DTSTR_BETWEEN_0_1, "");
}

// -------------------------------------------------------------------------------------------------

/// a malformed line strictly inside the window never decides the search
/// but is streamed verbatim
#[test]
fn test_find_window_start_malformed_within_window() {
    let data: String = format!(
        "{}\n{}\n{}\nTHIS IS NOT A RECORD\n{}\n",
        record_line(DTSTR_0),
        record_line(DTSTR_1),
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    );
    let expect: String = format!(
        "{}\nTHIS IS NOT A RECORD\n{}\n",
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    );
    do_test_locate_and_stream(data.as_str(), DTSTR_BETWEEN_1_2, expect.as_str());
}

/// an empty line strictly inside the window is streamed verbatim
#[test]
fn test_find_window_start_empty_line_within_window() {
    let data: String = format!(
        "{}\n{}\n{}\n\n{}\n",
        record_line(DTSTR_0),
        record_line(DTSTR_1),
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    );
    let expect: String = format!("{}\n\n{}\n", record_line(DTSTR_2), record_line(DTSTR_3));
    do_test_locate_and_stream(data.as_str(), DTSTR_BETWEEN_1_2, expect.as_str());
}

/// consecutive malformed lines are skipped within one probe
#[test]
fn test_find_window_start_consecutive_malformed_too_old() {
    let data: String = format!(
        "{}\ngarbage one\ngarbage two\ngarbage three\n{}\n{}\n{}\n",
        record_line(DTSTR_0),
        record_line(DTSTR_1),
        record_line(DTSTR_2),
        record_line(DTSTR_3),
    );
    let expect: String = format!("{}\n{}\n", record_line(DTSTR_2), record_line(DTSTR_3));
    do_test_locate_and_stream(data.as_str(), DTSTR_BETWEEN_1_2, expect.as_str());
}

/// a file where every line is malformed is streamed verbatim in whole
#[test]
fn test_find_window_start_all_malformed() {
    let data: &str = "not json\n{\"no\":\"datetime here\"}\n<<<>>>\n";
    do_test_locate_and_stream(data, DTSTR_BETWEEN_1_2, data);
}

/// …even when the final malformed line is unterminated
#[test]
fn test_find_window_start_all_malformed_unterminated() {
    do_test_locate_and_stream("junk one\njunk two", DTSTR_BETWEEN_1_2, "junk one\njunk two\n");
}

/// …even when the lines are only terminators
#[test]
fn test_find_window_start_only_blank_lines() {
    do_test_locate_and_stream("\n\n\n\n", DTSTR_BETWEEN_1_2, "\n\n\n\n");
}

// -------------------------------------------------------------------------------------------------

/// an empty file converges immediately with nothing to locate
#[test]
fn test_find_window_start_empty_file() {
    let ntf = create_temp_file("");
    let path = ntf_fpath(&ntf);
    let mut locator: WindowLocator = new_WindowLocator(&path, 0x10);
    let dt_threshold: DateTimeL = dt_(DTSTR_BETWEEN_1_2);
    match locator.find_window_start(&dt_threshold) {
        ResultFindStart::Done => {}
        result => {
            panic!("ERROR: find_window_start returned {}, expected Done", result);
        }
    }
}

/// the run's counters are gathered
#[test]
fn test_summary_counts() {
    let data: String = data4();
    let ntf = create_temp_file(data.as_str());
    let path = ntf_fpath(&ntf);
    let mut locator: WindowLocator = new_WindowLocator(&path, 0x10);
    let dt_threshold: DateTimeL = dt_(DTSTR_BETWEEN_1_2);
    match locator.find_window_start(&dt_threshold) {
        ResultFindStart::Found(_) => {}
        result => {
            panic!("ERROR: find_window_start returned {}, expected Found", result);
        }
    }
    let summary: Summary = locator.summary();
    assert_eq!(data.len() as u64, summary.filesz);
    assert!(summary.count_probes >= 1, "at least one probe must occur");
    assert!(
        summary.count_positions_known >= 1,
        "at least one line start must be recorded"
    );
    assert!(summary.count_lines_read >= 1);
}
