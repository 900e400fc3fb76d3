//! Diff classification module
//!
//! This module turns the raw unified-diff text for one file change into
//! added/deleted/modified line counts. Counting is hunk-local: a hunk whose
//! pure-addition tally equals its pure-deletion tally is a same-size
//! replacement and counts entirely as modified lines.

use std::sync::LazyLock;

use memchr::memchr3_iter;
use regex::Regex;

use crate::record::ChangeCounts;

/// Hunk boundary line, e.g. `@@ -1,2 +1,2 @@`. The four range numbers are
/// matched but not needed for counting.
static HUNK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@@ -\d+,\d+ \+\d+,\d+ @@").expect("invalid hunk header pattern"));

/// Classify one file's unified-diff text into line-change counts
///
/// Lines ahead of the first hunk boundary (the `---`/`+++` file headers and
/// anything else the backend prints) never contribute. Empty or unparsable
/// input yields all-zero counts.
pub fn classify(diff_text: &str) -> ChangeCounts {
    let mut counts = ChangeCounts::default();
    let mut added_tally = 0u64;
    let mut deleted_tally = 0u64;
    let mut in_hunk = false;

    for line in split_records(diff_text) {
        if HUNK_HEADER.is_match(line) {
            if in_hunk {
                flush_hunk(&mut counts, added_tally, deleted_tally);
            }
            in_hunk = true;
            added_tally = 0;
            deleted_tally = 0;
        } else if !in_hunk {
            // Still in the file header region.
        } else if is_added_line(line) {
            added_tally += 1;
        } else if is_deleted_line(line) {
            deleted_tally += 1;
        }
    }

    if in_hunk {
        flush_hunk(&mut counts, added_tally, deleted_tally);
    }

    counts
}

/// Fold one finished hunk's tallies into the running counts
///
/// Equal tallies mean a same-size replacement and count as modifications;
/// unequal tallies keep additions and deletions separate.
fn flush_hunk(counts: &mut ChangeCounts, added_tally: u64, deleted_tally: u64) {
    if added_tally == deleted_tally {
        counts.modified += added_tally;
    } else {
        counts.added += added_tally;
        counts.deleted += deleted_tally;
    }
}

/// Pure-addition line: starts with `+` but is not the `+++` file header
fn is_added_line(line: &str) -> bool {
    line.starts_with('+') && !line.starts_with("+++")
}

/// Pure-deletion line: starts with `-` but is not the `---` file header
fn is_deleted_line(line: &str) -> bool {
    line.starts_with('-') && !line.starts_with("---")
}

/// Split diff text on any of the record separators NUL, CR, LF
///
/// Separators are single ASCII bytes, so slicing at their positions always
/// lands on character boundaries.
fn split_records(text: &str) -> impl Iterator<Item = &str> + '_ {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    memchr3_iter(0, b'\r', b'\n', bytes)
        .chain(std::iter::once(bytes.len()))
        .map(move |end| {
            let record = &text[start..end];
            start = (end + 1).min(bytes.len());
            record
        })
}
