//! Log stream parsing module
//!
//! This module provides the single-pass state machine over the Subversion
//! log stream. It recognizes revision-start lines and file-status lines,
//! delegates path filtering and diff classification, and drives the
//! revision aggregator. Everything else in the stream carries no meaning at
//! this layer and is skipped.

use std::collections::HashSet;
use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::classify::classify;
use crate::error::Result;
use crate::path_filter::PathFilter;
use crate::provider::DiffProvider;
use crate::record::{ChangeKind, RevisionAggregator, RevisionRecord};
use crate::sink::Sink;

/// Revision-start line, e.g. `r5 | alice | 2020-01-01 10:00:00 +0000 (...)`
static REVISION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^r(\d+) \| (\w+) \| (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})")
        .expect("invalid revision start pattern")
});

/// File-status line, e.g. `   M /trunk/foo.txt`
static FILE_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+([MAD])\s+(.*)$").expect("invalid file status pattern"));

/// Streaming parser turning a per-revision log into revision records
///
/// Consumes the input exactly once, left to right, with no lookahead beyond
/// the current line, and holds only the single open record between lines.
pub struct LogStreamParser<P: DiffProvider> {
    provider: P,
    path_filter: PathFilter,
    ignored_authors: HashSet<String>,
}

impl<P: DiffProvider> LogStreamParser<P> {
    /// Create a parser over the given diff backend
    ///
    /// By default no path is excluded and no author is ignored.
    pub fn new(provider: P) -> Self {
        LogStreamParser {
            provider,
            path_filter: PathFilter::default(),
            ignored_authors: HashSet::new(),
        }
    }

    /// Add a path exclusion filter
    pub fn with_path_filter(mut self, path_filter: PathFilter) -> Self {
        self.path_filter = path_filter;
        self
    }

    /// Add authors whose revisions are withheld from the sink
    pub fn with_ignored_authors<I>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.ignored_authors = authors.into_iter().collect();
        self
    }

    /// Process one log stream end to end
    ///
    /// Each input line is fully handled, including any diff retrieval and
    /// classification, before the next line is read. A pending record is
    /// emitted when the next revision-start line appears or when the stream
    /// ends, unless its author is ignored.
    pub fn process_log<R: BufRead, S: Sink>(&self, reader: R, sink: &mut S) -> Result<()> {
        let mut aggregator = RevisionAggregator::new();

        for line in reader.lines() {
            let line = line?;
            if let Some(captures) = REVISION_START.captures(&line) {
                let Ok(revision) = captures[1].parse::<u64>() else {
                    debug!(line = %line, "revision number out of range, line skipped");
                    continue;
                };
                let finished = aggregator.start_revision(
                    revision,
                    captures[2].to_owned(),
                    captures[3].to_owned(),
                );
                if let Some(record) = finished {
                    self.emit_unless_ignored(&record, sink)?;
                }
            } else if let Some(captures) = FILE_STATUS.captures(&line) {
                self.process_file_status(&mut aggregator, &captures[1], &captures[2]);
            }
            // Diff body lines, separators, and blank lines fall through.
        }

        let pending_author = aggregator.current().map(|record| record.author.clone());
        if let Some(author) = pending_author {
            if self.is_ignored_author(&author) {
                debug!(author = %author, "pending revision withheld, author ignored");
            } else {
                aggregator.finalize_and_emit(sink)?;
            }
        }

        Ok(())
    }

    /// Handle one file-status line for the open revision
    ///
    /// Retrieval and classification run for every non-ignored path, even
    /// when the revision's author is ignored; author filtering only gates
    /// emission. A retrieval failure counts as a zero line contribution
    /// while the file-status count still increments.
    fn process_file_status(
        &self,
        aggregator: &mut RevisionAggregator,
        status: &str,
        path: &str,
    ) {
        let Some(revision) = aggregator.current().map(|record| record.revision) else {
            // File-status lines ahead of the first revision cannot be attributed.
            return;
        };
        let Some(kind) = status.chars().next().and_then(ChangeKind::from_status) else {
            return;
        };

        if self.path_filter.is_ignored(path) {
            debug!(path, "path excluded from analysis");
            return;
        }

        aggregator.record_file_change(kind);

        match self
            .provider
            .fetch_diff(path, revision.saturating_sub(1), revision)
        {
            Ok(diff_text) => aggregator.add_line_counts(classify(&diff_text)),
            Err(error) => {
                debug!(path, error = %error, "diff retrieval failed, zero line contribution");
            }
        }
    }

    /// Emit a finished record unless its author is ignored
    fn emit_unless_ignored<S: Sink>(&self, record: &RevisionRecord, sink: &mut S) -> Result<()> {
        if self.is_ignored_author(&record.author) {
            debug!(author = %record.author, "revision withheld, author ignored");
            Ok(())
        } else {
            sink.emit(record)
        }
    }

    fn is_ignored_author(&self, author: &str) -> bool {
        self.ignored_authors.contains(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderError, StaticDiffProvider};
    use crate::sink::RecordingSink;
    use std::cell::Cell;
    use std::io::Cursor;

    const BALANCED_DIFF: &str = "--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n-old1\n-old2\n+new1\n+new2\n";
    const ADDITION_DIFF: &str = "--- a/f\n+++ b/f\n@@ -0,0 +1,3 @@\n+a\n+b\n+c\n";

    fn parser_for(provider: StaticDiffProvider) -> LogStreamParser<StaticDiffProvider> {
        LogStreamParser::new(provider)
    }

    fn run(parser: &LogStreamParser<StaticDiffProvider>, log: &str) -> RecordingSink {
        let mut sink = RecordingSink::new();
        parser.process_log(Cursor::new(log), &mut sink).unwrap();
        sink
    }

    /// **What is tested:** Emission of a revision exactly when the next revision-start line appears
    /// **Why it is tested:** The state machine must close a revision at the boundary, before any of the next revision's lines are processed
    /// **Test conditions:** Two revisions, the first with one modified file whose diff is canned
    /// **Expectations:** Revision 5 is emitted with its file and line counts; revision 6 follows at end of stream
    #[test]
    fn test_revision_boundary_emission() {
        let provider =
            StaticDiffProvider::new().with_diff("/trunk/foo.txt", 4, 5, BALANCED_DIFF);
        let parser = parser_for(provider);

        let log = "r5 | alice | 2020-01-01 10:00:00 +0000 (Wed, 01 Jan 2020) | 1 line\n\
                   Changed paths:\n   \
                   M /trunk/foo.txt\n\
                   \n\
                   some commit message\n\
                   r6 | bob | 2020-01-02 11:00:00 +0000 (Thu, 02 Jan 2020) | 1 line\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.records[0].revision, 5);
        assert_eq!(sink.records[0].author, "alice");
        assert_eq!(sink.records[0].timestamp, "2020-01-01 10:00:00");
        assert_eq!(sink.records[0].files.modified, 1);
        assert_eq!(sink.records[0].lines.modified, 2);
        assert_eq!(sink.records[1].revision, 6);
        assert_eq!(sink.records[1].files.modified, 0);
    }

    /// **What is tested:** Emission of the last open revision at end of stream
    /// **Why it is tested:** A stream ending right after a file-status line must still produce the pending record exactly once
    /// **Test conditions:** Single revision whose log ends without another boundary
    /// **Expectations:** One record with the accumulated counts
    #[test]
    fn test_end_of_stream_emits_pending_revision() {
        let provider =
            StaticDiffProvider::new().with_diff("/trunk/new.txt", 4, 5, ADDITION_DIFF);
        let parser = parser_for(provider);

        let log = "r5 | alice | 2020-01-01 10:00:00 +0000\n   A /trunk/new.txt\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].files.added, 1);
        assert_eq!(sink.records[0].lines.added, 3);
        assert_eq!(sink.records[0].lines.deleted, 0);
    }

    /// **What is tested:** Suppression of revisions whose author is ignored
    /// **Why it is tested:** Ignored authors must never appear in output, at boundaries or at end of stream
    /// **Test conditions:** Ignored author in the middle of the stream and another ignored author pending at the end
    /// **Expectations:** Only the non-ignored revision is emitted
    #[test]
    fn test_ignored_authors_never_emitted() {
        let parser = parser_for(StaticDiffProvider::new())
            .with_ignored_authors(["build".to_owned(), "teamcity".to_owned()]);

        let log = "r5 | build | 2020-01-01 10:00:00 +0000\n\
                   r6 | alice | 2020-01-02 11:00:00 +0000\n\
                   r7 | teamcity | 2020-01-03 12:00:00 +0000\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].revision, 6);
        assert_eq!(sink.records[0].author, "alice");
    }

    /// **What is tested:** Exclusion of ignored paths from file and line counts
    /// **Why it is tested:** A file-status line on an ignored path must contribute to neither counter and must trigger no retrieval
    /// **Test conditions:** One ignored and one analyzed path in the same revision; only the analyzed path has a canned diff
    /// **Expectations:** Counts reflect the analyzed path alone
    #[test]
    fn test_ignored_paths_contribute_nothing() {
        let provider =
            StaticDiffProvider::new().with_diff("/trunk/src/main.c", 4, 5, BALANCED_DIFF);
        let parser = parser_for(provider)
            .with_path_filter(PathFilter::new(vec!["/tags".to_owned()]));

        let log = "r5 | alice | 2020-01-01 10:00:00 +0000\n   \
                   M /tags/1.0/frozen.c\n   \
                   M /trunk/src/main.c\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].files.modified, 1);
        assert_eq!(sink.records[0].lines.modified, 2);
    }

    /// **What is tested:** Fail-soft handling of diff retrieval failures
    /// **Why it is tested:** One unreachable path must not abort the run; its file-status count still increments with zero line counts
    /// **Test conditions:** Provider with no canned diff for the requested path
    /// **Expectations:** The record counts the file change and no lines
    #[test]
    fn test_retrieval_failure_counts_zero_lines() {
        let parser = parser_for(StaticDiffProvider::new());

        let log = "r5 | alice | 2020-01-01 10:00:00 +0000\n   D /trunk/gone.txt\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].files.deleted, 1);
        assert_eq!(sink.records[0].lines.modified, 0);
        assert_eq!(sink.records[0].lines.added, 0);
        assert_eq!(sink.records[0].lines.deleted, 0);
    }

    /// **What is tested:** Handling of file-status lines before any revision-start line
    /// **Why it is tested:** Such lines cannot be attributed to a revision and must be skipped silently
    /// **Test conditions:** A stray file-status line ahead of the first boundary
    /// **Expectations:** The stray line contributes nothing; the following revision parses normally
    #[test]
    fn test_file_status_before_first_revision_is_skipped() {
        let parser = parser_for(StaticDiffProvider::new());

        let log = "   M /trunk/orphan.txt\nr5 | alice | 2020-01-01 10:00:00 +0000\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].files.modified, 0);
    }

    /// **What is tested:** Tolerance of unrecognized lines in the stream
    /// **Why it is tested:** Commit messages, separators, and diff body lines leaking into the log carry no state-machine meaning
    /// **Test conditions:** A revision surrounded by separator lines, prose, and hunk-like text
    /// **Expectations:** Only revision-start and file-status lines affect the result
    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let parser = parser_for(StaticDiffProvider::new());

        let log = "------------------------------------------------------------------------\n\
                   r5 | alice | 2020-01-01 10:00:00 +0000\n\
                   fixed the frobnicator\n\
                   @@ -1,2 +1,2 @@\n\
                   +not a real change line\n";
        let sink = run(&parser, log);

        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].files, crate::record::ChangeCounts::default());
        assert_eq!(sink.records[0].lines, crate::record::ChangeCounts::default());
    }

    /// **What is tested:** Lines that almost match the revision-start pattern
    /// **Why it is tested:** Malformed boundaries must be skipped, not parsed into bogus revisions
    /// **Test conditions:** Lines missing the timestamp, using the wrong separator, or with a non-numeric revision
    /// **Expectations:** No record is produced for any of them
    #[test]
    fn test_malformed_revision_lines_are_skipped() {
        let parser = parser_for(StaticDiffProvider::new());

        let log = "r5 | alice\n\
                   rX | alice | 2020-01-01 10:00:00\n\
                   r5 / alice / 2020-01-01 10:00:00\n\
                   r5 | alice | 2020-1-1 10:00:00\n";
        let sink = run(&parser, log);
        assert!(sink.records.is_empty());
    }

    /// Provider wrapper counting retrieval calls
    struct CountingProvider<P: DiffProvider> {
        inner: P,
        calls: Cell<usize>,
    }

    impl<P: DiffProvider> DiffProvider for CountingProvider<P> {
        fn fetch_diff(
            &self,
            path: &str,
            from: u64,
            to: u64,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.fetch_diff(path, from, to)
        }
    }

    /// **What is tested:** Diff retrieval for revisions whose author is ignored
    /// **Why it is tested:** Author filtering suppresses emission only; the retrieval and classification work still happens per file change
    /// **Test conditions:** A single ignored-author revision with one file change
    /// **Expectations:** The provider is called once even though no record is emitted
    #[test]
    fn test_ignored_author_still_fetches_diffs() {
        let provider = CountingProvider {
            inner: StaticDiffProvider::new().with_diff("/trunk/foo.txt", 4, 5, BALANCED_DIFF),
            calls: Cell::new(0),
        };
        let parser = LogStreamParser::new(provider).with_ignored_authors(["build".to_owned()]);

        let log = "r5 | build | 2020-01-01 10:00:00 +0000\n   M /trunk/foo.txt\n";
        let mut sink = RecordingSink::new();
        parser.process_log(Cursor::new(log), &mut sink).unwrap();

        assert!(sink.records.is_empty());
        assert_eq!(parser.provider.calls.get(), 1);
    }

    /// **What is tested:** Revision numbering at the lower bound
    /// **Why it is tested:** Revision 0 cannot request revision -1; the retrieval span saturates at zero
    /// **Test conditions:** Counting provider recording the requested revision span for r0
    /// **Expectations:** The provider is asked for the (0, 0) span
    #[test]
    fn test_revision_zero_saturates_span() {
        let provider = CountingProvider {
            inner: StaticDiffProvider::new().with_diff("/trunk/foo.txt", 0, 0, ADDITION_DIFF),
            calls: Cell::new(0),
        };
        let parser = LogStreamParser::new(provider);

        let log = "r0 | alice | 2020-01-01 10:00:00 +0000\n   A /trunk/foo.txt\n";
        let mut sink = RecordingSink::new();
        parser.process_log(Cursor::new(log), &mut sink).unwrap();

        assert_eq!(parser.provider.calls.get(), 1);
        assert_eq!(sink.records[0].lines.added, 3);
    }
}
