//! svn-log-stats library
//!
//! Streaming per-revision commit statistics from Subversion log output.
//!
//! The parser consumes a `svn log -v`-style stream line by line, counts file
//! changes per revision, retrieves each changed file's diff through a
//! pluggable [`DiffProvider`], classifies the diff hunks into
//! added/deleted/modified line counts, and emits one record per revision to
//! a [`Sink`].
//!
//! # Examples
//!
//! Basic usage with a canned diff backend:
//!
//! ```rust
//! use std::io::Cursor;
//! use svn_log_stats::{CsvSink, LogStreamParser, StaticDiffProvider};
//!
//! let provider = StaticDiffProvider::new().with_diff(
//!     "/trunk/foo.txt",
//!     4,
//!     5,
//!     "--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n-old1\n-old2\n+new1\n+new2\n",
//! );
//! let parser = LogStreamParser::new(provider);
//!
//! let log = "r5 | alice | 2020-01-01 10:00:00 +0000 (Wed, 01 Jan 2020) | 1 line\n\
//!            Changed paths:\n   \
//!            M /trunk/foo.txt\n";
//!
//! let mut sink = CsvSink::new(Vec::new());
//! sink.write_header()?;
//! parser.process_log(Cursor::new(log), &mut sink)?;
//!
//! let output = String::from_utf8(sink.into_inner()).unwrap();
//! assert!(output.ends_with("5,alice,2020-01-01 10:00:00,1,0,0,2,0,0\n"));
//! # Ok::<(), svn_log_stats::Error>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod parser;
pub mod path_filter;
pub mod provider;
pub mod record;
pub mod sink;

pub use classify::classify;
pub use config::{AppConfig, CliArgs, ConfigError};
pub use error::{Error, Result};
pub use parser::LogStreamParser;
pub use path_filter::PathFilter;
pub use provider::{DiffProvider, ProviderError, StaticDiffProvider, SvnDiffProvider};
pub use record::{ChangeCounts, ChangeKind, RevisionAggregator, RevisionRecord};
pub use sink::{CsvSink, Sink};
