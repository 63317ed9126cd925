use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::CliError;

/// Search a directory tree in parallel for files whose name contains a
/// substring.
#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory to start searching from
    #[arg(value_name = "ROOT_DIR", index = 1)]
    root: PathBuf,

    /// Substring to search for in file names
    #[arg(value_name = "SEARCH_TERM", index = 2)]
    search_term: String,

    /// Number of worker threads
    #[arg(value_name = "NUM_THREADS", index = 3)]
    num_threads: String,
}

impl Args {
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Parse and validate the thread-count argument. A non-positive or
    /// unparseable value is a fatal start-up error (`spec.md` §7).
    pub fn thread_count(&self) -> Result<NonZeroUsize, CliError> {
        self.num_threads
            .parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| CliError::InvalidThreadCount(self.num_threads.clone()))
    }
}
