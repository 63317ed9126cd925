use std::io::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// Where the `Reporter`'s output actually goes. `Stdio` is used in the real
/// binary; `Capture` lets end-to-end tests assert on output without
/// spawning a subprocess or racing against the real process stdout.
enum Sink {
    Stdio,
    Capture { out: Mutex<Vec<u8>>, err: Mutex<Vec<u8>> },
}

/// Line-oriented output sink shared by every worker.
///
/// Each emission is a single `write_all` of a complete line, so individual
/// lines never interleave mid-write, but there is no ordering guarantee
/// *across* lines from different workers (`spec.md` §5).
pub struct Reporter {
    sink: Sink,
    match_count: AtomicU64,
    error_flag: AtomicBool,
}

impl Reporter {
    /// Build a reporter that writes to the real process stdout/stderr.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sink: Sink::Stdio,
            match_count: AtomicU64::new(0),
            error_flag: AtomicBool::new(false),
        }
    }

    /// Build a reporter that captures output in memory, for tests.
    #[must_use]
    pub fn new_capturing() -> Self {
        Self {
            sink: Sink::Capture {
                out: Mutex::new(Vec::new()),
                err: Mutex::new(Vec::new()),
            },
            match_count: AtomicU64::new(0),
            error_flag: AtomicBool::new(false),
        }
    }

    /// Record a matched file and print it on its own stdout line.
    pub fn emit_match(&self, path: &[u8]) {
        self.match_count.fetch_add(1, Ordering::Relaxed);
        self.write_stdout(path);
    }

    /// A directory could not be listed because access was denied.
    /// Per `spec.md` §6 this goes to *stdout*, not stderr, preserved from
    /// the original program's user-visible behaviour.
    pub fn permission_denied(&self, dir_path: &[u8]) {
        self.error_flag.store(true, Ordering::Relaxed);
        let mut line = Vec::with_capacity(dir_path.len() + 32);
        line.extend_from_slice(b"Directory ");
        line.extend_from_slice(dir_path);
        line.extend_from_slice(b": Permission denied.");
        self.write_stdout(&line);
    }

    /// A non-fatal I/O error (failed `stat`/`opendir`/allocation). Goes to
    /// stderr, `strerror`-style, one per line.
    pub fn io_error(&self, message: &str) {
        self.error_flag.store(true, Ordering::Relaxed);
        self.write_stderr(message.as_bytes());
    }

    /// Print the closing summary line. Called once, after all workers join.
    pub fn print_summary(&self) {
        let line = format!(
            "Done searching, found {} files",
            self.match_count.load(Ordering::Relaxed)
        );
        self.write_stdout(line.as_bytes());
    }

    #[must_use]
    pub fn match_count(&self) -> u64 {
        self.match_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn had_error(&self) -> bool {
        self.error_flag.load(Ordering::Relaxed)
    }

    /// Test-only accessor for whatever has been written to the captured
    /// stdout sink so far.
    #[cfg(test)]
    #[must_use]
    pub fn captured_stdout(&self) -> String {
        match &self.sink {
            Sink::Stdio => String::new(),
            Sink::Capture { out, .. } => String::from_utf8_lossy(&out.lock().unwrap()).into_owned(),
        }
    }

    fn write_stdout(&self, line: &[u8]) {
        match &self.sink {
            Sink::Stdio => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                let _ = handle.write_all(line);
                let _ = handle.write_all(b"\n");
            }
            Sink::Capture { out, .. } => {
                let mut buf = out.lock().unwrap();
                buf.extend_from_slice(line);
                buf.push(b'\n');
            }
        }
    }

    fn write_stderr(&self, line: &[u8]) {
        match &self.sink {
            Sink::Stdio => {
                let stderr = std::io::stderr();
                let mut handle = stderr.lock();
                let _ = handle.write_all(line);
                let _ = handle.write_all(b"\n");
            }
            Sink::Capture { err, .. } => {
                let mut buf = err.lock().unwrap();
                buf.extend_from_slice(line);
                buf.push(b'\n');
            }
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_match_increments_counter_and_writes_line() {
        let reporter = Reporter::new_capturing();
        reporter.emit_match(b"/tmp/foo_bar");
        assert_eq!(reporter.match_count(), 1);
        assert!(!reporter.had_error());
        assert_eq!(reporter.captured_stdout(), "/tmp/foo_bar\n");
    }

    #[test]
    fn permission_denied_sets_error_flag_and_uses_stdout() {
        let reporter = Reporter::new_capturing();
        reporter.permission_denied(b"/tmp/no_read");
        assert!(reporter.had_error());
        assert_eq!(
            reporter.captured_stdout(),
            "Directory /tmp/no_read: Permission denied.\n"
        );
    }

    #[test]
    fn summary_reports_running_match_count() {
        let reporter = Reporter::new_capturing();
        reporter.emit_match(b"a");
        reporter.emit_match(b"b");
        reporter.print_summary();
        assert_eq!(
            reporter.captured_stdout(),
            "a\nb\nDone searching, found 2 files\n"
        );
    }
}
