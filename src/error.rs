/// Fatal, start-up-time failures. These are printed and cause an immediate
/// `exit(1)` before any worker is spawned; they never cross a worker thread.
#[derive(Debug)]
pub enum CliError {
    /// `<num_threads>` was not a positive integer.
    InvalidThreadCount(String),
}
