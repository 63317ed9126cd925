//! Core of `pfind`: a parallel, quiescence-terminated filesystem substring
//! search. See the crate's binary (`src/main.rs`) for the CLI entry point.
//!
//! The interesting engineering lives in [`queue::PathQueue`]: a FIFO work
//! queue with a strict wake-order discipline (the longest-sleeping worker
//! is always woken first), push/pop hand-off semantics, and a quiescence
//! detector that shuts the whole pool down exactly when every worker is
//! simultaneously idle on an empty queue.

pub mod barrier;
pub mod context;
pub mod enumerator;
pub mod error;
pub mod queue;
pub mod reporter;
pub mod worker;

pub use barrier::StartupBarrier;
pub use context::SearchContext;
pub use error::CliError;
pub use queue::PathQueue;
pub use reporter::Reporter;

// mimalloc measurably outperforms the system allocator for the
// allocation-heavy path-string churn this workload produces; carried
// forward from the teacher crate's own choice.
#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
