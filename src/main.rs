use clap::Parser as _;
use pfind::{SearchContext, StartupBarrier};
use std::sync::Arc;

mod cli;
use cli::Args;

fn main() {
    // `Args::parse()` exits with clap's own status 2 on a usage error; a
    // missing/extra positional argument is an argument validation failure
    // per `spec.md` §7, which must exit 1 like every other fatal start-up
    // error, so the error is handled here instead of left to clap's default.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    if !args.root().exists() {
        eprintln!(
            "Error: {} does not exist",
            args.root().to_string_lossy()
        );
        std::process::exit(1);
    }

    let thread_count = match args.thread_count() {
        Ok(count) => count,
        Err(pfind::CliError::InvalidThreadCount(value)) => {
            eprintln!("Error: invalid number of threads: {value}");
            std::process::exit(1);
        }
    };

    let context = Arc::new(SearchContext::new(args.search_term(), thread_count));
    context.queue.push(args.root().to_path_buf());

    let barrier = Arc::new(StartupBarrier::new());
    let handles = pfind::worker::spawn_pool(&context, &barrier);
    barrier.release_all();

    for handle in handles {
        // a worker panicking is a logic-invariant violation (spec.md §7);
        // propagate it rather than silently losing the failure.
        handle.join().expect("worker thread panicked");
    }

    context.reporter.print_summary();

    std::process::exit(i32::from(context.reporter.had_error()));
}
