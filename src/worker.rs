use crate::barrier::StartupBarrier;
use crate::context::SearchContext;
use crate::enumerator::{self, Classification, EnumerationResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Spawn exactly `thread_count` workers, releasing them together once every
/// one has parked at the barrier (`spec.md` §4.4), and return their join
/// handles.
pub fn spawn_pool(context: &Arc<SearchContext>, barrier: &Arc<StartupBarrier>) -> Vec<JoinHandle<()>> {
    let thread_count = context.thread_count().get();
    let mut handles = Vec::with_capacity(thread_count);

    for i in 0..thread_count {
        let context = Arc::clone(context);
        let barrier = Arc::clone(barrier);
        handles.push(thread::spawn(move || {
            barrier.register_and_wait();
            worker_loop(&context);
        }));
        barrier.wait_for_one_arrival(i);
    }

    handles
}

/// A single worker's life: pop, classify, enumerate-and-push or
/// match-and-emit, until the queue reports permanent termination
/// (`spec.md` §4.2).
fn worker_loop(context: &SearchContext) {
    while let Some(path) = context.queue.pop() {
        process_path(context, path);
    }
}

fn process_path(context: &SearchContext, path: PathBuf) {
    match enumerator::classify(&path) {
        Ok(Classification::Directory) => process_directory(context, path),
        Ok(Classification::Other) => process_file(context, &path),
        Err(message) => context.reporter.io_error(&message),
    }
}

fn process_directory(context: &SearchContext, path: PathBuf) {
    match enumerator::enumerate(&path) {
        EnumerationResult::Children(children) => {
            for child in children {
                context.queue.push(child);
            }
        }
        EnumerationResult::PermissionDenied => {
            context.reporter.permission_denied(path_bytes(&path));
        }
        EnumerationResult::IoError(message) => context.reporter.io_error(&message),
    }
}

fn process_file(context: &SearchContext, path: &std::path::Path) {
    let Some(leaf) = path.file_name() else {
        return;
    };
    if context.matches(os_str_bytes(leaf)) {
        context.reporter.emit_match(path_bytes(path));
    }
}

#[cfg(unix)]
fn path_bytes(path: &std::path::Path) -> &[u8] {
    std::os::unix::ffi::OsStrExt::as_bytes(path.as_os_str())
}

#[cfg(unix)]
fn os_str_bytes(value: &std::ffi::OsStr) -> &[u8] {
    std::os::unix::ffi::OsStrExt::as_bytes(value)
}
