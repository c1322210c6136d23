use std::future::Future;
use std::time::{Duration, Instant};

/// Await `work` and return its output together with the wall-clock time it took.
pub async fn timed<F>(work: F) -> (F::Output, Duration)
where
    F: Future,
{
    let start = Instant::now();
    let output = work.await;
    (output, start.elapsed())
}
