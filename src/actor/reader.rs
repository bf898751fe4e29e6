//! Reader Actor: Dedicated thread that feeds input lines into the queue.
//!
//! The thread blocks in `read_until` on its source and pushes every line
//! it gets, unvalidated, into the [`LineQueue`]. Because pushes never wait,
//! a slow frame loop can never slow the reader down.

use crate::error::{Error, Result};
use crate::queue::LineQueue;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a shutdown checks whether the reader thread has finished.
const JOIN_POLL: Duration = Duration::from_millis(5);

/// How a [`ReaderActor::join`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderExit {
    /// The thread finished and was joined.
    Joined,
    /// The thread was still blocked in a read when the grace period ran
    /// out and has been left to finish on its own.
    Detached,
}

/// Reader actor that moves lines from a blocking source into the queue.
pub struct ReaderActor {
    /// Handle to the reader thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl ReaderActor {
    /// Spawn the reader thread.
    ///
    /// # Arguments
    ///
    /// * `source` - Where lines come from, usually locked stdin.
    /// * `queue` - Where lines go.
    /// * `backoff` - Sleep after a transient read failure before retrying.
    pub fn spawn<R>(source: R, queue: LineQueue, backoff: Duration) -> Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("sensordash-reader".to_string())
            .spawn(move || {
                Self::run_loop(source, &queue, &shutdown_clone, backoff);
            })
            .map_err(Error::ReaderSpawn)?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the reader thread to stop after its current read.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Whether the reader thread has exited (end of stream or shutdown).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the reader and wait up to `grace` for it to finish.
    ///
    /// A read on an idle terminal or pipe cannot be interrupted, so the
    /// wait is bounded. The queue is reference counted, so a detached
    /// thread that wakes up later still pushes into valid memory.
    pub fn join(mut self, grace: Duration) -> ReaderExit {
        self.shutdown();
        let Some(handle) = self.handle.take() else {
            return ReaderExit::Joined;
        };

        let deadline = Instant::now() + grace;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                log::warn!("reader still blocked in a read after {grace:?}, detaching");
                return ReaderExit::Detached;
            }
            thread::sleep(JOIN_POLL);
        }
        if handle.join().is_err() {
            log::warn!("reader thread panicked");
        }
        ReaderExit::Joined
    }

    /// Main read loop.
    fn run_loop<R: BufRead>(mut source: R, queue: &LineQueue, shutdown: &AtomicBool, backoff: Duration) {
        log::info!("reader started");
        let mut buf = Vec::with_capacity(512);
        let mut lines = 0u64;
        let mut failing = false;

        while !shutdown.load(Ordering::Acquire) {
            // A read interrupted mid-line leaves its bytes in `buf`; the
            // retry appends the rest
            match source.read_until(b'\n', &mut buf) {
                Ok(0) if buf.is_empty() => {
                    log::info!("input stream ended after {lines} lines");
                    return;
                }
                Ok(_) => {
                    queue.push(String::from_utf8_lossy(&buf).into_owned());
                    buf.clear();
                    lines += 1;
                    failing = false;
                }
                Err(e) if is_transient(&e) => thread::sleep(backoff),
                Err(e) => {
                    if failing {
                        log::debug!("input read failed again: {e}");
                    } else {
                        log::warn!("input read failed: {e}");
                        failing = true;
                    }
                    thread::sleep(backoff);
                }
            }
        }
        log::info!("reader stopped after {lines} lines");
    }
}

/// "Nothing available right now" rather than a real failure.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

impl Drop for ReaderActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    /// Blocks in `read` until told otherwise, like an idle stdin.
    struct Stalled(Arc<AtomicBool>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            while !self.0.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
            }
            Ok(0)
        }
    }

    /// Fails with `WouldBlock` a few times before delivering data.
    struct Flaky {
        failures: usize,
        data: Cursor<Vec<u8>>,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::ErrorKind::WouldBlock.into());
            }
            self.data.read(buf)
        }
    }

    /// Delivers one line split around a transient failure.
    struct Interrupted {
        reads: std::collections::VecDeque<io::Result<&'static [u8]>>,
    }

    impl Read for Interrupted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                Some(Err(e)) => Err(e),
                None => Ok(0),
            }
        }
    }

    /// Fails permanently, like a closed descriptor.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !done() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_reader_pushes_lines_verbatim() {
        let queue = LineQueue::new(16);
        let source = Cursor::new(b"{\"id\":\"a\"}\nnot json\nlast".to_vec());
        let reader = ReaderActor::spawn(source, queue.clone(), Duration::from_millis(1)).unwrap();

        wait_until(|| reader.is_finished());
        assert_eq!(reader.join(Duration::from_millis(100)), ReaderExit::Joined);

        let lines: Vec<String> = queue.drain().collect();
        assert_eq!(lines, ["{\"id\":\"a\"}\n", "not json\n", "last"]);
    }

    #[test]
    fn test_reader_retries_transient_errors() {
        let queue = LineQueue::new(16);
        let source = io::BufReader::new(Flaky {
            failures: 3,
            data: Cursor::new(b"hello\n".to_vec()),
        });
        let reader = ReaderActor::spawn(source, queue.clone(), Duration::from_millis(1)).unwrap();

        wait_until(|| reader.is_finished());
        reader.join(Duration::from_millis(100));
        assert_eq!(queue.try_pop().as_deref(), Some("hello\n"));
    }

    #[test]
    fn test_reader_join_detaches_blocked_read() {
        let release = Arc::new(AtomicBool::new(false));
        let queue = LineQueue::new(4);
        let source = io::BufReader::new(Stalled(release.clone()));
        let reader = ReaderActor::spawn(source, queue, Duration::from_millis(1)).unwrap();

        assert_eq!(reader.join(Duration::from_millis(20)), ReaderExit::Detached);
        release.store(true, Ordering::Release);
    }

    #[test]
    fn test_reader_invalid_utf8_is_lossy() {
        let queue = LineQueue::new(4);
        let source = Cursor::new(vec![b'a', 0xFF, b'\n']);
        let reader = ReaderActor::spawn(source, queue.clone(), Duration::from_millis(1)).unwrap();

        wait_until(|| reader.is_finished());
        reader.join(Duration::from_millis(100));
        assert_eq!(queue.try_pop().as_deref(), Some("a\u{FFFD}\n"));
    }

    #[test]
    fn test_reader_keeps_partial_line_across_would_block() {
        let queue = LineQueue::new(4);
        let source = io::BufReader::new(Interrupted {
            reads: [
                Ok(&b"hel"[..]),
                Err(io::ErrorKind::WouldBlock.into()),
                Ok(&b"lo\n"[..]),
            ]
            .into(),
        });
        let reader = ReaderActor::spawn(source, queue.clone(), Duration::from_millis(1)).unwrap();

        wait_until(|| reader.is_finished());
        reader.join(Duration::from_millis(100));
        let lines: Vec<String> = queue.drain().collect();
        assert_eq!(lines, ["hello\n"]);
    }

    #[test]
    fn test_reader_stops_on_request_while_input_flows() {
        let queue = LineQueue::new(16);
        let source = io::BufReader::new(io::repeat(b'\n'));
        let reader = ReaderActor::spawn(source, queue.clone(), Duration::from_millis(1)).unwrap();

        wait_until(|| queue.pushed() > 100);
        assert!(!reader.is_finished());
        assert_eq!(reader.join(Duration::from_millis(500)), ReaderExit::Joined);

        let pushed = queue.pushed();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(queue.pushed(), pushed);
    }

    #[test]
    fn test_reader_survives_persistent_errors_until_stopped() {
        let queue = LineQueue::new(4);
        let reader = ReaderActor::spawn(io::BufReader::new(Broken), queue.clone(), Duration::from_millis(1)).unwrap();

        thread::sleep(Duration::from_millis(20));
        assert!(!reader.is_finished());
        assert_eq!(reader.join(Duration::from_millis(100)), ReaderExit::Joined);
        assert!(queue.is_empty());
    }
}
