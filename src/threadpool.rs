use crate::errors::{Error, Result};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Fixed-size pool of request workers, joining all threads on drop.
///
/// Jobs are pulled from a shared channel, so a slow request only holds up its
/// own worker.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
}

impl ThreadPool {
    /// Create a new ThreadPool with `size` threads.
    ///
    /// 'size' must be greater than 0.
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0, "ThreadPool size must be greater than 0");

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::new(id, Arc::clone(&receiver)))
            .collect();

        ThreadPool {
            workers,
            sender: Some(sender),
        }
    }

    /// Queue a task to run on the threadpool when a worker is available.
    ///
    /// Fails only if every worker is gone.
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or(Error::PoolClosed)?;
        sender
            .send(Box::new(f))
            .map_err(|_| Error::PoolClosed)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for worker in &mut self.workers {
            if let Some(thread) = worker.handle.take() {
                if thread.join().is_err() {
                    tracing::error!(worker = worker.id, "worker panicked");
                }
            }
        }
    }
}

/// Type of jobs to be executed by the threadpool.
type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawn a thread executing jobs from the receiver until the channel is closed.
    fn new(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Job>>>) -> Worker {
        let handle = thread::Builder::new()
            .name(format!("http-worker-{}", id))
            .spawn(move || loop {
                // A poisoned lock means another worker panicked while waiting;
                // the receiver itself is still usable.
                let message = match receiver.lock() {
                    Ok(guard) => guard.recv(),
                    Err(poisoned) => poisoned.into_inner().recv(),
                };
                match message {
                    Ok(job) => job(),
                    Err(_) => {
                        tracing::debug!(worker = id, "channel closed, worker exiting");
                        break;
                    }
                }
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::error!(worker = id, %err, "failed to spawn worker");
                None
            }
        };
        Worker { id, handle }
    }
}
