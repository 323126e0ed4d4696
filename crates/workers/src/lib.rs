//! A worker abstraction to create thread pools.

use std::sync::Arc;
use std::thread::JoinHandle;

#[path = "parking_lot.rs"]
mod imp;

/// The type used to represent the priority of a task.
///
/// Tasks with a higher priority are executed first.
pub type Priority = i32;

/// Describes the state of a worker.
///
/// This trait can be implemented by the user to provide custom worker implementations.
pub trait Worker {
    /// The input type of the worker.
    type Input;
    /// The output type of the worker.
    type Output;

    /// Runs the worker with the provided input.
    fn run(&mut self, input: Self::Input) -> Self::Output;
}

/// A handle to a collection of worker threads.
///
/// Dropping the handle stops the workers once they are done with their current task and waits
/// for them to exit. Tasks still in the queue at that point are discarded.
pub struct TaskPool<I, O> {
    /// The state shared with the worker threads.
    inner: Arc<imp::TaskPool<I, O>>,
    /// The worker threads.
    threads: Vec<JoinHandle<()>>,
}

impl<I, O> TaskPool<I, O> {
    /// Submits a new task to the task pool.
    #[inline]
    pub fn submit(&self, input: I, priority: Priority) {
        self.inner.submit(input, priority);
    }

    /// Submits a batch of tasks to the task pool.
    #[inline]
    pub fn submit_batch(&self, iter: impl IntoIterator<Item = (I, Priority)>) {
        self.inner.submit_batch(iter);
    }

    /// Returns the tasks that have been received from workers.
    ///
    /// # Remarks
    ///
    /// The returned iterator may hold a lock to an internal queue, so you better don't hold on to
    /// it for too long.
    #[inline]
    pub fn fetch_results(&self) -> impl Iterator<Item = O> + '_ {
        self.inner.fetch_results()
    }

    /// Blocks until every submitted task has been executed.
    ///
    /// A task whose worker panicked counts as executed, but produces no result.
    #[inline]
    pub fn wait_idle(&self) {
        self.inner.wait_idle();
    }

    /// Returns the number of tasks that are currently in the queue.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.inner.task_count()
    }

    /// Returns the number of worker threads.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.threads.len()
    }
}

impl<I, O> Drop for TaskPool<I, O> {
    fn drop(&mut self) {
        self.inner.stop();
        for thread in self.threads.drain(..) {
            if thread.join().is_err() {
                log::error!("a worker thread panicked");
            }
        }
    }
}

/// Starts a collection of worker threads and returns a handle to the task pool.
pub fn start<W, I>(workers: I) -> TaskPool<W::Input, W::Output>
where
    I: IntoIterator<Item = W>,
    W: 'static + Send + Worker,
    W::Input: Send,
    W::Output: Send,
{
    let pool = Arc::new(imp::TaskPool::default());

    let threads = workers
        .into_iter()
        .enumerate()
        .map(|(index, worker)| imp::spawn_worker(pool.clone(), worker, index))
        .collect();

    TaskPool {
        inner: pool,
        threads,
    }
}
