use parking_lot::{Condvar, Mutex};
use std::collections::BinaryHeap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::{Priority, Worker};

/// A task with a payload.
struct Task<T> {
    priority: Priority,
    payload: T,
}

impl<T> PartialEq for Task<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<T> Eq for Task<T> {}

impl<T> PartialOrd for Task<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Task<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority.cmp(&other.priority)
    }
}

/// A pool of tasks that can be executed by multiple threads.
pub struct TaskPool<I, O> {
    /// The list of tasks that have been pushed to the list, but not have been taken by a worker
    /// just yet.
    tasks: Mutex<BinaryHeap<Task<I>>>,
    /// A condition variable that's notified whenever a new task is pushed to the list.
    ///
    /// Also when the thread pool is stopped, this condition variable is notified to wake up all
    /// worker threads.
    condvar: Condvar,

    /// The list of output values that have been produced by the workers.
    results: Mutex<Vec<O>>,
    /// The number of tasks that were submitted but did not complete yet.
    in_flight: Mutex<usize>,
    /// Notified whenever `in_flight` reaches zero.
    idle: Condvar,

    /// Whether the worker threads should stop.
    should_stop: AtomicBool,
}

impl<I, O> Default for TaskPool<I, O> {
    #[inline]
    fn default() -> Self {
        Self {
            tasks: Mutex::new(BinaryHeap::new()),
            condvar: Condvar::new(),
            results: Mutex::new(Vec::new()),
            in_flight: Mutex::new(0),
            idle: Condvar::new(),
            should_stop: AtomicBool::new(false),
        }
    }
}

impl<I, O> TaskPool<I, O> {
    /// Determines whether a worker thread should stop.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.should_stop.load(Relaxed)
    }

    /// Requests every worker thread to stop.
    pub fn stop(&self) {
        // Taking the lock ensures no worker is between its check and its wait.
        let _lock = self.tasks.lock();
        self.should_stop.store(true, Relaxed);
        self.condvar.notify_all();
    }

    /// Returns the total number of tasks currently in the pool.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Fetches a task to execute.
    ///
    /// If no task is available, the function blocks until a new task is pushed to the list.
    ///
    /// If the thread must stop, `None` is returned.
    pub fn fetch_task(&self) -> Option<I> {
        let mut lock = self.tasks.lock();
        loop {
            if self.should_stop() {
                return None;
            }

            match lock.pop() {
                Some(task) => return Some(task.payload),
                None => self.condvar.wait(&mut lock),
            }
        }
    }

    /// Submits a new task to be executed.
    pub fn submit(&self, payload: I, priority: Priority) {
        *self.in_flight.lock() += 1;
        let mut lock = self.tasks.lock();
        lock.push(Task { payload, priority });
        self.condvar.notify_one();
    }

    /// Submits a batch of tasks to be executed.
    pub fn submit_batch(&self, iter: impl IntoIterator<Item = (I, Priority)>) {
        let mut lock = self.tasks.lock();
        let before = lock.len();
        lock.extend(
            iter.into_iter()
                .map(|(payload, priority)| Task { payload, priority }),
        );
        *self.in_flight.lock() += lock.len() - before;
        self.condvar.notify_all();
    }

    /// Adds a result to the list of results.
    pub fn push_result(&self, output: O) {
        self.results.lock().push(output);
    }

    /// Marks one task as completed.
    fn complete_task(&self) {
        let mut in_flight = self.in_flight.lock();
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            self.idle.notify_all();
        }
    }

    /// Blocks until no task is in flight anymore.
    pub fn wait_idle(&self) {
        let mut in_flight = self.in_flight.lock();
        while *in_flight != 0 {
            self.idle.wait(&mut in_flight);
        }
    }

    /// Returns an iterator over the results that were received by the [`TaskPool`].
    pub fn fetch_results(&self) -> Results<'_, O> {
        Results(self.results.lock())
    }
}

/// An iterator over the results that were received by a [`TaskPool`].
pub struct Results<'a, T>(parking_lot::MutexGuard<'a, Vec<T>>);

impl<'a, T> Iterator for Results<'a, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<'a, T> ExactSizeIterator for Results<'a, T> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Marks a task as completed when dropped.
struct CompletionGuard<'a, I, O>(&'a TaskPool<I, O>);

impl<'a, I, O> Drop for CompletionGuard<'a, I, O> {
    #[inline]
    fn drop(&mut self) {
        self.0.complete_task();
    }
}

/// Spawns a new worker thread.
pub fn spawn_worker<W>(
    pool: Arc<TaskPool<W::Input, W::Output>>,
    mut worker: W,
    index: usize,
) -> JoinHandle<()>
where
    W: 'static + Send + Worker,
    W::Output: Send,
    W::Input: Send,
{
    std::thread::spawn(move || {
        log::trace!("worker #{index} started");
        while let Some(task) = pool.fetch_task() {
            let _guard = CompletionGuard(&*pool);
            match std::panic::catch_unwind(AssertUnwindSafe(|| worker.run(task))) {
                Ok(output) => pool.push_result(output),
                Err(_) => log::error!("worker #{index} panicked, its task is dropped"),
            }
        }
        log::trace!("worker #{index} stopped");
    })
}
