//! Bounded task scheduler.
//!
//! Admits fetch/encode/persist tasks up to a fixed concurrency ceiling and
//! joins them on drain. The capacity counter (a semaphore owned by the
//! scheduler, nothing ambient) is the only mutable state shared between
//! tasks.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Capacity slot held by an admitted task. Dropping it releases the slot,
/// so a task frees capacity however it ends.
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

/// Runs at most `capacity` tasks at once. `admit` blocks the producer when
/// the ceiling is reached (FIFO); `drain` is the completion barrier: it
/// resolves only when every admitted task has finished and released its
/// slot. Completion order across tasks is unspecified.
pub struct BoundedScheduler<T> {
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<T>,
    capacity: usize,
}

impl<T: Send + 'static> BoundedScheduler<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            tasks: JoinSet::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free; back at `capacity` after a full drain.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits until a capacity slot is free and claims it. Move the returned
    /// [`Slot`] into the task passed to [`spawn`](Self::spawn); the slot is
    /// released when the task drops it.
    pub async fn admit(&self) -> Slot {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("scheduler semaphore closed"); // never closed: we own it
        Slot { _permit: permit }
    }

    /// Spawns an admitted task onto the runtime.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Waits until every admitted task has completed, returning their
    /// outputs in completion order. A task that panicked is logged and
    /// omitted from the results; it still releases its slot.
    pub async fn drain(&mut self) -> Vec<T> {
        let mut results = Vec::new();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(value) => results.push(value),
                Err(err) => tracing::error!("scheduled task failed to join: {}", err),
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Tracks how many tasks are inside the guarded section and the highest
    /// count ever observed.
    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlight {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn exit(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn in_flight_never_exceeds_capacity() {
        // Deterministic spread of (tasks, capacity) pairs, including ones
        // where tasks outnumber capacity many times over.
        for (tasks, capacity) in [(5, 1), (10, 2), (25, 3), (40, 7), (8, 16)] {
            let gauge = Arc::new(InFlight::default());
            let mut scheduler = BoundedScheduler::new(capacity);

            for i in 0..tasks {
                let slot = scheduler.admit().await;
                let gauge = Arc::clone(&gauge);
                scheduler.spawn(async move {
                    let _slot = slot;
                    gauge.enter();
                    tokio::time::sleep(Duration::from_millis(1 + (i % 4) as u64)).await;
                    gauge.exit();
                    i
                });
            }

            let results = scheduler.drain().await;
            assert_eq!(results.len(), tasks);
            assert!(
                gauge.peak.load(Ordering::SeqCst) <= capacity,
                "peak {} exceeded capacity {}",
                gauge.peak.load(Ordering::SeqCst),
                capacity
            );
        }
    }

    #[tokio::test]
    async fn drain_restores_full_capacity() {
        let mut scheduler: BoundedScheduler<()> = BoundedScheduler::new(4);
        for _ in 0..9 {
            let slot = scheduler.admit().await;
            scheduler.spawn(async move {
                let _slot = slot;
                tokio::time::sleep(Duration::from_millis(2)).await;
            });
        }
        scheduler.drain().await;
        assert_eq!(scheduler.available(), scheduler.capacity());
    }

    #[tokio::test]
    async fn admit_blocks_while_at_capacity() {
        let mut scheduler: BoundedScheduler<()> = BoundedScheduler::new(1);
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let slot = scheduler.admit().await;
        scheduler.spawn(async move {
            let _slot = slot;
            let _ = release_rx.await;
        });

        // The single slot is held, so a second admission must time out.
        assert!(
            tokio::time::timeout(Duration::from_millis(50), scheduler.admit())
                .await
                .is_err()
        );

        release_tx.send(()).expect("task alive");
        let _slot = tokio::time::timeout(Duration::from_secs(1), scheduler.admit())
            .await
            .expect("slot freed after task completed");
        scheduler.drain().await;
    }

    #[tokio::test]
    async fn capacity_one_runs_tasks_strictly_serially() {
        let overlaps = Arc::new(AtomicUsize::new(0));
        let busy = Arc::new(AtomicUsize::new(0));
        let mut scheduler = BoundedScheduler::new(1);

        for _ in 0..12 {
            let slot = scheduler.admit().await;
            let overlaps = Arc::clone(&overlaps);
            let busy = Arc::clone(&busy);
            scheduler.spawn(async move {
                let _slot = slot;
                if busy.swap(1, Ordering::SeqCst) != 0 {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
                busy.store(0, Ordering::SeqCst);
            });
        }

        scheduler.drain().await;
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }
}
