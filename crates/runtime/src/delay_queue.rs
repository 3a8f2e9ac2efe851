use foundation::time::Time;

/// Deterministic deferred-task queue.
///
/// Key properties:
/// - Total ordering on `(due, id)`: tasks due at the same instant run in
///   scheduling order.
/// - Cancellation does not perturb the order of remaining tasks.
/// - Draining is explicit (`drain_due`), so the host decides when "now" is.
///
/// This is intentionally simple (Vec-backed) because the queue holds at
/// most a handful of pending detaches at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    due: Time,
    payload: T,
    canceled: bool,
}

#[derive(Debug)]
pub struct DelayQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending (non-canceled) tasks.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.canceled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            due,
            payload,
            canceled: false,
        });
        id
    }

    /// Cancels a pending task.
    ///
    /// Returns `true` if the task was still pending and was canceled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if !entry.canceled => {
                entry.canceled = true;
                true
            }
            _ => false,
        }
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<Time> {
        self.entries
            .iter()
            .filter(|e| !e.canceled)
            .map(|e| e.due)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Removes and returns every task due at or before `now`, ordered by
    /// `(due, id)`. Canceled tasks are dropped silently.
    pub fn drain_due(&mut self, now: Time) -> Vec<T> {
        let mut due: Vec<Entry<T>> = Vec::new();
        let mut rest: Vec<Entry<T>> = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.canceled {
                continue;
            }
            if entry.due <= now {
                due.push(entry);
            } else {
                rest.push(entry);
            }
        }
        self.entries = rest;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then_with(|| a.id.cmp(&b.id)));
        due.into_iter().map(|e| e.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DelayQueue;
    use foundation::time::Time;

    #[test]
    fn drains_only_due_tasks() {
        let mut q = DelayQueue::new();
        q.schedule(Time(1.0), "a");
        q.schedule(Time(3.0), "b");

        assert_eq!(q.drain_due(Time(2.0)), vec!["a"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(Time(3.0)), vec!["b"]);
        assert!(q.is_empty());
    }

    #[test]
    fn drains_in_due_then_schedule_order() {
        let mut q = DelayQueue::new();
        q.schedule(Time(2.0), "late");
        q.schedule(Time(1.0), "early");
        q.schedule(Time(2.0), "late2");

        assert_eq!(q.drain_due(Time(5.0)), vec!["early", "late", "late2"]);
    }

    #[test]
    fn canceled_tasks_never_drain() {
        let mut q = DelayQueue::new();
        let a = q.schedule(Time(1.0), "a");
        q.schedule(Time(1.0), "b");

        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(Time(1.0)), vec!["b"]);
    }

    #[test]
    fn next_due_ignores_canceled() {
        let mut q = DelayQueue::new();
        let a = q.schedule(Time(1.0), "a");
        q.schedule(Time(2.0), "b");

        assert_eq!(q.next_due(), Some(Time(1.0)));
        q.cancel(a);
        assert_eq!(q.next_due(), Some(Time(2.0)));
    }

    #[test]
    fn equal_instants_keep_schedule_order() {
        let mut q = DelayQueue::new();
        q.schedule(Time(1.0), 1);
        q.schedule(Time(1.0), 2);
        q.schedule(Time(1.0), 3);
        assert_eq!(q.drain_due(Time(1.0)), vec![1, 2, 3]);
    }
}
