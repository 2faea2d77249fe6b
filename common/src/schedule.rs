use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashSet},
};

// ============================================================================
// Discrete-Event Scheduler
// ============================================================================

pub type Tick = u64;

// Handle returned for every registration; stopping it drops the entry (and, for repeating
// entries, all of its future occurrences).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stopper(u64);

struct Entry<E> {
    time: Tick,
    ordering: i32,
    seq: u64,
    id: u64,
    period: Option<Tick>,
    event: E,
}

impl<E> Entry<E> {
    const fn key(&self) -> (Tick, i32, u64) {
        (self.time, self.ordering, self.seq)
    }
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

// Tick-based event queue. Within a tick, entries run by ascending `ordering`, then in the order
// they were scheduled. Entries scheduled for the current tick while it is being drained still run
// in this tick as long as their ordering has not been passed yet.
pub struct Scheduler<E> {
    now: Tick,
    next_seq: u64,
    next_id: u64,
    queue: BinaryHeap<Reverse<Entry<E>>>,
    stopped: HashSet<u64>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            next_id: 0,
            queue: BinaryHeap::new(),
            stopped: HashSet::new(),
        }
    }
}

impl<E: Clone> Scheduler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn now(&self) -> Tick {
        self.now
    }

    // Number of live entries (stopped entries that have not been dropped yet are excluded).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.iter().filter(|Reverse(entry)| !self.stopped.contains(&entry.id)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    pub fn schedule_once(&mut self, event: E, delay: Tick, ordering: i32) -> Stopper {
        self.push(event, self.now + delay, ordering, None)
    }

    pub fn schedule_repeating(&mut self, event: E, start_delay: Tick, period: Tick, ordering: i32) -> Stopper {
        assert!(period > 0, "repeating entries need a positive period");
        self.push(event, self.now + start_delay, ordering, Some(period))
    }

    // Entries that already fired (or were cleared) are not tracked, so stale handles are a no-op.
    pub fn stop(&mut self, stopper: Stopper) {
        if self.queue.iter().any(|Reverse(entry)| entry.id == stopper.0) {
            self.stopped.insert(stopper.0);
        }
    }

    // Drop every pending entry, repeating registrations included.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.stopped.clear();
    }

    // Next entry due at or before the current tick. Repeating entries are re-queued before they are
    // handed out, so a `clear()` issued by the handler removes them as well.
    pub fn pop_due(&mut self) -> Option<E> {
        loop {
            let due = self.queue.peek().is_some_and(|Reverse(entry)| entry.time <= self.now);
            if !due {
                return None;
            }
            let Reverse(entry) = self.queue.pop()?;

            // A stopped entry is dropped here and never re-queued, so its id can be forgotten.
            if self.stopped.remove(&entry.id) {
                continue;
            }

            if let Some(period) = entry.period {
                let seq = self.bump_seq();
                self.queue.push(Reverse(Entry {
                    time: entry.time + period,
                    ordering: entry.ordering,
                    seq,
                    id: entry.id,
                    period: Some(period),
                    event: entry.event.clone(),
                }));
            }

            return Some(entry.event);
        }
    }

    // Move on to the next tick.
    pub const fn advance(&mut self) {
        self.now += 1;
    }

    fn push(&mut self, event: E, time: Tick, ordering: i32, period: Option<Tick>) -> Stopper {
        let id = self.next_id;
        self.next_id += 1;
        let seq = self.bump_seq();
        self.queue.push(Reverse(Entry {
            time,
            ordering,
            seq,
            id,
            period,
            event,
        }));
        Stopper(id)
    }

    const fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
