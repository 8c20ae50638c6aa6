//! Cooperative timers.
//!
//! There is no timer thread. Feature state owns `TimerSlot`s and emits
//! `TimerCommand`s; the runtime applies them to its `Timers` queue, polls the
//! queue every loop iteration and feeds due ids back as `UiEvent::TimerFired`.
//!
//! A slot holds at most one outstanding timer. Arming a slot cancels the
//! previous timer, and a fired id that no longer matches the slot is stale and
//! must be ignored by the owner.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Default)]
pub struct TimerSeq {
    next: u64,
}

impl TimerSeq {
    pub fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Request from feature state to the runtime's timer queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    /// Fire `id` after `after`, then every `repeat` until cancelled.
    Schedule {
        id: TimerId,
        after: Duration,
        repeat: Option<Duration>,
    },
    /// Drop `id` if it is still queued.
    Cancel { id: TimerId },
}

/// Ownership of (at most) one outstanding timer.
#[derive(Debug, Default)]
pub struct TimerSlot {
    active: Option<TimerId>,
}

impl TimerSlot {
    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Returns true if `id` is this slot's outstanding timer.
    pub fn owns(&self, id: TimerId) -> bool {
        self.active == Some(id)
    }

    /// Arms a new timer, cancelling the outstanding one (if any).
    pub fn arm(
        &mut self,
        seq: &mut TimerSeq,
        after: Duration,
        repeat: Option<Duration>,
    ) -> Vec<TimerCommand> {
        let mut commands: Vec<TimerCommand> = self.release().into_iter().collect();
        let id = seq.next_id();
        self.active = Some(id);
        commands.push(TimerCommand::Schedule { id, after, repeat });
        commands
    }

    /// Releases the outstanding timer, returning the cancel command.
    pub fn release(&mut self) -> Option<TimerCommand> {
        self.active.take().map(|id| TimerCommand::Cancel { id })
    }

    /// Clears the slot when its one-shot timer fires.
    ///
    /// Returns false for stale ids (cancelled or superseded timers).
    pub fn finish_if_active(&mut self, id: TimerId) -> bool {
        let ok = self.owns(id);
        if ok {
            self.active = None;
        }
        ok
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    deadline: Instant,
    repeat: Option<Duration>,
}

/// Timer queue owned by the runtime.
#[derive(Debug, Default)]
pub struct Timers {
    entries: BTreeMap<TimerId, Entry>,
}

impl Timers {
    pub fn apply(&mut self, command: TimerCommand, now: Instant) {
        match command {
            TimerCommand::Schedule { id, after, repeat } => {
                self.entries.insert(
                    id,
                    Entry {
                        deadline: now + after,
                        repeat,
                    },
                );
            }
            TimerCommand::Cancel { id } => {
                self.entries.remove(&id);
            }
        }
    }

    /// Earliest pending deadline, used to bound the runtime's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Removes (or re-arms, for repeating timers) every timer due at `now`.
    ///
    /// Ids are returned in deadline order. A repeating timer that fell behind
    /// fires once and is re-armed one period from `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due = Vec::new();
        self.entries.retain(|id, entry| {
            if entry.deadline > now {
                return true;
            }
            due.push((entry.deadline, *id));
            match entry.repeat {
                Some(period) if !period.is_zero() => {
                    entry.deadline += period;
                    if entry.deadline <= now {
                        entry.deadline = now + period;
                    }
                    true
                }
                _ => false,
            }
        });
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
