use std::sync::{Mutex, MutexGuard, PoisonError};

/// Slots held out of a party's capacity before open joins are counted.
pub const RESERVED_SLOTS: u32 = 2;

/// One attendee of an event. Participants named on the command line carry
/// only a mention string; participants who joined themselves also carry
/// their user id so they can leave again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: Option<i64>,
    pub mention: String,
}

impl Participant {
    pub fn named(mention: impl Into<String>) -> Self {
        Self {
            user_id: None,
            mention: mention.into(),
        }
    }

    pub fn with_id(user_id: i64, mention: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            mention: mention.into(),
        }
    }
}

/// Participant set for one event, shared between the command handlers and
/// the firing job. All access goes through the internal lock; the firing
/// job reads a snapshot at fire time, so joins and leaves made while the
/// timer is pending are reflected in the announcement.
#[derive(Debug)]
pub struct Roster {
    capacity: u32,
    entries: Mutex<Vec<Participant>>,
}

impl Roster {
    /// `capacity` of zero means unlimited.
    pub fn new(capacity: u32, initial: Vec<Participant>) -> Self {
        Self {
            capacity,
            entries: Mutex::new(initial),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Participant>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Open spots, or `None` when the roster is unbounded. The creating
    /// participant occupies one of the reserved slots, so only later joins
    /// count against capacity. The result may go negative for small
    /// capacities.
    pub fn spots_left(&self) -> Option<i64> {
        if self.capacity == 0 {
            return None;
        }
        let joined = self.lock().len().saturating_sub(1) as i64;
        Some(i64::from(self.capacity) - joined - i64::from(RESERVED_SLOTS))
    }

    /// Appends a participant. Fails only when exactly zero spots are left;
    /// an oversubscribed roster (negative spots) keeps accepting.
    pub fn add(&self, participant: Participant) -> bool {
        if self.spots_left() == Some(0) {
            return false;
        }
        self.lock().push(participant);
        true
    }

    /// Removes the first entry matching the user id, returning it.
    pub fn remove(&self, user_id: i64) -> Option<Participant> {
        let mut entries = self.lock();
        let position = entries.iter().position(|p| p.user_id == Some(user_id))?;
        Some(entries.remove(position))
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.lock().iter().any(|p| p.user_id == Some(user_id))
    }

    /// The participant list as it stands right now. Mutations that race the
    /// firing path may or may not be included; callers get one consistent
    /// copy either way.
    pub fn snapshot_for_firing(&self) -> Vec<Participant> {
        self.lock().clone()
    }
}
