//! Named event registry backed by single-shot countdown timers.
//!
//! The registry owns every pending event. Each entry pairs a timer with the
//! chat it was scheduled from and its participant roster; when a timer
//! expires the firing job snapshots the roster, hands a `FireAction` to the
//! announcer and removes the entry. The map is guarded by a mutex because
//! handlers and firing jobs run on a multi-threaded runtime.

pub mod roster;
pub mod timer;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::services::announcer::{Announcer, FireAction};
use self::roster::{Participant, Roster};
use self::timer::EventTimer;

/// Everything that can go wrong while operating on the registry. All of
/// these are recovered at the command boundary and shown to the user as a
/// plain chat message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("There is already an event scheduled with the name \"{0}\"")]
    DuplicateName(String),
    #[error("There is no event scheduled with the name \"{0}\"")]
    NotFound(String),
    #[error("\"{0}\" is not a joinable event")]
    NotAParty(String),
    #[error("\"{0}\" is already full")]
    CapacityExceeded(String),
    #[error("You have not joined \"{0}\"")]
    NotAParticipant(String),
}

/// Whether an event's roster is fixed at creation or open to joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Fixed,
    Party,
}

/// Validated inputs for a new event. Duration must already be checked to be
/// positive and within the lead-time cap before this is constructed.
#[derive(Debug)]
pub struct EventSpec {
    pub name: String,
    pub chat_id: i64,
    pub duration: Duration,
    pub kind: EventKind,
    pub capacity: u32,
    pub participants: Vec<Participant>,
}

struct EventEntry {
    timer: EventTimer,
    chat_id: i64,
    kind: EventKind,
    roster: Arc<Roster>,
}

/// Mapping from event name to its pending timer. One instance is shared by
/// every command handler and by the firing jobs it spawns.
pub struct EventRegistry {
    announcer: Arc<dyn Announcer>,
    events: Mutex<HashMap<String, EventEntry>>,
}

impl EventRegistry {
    pub fn new(announcer: Arc<dyn Announcer>) -> Self {
        Self {
            announcer,
            events: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, EventEntry>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a new event and starts its countdown. Rejects duplicate names
    /// without touching the existing entry.
    pub fn schedule(self: &Arc<Self>, spec: EventSpec) -> Result<(), RegistryError> {
        let mut events = self.lock();
        if events.contains_key(&spec.name) {
            return Err(RegistryError::DuplicateName(spec.name));
        }

        let roster = Arc::new(Roster::new(spec.capacity, spec.participants));
        let entry = self.spawn_entry(&spec.name, spec.chat_id, spec.kind, spec.duration, roster);
        info!(
            "event \"{}\" scheduled in chat {} firing in {}s",
            spec.name,
            spec.chat_id,
            spec.duration.as_secs()
        );
        events.insert(spec.name, entry);
        Ok(())
    }

    /// Replaces the timer under `name` with a fresh countdown, keeping the
    /// chat, kind, capacity and participant roster of the original.
    pub fn reschedule(
        self: &Arc<Self>,
        name: &str,
        new_duration: Duration,
    ) -> Result<(), RegistryError> {
        let mut events = self.lock();
        let (chat_id, kind, roster) = {
            let entry = events
                .get(name)
                .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
            entry.timer.cancel();
            (entry.chat_id, entry.kind, Arc::clone(&entry.roster))
        };

        let entry = self.spawn_entry(name, chat_id, kind, new_duration, roster);
        info!(
            "event \"{}\" rescheduled, now firing in {}s",
            name,
            new_duration.as_secs()
        );
        events.insert(name.to_string(), entry);
        Ok(())
    }

    /// Cancels the timer and removes the entry in one step.
    pub fn cancel(&self, name: &str) -> Result<(), RegistryError> {
        let mut events = self.lock();
        let entry = events
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        entry.timer.cancel();
        info!("event \"{}\" canceled", name);
        Ok(())
    }

    /// Live remaining time for one event.
    pub fn remaining(&self, name: &str) -> Result<Duration, RegistryError> {
        let events = self.lock();
        let entry = events
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(entry.timer.remaining())
    }

    /// Name and remaining time of every pending event, soonest first.
    pub fn list_all(&self) -> Vec<(String, Duration)> {
        let events = self.lock();
        let mut listing: Vec<(String, Duration)> = events
            .iter()
            .map(|(name, entry)| (name.clone(), entry.timer.remaining()))
            .collect();
        listing.sort_by_key(|(_, remaining)| *remaining);
        listing
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Adds a participant to a party event, returning the spots left after
    /// the join (`None` for unlimited rosters).
    pub fn join(
        &self,
        name: &str,
        participant: Participant,
    ) -> Result<Option<i64>, RegistryError> {
        let events = self.lock();
        let entry = events
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if entry.kind != EventKind::Party {
            return Err(RegistryError::NotAParty(name.to_string()));
        }
        if !entry.roster.add(participant) {
            return Err(RegistryError::CapacityExceeded(name.to_string()));
        }
        Ok(entry.roster.spots_left())
    }

    /// Removes one roster entry for the user from a party event.
    pub fn leave(&self, name: &str, user_id: i64) -> Result<(), RegistryError> {
        let events = self.lock();
        let entry = events
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        if entry.kind != EventKind::Party {
            return Err(RegistryError::NotAParty(name.to_string()));
        }
        entry
            .roster
            .remove(user_id)
            .ok_or_else(|| RegistryError::NotAParticipant(name.to_string()))?;
        Ok(())
    }

    pub fn spots_left(&self, name: &str) -> Result<Option<i64>, RegistryError> {
        let events = self.lock();
        let entry = events
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(entry.roster.spots_left())
    }

    fn spawn_entry(
        self: &Arc<Self>,
        name: &str,
        chat_id: i64,
        kind: EventKind,
        duration: Duration,
        roster: Arc<Roster>,
    ) -> EventEntry {
        let registry = Arc::clone(self);
        let fire_roster = Arc::clone(&roster);
        let event_name = name.to_string();

        let timer = EventTimer::spawn(duration, move || async move {
            let action = FireAction {
                chat_id,
                event_name: event_name.clone(),
                participants: fire_roster.snapshot_for_firing(),
            };
            if let Err(e) = registry.announcer.announce(action).await {
                error!("failed to announce \"{}\" in chat {}: {}", event_name, chat_id, e);
            }
            registry.on_fired(&event_name);
        });

        EventEntry {
            timer,
            chat_id,
            kind,
            roster,
        }
    }

    /// Drops the entry once its announcement has gone out. A racing cancel
    /// may have removed it already, which is fine.
    fn on_fired(&self, name: &str) {
        if self.lock().remove(name).is_some() {
            info!("event \"{}\" fired", name);
        }
    }
}
