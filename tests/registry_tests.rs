#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use event_scheduler_bot::registry::roster::Participant;
use event_scheduler_bot::registry::{EventKind, EventRegistry, EventSpec, RegistryError};
use event_scheduler_bot::services::announcer::{Announcer, FireAction};
use event_scheduler_bot::utils::datetime::format_remaining;

#[derive(Default)]
struct RecordingAnnouncer {
    sent: Mutex<Vec<FireAction>>,
}

impl RecordingAnnouncer {
    fn actions(&self) -> Vec<FireAction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, action: FireAction) -> Result<()> {
        self.sent.lock().unwrap().push(action);
        Ok(())
    }
}

fn setup_registry() -> (Arc<EventRegistry>, Arc<RecordingAnnouncer>) {
    let announcer = Arc::new(RecordingAnnouncer::default());
    let registry = Arc::new(EventRegistry::new(Arc::clone(&announcer) as Arc<dyn Announcer>));
    (registry, announcer)
}

fn fixed_spec(name: &str, secs: u64) -> EventSpec {
    EventSpec {
        name: name.to_string(),
        chat_id: 42,
        duration: Duration::from_secs(secs),
        kind: EventKind::Fixed,
        capacity: 0,
        participants: vec![Participant::named("@alice"), Participant::named("@bob")],
    }
}

// Lets spawned timer jobs run after the paused clock has been advanced.
async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn scheduled_event_fires_once_and_removes_itself() {
    let (registry, announcer) = setup_registry();

    registry.schedule(fixed_spec("launch", 120)).unwrap();
    assert_eq!(
        registry.remaining("launch").unwrap(),
        Duration::from_secs(120)
    );
    assert_eq!(registry.pending_count(), 1);

    tokio::time::sleep(Duration::from_secs(121)).await;
    settle().await;

    let actions = announcer.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].chat_id, 42);
    assert_eq!(actions[0].event_name, "launch");
    let mentions: Vec<&str> = actions[0]
        .participants
        .iter()
        .map(|p| p.mention.as_str())
        .collect();
    assert_eq!(mentions, vec!["@alice", "@bob"]);

    assert_eq!(
        registry.remaining("launch"),
        Err(RegistryError::NotFound("launch".to_string()))
    );
    assert_eq!(registry.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn remaining_reports_near_two_minutes_after_one_second() {
    let (registry, _announcer) = setup_registry();

    registry.schedule(fixed_spec("launch", 120)).unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let remaining = registry.remaining("launch").unwrap();
    assert_eq!(
        format_remaining(remaining),
        "0 days, 0 hours, 1 minutes, and 59 seconds"
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_before_expiry_means_no_announcement() {
    let (registry, announcer) = setup_registry();

    registry.schedule(fixed_spec("raid", 60)).unwrap();
    registry.cancel("raid").unwrap();

    tokio::time::sleep(Duration::from_secs(120)).await;
    settle().await;

    assert!(announcer.actions().is_empty());
    assert_eq!(registry.pending_count(), 0);
    assert_eq!(
        registry.remaining("raid"),
        Err(RegistryError::NotFound("raid".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn duplicate_name_is_rejected_without_touching_the_original() {
    let (registry, announcer) = setup_registry();

    registry.schedule(fixed_spec("raid", 300)).unwrap();
    let err = registry.schedule(fixed_spec("raid", 10)).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateName("raid".to_string()));

    // Had the rejected 10 second timer been installed it would fire here.
    tokio::time::sleep(Duration::from_secs(15)).await;
    settle().await;

    assert!(announcer.actions().is_empty());
    assert_eq!(
        registry.remaining("raid").unwrap(),
        Duration::from_secs(285)
    );
}

#[tokio::test(start_paused = true)]
async fn reschedule_swaps_the_timer_but_keeps_the_arguments() {
    let (registry, announcer) = setup_registry();

    registry.schedule(fixed_spec("raid", 600)).unwrap();
    registry
        .reschedule("raid", Duration::from_secs(60))
        .unwrap();
    assert_eq!(registry.remaining("raid").unwrap(), Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(61)).await;
    settle().await;

    let actions = announcer.actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].chat_id, 42);
    let mentions: Vec<&str> = actions[0]
        .participants
        .iter()
        .map(|p| p.mention.as_str())
        .collect();
    assert_eq!(mentions, vec!["@alice", "@bob"]);
    assert_eq!(registry.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn operations_on_unknown_names_fail_with_not_found() {
    let (registry, _announcer) = setup_registry();

    assert_eq!(
        registry.reschedule("ghost", Duration::from_secs(60)),
        Err(RegistryError::NotFound("ghost".to_string()))
    );
    assert_eq!(
        registry.cancel("ghost"),
        Err(RegistryError::NotFound("ghost".to_string()))
    );
    assert_eq!(
        registry.remaining("ghost"),
        Err(RegistryError::NotFound("ghost".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn remaining_decreases_monotonically() {
    let (registry, _announcer) = setup_registry();

    registry.schedule(fixed_spec("raid", 100)).unwrap();
    let first = registry.remaining("raid").unwrap();

    tokio::time::sleep(Duration::from_secs(30)).await;
    let second = registry.remaining("raid").unwrap();

    assert!(second < first);
    assert_eq!(second, Duration::from_secs(70));
}

#[tokio::test(start_paused = true)]
async fn announcement_reflects_joins_made_while_pending() {
    let (registry, announcer) = setup_registry();

    registry
        .schedule(EventSpec {
            name: "game night".to_string(),
            chat_id: 7,
            duration: Duration::from_secs(60),
            kind: EventKind::Party,
            capacity: 0,
            participants: vec![Participant::with_id(1, "@organizer")],
        })
        .unwrap();

    tokio::time::sleep(Duration::from_secs(30)).await;
    registry
        .join("game night", Participant::with_id(2, "@latecomer"))
        .unwrap();

    tokio::time::sleep(Duration::from_secs(31)).await;
    settle().await;

    let actions = announcer.actions();
    assert_eq!(actions.len(), 1);
    let mentions: Vec<&str> = actions[0]
        .participants
        .iter()
        .map(|p| p.mention.as_str())
        .collect();
    assert_eq!(mentions, vec!["@organizer", "@latecomer"]);
}

#[tokio::test(start_paused = true)]
async fn list_all_reports_every_pending_event_soonest_first() {
    let (registry, _announcer) = setup_registry();

    registry.schedule(fixed_spec("later", 300)).unwrap();
    registry.schedule(fixed_spec("sooner", 100)).unwrap();

    let listing = registry.list_all();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].0, "sooner");
    assert_eq!(listing[0].1, Duration::from_secs(100));
    assert_eq!(listing[1].0, "later");

    assert!(Arc::new(EventRegistry::new(
        Arc::new(RecordingAnnouncer::default()) as Arc<dyn Announcer>
    ))
    .list_all()
    .is_empty());
}
