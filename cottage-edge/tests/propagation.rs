use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use cottage_edge::{BackgroundTasks, CalendarView, CollectionKey, Config, ServerState, ViewListener, mount_calendar};
use rust_decimal::Decimal;
use shared::models::{ClassCategory, ClassInput, CustomerInfo, PublicClassEntry};
use shared::{ChangeNotice, EventType};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn admin_state() -> ServerState {
    let mut config = Config::with_overrides("/tmp/unused");
    config.sync_replay_delay_ms = 20;
    ServerState::in_memory(config).unwrap()
}

fn dessert_class() -> ClassInput {
    ClassInput {
        category: ClassCategory::Desserts,
        date: NaiveDate::from_ymd_opt(2099, 3, 14).unwrap(),
        time: "11:00".into(),
        max_seats: 6,
        price: Decimal::from(95),
        notes: Some("Bring an apron".into()),
    }
}

async fn next(listener: &mut ViewListener) -> ChangeNotice {
    timeout(WAIT, listener.recv())
        .await
        .expect("timed out waiting for change notice")
        .expect("bus closed")
}

/// Collect notices until `key` shows up with the given event type
async fn wait_for(listener: &mut ViewListener, key: &str, event_type: EventType) -> Vec<ChangeNotice> {
    let mut seen = Vec::new();
    loop {
        let notice = next(listener).await;
        let done = notice.key() == key && notice.event_type() == event_type;
        seen.push(notice);
        if done {
            return seen;
        }
    }
}

#[tokio::test]
async fn admin_save_reaches_other_views_as_genuine_events() {
    let admin = admin_state();
    let calendar = admin.open_view();
    let mut calendar_listener = calendar.bus().listener(calendar.store.view());

    admin.classes.add_class(dessert_class()).unwrap();

    let seen = wait_for(&mut calendar_listener, "cottageClasses", EventType::Storage).await;
    assert!(seen.iter().all(|n| n.event_type() == EventType::Storage));
    assert!(seen.iter().all(|n| n.origin() == admin.store.view()));

    // Other views never see the writer's signal or synthetic replay
    tokio::time::sleep(Duration::from_millis(100)).await;
    while let Some(notice) = calendar_listener.try_recv() {
        assert_eq!(notice.event_type(), EventType::Storage);
    }
}

#[tokio::test]
async fn writer_gets_signal_then_delayed_replay() {
    let admin = admin_state();
    let mut own = admin.bus().listener(admin.store.view());

    admin.classes.add_class(dessert_class()).unwrap();

    match next(&mut own).await {
        ChangeNotice::Signal(signal) => {
            assert_eq!(signal.key, "cottageClasses");
            assert_eq!(signal.origin, admin.store.view());
        }
        other => panic!("expected same-view signal first, got {other:?}"),
    }

    match next(&mut own).await {
        ChangeNotice::Storage(event) => {
            assert!(event.synthetic);
            assert_eq!(event.key, "cottageClasses");
            let classes: Vec<PublicClassEntry> =
                serde_json::from_str(event.new_value.as_deref().unwrap()).unwrap();
            assert!(classes.iter().any(|c| c.class_name == "Classic Desserts"));
        }
        other => panic!("expected synthetic replay, got {other:?}"),
    }

    // Genuine writes by the same view are never echoed back
    assert!(own.try_recv().is_none());
}

#[tokio::test]
async fn announce_updates_last_update() {
    let admin = admin_state();
    let calendar = admin.open_view();
    assert_eq!(admin.store.last_update().unwrap(), None);

    admin.classes.add_class(dessert_class()).unwrap();

    let last = calendar.store.last_update().unwrap().unwrap();
    assert!(shared::util::now_millis() - last < 30_000);
}

#[derive(Default)]
struct Recorder {
    renders: Mutex<Vec<Vec<PublicClassEntry>>>,
}

impl Recorder {
    fn last(&self) -> Option<Vec<PublicClassEntry>> {
        self.renders.lock().unwrap().last().cloned()
    }

    fn count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }
}

impl CalendarView for Recorder {
    fn refresh(&self, classes: &[PublicClassEntry]) {
        self.renders.lock().unwrap().push(classes.to_vec());
    }
}

#[tokio::test]
async fn mounted_calendar_follows_bookings_from_another_view() {
    let admin = admin_state();
    let booking_view = admin.open_view();
    let calendar = admin.open_view();

    let added = admin.classes.add_class(dessert_class()).unwrap();

    let recorder = Arc::new(Recorder::default());
    let mut tasks = BackgroundTasks::new();
    mount_calendar(
        &mut tasks,
        calendar.store.clone(),
        recorder.clone(),
        Duration::from_secs(30),
    )
    .unwrap();
    assert_eq!(recorder.count(), 1);

    booking_view
        .bookings
        .submit_booking(
            &ClassCategory::Desserts,
            added.date,
            2,
            &CustomerInfo {
                name: "Grace Hopper".into(),
                email: "grace@example.com".into(),
                phone: "555-0101".into(),
                dietary: None,
            },
        )
        .unwrap();

    let refreshed = timeout(WAIT, async {
        loop {
            let seats = recorder
                .last()
                .and_then(|classes| classes.into_iter().find(|c| c.id == added.id))
                .map(|c| c.seats);
            if seats == Some(4) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(refreshed.is_ok(), "calendar never showed the booked seats");

    tasks.shutdown().await;
}

#[tokio::test]
async fn poller_refreshes_only_within_window() {
    let admin = admin_state();
    let poller = cottage_edge::CalendarPoller::new(admin.store.clone(), Duration::from_secs(30));
    let recorder = Recorder::default();

    admin.store.set_last_update(1_000).unwrap();
    assert!(poller.poll_once(&recorder, 1_000 + 10_000).unwrap());
    assert!(!poller.poll_once(&recorder, 1_000 + 45_000).unwrap());
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn shutdown_closes_listeners() {
    let admin = admin_state();
    let mut listener = admin.bus().listener(admin.store.view());
    admin.shutdown();
    assert!(timeout(WAIT, listener.recv()).await.unwrap().is_none());
}

#[test]
fn collection_keys_keep_stored_names() {
    let names: Vec<&str> = CollectionKey::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "cottageClassesAdmin",
            "cottageClasses",
            "cottageBookings",
            "users",
            "userMessages",
            "adminNotifications",
            "lastUpdate",
        ]
    );
}
