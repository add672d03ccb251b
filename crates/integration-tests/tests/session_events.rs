//! Change-notification delivery across the session layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use backroom_client::session::SessionEvents;
use backroom_core::UserProfile;
use serde_json::json;

fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let read = {
        let count = count.clone();
        move || count.load(Ordering::SeqCst)
    };
    (count, read)
}

#[test]
fn test_at_most_once_delivery_per_change() {
    let events = SessionEvents::new();
    let (count, read) = counter();

    let count_clone = count.clone();
    let _sub = events.on_user_changed(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    events.emit_user_changed(&UserProfile::default());
    assert_eq!(read(), 1);

    events.emit_user_changed(&UserProfile::default());
    assert_eq!(read(), 2, "one callback per change, no batching, no dedup");
}

#[test]
fn test_no_replay_for_late_subscribers() {
    let events = SessionEvents::new();

    events.emit_company_changed(&json!({"name": "Acme"}));

    let (count, read) = counter();
    let count_clone = count.clone();
    let _sub = events.on_company_changed(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(read(), 0, "a listener registered after the change sees nothing");
}

#[test]
fn test_multiple_listeners_all_notified() {
    let events = SessionEvents::new();
    let (count, read) = counter();

    let subs: Vec<_> = (0..3)
        .map(|_| {
            let count_clone = count.clone();
            events.on_user_changed(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    events.emit_user_changed(&UserProfile::default());
    assert_eq!(read(), 3);

    drop(subs);
    events.emit_user_changed(&UserProfile::default());
    assert_eq!(read(), 3, "dropped subscriptions stop receiving");
}

#[test]
fn test_payload_carries_changed_fields() {
    let events = SessionEvents::new();
    let seen = Arc::new(std::sync::Mutex::new(None));

    let seen_clone = seen.clone();
    let _sub = events.on_user_changed(move |profile| {
        if let Ok(mut slot) = seen_clone.lock() {
            *slot = Some(profile.clone());
        }
    });

    let profile = UserProfile {
        name: "Ada".to_owned(),
        email: "ada@acme.io".to_owned(),
        verified_email: true,
        avatar_url: None,
    };
    events.emit_user_changed(&profile);

    let received = seen.lock().expect("lock").clone().expect("delivered");
    assert_eq!(received, profile);
}
