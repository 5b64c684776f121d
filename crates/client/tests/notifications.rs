//! Timing behavior of the notification slot, run on a real executor.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use filehost_client::{Notifier, Severity, TRANSITION_DELAY};
use smol::{LocalExecutor, Timer};

fn setup() -> (Rc<LocalExecutor<'static>>, Notifier, Rc<RefCell<Vec<String>>>) {
    let executor = Rc::new(LocalExecutor::new());
    let notifier = Notifier::new(executor.clone());
    let shown = Rc::new(RefCell::new(Vec::new()));
    let sink = shown.clone();
    notifier.on_display(move |m| sink.borrow_mut().push(m.text.clone()));
    (executor, notifier, shown)
}

fn wait(executor: &LocalExecutor<'static>, ms: u64) {
    smol::block_on(executor.run(Timer::after(Duration::from_millis(ms))));
}

#[test]
fn test_second_show_within_transition_wins() {
    let (executor, notifier, shown) = setup();

    notifier.success("first");
    notifier.error("second");
    assert!(notifier.current().is_none());

    wait(&executor, 250);

    let current = notifier.current().unwrap();
    assert_eq!(current.text, "second");
    assert_eq!(current.severity, Severity::Error);
    assert_eq!(*shown.borrow(), vec!["first", "second"]);
}

#[test]
fn test_burst_drops_intermediate_messages() {
    let (executor, notifier, shown) = setup();

    notifier.info("one");
    notifier.info("two");
    notifier.info("three");
    notifier.info("four");

    wait(&executor, 250);

    assert_eq!(notifier.current().map(|m| m.text), Some("four".to_string()));
    assert_eq!(*shown.borrow(), vec!["one", "four"]);
    assert!(!notifier.is_transitioning());
}

#[test]
fn test_message_expires_after_duration() {
    let (executor, notifier, _) = setup();

    notifier.warning_for("short lived", 50);
    assert!(notifier.is_visible());

    wait(&executor, 120);
    assert!(!notifier.is_visible());
}

#[test]
fn test_replaced_message_timer_does_not_hide_successor() {
    let (executor, notifier, _) = setup();

    notifier.info_for("first", 100);
    notifier.info_for("second", 1_000);

    // Past the first message's lifetime and the transition.
    wait(&executor, 300);
    assert_eq!(notifier.current().map(|m| m.text), Some("second".to_string()));
}

#[test]
fn test_settled_waits_for_reveal() {
    let (executor, notifier, _) = setup();

    notifier.success("saved");
    notifier.success("saved again");
    assert!(notifier.is_transitioning());

    smol::block_on(executor.run(notifier.settled()));
    assert!(!notifier.is_transitioning());
    assert_eq!(notifier.current().map(|m| m.text), Some("saved again".to_string()));
}

#[test]
fn test_transition_delay_value() {
    assert_eq!(TRANSITION_DELAY, Duration::from_millis(180));
}

#[test]
fn test_replacement_stays_hidden_for_whole_transition() {
    let (executor, notifier, shown) = setup();

    notifier.info("first");
    notifier.info("second");

    wait(&executor, 100);
    assert!(notifier.current().is_none());
    assert!(notifier.is_transitioning());
    assert_eq!(*shown.borrow(), vec!["first"]);

    wait(&executor, 150);
    assert_eq!(notifier.current().map(|m| m.text), Some("second".to_string()));
    assert_eq!(*shown.borrow(), vec!["first", "second"]);
}

#[test]
fn test_hide_during_transition_keeps_pending_reveal() {
    let (executor, notifier, _) = setup();

    notifier.success("first");
    notifier.error("second");
    notifier.hide();
    assert!(notifier.current().is_none());
    assert!(notifier.is_transitioning());

    wait(&executor, 250);
    assert_eq!(notifier.current().map(|m| m.text), Some("second".to_string()));
    assert!(!notifier.is_transitioning());
}
