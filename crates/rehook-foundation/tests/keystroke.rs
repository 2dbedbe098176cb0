use std::cell::RefCell;
use std::rc::Rc;

use rehook_foundation::{use_keystroke, SubmitHandler};
use rehook_input::{Event, SUBMIT};
use rehook_testing::TestRule;

#[derive(Default)]
struct Capture {
    tuple: RefCell<(String, u64)>,
    submitted: RefCell<Vec<String>>,
}

fn mount(rule: &mut TestRule, with_observer: bool) -> Rc<Capture> {
    let capture = Rc::new(Capture::default());
    let on_submit: Option<SubmitHandler> = if with_observer {
        let capture = Rc::clone(&capture);
        Some(Rc::new(move |text: &str| {
            capture.submitted.borrow_mut().push(text.to_owned());
        }))
    } else {
        None
    };
    let observed = Rc::clone(&capture);
    rule.set_content(move |scope| {
        let tuple = use_keystroke(scope, on_submit.clone());
        *observed.tuple.borrow_mut() = tuple;
    });
    capture
}

#[test]
fn mount_does_not_notify() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);

    rule.pump_until_idle();
    rule.recomposition();
    assert!(capture.submitted.borrow().is_empty());
    assert_eq!(*capture.tuple.borrow(), (String::new(), 0));
}

#[test]
fn submitted_text_is_observable_without_an_observer() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, false);

    rule.deliver(Event::submit("hello"));
    assert_eq!(*capture.tuple.borrow(), ("hello".to_owned(), 1));
}

#[test]
fn each_submission_notifies_exactly_once_in_order() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);

    rule.deliver(Event::submit("a"));
    rule.deliver(Event::submit("b"));

    assert_eq!(*capture.submitted.borrow(), ["a", "b"]);
    assert_eq!(*capture.tuple.borrow(), ("b".to_owned(), 2));
}

#[test]
fn non_submit_events_change_nothing() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);
    let renders_after_mount = rule.render_count();

    rule.deliver(Event::with_value("keydown", "x"));

    assert_eq!(*capture.tuple.borrow(), (String::new(), 0));
    assert!(capture.submitted.borrow().is_empty());
    assert_eq!(rule.render_count(), renders_after_mount);
}

#[test]
fn missing_payload_defaults_to_empty_text() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);

    rule.deliver(Event::new(SUBMIT));

    assert_eq!(*capture.tuple.borrow(), (String::new(), 1));
    assert_eq!(*capture.submitted.borrow(), [""]);
}

#[test]
fn renders_without_dep_changes_keep_the_single_subscription() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);

    rule.recomposition();
    rule.recomposition();
    rule.recomposition();
    assert_eq!(rule.bus().subscriptions_opened(), 1);
    assert_eq!(rule.bus().subscriptions_closed(), 0);
    assert_eq!(rule.bus().handler_count(), 1);

    // The still-unique subscription keeps delivering.
    rule.deliver(Event::submit("a"));
    assert_eq!(*capture.submitted.borrow(), ["a"]);
}

#[test]
fn extra_renders_do_not_repeat_a_notification() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);

    rule.deliver(Event::submit("a"));
    rule.recomposition();
    rule.recomposition();

    assert_eq!(*capture.submitted.borrow(), ["a"]);
}

#[test]
fn teardown_unsubscribes_and_silences_the_channel() {
    let mut rule = TestRule::new();
    let capture = mount(&mut rule, true);
    let bus = rule.bus().clone();

    rule.deliver(Event::submit("a"));
    rule.teardown();

    assert_eq!(bus.subscriptions_opened(), 1);
    assert_eq!(bus.subscriptions_closed(), 1);
    assert_eq!(bus.handler_count(), 0);

    bus.publish(&Event::submit("late"));
    assert_eq!(*capture.submitted.borrow(), ["a"]);
}
