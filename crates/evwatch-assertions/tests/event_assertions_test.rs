//! End-to-end assertions against the sample subjects.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use evwatch_assertions::{AssertionError, AssertionScope, ArgPredicate, ShouldExt, arg};
use evwatch_core::arg::EventArg;
use evwatch_core::error::MonitorError;
use evwatch_core::monitor::MonitorExt;
use evwatch_core::options::MonitorOptions;
use evwatch_core::property_changed::{PROPERTY_CHANGED, PropertyChangedArgs};
use evwatch_test_support::{
    B, BrokenAccessorSubject, C, EventRaisingClass, FixedClock, NonConventionalSubject,
    PropertyChangedSubject, TypedArgsSubject, init_test_tracing,
};

// --- raise / not_raise ---

#[test]
fn test_raise_fails_when_property_changed_was_never_raised() {
    // Arrange
    init_test_tracing();
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();

    // Act
    let result = monitor.should().raise(PROPERTY_CHANGED);

    // Assert
    let Err(AssertionError::Failed(message)) = result else {
        panic!("expected an assertion failure");
    };
    assert!(message.contains("to raise event \"PropertyChanged\""));
    assert!(message.contains("but it did not"));
    assert!(message.contains("PropertyChangedSubject"));
}

#[test]
fn test_raise_with_sender_and_args_narrows_to_one_record() {
    // Arrange
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_property_changed(Some("Foo"));
    subject.raise_property_changed(Some("Boo"));

    // Act
    let recording = monitor
        .should()
        .raise(PROPERTY_CHANGED)
        .and_then(|a| a.with_sender(&subject))
        .and_then(|a| {
            a.with_args(vec![arg!(|args: &PropertyChangedArgs| args.property_name() == Some("Boo"))])
        })
        .unwrap()
        .into_recording();

    // Assert
    assert_eq!(recording.len(), 1);
    assert_eq!(recording.records()[0].sequence(), 1);
}

#[test]
fn test_with_sender_excludes_other_and_null_senders() {
    let subject = PropertyChangedSubject::new();
    let impostor = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_property_changed_from(EventArg::object(Arc::clone(&impostor)), Some("Foo"));
    subject.raise_property_changed_from(EventArg::null(), Some("Foo"));

    let result = monitor.should().raise(PROPERTY_CHANGED).unwrap().with_sender(&subject);

    let Err(AssertionError::Failed(message)) = result else {
        panic!("expected an assertion failure");
    };
    assert!(message.starts_with("Expected sender "));
    assert!(message.contains("<null>"));
}

#[test]
fn test_one_matching_string_argument_is_enough() {
    // Arrange
    let subject = NonConventionalSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise("first argument", 2, "third argument");

    // Act
    let recording = monitor
        .should()
        .raise("NonConventionalEvent")
        .unwrap()
        .with_args(vec![arg!(|s: &String| s == "third argument")])
        .unwrap()
        .into_recording();

    // Assert
    assert_eq!(recording.len(), 1);
}

#[test]
fn test_predicates_for_several_typed_arguments_keep_their_order() {
    let subject = NonConventionalSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise("first argument", 2, "third argument");

    let raised = monitor.should().raise("NonConventionalEvent").unwrap();
    let reversed = raised.with_args(vec![
        arg!(|s: &String| s == "third argument"),
        arg!(|s: &String| s == "first argument"),
    ]);

    assert!(matches!(reversed, Err(AssertionError::Failed(_))));
}

#[test]
fn test_wildcard_predicate_skips_a_position() {
    let subject = NonConventionalSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise("first argument", 2, "third argument");

    let result = monitor
        .should()
        .raise("NonConventionalEvent")
        .unwrap()
        .with_args(vec![ArgPredicate::any(), arg!(|s: &String| s.starts_with("third"))]);

    assert!(result.is_ok());
}

#[test]
fn test_with_args_rejects_predicates_for_an_absent_type() {
    // Arrange
    let subject = TypedArgsSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.emit_c(1);
    subject.emit_c(2);

    // Act
    let result = monitor
        .should()
        .raise("Emitted")
        .unwrap()
        .with_args::<B>(vec![arg!(|_: &B| true), arg!(|_: &B| false)]);

    // Assert
    let Err(AssertionError::InvalidArgument(message)) = result else {
        panic!("expected a usage error");
    };
    assert!(message.contains("at least 2 parameters"));
    assert!(message.ends_with("but only found 0."));
}

#[test]
fn test_narrowing_failures_name_the_event_and_subject() {
    // Arrange
    let subject = TypedArgsSubject::new();
    let stranger = TypedArgsSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.emit_b(1);

    // Act
    let args = monitor
        .should()
        .raise("Emitted")
        .unwrap()
        .with_args(vec![arg!(|b: &B| b.value == 9)]);
    let sender = monitor.should().raise("Emitted").unwrap().with_sender(&stranger);
    let count = monitor.should().raise("Emitted").unwrap().has_count(2);
    let single = monitor
        .should()
        .raise("Emitted")
        .unwrap()
        .with_args::<B>(Vec::new())
        .unwrap()
        .has_count(1)
        .unwrap()
        .contain_single();

    // Assert
    assert!(single.is_ok());
    for result in [args.map(|_| ()), sender.map(|_| ()), count.map(|_| ())] {
        let Err(AssertionError::Failed(message)) = result else {
            panic!("expected an assertion failure");
        };
        assert!(message.contains("event \"Emitted\" of object TypedArgsSubject"), "{message}");
    }
}

#[test]
fn test_with_args_without_predicates_filters_by_type() {
    let subject = TypedArgsSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.emit_b(1);
    subject.emit_c(2);
    subject.emit_b(3);

    let b_events = monitor
        .should()
        .raise("Emitted")
        .unwrap()
        .with_args::<B>(Vec::new())
        .unwrap()
        .has_count(2)
        .unwrap()
        .into_recording();

    let values: Vec<i32> = b_events.iter().flat_map(|r| r.args_of::<B>()).map(|b| b.value).collect();
    assert_eq!(values, [1, 3]);
    assert!(b_events.iter().all(|r| r.args_of::<C>().next().is_none()));
}

#[test]
fn test_not_raise_passes_after_clear() {
    // Arrange
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_property_changed(Some("Foo"));
    assert!(monitor.should().not_raise(PROPERTY_CHANGED).is_err());

    // Act
    monitor.clear();

    // Assert
    assert!(monitor.should().not_raise(PROPERTY_CHANGED).is_ok());
    subject.raise_property_changed(Some("Boo"));
    assert!(monitor.should().raise(PROPERTY_CHANGED).is_ok());
}

#[test]
fn test_unmonitored_event_is_reported_as_monitor_error() {
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();

    let result = monitor.should().not_raise("NonExistingEvent");

    assert!(matches!(
        result,
        Err(AssertionError::Monitor(MonitorError::EventNotMonitored(_)))
    ));
}

#[test]
fn test_reason_is_woven_into_the_message() {
    let subject = EventRaisingClass::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_interface_event();

    let result = monitor
        .should()
        .because("because {0} should stay quiet")
        .not_raise("InterfaceEvent");

    let Err(AssertionError::Failed(message)) = result else {
        panic!("expected an assertion failure");
    };
    assert!(message.starts_with(
        "Expected object EventRaisingClass to not raise event \"InterfaceEvent\" because {0} should stay quiet, but it did: "
    ));
}

// --- property change ---

#[test]
fn test_raise_property_change_for_named_and_all_properties() {
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_property_changed(Some("Foo"));
    subject.raise_property_changed(None);

    let foo = monitor.should().raise_property_change_for(Some("Foo")).unwrap();
    let boo = monitor.should().raise_property_change_for(Some("Boo")).unwrap();
    let any = monitor.should().raise_property_change_for(None).unwrap();

    assert_eq!(foo.recording().len(), 2);
    assert_eq!(boo.recording().len(), 1);
    assert_eq!(any.recording().len(), 2);
}

#[test]
fn test_raise_property_change_for_when_never_raised() {
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();

    let result = monitor
        .should()
        .because("the setter notifies")
        .raise_property_change_for(Some("Foo"));

    assert!(matches!(
        result,
        Err(AssertionError::Failed(m)) if m == "Expected object PropertyChangedSubject to raise event \"PropertyChanged\" for property \"Foo\" because the setter notifies, but it did not raise that event at all."
    ));
}

#[test]
fn test_not_raise_property_change_for() {
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_property_changed(Some("Boo"));

    assert!(monitor.should().not_raise_property_change_for(Some("Foo")).is_ok());
    let result = monitor.should().not_raise_property_change_for(Some("Boo"));

    assert!(matches!(
        result,
        Err(AssertionError::Failed(m)) if m == "Did not expect object PropertyChangedSubject to raise the \"PropertyChanged\" event for property \"Boo\", but it did."
    ));
}

// --- scopes ---

#[test]
fn test_scope_collects_every_failure_before_reporting() {
    // Arrange
    let subject = EventRaisingClass::new();
    let monitor = subject.monitor().unwrap();
    subject.raise_interface2_event();
    let scope = AssertionScope::new();

    // Act
    {
        let should = monitor.should().within(&scope);
        should.raise("InterfaceEvent").unwrap();
        should.not_raise("Interface2Event").unwrap();
        should.raise("Interface2Event").unwrap();
    }
    let result = scope.finish();

    // Assert
    let Err(AssertionError::Failed(message)) = result else {
        panic!("expected the scope to fail");
    };
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("to raise event \"InterfaceEvent\""));
    assert!(lines[1].contains("to not raise event \"Interface2Event\""));
}

#[test]
fn test_scope_does_not_defer_usage_errors() {
    let subject = PropertyChangedSubject::new();
    let monitor = subject.monitor().unwrap();
    let scope = AssertionScope::new();

    assert!(matches!(
        monitor.should().within(&scope).raise_property_change_for(Some("x => x.Foo")),
        Err(AssertionError::InvalidArgument(_))
    ));
    assert!(scope.finish().is_ok());
}

// --- accessor policy ---

#[test]
fn test_recorded_broken_accessor_event_can_be_asserted() {
    let subject = BrokenAccessorSubject::attaching_then_failing();
    let monitor = subject
        .monitor_with(
            MonitorOptions::new()
                .ignoring_event_accessor_exceptions()
                .recording_events_with_broken_accessor(),
        )
        .unwrap();

    subject.raise_broken();

    assert!(monitor.should().raise("BrokenEvent").is_ok());
    assert!(monitor.should().not_raise("WorkingEvent").is_ok());
}

// --- ordering ---

#[test]
fn test_occurred_events_follow_raise_order_under_frozen_clock() {
    let frozen = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    let subject = EventRaisingClass::new();
    let monitor = subject
        .monitor_with(MonitorOptions::new().with_clock(Arc::new(FixedClock(frozen))))
        .unwrap();

    subject.raise_interface_event();
    subject.raise_interface2_event();
    subject.raise_interface3_event();

    let sequences: Vec<u64> = monitor.occurred_events().iter().map(|r| r.sequence()).collect();
    assert_eq!(sequences, [0, 1, 2]);
    let recording = monitor.should().raise("InterfaceEvent").unwrap().into_recording();
    assert_eq!(recording.records()[0].timestamp_utc(), frozen);
}

#[test]
fn test_identical_raises_produce_distinct_records() {
    let subject = PropertyChangedSubject::new();
    let monitor = subject
        .monitor_with(MonitorOptions::new().with_clock(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ))))
        .unwrap();

    subject.raise_property_changed(Some("Foo"));
    subject.raise_property_changed(Some("Foo"));

    let recording = monitor.should().raise_property_change_for(Some("Foo")).unwrap().has_count(2).unwrap().into_recording();
    assert!(recording.records()[0].sequence() < recording.records()[1].sequence());
    assert_eq!(recording.records()[0].timestamp_utc(), recording.records()[1].timestamp_utc());
}

// --- concurrency ---

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_parallel_monitor_raise_assert_cycles() {
    let mut tasks = tokio::task::JoinSet::new();
    for n in 0..1000 {
        tasks.spawn_blocking(move || -> Result<(), AssertionError> {
            let subject = PropertyChangedSubject::new();
            let monitor = subject.monitor()?;
            let property = format!("Property{n}");
            subject.raise_property_changed(Some(&property));

            monitor
                .should()
                .raise(PROPERTY_CHANGED)?
                .with_sender(&subject)?
                .contain_single()?;
            monitor.should().raise_property_change_for(Some(&property))?;
            monitor.should().not_raise_property_change_for(Some("Other"))?;
            Ok(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }
}
