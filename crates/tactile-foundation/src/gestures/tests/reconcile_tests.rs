use super::*;
use crate::gestures::test_support::{drive, Recorded};
use crate::input::TouchSample;
use std::error::Error;
use tactile_geometry::Point;

fn pressed_tap(timers: &mut TimerQueue) -> RecognizerKind {
    let mut tap = RecognizerKind::from(TapRecognizer::default());
    drive(&mut tap, timers, |tap, cx| {
        tap.handle_touch(&TouchSample::down(0, Point::new(0.0, 0.0), 0), cx)
    });
    tap
}

#[test]
fn different_kind_resets_and_reports_both_types() {
    let mut timers = TimerQueue::new();
    let mut current = pressed_tap(&mut timers);
    assert_eq!(current.state(), RefereeState::Detecting);

    let error = current
        .reconcile_from(PinchRecognizer::default().into(), &mut timers)
        .unwrap_err();

    assert_eq!(
        error,
        ReconcileError::KindMismatch {
            expected: GestureType::Tap,
            found: GestureType::Pinch,
        }
    );
    assert_eq!(current.state(), RefereeState::Ready);
    assert_eq!(current.base().current_fingers(), 0);
}

#[test]
fn same_kind_keeps_progress_and_takes_new_callbacks() {
    let mut timers = TimerQueue::new();
    let mut current = pressed_tap(&mut timers);
    let recorded = Recorded::default();

    current
        .reconcile_from(
            TapRecognizer::default().with_callbacks(recorded.callbacks()).into(),
            &mut timers,
        )
        .expect("same configuration");
    assert_eq!(current.state(), RefereeState::Detecting);

    let votes = drive(&mut current, &mut timers, |tap, cx| {
        tap.handle_touch(&TouchSample::up(0, Point::new(0.0, 0.0), 30), cx)
    });
    assert_eq!(votes, vec![GestureDisposal::Accept]);
    drive(&mut current, &mut timers, |tap, cx| tap.on_accepted(cx));
    assert_eq!(recorded.actions(), vec![GestureAction::Action]);
}

#[test]
fn changed_configuration_is_a_config_mismatch() {
    let mut timers = TimerQueue::new();
    let mut current = pressed_tap(&mut timers);

    let error = current
        .reconcile_from(TapRecognizer::new(2, 1).into(), &mut timers)
        .unwrap_err();

    assert_eq!(
        error,
        ReconcileError::ConfigMismatch {
            gesture_type: GestureType::Tap
        }
    );
    assert_eq!(current.state(), RefereeState::Ready);
}

#[test]
fn child_mismatch_chains_its_cause() {
    let error = ReconcileError::ChildMismatch {
        index: 1,
        source: Box::new(ReconcileError::KindMismatch {
            expected: GestureType::LongPress,
            found: GestureType::Tap,
        }),
    };

    assert_eq!(
        error.to_string(),
        "sequence child 1 failed to reconcile: cannot reconcile LongPress recognizer from Tap"
    );
    let cause = error.source().expect("child error is the source");
    assert_eq!(
        cause.to_string(),
        "cannot reconcile LongPress recognizer from Tap"
    );
    assert!(ReconcileError::ChildCountMismatch {
        expected: 2,
        found: 3
    }
    .source()
    .is_none());
}

#[test]
fn accessors_match_the_wrapped_kind() {
    let kind = RecognizerKind::from(LongPressRecognizer::new(700, 1));
    assert_eq!(kind.as_long_press().map(|press| press.duration()), Some(700));
    assert!(kind.as_tap().is_none());
    assert!(kind.as_pinch().is_none());
    assert!(kind.as_sequenced().is_none());
    assert_eq!(kind.gesture_type(), GestureType::LongPress);
}
