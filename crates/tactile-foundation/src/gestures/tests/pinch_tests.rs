use super::PinchRecognizer;
use crate::gestures::test_support::{drive, drive_with, Recorded};
use crate::gestures::{
    GestureAction, GestureDisposal, GestureJudgeResult, GestureRecognizer, GestureType,
    ReconcileError, RefereeState,
};
use crate::input::{
    AxisAction, AxisSample, InputEventType, KeyModifier, KeyModifiers, TargetRects, TouchSample,
};
use tactile_core::TimerQueue;
use tactile_geometry::{Point, Rect};

fn touch_down(pinch: &mut PinchRecognizer, timers: &mut TimerQueue, id: i32, x: f32, y: f32) {
    let votes = drive(pinch, timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::down(id, Point::new(x, y), 0), cx)
    });
    assert!(votes.is_empty(), "down should not vote, got {votes:?}");
}

fn touch_move(
    pinch: &mut PinchRecognizer,
    timers: &mut TimerQueue,
    id: i32,
    x: f32,
    y: f32,
) -> Vec<GestureDisposal> {
    drive(pinch, timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::moved(id, Point::new(x, y), 16), cx)
    })
}

fn accept(pinch: &mut PinchRecognizer, timers: &mut TimerQueue) {
    drive(pinch, timers, |pinch, cx| pinch.on_accepted(cx));
}

/// Two fingers down at (100,100)/(200,100), spread to (80,100)/(220,100).
fn pinched(recorded: &Recorded) -> (PinchRecognizer, TimerQueue) {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default().with_callbacks(recorded.callbacks());
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);
    assert_eq!(
        touch_move(&mut pinch, &mut timers, 0, 80.0, 100.0),
        vec![GestureDisposal::Accept]
    );
    accept(&mut pinch, &mut timers);
    touch_move(&mut pinch, &mut timers, 1, 220.0, 100.0);
    (pinch, timers)
}

#[test]
fn configuration_is_clamped() {
    assert_eq!(PinchRecognizer::new(1, 5.0).fingers(), 2);
    assert_eq!(PinchRecognizer::new(9, 5.0).fingers(), 5);
    assert_eq!(PinchRecognizer::new(3, 5.0).fingers(), 3);
    assert_eq!(PinchRecognizer::new(2, 0.0).distance(), 5.0);
    assert_eq!(PinchRecognizer::new(2, -3.0).distance(), 5.0);
    assert_eq!(PinchRecognizer::new(2, 12.0).distance(), 12.0);
}

#[test]
fn detecting_starts_once_all_fingers_are_down() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();

    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    assert_eq!(pinch.state(), RefereeState::Ready);

    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);
    assert_eq!(pinch.state(), RefereeState::Detecting);
    assert!((pinch.initial_deviation() - 50.0).abs() < 1e-3);
    assert_eq!(pinch.pinch_center(), Point::new(150.0, 100.0));
}

#[test]
fn extra_fingers_are_ignored() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);
    touch_down(&mut pinch, &mut timers, 2, 300.0, 100.0);

    assert_eq!(pinch.active_finger_count(), 2);
    assert!(touch_move(&mut pinch, &mut timers, 2, 900.0, 100.0).is_empty());
}

#[test]
fn small_spread_change_keeps_detecting() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);

    let votes = touch_move(&mut pinch, &mut timers, 0, 96.0, 100.0);
    assert!(votes.is_empty());
    assert_eq!(pinch.state(), RefereeState::Detecting);
}

#[test]
fn spreading_fingers_reaches_expected_scale() {
    let recorded = Recorded::default();
    let (pinch, _timers) = pinched(&recorded);

    assert_eq!(pinch.state(), RefereeState::Succeed);
    assert!((pinch.current_deviation() - 70.0).abs() < 1e-3);
    assert!((pinch.scale() - 1.4).abs() < 1e-3);
    assert_eq!(
        recorded.actions(),
        vec![GestureAction::Start, GestureAction::Update]
    );
    let update = recorded.last(GestureAction::Update).expect("update fired");
    assert_eq!(update.fingers.len(), 2);
    assert_eq!(update.input_event_type, InputEventType::TouchScreen);
    assert_eq!(update.pinch_center, Point::new(150.0, 100.0));
}

#[test]
fn early_release_rejects_without_callbacks() {
    let recorded = Recorded::default();
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default().with_callbacks(recorded.callbacks());
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);

    let votes = drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::up(1, Point::new(200.0, 100.0), 40), cx)
    });

    assert_eq!(votes, vec![GestureDisposal::Reject]);
    assert!(recorded.is_empty());
}

#[test]
fn updates_wait_for_end_of_flush() {
    let recorded = Recorded::default();
    let (mut pinch, mut timers) = pinched(&recorded);
    let updates_before = recorded.count(GestureAction::Update);

    drive_with(
        &mut pinch,
        &mut timers,
        &crate::input::Unbounded,
        false,
        |pinch, cx| pinch.handle_touch(&TouchSample::moved(0, Point::new(60.0, 100.0), 32), cx),
    );
    assert_eq!(recorded.count(GestureAction::Update), updates_before);
    assert!((pinch.scale() - 1.6).abs() < 1e-3, "scale still tracks");

    drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::moved(1, Point::new(240.0, 100.0), 32), cx)
    });
    assert_eq!(recorded.count(GestureAction::Update), updates_before + 1);
    assert!((pinch.scale() - 1.8).abs() < 1e-3);
}

#[test]
fn first_lift_after_success_fires_end_once() {
    let recorded = Recorded::default();
    let (mut pinch, mut timers) = pinched(&recorded);

    for id in [0, 1] {
        let votes = drive(&mut pinch, &mut timers, |pinch, cx| {
            pinch.handle_touch(&TouchSample::up(id, Point::new(0.0, 0.0), 50), cx)
        });
        assert!(votes.is_empty());
    }

    assert_eq!(recorded.count(GestureAction::End), 1);
    assert_eq!(pinch.active_finger_count(), 0);
    let updates = recorded.count(GestureAction::Update);
    assert_eq!(updates, 1, "no updates once a finger lifted");
}

#[test]
fn cancel_after_success_returns_to_ready() {
    let recorded = Recorded::default();
    let (mut pinch, mut timers) = pinched(&recorded);

    let votes = drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::cancel(0, Point::new(80.0, 100.0), 60), cx)
    });

    assert!(votes.is_empty());
    assert_eq!(recorded.count(GestureAction::Cancel), 1);
    assert_eq!(pinch.state(), RefereeState::Ready);
}

#[test]
fn cancel_while_detecting_rejects() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);

    let votes = drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::cancel(0, Point::new(100.0, 100.0), 10), cx)
    });
    assert_eq!(votes, vec![GestureDisposal::Reject]);
}

#[test]
fn down_outside_target_rejects() {
    let mut timers = TimerQueue::new();
    let mut targets = TargetRects::new();
    targets.insert(7, Rect::new(0.0, 0.0, 150.0, 150.0));
    let mut pinch = PinchRecognizer::default().with_target(7);

    let inside = drive_with(&mut pinch, &mut timers, &targets, true, |pinch, cx| {
        pinch.handle_touch(&TouchSample::down(0, Point::new(100.0, 100.0), 0), cx)
    });
    assert!(inside.is_empty());

    let outside = drive_with(&mut pinch, &mut timers, &targets, true, |pinch, cx| {
        pinch.handle_touch(&TouchSample::down(1, Point::new(200.0, 100.0), 0), cx)
    });
    assert_eq!(outside, vec![GestureDisposal::Reject]);
    assert_eq!(pinch.active_finger_count(), 1);
}

#[test]
fn pinch_center_is_reported_in_local_space() {
    let mut timers = TimerQueue::new();
    let mut targets = TargetRects::new();
    targets.insert(3, Rect::new(50.0, 50.0, 300.0, 300.0));
    let mut pinch = PinchRecognizer::default().with_target(3);

    for (id, x) in [(0, 100.0), (1, 200.0)] {
        drive_with(&mut pinch, &mut timers, &targets, true, |pinch, cx| {
            pinch.handle_touch(&TouchSample::down(id, Point::new(x, 100.0), 0), cx)
        });
    }
    assert_eq!(pinch.pinch_center(), Point::new(100.0, 50.0));
}

#[test]
fn judge_can_veto_acceptance() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default()
        .with_tag("zoom")
        .with_judge(|info, event| {
            assert_eq!(info.gesture_type, GestureType::Pinch);
            assert_eq!(info.tag.as_deref(), Some("zoom"));
            if event.scale > 1.0 {
                GestureJudgeResult::Reject
            } else {
                GestureJudgeResult::Continue
            }
        });
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);

    let votes = touch_move(&mut pinch, &mut timers, 0, 80.0, 100.0);
    assert_eq!(votes, vec![GestureDisposal::Reject]);
}

#[test]
fn failed_pinch_ignores_further_samples() {
    let recorded = Recorded::default();
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default().with_callbacks(recorded.callbacks());
    touch_down(&mut pinch, &mut timers, 0, 100.0, 100.0);
    drive(&mut pinch, &mut timers, |pinch, cx| pinch.on_rejected(cx));
    touch_down(&mut pinch, &mut timers, 1, 200.0, 100.0);

    assert_eq!(pinch.state(), RefereeState::Fail);
    assert!(touch_move(&mut pinch, &mut timers, 0, 10.0, 100.0).is_empty());
    assert!(recorded.is_empty());
}

#[test]
fn ctrl_wheel_drives_axis_pinch() {
    let recorded = Recorded::default();
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default().with_callbacks(recorded.callbacks());
    let ctrl = KeyModifiers::NONE.with(KeyModifier::Ctrl);
    let at = Point::new(40.0, 40.0);

    drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_axis(&AxisSample::new(AxisAction::Begin, at, 0).with_modifiers(ctrl), cx)
    });
    assert_eq!(pinch.state(), RefereeState::Detecting);

    let votes = drive(&mut pinch, &mut timers, |pinch, cx| {
        let sample = AxisSample::new(AxisAction::Update, at, 10)
            .with_modifiers(ctrl)
            .with_axes(0.0, -1.0);
        pinch.handle_axis(&sample, cx)
    });
    assert_eq!(votes, vec![GestureDisposal::Accept]);
    assert!((pinch.scale() - 1.1).abs() < 1e-4);
    accept(&mut pinch, &mut timers);

    drive(&mut pinch, &mut timers, |pinch, cx| {
        let sample = AxisSample::new(AxisAction::Update, at, 20)
            .with_modifiers(ctrl)
            .with_axes(0.0, 1.0);
        pinch.handle_axis(&sample, cx)
    });
    assert!((pinch.scale() - 1.0).abs() < 1e-4);

    let update = recorded.last(GestureAction::Update).expect("update fired");
    assert_eq!(update.input_event_type, InputEventType::Axis);
    assert_eq!(update.vertical_axis, 1.0);
    assert_eq!(update.fingers.len(), 1);
}

#[test]
fn axis_scale_never_goes_negative() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();
    let ctrl = KeyModifiers::NONE.with(KeyModifier::Ctrl);
    let at = Point::new(0.0, 0.0);
    drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_axis(&AxisSample::new(AxisAction::Begin, at, 0).with_modifiers(ctrl), cx)
    });
    drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_axis(&AxisSample::new(AxisAction::Update, at, 1).with_axes(0.0, 1.0), cx)
    });
    accept(&mut pinch, &mut timers);
    for time in 2..20 {
        drive(&mut pinch, &mut timers, |pinch, cx| {
            let sample = AxisSample::new(AxisAction::Update, at, time).with_axes(0.0, 1.0);
            pinch.handle_axis(&sample, cx)
        });
    }
    assert_eq!(pinch.scale(), 0.0);
}

#[test]
fn plain_wheel_is_not_a_pinch() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();
    let at = Point::new(0.0, 0.0);
    drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_axis(&AxisSample::new(AxisAction::Begin, at, 0), cx)
    });
    assert_eq!(pinch.state(), RefereeState::Ready);

    let update = drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_axis(&AxisSample::new(AxisAction::Update, at, 5).with_axes(0.0, 3.0), cx)
    });
    assert!(update.is_empty());

    let end = drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_axis(&AxisSample::new(AxisAction::End, at, 9), cx)
    });
    assert_eq!(end, vec![GestureDisposal::Reject]);
}

#[test]
fn rotation_events_are_ignored() {
    let mut timers = TimerQueue::new();
    let mut pinch = PinchRecognizer::default();
    let votes = drive(&mut pinch, &mut timers, |pinch, cx| {
        let sample = AxisSample::new(AxisAction::Begin, Point::new(0.0, 0.0), 0)
            .with_pinch_scale(1.0)
            .rotation();
        pinch.handle_axis(&sample, cx)
    });
    assert!(votes.is_empty());
    assert_eq!(pinch.state(), RefereeState::Ready);
}

#[test]
fn reset_twice_matches_reset_once() {
    let recorded = Recorded::default();
    let (mut once, mut timers) = pinched(&recorded);
    let (mut twice, _) = pinched(&recorded);

    once.reset_status(&mut timers);
    twice.reset_status(&mut timers);
    twice.reset_status(&mut timers);

    for pinch in [&once, &twice] {
        assert_eq!(pinch.state(), RefereeState::Ready);
        assert_eq!(pinch.disposal(), GestureDisposal::None);
        assert_eq!(pinch.active_finger_count(), 0);
        assert_eq!(pinch.scale(), 1.0);
        assert_eq!(pinch.base().current_fingers(), 0);
    }
    assert_eq!(once.fingers(), twice.fingers());
    assert_eq!(format!("{once:?}"), format!("{twice:?}"));
}

#[test]
fn reset_forgets_previous_sequence_timestamp() {
    let old = Recorded::default();
    let (mut pinch, mut timers) = pinched(&old);
    assert_eq!(old.last(GestureAction::Start).map(|event| event.time), Some(16));

    pinch.reset_status(&mut timers);
    let fresh = Recorded::default();
    pinch
        .reconcile_from(
            PinchRecognizer::default().with_callbacks(fresh.callbacks()),
            &mut timers,
        )
        .expect("same configuration reconciles");
    accept(&mut pinch, &mut timers);

    let start = fresh.last(GestureAction::Start).expect("start fired");
    assert_eq!(start.time, 0);
}

#[test]
fn reconcile_with_other_finger_count_resets() {
    let recorded = Recorded::default();
    let (mut pinch, mut timers) = pinched(&recorded);

    let result = pinch.reconcile_from(PinchRecognizer::new(3, 5.0), &mut timers);

    assert_eq!(
        result,
        Err(ReconcileError::ConfigMismatch {
            gesture_type: GestureType::Pinch
        })
    );
    assert_eq!(pinch.state(), RefereeState::Ready);
    assert_eq!(pinch.active_finger_count(), 0);
    assert_eq!(pinch.fingers(), 2);
}

#[test]
fn reconcile_with_same_config_keeps_gesture_and_takes_new_callbacks() {
    let old = Recorded::default();
    let (mut pinch, mut timers) = pinched(&old);
    let new = Recorded::default();

    pinch
        .reconcile_from(
            PinchRecognizer::default().with_callbacks(new.callbacks()),
            &mut timers,
        )
        .expect("same configuration reconciles");
    assert_eq!(pinch.state(), RefereeState::Succeed);

    drive(&mut pinch, &mut timers, |pinch, cx| {
        pinch.handle_touch(&TouchSample::moved(1, Point::new(230.0, 100.0), 70), cx)
    });
    assert_eq!(new.count(GestureAction::Update), 1);
    assert_eq!(old.count(GestureAction::Update), 1);
}
