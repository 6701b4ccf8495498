//! Parameter controller properties: bounds, idempotence and the tracking
//! gate.

use proptest::prelude::*;

use ascii_gesture::ascii::{DEFAULT_DENSITY, DENSITY_LEVELS};
use ascii_gesture::controller::{
    ControlAction, ParameterController, RenderParameters, BRIGHTNESS_MAX, BRIGHTNESS_MIN,
};
use ascii_gesture::gesture::GestureLabel;

fn any_action() -> impl Strategy<Value = ControlAction> {
    prop_oneof![
        Just(ControlAction::IncreaseBrightness),
        Just(ControlAction::DecreaseBrightness),
        Just(ControlAction::IncreaseDensity),
        Just(ControlAction::DecreaseDensity),
        Just(ControlAction::ToggleTracking),
        Just(ControlAction::Reset),
    ]
}

fn any_gesture() -> impl Strategy<Value = GestureLabel> {
    prop_oneof![
        Just(GestureLabel::ThumbsUp),
        Just(GestureLabel::ThumbsDown),
        Just(GestureLabel::Peace),
        Just(GestureLabel::Fist),
        Just(GestureLabel::None),
    ]
}

proptest! {
    #[test]
    fn brightness_commits_equal_clamped_sum(ups in proptest::collection::vec(any::<bool>(), 0..60)) {
        let mut controller = ParameterController::default();
        let mut expected = 0i32;
        for up in ups {
            if up {
                controller.apply_gesture(GestureLabel::ThumbsUp);
                expected = (expected + 10).clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
            } else {
                controller.apply_gesture(GestureLabel::ThumbsDown);
                expected = (expected - 10).clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
            }
            prop_assert_eq!(controller.current().brightness, expected);
        }
    }

    #[test]
    fn k_thumbs_up_is_clamped_k_steps(k in 0usize..40) {
        let mut controller = ParameterController::default();
        for _ in 0..k {
            controller.apply_gesture(GestureLabel::ThumbsUp);
        }
        let expected = (k as i32 * 10).clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
        prop_assert_eq!(controller.current().brightness, expected);
    }

    #[test]
    fn any_action_sequence_stays_in_bounds(actions in proptest::collection::vec(any_action(), 0..100)) {
        let mut controller = ParameterController::default();
        for action in actions {
            let params = controller.apply(action);
            prop_assert!((BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&params.brightness));
            prop_assert!(params.density < DENSITY_LEVELS);
        }
    }

    #[test]
    fn any_gesture_sequence_stays_in_bounds(labels in proptest::collection::vec(any_gesture(), 0..100)) {
        let mut controller = ParameterController::default();
        for label in labels {
            controller.apply_gesture(label);
            let params = controller.current();
            prop_assert!((BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&params.brightness));
            prop_assert!(params.density < DENSITY_LEVELS);
        }
    }

    #[test]
    fn fist_is_idempotent(actions in proptest::collection::vec(any_action(), 0..30)) {
        let mut controller = ParameterController::default();
        for action in actions {
            controller.apply(action);
        }
        // Fist only acts with tracking on
        if !controller.current().tracking {
            controller.toggle_tracking();
        }
        controller.apply_gesture(GestureLabel::Fist);
        let once = controller.current();
        controller.apply_gesture(GestureLabel::Fist);
        prop_assert_eq!(controller.current(), once);
    }

    #[test]
    fn peace_always_flips_tracking(actions in proptest::collection::vec(any_action(), 0..30)) {
        let mut controller = ParameterController::default();
        for action in actions {
            controller.apply(action);
        }
        let before = controller.current();
        prop_assert!(controller.apply_gesture(GestureLabel::Peace));
        let after = controller.current();
        prop_assert_eq!(after.tracking, !before.tracking);
        prop_assert_eq!(after.brightness, before.brightness);
        prop_assert_eq!(after.density, before.density);
    }
}

#[test]
fn test_initial_state() {
    let params = ParameterController::default().current();
    assert_eq!(
        params,
        RenderParameters {
            brightness: 0,
            density: DEFAULT_DENSITY,
            tracking: true,
        }
    );
}

#[test]
fn test_tracking_off_ignores_other_gestures() {
    let mut controller = ParameterController::default();
    assert!(controller.apply_gesture(GestureLabel::Peace));
    assert!(!controller.current().tracking);

    for label in [GestureLabel::ThumbsUp, GestureLabel::ThumbsDown, GestureLabel::Fist] {
        assert!(!controller.apply_gesture(label));
    }
    assert_eq!(controller.current().brightness, 0);

    assert!(controller.apply_gesture(GestureLabel::Peace));
    assert!(controller.current().tracking);
}

#[test]
fn test_none_is_never_acted_on() {
    let mut controller = ParameterController::default();
    assert!(!controller.apply_gesture(GestureLabel::None));
    assert_eq!(controller.current(), RenderParameters::default());
}

#[test]
fn test_reset_keeps_tracking_and_returns_to_initial() {
    let initial = RenderParameters {
        brightness: 20,
        density: 1,
        tracking: true,
    };
    let mut controller = ParameterController::new(initial, 5);
    controller.increase_brightness();
    controller.increase_density();
    controller.toggle_tracking();

    let params = controller.reset();
    assert_eq!(params.brightness, 20);
    assert_eq!(params.density, 1);
    assert!(!params.tracking);
}

#[test]
fn test_out_of_range_initial_is_clamped() {
    let controller = ParameterController::new(
        RenderParameters {
            brightness: 1000,
            density: 42,
            tracking: true,
        },
        10,
    );
    assert_eq!(controller.current().brightness, BRIGHTNESS_MAX);
    assert_eq!(controller.current().density, DENSITY_LEVELS - 1);
}

#[test]
fn test_density_clamps_at_both_ends() {
    let mut controller = ParameterController::default();
    for _ in 0..10 {
        controller.decrease_density();
    }
    assert_eq!(controller.current().density, 0);
    for _ in 0..10 {
        controller.increase_density();
    }
    assert_eq!(controller.current().density, DENSITY_LEVELS - 1);
}

#[test]
fn test_brightness_mutators_clamp_at_both_ends() {
    let mut controller = ParameterController::new(RenderParameters::default(), 30);
    for _ in 0..5 {
        controller.decrease_brightness();
    }
    assert_eq!(controller.current().brightness, BRIGHTNESS_MIN);
    let params = controller.increase_brightness();
    assert_eq!(params.brightness, BRIGHTNESS_MIN + 30);
}
