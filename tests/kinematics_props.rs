use bio_snake::game::geometry::{chase, normalize_angle_delta, steer_toward};
use bio_snake::game::{GameConfig, GameEngine, Point, Segment};
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

prop_compose! {
    fn arb_point()(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0
    ) -> Point {
        Point::new(x, y)
    }
}

prop_compose! {
    fn arb_pointer()(
        x in -100.0f64..1100.0,
        y in -100.0f64..700.0
    ) -> Point {
        Point::new(x, y)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_normalize_range_and_period(delta in -10_000.0f64..10_000.0) {
        let wrapped = normalize_angle_delta(delta);
        prop_assert!(wrapped > -PI && wrapped <= PI, "{} wrapped to {}", delta, wrapped);

        let turns = (delta - wrapped) / TAU;
        prop_assert!((turns - turns.round()).abs() < 1e-6,
            "{} and {} differ by {} turns", delta, wrapped, turns);
    }

    #[test]
    fn test_steer_idempotent_at_target(angle in -PI..PI, rate in 0.01f64..1.0) {
        prop_assert_eq!(steer_toward(angle, angle, rate), angle);
    }

    #[test]
    fn test_steer_never_overshoots(
        current in -PI..PI,
        target in -PI..PI,
        rate in 0.01f64..1.0
    ) {
        let gap = normalize_angle_delta(target - current).abs();
        let next = steer_toward(current, target, rate);
        let remaining = normalize_angle_delta(target - next).abs();
        prop_assert!(remaining <= gap + 1e-9);
    }

    #[test]
    fn test_chase_distance(
        leader in arb_point(),
        follower in arb_point(),
        angle in -PI..PI,
        desired in 1.0f64..20.0
    ) {
        let segment = Segment::new(follower.x, follower.y, angle);
        let before = follower.distance_to(leader);
        let after = chase(leader, segment, desired);

        if before <= desired {
            prop_assert_eq!(after, segment);
        } else {
            let dist = after.distance_to(leader);
            prop_assert!((dist - desired).abs() < 1e-6, "landed {} away, wanted {}", dist, desired);
        }
    }

    #[test]
    fn test_step_invariants(
        seed in any::<u64>(),
        pointers in prop::collection::vec(arb_pointer(), 1..200)
    ) {
        let config = GameConfig {
            viewport_width: 1000.0,
            viewport_height: 600.0,
            seed: Some(seed),
            ..GameConfig::default()
        };
        let viewport = config.viewport();
        let mut engine = GameEngine::new(config);
        let mut state = engine.reset();

        for pointer in pointers {
            let result = engine.step(&state, pointer, viewport);
            let next = &result.state;

            prop_assert_eq!(next.food.len(), 3);
            prop_assert!(!next.snake.is_empty());
            prop_assert!(next.score >= state.score);
            prop_assert!(next.length_stat >= state.length_stat);

            if state.is_terminated {
                // Frozen until reset
                prop_assert!(next.is_terminated);
                prop_assert_eq!(&next.snake, &state.snake);
                prop_assert_eq!(&next.food, &state.food);
                prop_assert_eq!(next.score, state.score);
                prop_assert_eq!(next.length_stat, state.length_stat);
                prop_assert_eq!(next.speed, state.speed);
            }

            state = result.state;
        }
    }
}
