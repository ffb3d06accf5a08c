use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use fruit_ninja::compute::{init_state, update};
use fruit_ninja::entities::*;
use fruit_ninja::input::TickInput;

fn level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Classic),
        Just(Level::SpeedRush),
        Just(Level::ChaosSlice),
    ]
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(left, right, up, down)| TickInput {
            quit: false,
            left,
            right,
            up,
            down,
        },
    )
}

proptest! {
    #[test]
    fn blade_and_objects_stay_inside_interior(
        level in level(),
        seed in any::<u64>(),
        inputs in prop::collection::vec(tick_input(), 1..400),
    ) {
        let mut s = init_state(level);
        let mut rng = StdRng::seed_from_u64(seed);
        for input in &inputs {
            update(&mut s, input, &mut rng);
            prop_assert!((1..=WIDTH - 2).contains(&s.blade.x));
            prop_assert!((1..=HEIGHT - 2).contains(&s.blade.y));
            for o in s.objects.active() {
                prop_assert!((1..=WIDTH - 2).contains(&o.x));
                prop_assert!((1..=HEIGHT - 2).contains(&o.y));
            }
            prop_assert!(s.objects.active_count() <= MAX_OBJECTS);
        }
    }

    #[test]
    fn score_is_monotonic_in_fruit_steps(
        level in level(),
        seed in any::<u64>(),
        inputs in prop::collection::vec(tick_input(), 1..400),
    ) {
        let mut s = init_state(level);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut last = 0;
        for input in &inputs {
            update(&mut s, input, &mut rng);
            prop_assert!(s.score >= last);
            prop_assert_eq!((s.score - last) % FRUIT_POINTS, 0);
            last = s.score;
        }
    }
}
