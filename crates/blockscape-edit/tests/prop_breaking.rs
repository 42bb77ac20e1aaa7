use blockscape_edit::{BreakProgress, BreakTick};
use proptest::prelude::*;

proptest! {
    // Holding for less than the threshold and letting go never breaks and
    // leaves no damage behind.
    #[test]
    fn release_before_threshold_is_a_no_op(
        threshold in 0.2f32..5.0,
        frames in prop::collection::vec(0.001f32..0.05, 1..200),
    ) {
        let mut b = BreakProgress::new();
        b.hold(0.0, threshold);
        let mut total = 0.0;
        for dt in frames {
            if total + dt >= threshold {
                break;
            }
            total += dt;
            let tick = b.hold(dt, threshold);
            let damaged = matches!(tick, BreakTick::Damaged { damage, .. } if (0.0..100.0).contains(&damage));
            prop_assert!(damaged);
        }
        b.release();
        prop_assert_eq!(b.damage(), 0.0);
        prop_assert!(!b.is_breaking());
    }

    #[test]
    fn reaching_the_threshold_breaks_exactly_once(
        threshold in 0.2f32..2.0,
        dt in 0.01f32..0.1,
    ) {
        let mut b = BreakProgress::new();
        b.hold(0.0, threshold);
        let mut broken = 0;
        let mut total = 0.0;
        while total < threshold {
            total += dt;
            if b.hold(dt, threshold) == BreakTick::Broken {
                broken += 1;
            }
        }
        prop_assert_eq!(broken, 1);
        prop_assert_eq!(b.elapsed(), 0.0);
    }
}
