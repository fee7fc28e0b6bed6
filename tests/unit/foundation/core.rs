use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.clamp(FrameIndex(99)), FrameIndex(4));
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(2)).is_err());
}

#[test]
fn clock_rejects_degenerate_inputs() {
    assert!(FrameClock::new(0, 1.0).is_err());
    assert!(FrameClock::new(10, 0.0).is_err());
    assert!(FrameClock::new(10, f64::NAN).is_err());
}

#[test]
fn step_mapping_matches_integral_frames_per_step() {
    // 60 frames over 5 steps: 12 frames per step, floor(f / 12) + 1.
    let clock = FrameClock::new(60, 3.0).unwrap();
    for f in 0..60u64 {
        assert_eq!(clock.step_for_frame(FrameIndex(f), 5), (f / 12) as u32 + 1);
    }
}

#[test]
fn fractional_frames_per_step_start_each_step_at_its_floor_boundary() {
    // 60 frames over 7 steps: step k starts at floor((k - 1) * 60 / 7).
    let clock = FrameClock::new(60, 3.0).unwrap();
    assert_eq!(clock.step_for_frame(FrameIndex(7), 7), 1);
    assert_eq!(clock.step_for_frame(FrameIndex(8), 7), 2);
    assert_eq!(clock.first_frame_of_step(2, 7), FrameIndex(8));
    assert_eq!(clock.step_for_frame(FrameIndex(59), 7), 7);
}

#[test]
fn first_frame_of_each_step_maps_back_to_that_step() {
    for (total, max_order) in [(10u64, 3u32), (60, 5), (7, 7), (100, 9), (61, 4)] {
        let clock = FrameClock::new(total, 1.0).unwrap();
        for k in 1..=max_order {
            let f = clock.first_frame_of_step(k, max_order);
            assert_eq!(clock.step_for_frame(f, max_order), k, "T={total} M={max_order} k={k}");
        }
    }
}

#[test]
fn out_of_range_frames_clamp_to_last_step() {
    let clock = FrameClock::new(20, 1.0).unwrap();
    assert_eq!(clock.step_for_frame(FrameIndex(10_000), 4), 4);
    assert_eq!(clock.step_for_frame(FrameIndex(0), 0), 1);
    assert_eq!(clock.secs_at(FrameIndex(10)), 0.5);
}
