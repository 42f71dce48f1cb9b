mod tests {
    use myrtio_segment_fx::color::{BLUE, RED};
    use myrtio_segment_fx::engine::{Engine, EngineConfig};
    use myrtio_segment_fx::mode::ModeId;
    use myrtio_segment_fx::output::NoOutput;
    use myrtio_segment_fx::segment::{SPEED_MIN, SegmentConfig, SegmentError};
    use myrtio_segment_fx::{Duration, Instant};

    type TestEngine = Engine<NoOutput, 30>;

    fn engine() -> TestEngine {
        Engine::new(NoOutput, &EngineConfig::new(30)).unwrap()
    }

    #[test]
    fn test_default_segment_is_active() {
        let engine = engine();
        let segment = engine.segment(0).unwrap();
        assert_eq!((segment.start(), segment.stop()), (0, 29));
        assert_eq!(segment.mode(), ModeId::Static);
        assert_eq!(segment.color(), RED);
        assert_eq!(segment.speed(), 1000);
        assert!(engine.is_active_segment(0));
        assert_eq!(engine.num_segments(), 1);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_set_segment_clamps_range_and_speed() {
        let mut engine = engine();
        engine
            .set_segment(1, SegmentConfig::new(20, 100).with_speed(1))
            .unwrap();
        let segment = engine.segment(1).unwrap();
        assert_eq!((segment.start(), segment.stop()), (20, 29));
        assert_eq!(segment.speed(), SPEED_MIN);

        engine.set_segment(2, SegmentConfig::new(40, 35)).unwrap();
        let segment = engine.segment(2).unwrap();
        assert_eq!((segment.start(), segment.stop()), (29, 29));
        assert_eq!(segment.len(), 1);
        assert!(!segment.is_empty());
    }

    #[test]
    fn test_set_segment_rejects_invalid_slot() {
        let mut engine = engine();
        assert_eq!(
            engine.set_segment(10, SegmentConfig::new(0, 5)),
            Err(SegmentError::InvalidSlot)
        );
        assert_eq!(engine.num_segments(), 1);
        assert!(engine.segment(10).is_none());
    }

    #[test]
    fn test_activation_is_idempotent() {
        let mut engine = engine();
        engine.set_segment(1, SegmentConfig::new(0, 9)).unwrap();
        assert_eq!(engine.add_active_segment(1), Ok(()));
        let before = engine.active_segments().as_slice().to_vec();

        assert_eq!(
            engine.add_active_segment(1),
            Err(SegmentError::AlreadyActive)
        );
        assert_eq!(engine.active_segments().as_slice(), before.as_slice());
        assert_eq!(engine.active_segments().count(), 2);
    }

    #[test]
    fn test_unconfigured_slot_cannot_be_activated() {
        let mut engine = engine();
        assert_eq!(engine.add_active_segment(3), Err(SegmentError::InvalidSlot));
        assert_eq!(
            engine.add_active_segment(200),
            Err(SegmentError::InvalidSlot)
        );
        assert!(!engine.is_active_segment(3));
    }

    #[test]
    fn test_remove_then_add_membership() {
        let mut engine = engine();
        engine.remove_active_segment(0).unwrap();
        assert!(!engine.is_active_segment(0));
        assert_eq!(
            engine.remove_active_segment(0),
            Err(SegmentError::NotActive)
        );

        engine.add_active_segment(0).unwrap();
        assert!(engine.is_active_segment(0));
    }

    #[test]
    fn test_remove_leaves_hole_reused_by_add() {
        let mut engine = engine();
        for slot in 1..=3 {
            engine
                .set_segment(slot, SegmentConfig::new(0, u16::from(slot)))
                .unwrap();
        }
        engine.add_active_segment(1).unwrap();
        engine.add_active_segment(2).unwrap();

        engine.remove_active_segment(1).unwrap();
        assert_eq!(
            &engine.active_segments().as_slice()[..3],
            &[Some(0), None, Some(2)]
        );

        engine.add_active_segment(3).unwrap();
        assert_eq!(
            &engine.active_segments().as_slice()[..3],
            &[Some(0), Some(3), Some(2)]
        );
    }

    #[test]
    fn test_active_index_full() {
        let mut engine: Engine<NoOutput, 30, 4, 2> =
            Engine::new(NoOutput, &EngineConfig::new(30)).unwrap();
        engine.set_segment(1, SegmentConfig::new(0, 4)).unwrap();
        engine.set_segment(2, SegmentConfig::new(5, 9)).unwrap();
        engine.add_active_segment(1).unwrap();

        assert_eq!(
            engine.add_active_segment(2),
            Err(SegmentError::ActiveIndexFull)
        );
        assert_eq!(engine.active_segments().as_slice(), &[Some(0), Some(1)]);
    }

    #[test]
    fn test_swap_keeps_position_and_timer() {
        let mut engine = engine();
        engine.set_segment(1, SegmentConfig::new(0, 9)).unwrap();
        engine.set_segment(2, SegmentConfig::new(10, 19)).unwrap();
        engine.add_active_segment(1).unwrap();
        engine.start();
        engine.service(Instant::from_millis(0));
        let next_time = engine.segment_runtime(1).unwrap().next_time;

        engine.swap_active_segment(1, 2).unwrap();

        assert_eq!(&engine.active_segments().as_slice()[..2], &[Some(0), Some(2)]);
        let runtime = engine.segment_runtime(2).unwrap();
        assert_eq!(runtime.next_time, next_time);
        assert_eq!(runtime.counter_mode_call, 0);
        assert_eq!(runtime.aux_param3, 2);
        assert!(!engine.is_active_segment(1));
    }

    #[test]
    fn test_swap_rejections() {
        let mut engine = engine();
        engine.set_segment(1, SegmentConfig::new(0, 9)).unwrap();
        engine.set_segment(2, SegmentConfig::new(0, 9)).unwrap();
        engine.add_active_segment(1).unwrap();

        assert_eq!(
            engine.swap_active_segment(0, 1),
            Err(SegmentError::AlreadyActive)
        );
        assert_eq!(
            engine.swap_active_segment(2, 0),
            Err(SegmentError::AlreadyActive)
        );
        assert_eq!(
            engine.swap_active_segment(2, 2),
            Err(SegmentError::NotActive)
        );
        assert_eq!(
            engine.swap_active_segment(0, 7),
            Err(SegmentError::InvalidSlot)
        );
    }

    #[test]
    fn test_add_resets_runtime() {
        let mut engine = engine();
        engine.start();
        engine.service(Instant::from_millis(0));
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 1);

        engine.remove_active_segment(0).unwrap();
        engine.add_active_segment(0).unwrap();
        let runtime = engine.segment_runtime(0).unwrap();
        assert_eq!(runtime.counter_mode_call, 0);
        assert_eq!(runtime.next_time, Instant::from_millis(0));
    }

    #[test]
    fn test_mode_change_resets_runtime() {
        let mut engine = engine();
        engine.start();
        engine.service(Instant::from_millis(0));

        engine.set_mode(0, ModeId::Rainbow).unwrap();
        assert_eq!(engine.mode(0), Some(ModeId::Rainbow));
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 0);
        assert_eq!(engine.next_due(), Some(Instant::from_millis(0)));
    }

    #[test]
    fn test_set_segment_on_active_slot_resets_runtime() {
        let mut engine = engine();
        engine.start();
        engine.service(Instant::from_millis(0));
        assert_eq!(engine.next_due(), Some(Instant::from_millis(1000)));

        engine
            .set_segment(0, SegmentConfig::new(0, 29).with_color(BLUE))
            .unwrap();
        assert_eq!(engine.next_due(), Some(Instant::from_millis(0)));
        assert_eq!(engine.color(0), Some(BLUE));
    }

    #[test]
    fn test_idle_segment_is_not_scheduled() {
        let mut engine = engine();
        engine
            .set_idle_segment(0, SegmentConfig::new(0, 9))
            .unwrap();
        assert!(!engine.is_active_segment(0));
        assert!(engine.segment(0).is_some());
    }

    #[test]
    fn test_segment_count() {
        let mut engine = engine();
        engine.set_segment(4, SegmentConfig::new(0, 1)).unwrap();
        engine.add_active_segment(4).unwrap();
        assert_eq!(engine.num_segments(), 5);

        engine.set_num_segments(2);
        assert_eq!(engine.num_segments(), 1);
        assert!(engine.segment(4).is_none());
        assert!(!engine.is_active_segment(4));

        engine.reset_segments();
        assert_eq!(engine.num_segments(), 0);
        assert_eq!(engine.active_segments().count(), 0);
    }

    #[test]
    fn test_speed_adjustments_are_clamped() {
        let mut engine = engine();
        engine.increase_speed(0, 100).unwrap();
        assert_eq!(engine.speed(0), Some(1100));
        engine.decrease_speed(0, 2000).unwrap();
        assert_eq!(engine.speed(0), Some(SPEED_MIN));
        engine.increase_speed(0, u16::MAX).unwrap();
        assert_eq!(engine.speed(0), Some(u16::MAX));
        assert_eq!(engine.set_speed(9, 100), Err(SegmentError::InvalidSlot));
    }

    #[test]
    fn test_setters_on_unconfigured_slot_fail() {
        let mut engine = engine();
        assert_eq!(engine.set_color(5, BLUE), Err(SegmentError::InvalidSlot));
        assert_eq!(
            engine.set_mode(5, ModeId::Blink),
            Err(SegmentError::InvalidSlot)
        );
        assert_eq!(engine.color(5), None);
    }

    #[test]
    fn test_next_due_follows_returned_delay() {
        let mut engine = engine();
        engine.set_speed(0, 250).unwrap();
        engine.start();
        let now = Instant::from_millis(40);
        engine.service(now);
        assert_eq!(engine.next_due(), Some(now + Duration::from_millis(250)));
    }
}
