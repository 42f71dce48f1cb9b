mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use myrtio_segment_fx::color::{BLACK, BLUE, Color, GREEN, RED};
    use myrtio_segment_fx::engine::{Engine, EngineConfig};
    use myrtio_segment_fx::mode::{ModeContext, ModeId};
    use myrtio_segment_fx::pixels::{ConfigError, PixelLayout};
    use myrtio_segment_fx::segment::{SegmentConfig, SegmentOptions};
    use myrtio_segment_fx::{Instant, OutputDriver};

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        last: Vec<u8>,
    }

    impl OutputDriver for Recorder {
        fn write(&mut self, pixels: &[u8]) {
            self.frames += 1;
            self.last = pixels.to_vec();
        }
    }

    fn engine(config: &EngineConfig) -> Engine<Recorder, 30> {
        Engine::new(Recorder::default(), config).unwrap()
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn green_mode(ctx: &mut ModeContext<'_>) -> u16 {
        ctx.fill(GREEN);
        ctx.set_cycle();
        50
    }

    #[test]
    fn test_static_segment_renders_once_per_period() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.start();

        assert!(engine.service(at(0)));
        for index in 0..30 {
            assert_eq!(engine.pixel_color(index), RED);
        }
        assert_eq!(&engine.pixels()[..3], &[0, 255, 0]);
        assert_eq!(engine.driver().frames, 1);
        assert_eq!(engine.driver().last.len(), 90);

        assert!(!engine.service(at(0)));
        assert!(!engine.service(at(999)));
        assert_eq!(engine.driver().frames, 1);

        assert!(engine.service(at(1000)));
        assert_eq!(engine.driver().frames, 2);
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 2);
    }

    #[test]
    fn test_stopped_engine_does_nothing() {
        let mut engine = engine(&EngineConfig::new(30));
        assert!(!engine.service(at(0)));
        assert_eq!(engine.driver().frames, 0);
        assert!(engine.pixels().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_trigger_forces_render() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.start();
        engine.service(at(0));

        engine.trigger();
        assert!(engine.is_triggered());
        assert!(engine.service(at(10)));
        assert!(!engine.is_triggered());
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 2);
        assert_eq!(engine.next_due(), Some(at(1010)));
    }

    #[test]
    fn test_trigger_survives_pause() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.start();
        engine.service(at(0));

        engine.pause();
        engine.trigger();
        assert!(!engine.service(at(1)));
        assert!(engine.is_triggered());

        engine.resume();
        assert!(engine.service(at(1)));
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 2);
    }

    #[test]
    fn test_later_segment_wins_on_overlap() {
        let config =
            EngineConfig::new(30).with_default_segment(SegmentConfig::new(0, 9).with_color(RED));
        let mut engine = engine(&config);
        engine
            .set_segment(1, SegmentConfig::new(5, 14).with_color(BLUE))
            .unwrap();
        engine.add_active_segment(1).unwrap();
        engine.start();

        assert!(engine.service(at(0)));
        assert_eq!(engine.pixel_color(3), RED);
        assert_eq!(engine.pixel_color(7), BLUE);
        assert_eq!(engine.pixel_color(12), BLUE);
        assert_eq!(engine.pixel_color(20), BLACK);
    }

    #[test]
    fn test_stop_blanks_strip() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.start();
        engine.service(at(0));

        engine.stop();
        assert!(!engine.is_running());
        assert!(engine.pixels().iter().all(|&byte| byte == 0));
        assert_eq!(engine.driver().frames, 2);
        assert!(engine.driver().last.iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_next_due() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.start();
        assert_eq!(engine.next_due(), Some(at(0)));
        engine.service(at(0));
        assert_eq!(engine.next_due(), Some(at(1000)));

        engine.remove_active_segment(0).unwrap();
        assert_eq!(engine.next_due(), None);
    }

    #[test]
    fn test_custom_mode() {
        let mut engine = engine(&EngineConfig::new(30));
        let id = engine.set_custom_mode(0, "Green", green_mode);
        assert_eq!(id, Some(ModeId::Custom0));
        assert_eq!(engine.set_custom_mode(8, "Nope", green_mode), None);
        assert_eq!(engine.mode_name(ModeId::Custom0), "Green");
        assert_eq!(engine.modes().find("Green"), Some(ModeId::Custom0));

        engine.set_mode(0, ModeId::Custom0).unwrap();
        engine.start();
        assert!(engine.service(at(0)));
        assert_eq!(engine.pixel_color(29), GREEN);
        assert!(engine.is_cycle(0));
        assert_eq!(engine.next_due(), Some(at(50)));
    }

    #[test]
    fn test_unregistered_custom_mode_idles() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.set_mode(0, ModeId::Custom1).unwrap();
        engine.start();

        assert!(!engine.service(at(0)));
        assert_eq!(engine.driver().frames, 0);
        assert_eq!(engine.next_due(), Some(at(1000)));
        assert_eq!(engine.mode_name(ModeId::Custom1), "Custom 1");
    }

    #[test]
    fn test_set_frame_forces_flush() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.set_mode(0, ModeId::Custom2).unwrap();
        engine.start();
        engine.service(at(0));

        engine.set_frame(0);
        assert!(engine.is_frame(0));
        assert!(engine.service(at(1000)));
        assert!(!engine.is_frame(0));
    }

    #[test]
    fn test_set_frame_flushes_segment_that_is_not_due() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.start();
        assert!(engine.service(at(0)));
        assert_eq!(engine.next_due(), Some(at(1000)));

        engine.set_frame(0);
        assert!(engine.service(at(10)));
        assert_eq!(engine.driver().frames, 2);
        assert!(!engine.is_frame(0));
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 1);

        assert!(!engine.service(at(20)));
        assert_eq!(engine.driver().frames, 2);
    }

    #[test]
    fn test_trigger_renders_every_active_segment() {
        let config =
            EngineConfig::new(30).with_default_segment(SegmentConfig::new(0, 9).with_speed(100));
        let mut engine = engine(&config);
        engine
            .set_segment(1, SegmentConfig::new(10, 19).with_speed(60_000))
            .unwrap();
        engine.add_active_segment(1).unwrap();
        engine.start();
        engine.service(at(0));

        engine.trigger();
        assert!(engine.service(at(5)));
        assert_eq!(engine.segment_runtime(0).unwrap().counter_mode_call, 2);
        assert_eq!(engine.segment_runtime(1).unwrap().counter_mode_call, 2);
        assert_eq!(engine.segment_runtime(1).unwrap().next_time, at(60_005));
    }

    #[test]
    fn test_flags_are_cleared_on_segments_that_did_not_run() {
        let config =
            EngineConfig::new(30).with_default_segment(SegmentConfig::new(0, 9).with_speed(100));
        let mut engine = engine(&config);
        engine
            .set_segment(1, SegmentConfig::new(10, 19).with_speed(60_000))
            .unwrap();
        engine.add_active_segment(1).unwrap();
        engine.start();

        engine.service(at(0));
        assert!(engine.is_cycle(0));
        assert!(engine.is_cycle(1));

        engine.set_frame(1);
        assert!(engine.service(at(100)));
        assert!(engine.is_cycle(0));
        assert!(!engine.is_cycle(1));
        assert!(!engine.is_frame(1));
        assert_eq!(engine.segment_runtime(1).unwrap().counter_mode_call, 1);
    }

    #[test]
    fn test_fill_without_count_blanks_to_end() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.fill(RED, 0, 30);
        engine.fill(BLACK, 5, 0);

        assert_eq!(engine.pixel_color(4), RED);
        assert_eq!(engine.pixel_color(5), BLACK);
        assert_eq!(engine.pixel_color(29), BLACK);

        engine.fill(BLACK, 0, 0);
        assert_eq!(engine.intensity_sum(), 0);
    }

    static SHOWN: AtomicUsize = AtomicUsize::new(0);

    fn count_show(pixels: &[u8]) {
        assert_eq!(pixels.len(), 90);
        SHOWN.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_custom_show_replaces_driver() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.set_custom_show(count_show);
        engine.start();
        engine.service(at(0));

        assert_eq!(SHOWN.load(Ordering::SeqCst), 1);
        assert_eq!(engine.driver().frames, 0);

        engine.clear_custom_show();
        engine.show();
        assert_eq!(engine.driver().frames, 1);
        assert_eq!(SHOWN.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_brightness_scales_output() {
        let mut engine = engine(&EngineConfig::new(30).with_brightness(128));
        engine.start();
        engine.service(at(0));

        assert_eq!(engine.pixels()[1], 128);
        assert_eq!(engine.intensity_sum(), 3840);
        assert_eq!(engine.intensity_sums(), [3840, 0, 0, 0]);
        assert_eq!(engine.brightness(), 128);

        engine.increase_brightness(200);
        assert_eq!(engine.brightness(), 255);
        engine.decrease_brightness(255);
        assert_eq!(engine.brightness(), 0);
        assert_eq!(engine.intensity_sum(), 0);
    }

    #[test]
    fn test_rgbw_layout() {
        let engine = engine(&EngineConfig::new(30).with_layout(PixelLayout::Rgbw));
        assert_eq!(engine.num_bytes(), 120);
        assert_eq!(engine.bytes_per_pixel(), 4);
        assert_eq!(engine.length(), 30);
    }

    #[test]
    fn test_config_errors() {
        let result: Result<Engine<Recorder, 30>, _> =
            Engine::new(Recorder::default(), &EngineConfig::new(31));
        assert!(matches!(
            result,
            Err(ConfigError::LengthExceedsCapacity {
                length: 31,
                capacity: 30
            })
        ));

        let result: Result<Engine<Recorder, 30>, _> =
            Engine::new(Recorder::default(), &EngineConfig::new(0));
        assert!(matches!(result, Err(ConfigError::EmptyStrip)));
    }

    #[test]
    fn test_gamma_option() {
        let segment = SegmentConfig::new(0, 29)
            .with_color(Color::new(128, 0, 0))
            .with_options(SegmentOptions::NONE.with_gamma(true));
        let mut engine = engine(&EngineConfig::new(30).with_default_segment(segment));
        engine.start();
        engine.service(at(0));

        assert_eq!(&engine.pixels()[..3], &[0, 42, 0]);
    }

    #[test]
    fn test_reverse_wipe_starts_at_stop() {
        let segment = SegmentConfig::new(0, 4).with_mode(ModeId::ColorWipe);
        let mut forward = engine(&EngineConfig::new(30).with_default_segment(segment));
        let mut reverse = engine(&EngineConfig::new(30).with_default_segment(segment.reversed()));
        forward.start();
        reverse.start();
        forward.service(at(0));
        reverse.service(at(0));

        assert_eq!(forward.pixel_color(0), RED);
        assert_eq!(forward.pixel_color(4), BLACK);
        assert_eq!(reverse.pixel_color(4), RED);
        assert_eq!(reverse.pixel_color(0), BLACK);
    }

    #[test]
    fn test_pixel_helpers() {
        let mut engine = engine(&EngineConfig::new(30));
        engine.fill(BLUE, 10, 5);
        engine.copy_pixels(0, 10, 2);
        engine.set_pixel_color(29, GREEN);
        engine.set_pixel_color(30, GREEN);

        assert_eq!(engine.pixel_color(1), BLUE);
        assert_eq!(engine.pixel_color(14), BLUE);
        assert_eq!(engine.pixel_color(15), BLACK);
        assert_eq!(engine.pixel_color(29), GREEN);

        engine.clear();
        assert_eq!(engine.intensity_sum(), 0);
        assert_eq!(engine.driver().frames, 0);
    }

    #[test]
    fn test_random_seed_is_reproducible() {
        let mut first = engine(&EngineConfig::new(30));
        let mut second = engine(&EngineConfig::new(30));
        first.set_random_seed(7);
        second.set_random_seed(7);
        let a: Vec<u16> = (0..8).map(|_| first.random16()).collect();
        let b: Vec<u16> = (0..8).map(|_| second.random16()).collect();
        assert_eq!(a, b);
    }
}
