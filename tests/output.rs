mod tests {
    use myrtio_segment_fx::color::{BLUE, Rgb};
    use myrtio_segment_fx::engine::{Engine, EngineConfig};
    use myrtio_segment_fx::output::SmartLedsOutput;
    use myrtio_segment_fx::pixels::PixelLayout;
    use myrtio_segment_fx::segment::SegmentConfig;
    use myrtio_segment_fx::{Instant, OutputDriver};
    use smart_leds::SmartLedsWrite;

    #[derive(Default)]
    struct FakeStrip {
        frames: Vec<Vec<Rgb>>,
        fail: bool,
    }

    impl SmartLedsWrite for FakeStrip {
        type Error = ();
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            if self.fail {
                return Err(());
            }
            self.frames.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    #[test]
    fn test_decodes_layout_to_rgb() {
        let mut output = SmartLedsOutput::new(FakeStrip::default(), PixelLayout::Grb);
        output.write(&[1, 2, 3, 4, 5, 6]);

        let strip = output.into_inner();
        assert_eq!(strip.frames.len(), 1);
        assert_eq!(strip.frames[0], vec![Rgb::new(2, 1, 3), Rgb::new(5, 4, 6)]);
    }

    #[test]
    fn test_drops_white_channel() {
        let mut output = SmartLedsOutput::new(FakeStrip::default(), PixelLayout::Rgbw);
        output.write(&[1, 2, 3, 200]);
        assert_eq!(output.writer().frames[0], vec![Rgb::new(1, 2, 3)]);
    }

    #[test]
    fn test_counts_failed_writes() {
        let strip = FakeStrip {
            fail: true,
            ..FakeStrip::default()
        };
        let mut output = SmartLedsOutput::new(strip, PixelLayout::Grb);
        output.write(&[0; 3]);
        output.write(&[0; 3]);
        assert_eq!(output.failed_writes(), 2);
    }

    #[test]
    fn test_engine_drives_smart_leds_writer() {
        let output = SmartLedsOutput::new(FakeStrip::default(), PixelLayout::Grb);
        let config =
            EngineConfig::new(4).with_default_segment(SegmentConfig::new(0, 3).with_color(BLUE));
        let mut engine: Engine<_, 8> = Engine::new(output, &config).unwrap();
        engine.start();
        engine.service(Instant::from_millis(0));

        let frames = &engine.driver().writer().frames;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], vec![Rgb::new(0, 0, 255); 4]);
    }
}
