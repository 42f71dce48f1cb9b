mod tests {
    use myrtio_segment_fx::segment::{FadeRate, SegmentOptions, SegmentSize};

    #[test]
    fn test_options_pack_bit_exact() {
        let options = SegmentOptions::NONE
            .with_reverse(true)
            .with_fade_rate(FadeRate::Medium)
            .with_gamma(true)
            .with_size(SegmentSize::Large);
        assert_eq!(options.to_bits(), 0b1011_1100);
        assert_eq!(SegmentOptions::from_bits(0b1011_1100), options);
    }

    #[test]
    fn test_options_single_fields() {
        assert_eq!(SegmentOptions::NONE.with_reverse(true).to_bits(), 0x80);
        assert_eq!(SegmentOptions::NONE.with_gamma(true).to_bits(), 0x08);
        assert_eq!(
            SegmentOptions::NONE
                .with_fade_rate(FadeRate::Glacial)
                .to_bits(),
            0x70
        );
        assert_eq!(
            SegmentOptions::NONE
                .with_size(SegmentSize::ExtraLarge)
                .to_bits(),
            0x06
        );
    }

    #[test]
    fn test_options_reserved_bit_is_dropped() {
        assert_eq!(SegmentOptions::from_bits(0x01), SegmentOptions::NONE);
        assert_eq!(u8::from(SegmentOptions::from(0xFF)), 0xFE);
    }

    #[test]
    fn test_fade_rate_decodes_low_bits() {
        assert_eq!(FadeRate::from_bits(0), FadeRate::Halving);
        assert_eq!(FadeRate::from_bits(9), FadeRate::ExtraFast);
        assert_eq!(FadeRate::Slow.bits(), 4);
    }

    #[test]
    fn test_size_pixels() {
        assert_eq!(SegmentSize::Small.pixels(), 1);
        assert_eq!(SegmentSize::Medium.pixels(), 2);
        assert_eq!(SegmentSize::Large.pixels(), 4);
        assert_eq!(SegmentSize::ExtraLarge.pixels(), 8);
    }
}
