mod tests {
    use embassy_time::Duration;
    use myrtio_segment_fx::gamma::gamma8;
    use myrtio_segment_fx::math8::{blend8, blend_bytes, progress8, scale8, sine8};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_progress8() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(100)),
            0
        );
        assert_eq!(
            progress8(Duration::from_millis(50), Duration::from_millis(100)),
            127
        );
        assert_eq!(
            progress8(Duration::from_millis(100), Duration::from_millis(100)),
            255
        );
    }

    #[test]
    fn test_sine8_quarter_turns() {
        assert_eq!(sine8(0), 128);
        assert_eq!(sine8(64), 255);
        assert_eq!(sine8(128), 128);
        assert_eq!(sine8(192), 0);
    }

    #[test]
    fn test_gamma8_endpoints() {
        assert_eq!(gamma8(0), 0);
        assert_eq!(gamma8(128), 42);
        assert_eq!(gamma8(255), 255);
    }

    #[test]
    fn test_blend_bytes_endpoints() {
        let from = [0, 255, 100, 7];
        let to = [255, 0, 100, 9];
        let mut dest = [1u8; 4];

        blend_bytes(&mut dest, &from, &to, 0);
        assert_eq!(dest, from);

        blend_bytes(&mut dest, &from, &to, 255);
        assert_eq!(dest, to);
    }

    #[test]
    fn test_blend_bytes_midpoint() {
        let from = [0, 255, 100];
        let to = [255, 0, 100];
        let mut dest = [0u8; 3];

        blend_bytes(&mut dest, &from, &to, 128);
        assert_eq!(dest, [128, 127, 100]);
    }

    #[test]
    fn test_blend_bytes_uses_shortest_slice() {
        let from = [10, 10, 10];
        let to = [20, 20];
        let mut dest = [0u8; 3];

        blend_bytes(&mut dest, &from, &to, 255);
        assert_eq!(dest, [20, 20, 0]);
    }
}
