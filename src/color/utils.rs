use super::Color;

/// Position on the red -> green -> blue -> red color wheel
///
/// 0 and 255 are both pure red, 85 is green-ish, 170 is blue-ish.
pub const fn color_wheel(position: u8) -> Color {
    let pos = 255 - position;
    if pos < 85 {
        Color::new(255 - pos * 3, 0, pos * 3)
    } else if pos < 170 {
        let pos = pos - 85;
        Color::new(0, pos * 3, 255 - pos * 3)
    } else {
        let pos = pos - 170;
        Color::new(pos * 3, 255 - pos * 3, 0)
    }
}
