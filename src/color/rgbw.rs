use super::Rgb;
use crate::math8::blend8;

/// Segment color with an optional white channel
///
/// Packs to and from `0xWWRRGGBB`, the format used by stored segment
/// configurations. The white channel is ignored on RGB strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

pub const RED: Color = Color::from_u32(0xFF_0000);
pub const GREEN: Color = Color::from_u32(0x00_FF00);
pub const BLUE: Color = Color::from_u32(0x00_00FF);
pub const WHITE: Color = Color::from_u32(0xFF_FFFF);
pub const BLACK: Color = Color::from_u32(0x00_0000);
pub const YELLOW: Color = Color::from_u32(0xFF_FF00);
pub const CYAN: Color = Color::from_u32(0x00_FFFF);
pub const MAGENTA: Color = Color::from_u32(0xFF_00FF);
pub const PURPLE: Color = Color::from_u32(0x40_0080);
pub const ORANGE: Color = Color::from_u32(0xFF_3000);
pub const PINK: Color = Color::from_u32(0xFF_1493);
pub const GRAY: Color = Color::from_u32(0x10_1010);
pub const ULTRAWHITE: Color = Color::from_u32(0xFFFF_FFFF);

impl Color {
    /// Create an RGB color with the white channel off
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }

    /// Create a color including the white channel
    pub const fn with_white(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Create a color from a `0xWWRRGGBB` value
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(value: u32) -> Self {
        Self {
            w: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Pack the color into `0xWWRRGGBB`
    #[allow(clippy::cast_lossless)]
    pub const fn to_u32(self) -> u32 {
        (self.w as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// RGB part of the color
    pub const fn rgb(self) -> Rgb {
        Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Halve every channel
    pub const fn halved(self) -> Self {
        Self::from_u32((self.to_u32() >> 1) & 0x7F7F_7F7F)
    }

    pub const fn is_black(self) -> bool {
        self.to_u32() == 0
    }

    /// Brightest channel, white included
    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b).max(self.w)
    }

    /// Blend towards `other` (0 = all self, 255 = all other)
    pub fn blend(self, other: Self, amount_of_other: u8) -> Self {
        match amount_of_other {
            0 => self,
            255 => other,
            amount => Self {
                r: blend8(self.r, other.r, amount),
                g: blend8(self.g, other.g, amount),
                b: blend8(self.b, other.b, amount),
                w: blend8(self.w, other.w, amount),
            },
        }
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        Self::new(value.r, value.g, value.b)
    }
}

impl From<Color> for Rgb {
    fn from(value: Color) -> Self {
        value.rgb()
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}
