//! Per-segment option flags
//!
//! Stored configurations pack the options into a single byte:
//!
//! | bit | meaning                 |
//! |-----|-------------------------|
//! | 7   | reverse animation       |
//! | 4-6 | fade rate (0-7)         |
//! | 3   | gamma correction        |
//! | 1-2 | size class (0-3)        |
//! | 0   | reserved, always zero   |

const REVERSE_BIT: u8 = 0b1000_0000;
const FADE_SHIFT: u8 = 4;
const FADE_MASK: u8 = 0b0111;
const GAMMA_BIT: u8 = 0b0000_1000;
const SIZE_SHIFT: u8 = 1;
const SIZE_MASK: u8 = 0b0011;

/// How fast fading modes move pixels towards the background color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FadeRate {
    /// Halve every channel on each step
    #[default]
    Halving = 0,
    ExtraFast = 1,
    Fast = 2,
    Medium = 3,
    Slow = 4,
    ExtraSlow = 5,
    ExtraExtraSlow = 6,
    Glacial = 7,
}

impl FadeRate {
    const ALL: [Self; 8] = [
        Self::Halving,
        Self::ExtraFast,
        Self::Fast,
        Self::Medium,
        Self::Slow,
        Self::ExtraSlow,
        Self::ExtraExtraSlow,
        Self::Glacial,
    ];

    /// Decode a rate, keeping only the low three bits
    pub const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & FADE_MASK) as usize]
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Shift amounts used to step a channel towards its target
    ///
    /// Returns `None` for [`FadeRate::Halving`], which does not use a target.
    pub(crate) const fn shifts(self) -> Option<(u8, u8)> {
        match self {
            Self::Halving => None,
            Self::ExtraFast => Some((1, 2)),
            Self::Fast => Some((1, 3)),
            Self::Medium => Some((1, 8)),
            Self::Slow => Some((2, 8)),
            Self::ExtraSlow => Some((3, 8)),
            Self::ExtraExtraSlow => Some((4, 8)),
            Self::Glacial => Some((6, 8)),
        }
    }
}

/// Size class of the moving elements of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SegmentSize {
    #[default]
    Small = 0,
    Medium = 1,
    Large = 2,
    ExtraLarge = 3,
}

impl SegmentSize {
    const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::ExtraLarge];

    pub const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & SIZE_MASK) as usize]
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Element width in pixels: 1, 2, 4 or 8
    pub const fn pixels(self) -> u16 {
        1 << self.bits()
    }
}

/// Decoded segment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentOptions {
    /// Run the animation from `stop` towards `start`
    pub reverse: bool,
    pub fade_rate: FadeRate,
    /// Apply gamma correction to every pixel written by the mode
    pub gamma: bool,
    pub size: SegmentSize,
}

impl SegmentOptions {
    pub const NONE: Self = Self {
        reverse: false,
        fade_rate: FadeRate::Halving,
        gamma: false,
        size: SegmentSize::Small,
    };

    /// Decode from the packed byte; the reserved bit is dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            reverse: bits & REVERSE_BIT != 0,
            fade_rate: FadeRate::from_bits(bits >> FADE_SHIFT),
            gamma: bits & GAMMA_BIT != 0,
            size: SegmentSize::from_bits(bits >> SIZE_SHIFT),
        }
    }

    /// Encode into the packed byte
    pub const fn to_bits(self) -> u8 {
        let mut bits = (self.fade_rate.bits() << FADE_SHIFT) | (self.size.bits() << SIZE_SHIFT);
        if self.reverse {
            bits |= REVERSE_BIT;
        }
        if self.gamma {
            bits |= GAMMA_BIT;
        }
        bits
    }

    #[must_use]
    pub const fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub const fn with_fade_rate(mut self, fade_rate: FadeRate) -> Self {
        self.fade_rate = fade_rate;
        self
    }

    #[must_use]
    pub const fn with_gamma(mut self, gamma: bool) -> Self {
        self.gamma = gamma;
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: SegmentSize) -> Self {
        self.size = size;
        self
    }
}

impl From<u8> for SegmentOptions {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<SegmentOptions> for u8 {
    fn from(options: SegmentOptions) -> Self {
        options.to_bits()
    }
}
