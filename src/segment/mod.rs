//! Segment configuration
//!
//! A segment is an inclusive pixel range with its own mode, speed, colors and
//! options. Configurations are validated on the way in, so a stored
//! [`Segment`] always satisfies `start <= stop < strip length` and
//! `SPEED_MIN <= speed <= SPEED_MAX`.

mod active;
mod options;
mod runtime;

pub use active::ActiveSegments;
pub use options::{FadeRate, SegmentOptions, SegmentSize};
pub use runtime::SegmentRuntime;

use crate::color::{BLACK, Color, RED};
use crate::mode::ModeId;

/// Shortest allowed animation period
pub const SPEED_MIN: u16 = 10;
/// Longest allowed animation period
pub const SPEED_MAX: u16 = u16::MAX;
pub const DEFAULT_SPEED: u16 = 1000;
pub const DEFAULT_COLOR: Color = RED;
pub const DEFAULT_COLORS: [Color; MAX_NUM_COLORS] = [DEFAULT_COLOR, BLACK, BLACK];
/// Colors per segment
pub const MAX_NUM_COLORS: usize = 3;

/// Reasons a segment operation is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// Slot index is outside the segment store
    InvalidSlot,
    /// Segment is already in the active index
    AlreadyActive,
    /// Segment is not in the active index
    NotActive,
    /// Every position of the active index is taken
    ActiveIndexFull,
}

/// Requested segment configuration
///
/// Values are clamped when the configuration is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentConfig {
    pub start: u16,
    pub stop: u16,
    pub mode: ModeId,
    pub colors: [Color; MAX_NUM_COLORS],
    pub speed: u16,
    pub options: SegmentOptions,
}

impl SegmentConfig {
    /// Static red segment over `start..=stop`
    pub const fn new(start: u16, stop: u16) -> Self {
        Self {
            start,
            stop,
            mode: ModeId::Static,
            colors: DEFAULT_COLORS,
            speed: DEFAULT_SPEED,
            options: SegmentOptions::NONE,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: ModeId) -> Self {
        self.mode = mode;
        self
    }

    /// Use a single primary color, the others become black
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.colors = [color, BLACK, BLACK];
        self
    }

    #[must_use]
    pub const fn with_colors(mut self, colors: [Color; MAX_NUM_COLORS]) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub const fn with_speed(mut self, speed: u16) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: SegmentOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn reversed(mut self) -> Self {
        self.options.reverse = true;
        self
    }
}

/// Stored segment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    start: u16,
    stop: u16,
    speed: u16,
    mode: ModeId,
    options: SegmentOptions,
    colors: [Color; MAX_NUM_COLORS],
}

impl Segment {
    /// Validate a configuration against a strip of `length` pixels
    pub fn from_config(config: &SegmentConfig, length: u16) -> Self {
        let last = length.saturating_sub(1);
        let stop = config.stop.min(last);
        let start = config.start.min(stop);
        Self {
            start,
            stop,
            speed: clamp_speed(config.speed),
            mode: config.mode,
            options: config.options,
            colors: config.colors,
        }
    }

    pub const fn start(&self) -> u16 {
        self.start
    }

    pub const fn stop(&self) -> u16 {
        self.stop
    }

    /// Number of pixels in the segment
    pub const fn len(&self) -> u16 {
        self.stop - self.start + 1
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn speed(&self) -> u16 {
        self.speed
    }

    pub const fn mode(&self) -> ModeId {
        self.mode
    }

    pub const fn options(&self) -> SegmentOptions {
        self.options
    }

    pub const fn colors(&self) -> &[Color; MAX_NUM_COLORS] {
        &self.colors
    }

    /// Primary color
    pub const fn color(&self) -> Color {
        self.colors[0]
    }

    pub const fn is_reverse(&self) -> bool {
        self.options.reverse
    }

    pub(crate) fn set_speed(&mut self, speed: u16) {
        self.speed = clamp_speed(speed);
    }

    pub(crate) fn set_mode(&mut self, mode: ModeId) {
        self.mode = mode;
    }

    pub(crate) fn set_options(&mut self, options: SegmentOptions) {
        self.options = options;
    }

    pub(crate) fn set_colors(&mut self, colors: [Color; MAX_NUM_COLORS]) {
        self.colors = colors;
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.colors[0] = color;
    }
}

/// Clamp a speed into `SPEED_MIN..=SPEED_MAX`
///
/// `SPEED_MAX` is the top of the `u16` range, so only the lower bound bites.
pub const fn clamp_speed(speed: u16) -> u16 {
    if speed < SPEED_MIN { SPEED_MIN } else { speed }
}
