use embassy_time::Instant;
use fastrand::Rng;

use crate::color::{BLACK, Color};
use crate::gamma::gamma8;
use crate::pixels::FrameView;
use crate::segment::{Segment, SegmentRuntime};

/// Minimum wheel distance between two consecutive random colors
const MIN_WHEEL_DISTANCE: u8 = 42;

/// Everything a mode function may touch while it renders one segment
///
/// Pixel offsets are relative to the segment and follow its direction:
/// offset 0 is `start`, or `stop` when the segment is reversed. Every write
/// goes through gamma correction (when the segment asks for it) and the
/// global brightness, and marks the segment's frame as changed.
pub struct ModeContext<'a> {
    segment: &'a Segment,
    runtime: &'a mut SegmentRuntime,
    frame: FrameView<'a>,
    rng: &'a mut Rng,
    triggered: bool,
    now: Instant,
}

impl<'a> ModeContext<'a> {
    pub(crate) fn new(
        segment: &'a Segment,
        runtime: &'a mut SegmentRuntime,
        frame: FrameView<'a>,
        rng: &'a mut Rng,
        triggered: bool,
        now: Instant,
    ) -> Self {
        Self {
            segment,
            runtime,
            frame,
            rng,
            triggered,
            now,
        }
    }

    pub fn segment(&self) -> &Segment {
        self.segment
    }

    pub fn runtime(&self) -> &SegmentRuntime {
        self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut SegmentRuntime {
        self.runtime
    }

    /// Segment length in pixels, never zero
    pub fn len(&self) -> u16 {
        self.segment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn speed(&self) -> u16 {
        self.segment.speed()
    }

    /// Segment speed divided by `divisor`, saturating at `u16::MAX`
    #[allow(clippy::cast_possible_truncation)]
    pub fn speed_div(&self, divisor: u32) -> u16 {
        (u32::from(self.speed()) / divisor.max(1)).min(u32::from(u16::MAX)) as u16
    }

    /// Segment color `index`, black when out of range
    pub fn color(&self, index: usize) -> Color {
        self.segment.colors().get(index).copied().unwrap_or(BLACK)
    }

    pub fn is_reverse(&self) -> bool {
        self.segment.is_reverse()
    }

    /// Element width selected by the size option
    pub fn size(&self) -> u16 {
        self.segment.options().size.pixels()
    }

    /// Whether this run was forced by a trigger
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Time of the current service pass
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn step(&self) -> u32 {
        self.runtime.counter_mode_step
    }

    pub fn set_step(&mut self, step: u32) {
        self.runtime.counter_mode_step = step;
    }

    /// Number of completed runs since the last reset
    pub fn call(&self) -> u32 {
        self.runtime.counter_mode_call
    }

    pub fn aux(&self) -> u8 {
        self.runtime.aux_param
    }

    pub fn set_aux(&mut self, value: u8) {
        self.runtime.aux_param = value;
    }

    pub fn aux3(&self) -> u16 {
        self.runtime.aux_param3
    }

    pub fn set_aux3(&mut self, value: u16) {
        self.runtime.aux_param3 = value;
    }

    /// Report that a full animation period has completed
    pub fn set_cycle(&mut self) {
        self.runtime.set_cycle();
    }

    /// Report a pixel change made without the writers below
    pub fn set_frame(&mut self) {
        self.runtime.set_frame();
    }

    /// Strip index of a segment offset, honouring the direction
    fn strip_index(&self, offset: u16) -> Option<usize> {
        if offset >= self.len() {
            return None;
        }
        let index = if self.is_reverse() {
            self.segment.stop() - offset
        } else {
            self.segment.start() + offset
        };
        Some(usize::from(index))
    }

    fn write(&mut self, index: usize, color: Color) {
        let color = if self.segment.options().gamma {
            Color::with_white(
                gamma8(color.r),
                gamma8(color.g),
                gamma8(color.b),
                gamma8(color.w),
            )
        } else {
            color
        };
        self.frame.set_pixel(index, color);
        self.runtime.set_frame();
    }

    /// Set the pixel at a segment offset; offsets past the end are ignored
    pub fn set_pixel(&mut self, offset: u16, color: Color) {
        if let Some(index) = self.strip_index(offset) {
            self.write(index, color);
        }
    }

    /// Read the pixel at a segment offset
    pub fn pixel(&self, offset: u16) -> Color {
        self.strip_index(offset)
            .map_or(BLACK, |index| self.frame.pixel(index))
    }

    /// Paint the whole segment
    pub fn fill(&mut self, color: Color) {
        for offset in 0..self.len() {
            self.set_pixel(offset, color);
        }
    }

    /// Paint `count` pixels from `offset`, clipped to the segment
    pub fn fill_range(&mut self, offset: u16, count: u16, color: Color) {
        let end = offset.saturating_add(count).min(self.len());
        for offset in offset..end {
            self.set_pixel(offset, color);
        }
    }

    /// Move every pixel one step along the segment direction
    ///
    /// The pixel at offset 0 keeps its old value and is meant to be
    /// overwritten by the caller.
    pub fn shift_forward(&mut self) {
        let len = usize::from(self.len());
        if len < 2 {
            return;
        }
        let start = usize::from(self.segment.start());
        if self.is_reverse() {
            self.frame.copy_pixels(start, start + 1, len - 1);
        } else {
            self.frame.copy_pixels(start + 1, start, len - 1);
        }
        self.runtime.set_frame();
    }

    /// Move every pixel towards the second segment color
    pub fn fade_out(&mut self) {
        let target = self.color(1);
        self.fade_out_to(target);
    }

    /// Move every pixel towards `target` at the segment's fade rate
    ///
    /// The halving rate ignores the target and halves each channel.
    pub fn fade_out_to(&mut self, target: Color) {
        let shifts = self.segment.options().fade_rate.shifts();
        let first = usize::from(self.segment.start());
        let last = usize::from(self.segment.stop());
        for index in first..=last {
            let current = self.frame.pixel(index);
            let faded = match shifts {
                None => current.halved(),
                Some((high, low)) => Color::with_white(
                    fade_channel(current.r, target.r, high, low),
                    fade_channel(current.g, target.g, high, low),
                    fade_channel(current.b, target.b, high, low),
                    fade_channel(current.w, target.w, high, low),
                ),
            };
            self.frame.set_pixel(index, faded);
        }
        self.runtime.set_frame();
    }

    /// Spread light into each pixel from its neighbours
    ///
    /// Works on the raw bytes of the inner pixels, adding a quarter of each
    /// neighbour's byte value and saturating.
    #[allow(clippy::cast_possible_truncation)]
    pub fn blur(&mut self) {
        let bpp = self.frame.layout().bytes_per_pixel();
        let first = usize::from(self.segment.start()) * bpp + bpp;
        let last = usize::from(self.segment.stop()) * bpp;
        let bytes = self.frame.bytes_mut();
        for i in first..last.min(bytes.len().saturating_sub(bpp)) {
            let sum = u16::from(bytes[i - bpp] >> 2)
                + u16::from(bytes[i])
                + u16::from(bytes[i + bpp] >> 2);
            bytes[i] = sum.min(255) as u8;
        }
        self.runtime.set_frame();
    }

    pub fn random8(&mut self) -> u8 {
        self.rng.u8(..)
    }

    /// Random value in `0..limit`, zero when `limit` is zero
    pub fn random8_below(&mut self, limit: u8) -> u8 {
        if limit == 0 { 0 } else { self.rng.u8(..limit) }
    }

    pub fn random16(&mut self) -> u16 {
        self.rng.u16(..)
    }

    /// Random value in `0..limit`, zero when `limit` is zero
    pub fn random16_below(&mut self, limit: u16) -> u16 {
        if limit == 0 { 0 } else { self.rng.u16(..limit) }
    }

    /// Random value in `low..high`, `low` when the range is empty
    pub fn random16_between(&mut self, low: u16, high: u16) -> u16 {
        if high <= low {
            low
        } else {
            self.rng.u16(low..high)
        }
    }

    /// Random wheel position far enough from `previous` to look different
    pub fn random_wheel_index(&mut self, previous: u8) -> u8 {
        loop {
            let candidate = self.random8();
            let distance = previous.abs_diff(candidate);
            if distance.min(255 - distance) >= MIN_WHEEL_DISTANCE {
                return candidate;
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fade_channel(current: u8, target: u8, high: u8, low: u8) -> u8 {
    let delta = i16::from(target) - i16::from(current);
    let step = (delta >> high) + (delta >> low);
    (i16::from(current) + step).clamp(0, 255) as u8
}
