//! Output driver adapters

use smart_leds::SmartLedsWrite;

use crate::OutputDriver;
use crate::color::Rgb;
use crate::pixels::PixelLayout;

/// Driver that discards every frame
///
/// Used for engines whose buffer is consumed by someone else, such as the
/// two instances inside a [`Transition`](crate::transition::Transition).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutput;

impl OutputDriver for NoOutput {
    fn write(&mut self, _pixels: &[u8]) {}
}

/// Adapter for any `smart-leds` RGB writer
///
/// Raw bytes are decoded with the strip's [`PixelLayout`]; the white channel
/// is dropped since the writer only takes RGB.
#[derive(Debug)]
pub struct SmartLedsOutput<W> {
    writer: W,
    layout: PixelLayout,
    failed_writes: u32,
}

impl<W: SmartLedsWrite<Color = Rgb>> SmartLedsOutput<W> {
    pub const fn new(writer: W, layout: PixelLayout) -> Self {
        Self {
            writer,
            layout,
            failed_writes: 0,
        }
    }

    /// Number of frames the writer rejected
    pub const fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: SmartLedsWrite<Color = Rgb>> OutputDriver for SmartLedsOutput<W> {
    fn write(&mut self, pixels: &[u8]) {
        let layout = self.layout;
        let colors = pixels
            .chunks_exact(layout.bytes_per_pixel())
            .map(|raw| layout.decode(raw).rgb());
        if self.writer.write(colors).is_err() {
            self.failed_writes = self.failed_writes.wrapping_add(1);
        }
    }
}
