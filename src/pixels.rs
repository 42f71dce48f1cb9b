//! Raw pixel storage
//!
//! The buffer holds pixels exactly as they are sent to the strip: 3 or 4 bytes
//! per pixel in the channel order of the [`PixelLayout`]. Global brightness is
//! applied when a pixel is written and undone when it is read back, so the
//! bytes can go straight to the output driver.

use crate::color::Color;
use crate::math8::scale8;

/// Channel order and width of a pixel in the raw buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelLayout {
    /// Green, red, blue (WS2812B)
    #[default]
    Grb,
    /// Red, green, blue
    Rgb,
    /// Green, red, blue, white (SK6812 RGBW)
    Grbw,
    /// Red, green, blue, white
    Rgbw,
}

impl PixelLayout {
    /// Number of bytes a single pixel takes in the buffer
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grb | Self::Rgb => 3,
            Self::Grbw | Self::Rgbw => 4,
        }
    }

    /// Whether the layout carries a white channel
    pub const fn has_white(self) -> bool {
        self.bytes_per_pixel() == 4
    }

    /// Encode a color into wire order
    ///
    /// Only the first [`Self::bytes_per_pixel`] bytes are meaningful.
    pub const fn encode(self, color: Color) -> [u8; 4] {
        match self {
            Self::Grb | Self::Grbw => [color.g, color.r, color.b, color.w],
            Self::Rgb | Self::Rgbw => [color.r, color.g, color.b, color.w],
        }
    }

    /// Decode a pixel from wire order
    ///
    /// `bytes` must hold at least [`Self::bytes_per_pixel`] bytes.
    pub fn decode(self, bytes: &[u8]) -> Color {
        let w = if self.has_white() { bytes[3] } else { 0 };
        match self {
            Self::Grb | Self::Grbw => Color::with_white(bytes[1], bytes[0], bytes[2], w),
            Self::Rgb | Self::Rgbw => Color::with_white(bytes[0], bytes[1], bytes[2], w),
        }
    }
}

/// Errors detected when the engine is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The strip has no pixels
    EmptyStrip,
    /// The strip is longer than the buffer capacity
    LengthExceedsCapacity { length: u16, capacity: usize },
    /// The segment store or the active index cannot hold a segment, or the
    /// store has more slots than a `u8` index can address
    SegmentCapacity { segments: usize, active: usize },
}

/// Mutable view of the pixel bytes
///
/// This is what mode functions draw into. It is not generic over the buffer
/// capacity, so the same mode functions serve every engine size.
#[derive(Debug)]
pub struct FrameView<'a> {
    bytes: &'a mut [u8],
    layout: PixelLayout,
    brightness: u8,
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(bytes: &'a mut [u8], layout: PixelLayout, brightness: u8) -> Self {
        Self {
            bytes,
            layout,
            brightness,
        }
    }

    /// Number of pixels in the view
    pub fn len(&self) -> usize {
        self.bytes.len() / self.layout.bytes_per_pixel()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Write a pixel, scaled by the global brightness
    ///
    /// Indices past the end are ignored.
    pub fn set_pixel(&mut self, index: usize, color: Color) {
        let bpp = self.layout.bytes_per_pixel();
        let Some(target) = pixel_range(index, bpp).and_then(|range| self.bytes.get_mut(range))
        else {
            return;
        };
        let color = scale_color(color, self.brightness);
        target.copy_from_slice(&self.layout.encode(color)[..bpp]);
    }

    /// Read a pixel back, undoing the brightness scaling
    pub fn pixel(&self, index: usize) -> Color {
        read_pixel(&*self.bytes, self.layout, self.brightness, index)
    }

    /// Fill `count` pixels starting at `first`, clipped to the view
    ///
    /// A `count` of 0 fills to the end of the view.
    pub fn fill(&mut self, color: Color, first: usize, count: usize) {
        let end = if count == 0 {
            self.len()
        } else {
            first.saturating_add(count).min(self.len())
        };
        for index in first..end {
            self.set_pixel(index, color);
        }
    }

    /// Copy `count` pixels from `src` to `dest`; the ranges may overlap
    pub fn copy_pixels(&mut self, dest: usize, src: usize, count: usize) {
        let len = self.len();
        if dest >= len || src >= len {
            return;
        }
        let count = count.min(len - dest).min(len - src);
        let bpp = self.layout.bytes_per_pixel();
        self.bytes
            .copy_within(src * bpp..(src + count) * bpp, dest * bpp);
    }

    /// Raw bytes of the view
    pub fn bytes(&self) -> &[u8] {
        &*self.bytes
    }

    /// Raw bytes of the view, for byte-level effects
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }
}

/// Fixed-capacity pixel buffer
///
/// Storage for `MAX_LEDS` pixels of up to 4 bytes is reserved up front; only
/// the first `length * bytes_per_pixel` bytes are in use.
#[derive(Debug, Clone)]
pub struct PixelBuffer<const MAX_LEDS: usize> {
    storage: [[u8; 4]; MAX_LEDS],
    length: u16,
    layout: PixelLayout,
    brightness: u8,
}

impl<const MAX_LEDS: usize> PixelBuffer<MAX_LEDS> {
    /// Create a blank buffer for a strip of `length` pixels
    pub fn new(length: u16, layout: PixelLayout) -> Result<Self, ConfigError> {
        if length == 0 {
            return Err(ConfigError::EmptyStrip);
        }
        if usize::from(length) > MAX_LEDS {
            return Err(ConfigError::LengthExceedsCapacity {
                length,
                capacity: MAX_LEDS,
            });
        }
        Ok(Self {
            storage: [[0; 4]; MAX_LEDS],
            length,
            layout,
            brightness: 255,
        })
    }

    /// Number of pixels on the strip
    pub const fn len(&self) -> u16 {
        self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel()
    }

    /// Number of bytes in use
    pub const fn num_bytes(&self) -> usize {
        self.length as usize * self.layout.bytes_per_pixel()
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Change the global brightness
    ///
    /// Pixels already in the buffer are rescaled, which loses precision when
    /// going from a low brightness to a higher one.
    pub fn set_brightness(&mut self, brightness: u8) {
        let previous = self.brightness;
        if previous == brightness {
            return;
        }
        for byte in self.bytes_mut() {
            *byte = scale8(unscale(*byte, previous), brightness);
        }
        self.brightness = brightness;
    }

    /// Bytes as they go to the strip
    pub fn bytes(&self) -> &[u8] {
        let used = self.num_bytes();
        &self.storage.as_flattened()[..used]
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let used = self.num_bytes();
        &mut self.storage.as_flattened_mut()[..used]
    }

    /// Borrow the buffer as a drawable view
    pub fn view(&mut self) -> FrameView<'_> {
        let (layout, brightness) = (self.layout, self.brightness);
        FrameView::new(self.bytes_mut(), layout, brightness)
    }

    pub fn set_pixel(&mut self, index: usize, color: Color) {
        self.view().set_pixel(index, color);
    }

    pub fn pixel(&self, index: usize) -> Color {
        read_pixel(self.bytes(), self.layout, self.brightness, index)
    }

    /// Pixel exactly as it is stored, brightness included
    pub fn raw_pixel(&self, index: usize) -> Color {
        let bpp = self.layout.bytes_per_pixel();
        pixel_range(index, bpp)
            .and_then(|range| self.bytes().get(range))
            .map_or(Color::default(), |raw| self.layout.decode(raw))
    }

    pub fn fill(&mut self, color: Color, first: usize, count: usize) {
        self.view().fill(color, first, count);
    }

    pub fn copy_pixels(&mut self, dest: usize, src: usize, count: usize) {
        self.view().copy_pixels(dest, src, count);
    }

    /// Set every byte to zero
    pub fn clear(&mut self) {
        self.bytes_mut().fill(0);
    }
}

fn pixel_range(index: usize, bpp: usize) -> Option<core::ops::Range<usize>> {
    let offset = index.checked_mul(bpp)?;
    Some(offset..offset.checked_add(bpp)?)
}

fn scale_color(color: Color, brightness: u8) -> Color {
    if brightness == 255 {
        return color;
    }
    Color::with_white(
        scale8(color.r, brightness),
        scale8(color.g, brightness),
        scale8(color.b, brightness),
        scale8(color.w, brightness),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn unscale(value: u8, brightness: u8) -> u8 {
    if brightness == 255 || value == 0 {
        return value;
    }
    let unscaled = (u16::from(value) << 8) / (u16::from(brightness) + 1);
    unscaled.min(255) as u8
}

fn read_pixel(bytes: &[u8], layout: PixelLayout, brightness: u8, index: usize) -> Color {
    let bpp = layout.bytes_per_pixel();
    let Some(raw) = pixel_range(index, bpp).and_then(|range| bytes.get(range)) else {
        return Color::default();
    };
    let color = layout.decode(raw);
    Color::with_white(
        unscale(color.r, brightness),
        unscale(color.g, brightness),
        unscale(color.b, brightness),
        unscale(color.w, brightness),
    )
}
