//! Segment scheduler
//!
//! The engine owns the pixel buffer, the segment store, the active-segment
//! index with one runtime per position, and the mode table. Call
//! [`Engine::service`] continuously; it renders every due segment and flushes
//! the buffer when anything changed.

use embassy_time::{Duration, Instant};
use fastrand::Rng;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::Color;
use crate::mode::{MODE_COUNT, ModeContext, ModeFn, ModeId, ModeTable};
use crate::pixels::{ConfigError, PixelBuffer, PixelLayout};
use crate::segment::{
    ActiveSegments, MAX_NUM_COLORS, Segment, SegmentConfig, SegmentError, SegmentOptions,
    SegmentRuntime,
};

/// Default number of segment slots
pub const DEFAULT_SEGMENTS: usize = 10;
/// Default number of active-index positions
pub const DEFAULT_ACTIVE_SEGMENTS: usize = 10;

/// Hook that replaces the output driver when flushing
pub type ShowFn = fn(&[u8]);

/// Configuration for the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of pixels on the strip
    pub length: u16,
    pub layout: PixelLayout,
    /// Initial global brightness
    pub brightness: u8,
    /// Segment stored in slot 0 and activated on construction
    pub default_segment: SegmentConfig,
    /// Seed of the random generator used by the modes
    pub seed: u64,
}

impl EngineConfig {
    /// Full brightness GRB strip with a static red segment over every pixel
    pub const fn new(length: u16) -> Self {
        Self {
            length,
            layout: PixelLayout::Grb,
            brightness: 255,
            default_segment: SegmentConfig::new(0, length.saturating_sub(1)),
            seed: 0,
        }
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: PixelLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub const fn with_default_segment(mut self, segment: SegmentConfig) -> Self {
        self.default_segment = segment;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Segment engine driving one strip
///
/// `MAX_LEDS` is the pixel capacity, `SEGMENTS` the number of segment slots
/// and `ACTIVE` the number of segments that can be scheduled at once.
pub struct Engine<
    D: OutputDriver,
    const MAX_LEDS: usize,
    const SEGMENTS: usize = DEFAULT_SEGMENTS,
    const ACTIVE: usize = DEFAULT_ACTIVE_SEGMENTS,
> {
    driver: D,
    custom_show: Option<ShowFn>,
    pixels: PixelBuffer<MAX_LEDS>,

    segments: [Option<Segment>; SEGMENTS],
    active: ActiveSegments<ACTIVE>,
    runtimes: [SegmentRuntime; ACTIVE],
    modes: ModeTable,
    rng: Rng,

    running: bool,
    triggered: bool,
}

impl<D: OutputDriver, const MAX_LEDS: usize, const SEGMENTS: usize, const ACTIVE: usize>
    Engine<D, MAX_LEDS, SEGMENTS, ACTIVE>
{
    /// Create a stopped engine
    ///
    /// Slot 0 holds the configured default segment and is active.
    pub fn new(driver: D, config: &EngineConfig) -> Result<Self, ConfigError> {
        if SEGMENTS == 0 || ACTIVE == 0 || SEGMENTS > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::SegmentCapacity {
                segments: SEGMENTS,
                active: ACTIVE,
            });
        }
        let mut pixels = PixelBuffer::new(config.length, config.layout)?;
        pixels.set_brightness(config.brightness);

        let mut engine = Self {
            driver,
            custom_show: None,
            pixels,
            segments: [None; SEGMENTS],
            active: ActiveSegments::new(),
            runtimes: [SegmentRuntime::default(); ACTIVE],
            modes: ModeTable::new(),
            rng: Rng::with_seed(config.seed),
            running: false,
            triggered: false,
        };
        engine.segments[0] = Some(Segment::from_config(
            &config.default_segment,
            config.length,
        ));
        engine.add_active_segment(0).map_err(|_| ConfigError::SegmentCapacity {
            segments: SEGMENTS,
            active: ACTIVE,
        })?;
        Ok(engine)
    }

    /// Run one scheduler pass
    ///
    /// Renders every active segment that is due at `now` (all of them after
    /// a trigger) in active-index order, so later segments overwrite earlier
    /// ones where they overlap. Flushes the buffer and returns `true` when a
    /// mode changed pixels, a segment was marked with [`Self::set_frame`] or
    /// a trigger was pending. Does nothing while the engine is not running.
    pub fn service(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let triggered = self.triggered;
        let mut dirty = triggered;

        for (position, slot) in self.active.iter() {
            let runtime = &mut self.runtimes[position];
            runtime.clear_cycle();
            if !triggered && runtime.next_time > now {
                continue;
            }
            let Some(segment) = self.segments[usize::from(slot)].as_ref() else {
                continue;
            };
            let render = self.modes.render_fn(segment.mode());
            let mut ctx = ModeContext::new(
                segment,
                runtime,
                self.pixels.view(),
                &mut self.rng,
                triggered,
                now,
            );
            let delay = render(&mut ctx);

            runtime.next_time = now
                .checked_add(Duration::from_millis(u64::from(delay)))
                .unwrap_or(Instant::MAX);
            runtime.counter_mode_call = runtime.counter_mode_call.wrapping_add(1);
        }

        for (position, _) in self.active.iter() {
            let runtime = &mut self.runtimes[position];
            dirty |= runtime.is_frame();
            runtime.clear_frame();
        }
        self.triggered = false;

        if dirty {
            self.show();
        }
        dirty
    }

    /// Render every active segment on the next running pass
    pub fn trigger(&mut self) {
        self.triggered = true;
    }

    /// Reset all runtimes and start scheduling
    pub fn start(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[Engine.start] starting with {} active segments", self.active.count());
        self.reset_runtimes();
        self.running = true;
    }

    /// Stop scheduling, keeping the runtimes
    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Stop scheduling and blank the strip
    pub fn stop(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[Engine.stop] stopping");
        self.running = false;
        self.strip_off();
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Earliest time an active segment is due
    pub fn next_due(&self) -> Option<Instant> {
        self.active
            .iter()
            .map(|(position, _)| self.runtimes[position].next_time)
            .min()
    }

    /// Flush the buffer through the custom hook or the driver
    pub fn show(&mut self) {
        match self.custom_show {
            Some(show) => show(self.pixels.bytes()),
            None => self.driver.write(self.pixels.bytes()),
        }
    }

    /// Blank the buffer and flush it
    pub fn strip_off(&mut self) {
        self.pixels.clear();
        self.show();
    }

    /// Flush through `show` instead of the output driver
    pub fn set_custom_show(&mut self, show: ShowFn) {
        self.custom_show = Some(show);
    }

    pub fn clear_custom_show(&mut self) {
        self.custom_show = None;
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn reset_runtimes(&mut self) {
        for (position, runtime) in self.runtimes.iter_mut().enumerate() {
            let slot = self.active.as_slice()[position].unwrap_or(0);
            *runtime = SegmentRuntime::new(slot);
        }
    }

    /// Check that `slot` exists in the store
    fn check_slot(slot: u8) -> Result<usize, SegmentError> {
        let index = usize::from(slot);
        if index < SEGMENTS {
            Ok(index)
        } else {
            Err(SegmentError::InvalidSlot)
        }
    }

    /// Check that `slot` holds a configured segment
    fn check_configured(&self, slot: u8) -> Result<usize, SegmentError> {
        let index = Self::check_slot(slot)?;
        if self.segments[index].is_some() {
            Ok(index)
        } else {
            Err(SegmentError::InvalidSlot)
        }
    }

    /// Reset the runtime of the position scheduling `slot`, if any
    fn reset_runtime_of(&mut self, slot: u8) {
        if let Some(position) = self.active.position(slot) {
            self.runtimes[position] = SegmentRuntime::new(slot);
        }
    }

    /// Apply `change` to a configured segment
    fn update_segment(
        &mut self,
        slot: u8,
        change: impl FnOnce(&mut Segment),
    ) -> Result<(), SegmentError> {
        let index = self.check_configured(slot)?;
        if let Some(segment) = self.segments[index].as_mut() {
            change(segment);
        }
        Ok(())
    }

    // Segment store

    /// Store a segment configuration in `slot`
    ///
    /// The range and speed are clamped to the strip. If the slot is active,
    /// its runtime restarts.
    pub fn set_segment(&mut self, slot: u8, config: SegmentConfig) -> Result<(), SegmentError> {
        let index = Self::check_slot(slot)?;
        let segment = Segment::from_config(&config, self.pixels.len());
        #[cfg(feature = "esp32-log")]
        println!(
            "[Engine.set_segment] slot {}: {}..={} mode {:?} speed {}",
            slot,
            segment.start(),
            segment.stop(),
            segment.mode(),
            segment.speed()
        );
        self.segments[index] = Some(segment);
        self.reset_runtime_of(slot);
        Ok(())
    }

    /// Store a segment configuration in `slot` and take it off the schedule
    pub fn set_idle_segment(
        &mut self,
        slot: u8,
        config: SegmentConfig,
    ) -> Result<(), SegmentError> {
        self.set_segment(slot, config)?;
        let _ = self.active.remove(slot);
        Ok(())
    }

    /// Forget every segment and empty the active index
    pub fn reset_segments(&mut self) {
        self.segments = [None; SEGMENTS];
        self.active.clear();
        self.runtimes = [SegmentRuntime::default(); ACTIVE];
    }

    /// One past the highest configured slot
    pub fn num_segments(&self) -> usize {
        self.segments
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |index| index + 1)
    }

    /// Drop every segment from slot `count` upwards
    pub fn set_num_segments(&mut self, count: usize) {
        for slot in count.min(SEGMENTS)..SEGMENTS {
            self.segments[slot] = None;
            if let Ok(slot) = u8::try_from(slot) {
                let _ = self.active.remove(slot);
            }
        }
    }

    pub fn segment(&self, slot: u8) -> Option<&Segment> {
        self.segments.get(usize::from(slot))?.as_ref()
    }

    pub fn segments(&self) -> &[Option<Segment>] {
        &self.segments
    }

    pub fn set_mode(&mut self, slot: u8, mode: ModeId) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| segment.set_mode(mode))?;
        self.reset_runtime_of(slot);
        Ok(())
    }

    pub fn mode(&self, slot: u8) -> Option<ModeId> {
        self.segment(slot).map(Segment::mode)
    }

    pub fn set_speed(&mut self, slot: u8, speed: u16) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| segment.set_speed(speed))
    }

    pub fn increase_speed(&mut self, slot: u8, step: u16) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| {
            segment.set_speed(segment.speed().saturating_add(step));
        })
    }

    pub fn decrease_speed(&mut self, slot: u8, step: u16) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| {
            segment.set_speed(segment.speed().saturating_sub(step));
        })
    }

    pub fn speed(&self, slot: u8) -> Option<u16> {
        self.segment(slot).map(Segment::speed)
    }

    /// Replace the primary color
    pub fn set_color(&mut self, slot: u8, color: Color) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| segment.set_color(color))
    }

    pub fn set_colors(
        &mut self,
        slot: u8,
        colors: [Color; MAX_NUM_COLORS],
    ) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| segment.set_colors(colors))
    }

    pub fn color(&self, slot: u8) -> Option<Color> {
        self.segment(slot).map(Segment::color)
    }

    pub fn colors(&self, slot: u8) -> Option<[Color; MAX_NUM_COLORS]> {
        self.segment(slot).map(|segment| *segment.colors())
    }

    pub fn set_options(&mut self, slot: u8, options: SegmentOptions) -> Result<(), SegmentError> {
        self.update_segment(slot, |segment| segment.set_options(options))
    }

    pub fn options(&self, slot: u8) -> Option<SegmentOptions> {
        self.segment(slot).map(Segment::options)
    }

    // Active index

    /// Schedule `slot` at the first free position with a fresh runtime
    pub fn add_active_segment(&mut self, slot: u8) -> Result<(), SegmentError> {
        self.check_configured(slot)?;
        let position = self.active.add(slot)?;
        self.runtimes[position] = SegmentRuntime::new(slot);
        #[cfg(feature = "esp32-log")]
        println!("[Engine.add_active_segment] slot {} at position {}", slot, position);
        Ok(())
    }

    /// Take `slot` off the schedule, leaving a hole in the index
    pub fn remove_active_segment(&mut self, slot: u8) -> Result<(), SegmentError> {
        let _position = self.active.remove(slot)?;
        #[cfg(feature = "esp32-log")]
        println!("[Engine.remove_active_segment] slot {} from position {}", slot, _position);
        Ok(())
    }

    /// Schedule `new` in place of `old`
    ///
    /// Render order is kept and the runtime restarts, except for its timer so
    /// the frame in progress runs out.
    pub fn swap_active_segment(&mut self, old: u8, new: u8) -> Result<(), SegmentError> {
        self.check_configured(new)?;
        let position = self.active.swap(old, new)?;
        self.runtimes[position].reset_keep_timing(new);
        #[cfg(feature = "esp32-log")]
        println!("[Engine.swap_active_segment] slot {} -> {} at position {}", old, new, position);
        Ok(())
    }

    pub fn is_active_segment(&self, slot: u8) -> bool {
        self.active.contains(slot)
    }

    pub fn active_segments(&self) -> &ActiveSegments<ACTIVE> {
        &self.active
    }

    /// Runtime of an active segment
    pub fn segment_runtime(&self, slot: u8) -> Option<&SegmentRuntime> {
        self.active
            .position(slot)
            .map(|position| &self.runtimes[position])
    }

    /// Frame flag of an active segment
    ///
    /// Frame flags are cleared at the end of every pass, so outside a mode
    /// this only reports changes made through [`Self::set_frame`].
    pub fn is_frame(&self, slot: u8) -> bool {
        self.segment_runtime(slot).is_some_and(SegmentRuntime::is_frame)
    }

    /// Whether the segment completed an animation period in the last pass
    pub fn is_cycle(&self, slot: u8) -> bool {
        self.segment_runtime(slot).is_some_and(SegmentRuntime::is_cycle)
    }

    /// Mark an active segment as changed so the next pass flushes
    pub fn set_frame(&mut self, slot: u8) {
        if let Some(position) = self.active.position(slot) {
            self.runtimes[position].set_frame();
        }
    }

    // Modes

    /// Install a user mode into custom slot `index` (0-7)
    ///
    /// Returns the id to assign to segments, `None` for a bad index.
    pub fn set_custom_mode(
        &mut self,
        index: u8,
        name: &'static str,
        render: ModeFn,
    ) -> Option<ModeId> {
        let id = self.modes.set_custom(index, name, render);
        #[cfg(feature = "esp32-log")]
        println!("[Engine.set_custom_mode] {} -> {:?}", name, id);
        id
    }

    pub fn mode_name(&self, mode: ModeId) -> &'static str {
        self.modes.name(mode)
    }

    pub const fn mode_count(&self) -> usize {
        MODE_COUNT
    }

    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    // Pixels

    pub fn set_pixel_color(&mut self, index: u16, color: Color) {
        self.pixels.set_pixel(usize::from(index), color);
    }

    pub fn pixel_color(&self, index: u16) -> Color {
        self.pixels.pixel(usize::from(index))
    }

    /// Fill `count` pixels from `first` with `color`
    ///
    /// A `count` of 0 fills up to the end of the strip, so
    /// `fill(BLACK, 0, 0)` blanks everything.
    pub fn fill(&mut self, color: Color, first: u16, count: u16) {
        self.pixels
            .fill(color, usize::from(first), usize::from(count));
    }

    pub fn copy_pixels(&mut self, dest: u16, src: u16, count: u16) {
        self.pixels
            .copy_pixels(usize::from(dest), usize::from(src), usize::from(count));
    }

    /// Blank the buffer without flushing
    pub fn clear(&mut self) {
        self.pixels.clear();
    }

    /// Move every pixel of a segment towards `target` once
    ///
    /// Uses the fade rate of the segment options.
    pub fn fade_out(&mut self, slot: u8, target: Color) -> Result<(), SegmentError> {
        let index = self.check_configured(slot)?;
        let Some(segment) = self.segments[index].as_ref() else {
            return Err(SegmentError::InvalidSlot);
        };
        let mut scratch = SegmentRuntime::new(slot);
        let mut ctx = ModeContext::new(
            segment,
            &mut scratch,
            self.pixels.view(),
            &mut self.rng,
            false,
            Instant::from_millis(0),
        );
        ctx.fade_out_to(target);
        Ok(())
    }

    /// Raw pixel bytes as sent to the strip
    pub fn pixels(&self) -> &[u8] {
        self.pixels.bytes()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels.bytes_mut()
    }

    /// Strip length in pixels
    pub const fn length(&self) -> u16 {
        self.pixels.len()
    }

    pub const fn num_bytes(&self) -> usize {
        self.pixels.num_bytes()
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        self.pixels.bytes_per_pixel()
    }

    pub const fn layout(&self) -> PixelLayout {
        self.pixels.layout()
    }

    /// Sum of every byte in the buffer
    pub fn intensity_sum(&self) -> u32 {
        self.pixels.bytes().iter().map(|&byte| u32::from(byte)).sum()
    }

    /// Per-channel sums in red, green, blue, white order
    pub fn intensity_sums(&self) -> [u32; 4] {
        let mut sums = [0u32; 4];
        for index in 0..usize::from(self.pixels.len()) {
            let raw = self.pixels.raw_pixel(index);
            sums[0] += u32::from(raw.r);
            sums[1] += u32::from(raw.g);
            sums[2] += u32::from(raw.b);
            sums[3] += u32::from(raw.w);
        }
        sums
    }

    // Brightness

    pub fn set_brightness(&mut self, brightness: u8) {
        self.pixels.set_brightness(brightness);
    }

    pub fn increase_brightness(&mut self, step: u8) {
        let brightness = self.pixels.brightness().saturating_add(step);
        self.pixels.set_brightness(brightness);
    }

    pub fn decrease_brightness(&mut self, step: u8) {
        let brightness = self.pixels.brightness().saturating_sub(step);
        self.pixels.set_brightness(brightness);
    }

    pub const fn brightness(&self) -> u8 {
        self.pixels.brightness()
    }

    // Random

    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    pub fn random8(&mut self) -> u8 {
        self.rng.u8(..)
    }

    pub fn random16(&mut self) -> u16 {
        self.rng.u16(..)
    }
}
