//! Crossfade between two engines
//!
//! A [`Transition`] owns two complete engines that render into their own
//! buffers, plus a destination buffer that goes to the real driver. Outside
//! a transition window the destination is a copy of one engine; inside it
//! the two buffers are blended byte by byte.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::engine::{DEFAULT_ACTIVE_SEGMENTS, DEFAULT_SEGMENTS, Engine, EngineConfig};
use crate::math8::{blend_bytes, progress8};
use crate::output::NoOutput;
use crate::pixels::{ConfigError, PixelBuffer};

/// Which engine the transition fades from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionDirection {
    /// From the first engine to the second
    #[default]
    Forward,
    /// From the second engine to the first
    Backward,
}

/// Timed blend window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start: Instant,
    duration: Duration,
}

impl Window {
    /// Blend amount of the "to" buffer at `now`
    fn amount(&self, now: Instant) -> u8 {
        if now < self.start {
            return 0;
        }
        let elapsed = now.duration_since(self.start);
        if elapsed >= self.duration {
            return 255;
        }
        progress8(elapsed, self.duration)
    }
}

/// Engine pair with a crossfading output
pub struct Transition<
    D: OutputDriver,
    const MAX_LEDS: usize,
    const SEGMENTS: usize = DEFAULT_SEGMENTS,
    const ACTIVE: usize = DEFAULT_ACTIVE_SEGMENTS,
> {
    first: Engine<NoOutput, MAX_LEDS, SEGMENTS, ACTIVE>,
    second: Engine<NoOutput, MAX_LEDS, SEGMENTS, ACTIVE>,
    pixels: PixelBuffer<MAX_LEDS>,
    driver: D,
    window: Option<Window>,
    direction: TransitionDirection,
}

impl<D: OutputDriver, const MAX_LEDS: usize, const SEGMENTS: usize, const ACTIVE: usize>
    Transition<D, MAX_LEDS, SEGMENTS, ACTIVE>
{
    /// Create two engines from the same configuration
    ///
    /// Configure them independently through [`Self::first_mut`] and
    /// [`Self::second_mut`].
    pub fn new(driver: D, config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            first: Engine::new(NoOutput, config)?,
            second: Engine::new(NoOutput, config)?,
            pixels: PixelBuffer::new(config.length, config.layout)?,
            driver,
            window: None,
            direction: TransitionDirection::Forward,
        })
    }

    /// Fade over `duration` starting at `start`
    ///
    /// Before `start` the output shows the "from" engine, after the window
    /// it shows the "to" engine.
    pub fn start_transition(
        &mut self,
        start: Instant,
        duration: Duration,
        direction: TransitionDirection,
    ) {
        #[cfg(feature = "esp32-log")]
        println!(
            "[Transition.start_transition] {:?} over {} ms",
            direction,
            duration.as_millis()
        );
        self.window = Some(Window { start, duration });
        self.direction = direction;
    }

    /// Whether `now` falls inside the transition window
    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.window
            .is_some_and(|window| now >= window.start && window.amount(now) < 255)
    }

    pub const fn direction(&self) -> TransitionDirection {
        self.direction
    }

    /// Current blend amount of the "to" engine
    pub fn progress(&self, now: Instant) -> u8 {
        self.window.map_or(0, |window| window.amount(now))
    }

    /// Service both engines and flush the blended buffer if either changed
    pub fn service(&mut self, now: Instant) -> bool {
        let first_dirty = self.first.service(now);
        let second_dirty = self.second.service(now);
        if !first_dirty && !second_dirty {
            return false;
        }

        let amount = self.progress(now);
        let (from, to) = match self.direction {
            TransitionDirection::Forward => (self.first.pixels(), self.second.pixels()),
            TransitionDirection::Backward => (self.second.pixels(), self.first.pixels()),
        };
        blend_bytes(self.pixels.bytes_mut(), from, to, amount);
        self.driver.write(self.pixels.bytes());
        true
    }

    pub fn start(&mut self) {
        self.first.start();
        self.second.start();
    }

    /// Stop both engines and blank the strip
    pub fn stop(&mut self) {
        self.first.stop();
        self.second.stop();
        self.pixels.clear();
        self.driver.write(self.pixels.bytes());
    }

    pub fn pause(&mut self) {
        self.first.pause();
        self.second.pause();
    }

    pub fn resume(&mut self) {
        self.first.resume();
        self.second.resume();
    }

    pub fn trigger(&mut self) {
        self.first.trigger();
        self.second.trigger();
    }

    pub fn first(&self) -> &Engine<NoOutput, MAX_LEDS, SEGMENTS, ACTIVE> {
        &self.first
    }

    pub fn first_mut(&mut self) -> &mut Engine<NoOutput, MAX_LEDS, SEGMENTS, ACTIVE> {
        &mut self.first
    }

    pub fn second(&self) -> &Engine<NoOutput, MAX_LEDS, SEGMENTS, ACTIVE> {
        &self.second
    }

    pub fn second_mut(&mut self) -> &mut Engine<NoOutput, MAX_LEDS, SEGMENTS, ACTIVE> {
        &mut self.second
    }

    /// Destination buffer as last flushed
    pub fn pixels(&self) -> &[u8] {
        self.pixels.bytes()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
