//! Command queue
//!
//! Lets an interrupt handler or another task drive an engine it does not own.
//! The queue is a bounded `heapless::Deque` guarded by a critical section, so
//! it can live in a `static`:
//!
//! ```ignore
//! static COMMANDS: CommandChannel<8> = CommandChannel::new();
//!
//! // producer, e.g. a beat detector
//! let _ = COMMANDS.sender().try_send(Command::Trigger);
//!
//! // control loop
//! let mut processor = CommandProcessor::new(COMMANDS.receiver());
//! loop {
//!     processor.process_pending(&mut engine);
//!     engine.service(Instant::now());
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::Color;
use crate::engine::Engine;
use crate::mode::ModeId;
use crate::segment::{MAX_NUM_COLORS, SegmentConfig, SegmentError, SegmentOptions};

/// Error returned when trying to send to a full channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Change requested from outside the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reset runtimes and start scheduling
    Start,
    /// Stop scheduling and blank the strip
    Stop,
    Pause,
    Resume,
    /// Render every active segment on the next pass
    Trigger,
    SetBrightness(u8),
    SetSegment { slot: u8, config: SegmentConfig },
    SetMode { slot: u8, mode: ModeId },
    SetSpeed { slot: u8, speed: u16 },
    SetColor { slot: u8, color: Color },
    SetColors { slot: u8, colors: [Color; MAX_NUM_COLORS] },
    SetOptions { slot: u8, options: SegmentOptions },
    AddActiveSegment(u8),
    RemoveActiveSegment(u8),
    SwapActiveSegment { old: u8, new: u8 },
}

impl Command {
    /// Apply the command to an engine
    pub fn apply<D: OutputDriver, const MAX_LEDS: usize, const SEGMENTS: usize, const ACTIVE: usize>(
        self,
        engine: &mut Engine<D, MAX_LEDS, SEGMENTS, ACTIVE>,
    ) -> Result<(), SegmentError> {
        match self {
            Self::Start => engine.start(),
            Self::Stop => engine.stop(),
            Self::Pause => engine.pause(),
            Self::Resume => engine.resume(),
            Self::Trigger => engine.trigger(),
            Self::SetBrightness(brightness) => engine.set_brightness(brightness),
            Self::SetSegment { slot, config } => engine.set_segment(slot, config)?,
            Self::SetMode { slot, mode } => engine.set_mode(slot, mode)?,
            Self::SetSpeed { slot, speed } => engine.set_speed(slot, speed)?,
            Self::SetColor { slot, color } => engine.set_color(slot, color)?,
            Self::SetColors { slot, colors } => engine.set_colors(slot, colors)?,
            Self::SetOptions { slot, options } => engine.set_options(slot, options)?,
            Self::AddActiveSegment(slot) => engine.add_active_segment(slot)?,
            Self::RemoveActiveSegment(slot) => engine.remove_active_segment(slot)?,
            Self::SwapActiveSegment { old, new } => engine.swap_active_segment(old, new)?,
        }
        Ok(())
    }
}

/// Bounded command queue safe to share with interrupt handlers
pub struct CommandChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Command, SIZE>>>,
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Sending half; any number of senders may coexist
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { channel: self }
    }

    /// Receiving half, normally owned by a [`CommandProcessor`]
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { channel: self }
    }

    /// Queue a command, handing it back if the queue is full
    pub fn try_send(&self, command: Command) -> Result<(), TrySendError<Command>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(TrySendError)
        })
    }

    pub fn try_receive(&self) -> Result<Command, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    pub fn try_send(&self, command: Command) -> Result<(), TrySendError<Command>> {
        let result = self.channel.try_send(command);
        #[cfg(feature = "esp32-log")]
        if result.is_err() {
            println!("[CommandSender.try_send] queue full, dropping {:?}", command);
        }
        result
    }
}

#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Result<Command, TryReceiveError> {
        self.channel.try_receive()
    }
}

/// Outcome of draining the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessedCommands {
    pub applied: usize,
    pub rejected: usize,
}

/// Drains queued commands into an engine
pub struct CommandProcessor<'a, const SIZE: usize> {
    commands: CommandReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> CommandProcessor<'a, SIZE> {
    pub const fn new(commands: CommandReceiver<'a, SIZE>) -> Self {
        Self { commands }
    }

    /// Apply every pending command (non-blocking)
    ///
    /// Commands the engine rejects are dropped and counted.
    pub fn process_pending<
        D: OutputDriver,
        const MAX_LEDS: usize,
        const SEGMENTS: usize,
        const ACTIVE: usize,
    >(
        &mut self,
        engine: &mut Engine<D, MAX_LEDS, SEGMENTS, ACTIVE>,
    ) -> ProcessedCommands {
        let mut processed = ProcessedCommands::default();
        while let Ok(command) = self.commands.try_receive() {
            match command.apply(engine) {
                Ok(()) => processed.applied += 1,
                Err(_error) => {
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[CommandProcessor.process_pending] {:?} rejected: {:?}",
                        command, _error
                    );
                    processed.rejected += 1;
                }
            }
        }
        processed
    }
}
