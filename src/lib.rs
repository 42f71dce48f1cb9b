#![no_std]

pub mod color;
pub mod command;
pub mod engine;
pub mod gamma;
pub mod math8;
pub mod mode;
pub mod output;
pub mod pixels;
pub mod segment;
pub mod transition;

pub use color::{Color, Rgb};
pub use command::{
    Command, CommandChannel, CommandProcessor, CommandReceiver, CommandSender, ProcessedCommands,
    TryReceiveError, TrySendError,
};
pub use engine::{Engine, EngineConfig, ShowFn};
pub use mode::{ModeContext, ModeFn, ModeId, ModeTable};
pub use output::{NoOutput, SmartLedsOutput};
pub use pixels::{ConfigError, PixelLayout};
pub use segment::{
    FadeRate, Segment, SegmentConfig, SegmentError, SegmentOptions, SegmentRuntime, SegmentSize,
};
pub use transition::{Transition, TransitionDirection};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The engine is generic over this trait.
pub trait OutputDriver {
    /// Send raw pixel bytes to the strip
    ///
    /// Bytes are in the channel order of the engine's [`PixelLayout`],
    /// with brightness already applied.
    fn write(&mut self, pixels: &[u8]);
}
