use embassy_time::Instant;

/// Set by a mode when it changed pixels in the current pass
const FRAME_FLAG: u8 = 0b1000_0000;
/// Set by a mode when it completed a full animation period
const CYCLE_FLAG: u8 = 0b0100_0000;

/// Mutable timing and scratch state of one active-index position
///
/// The counters and aux fields belong to the mode function; the engine only
/// resets them and advances `counter_mode_call` after each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRuntime {
    /// Time at which the mode runs next
    pub next_time: Instant,
    /// Animation phase
    pub counter_mode_step: u32,
    /// Number of times the mode ran since the last reset
    pub counter_mode_call: u32,
    /// Scratch byte, usually a color wheel index
    pub aux_param: u8,
    /// Frame and cycle flags; the low six bits are free for modes
    pub aux_param2: u8,
    /// Scratch half-word, initialised to the owning segment index
    pub aux_param3: u16,
}

impl Default for SegmentRuntime {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SegmentRuntime {
    /// Fresh runtime for the given segment, due immediately
    pub const fn new(segment: u8) -> Self {
        Self {
            next_time: Instant::from_millis(0),
            counter_mode_step: 0,
            counter_mode_call: 0,
            aux_param: 0,
            aux_param2: 0,
            aux_param3: segment as u16,
        }
    }

    /// Reset everything except the timer, so a running frame completes
    pub(crate) fn reset_keep_timing(&mut self, segment: u8) {
        let next_time = self.next_time;
        *self = Self::new(segment);
        self.next_time = next_time;
    }

    pub const fn is_frame(&self) -> bool {
        self.aux_param2 & FRAME_FLAG != 0
    }

    pub const fn is_cycle(&self) -> bool {
        self.aux_param2 & CYCLE_FLAG != 0
    }

    pub fn set_frame(&mut self) {
        self.aux_param2 |= FRAME_FLAG;
    }

    pub fn set_cycle(&mut self) {
        self.aux_param2 |= CYCLE_FLAG;
    }

    pub(crate) fn clear_frame(&mut self) {
        self.aux_param2 &= !FRAME_FLAG;
    }

    pub(crate) fn clear_cycle(&mut self) {
        self.aux_param2 &= !CYCLE_FLAG;
    }
}
