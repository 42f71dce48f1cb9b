//! Mode dispatch
//!
//! Every mode is a plain function with the [`ModeFn`] signature. The engine
//! keeps a [`ModeTable`] of 64 entries indexed by [`ModeId`]: ids 0-55 are the
//! built-in modes, ids 56-63 are slots for user supplied functions. Dispatch
//! is a single array lookup.

mod basic;
mod chase;
mod context;
mod sparkle;
mod sweep;

pub use context::ModeContext;

/// Render function of a mode
///
/// Draws the current segment through the context and returns the number of
/// milliseconds until it should run again. Zero means "on the next pass".
pub type ModeFn = fn(&mut ModeContext<'_>) -> u16;

/// Total number of mode ids
pub const MODE_COUNT: usize = 64;
/// Number of built-in modes
pub const BUILTIN_MODE_COUNT: usize = 56;
/// Number of user supplied mode slots
pub const MAX_CUSTOM_MODES: usize = MODE_COUNT - BUILTIN_MODE_COUNT;

/// Delay returned by unassigned custom slots
const CUSTOM_MODE_IDLE_MS: u16 = 1000;

/// Known mode ids
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModeId {
    Static = 0,
    Blink = 1,
    Breath = 2,
    ColorWipe = 3,
    ColorWipeInverse = 4,
    ColorWipeReverse = 5,
    ColorWipeReverseInverse = 6,
    ColorWipeRandom = 7,
    RandomColor = 8,
    SingleDynamic = 9,
    MultiDynamic = 10,
    Rainbow = 11,
    RainbowCycle = 12,
    Scan = 13,
    DualScan = 14,
    Fade = 15,
    TheaterChase = 16,
    TheaterChaseRainbow = 17,
    RunningLights = 18,
    Twinkle = 19,
    TwinkleRandom = 20,
    TwinkleFade = 21,
    TwinkleFadeRandom = 22,
    Sparkle = 23,
    FlashSparkle = 24,
    HyperSparkle = 25,
    Strobe = 26,
    StrobeRainbow = 27,
    MultiStrobe = 28,
    BlinkRainbow = 29,
    ChaseWhite = 30,
    ChaseColor = 31,
    ChaseRandom = 32,
    ChaseRainbow = 33,
    ChaseFlash = 34,
    ChaseFlashRandom = 35,
    ChaseRainbowWhite = 36,
    ChaseBlackout = 37,
    ChaseBlackoutRainbow = 38,
    ColorSweepRandom = 39,
    RunningColor = 40,
    RunningRedBlue = 41,
    RunningRandom = 42,
    LarsonScanner = 43,
    Comet = 44,
    Fireworks = 45,
    FireworksRandom = 46,
    MerryChristmas = 47,
    FireFlicker = 48,
    FireFlickerSoft = 49,
    FireFlickerIntense = 50,
    CircusCombustus = 51,
    Halloween = 52,
    BicolorChase = 53,
    TricolorChase = 54,
    TwinkleFox = 55,
    Custom0 = 56,
    Custom1 = 57,
    Custom2 = 58,
    Custom3 = 59,
    Custom4 = 60,
    Custom5 = 61,
    Custom6 = 62,
    Custom7 = 63,
}

const MODE_NAMES: [&str; MODE_COUNT] = [
    "Static",
    "Blink",
    "Breath",
    "Color Wipe",
    "Color Wipe Inverse",
    "Color Wipe Reverse",
    "Color Wipe Reverse Inverse",
    "Color Wipe Random",
    "Random Color",
    "Single Dynamic",
    "Multi Dynamic",
    "Rainbow",
    "Rainbow Cycle",
    "Scan",
    "Dual Scan",
    "Fade",
    "Theater Chase",
    "Theater Chase Rainbow",
    "Running Lights",
    "Twinkle",
    "Twinkle Random",
    "Twinkle Fade",
    "Twinkle Fade Random",
    "Sparkle",
    "Flash Sparkle",
    "Hyper Sparkle",
    "Strobe",
    "Strobe Rainbow",
    "Multi Strobe",
    "Blink Rainbow",
    "Chase White",
    "Chase Color",
    "Chase Random",
    "Chase Rainbow",
    "Chase Flash",
    "Chase Flash Random",
    "Chase Rainbow White",
    "Chase Blackout",
    "Chase Blackout Rainbow",
    "Color Sweep Random",
    "Running Color",
    "Running Red Blue",
    "Running Random",
    "Larson Scanner",
    "Comet",
    "Fireworks",
    "Fireworks Random",
    "Merry Christmas",
    "Fire Flicker",
    "Fire Flicker (soft)",
    "Fire Flicker (intense)",
    "Circus Combustus",
    "Halloween",
    "Bicolor Chase",
    "Tricolor Chase",
    "TwinkleFOX",
    "Custom 0",
    "Custom 1",
    "Custom 2",
    "Custom 3",
    "Custom 4",
    "Custom 5",
    "Custom 6",
    "Custom 7",
];

impl ModeId {
    /// Every id, in id order
    pub const ALL: [Self; MODE_COUNT] = [
        Self::Static,
        Self::Blink,
        Self::Breath,
        Self::ColorWipe,
        Self::ColorWipeInverse,
        Self::ColorWipeReverse,
        Self::ColorWipeReverseInverse,
        Self::ColorWipeRandom,
        Self::RandomColor,
        Self::SingleDynamic,
        Self::MultiDynamic,
        Self::Rainbow,
        Self::RainbowCycle,
        Self::Scan,
        Self::DualScan,
        Self::Fade,
        Self::TheaterChase,
        Self::TheaterChaseRainbow,
        Self::RunningLights,
        Self::Twinkle,
        Self::TwinkleRandom,
        Self::TwinkleFade,
        Self::TwinkleFadeRandom,
        Self::Sparkle,
        Self::FlashSparkle,
        Self::HyperSparkle,
        Self::Strobe,
        Self::StrobeRainbow,
        Self::MultiStrobe,
        Self::BlinkRainbow,
        Self::ChaseWhite,
        Self::ChaseColor,
        Self::ChaseRandom,
        Self::ChaseRainbow,
        Self::ChaseFlash,
        Self::ChaseFlashRandom,
        Self::ChaseRainbowWhite,
        Self::ChaseBlackout,
        Self::ChaseBlackoutRainbow,
        Self::ColorSweepRandom,
        Self::RunningColor,
        Self::RunningRedBlue,
        Self::RunningRandom,
        Self::LarsonScanner,
        Self::Comet,
        Self::Fireworks,
        Self::FireworksRandom,
        Self::MerryChristmas,
        Self::FireFlicker,
        Self::FireFlickerSoft,
        Self::FireFlickerIntense,
        Self::CircusCombustus,
        Self::Halloween,
        Self::BicolorChase,
        Self::TricolorChase,
        Self::TwinkleFox,
        Self::Custom0,
        Self::Custom1,
        Self::Custom2,
        Self::Custom3,
        Self::Custom4,
        Self::Custom5,
        Self::Custom6,
        Self::Custom7,
    ];

    pub const fn from_raw(value: u8) -> Option<Self> {
        if (value as usize) < MODE_COUNT {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    /// Id of custom slot `index` (0-7)
    pub const fn custom(index: u8) -> Option<Self> {
        if (index as usize) < MAX_CUSTOM_MODES {
            Self::from_raw(BUILTIN_MODE_COUNT as u8 + index)
        } else {
            None
        }
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn is_custom(self) -> bool {
        self as usize >= BUILTIN_MODE_COUNT
    }

    /// Default display name
    pub const fn as_str(self) -> &'static str {
        MODE_NAMES[self as usize]
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}

/// Built-in render functions in id order
const BUILTIN_MODES: [ModeFn; BUILTIN_MODE_COUNT] = [
    basic::static_color,
    basic::blink_mode,
    basic::breath,
    sweep::color_wipe_mode,
    sweep::color_wipe_inverse,
    sweep::color_wipe_reverse,
    sweep::color_wipe_reverse_inverse,
    sweep::color_wipe_random,
    basic::random_color,
    basic::single_dynamic,
    basic::multi_dynamic,
    sweep::rainbow,
    sweep::rainbow_cycle,
    sweep::scan_mode,
    sweep::dual_scan,
    basic::fade,
    chase::theater_chase,
    chase::theater_chase_rainbow,
    sweep::running_lights,
    sparkle::twinkle_mode,
    sparkle::twinkle_random,
    sparkle::twinkle_fade_mode,
    sparkle::twinkle_fade_random,
    sparkle::sparkle_mode,
    sparkle::flash_sparkle,
    sparkle::hyper_sparkle,
    basic::strobe,
    basic::strobe_rainbow,
    basic::multi_strobe,
    basic::blink_rainbow,
    chase::chase_white,
    chase::chase_color,
    chase::chase_random,
    chase::chase_rainbow,
    chase::chase_flash_mode,
    chase::chase_flash_random,
    chase::chase_rainbow_white,
    chase::chase_blackout,
    chase::chase_blackout_rainbow,
    sweep::color_sweep_random,
    chase::running_color,
    chase::running_red_blue,
    chase::running_random,
    sweep::larson_scanner,
    sweep::comet,
    sparkle::fireworks_mode,
    sparkle::fireworks_random,
    chase::merry_christmas,
    sparkle::fire_flicker_mode,
    sparkle::fire_flicker_soft,
    sparkle::fire_flicker_intense,
    chase::circus_combustus,
    chase::halloween,
    chase::bicolor_chase,
    chase::tricolor_chase_mode,
    sparkle::twinkle_fox,
];

fn custom_idle(_ctx: &mut ModeContext<'_>) -> u16 {
    CUSTOM_MODE_IDLE_MS
}

/// Name and render function of one mode id
#[derive(Debug, Clone, Copy)]
pub struct ModeEntry {
    pub name: &'static str,
    pub render: ModeFn,
}

/// Dispatch table indexed by [`ModeId`]
#[derive(Debug, Clone)]
pub struct ModeTable {
    entries: [ModeEntry; MODE_COUNT],
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeTable {
    /// Table with the built-in modes and idle custom slots
    pub const fn new() -> Self {
        let mut entries = [ModeEntry {
            name: "",
            render: custom_idle,
        }; MODE_COUNT];
        let mut index = 0;
        while index < MODE_COUNT {
            entries[index].name = MODE_NAMES[index];
            if index < BUILTIN_MODE_COUNT {
                entries[index].render = BUILTIN_MODES[index];
            }
            index += 1;
        }
        Self { entries }
    }

    pub fn render_fn(&self, id: ModeId) -> ModeFn {
        self.entries[id as usize].render
    }

    pub fn name(&self, id: ModeId) -> &'static str {
        self.entries[id as usize].name
    }

    /// Install a user mode into custom slot `index` (0-7)
    ///
    /// Returns the id the mode is reachable under.
    pub fn set_custom(&mut self, index: u8, name: &'static str, render: ModeFn) -> Option<ModeId> {
        let id = ModeId::custom(index)?;
        self.entries[id as usize] = ModeEntry { name, render };
        Some(id)
    }

    /// Look up a mode by its current display name
    pub fn find(&self, name: &str) -> Option<ModeId> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .and_then(|index| u8::try_from(index).ok())
            .and_then(ModeId::from_raw)
    }
}
