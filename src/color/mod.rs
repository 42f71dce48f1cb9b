mod rgbw;
mod utils;

pub use rgbw::{
    BLACK, BLUE, CYAN, Color, GRAY, GREEN, MAGENTA, ORANGE, PINK, PURPLE, RED, ULTRAWHITE, WHITE,
    YELLOW,
};
use smart_leds::RGB8;
pub use utils::color_wheel;

pub type Rgb = RGB8;
