//! Whole-segment modes: solid colors, blinking, breathing and strobes

use super::ModeContext;
use crate::color::{Color, color_wheel};

pub(super) fn static_color(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    ctx.fill(color);
    ctx.set_cycle();
    ctx.speed()
}

/// Alternate between two colors on every call
///
/// A strobe keeps the "on" phase short and spends the rest of the period off.
fn blink(ctx: &mut ModeContext<'_>, on: Color, off: Color, strobe: bool) -> u16 {
    let (on, off) = if ctx.is_reverse() { (off, on) } else { (on, off) };
    if ctx.call() & 1 == 1 {
        ctx.fill(off);
        ctx.set_cycle();
        if strobe {
            ctx.speed().saturating_sub(20)
        } else {
            ctx.speed() / 2
        }
    } else {
        ctx.fill(on);
        if strobe { 20 } else { ctx.speed() / 2 }
    }
}

pub(super) fn blink_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let (on, off) = (ctx.color(0), ctx.color(1));
    blink(ctx, on, off, false)
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn blink_rainbow(ctx: &mut ModeContext<'_>) -> u16 {
    let on = color_wheel(ctx.call() as u8);
    let off = ctx.color(1);
    blink(ctx, on, off, false)
}

pub(super) fn strobe(ctx: &mut ModeContext<'_>) -> u16 {
    let (on, off) = (ctx.color(0), ctx.color(1));
    blink(ctx, on, off, true)
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn strobe_rainbow(ctx: &mut ModeContext<'_>) -> u16 {
    let on = color_wheel(ctx.call() as u8);
    let off = ctx.color(1);
    blink(ctx, on, off, true)
}

/// Bursts of short flashes; the burst length grows with the speed
#[allow(clippy::cast_possible_truncation)]
pub(super) fn multi_strobe(ctx: &mut ModeContext<'_>) -> u16 {
    let background = ctx.color(1);
    ctx.fill(background);

    let speed = u32::from(ctx.speed());
    let mut delay = 200 + (9 - speed % 10) * 100;
    let count = 2 * (speed / 100 + 1);
    let step = ctx.step();
    if step < count {
        if step & 1 == 0 {
            let flash = ctx.color(0);
            ctx.fill(flash);
            delay = 20;
        } else {
            delay = 50;
        }
    }
    let step = (step + 1) % (count + 1);
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    delay as u16
}

/// Triangle wave of the step counter over `0..=255`
#[allow(clippy::cast_possible_truncation)]
fn triangle(step: u32) -> u8 {
    let step = step % 512;
    let lum = if step > 255 { 511 - step } else { step };
    lum as u8
}

/// Slow "breathing" between the second and first color
pub(super) fn breath(ctx: &mut ModeContext<'_>) -> u16 {
    let lum = triangle(ctx.step());
    // pause at the bottom of each breath
    let delay = if lum == 15 {
        970
    } else if lum <= 25 {
        38
    } else if lum <= 50 {
        36
    } else if lum <= 75 {
        28
    } else if lum <= 100 {
        20
    } else if lum <= 125 {
        14
    } else if lum <= 150 {
        11
    } else {
        10
    };
    let color = ctx.color(1).blend(ctx.color(0), lum);
    ctx.fill(color);

    let mut step = ctx.step() + 2;
    if step > 512 - 15 {
        step = 15;
        ctx.set_cycle();
    }
    ctx.set_step(step);
    delay
}

pub(super) fn fade(ctx: &mut ModeContext<'_>) -> u16 {
    let lum = triangle(ctx.step());
    let color = ctx.color(1).blend(ctx.color(0), lum);
    ctx.fill(color);

    let mut step = ctx.step() + 4;
    if step > 511 {
        step = 0;
        ctx.set_cycle();
    }
    ctx.set_step(step);
    ctx.speed_div(128)
}

pub(super) fn random_color(ctx: &mut ModeContext<'_>) -> u16 {
    let index = ctx.random_wheel_index(ctx.aux());
    ctx.set_aux(index);
    ctx.fill(color_wheel(index));
    ctx.set_cycle();
    ctx.speed()
}

/// Random colors on the first call, then one random pixel per call
pub(super) fn single_dynamic(ctx: &mut ModeContext<'_>) -> u16 {
    if ctx.call() == 0 {
        for offset in 0..ctx.len() {
            let color = color_wheel(ctx.random8());
            ctx.set_pixel(offset, color);
        }
    }
    let offset = ctx.random16_below(ctx.len());
    let color = color_wheel(ctx.random8());
    ctx.set_pixel(offset, color);
    ctx.set_cycle();
    ctx.speed()
}

pub(super) fn multi_dynamic(ctx: &mut ModeContext<'_>) -> u16 {
    for offset in 0..ctx.len() {
        let color = color_wheel(ctx.random8());
        ctx.set_pixel(offset, color);
    }
    ctx.set_cycle();
    ctx.speed()
}
