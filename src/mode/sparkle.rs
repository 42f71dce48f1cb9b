//! Random pixel effects: twinkles, sparkles, fireworks and fire

use super::ModeContext;
use crate::color::{BLACK, Color, WHITE, color_wheel};
use crate::math8::sine8;

/// Random pixels light up on a background until the segment is cleared
fn twinkle(ctx: &mut ModeContext<'_>, color: Color, background: Color) -> u16 {
    let len = ctx.len();
    if ctx.step() == 0 {
        ctx.fill(background);
        let min_leds = len / 4 + 1;
        let count = ctx.random16_between(min_leds, min_leds.saturating_mul(2));
        ctx.set_step(u32::from(count));
        ctx.set_cycle();
    }
    let offset = ctx.random16_below(len);
    ctx.set_pixel(offset, color);
    ctx.set_step(ctx.step().saturating_sub(1));
    ctx.speed_div(u32::from(len))
}

pub(super) fn twinkle_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let (color, background) = (ctx.color(0), ctx.color(1));
    twinkle(ctx, color, background)
}

pub(super) fn twinkle_random(ctx: &mut ModeContext<'_>) -> u16 {
    let color = color_wheel(ctx.random8());
    let background = ctx.color(1);
    twinkle(ctx, color, background)
}

/// Random blocks light up and fade out
fn twinkle_fade(ctx: &mut ModeContext<'_>, color: Color) -> u16 {
    ctx.fade_out();
    if ctx.random8_below(3) == 0 {
        let size = ctx.size();
        let offset = ctx.random16_below(ctx.len().saturating_sub(size) + 1);
        ctx.fill_range(offset, size, color);
        ctx.set_cycle();
    }
    ctx.speed_div(8)
}

pub(super) fn twinkle_fade_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    twinkle_fade(ctx, color)
}

pub(super) fn twinkle_fade_random(ctx: &mut ModeContext<'_>) -> u16 {
    let color = color_wheel(ctx.random8());
    twinkle_fade(ctx, color)
}

/// One block at a time shows `spark` over `background`
///
/// The previous block position lives in the runtime's `aux_param3`.
fn sparkle(ctx: &mut ModeContext<'_>, background: Color, spark: Color) -> u16 {
    if ctx.call() == 0 {
        ctx.fill(background);
    }
    let size = ctx.size();
    let previous = ctx.aux3();
    ctx.fill_range(previous, size, background);

    let offset = ctx.random16_below(ctx.len().saturating_sub(size) + 1);
    ctx.set_aux3(offset);
    ctx.fill_range(offset, size, spark);
    ctx.set_cycle();
    ctx.speed_div(32)
}

pub(super) fn sparkle_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let (spark, background) = (ctx.color(0), ctx.color(1));
    sparkle(ctx, background, spark)
}

pub(super) fn flash_sparkle(ctx: &mut ModeContext<'_>) -> u16 {
    let background = ctx.color(0);
    sparkle(ctx, background, WHITE)
}

/// Several white blocks at once over the first color
pub(super) fn hyper_sparkle(ctx: &mut ModeContext<'_>) -> u16 {
    let background = ctx.color(0);
    ctx.fill(background);
    let size = ctx.size();
    let span = ctx.len().saturating_sub(size) + 1;
    for _ in 0..8 {
        let offset = ctx.random16_below(span);
        ctx.fill_range(offset, size, WHITE);
    }
    ctx.set_cycle();
    ctx.speed_div(32)
}

/// Bursts that blur into their neighbours and fade
///
/// A triggered run always launches bursts, otherwise they are random.
fn fireworks(ctx: &mut ModeContext<'_>, color: Color) -> u16 {
    ctx.fade_out();
    ctx.blur();

    let len = ctx.len();
    let size = ctx.size() * 2;
    let span = len.saturating_sub(size) + 1;
    let triggered = ctx.is_triggered();
    let attempts = (if triggered { len / 10 } else { len / 20 }).max(1);
    for _ in 0..attempts {
        if triggered || ctx.random8_below(10) == 0 {
            let offset = ctx.random16_below(span);
            ctx.fill_range(offset, size, color);
            ctx.set_cycle();
        }
    }
    ctx.speed_div(u32::from(len))
}

pub(super) fn fireworks_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    fireworks(ctx, color)
}

pub(super) fn fireworks_random(ctx: &mut ModeContext<'_>) -> u16 {
    let color = color_wheel(ctx.random8());
    fireworks(ctx, color)
}

/// Every pixel dims the first color by a random amount
///
/// A lower `damping` gives a wilder flicker.
fn fire_flicker(ctx: &mut ModeContext<'_>, damping: u8) -> u16 {
    let base = ctx.color(0);
    let lum = base.max_channel() / damping;
    for offset in 0..ctx.len() {
        let flicker = ctx.random8_below(lum);
        let color = Color::with_white(
            base.r.saturating_sub(flicker),
            base.g.saturating_sub(flicker),
            base.b.saturating_sub(flicker),
            base.w.saturating_sub(flicker),
        );
        ctx.set_pixel(offset, color);
    }
    ctx.set_cycle();
    ctx.speed_div(u32::from(ctx.len()))
}

pub(super) fn fire_flicker_mode(ctx: &mut ModeContext<'_>) -> u16 {
    fire_flicker(ctx, 3)
}

pub(super) fn fire_flicker_soft(ctx: &mut ModeContext<'_>) -> u16 {
    fire_flicker(ctx, 6)
}

pub(super) fn fire_flicker_intense(ctx: &mut ModeContext<'_>) -> u16 {
    fire_flicker(ctx, 1)
}

/// Next value of the per-pixel pseudo random sequence
const fn next_seed(seed: u16) -> u16 {
    seed.wrapping_mul(2053).wrapping_add(13849)
}

/// Pixels twinkle between colors, each at its own deterministic pace
///
/// A black first color blends random wheel colors with the second color. A
/// non-black third color is used in place of the first for about half the
/// pixels.
#[allow(clippy::cast_possible_truncation)]
pub(super) fn twinkle_fox(ctx: &mut ModeContext<'_>) -> u16 {
    let (first, second, third) = (ctx.color(0), ctx.color(1), ctx.color(2));
    let size = ctx.size();
    let call = ctx.call();
    let mut seed: u16 = 0;

    let mut offset = 0;
    while offset < ctx.len() {
        seed = next_seed(seed);
        let initial = seed.wrapping_add(seed >> 8) & 0xFF;
        seed = next_seed(seed);
        let increment = ((seed.wrapping_add(seed >> 8) & 0x07) + 1) * 2;

        let index = call
            .wrapping_mul(u32::from(increment))
            .wrapping_add(u32::from(initial)) as u8;
        let amount = sine8(index);
        let color = if first == BLACK {
            color_wheel(initial as u8).blend(second, amount)
        } else if third != BLACK && initial >= 128 {
            third.blend(second, amount)
        } else {
            first.blend(second, amount)
        };
        ctx.fill_range(offset, size, color);
        offset = offset.saturating_add(size);
    }
    ctx.set_cycle();
    ctx.speed_div(32)
}
