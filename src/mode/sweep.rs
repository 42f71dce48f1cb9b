//! Modes that move along the segment: wipes, scanners and rainbows

use super::ModeContext;
use crate::color::{Color, color_wheel};
use crate::math8::sine8;

/// Step counter narrowed to a pixel offset
#[allow(clippy::cast_possible_truncation)]
fn step_offset(ctx: &ModeContext<'_>) -> u16 {
    ctx.step().min(u32::from(u16::MAX)) as u16
}

/// Light the segment pixel by pixel with `first`, then with `second`
///
/// With `back` set the second pass runs in the opposite direction.
fn color_wipe(ctx: &mut ModeContext<'_>, first: Color, second: Color, back: bool) -> u16 {
    let len = u32::from(ctx.len());
    let step = ctx.step();
    if step < len {
        let offset = step_offset(ctx);
        ctx.set_pixel(offset, first);
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let offset = (step - len) as u16;
        let offset = if back { (ctx.len() - 1).saturating_sub(offset) } else { offset };
        ctx.set_pixel(offset, second);
    }

    let step = (step + 1) % (len * 2);
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(len * 2)
}

pub(super) fn color_wipe_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b) = (ctx.color(0), ctx.color(1));
    color_wipe(ctx, a, b, false)
}

pub(super) fn color_wipe_inverse(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b) = (ctx.color(0), ctx.color(1));
    color_wipe(ctx, b, a, false)
}

pub(super) fn color_wipe_reverse(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b) = (ctx.color(0), ctx.color(1));
    color_wipe(ctx, a, b, true)
}

pub(super) fn color_wipe_reverse_inverse(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b) = (ctx.color(0), ctx.color(1));
    color_wipe(ctx, b, a, true)
}

/// Wipe with a new random color at every pass
fn random_wipe(ctx: &mut ModeContext<'_>, back: bool) -> u16 {
    if ctx.step() % u32::from(ctx.len()) == 0 {
        let index = ctx.random_wheel_index(ctx.aux());
        ctx.set_aux(index);
    }
    let color = color_wheel(ctx.aux());
    color_wipe(ctx, color, color, back).saturating_mul(2)
}

pub(super) fn color_wipe_random(ctx: &mut ModeContext<'_>) -> u16 {
    random_wipe(ctx, false)
}

pub(super) fn color_sweep_random(ctx: &mut ModeContext<'_>) -> u16 {
    random_wipe(ctx, true)
}

/// Bounce a block of `size` pixels between both ends
fn scan(ctx: &mut ModeContext<'_>, dual: bool) -> u16 {
    let (foreground, background) = (ctx.color(0), ctx.color(1));
    let len = ctx.len();
    let size = ctx.size();
    let step = step_offset(ctx);

    ctx.fill(background);
    for i in 0..size {
        let offset = step.saturating_add(i);
        ctx.set_pixel(offset, foreground);
        if dual {
            if let Some(mirror) = (len - 1).checked_sub(offset) {
                ctx.set_pixel(mirror, foreground);
            }
        }
    }

    let step = if ctx.aux() == 0 {
        step.saturating_add(1)
    } else {
        step.saturating_sub(1)
    };
    if step == 0 {
        ctx.set_aux(0);
        ctx.set_cycle();
    }
    if step >= len.saturating_sub(size) {
        ctx.set_aux(1);
    }
    ctx.set_step(u32::from(step));
    ctx.speed_div(u32::from(len) * 2)
}

pub(super) fn scan_mode(ctx: &mut ModeContext<'_>) -> u16 {
    scan(ctx, false)
}

pub(super) fn dual_scan(ctx: &mut ModeContext<'_>) -> u16 {
    scan(ctx, true)
}

/// Single pixel bouncing back and forth, leaving a fading trail
pub(super) fn larson_scanner(ctx: &mut ModeContext<'_>) -> u16 {
    ctx.fade_out();

    let len = u32::from(ctx.len());
    let color = ctx.color(0);
    let step = ctx.step();
    let offset = if step < len {
        step
    } else {
        (len * 2).saturating_sub(step + 2)
    };
    #[allow(clippy::cast_possible_truncation)]
    let offset = offset as u16;
    ctx.set_pixel(offset, color);

    let mut step = step + 1;
    if step >= (len * 2).saturating_sub(2) {
        step = 0;
        ctx.set_cycle();
    }
    ctx.set_step(step);
    ctx.speed_div(len * 2)
}

/// Single pixel running in one direction with a fading tail
pub(super) fn comet(ctx: &mut ModeContext<'_>) -> u16 {
    ctx.fade_out();

    let (offset, color) = (step_offset(ctx), ctx.color(0));
    ctx.set_pixel(offset, color);

    let step = (ctx.step() + 1) % u32::from(ctx.len());
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(u32::from(ctx.len()))
}

/// Whole segment walks around the color wheel
#[allow(clippy::cast_possible_truncation)]
pub(super) fn rainbow(ctx: &mut ModeContext<'_>) -> u16 {
    let color = color_wheel(ctx.step() as u8);
    ctx.fill(color);

    let step = (ctx.step() + 1) & 0xFF;
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(256)
}

/// The color wheel spread over the segment, rotating
#[allow(clippy::cast_possible_truncation)]
pub(super) fn rainbow_cycle(ctx: &mut ModeContext<'_>) -> u16 {
    let len = u32::from(ctx.len());
    let step = ctx.step();
    for offset in 0..ctx.len() {
        let position = (u32::from(offset) * 256 / len + step) as u8;
        ctx.set_pixel(offset, color_wheel(position));
    }

    let step = (step + 1) & 0xFF;
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(256)
}

/// Sine wave of the first color over the second
#[allow(clippy::cast_possible_truncation)]
pub(super) fn running_lights(ctx: &mut ModeContext<'_>) -> u16 {
    let len = ctx.len();
    let (a, b) = (ctx.color(0), ctx.color(1));
    let increment = (256 / u32::from(len) * u32::from(ctx.size())).clamp(1, 255);
    let step = ctx.step();
    for i in 0..len {
        let angle = ((u32::from(i) + step) * increment) as u8;
        let color = a.blend(b, sine8(angle));
        ctx.set_pixel(len - 1 - i, color);
    }

    let step = (step + 1) % 256;
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(u32::from(len))
}
