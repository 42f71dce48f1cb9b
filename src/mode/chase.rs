//! Chases and running patterns

use super::ModeContext;
use crate::color::{BLACK, BLUE, Color, GREEN, ORANGE, PURPLE, RED, WHITE, color_wheel};

fn to_offset(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Repeating three-color pattern, each band `size` pixels wide
fn tricolor_chase(ctx: &mut ModeContext<'_>, first: Color, second: Color, third: Color) -> u16 {
    let len = ctx.len();
    let band = u32::from(ctx.size());
    let period = band * 3;
    let step = ctx.step();
    for i in 0..len {
        let index = (step + u32::from(i)) % period;
        let color = if index < band {
            first
        } else if index < band * 2 {
            second
        } else {
            third
        };
        ctx.set_pixel(len - 1 - i, color);
    }

    let step = step.wrapping_add(1);
    ctx.set_step(step);
    if step % u32::from(len) == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(u32::from(len))
}

pub(super) fn theater_chase(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b) = (ctx.color(0), ctx.color(1));
    tricolor_chase(ctx, a, b, b)
}

pub(super) fn theater_chase_rainbow(ctx: &mut ModeContext<'_>) -> u16 {
    let index = ctx.aux().wrapping_add(1);
    ctx.set_aux(index);
    tricolor_chase(ctx, color_wheel(index), BLACK, BLACK)
}

pub(super) fn tricolor_chase_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b, c) = (ctx.color(0), ctx.color(1), ctx.color(2));
    tricolor_chase(ctx, a, b, c)
}

pub(super) fn circus_combustus(ctx: &mut ModeContext<'_>) -> u16 {
    tricolor_chase(ctx, RED, WHITE, BLACK)
}

/// Three adjacent blocks of `size` pixels moving along the segment
fn chase(ctx: &mut ModeContext<'_>, first: Color, second: Color, third: Color) -> u16 {
    let len = u32::from(ctx.len());
    let size = u32::from(ctx.size());
    let step = ctx.step();
    for i in 0..size {
        let a = (step + i) % len;
        let b = (a + size) % len;
        let c = (b + size) % len;
        ctx.set_pixel(to_offset(a), first);
        ctx.set_pixel(to_offset(b), second);
        ctx.set_pixel(to_offset(c), third);
    }

    if step + size * 3 == len {
        ctx.set_cycle();
    }
    ctx.set_step((step + 1) % len);
    ctx.speed_div(len)
}

pub(super) fn chase_white(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    chase(ctx, color, WHITE, WHITE)
}

pub(super) fn chase_color(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    chase(ctx, WHITE, color, color)
}

pub(super) fn chase_blackout(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    chase(ctx, color, BLACK, BLACK)
}

pub(super) fn bicolor_chase(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b, c) = (ctx.color(0), ctx.color(1), ctx.color(2));
    chase(ctx, a, b, c)
}

pub(super) fn chase_random(ctx: &mut ModeContext<'_>) -> u16 {
    if ctx.step() == 0 {
        let index = ctx.random_wheel_index(ctx.aux());
        ctx.set_aux(index);
    }
    let color = color_wheel(ctx.aux());
    chase(ctx, color, WHITE, WHITE)
}

/// Wheel color for the current chase position, drifting with every call
#[allow(clippy::cast_possible_truncation)]
fn rainbow_at(ctx: &ModeContext<'_>, position: u32) -> Color {
    let separation = 256 / u32::from(ctx.len());
    color_wheel((position * separation).wrapping_add(ctx.call()) as u8)
}

pub(super) fn chase_rainbow(ctx: &mut ModeContext<'_>) -> u16 {
    let color = rainbow_at(ctx, ctx.step());
    chase(ctx, color, WHITE, WHITE)
}

pub(super) fn chase_blackout_rainbow(ctx: &mut ModeContext<'_>) -> u16 {
    let color = rainbow_at(ctx, ctx.step());
    chase(ctx, color, BLACK, BLACK)
}

pub(super) fn chase_rainbow_white(ctx: &mut ModeContext<'_>) -> u16 {
    let len = u32::from(ctx.len());
    let step = ctx.step();
    let second = rainbow_at(ctx, step);
    let third = rainbow_at(ctx, (step + 1) % len);
    chase(ctx, WHITE, second, third)
}

const FLASH_COUNT: u32 = 4;

/// A pair of pixels flashes a few times, then moves one pixel on
fn chase_flash(ctx: &mut ModeContext<'_>, base: Color, flash: Color) -> u16 {
    let len = u32::from(ctx.len());
    let flash_step = ctx.call() % (FLASH_COUNT * 2 + 1);
    if flash_step < FLASH_COUNT * 2 {
        let color = if flash_step % 2 == 0 { flash } else { base };
        let step = ctx.step();
        ctx.set_pixel(to_offset(step), color);
        ctx.set_pixel(to_offset((step + 1) % len), color);
        return 30;
    }

    let step = (ctx.step() + 1) % len;
    ctx.set_step(step);
    if step == 0 {
        let index = ctx.random_wheel_index(ctx.aux());
        ctx.set_aux(index);
        ctx.set_cycle();
    }
    ctx.speed_div(len)
}

pub(super) fn chase_flash_mode(ctx: &mut ModeContext<'_>) -> u16 {
    let color = ctx.color(0);
    chase_flash(ctx, color, WHITE)
}

pub(super) fn chase_flash_random(ctx: &mut ModeContext<'_>) -> u16 {
    let color = color_wheel(ctx.aux());
    chase_flash(ctx, color, WHITE)
}

/// Feed blocks of two alternating colors in at the segment start
fn running(ctx: &mut ModeContext<'_>, first: Color, second: Color) -> u16 {
    let block = u32::from(ctx.size()) * 2;
    let step = ctx.step();
    let color = if step & block == 0 { second } else { first };
    ctx.shift_forward();
    ctx.set_pixel(0, color);

    let step = (step + 1) % u32::from(ctx.len());
    ctx.set_step(step);
    if step == 0 {
        ctx.set_cycle();
    }
    ctx.speed_div(u32::from(ctx.len()))
}

pub(super) fn running_color(ctx: &mut ModeContext<'_>) -> u16 {
    let (a, b) = (ctx.color(0), ctx.color(1));
    running(ctx, a, b)
}

pub(super) fn running_red_blue(ctx: &mut ModeContext<'_>) -> u16 {
    running(ctx, RED, BLUE)
}

pub(super) fn merry_christmas(ctx: &mut ModeContext<'_>) -> u16 {
    running(ctx, RED, GREEN)
}

pub(super) fn halloween(ctx: &mut ModeContext<'_>) -> u16 {
    running(ctx, PURPLE, ORANGE)
}

pub(super) fn running_random(ctx: &mut ModeContext<'_>) -> u16 {
    let block = u32::from(ctx.size()) * 2;
    if ctx.step() % block == 0 {
        let index = ctx.random_wheel_index(ctx.aux());
        ctx.set_aux(index);
    }
    let color = color_wheel(ctx.aux());
    running(ctx, color, color)
}
