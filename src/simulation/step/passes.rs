use crate::spatial::CHUNK_SIZE;
use crate::systems::behaviors::{
    fast_pass_of, has_slow_rule, scan_left_to_right, BehaviorRegistry, Pass, UpdateContext,
};

/// One full scan for `pass`. Gravity runs bottom row first, the others top row first.
/// Returns how many cells were handed to a behavior.
pub(super) fn run_pass(ctx: &mut UpdateContext, behaviors: &BehaviorRegistry, pass: Pass) -> u32 {
    let height = ctx.grid.height();
    let mut processed = 0;
    match pass {
        Pass::Gravity => {
            for y in (0..height).rev() {
                processed += process_row(ctx, behaviors, pass, y);
            }
        }
        Pass::Buoyancy | Pass::Slow => {
            for y in 0..height {
                processed += process_row(ctx, behaviors, pass, y);
            }
        }
    }
    processed
}

/// Cells of row `y` lying in active chunks, in this row's scan direction.
fn process_row(ctx: &mut UpdateContext, behaviors: &BehaviorRegistry, pass: Pass, y: u32) -> u32 {
    let width = ctx.grid.width();
    let (chunks_x, _) = ctx.chunks.dimensions();
    let cy = y / CHUNK_SIZE;
    let go_right = scan_left_to_right(ctx.frame, y);
    let mut processed = 0;

    for i in 0..chunks_x {
        let cx = if go_right { i } else { chunks_x - 1 - i };
        if !ctx.chunks.is_active(cx, cy) {
            continue;
        }
        let start_x = cx * CHUNK_SIZE;
        let end_x = (start_x + CHUNK_SIZE).min(width);
        if go_right {
            for x in start_x..end_x {
                processed += visit(ctx, behaviors, pass, x, y);
            }
        } else {
            for x in (start_x..end_x).rev() {
                processed += visit(ctx, behaviors, pass, x, y);
            }
        }
    }
    processed
}

#[inline]
fn visit(ctx: &mut UpdateContext, behaviors: &BehaviorRegistry, pass: Pass, x: u32, y: u32) -> u32 {
    if ctx.grid.is_updated(x, y) {
        return 0;
    }
    let material = ctx.grid.get(x as i32, y as i32);
    let routed = match pass {
        Pass::Slow => has_slow_rule(material),
        fast => fast_pass_of(material) == Some(fast),
    };
    if !routed {
        return 0;
    }
    ctx.at(x, y);
    behaviors.update(pass, material, ctx);
    1
}
