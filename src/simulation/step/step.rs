use crate::spatial::CHUNK_SIZE;
use crate::systems::air::AIR_SCALE;
use crate::systems::behaviors::{Pass, UpdateContext};

use super::{passes, Simulation, StageClock, TickStats};

pub(super) fn tick(sim: &mut Simulation, dt_hint: f32) -> bool {
    if sim.paused {
        return false;
    }
    let mut clock = StageClock::start();
    let mut stats = TickStats {
        dt_hint: if dt_hint.is_finite() { dt_hint } else { 0.0 },
        active_chunks: sim.chunks.active_chunk_count() as u32,
        slow_pass: sim.frame % sim.config.slow_interval.max(1) as u64 == 0,
        ..TickStats::default()
    };

    // === Rule passes ===
    sim.grid.reset_updated();
    {
        let Simulation { grid, chunks, air, rng, behaviors, config, frame, .. } = sim;
        let mut ctx = UpdateContext::new(grid, chunks, air, rng, &config.rules, *frame);

        stats.cells_processed += passes::run_pass(&mut ctx, behaviors, Pass::Gravity);
        stats.cells_processed += passes::run_pass(&mut ctx, behaviors, Pass::Buoyancy);
        if stats.slow_pass {
            // Cells that merely moved this tick still get their slow rule;
            // cells the slow pass itself writes are skipped.
            ctx.grid.reset_updated();
            stats.cells_processed += passes::run_pass(&mut ctx, behaviors, Pass::Slow);
        }
        stats.cells_mutated = ctx.mutations;
    }
    stats.rules_ms = clock.lap();

    // === Air field: always the full grid, once per tick ===
    sim.air.refresh_solidity(&sim.grid);
    sim.air.step(&sim.config.air, &mut sim.rng, sim.frame);
    stats.air_ms = clock.lap();

    if sim.config.scheduler.wind_wakes_chunks {
        stats.wind_woken_chunks = wake_windy_chunks(sim);
    }
    sim.chunks.reconcile(sim.config.scheduler.sleep_threshold);

    sim.frame += 1;
    stats.tick_ms = clock.total();
    log::trace!(
        "tick {}: {} active chunks, {} cells processed, {} mutated, slow pass {}",
        sim.frame,
        stats.active_chunks,
        stats.cells_processed,
        stats.cells_mutated,
        stats.slow_pass
    );
    sim.stats = stats;
    true
}

/// Re-arm sleeping chunks that hold loose material under strong wind.
fn wake_windy_chunks(sim: &mut Simulation) -> u32 {
    let (chunks_x, chunks_y) = sim.chunks.dimensions();
    let (air_w, air_h) = sim.air.dimensions();
    let per_chunk = CHUNK_SIZE / AIR_SCALE;
    let (gx, gy) = sim.air.global_wind();
    let mix = sim.config.air.ambient_mix;
    let limit = sim.config.scheduler.wind_wake_speed;
    let limit2 = limit * limit;

    let mut woken = 0;
    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            if sim.chunks.is_active(cx, cy) {
                continue;
            }
            let ax_range = cx * per_chunk..((cx + 1) * per_chunk).min(air_w);
            let windy = (cy * per_chunk..((cy + 1) * per_chunk).min(air_h)).any(|ay| {
                ax_range.clone().any(|ax| {
                    let (vx, vy) = sim.air.velocity_at(ax, ay);
                    let (vx, vy) = (vx + gx * mix, vy + gy * mix);
                    vx * vx + vy * vy >= limit2
                })
            });
            if windy && holds_loose_material(sim, cx, cy) {
                sim.chunks.mark_active(cx, cy);
                woken += 1;
            }
        }
    }
    woken
}

fn holds_loose_material(sim: &Simulation, cx: u32, cy: u32) -> bool {
    let x0 = cx * CHUNK_SIZE;
    let y0 = cy * CHUNK_SIZE;
    let x1 = (x0 + CHUNK_SIZE).min(sim.grid.width());
    let y1 = (y0 + CHUNK_SIZE).min(sim.grid.height());
    (y0..y1).any(|y| (x0..x1).any(|x| sim.grid.get(x as i32, y as i32).info().is_loose()))
}
