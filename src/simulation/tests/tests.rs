use super::*;
use crate::domain::cell_state::{CloudState, Instability, Lifetime, Moisture};
use crate::domain::CellState;
use proptest::prelude::*;

fn sim_with(width: u32, height: u32, tweak: impl FnOnce(&mut SimConfig)) -> Simulation {
    let mut config = SimConfig::default();
    tweak(&mut config);
    Simulation::with_config(width, height, config).expect("test config is valid")
}

fn run(sim: &mut Simulation, ticks: u32) {
    for _ in 0..ticks {
        assert!(sim.tick(16.0));
    }
}

fn all_chunks_asleep(sim: &Simulation) -> bool {
    sim.chunks().active_chunk_count() == 0
}

// === Falling and settling ===

#[test]
fn sand_block_settles_into_full_rows() {
    let mut sim = Simulation::new(10, 50);
    assert_eq!(sim.fill_rect(0, 0, 10, 10, Material::Sand), 100);

    run(&mut sim, 150);

    assert_eq!(sim.grid().count(Material::Sand), 100);
    for y in 40..50 {
        for x in 0..10 {
            assert_eq!(sim.grid().get(x, y), Material::Sand, "hole at ({x}, {y})");
        }
    }
}

#[test]
fn fire_ignites_adjacent_wood() {
    let mut sim = sim_with(2, 1, |c| c.rules.fire.ignite_chance = 1.0);
    sim.paint(0, 0, Material::Wood);
    sim.paint(1, 0, Material::Fire);

    // Frame 0 always runs the slow pass.
    sim.tick(16.0);

    let rules = &sim.config().rules;
    match sim.grid().state(0, 0) {
        CellState::Fire(Lifetime(t)) => assert!((rules.fire.ttl_min..=rules.fire.ttl_max).contains(&t)),
        other => panic!("wood should be burning, got {other:?}"),
    }
}

#[test]
fn seed_on_moist_dirt_sprouts() {
    let mut sim = sim_with(1, 2, |c| {
        c.rules.seed.progress_chance = 1.0;
        c.rules.seed.sprout_chance = 1.0;
    });
    sim.paint(0, 0, Material::Seed);
    sim.grid.put(0, 1, CellState::Dirt(Moisture(200)));

    let mut sprouted = false;
    for _ in 0..200 {
        sim.tick(16.0);
        if sim.grid().get(0, 0) == Material::Sprout {
            sprouted = true;
            break;
        }
    }
    assert!(sprouted, "seed never sprouted: {:?}", sim.grid().state(0, 0));
}

#[test]
fn seed_on_dry_dirt_turns_to_ash() {
    let mut sim = sim_with(1, 2, |c| c.rules.seed.dry_chance = 1.0);
    sim.paint(0, 0, Material::Seed);
    sim.grid.put(0, 1, CellState::Dirt(Moisture(0)));

    run(&mut sim, 200);

    assert_eq!(sim.grid().count(Material::Seed), 0);
    assert_eq!(sim.grid().get(0, 0), Material::Ash);
}

#[test]
fn ready_seed_decays_to_ash_once_its_bed_dries_out() {
    let mut sim = sim_with(1, 2, |c| {
        c.rules.seed.progress_chance = 1.0;
        c.rules.seed.sprout_chance = 0.0;
        c.rules.seed.dry_chance = 1.0;
    });
    let ready = sim.config().rules.seed.sprout_progress;
    sim.paint(0, 0, Material::Seed);
    sim.grid.put(0, 1, CellState::Dirt(Moisture(200)));

    let mut progress = 0;
    for _ in 0..200 {
        sim.tick(16.0);
        if let CellState::Seed(s) = sim.grid().state(0, 0) {
            progress = s.progress;
        }
        if progress >= ready {
            break;
        }
    }
    assert!(progress >= ready, "seed never built up: {:?}", sim.grid().state(0, 0));

    // Same seed, bed held dry from here on.
    let mut last = progress;
    for _ in 0..200 {
        sim.grid.put(0, 1, CellState::Dirt(Moisture(0)));
        sim.tick(16.0);
        match sim.grid().state(0, 0) {
            CellState::Seed(s) => {
                assert!(s.progress <= last, "progress grew on a dry bed");
                last = s.progress;
            }
            CellState::Inert(Material::Ash) => break,
            other => panic!("seed should decay, got {other:?}"),
        }
    }
    assert_eq!(sim.grid().get(0, 0), Material::Ash);
    assert!(last < progress);
}

#[test]
fn heavy_cloud_rains_during_tick() {
    let mut sim = sim_with(16, 16, |c| c.rules.cloud.rain_chance = 1.0);
    sim.grid.put(8, 4, CellState::Cloud(CloudState::new(100, false)));

    sim.tick(16.0);

    assert_eq!(sim.grid().count(Material::Water), 1);
}

// === Air ===

#[test]
fn wall_shelters_the_lee_side() {
    let mut sim = Simulation::new(128, 64);
    // Air cells x 6..=8, y 9..=13 fully covered.
    sim.fill_rect(24, 36, 12, 20, Material::Wall);

    // One gust per lane: y = 3 runs open, y = 11 runs into the wall.
    sim.air.add_velocity_cell(4, 3, 30000.0, 0.0);
    sim.air.add_velocity_cell(4, 11, 30000.0, 0.0);
    run(&mut sim, 10);

    let (nx, ny) = sim.air().velocity_at(5, 3);
    assert!(nx > 0.0 && nx > ny.abs(), "downwind neighbor reads ({nx}, {ny})");

    let (open, _) = sim.air().velocity_at(9, 3);
    let (sheltered, _) = sim.air().velocity_at(9, 11);
    assert!(open > 0.0, "gust never reached the open probe");
    assert!(sheltered < open, "sheltered {sheltered} vs open {open}");
}

#[test]
fn wind_target_is_eased_in() {
    let mut sim = Simulation::new(64, 64);
    sim.set_wind(2000.0, 0.0);
    sim.tick(16.0);
    let (gx, _) = sim.air().global_wind();
    assert!(gx > 0.0 && gx < 2000.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn air_stays_bounded_under_abuse(
        strokes in prop::collection::vec((0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0), 1..6),
        blasts in prop::collection::vec((0i32..64, 0i32..64), 0..4),
    ) {
        let mut sim = Simulation::new(64, 64);
        for (x0, y0, x1, y1) in strokes {
            let mut tool = ToolState::new(Tool::Wind, 12.0);
            tool.direction = (1.0, -1.0);
            tool.turbulence = 0.5;
            sim.apply_stroke((x0, y0), (x1, y1), &tool);
        }
        for (x, y) in blasts {
            sim.trigger_explosion(x, y, 12, 1e9);
        }
        for _ in 0..3 {
            sim.tick(16.0);
        }
        prop_assert!(sim.air().is_within_bound());
    }
}

// === Scheduling ===

#[test]
fn same_seed_same_inputs_same_world() {
    let script = |sim: &mut Simulation| {
        let mut sand = ToolState::new(Tool::Paint(Material::Sand), 6.0);
        sand.strength = 0.6;
        sim.apply_stroke((0.2, 0.1), (0.7, 0.2), &sand);
        sim.apply_stroke((0.5, 0.3), (0.5, 0.3), &ToolState::new(Tool::Paint(Material::Water), 5.0));
        let mut wind = ToolState::new(Tool::Wind, 10.0);
        wind.turbulence = 0.3;
        sim.apply_stroke((0.1, 0.5), (0.9, 0.5), &wind);
        sim.paint(40, 60, Material::Fire);
        sim.paint(41, 61, Material::Wood);
        for _ in 0..60 {
            sim.tick(16.0);
        }
    };

    let mut a = Simulation::new(96, 96);
    let mut b = Simulation::new(96, 96);
    script(&mut a);
    script(&mut b);

    for y in 0..96 {
        for x in 0..96 {
            assert_eq!(a.grid().state(x, y), b.grid().state(x, y), "diverged at ({x}, {y})");
        }
    }
    for (x, y) in [(10.0, 10.0), (48.0, 48.0), (90.0, 20.0)] {
        assert_eq!(a.sample_pressure(x, y), b.sample_pressure(x, y));
        assert_eq!(a.sample_velocity(x, y), b.sample_velocity(x, y));
    }
}

#[test]
fn quiet_world_falls_asleep_and_skips_work() {
    let threshold = 8;
    let mut sim = sim_with(64, 64, |c| c.scheduler.sleep_threshold = threshold);
    run(&mut sim, threshold as u32 + 1);
    assert!(all_chunks_asleep(&sim));

    // Raw writes do not wake anything.
    sim.grid.put(10, 10, CellState::from(Material::Sand));
    sim.tick(16.0);
    assert_eq!(sim.grid().get(10, 10), Material::Sand);
    assert_eq!(sim.stats().cells_processed(), 0);

    // A real write wakes the neighborhood and the sand falls.
    sim.paint(20, 20, Material::Stone);
    sim.tick(16.0);
    assert_eq!(sim.grid().get(10, 10), Material::Empty);
    assert!(sim.stats().cells_processed() > 0);
}

#[test]
fn painting_wakes_owning_chunk_and_neighbors() {
    let mut sim = sim_with(160, 160, |c| c.scheduler.sleep_threshold = 2);
    run(&mut sim, 3);
    assert!(all_chunks_asleep(&sim));

    sim.paint(69, 71, Material::Stone);

    let chunks = sim.chunks();
    for cy in 0..5 {
        for cx in 0..5 {
            let expected = (1..=3).contains(&cx) && (1..=3).contains(&cy);
            assert_eq!(chunks.is_active(cx, cy), expected, "chunk ({cx}, {cy})");
            if expected {
                assert_eq!(chunks.sleep_counter(cx, cy), 0);
            }
        }
    }
}

#[test]
fn strong_wind_wakes_chunks_with_loose_material() {
    let mut sim = sim_with(64, 64, |c| c.scheduler.sleep_threshold = 2);
    sim.fill_rect(0, 63, 64, 1, Material::Sand);
    run(&mut sim, 4);
    assert!(all_chunks_asleep(&sim));

    let (aw, ah) = sim.air().dimensions();
    for ay in 0..ah {
        for ax in 0..aw {
            sim.air.add_velocity_cell(ax, ay, 20000.0, 0.0);
        }
    }
    sim.tick(16.0);

    assert!(sim.stats().wind_woken_chunks() > 0);
    // Only the bottom row of chunks holds sand.
    assert!(!sim.chunks().is_active(0, 0));
}

#[test]
fn paused_tick_changes_nothing() {
    let mut sim = Simulation::new(32, 32);
    sim.paint(5, 5, Material::Sand);
    sim.set_paused(true);

    assert!(!sim.tick(16.0));
    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.grid().get(5, 5), Material::Sand);

    sim.set_paused(false);
    assert!(sim.tick(16.0));
    assert_eq!(sim.frame(), 1);
}

#[test]
fn slow_pass_runs_on_its_interval() {
    let mut sim = sim_with(16, 16, |c| c.slow_interval = 3);
    let mut slow = Vec::new();
    for _ in 0..7 {
        sim.tick(16.0);
        slow.push(sim.stats().slow_pass());
    }
    assert_eq!(slow, [true, false, false, true, false, false, true]);
}

// === Effects through the simulation ===

#[test]
fn blast_primes_charges_which_go_off_next_tick() {
    let mut sim = Simulation::new(64, 64);
    sim.paint(32, 63, Material::Gunpowder);

    let report = sim.trigger_explosion(32, 60, 6, 10000.0);
    assert_eq!(report.primed, 1);
    assert_eq!(sim.grid().state(32, 63), CellState::Gunpowder(Instability::PRIMED));

    sim.tick(16.0);
    assert_eq!(sim.grid().count(Material::Gunpowder), 0);
    assert_eq!(sim.grid().get(32, 63), Material::Fire);
}

#[test]
fn triggers_outside_the_world_do_nothing() {
    let mut sim = Simulation::new(32, 32);
    assert_eq!(sim.trigger_explosion(-1, 5, 8, 1000.0), Default::default());
    assert_eq!(sim.trigger_lightning(5, 32).branches, 0);
    assert_eq!(sim.grid().non_empty_count(), 0);
}

// === Strokes ===

#[test]
fn full_strength_paint_covers_the_disc() {
    let mut sim = Simulation::new(64, 64);
    sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &ToolState::new(Tool::Paint(Material::Sand), 3.0));
    // Lattice points with dx² + dy² <= 9.
    assert_eq!(sim.grid().count(Material::Sand), 29);
}

#[test]
fn paint_keeps_occupied_cells_unless_overwriting() {
    let mut sim = Simulation::new(64, 64);
    sim.paint(32, 32, Material::Stone);
    let mut tool = ToolState::new(Tool::Paint(Material::Sand), 0.0);
    sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &tool);
    assert_eq!(sim.grid().get(32, 32), Material::Stone);

    tool.overwrite = true;
    sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &tool);
    assert_eq!(sim.grid().get(32, 32), Material::Sand);
}

#[test]
fn garbage_stroke_input_is_clamped() {
    let mut sim = sim_with(64, 64, |c| c.max_brush_radius = 4.0);

    let mut dot = ToolState::new(Tool::Paint(Material::Sand), f32::NAN);
    dot.direction = (f32::NAN, f32::INFINITY);
    sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &dot);
    assert_eq!(sim.grid().count(Material::Sand), 1);
    assert_eq!(sim.grid().get(32, 32), Material::Sand);

    sim.clear();
    let huge = ToolState::new(Tool::Paint(Material::Stone), 1e9);
    // Clamps to a drag along the top edge, (0, 0) to (63, 0).
    sim.apply_stroke((f32::NAN, -3.0), (7.0, f32::NEG_INFINITY), &huge);
    assert_eq!(sim.grid().get(0, 0), Material::Stone);
    assert_eq!(sim.grid().get(63, 0), Material::Stone);
    for y in 5..64 {
        for x in 0..64 {
            assert_eq!(sim.grid().get(x, y), Material::Empty, "radius cap exceeded at ({x}, {y})");
        }
    }

    let mut faint = ToolState::new(Tool::Paint(Material::Water), 3.0);
    faint.strength = f32::NAN;
    sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &faint);
    assert_eq!(sim.grid().count(Material::Water), 0);
}

#[test]
fn erase_clears_the_disc() {
    let mut sim = Simulation::new(32, 32);
    sim.fill_rect(0, 0, 32, 32, Material::Stone);
    sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &ToolState::new(Tool::Erase, 2.0));
    assert_eq!(sim.grid().count(Material::Stone), 32 * 32 - 13);
}

#[test]
fn heat_and_cold_transform_the_center_cell() {
    let mut sim = sim_with(64, 64, |c| c.rules.misc.tool_transform_chance = 1.0);
    let center = (0.5, 0.5);

    sim.paint(32, 32, Material::Sand);
    sim.apply_stroke(center, center, &ToolState::new(Tool::Heat, 0.0));
    assert_eq!(sim.grid().get(32, 32), Material::Glass);

    sim.paint(32, 32, Material::Empty);
    sim.paint(32, 32, Material::Water);
    sim.apply_stroke(center, center, &ToolState::new(Tool::Cold, 0.0));
    assert_eq!(sim.grid().get(32, 32), Material::Ice);

    sim.paint(32, 32, Material::Empty);
    sim.paint(32, 32, Material::Lava);
    sim.apply_stroke(center, center, &ToolState::new(Tool::Cold, 0.0));
    assert_eq!(sim.grid().get(32, 32), Material::Basalt);
}

#[test]
fn beam_tool_burns_along_its_direction() {
    let mut sim = Simulation::new(64, 64);
    sim.paint(20, 32, Material::Wood);
    let mut beam = ToolState::new(Tool::Beam, 1.0);
    beam.direction = (1.0, 0.0);
    sim.apply_stroke((0.1, 0.5), (0.1, 0.5), &beam);
    assert_eq!(sim.grid().get(20, 32), Material::Fire);
}

#[test]
fn wind_stroke_pushes_air_along_the_drag() {
    let mut sim = Simulation::new(64, 64);
    sim.apply_stroke((0.2, 0.5), (0.8, 0.5), &ToolState::new(Tool::Wind, 8.0));
    let (vx, _) = sim.sample_velocity(32.0, 32.0);
    assert!(vx > 0.0);

    // A click without direction raises pressure instead.
    let before = sim.sample_pressure(16.0, 16.0);
    sim.apply_stroke((0.25, 0.25), (0.25, 0.25), &ToolState::new(Tool::Wind, 8.0));
    assert!(sim.sample_pressure(16.0, 16.0) > before);
}

#[test]
fn spawn_tool_respects_arena_capacity() {
    let mut sim = sim_with(32, 32, |c| c.entity_capacity = 2);
    let tool = ToolState::new(Tool::Spawn(EntityKind::Bird), 1.0);
    for _ in 0..4 {
        sim.apply_stroke((0.5, 0.5), (0.5, 0.5), &tool);
    }
    assert_eq!(sim.entities().len(), 2);
}

#[test]
fn unknown_tool_ids_decode_to_none() {
    assert_eq!(Tool::from_ids(0, Material::Sand.id()), Some(Tool::Paint(Material::Sand)));
    assert_eq!(Tool::from_ids(0, 250), None);
    assert_eq!(Tool::from_ids(5, 9), None);
    assert_eq!(Tool::from_ids(42, 0), None);
}

// === Queries and lifecycle ===

#[test]
fn sampling_outside_reads_wall() {
    let mut sim = Simulation::new(16, 16);
    sim.paint(3, 4, Material::Water);
    assert_eq!(sim.sample_material(3.7, 4.2), Material::Water);
    assert_eq!(sim.sample_material(-0.5, 4.0), Material::Wall);
    assert_eq!(sim.sample_material(16.0, 0.0), Material::Wall);
    assert_eq!(sim.sample_material(f32::NAN, 1.0), Material::Wall);
}

#[test]
fn reset_and_clear_rearm_every_chunk() {
    let mut sim = sim_with(64, 64, |c| c.scheduler.sleep_threshold = 1);
    sim.fill_rect(0, 0, 8, 8, Material::Stone);
    run(&mut sim, 3);
    sim.clear_dirty_chunks();
    assert!(all_chunks_asleep(&sim));

    sim.clear();
    assert_eq!(sim.grid().non_empty_count(), 0);
    assert_eq!(sim.chunks().active_chunk_count(), sim.chunks().total_chunks());
    assert_eq!(sim.dirty_chunks().len(), sim.chunks().total_chunks());

    sim.reset(100, 40);
    assert_eq!((sim.width(), sim.height()), (100, 40));
    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.chunks().dimensions(), (4, 2));
    assert_eq!(sim.dirty_chunks(), (0..8).collect::<Vec<u32>>());
    assert_eq!(sim.air().dimensions(), (25, 10));
}

#[test]
fn rejected_config_keeps_the_current_one() {
    let mut sim = Simulation::new(16, 16);
    let before = sim.config().clone();

    assert!(matches!(sim.load_config("{ not json"), Err(ConfigError::Parse(_))));
    assert!(matches!(
        sim.load_config(r#"{"slow_interval": 0}"#),
        Err(ConfigError::Invalid { .. })
    ));
    assert_eq!(sim.config(), &before);

    sim.load_config(r#"{"seed": 7, "rules": {"fire": {"ignite_chance": 0.5}}}"#).expect("valid config");
    assert_eq!(sim.config().seed, 7);
    assert_eq!(sim.config().rules.fire.ignite_chance, 0.5);
    assert_eq!(sim.config().slow_interval, before.slow_interval);

    let json = sim.config_json().expect("serializes");
    assert_eq!(SimConfig::from_json(&json).expect("round trip"), *sim.config());
}
