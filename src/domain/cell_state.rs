//! Per-cell state as a tagged union.
//!
//! Storage keeps one aux byte per cell, but nothing outside this module reads
//! or writes that byte directly: it is decoded into a `CellState` selected by the
//! cell's material, and encoded back on write. Changing a cell's material always
//! goes through a constructor (`fresh` / `spawn`), so bits left behind by the
//! previous material can never be misread by the next one.

use crate::core::Rng;
use crate::domain::materials::Material;
use crate::domain::rules::RuleRates;

/// Wetness 0..=255.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Moisture(pub u8);

/// Germination progress (4 bits) plus dry-spell counter (4 bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedState {
    pub progress: u8,
    pub dry: u8,
}

impl SeedState {
    pub const MAX: u8 = 15;

    pub fn new(progress: u8, dry: u8) -> Self {
        Self { progress: progress.min(Self::MAX), dry: dry.min(Self::MAX) }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthState {
    pub age: u8,
}

/// Age (5 bits) plus dry counter (3 bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VineState {
    pub age: u8,
    pub dry: u8,
}

impl VineState {
    pub const MAX_AGE: u8 = 31;
    pub const MAX_DRY: u8 = 7;

    pub fn new(age: u8, dry: u8) -> Self {
        Self { age: age.min(Self::MAX_AGE), dry: dry.min(Self::MAX_DRY) }
    }
}

/// Heat 0..=127 plus a crust flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LavaState {
    pub heat: u8,
    pub crust: bool,
}

impl LavaState {
    pub const MAX_HEAT: u8 = 127;

    pub fn new(heat: u8, crust: bool) -> Self {
        Self { heat: heat.min(Self::MAX_HEAT), crust }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcidState {
    pub strength: u8,
}

/// Water content 0..=127 plus a charge flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloudState {
    pub water: u8,
    pub charged: bool,
}

impl CloudState {
    pub const MAX_WATER: u8 = 127;

    pub fn new(water: u8, charged: bool) -> Self {
        Self { water: water.min(Self::MAX_WATER), charged }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heading {
    #[default]
    East,
    West,
    North,
    South,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::East, Heading::West, Heading::North, Heading::South];

    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::East => (1, 0),
            Heading::West => (-1, 0),
            Heading::North => (0, -1),
            Heading::South => (0, 1),
        }
    }

    #[inline]
    pub fn reversed(self) -> Heading {
        match self {
            Heading::East => Heading::West,
            Heading::West => Heading::East,
            Heading::North => Heading::South,
            Heading::South => Heading::North,
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }

    fn from_bits(bits: u8) -> Heading {
        Self::ALL[(bits & 0b11) as usize]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AntState {
    pub heading: Heading,
    pub carrying: bool,
}

/// Stress accumulator for unstable explosives. 255 means "detonate next tick".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Instability(pub u8);

impl Instability {
    pub const PRIMED: Instability = Instability(u8::MAX);
}

/// 0 = unlit, otherwise ticks left before detonation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fuse(pub u8);

/// Remaining lifetime; what a unit means depends on which pass decrements it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lifetime(pub u8);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Empty,
    /// Any material without per-cell state.
    Inert(Material),
    Sand(Moisture),
    WetSand(Moisture),
    Dirt(Moisture),
    Seed(SeedState),
    Sprout(GrowthState),
    Plant(GrowthState),
    Vine(VineState),
    Lava(LavaState),
    Acid(AcidState),
    Cloud(CloudState),
    Ant(AntState),
    Nitro(Instability),
    Gunpowder(Instability),
    Methane(Instability),
    Tnt(Fuse),
    Fire(Lifetime),
    Spark(Lifetime),
    Smoke(Lifetime),
    Steam(Lifetime),
    Foam(Lifetime),
}

impl CellState {
    pub fn material(&self) -> Material {
        match self {
            CellState::Empty => Material::Empty,
            CellState::Inert(m) => *m,
            CellState::Sand(_) => Material::Sand,
            CellState::WetSand(_) => Material::WetSand,
            CellState::Dirt(_) => Material::Dirt,
            CellState::Seed(_) => Material::Seed,
            CellState::Sprout(_) => Material::Sprout,
            CellState::Plant(_) => Material::Plant,
            CellState::Vine(_) => Material::Vine,
            CellState::Lava(_) => Material::Lava,
            CellState::Acid(_) => Material::Acid,
            CellState::Cloud(_) => Material::Cloud,
            CellState::Ant(_) => Material::Ant,
            CellState::Nitro(_) => Material::Nitro,
            CellState::Gunpowder(_) => Material::Gunpowder,
            CellState::Methane(_) => Material::Methane,
            CellState::Tnt(_) => Material::Tnt,
            CellState::Fire(_) => Material::Fire,
            CellState::Spark(_) => Material::Spark,
            CellState::Smoke(_) => Material::Smoke,
            CellState::Steam(_) => Material::Steam,
            CellState::Foam(_) => Material::Foam,
        }
    }

    /// Read the stored byte through the layout selected by `material`.
    pub fn decode(material: Material, aux: u8) -> CellState {
        match material {
            Material::Empty => CellState::Empty,
            Material::Sand => CellState::Sand(Moisture(aux)),
            Material::WetSand => CellState::WetSand(Moisture(aux)),
            Material::Dirt => CellState::Dirt(Moisture(aux)),
            Material::Seed => CellState::Seed(SeedState { progress: aux & 0x0F, dry: aux >> 4 }),
            Material::Sprout => CellState::Sprout(GrowthState { age: aux }),
            Material::Plant => CellState::Plant(GrowthState { age: aux }),
            Material::Vine => CellState::Vine(VineState { age: aux & 0x1F, dry: aux >> 5 }),
            Material::Lava => CellState::Lava(LavaState { heat: aux & 0x7F, crust: aux & 0x80 != 0 }),
            Material::Acid => CellState::Acid(AcidState { strength: aux }),
            Material::Cloud => CellState::Cloud(CloudState { water: aux & 0x7F, charged: aux & 0x80 != 0 }),
            Material::Ant => CellState::Ant(AntState {
                heading: Heading::from_bits(aux),
                carrying: aux & 0b100 != 0,
            }),
            Material::Nitro => CellState::Nitro(Instability(aux)),
            Material::Gunpowder => CellState::Gunpowder(Instability(aux)),
            Material::Methane => CellState::Methane(Instability(aux)),
            Material::Tnt => CellState::Tnt(Fuse(aux)),
            Material::Fire => CellState::Fire(Lifetime(aux)),
            Material::Spark => CellState::Spark(Lifetime(aux)),
            Material::Smoke => CellState::Smoke(Lifetime(aux)),
            Material::Steam => CellState::Steam(Lifetime(aux)),
            Material::Foam => CellState::Foam(Lifetime(aux)),
            other => CellState::Inert(other),
        }
    }

    /// Storage form: material tag plus the packed aux byte.
    pub fn encode(&self) -> (Material, u8) {
        let aux = match *self {
            CellState::Empty | CellState::Inert(_) => 0,
            CellState::Sand(m) | CellState::WetSand(m) | CellState::Dirt(m) => m.0,
            CellState::Seed(s) => (s.progress.min(SeedState::MAX)) | (s.dry.min(SeedState::MAX) << 4),
            CellState::Sprout(g) | CellState::Plant(g) => g.age,
            CellState::Vine(v) => v.age.min(VineState::MAX_AGE) | (v.dry.min(VineState::MAX_DRY) << 5),
            CellState::Lava(l) => l.heat.min(LavaState::MAX_HEAT) | ((l.crust as u8) << 7),
            CellState::Acid(a) => a.strength,
            CellState::Cloud(c) => c.water.min(CloudState::MAX_WATER) | ((c.charged as u8) << 7),
            CellState::Ant(a) => a.heading.bits() | ((a.carrying as u8) << 2),
            CellState::Nitro(i) | CellState::Gunpowder(i) | CellState::Methane(i) => i.0,
            CellState::Tnt(f) => f.0,
            CellState::Fire(t)
            | CellState::Spark(t)
            | CellState::Smoke(t)
            | CellState::Steam(t)
            | CellState::Foam(t) => t.0,
        };
        (self.material(), aux)
    }

    /// Deterministic initial state for a material.
    pub fn fresh(material: Material, rules: &RuleRates) -> CellState {
        match material {
            Material::Empty => CellState::Empty,
            Material::Sand => CellState::Sand(Moisture(0)),
            Material::WetSand => CellState::WetSand(Moisture(rules.moisture.wet_moisture)),
            Material::Dirt => CellState::Dirt(Moisture(0)),
            Material::Seed => CellState::Seed(SeedState::default()),
            Material::Sprout => CellState::Sprout(GrowthState::default()),
            Material::Plant => CellState::Plant(GrowthState::default()),
            Material::Vine => CellState::Vine(VineState::default()),
            Material::Lava => CellState::Lava(LavaState::new(rules.lava.initial_heat, false)),
            Material::Acid => CellState::Acid(AcidState { strength: rules.acid.initial_strength }),
            Material::Cloud => CellState::Cloud(CloudState::new(rules.cloud.initial_water, false)),
            Material::Ant => CellState::Ant(AntState::default()),
            Material::Nitro => CellState::Nitro(Instability(0)),
            Material::Gunpowder => CellState::Gunpowder(Instability(0)),
            Material::Methane => CellState::Methane(Instability(0)),
            Material::Tnt => CellState::Tnt(Fuse(0)),
            Material::Fire => CellState::Fire(Lifetime(rules.fire.ttl_max)),
            Material::Spark => CellState::Spark(Lifetime(rules.spark.ttl_max)),
            Material::Smoke => CellState::Smoke(Lifetime(rules.gas.smoke_ttl_max)),
            Material::Steam => CellState::Steam(Lifetime(rules.gas.steam_ttl_max)),
            Material::Foam => CellState::Foam(Lifetime(rules.misc.foam_ttl_max)),
            other => CellState::Inert(other),
        }
    }

    /// Initial state with randomized timers and headings, used whenever a rule
    /// or a tool creates a cell.
    pub fn spawn(material: Material, rng: &mut Rng, rules: &RuleRates) -> CellState {
        let roll = |rng: &mut Rng, lo: u8, hi: u8| rng.range(lo as i32, hi as i32) as u8;
        match material {
            Material::Fire => CellState::Fire(Lifetime(roll(rng, rules.fire.ttl_min, rules.fire.ttl_max))),
            Material::Spark => CellState::Spark(Lifetime(roll(rng, rules.spark.ttl_min, rules.spark.ttl_max))),
            Material::Smoke => {
                CellState::Smoke(Lifetime(roll(rng, rules.gas.smoke_ttl_min, rules.gas.smoke_ttl_max)))
            }
            Material::Steam => {
                CellState::Steam(Lifetime(roll(rng, rules.gas.steam_ttl_min, rules.gas.steam_ttl_max)))
            }
            Material::Foam => {
                CellState::Foam(Lifetime(roll(rng, rules.misc.foam_ttl_min, rules.misc.foam_ttl_max)))
            }
            Material::Ant => CellState::Ant(AntState {
                heading: if rng.coin() { Heading::East } else { Heading::West },
                carrying: false,
            }),
            other => CellState::fresh(other, rules),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellState::Empty)
    }
}

impl From<Material> for CellState {
    /// Default-rules initial state; prefer `fresh` when a rule table is at hand.
    fn from(material: Material) -> Self {
        CellState::fresh(material, &RuleRates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode_for_packed_layouts() {
        let samples = [
            CellState::Seed(SeedState::new(11, 3)),
            CellState::Vine(VineState::new(29, 6)),
            CellState::Lava(LavaState::new(90, true)),
            CellState::Cloud(CloudState::new(127, true)),
            CellState::Ant(AntState { heading: Heading::North, carrying: true }),
            CellState::Tnt(Fuse(17)),
            CellState::Inert(Material::Metal),
        ];
        for s in samples {
            let (m, aux) = s.encode();
            assert_eq!(CellState::decode(m, aux), s);
        }
    }

    #[test]
    fn packed_fields_saturate_instead_of_bleeding() {
        let (_, aux) = CellState::Lava(LavaState { heat: 200, crust: false }).encode();
        assert_eq!(aux & 0x80, 0, "heat overflow must not set the crust bit");
        let (_, aux) = CellState::Cloud(CloudState { water: 255, charged: false }).encode();
        assert_eq!(aux, CloudState::MAX_WATER);
    }

    #[test]
    fn transitions_never_inherit_stale_bits() {
        let rules = RuleRates::default();
        // A charged, saturated cloud leaves 0xFF behind...
        let (_, stale) = CellState::Cloud(CloudState::new(127, true)).encode();
        assert_eq!(stale, 0xFF);
        // ...which would read as a primed explosive if reinterpreted in place.
        assert_eq!(CellState::decode(Material::Nitro, stale), CellState::Nitro(Instability::PRIMED));
        // Constructing the new state explicitly yields the documented initial value.
        assert_eq!(CellState::fresh(Material::Nitro, &rules), CellState::Nitro(Instability(0)));
        assert_eq!(CellState::fresh(Material::Tnt, &rules), CellState::Tnt(Fuse(0)));
    }

    #[test]
    fn spawned_fire_timer_is_in_range() {
        let rules = RuleRates::default();
        let mut rng = Rng::new(99);
        for _ in 0..500 {
            match CellState::spawn(Material::Fire, &mut rng, &rules) {
                CellState::Fire(Lifetime(t)) => {
                    assert!((rules.fire.ttl_min..=rules.fire.ttl_max).contains(&t))
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn every_material_round_trips_its_fresh_state() {
        let rules = RuleRates::default();
        for m in Material::ALL {
            let s = CellState::fresh(m, &rules);
            assert_eq!(s.material(), m);
            let (em, aux) = s.encode();
            assert_eq!(em, m);
            assert_eq!(CellState::decode(em, aux), s);
        }
    }
}
