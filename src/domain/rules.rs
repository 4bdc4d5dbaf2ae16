//! Rule rates - every probability and threshold the material rules consult.
//!
//! The table is plain data: `Default` carries the tuned values, serde lets a host
//! override any subset from JSON, and tests pin individual rates to 0.0 / 1.0 to
//! make a rule deterministic without touching the RNG.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowderRates {
    /// Effective wind below this: pure gravity.
    pub slide_band: f32,
    /// Below this: slide; at or above: saltation.
    pub saltation_band: f32,
    /// At or above: storm hops.
    pub storm_band: f32,
    /// Odds a sliding grain takes the downwind diagonal first.
    pub downwind_bias: f32,
    pub hop_chance_min: f32,
    pub hop_chance_max: f32,
    /// Odds per tick that an airborne grain drifts sideways at full storm strength.
    pub airborne_nudge: f32,
}

impl Default for PowderRates {
    fn default() -> Self {
        Self {
            slide_band: 2500.0,
            saltation_band: 6000.0,
            storm_band: 20000.0,
            downwind_bias: 0.7,
            hop_chance_min: 0.18,
            hop_chance_max: 0.35,
            airborne_nudge: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoistureRates {
    /// Moisture a dry powder gains per slow pass touching water.
    pub absorb_step: u8,
    /// Odds the touched water cell is used up.
    pub absorb_consume: f32,
    /// Sand moisture needed before it may turn into wet sand.
    pub wet_threshold: u8,
    pub wet_chance: f32,
    /// Moisture a freshly wetted sand cell starts with.
    pub wet_moisture: u8,
    pub dry_chance: f32,
    pub dirt_absorb_step: u8,
    pub dirt_evaporate_chance: f32,
}

impl Default for MoistureRates {
    fn default() -> Self {
        Self {
            absorb_step: 40,
            absorb_consume: 0.3,
            wet_threshold: 120,
            wet_chance: 0.15,
            wet_moisture: 200,
            dry_chance: 0.5,
            dirt_absorb_step: 30,
            dirt_evaporate_chance: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedRates {
    /// Dirt moisture that counts as a moist bed.
    pub germinate_moisture: u8,
    pub progress_chance: f32,
    /// Progress odds with direct water contact.
    pub water_progress_chance: f32,
    /// Progress (0..=15) needed before sprouting may happen.
    pub sprout_progress: u8,
    pub sprout_chance: f32,
    pub dry_chance: f32,
    /// Dry counter (0..=15) at which the seed dies to ash.
    pub dry_limit: u8,
}

impl Default for SeedRates {
    fn default() -> Self {
        Self {
            germinate_moisture: 60,
            progress_chance: 0.25,
            water_progress_chance: 0.6,
            sprout_progress: 12,
            sprout_chance: 0.5,
            dry_chance: 0.3,
            dry_limit: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantRates {
    pub age_chance: f32,
    /// Sprout age at which it hardens into plant.
    pub mature_age: u8,
    /// Plant age at which it starts pushing new shoots upward.
    pub grow_age: u8,
    pub grow_chance: f32,
    /// Plant age at which it turns into wood.
    pub wood_age: u8,
    pub wood_chance: f32,
    /// Below this age a dry sprout/plant may wilt into ash.
    pub young_age: u8,
    pub wilt_chance: f32,
    /// Tallest stalk a plant keeps pushing shoots onto.
    pub max_height: u8,
}

impl Default for PlantRates {
    fn default() -> Self {
        Self {
            age_chance: 0.5,
            mature_age: 16,
            grow_age: 8,
            grow_chance: 0.08,
            wood_age: 220,
            wood_chance: 0.05,
            young_age: 10,
            wilt_chance: 0.05,
            max_height: 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VineRates {
    pub age_chance: f32,
    /// Minimum age (0..=31) before a vine can extend.
    pub grow_age: u8,
    pub grow_chance: f32,
    pub climb_weight: u32,
    pub side_weight: u32,
    pub diagonal_weight: u32,
    pub dry_chance: f32,
    /// Age (0..=31) past which a fully dry vine dies.
    pub die_age: u8,
    /// Dry counter (0..=7) at which an old vine dies.
    pub dry_limit: u8,
}

impl Default for VineRates {
    fn default() -> Self {
        Self {
            age_chance: 0.3,
            grow_age: 4,
            grow_chance: 0.12,
            climb_weight: 6,
            side_weight: 3,
            diagonal_weight: 1,
            dry_chance: 0.25,
            die_age: 24,
            dry_limit: 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireRates {
    /// Burn timer range, counted in slow passes.
    pub ttl_min: u8,
    pub ttl_max: u8,
    pub ignite_chance: f32,
    pub smoke_chance: f32,
    pub extinguish_chance: f32,
    pub melt_ice_chance: f32,
    pub updraft_chance: f32,
    pub updraft_pressure: f32,
    pub updraft_velocity: f32,
}

impl Default for FireRates {
    fn default() -> Self {
        Self {
            ttl_min: 8,
            ttl_max: 24,
            ignite_chance: 0.12,
            smoke_chance: 0.35,
            extinguish_chance: 0.5,
            melt_ice_chance: 0.2,
            updraft_chance: 0.25,
            updraft_pressure: 60.0,
            updraft_velocity: 180.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkRates {
    /// Lifetime range in ticks.
    pub ttl_min: u8,
    pub ttl_max: u8,
    pub ignite_chance: f32,
    /// Odds a spark touching metal jumps along it.
    pub conduct_chance: f32,
}

impl Default for SparkRates {
    fn default() -> Self {
        Self { ttl_min: 4, ttl_max: 10, ignite_chance: 0.4, conduct_chance: 0.6 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasRates {
    pub smoke_ttl_min: u8,
    pub smoke_ttl_max: u8,
    pub steam_ttl_min: u8,
    pub steam_ttl_max: u8,
    /// Fraction of world height (from the top) where expiring steam becomes cloud.
    pub condense_height: f32,
    /// Effective horizontal wind above which gases drift with it.
    pub drift_threshold: f32,
    pub drift_chance: f32,
    /// Cloud water gained when steam merges into a cloud.
    pub steam_merge: u8,
}

impl Default for GasRates {
    fn default() -> Self {
        Self {
            smoke_ttl_min: 60,
            smoke_ttl_max: 140,
            steam_ttl_min: 90,
            steam_ttl_max: 200,
            condense_height: 0.3,
            drift_threshold: 800.0,
            drift_chance: 0.6,
            steam_merge: 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LavaRates {
    pub initial_heat: u8,
    /// Heat lost per open neighbor per slow pass.
    pub cool_per_exposure: u8,
    /// Heat gained per slow pass when mostly surrounded by lava.
    pub heat_gain: u8,
    pub crust_heat: u8,
    pub crust_chance: f32,
    pub crust_break_heat: u8,
    /// Heat at or above which a wide quench yields obsidian instead of basalt.
    pub quench_heat: u8,
    /// Liquid neighbors needed for the obsidian branch.
    pub quench_liquid: u8,
    pub quench_pressure: f32,
    pub ignite_chance: f32,
}

impl Default for LavaRates {
    fn default() -> Self {
        Self {
            initial_heat: 110,
            cool_per_exposure: 1,
            heat_gain: 2,
            crust_heat: 45,
            crust_chance: 0.25,
            crust_break_heat: 70,
            quench_heat: 60,
            quench_liquid: 2,
            quench_pressure: 2400.0,
            ignite_chance: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalRates {
    pub rust_chance: f32,
    pub acid_rust_factor: f32,
    pub melt_chance: f32,
}

impl Default for MetalRates {
    fn default() -> Self {
        Self { rust_chance: 0.004, acid_rust_factor: 10.0, melt_chance: 0.05 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcidRates {
    pub initial_strength: u8,
    /// Strength consumed per successful dissolve.
    pub cost: u8,
    pub organic_chance: f32,
    pub metal_chance: f32,
    pub stone_chance: f32,
}

impl Default for AcidRates {
    fn default() -> Self {
        Self {
            initial_strength: 64,
            cost: 8,
            organic_chance: 0.08,
            metal_chance: 0.04,
            stone_chance: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosiveRates {
    /// Local pressure that stresses unstable liquid.
    pub stress_pressure: f32,
    /// Local wind speed that stresses unstable liquid.
    pub stress_wind: f32,
    pub stress_gain: u8,
    pub stress_decay: u8,
    pub instability_threshold: u8,
    /// Local pressure that detonates unstable liquid outright.
    pub detonate_pressure: f32,
    /// Fuse length (ticks) once a timed charge is lit.
    pub tnt_fuse: u8,
    pub tnt_spark_chance: f32,
    pub tnt_radius: u32,
    pub nitro_radius: u32,
    pub gunpowder_radius: u32,
    pub methane_radius: u32,
    pub pressure: f32,
}

impl Default for ExplosiveRates {
    fn default() -> Self {
        Self {
            stress_pressure: 6000.0,
            stress_wind: 12000.0,
            stress_gain: 24,
            stress_decay: 2,
            instability_threshold: 200,
            detonate_pressure: 20000.0,
            tnt_fuse: 90,
            tnt_spark_chance: 0.15,
            tnt_radius: 10,
            nitro_radius: 6,
            gunpowder_radius: 3,
            methane_radius: 4,
            pressure: 14000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionRates {
    /// Share of the radius that is unconditionally turned into fire.
    pub core_fraction: f32,
    pub ember_chance: f32,
    pub degrade_chance: f32,
}

impl Default for ExplosionRates {
    fn default() -> Self {
        Self { core_fraction: 0.45, ember_chance: 0.35, degrade_chance: 0.6 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudRates {
    pub initial_water: u8,
    /// Upward wind needed to feed a cloud.
    pub updraft: f32,
    pub pressure: f32,
    /// Cloud cells within two cells needed to gather water.
    pub cluster_mass: u32,
    pub gain: u8,
    pub gain_chance: f32,
    pub charge_mass: u32,
    pub charge_updraft: f32,
    pub charge_water: u8,
    pub charge_chance: f32,
    pub rain_water: u8,
    pub rain_chance: f32,
    pub rain_cost: u8,
    pub lightning_water: u8,
    pub lightning_chance: f32,
}

impl Default for CloudRates {
    fn default() -> Self {
        Self {
            initial_water: 20,
            updraft: 400.0,
            pressure: 800.0,
            cluster_mass: 5,
            gain: 3,
            gain_chance: 0.2,
            charge_mass: 9,
            charge_updraft: 1200.0,
            charge_water: 90,
            charge_chance: 0.05,
            rain_water: 60,
            rain_chance: 0.04,
            rain_cost: 6,
            lightning_water: 100,
            lightning_chance: 0.01,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningRates {
    pub max_branches: usize,
    pub target_search: u32,
    pub jitter: f32,
    pub side_branch_chance: f32,
    pub side_stop_chance: f32,
    pub spark_chance: f32,
    pub path_pressure: f32,
    pub liquid_shock: f32,
    pub conductor_shock: f32,
    pub solid_shock: f32,
    pub spray_sparks: u32,
}

impl Default for LightningRates {
    fn default() -> Self {
        Self {
            max_branches: 6,
            target_search: 12,
            jitter: 0.3,
            side_branch_chance: 0.08,
            side_stop_chance: 0.12,
            spark_chance: 0.6,
            path_pressure: 500.0,
            liquid_shock: 9000.0,
            conductor_shock: 16000.0,
            solid_shock: 6000.0,
            spray_sparks: 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntRates {
    pub turn_chance: f32,
    pub pickup_chance: f32,
    pub drop_chance: f32,
    pub mound_chance: f32,
}

impl Default for AntRates {
    fn default() -> Self {
        Self { turn_chance: 0.05, pickup_chance: 0.2, drop_chance: 0.02, mound_chance: 0.01 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscRates {
    pub foam_ttl_min: u8,
    pub foam_ttl_max: u8,
    pub ice_melt_chance: f32,
    /// Per-cell odds for the heat/cold tools at full strength.
    pub tool_transform_chance: f32,
}

impl Default for MiscRates {
    fn default() -> Self {
        Self { foam_ttl_min: 40, foam_ttl_max: 80, ice_melt_chance: 0.1, tool_transform_chance: 0.25 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleRates {
    pub powder: PowderRates,
    pub moisture: MoistureRates,
    pub seed: SeedRates,
    pub plant: PlantRates,
    pub vine: VineRates,
    pub fire: FireRates,
    pub spark: SparkRates,
    pub gas: GasRates,
    pub lava: LavaRates,
    pub metal: MetalRates,
    pub acid: AcidRates,
    pub explosive: ExplosiveRates,
    pub explosion: ExplosionRates,
    pub cloud: CloudRates,
    pub lightning: LightningRates,
    pub ant: AntRates,
    pub misc: MiscRates,
}

impl RuleRates {
    /// Every probability in the table, named for error reporting.
    pub fn probabilities(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("powder.downwind_bias", self.powder.downwind_bias),
            ("powder.hop_chance_min", self.powder.hop_chance_min),
            ("powder.hop_chance_max", self.powder.hop_chance_max),
            ("powder.airborne_nudge", self.powder.airborne_nudge),
            ("moisture.absorb_consume", self.moisture.absorb_consume),
            ("moisture.wet_chance", self.moisture.wet_chance),
            ("moisture.dry_chance", self.moisture.dry_chance),
            ("moisture.dirt_evaporate_chance", self.moisture.dirt_evaporate_chance),
            ("seed.progress_chance", self.seed.progress_chance),
            ("seed.water_progress_chance", self.seed.water_progress_chance),
            ("seed.sprout_chance", self.seed.sprout_chance),
            ("seed.dry_chance", self.seed.dry_chance),
            ("plant.age_chance", self.plant.age_chance),
            ("plant.grow_chance", self.plant.grow_chance),
            ("plant.wood_chance", self.plant.wood_chance),
            ("plant.wilt_chance", self.plant.wilt_chance),
            ("vine.age_chance", self.vine.age_chance),
            ("vine.grow_chance", self.vine.grow_chance),
            ("vine.dry_chance", self.vine.dry_chance),
            ("fire.ignite_chance", self.fire.ignite_chance),
            ("fire.smoke_chance", self.fire.smoke_chance),
            ("fire.extinguish_chance", self.fire.extinguish_chance),
            ("fire.melt_ice_chance", self.fire.melt_ice_chance),
            ("fire.updraft_chance", self.fire.updraft_chance),
            ("spark.ignite_chance", self.spark.ignite_chance),
            ("spark.conduct_chance", self.spark.conduct_chance),
            ("gas.drift_chance", self.gas.drift_chance),
            ("gas.condense_height", self.gas.condense_height),
            ("lava.crust_chance", self.lava.crust_chance),
            ("lava.ignite_chance", self.lava.ignite_chance),
            ("metal.rust_chance", self.metal.rust_chance),
            ("metal.melt_chance", self.metal.melt_chance),
            ("acid.organic_chance", self.acid.organic_chance),
            ("acid.metal_chance", self.acid.metal_chance),
            ("acid.stone_chance", self.acid.stone_chance),
            ("explosive.tnt_spark_chance", self.explosive.tnt_spark_chance),
            ("explosion.core_fraction", self.explosion.core_fraction),
            ("explosion.ember_chance", self.explosion.ember_chance),
            ("explosion.degrade_chance", self.explosion.degrade_chance),
            ("cloud.gain_chance", self.cloud.gain_chance),
            ("cloud.charge_chance", self.cloud.charge_chance),
            ("cloud.rain_chance", self.cloud.rain_chance),
            ("cloud.lightning_chance", self.cloud.lightning_chance),
            ("lightning.jitter", self.lightning.jitter),
            ("lightning.side_branch_chance", self.lightning.side_branch_chance),
            ("lightning.side_stop_chance", self.lightning.side_stop_chance),
            ("lightning.spark_chance", self.lightning.spark_chance),
            ("ant.turn_chance", self.ant.turn_chance),
            ("ant.pickup_chance", self.ant.pickup_chance),
            ("ant.drop_chance", self.ant.drop_chance),
            ("ant.mound_chance", self.ant.mound_chance),
            ("misc.ice_melt_chance", self.misc.ice_melt_chance),
            ("misc.tool_transform_chance", self.misc.tool_transform_chance),
        ]
    }

    /// Ordered `(min, max)` byte ranges used to seed timers.
    pub fn ranges(&self) -> Vec<(&'static str, u8, u8)> {
        vec![
            ("fire.ttl", self.fire.ttl_min, self.fire.ttl_max),
            ("spark.ttl", self.spark.ttl_min, self.spark.ttl_max),
            ("gas.smoke_ttl", self.gas.smoke_ttl_min, self.gas.smoke_ttl_max),
            ("gas.steam_ttl", self.gas.steam_ttl_min, self.gas.steam_ttl_max),
            ("misc.foam_ttl", self.misc.foam_ttl_min, self.misc.foam_ttl_max),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_probabilities() {
        let rates = RuleRates::default();
        for (name, p) in rates.probabilities() {
            assert!((0.0..=1.0).contains(&p), "{name} = {p}");
        }
        for (name, lo, hi) in rates.ranges() {
            assert!(lo >= 1 && lo <= hi, "{name}: {lo}..={hi}");
        }
    }

    #[test]
    fn bands_are_ordered() {
        let p = PowderRates::default();
        assert!(p.slide_band < p.saltation_band && p.saltation_band < p.storm_band);
        assert!(p.hop_chance_min <= p.hop_chance_max);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let rates: RuleRates =
            serde_json::from_str(r#"{ "fire": { "ignite_chance": 1.0 } }"#).unwrap();
        assert_eq!(rates.fire.ignite_chance, 1.0);
        assert_eq!(rates.fire.ttl_min, FireRates::default().ttl_min);
        assert_eq!(rates.cloud, CloudRates::default());
    }
}
