//! Material taxonomy - static classification tables keyed by material id.
//!
//! Every cell of the world grid holds exactly one `Material`. Behavior code never
//! branches on raw ids; it asks `classify` for density, category, flags and the
//! wind coupling coefficient.

use serde::{Deserialize, Serialize};

pub type MaterialId = u8;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Empty = 0,
    Wall = 1,
    Stone = 2,
    Wood = 3,
    Metal = 4,
    Rust = 5,
    Obsidian = 6,
    Basalt = 7,
    Glass = 8,
    Ice = 9,
    Tnt = 10,
    Plant = 11,
    Sprout = 12,
    Vine = 13,
    Sand = 14,
    WetSand = 15,
    Dirt = 16,
    Gravel = 17,
    Ash = 18,
    Seed = 19,
    Ant = 20,
    Gunpowder = 21,
    Foam = 22,
    Water = 23,
    Oil = 24,
    Acid = 25,
    Lava = 26,
    Soap = 27,
    Nitro = 28,
    Smoke = 29,
    Steam = 30,
    Cloud = 31,
    Methane = 32,
    Fire = 33,
    Spark = 34,
}

pub const MATERIAL_COUNT: usize = 35;

impl Material {
    pub const ALL: [Material; MATERIAL_COUNT] = [
        Material::Empty,
        Material::Wall,
        Material::Stone,
        Material::Wood,
        Material::Metal,
        Material::Rust,
        Material::Obsidian,
        Material::Basalt,
        Material::Glass,
        Material::Ice,
        Material::Tnt,
        Material::Plant,
        Material::Sprout,
        Material::Vine,
        Material::Sand,
        Material::WetSand,
        Material::Dirt,
        Material::Gravel,
        Material::Ash,
        Material::Seed,
        Material::Ant,
        Material::Gunpowder,
        Material::Foam,
        Material::Water,
        Material::Oil,
        Material::Acid,
        Material::Lava,
        Material::Soap,
        Material::Nitro,
        Material::Smoke,
        Material::Steam,
        Material::Cloud,
        Material::Methane,
        Material::Fire,
        Material::Spark,
    ];

    /// Decode a raw id. Unknown ids yield `None`; callers treat that as a no-op.
    #[inline]
    pub fn from_id(id: MaterialId) -> Option<Material> {
        Self::ALL.get(id as usize).copied()
    }

    #[inline]
    pub fn id(self) -> MaterialId {
        self as u8
    }

    #[inline]
    pub fn info(self) -> &'static MaterialInfo {
        &MATERIAL_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Material::Empty
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Empty,
    /// Rigid: never moves, never displaced.
    Solid,
    Powder,
    Fluid,
    Gas,
}

pub type MaterialFlags = u16;

pub const FLAG_NONE: MaterialFlags = 0;
pub const FLAG_BURNABLE: MaterialFlags = 1 << 0;
/// Dissolved by acid into smoke.
pub const FLAG_ORGANIC: MaterialFlags = 1 << 1;
pub const FLAG_CONDUCTIVE: MaterialFlags = 1 << 2;
pub const FLAG_EXPLOSIVE: MaterialFlags = 1 << 3;
/// Ignition source for neighbors (fire, spark, lava).
pub const FLAG_HOT: MaterialFlags = 1 << 4;
pub const FLAG_SURFACTANT: MaterialFlags = 1 << 5;
pub const FLAG_INDESTRUCTIBLE: MaterialFlags = 1 << 6;
/// Water-like liquid: wets powders, quenches lava, boils into steam.
pub const FLAG_WET: MaterialFlags = 1 << 7;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialInfo {
    pub name: &'static str,
    /// 0..=9, higher sinks.
    pub density: u8,
    pub category: Category,
    pub flags: MaterialFlags,
    /// 0.0 (ignores wind) ..= 1.0 (carried fully by wind).
    pub coupling: f32,
    /// Lateral cells a fluid/gas may spread per tick.
    pub dispersion: u8,
}

impl MaterialInfo {
    #[inline]
    pub fn has(&self, flag: MaterialFlags) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    pub fn is_rigid(&self) -> bool {
        self.category == Category::Solid
    }

    /// Empty or gas: cells a falling body or a rising gas may pass through.
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self.category, Category::Empty | Category::Gas)
    }

    #[inline]
    pub fn is_fluid(&self) -> bool {
        self.category == Category::Fluid
    }

    #[inline]
    pub fn is_gas(&self) -> bool {
        self.category == Category::Gas
    }

    #[inline]
    pub fn is_loose(&self) -> bool {
        matches!(self.category, Category::Powder | Category::Fluid | Category::Gas)
    }
}

/// Inert rigid stand-in returned for ids outside the table.
pub const UNKNOWN_INFO: MaterialInfo = MaterialInfo {
    name: "unknown",
    density: 9,
    category: Category::Solid,
    flags: FLAG_NONE,
    coupling: 0.0,
    dispersion: 0,
};

const fn info(
    name: &'static str,
    density: u8,
    category: Category,
    flags: MaterialFlags,
    coupling: f32,
    dispersion: u8,
) -> MaterialInfo {
    MaterialInfo { name, density, category, flags, coupling, dispersion }
}

use Category::{Empty as E, Fluid as L, Gas as G, Powder as P, Solid as S};

pub static MATERIAL_TABLE: [MaterialInfo; MATERIAL_COUNT] = [
    info("empty", 0, E, FLAG_NONE, 0.0, 0),
    info("wall", 9, S, FLAG_INDESTRUCTIBLE, 0.0, 0),
    info("stone", 9, S, FLAG_NONE, 0.0, 0),
    info("wood", 9, S, FLAG_BURNABLE | FLAG_ORGANIC, 0.0, 0),
    info("metal", 9, S, FLAG_CONDUCTIVE, 0.0, 0),
    info("rust", 9, S, FLAG_NONE, 0.0, 0),
    info("obsidian", 9, S, FLAG_NONE, 0.0, 0),
    info("basalt", 9, S, FLAG_NONE, 0.0, 0),
    info("glass", 9, S, FLAG_NONE, 0.0, 0),
    info("ice", 9, S, FLAG_NONE, 0.0, 0),
    info("tnt", 9, S, FLAG_EXPLOSIVE | FLAG_BURNABLE, 0.0, 0),
    info("plant", 9, S, FLAG_BURNABLE | FLAG_ORGANIC, 0.0, 0),
    info("sprout", 9, S, FLAG_BURNABLE | FLAG_ORGANIC, 0.0, 0),
    info("vine", 9, S, FLAG_BURNABLE | FLAG_ORGANIC, 0.0, 0),
    info("sand", 7, P, FLAG_NONE, 0.8, 0),
    info("wet_sand", 8, P, FLAG_NONE, 0.2, 0),
    info("dirt", 7, P, FLAG_NONE, 0.35, 0),
    info("gravel", 8, P, FLAG_NONE, 0.1, 0),
    info("ash", 5, P, FLAG_NONE, 0.95, 0),
    info("seed", 6, P, FLAG_BURNABLE | FLAG_ORGANIC, 0.7, 0),
    info("ant", 5, P, FLAG_BURNABLE | FLAG_ORGANIC, 0.3, 0),
    info("gunpowder", 6, P, FLAG_EXPLOSIVE | FLAG_BURNABLE, 0.6, 0),
    info("foam", 2, P, FLAG_NONE, 0.9, 0),
    info("water", 4, L, FLAG_WET, 0.15, 4),
    info("oil", 3, L, FLAG_BURNABLE | FLAG_ORGANIC, 0.15, 3),
    info("acid", 4, L, FLAG_WET, 0.15, 3),
    info("lava", 6, L, FLAG_HOT, 0.02, 1),
    info("soap", 4, L, FLAG_WET | FLAG_SURFACTANT, 0.15, 3),
    info("nitro", 5, L, FLAG_EXPLOSIVE, 0.1, 2),
    info("smoke", 1, G, FLAG_NONE, 1.0, 2),
    info("steam", 1, G, FLAG_NONE, 0.9, 2),
    info("cloud", 1, G, FLAG_NONE, 0.6, 1),
    info("methane", 1, G, FLAG_EXPLOSIVE | FLAG_BURNABLE, 0.9, 2),
    info("fire", 1, G, FLAG_HOT, 0.7, 1),
    info("spark", 1, G, FLAG_HOT, 0.5, 0),
];

/// Classification lookup. Total: unknown ids map to an inert rigid entry with zero coupling.
#[inline]
pub fn classify(id: MaterialId) -> &'static MaterialInfo {
    MATERIAL_TABLE.get(id as usize).unwrap_or(&UNKNOWN_INFO)
}

/// Displacement rule behind every gravity, buoyancy and sinking move:
/// the source may trade places with the target iff the target is not rigid
/// and strictly lighter. Empty (density 0) and gases (density 1) are therefore
/// open to every powder and fluid.
#[inline]
pub fn can_displace(source: &MaterialInfo, target: &MaterialInfo) -> bool {
    !target.is_rigid() && target.density < source.density
}
