//! Reference pin cell and fuel assembly models
//!
//! Both models use the same three materials and the same pin dimensions:
//!
//! | Id | Material  | Cells            |
//! | -- | --------- | ---------------- |
//! | 1  | uo2       | fuel (1)         |
//! | 2  | zirconium | cladding (2)     |
//! | 3  | h2o       | coolant (3, 4)   |
//!
//! Parameters can be loaded from JSON, with anything missing taken from the
//! defaults:
//!
//! ```rust
//! # use pinlat_geometry::models::{pin_cell, PinCellConfig};
//! # use pinlat_geometry::{MaterialId, Point};
//! let config: PinCellConfig = serde_json::from_str(r#"{ "pitch": 1.5 }"#).unwrap();
//! assert_eq!(config.fuel_outer_radius, 0.41);
//!
//! let geometry = pin_cell(&config).unwrap();
//! assert_eq!(geometry.locate(&Point::from_xy(0.7, 0.7)).unwrap(), MaterialId(3));
//! ```

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// internal modules
use crate::cell::{Cell, Fill};
use crate::error::Result;
use crate::geometry::{Geometry, GeometryBuilder};
use crate::ids::{LatticeId, MaterialId, UniverseId};
use crate::lattice::Lattice;
use crate::material::Material;
use crate::region::intersect;
use crate::surface::{BoundaryCondition, Surface};
use crate::universe::Universe;

// external crates
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Uranium dioxide fuel
pub const UO2: MaterialId = MaterialId(1);
/// Zirconium cladding
pub const ZIRCONIUM: MaterialId = MaterialId(2);
/// Light water coolant
pub const H2O: MaterialId = MaterialId(3);

/// Fuel pin universe in the assembly
pub const FUEL_PIN: UniverseId = UniverseId(1);
/// Coolant channel universe in the assembly
pub const COOLANT_CHANNEL: UniverseId = UniverseId(2);
/// Assembly lattice
pub const ASSEMBLY_LATTICE: LatticeId = LatticeId(5);
/// Root universe of both models
pub const ROOT: UniverseId = UniverseId(0);

/// Read any configuration type from a JSON file
pub fn from_json_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    info!("Reading {}", path.as_ref().display());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Pin cell dimensions \[cm\]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinCellConfig {
    /// Centre to centre pin spacing
    pub pitch: f64,
    /// Outer radius of the fuel pellet
    pub fuel_outer_radius: f64,
    /// Outer radius of the cladding
    pub clad_outer_radius: f64,
    /// Condition on the outer box planes
    pub boundary: BoundaryCondition,
}

impl Default for PinCellConfig {
    fn default() -> Self {
        Self {
            pitch: 1.26,
            fuel_outer_radius: 0.41,
            clad_outer_radius: 0.48,
            boundary: BoundaryCondition::Reflective,
        }
    }
}

impl PinCellConfig {
    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        from_json_file(path)
    }
}

/// Contents of an assembly lattice slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    /// Fuel pin with cladding and coolant
    Fuel,
    /// Empty coolant channel, e.g. a guide tube position
    Channel,
}

impl PinKind {
    fn universe(&self) -> UniverseId {
        match self {
            PinKind::Fuel => FUEL_PIN,
            PinKind::Channel => COOLANT_CHANNEL,
        }
    }
}

/// Assembly dimensions and layout
///
/// The layout is written top row first, the way it looks on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Pin dimensions shared by every slot
    pub pin: PinCellConfig,
    /// Slot contents, top row first
    pub layout: Vec<Vec<PinKind>>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        use PinKind::{Channel as C, Fuel as F};
        Self {
            pin: PinCellConfig::default(),
            layout: vec![
                vec![F, F, F, F],
                vec![F, C, F, F],
                vec![F, F, F, F],
                vec![F, F, F, F],
            ],
        }
    }
}

impl AssemblyConfig {
    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        from_json_file(path)
    }

    /// Number of slots as [nx, ny], taken from the first row
    pub fn shape(&self) -> [usize; 2] {
        let nx = self.layout.first().map(|row| row.len()).unwrap_or(0);
        [nx, self.layout.len()]
    }

    /// Full width of the assembly box as [x, y]
    pub fn width(&self) -> [f64; 2] {
        let [nx, ny] = self.shape();
        [nx as f64 * self.pin.pitch, ny as f64 * self.pin.pitch]
    }
}

fn register_materials(builder: &mut GeometryBuilder) -> Result<()> {
    builder.add_material(Material::new(UO2.0, "uo2"))?;
    builder.add_material(Material::new(ZIRCONIUM.0, "zirconium"))?;
    builder.add_material(Material::new(H2O.0, "h2o"))?;
    Ok(())
}

/// Box planes (left, right, bottom, top) with surface ids 1-4
fn box_planes(half_width: [f64; 2], boundary: BoundaryCondition) -> [Surface; 4] {
    [
        Surface::x_plane(1, -half_width[0]).with_boundary(boundary),
        Surface::x_plane(2, half_width[0]).with_boundary(boundary),
        Surface::y_plane(3, -half_width[1]).with_boundary(boundary),
        Surface::y_plane(4, half_width[1]).with_boundary(boundary),
    ]
}

/// Fuel and cladding cylinders with surface ids 5 and 6
fn pin_cylinders(config: &PinCellConfig) -> Result<(Surface, Surface)> {
    Ok((
        Surface::z_cylinder(5, 0.0, 0.0, config.fuel_outer_radius)?,
        Surface::z_cylinder(6, 0.0, 0.0, config.clad_outer_radius)?,
    ))
}

/// Single reflected fuel pin
///
/// Fuel inside the fuel radius, cladding out to the clad radius, and coolant
/// out to the box planes at `±pitch/2`.
pub fn pin_cell(config: &PinCellConfig) -> Result<Geometry> {
    let half = 0.5 * config.pitch;
    let [left, right, bottom, top] = box_planes([half, half], config.boundary);
    let (fuel_outer, clad_outer) = pin_cylinders(config)?;

    let fuel = Cell::new(1, Fill::Material(UO2))
        .with_name("fuel")
        .with_region(fuel_outer.negative());
    let cladding = Cell::new(2, Fill::Material(ZIRCONIUM))
        .with_name("cladding")
        .with_region(intersect([fuel_outer.positive(), clad_outer.negative()]));
    let coolant = Cell::new(3, Fill::Material(H2O))
        .with_name("coolant")
        .with_region(intersect([
            left.positive(),
            right.negative(),
            bottom.positive(),
            top.negative(),
            clad_outer.positive(),
        ]));

    let mut builder = GeometryBuilder::new();
    register_materials(&mut builder)?;
    builder.add_universe(Universe::new(ROOT.0, [fuel, cladding, coolant]).with_name("root universe"))?;

    debug!("Pin cell model with pitch {} cm", config.pitch);
    builder.build(ROOT)
}

/// Lattice of fuel pins and coolant channels
///
/// The lattice is centred on the origin and clipped by a single cell bounded
/// by the assembly box planes.
pub fn assembly(config: &AssemblyConfig) -> Result<Geometry> {
    let pitch = config.pin.pitch;
    let [nx, ny] = config.shape();
    let [width_x, width_y] = config.width();
    let half = [0.5 * width_x, 0.5 * width_y];

    let [left, right, bottom, top] = box_planes(half, config.pin.boundary);
    let (fuel_outer, clad_outer) = pin_cylinders(&config.pin)?;
    let inside_box = || {
        intersect([
            left.positive(),
            right.negative(),
            bottom.positive(),
            top.negative(),
        ])
    };

    // fuel pin universe, the coolant is unbounded and clipped by the lattice
    let fuel_pin = Universe::new(
        FUEL_PIN.0,
        [
            Cell::new(1, Fill::Material(UO2))
                .with_name("fuel")
                .with_region(fuel_outer.negative()),
            Cell::new(2, Fill::Material(ZIRCONIUM))
                .with_name("cladding")
                .with_region(intersect([fuel_outer.positive(), clad_outer.negative()])),
            Cell::new(3, Fill::Material(H2O))
                .with_name("coolant")
                .with_region(clad_outer.positive()),
        ],
    );

    // coolant channel universe, anything inside the assembly box
    let channel = Universe::new(
        COOLANT_CHANNEL.0,
        [Cell::new(4, Fill::Material(H2O))
            .with_name("coolant_channel")
            .with_region(inside_box())],
    );

    let rows = config
        .layout
        .iter()
        .map(|row| row.iter().map(PinKind::universe).collect())
        .collect();
    let lattice = Lattice::from_rows_top_down(
        ASSEMBLY_LATTICE.0,
        [-half[0], -half[1]],
        [pitch, pitch],
        rows,
    )?
    .with_name("assembly");

    let lattice_cell = Cell::new(999, Fill::Lattice(ASSEMBLY_LATTICE))
        .with_name("lattice_cell")
        .with_region(inside_box());

    let mut builder = GeometryBuilder::new();
    register_materials(&mut builder)?;
    builder.add_universe(fuel_pin)?;
    builder.add_universe(channel)?;
    builder.add_lattice(lattice)?;
    builder.add_universe(Universe::new(ROOT.0, [lattice_cell]).with_name("root universe"))?;

    debug!("Assembly model with {nx}x{ny} slots and pitch {pitch} cm");
    builder.build(ROOT)
}
