// internal modules
use crate::ids::{CellId, LatticeId, MaterialId, UniverseId};
use crate::point::Point;
use crate::region::Region;

// pinlat modules
use pinlat_utils::OptionExt;

/// Occupant of a [Cell]
///
/// Nested universes and lattices are referenced by id, so any number of cells
/// may share the same fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Terminal material
    Material(MaterialId),
    /// Nested universe, entered with unchanged coordinates
    Universe(UniverseId),
    /// Nested lattice, entered with slot-local coordinates
    Lattice(LatticeId),
}

impl std::fmt::Display for Fill {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Fill::Material(id) => write!(f, "material {id}"),
            Fill::Universe(id) => write!(f, "universe {id}"),
            Fill::Lattice(id) => write!(f, "lattice {id}"),
        }
    }
}

/// A [Region] of space and what fills it
///
/// A cell without a region is the catch-all of its universe and contains
/// every point.
///
/// ```rust
/// # use pinlat_geometry::{Cell, Fill, MaterialId, Point, Surface};
/// let fuel_outer = Surface::z_cylinder(5, 0.0, 0.0, 0.41).unwrap();
/// let fuel = Cell::new(1, Fill::Material(MaterialId(1)))
///     .with_name("fuel")
///     .with_region(fuel_outer.negative());
///
/// assert!(fuel.contains(&Point::from_xy(0.0, 0.0)));
/// assert!(!fuel.contains(&Point::from_xy(0.5, 0.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: CellId,
    name: Option<String>,
    region: Option<Region>,
    fill: Fill,
}

impl Cell {
    /// Create an unbounded cell with a fill
    pub fn new(id: u32, fill: Fill) -> Self {
        Self {
            id: CellId(id),
            name: None,
            region: None,
            fill,
        }
    }

    /// Attach the bounding region
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Attach a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Cell identifier
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Optional name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Bounding region, `None` for the catch-all
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Occupant of the cell
    pub fn fill(&self) -> Fill {
        self.fill
    }

    /// Whether the point lies inside the cell
    pub fn contains(&self, point: &Point) -> bool {
        match &self.region {
            Some(region) => region.evaluate(point),
            None => true,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let region = match &self.region {
            Some(region) => region.to_string(),
            None => "everywhere".to_string(),
        };
        write!(
            f,
            "Cell {} \"{}\": {} filled with {}",
            self.id,
            self.name().display_or("unnamed"),
            region,
            self.fill
        )
    }
}
