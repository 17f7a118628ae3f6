//! Result and Error types for pinlat-geometry

use crate::ids::{CellId, LatticeId, MaterialId, SurfaceId, UniverseId};
use crate::point::Point;

/// Type alias for Result<T, geometry::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `pinlat-geometry` crate
///
/// Location failures are geometry authoring bugs and are never substituted
/// with a default material.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("no cell in universe {universe} contains point {point}")]
    NoCellFound { universe: UniverseId, point: Point },

    #[error("point {point} falls outside lattice {lattice} (slot index {index:?})")]
    OutOfLatticeBounds {
        lattice: LatticeId,
        point: Point,
        index: [i64; 2],
    },

    #[error("maximum nesting depth {depth} exceeded locating point {point}")]
    GeometryCycle { depth: usize, point: Point },

    #[error("surface {surface} has an invalid radius {radius}")]
    NegativeRadius { surface: SurfaceId, radius: f64 },

    #[error("lattice {lattice} has an invalid pitch {pitch:?}")]
    InvalidPitch { lattice: LatticeId, pitch: [f64; 2] },

    #[error("lattice {lattice} has an invalid shape {shape:?}")]
    InvalidShape { lattice: LatticeId, shape: [usize; 2] },

    #[error("lattice {lattice} row {row} has {found} slots (expected {expected})")]
    UnexpectedSlotCount {
        lattice: LatticeId,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("universe {0} defined more than once")]
    DuplicateUniverse(UniverseId),

    #[error("lattice {0} defined more than once")]
    DuplicateLattice(LatticeId),

    #[error("material {0} defined more than once")]
    DuplicateMaterial(MaterialId),

    #[error("universe {0} is referenced but never defined")]
    UnknownUniverse(UniverseId),

    #[error("lattice {0} is referenced but never defined")]
    UnknownLattice(LatticeId),

    #[error("material {0} is referenced but never defined")]
    UnknownMaterial(MaterialId),

    #[error("universe {universe} has more than one unbounded cell ({cells:?})")]
    MultipleCatchAll {
        universe: UniverseId,
        cells: Vec<CellId>,
    },

    #[error("universe {0} contains no cells")]
    EmptyUniverse(UniverseId),

    #[error("cells {cells:?} of universe {universe} overlap at point {point}")]
    OverlappingCells {
        universe: UniverseId,
        cells: Vec<CellId>,
        point: Point,
    },

    #[error("universe {0:?} fill chain forms a cycle")]
    CyclicFill(Vec<UniverseId>),

    #[error("expected 2 or 3 coordinates, found {found}")]
    UnexpectedLength { found: usize },

    #[error("invalid raster definition: {0}")]
    InvalidRaster(String),

    #[error("failed input/output stream ({0})")]
    IOError(std::io::ErrorKind),

    #[error("failed to read configuration: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err.kind())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
