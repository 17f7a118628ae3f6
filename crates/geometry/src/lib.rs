//! Constructive solid geometry for pin cell and lattice models
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod cell;
mod error;
mod geometry;
mod ids;
mod lattice;
mod material;
mod point;
mod raster;
mod region;
mod surface;
mod universe;

pub mod models;

// inline important the geometry-related modules for a nice public API
#[doc(inline)]
pub use surface::{Axis, BoundaryCondition, Sense, Surface, SurfaceKind};

#[doc(inline)]
pub use region::{complement, half_space, intersect, union, HalfSpace, Region};

#[doc(inline)]
pub use cell::{Cell, Fill};

#[doc(inline)]
pub use universe::Universe;

#[doc(inline)]
pub use lattice::{Lattice, LatticeHit};

#[doc(inline)]
pub use geometry::{Geometry, GeometryBuilder, LatticeSlot, Level, Location, MAX_DEPTH};

#[doc(inline)]
pub use raster::{Basis, MaterialMap, RasterSpec};

#[doc(inline)]
pub use ids::{CellId, LatticeId, MaterialId, SurfaceId, UniverseId};

#[doc(inline)]
pub use material::Material;

#[doc(inline)]
pub use point::Point;

#[doc(inline)]
pub use error::{Error, Result};
