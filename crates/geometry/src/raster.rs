//! Material maps over a planar slice of the geometry
//!
//! This is the data behind a material-coloured plot: every pixel centre is
//! located and the material recorded. Drawing it is left to the caller.

// standard library
use std::collections::BTreeMap;

// internal modules
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::ids::MaterialId;
use crate::point::Point;

// pinlat modules
use pinlat_utils::f;

// external crates
use itertools::iproduct;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Plane of the slice
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Horizontal x, vertical y
    #[default]
    XY,
    /// Horizontal x, vertical z
    XZ,
    /// Horizontal y, vertical z
    YZ,
}

/// Definition of a rectangular slice
///
/// The defaults match a 300x300 pixel view of a single 1.26 cm pin cell
/// centred on the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSpec {
    /// Centre of the slice
    pub origin: Point,
    /// Full width of the slice as [horizontal, vertical]
    pub width: [f64; 2],
    /// Number of pixels as [horizontal, vertical]
    pub pixels: [usize; 2],
    /// Plane of the slice
    pub basis: Basis,
}

impl Default for RasterSpec {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            width: [1.26, 1.26],
            pixels: [300, 300],
            basis: Basis::XY,
        }
    }
}

impl RasterSpec {
    /// Centre of pixel (col, row), with row 0 at the top of the image
    pub fn pixel_center(&self, col: usize, row: usize) -> Point {
        let du = self.width[0] / self.pixels[0] as f64;
        let dv = self.width[1] / self.pixels[1] as f64;
        let u = -0.5 * self.width[0] + (col as f64 + 0.5) * du;
        let v = 0.5 * self.width[1] - (row as f64 + 0.5) * dv;

        let o = self.origin;
        match self.basis {
            Basis::XY => Point::new(o.x + u, o.y + v, o.z),
            Basis::XZ => Point::new(o.x + u, o.y, o.z + v),
            Basis::YZ => Point::new(o.x, o.y + u, o.z + v),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pixels.contains(&0) {
            return Err(Error::InvalidRaster(f!("pixels {:?}", self.pixels)));
        }
        if self.width.iter().any(|w| !(*w > 0.0 && w.is_finite())) {
            return Err(Error::InvalidRaster(f!("width {:?}", self.width)));
        }
        Ok(())
    }
}

/// Materials found at each pixel of a [RasterSpec]
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialMap {
    pixels: [usize; 2],
    materials: Vec<MaterialId>,
}

impl MaterialMap {
    /// Number of pixels as [horizontal, vertical]
    pub fn pixels(&self) -> [usize; 2] {
        self.pixels
    }

    /// Material at pixel (col, row)
    pub fn get(&self, col: usize, row: usize) -> Option<MaterialId> {
        if col < self.pixels[0] && row < self.pixels[1] {
            Some(self.materials[row * self.pixels[0] + col])
        } else {
            None
        }
    }

    /// Rows of materials, top row first
    pub fn rows(&self) -> impl Iterator<Item = &[MaterialId]> {
        self.materials.chunks(self.pixels[0])
    }

    /// Number of pixels per material
    pub fn counts(&self) -> BTreeMap<MaterialId, usize> {
        let mut counts = BTreeMap::new();
        for id in &self.materials {
            *counts.entry(*id).or_insert(0) += 1;
        }
        counts
    }

    /// Fraction of pixels filled by a material
    pub fn fraction(&self, material: MaterialId) -> f64 {
        let n = self.materials.iter().filter(|id| **id == material).count();
        n as f64 / self.materials.len() as f64
    }
}

impl std::fmt::Display for MaterialMap {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = String::with_capacity(self.materials.len() + self.pixels[1]);
        for row in self.rows() {
            s.extend(row.iter().map(|id| symbol(*id)));
            s.push('\n');
        }
        write!(f, "{}", s)
    }
}

/// Single character for a material, base-36 digit of the id
fn symbol(id: MaterialId) -> char {
    std::char::from_digit(id.0 % 36, 36).unwrap_or('?')
}

impl Geometry {
    /// Locate the centre of every pixel in a slice
    ///
    /// Pixels are located in parallel. Any pixel that cannot be located fails
    /// the whole raster, so the slice should lie inside the geometry.
    pub fn raster(&self, spec: &RasterSpec) -> Result<MaterialMap> {
        spec.validate()?;
        let [nu, nv] = spec.pixels;
        debug!("Rasterising {nu}x{nv} pixels in {:?}", spec.basis);

        let materials = iproduct!(0..nv, 0..nu)
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(row, col)| self.locate(&spec.pixel_center(col, row)))
            .collect::<Result<Vec<MaterialId>>>()?;

        Ok(MaterialMap {
            pixels: spec.pixels,
            materials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_centres() {
        let spec = RasterSpec {
            width: [2.0, 1.0],
            pixels: [2, 2],
            ..Default::default()
        };
        assert_eq!(spec.pixel_center(0, 0), Point::new(-0.5, 0.25, 0.0));
        assert_eq!(spec.pixel_center(1, 1), Point::new(0.5, -0.25, 0.0));

        let spec = RasterSpec {
            basis: Basis::YZ,
            origin: Point::new(3.0, 0.0, 0.0),
            ..spec
        };
        assert_eq!(spec.pixel_center(0, 0), Point::new(3.0, -0.5, 0.25));
    }

    #[test]
    fn rejects_empty_rasters() {
        let spec = RasterSpec {
            pixels: [0, 10],
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(Error::InvalidRaster(_))));

        let spec = RasterSpec {
            width: [1.0, f64::INFINITY],
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(Error::InvalidRaster(_))));
    }

    #[test]
    fn symbols() {
        assert_eq!(symbol(MaterialId(3)), '3');
        assert_eq!(symbol(MaterialId(11)), 'b');
    }
}
