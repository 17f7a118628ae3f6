// internal modules
use crate::error::{Error, Result};
use crate::surface::Axis;

// pinlat modules
use pinlat_utils::{f, ValueExt};

// external crates
use serde::{Deserialize, Serialize};

/// Cartesian point in the geometry
///
/// Universes never transform coordinates, so a [Point] is only ever changed
/// by entering a lattice slot, where it becomes relative to the slot centre.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
}

impl Point {
    /// Create a [Point] from (x,y,z) cartesian coordinates
    ///
    /// Anything that can be turned into an `f64` value will work. For example:
    /// ```rust
    /// # use pinlat_geometry::Point;
    /// assert_eq!(Point::new(1, 2.0, 3), Point { x: 1.0, y: 2.0, z: 3.0 });
    /// ```
    pub fn new<T, U, V>(x: T, y: U, z: V) -> Self
    where
        T: Into<f64> + Copy,
        U: Into<f64> + Copy,
        V: Into<f64> + Copy,
    {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Create a [Point] in the z=0 plane
    ///
    /// Convenient for the radial models where nothing depends on z.
    /// ```rust
    /// # use pinlat_geometry::Point;
    /// assert_eq!(Point::from_xy(0.5, -0.5), Point::new(0.5, -0.5, 0.0));
    /// ```
    pub fn from_xy<T, U>(x: T, y: U) -> Self
    where
        T: Into<f64> + Copy,
        U: Into<f64> + Copy,
    {
        Self::new(x, y, 0.0)
    }

    /// Create a [Point] from a slice of `[x,y]` or `[x,y,z]` values
    ///
    /// ```rust
    /// # use pinlat_geometry::Point;
    /// assert_eq!(Point::from_slice(&[1.0, 2.0]).unwrap(), Point::new(1.0, 2.0, 0.0));
    /// assert_eq!(Point::from_slice(&[1, 2, 3]).unwrap(), Point::new(1, 2, 3));
    /// assert!(Point::from_slice(&[1.0]).is_err());
    /// ```
    pub fn from_slice<T>(values: &[T]) -> Result<Self>
    where
        T: Into<f64> + Copy,
    {
        match values {
            [x, y] => Ok(Self::from_xy(*x, *y)),
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(Error::UnexpectedLength {
                found: values.len(),
            }),
        }
    }

    /// Coordinate value along an axis
    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Turn point into an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point {
    fn from(xyz: [f64; 3]) -> Self {
        Self::new(xyz[0], xyz[1], xyz[2])
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = f!(
            "({}, {}, {})",
            self.x.sci(5, 2),
            self.y.sci(5, 2),
            self.z.sci(5, 2)
        );
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_lengths() {
        assert_eq!(Point::from_slice(&[1.0, 2.0]).unwrap(), Point::new(1.0, 2.0, 0.0));
        for values in [&[][..], &[1.0][..], &[1.0, 2.0, 3.0, 4.0][..]] {
            let err = Point::from_slice(values).unwrap_err();
            assert_eq!(err, Error::UnexpectedLength { found: values.len() });
            assert_eq!(
                err.to_string(),
                format!("expected 2 or 3 coordinates, found {}", values.len())
            );
        }
    }
}
