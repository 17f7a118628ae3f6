//! Analytic surfaces and half-space senses

// internal modules
use crate::error::{Error, Result};
use crate::ids::SurfaceId;
use crate::point::Point;
use crate::region::Region;

// external crates
use serde::{Deserialize, Serialize};

/// Cartesian axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x axis
    X,
    /// y axis
    Y,
    /// z axis
    Z,
}

impl Axis {
    /// The two axes perpendicular to this one, in right-handed order
    ///
    /// ```rust
    /// # use pinlat_geometry::Axis;
    /// assert_eq!(Axis::Z.transverse(), (Axis::X, Axis::Y));
    /// assert_eq!(Axis::X.transverse(), (Axis::Y, Axis::Z));
    /// ```
    pub fn transverse(&self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{}", s)
    }
}

/// Side of a surface
///
/// For the implicit function `f(p) - offset` of a [Surface]:
/// - **Positive** - `f(p) >= offset`
/// - **Negative** - `f(p) < offset`
///
/// Points exactly on a surface therefore belong to the positive half-space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// `+` side of the surface
    Positive,
    /// `-` side of the surface
    Negative,
}

impl Sense {
    /// Whether an evaluated surface value lies on this side
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Sense::Positive => value >= 0.0,
            Sense::Negative => value < 0.0,
        }
    }

    /// The opposite side
    pub fn flip(&self) -> Sense {
        match self {
            Sense::Positive => Sense::Negative,
            Sense::Negative => Sense::Positive,
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Sense::Positive => write!(f, "+"),
            Sense::Negative => write!(f, "-"),
        }
    }
}

/// Particle treatment when crossing a surface
///
/// Only metadata for the transport loop that consumes the geometry, it has no
/// effect on point containment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Particles pass through
    #[default]
    Transmission,
    /// Particles leaving are killed
    Vacuum,
    /// Particles are specularly reflected
    Reflective,
    /// Particles are reflected with a cosine distribution
    White,
}

/// Implicit function kinds
///
/// Evaluated as `f(p) - offset`:
///
/// | Kind     | f(p)                  | offset |
/// | -------- | --------------------- | ------ |
/// | Plane    | p[axis]               | offset |
/// | Cylinder | (u - u0)^2 + (v - v0)^2 | r^2  |
///
/// where (u, v) are the coordinates transverse to the cylinder axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceKind {
    /// Plane normal to an axis
    Plane {
        /// Normal axis
        axis: Axis,
        /// Position along the normal axis
        offset: f64,
    },
    /// Infinite cylinder parallel to an axis
    Cylinder {
        /// Cylinder axis
        axis: Axis,
        /// Centre in the two transverse coordinates
        center: [f64; 2],
        /// Radius, never negative
        radius: f64,
    },
}

/// Analytic surface partitioning space into two half-spaces
///
/// Immutable after construction. A [Surface] is cheap to copy, so regions keep
/// their own copy of every surface they reference.
///
/// ```rust
/// # use pinlat_geometry::{Point, Sense, Surface};
/// let fuel_outer = Surface::z_cylinder(5, 0.0, 0.0, 0.41).unwrap();
///
/// // inside the cylinder is the negative half-space
/// assert!(fuel_outer.evaluate(&Point::from_xy(0.0, 0.0)) < 0.0);
/// assert_eq!(fuel_outer.sense_of(&Point::from_xy(0.5, 0.0)), Sense::Positive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    id: SurfaceId,
    kind: SurfaceKind,
    boundary: BoundaryCondition,
}

impl Surface {
    /// Plane normal to `axis` at `offset`
    pub fn plane(id: u32, axis: Axis, offset: f64) -> Self {
        Self {
            id: SurfaceId(id),
            kind: SurfaceKind::Plane { axis, offset },
            boundary: BoundaryCondition::default(),
        }
    }

    /// Plane at x = x0
    pub fn x_plane(id: u32, x0: f64) -> Self {
        Self::plane(id, Axis::X, x0)
    }

    /// Plane at y = y0
    pub fn y_plane(id: u32, y0: f64) -> Self {
        Self::plane(id, Axis::Y, y0)
    }

    /// Plane at z = z0
    pub fn z_plane(id: u32, z0: f64) -> Self {
        Self::plane(id, Axis::Z, z0)
    }

    /// Infinite cylinder along `axis`
    ///
    /// The `center` is given in the transverse coordinates of
    /// [Axis::transverse()]. Negative or non-finite radii are rejected.
    pub fn cylinder(
        id: u32,
        axis: Axis,
        center: [f64; 2],
        radius: f64,
    ) -> Result<Self> {
        let id = SurfaceId(id);
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(Error::NegativeRadius { surface: id, radius });
        }
        Ok(Self {
            id,
            kind: SurfaceKind::Cylinder {
                axis,
                center,
                radius,
            },
            boundary: BoundaryCondition::default(),
        })
    }

    /// Infinite cylinder parallel to z centred on (x0, y0)
    pub fn z_cylinder(id: u32, x0: f64, y0: f64, radius: f64) -> Result<Self> {
        Self::cylinder(id, Axis::Z, [x0, y0], radius)
    }

    /// Same surface with a different boundary condition
    pub fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    /// Surface identifier
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Implicit function kind
    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    /// Boundary condition for the transport loop
    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    /// Evaluate `f(p) - offset` at a point
    pub fn evaluate(&self, point: &Point) -> f64 {
        match self.kind {
            SurfaceKind::Plane { axis, offset } => point.coordinate(axis) - offset,
            SurfaceKind::Cylinder {
                axis,
                center,
                radius,
            } => {
                let (u, v) = axis.transverse();
                let du = point.coordinate(u) - center[0];
                let dv = point.coordinate(v) - center[1];
                du * du + dv * dv - radius * radius
            }
        }
    }

    /// Side of the surface a point lies on
    pub fn sense_of(&self, point: &Point) -> Sense {
        if Sense::Positive.contains(self.evaluate(point)) {
            Sense::Positive
        } else {
            Sense::Negative
        }
    }

    /// The `+` half-space of this surface as a [Region]
    pub fn positive(&self) -> Region {
        crate::region::half_space(self, Sense::Positive)
    }

    /// The `-` half-space of this surface as a [Region]
    pub fn negative(&self) -> Region {
        crate::region::half_space(self, Sense::Negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_offsets() {
        let plane = Surface::x_plane(1, -0.63);
        assert_eq!(plane.evaluate(&Point::new(0.0, 5.0, 5.0)), 0.63);
        assert_eq!(plane.sense_of(&Point::new(-0.63, 0.0, 0.0)), Sense::Positive);
        assert_eq!(plane.sense_of(&Point::new(-0.7, 0.0, 0.0)), Sense::Negative);

        let plane = Surface::plane(2, Axis::Y, 1.0);
        assert_eq!(plane.evaluate(&Point::new(0.0, 3.0, 0.0)), 2.0);
    }

    #[test]
    fn cylinder_transverse_coordinates() {
        let z = Surface::z_cylinder(1, 1.0, 0.0, 1.0).unwrap();
        assert_eq!(z.sense_of(&Point::new(1.5, 0.0, 100.0)), Sense::Negative);
        assert_eq!(z.sense_of(&Point::new(0.0, 1.0, 0.0)), Sense::Positive);

        // x-axis cylinder ignores x entirely
        let x = Surface::cylinder(2, Axis::X, [0.0, 0.0], 0.5).unwrap();
        assert_eq!(x.sense_of(&Point::new(-40.0, 0.1, 0.1)), Sense::Negative);
        assert_eq!(x.sense_of(&Point::new(0.0, 0.0, 0.6)), Sense::Positive);
    }

    #[test]
    fn cylinder_radius_validation() {
        assert!(Surface::z_cylinder(1, 0.0, 0.0, 0.0).is_ok());
        assert_eq!(
            Surface::z_cylinder(1, 0.0, 0.0, -0.1),
            Err(Error::NegativeRadius {
                surface: SurfaceId(1),
                radius: -0.1
            })
        );
        assert!(Surface::z_cylinder(1, 0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn boundary_is_metadata_only() {
        let a = Surface::y_plane(3, 0.0);
        let b = a.with_boundary(BoundaryCondition::Reflective);
        assert_eq!(a.boundary(), BoundaryCondition::Transmission);
        assert_eq!(b.boundary(), BoundaryCondition::Reflective);
        let p = Point::from_xy(0.0, -1.0);
        assert_eq!(a.sense_of(&p), b.sense_of(&p));
    }
}
