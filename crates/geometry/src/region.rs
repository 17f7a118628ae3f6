//! Boolean combinations of half-spaces
//!
//! Regions are built with explicit constructor functions rather than
//! operator overloading:
//!
//! ```rust
//! # use pinlat_geometry::{complement, half_space, intersect, Point, Sense, Surface};
//! let fuel_outer = Surface::z_cylinder(5, 0.0, 0.0, 0.41).unwrap();
//! let clad_outer = Surface::z_cylinder(6, 0.0, 0.0, 0.48).unwrap();
//!
//! // +fuel_outer & -clad_outer
//! let cladding = intersect([
//!     half_space(&fuel_outer, Sense::Positive),
//!     half_space(&clad_outer, Sense::Negative),
//! ]);
//!
//! assert!(cladding.evaluate(&Point::from_xy(0.45, 0.0)));
//! assert!(!cladding.evaluate(&Point::from_xy(0.0, 0.0)));
//! assert!(complement(cladding).evaluate(&Point::from_xy(0.0, 0.0)));
//! ```

// internal modules
use crate::ids::SurfaceId;
use crate::point::Point;
use crate::surface::{Sense, Surface};

// external crates
use itertools::Itertools;

/// A single side of a [Surface]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace {
    surface: Surface,
    sense: Sense,
}

impl HalfSpace {
    /// The bounding surface
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Side of the surface
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Whether a point lies in this half-space
    pub fn evaluate(&self, point: &Point) -> bool {
        self.sense.contains(self.surface.evaluate(point))
    }
}

/// Boolean expression tree over half-spaces
///
/// Evaluation is total. An empty intersection is all of space and an empty
/// union is the empty set.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Leaf node
    HalfSpace(HalfSpace),
    /// All children contain the point
    Intersection(Vec<Region>),
    /// Any child contains the point
    Union(Vec<Region>),
    /// The child does not contain the point
    Complement(Box<Region>),
}

/// Leaf [Region] for one side of a surface
pub fn half_space(surface: &Surface, sense: Sense) -> Region {
    Region::HalfSpace(HalfSpace {
        surface: *surface,
        sense,
    })
}

/// [Region] contained in every one of `regions`
pub fn intersect<I>(regions: I) -> Region
where
    I: IntoIterator<Item = Region>,
{
    Region::Intersection(regions.into_iter().collect())
}

/// [Region] contained in any of `regions`
pub fn union<I>(regions: I) -> Region
where
    I: IntoIterator<Item = Region>,
{
    Region::Union(regions.into_iter().collect())
}

/// [Region] for everything outside of `region`
pub fn complement(region: Region) -> Region {
    Region::Complement(Box::new(region))
}

impl Region {
    /// Whether a point lies inside the region
    ///
    /// Intersections and unions short-circuit on the first deciding child.
    pub fn evaluate(&self, point: &Point) -> bool {
        match self {
            Region::HalfSpace(half_space) => half_space.evaluate(point),
            Region::Intersection(children) => children.iter().all(|r| r.evaluate(point)),
            Region::Union(children) => children.iter().any(|r| r.evaluate(point)),
            Region::Complement(child) => !child.evaluate(point),
        }
    }

    /// Sorted, unique ids of every surface referenced by the region
    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        let mut ids = Vec::new();
        self.collect_surfaces(&mut ids);
        ids.sort();
        ids.dedup();
        ids
    }

    fn collect_surfaces(&self, ids: &mut Vec<SurfaceId>) {
        match self {
            Region::HalfSpace(half_space) => ids.push(half_space.surface.id()),
            Region::Intersection(children) | Region::Union(children) => {
                children.iter().for_each(|r| r.collect_surfaces(ids))
            }
            Region::Complement(child) => child.collect_surfaces(ids),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Region::HalfSpace(h) => write!(f, "{}{}", h.sense, h.surface.id()),
            Region::Intersection(children) => write!(f, "({})", children.iter().join(" & ")),
            Region::Union(children) => write!(f, "({})", children.iter().join(" | ")),
            Region::Complement(child) => write!(f, "~{child}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin_surfaces() -> (Surface, Surface, Surface) {
        (
            Surface::z_cylinder(5, 0.0, 0.0, 0.41).unwrap(),
            Surface::z_cylinder(6, 0.0, 0.0, 0.48).unwrap(),
            Surface::x_plane(1, -0.63),
        )
    }

    #[test]
    fn empty_nodes_are_total() {
        let p = Point::from_xy(1.0, 1.0);
        assert!(intersect(Vec::<Region>::new()).evaluate(&p));
        assert!(!union(Vec::<Region>::new()).evaluate(&p));
    }

    #[test]
    fn nested_boolean_tree() {
        let (fuel, clad, left) = pin_surfaces();
        // (-fuel | +clad) & +left
        let region = intersect([
            union([fuel.negative(), clad.positive()]),
            left.positive(),
        ]);

        assert!(region.evaluate(&Point::from_xy(0.0, 0.0)));
        assert!(region.evaluate(&Point::from_xy(0.6, 0.0)));
        assert!(!region.evaluate(&Point::from_xy(0.45, 0.0)));
        assert!(!region.evaluate(&Point::from_xy(-0.7, 0.0)));
    }

    #[test]
    fn de_morgan_on_grid() {
        let (fuel, clad, left) = pin_surfaces();
        let a = union([fuel.negative(), left.negative()]);
        let b = clad.negative();

        let lhs = complement(intersect([a.clone(), b.clone()]));
        let rhs = union([complement(a.clone()), complement(b.clone())]);
        let lhs_or = complement(union([a.clone(), b.clone()]));
        let rhs_or = intersect([complement(a), complement(b)]);

        for i in -20..=20 {
            for j in -20..=20 {
                let p = Point::from_xy(i as f64 * 0.04, j as f64 * 0.04);
                assert_eq!(lhs.evaluate(&p), rhs.evaluate(&p), "at {p}");
                assert_eq!(lhs_or.evaluate(&p), rhs_or.evaluate(&p), "at {p}");
            }
        }
    }

    #[test]
    fn display_and_surfaces() {
        let (fuel, clad, left) = pin_surfaces();
        let region = intersect([fuel.positive(), clad.negative(), complement(left.negative())]);
        assert_eq!(region.to_string(), "(+5 & -6 & ~-1)");
        assert_eq!(
            region.surface_ids(),
            vec![SurfaceId(1), SurfaceId(5), SurfaceId(6)]
        );
    }
}
