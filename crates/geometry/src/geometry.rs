//! Geometry assembly and recursive point location

// standard library
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

// internal modules
use crate::cell::Fill;
use crate::error::{Error, Result};
use crate::ids::{CellId, LatticeId, MaterialId, UniverseId};
use crate::lattice::Lattice;
use crate::material::Material;
use crate::point::Point;
use crate::universe::Universe;

// pinlat modules
use pinlat_utils::{f, OptionExt};

// external crates
use log::{debug, trace, warn};
use rayon::prelude::*;

/// Maximum number of universe levels on any descent
///
/// Legitimate pin/lattice nesting is only a few levels deep, so anything
/// reaching this is a fill chain that loops back on itself.
pub const MAX_DEPTH: usize = 64;

/// Lattice slot entered on the way down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSlot {
    /// Lattice filling the cell
    pub lattice: LatticeId,
    /// Slot index as [ix, iy]
    pub index: [usize; 2],
}

/// One universe visited on the way down to a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    /// Universe searched at this level
    pub universe: UniverseId,
    /// Cell found in the universe
    pub cell: CellId,
    /// Point in the coordinates of this universe
    pub point: Point,
    /// Lattice slot entered from this cell, if filled by a lattice
    pub slot: Option<LatticeSlot>,
}

/// Full result of a point query
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Terminal material
    pub material: MaterialId,
    /// Every level from the root universe down to the material cell
    pub levels: Vec<Level>,
}

impl Location {
    /// The material-filled cell at the bottom of the descent
    pub fn cell(&self) -> Option<CellId> {
        self.levels.last().map(|level| level.cell)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = String::new();
        for (depth, level) in self.levels.iter().enumerate() {
            s += &f!(
                "{:indent$}universe {:<4} cell {:<5} at {}",
                "",
                level.universe,
                level.cell,
                level.point,
                indent = depth * 2
            );
            if let Some(slot) = level.slot {
                s += &f!(" -> lattice {} slot {:?}", slot.lattice, slot.index);
            }
            s += "\n";
        }
        s += &f!("material {}", self.material);
        write!(f, "{}", s)
    }
}

/// Explicit context for assembling a [Geometry]
///
/// Materials, universes, and lattices are registered in any order and all
/// references between them are checked by [GeometryBuilder::build()].
///
/// ```rust
/// # use pinlat_geometry::*;
/// let fuel_outer = Surface::z_cylinder(1, 0.0, 0.0, 0.41).unwrap();
///
/// let mut builder = GeometryBuilder::new();
/// builder.add_material(Material::new(1, "uo2")).unwrap();
/// builder.add_material(Material::new(3, "h2o")).unwrap();
/// builder
///     .add_universe(Universe::new(
///         0,
///         [
///             Cell::new(1, Fill::Material(MaterialId(1))).with_region(fuel_outer.negative()),
///             Cell::new(2, Fill::Material(MaterialId(3))).with_region(fuel_outer.positive()),
///         ],
///     ))
///     .unwrap();
///
/// let geometry = builder.build(UniverseId(0)).unwrap();
/// assert_eq!(geometry.locate(&Point::from_xy(0.0, 0.0)).unwrap(), MaterialId(1));
/// ```
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    materials: BTreeMap<MaterialId, Material>,
    universes: BTreeMap<UniverseId, Universe>,
    lattices: BTreeMap<LatticeId, Lattice>,
}

impl GeometryBuilder {
    /// Start an empty geometry
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a material reference
    pub fn add_material(&mut self, material: Material) -> Result<MaterialId> {
        match self.materials.entry(material.id) {
            Entry::Occupied(_) => Err(Error::DuplicateMaterial(material.id)),
            Entry::Vacant(entry) => {
                trace!("Adding {}", material);
                Ok(entry.insert(material).id)
            }
        }
    }

    /// Register a universe
    ///
    /// The universe must contain at least one cell and at most one cell
    /// without a region.
    pub fn add_universe(&mut self, universe: Universe) -> Result<UniverseId> {
        let id = universe.id();
        if universe.cells().is_empty() {
            return Err(Error::EmptyUniverse(id));
        }

        let catch_all: Vec<CellId> = universe
            .cells()
            .iter()
            .filter(|cell| cell.region().is_none())
            .map(|cell| cell.id())
            .collect();
        if catch_all.len() > 1 {
            return Err(Error::MultipleCatchAll {
                universe: id,
                cells: catch_all,
            });
        }

        // cells after an unbounded cell can never be found
        if let Some(position) = universe.cells().iter().position(|c| c.region().is_none()) {
            if position + 1 < universe.cells().len() {
                warn!(
                    "Universe {id}: cells after unbounded cell {} are unreachable",
                    universe.cells()[position].id()
                );
            }
        }

        match self.universes.entry(id) {
            Entry::Occupied(_) => Err(Error::DuplicateUniverse(id)),
            Entry::Vacant(entry) => {
                trace!(
                    "Adding universe {id} \"{}\" with {} cells",
                    universe.name().display_or("unnamed"),
                    universe.cells().len()
                );
                entry.insert(universe);
                Ok(id)
            }
        }
    }

    /// Register a lattice
    pub fn add_lattice(&mut self, lattice: Lattice) -> Result<LatticeId> {
        let id = lattice.id();
        match self.lattices.entry(id) {
            Entry::Occupied(_) => Err(Error::DuplicateLattice(id)),
            Entry::Vacant(entry) => {
                trace!("Adding lattice {id} with shape {:?}", lattice.shape());
                entry.insert(lattice);
                Ok(id)
            }
        }
    }

    /// Check every reference and freeze the geometry
    pub fn build(self, root: UniverseId) -> Result<Geometry> {
        if !self.universes.contains_key(&root) {
            return Err(Error::UnknownUniverse(root));
        }

        for universe in self.universes.values() {
            for cell in universe.cells() {
                match cell.fill() {
                    Fill::Material(id) if !self.materials.contains_key(&id) => {
                        return Err(Error::UnknownMaterial(id))
                    }
                    Fill::Universe(id) if !self.universes.contains_key(&id) => {
                        return Err(Error::UnknownUniverse(id))
                    }
                    Fill::Lattice(id) if !self.lattices.contains_key(&id) => {
                        return Err(Error::UnknownLattice(id))
                    }
                    _ => (),
                }
            }
        }

        for lattice in self.lattices.values() {
            if let Some(id) = lattice
                .universes()
                .iter()
                .find(|id| !self.universes.contains_key(id))
            {
                return Err(Error::UnknownUniverse(*id));
            }
        }

        debug!(
            "Built geometry: root universe {root}, {} universes, {} lattices, {} materials",
            self.universes.len(),
            self.lattices.len(),
            self.materials.len()
        );

        Ok(Geometry {
            root,
            materials: self.materials,
            universes: self.universes,
            lattices: self.lattices,
        })
    }
}

/// Frozen geometry answering "which material is at this point"
///
/// There is no mutation API once built, so a [Geometry] can be shared freely
/// between threads for concurrent queries.
#[derive(Debug, Clone)]
pub struct Geometry {
    root: UniverseId,
    materials: BTreeMap<MaterialId, Material>,
    universes: BTreeMap<UniverseId, Universe>,
    lattices: BTreeMap<LatticeId, Lattice>,
}

impl Geometry {
    /// The root universe identifier
    pub fn root(&self) -> UniverseId {
        self.root
    }

    /// Look up a universe
    pub fn universe(&self, id: UniverseId) -> Result<&Universe> {
        self.universes.get(&id).ok_or(Error::UnknownUniverse(id))
    }

    /// Look up a lattice
    pub fn lattice(&self, id: LatticeId) -> Result<&Lattice> {
        self.lattices.get(&id).ok_or(Error::UnknownLattice(id))
    }

    /// Look up a material reference
    pub fn material(&self, id: MaterialId) -> Result<&Material> {
        self.materials.get(&id).ok_or(Error::UnknownMaterial(id))
    }

    /// All registered materials in id order
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// All universes in id order
    pub fn universes(&self) -> impl Iterator<Item = &Universe> {
        self.universes.values()
    }

    /// All lattices in id order
    pub fn lattices(&self) -> impl Iterator<Item = &Lattice> {
        self.lattices.values()
    }

    /// Material at a point
    ///
    /// Descends from the root universe through nested universes and lattices
    /// until a material-filled cell is found.
    pub fn locate(&self, point: &Point) -> Result<MaterialId> {
        self.descend(point, |_| ())
    }

    /// Material at a point with every level visited on the way down
    pub fn locate_path(&self, point: &Point) -> Result<Location> {
        let mut levels = Vec::new();
        let material = self.descend(point, |level| levels.push(level))?;
        Ok(Location { material, levels })
    }

    /// Locate many points in parallel
    ///
    /// Results are in the same order as `points`.
    pub fn locate_many(&self, points: &[Point]) -> Vec<Result<MaterialId>> {
        points.par_iter().map(|p| self.locate(p)).collect()
    }

    fn descend<F>(&self, point: &Point, mut visit: F) -> Result<MaterialId>
    where
        F: FnMut(Level),
    {
        let mut universe_id = self.root;
        let mut local = *point;

        for _ in 0..MAX_DEPTH {
            let universe = self.universe(universe_id)?;
            let (cell, p) = universe.locate(&local)?;

            let mut level = Level {
                universe: universe_id,
                cell: cell.id(),
                point: p,
                slot: None,
            };

            match cell.fill() {
                Fill::Material(material) => {
                    visit(level);
                    return Ok(material);
                }
                Fill::Universe(next) => {
                    universe_id = next;
                    local = p;
                }
                Fill::Lattice(lattice_id) => {
                    let hit = self.lattice(lattice_id)?.locate(&p)?;
                    level.slot = Some(LatticeSlot {
                        lattice: lattice_id,
                        index: [hit.ix, hit.iy],
                    });
                    universe_id = hit.universe;
                    local = hit.local;
                }
            }
            visit(level);
        }

        Err(Error::GeometryCycle {
            depth: MAX_DEPTH,
            point: *point,
        })
    }

    /// Check the fill graph contains no cycles
    ///
    /// Optional validation. Cycles would otherwise only show up as
    /// [Error::GeometryCycle] for points that happen to follow them.
    pub fn check_acyclic(&self) -> Result<()> {
        let mut finished = BTreeSet::new();
        for id in self.universes.keys() {
            let mut path = Vec::new();
            self.visit_fills(*id, &mut path, &mut finished)?;
        }
        debug!("Fill graph is acyclic");
        Ok(())
    }

    fn visit_fills(
        &self,
        id: UniverseId,
        path: &mut Vec<UniverseId>,
        finished: &mut BTreeSet<UniverseId>,
    ) -> Result<()> {
        if finished.contains(&id) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|u| *u == id) {
            let mut cycle = path[start..].to_vec();
            cycle.push(id);
            return Err(Error::CyclicFill(cycle));
        }

        path.push(id);
        for child in self.children(id)? {
            self.visit_fills(child, path, finished)?;
        }
        path.pop();
        finished.insert(id);
        Ok(())
    }

    /// Universes directly nested inside a universe
    fn children(&self, id: UniverseId) -> Result<BTreeSet<UniverseId>> {
        let mut children = BTreeSet::new();
        for cell in self.universe(id)?.cells() {
            match cell.fill() {
                Fill::Material(_) => (),
                Fill::Universe(child) => {
                    children.insert(child);
                }
                Fill::Lattice(lattice) => {
                    children.extend(self.lattice(lattice)?.universes().iter().copied());
                }
            }
        }
        Ok(children)
    }

    /// Check sample points for overlapping sibling cells
    ///
    /// Optional validation that does not change [Geometry::locate()]. Every
    /// universe visited on each point's descent is searched for more than one
    /// containing cell. Points are checked in parallel and the first problem
    /// found is returned, including location failures.
    pub fn check_overlaps(&self, points: &[Point]) -> Result<()> {
        points.par_iter().try_for_each(|point| {
            let location = self.locate_path(point)?;
            for level in &location.levels {
                let cells: Vec<CellId> = self
                    .universe(level.universe)?
                    .matching_cells(&level.point)
                    .iter()
                    .map(|cell| cell.id())
                    .collect();
                if cells.len() > 1 {
                    return Err(Error::OverlappingCells {
                        universe: level.universe,
                        cells,
                        point: level.point,
                    });
                }
            }
            Ok(())
        })?;
        debug!("No overlaps found at {} sample points", points.len());
        Ok(())
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let head = f!(" > Geometry [root universe {}]", self.root);
        let mut s = f!("{}\n{}\n{}\n", "-".repeat(40), head, "-".repeat(40));

        for material in self.materials.values() {
            s += &f!("{material}\n");
        }
        for universe in self.universes.values() {
            s += &f!(
                "Universe {} \"{}\"\n",
                universe.id(),
                universe.name().display_or("unnamed")
            );
            for cell in universe.cells() {
                s += &f!("  {cell}\n");
            }
        }
        for lattice in self.lattices.values() {
            s += &f!("{lattice}");
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, Surface};

    fn nested() -> GeometryBuilder {
        let mut builder = GeometryBuilder::new();
        builder.add_material(Material::new(1, "inner")).unwrap();
        builder.add_material(Material::new(2, "outer")).unwrap();

        let cyl = Surface::z_cylinder(1, 0.0, 0.0, 1.0).unwrap();
        builder
            .add_universe(Universe::new(
                1,
                [
                    Cell::new(10, Fill::Material(MaterialId(1))).with_region(cyl.negative()),
                    Cell::new(11, Fill::Material(MaterialId(2))).with_region(cyl.positive()),
                ],
            ))
            .unwrap();
        builder
            .add_universe(Universe::new(0, [Cell::new(1, Fill::Universe(UniverseId(1)))]))
            .unwrap();
        builder
    }

    #[test]
    fn nested_universe_keeps_coordinates() {
        let geometry = nested().build(UniverseId(0)).unwrap();
        let location = geometry.locate_path(&Point::from_xy(0.5, 0.0)).unwrap();
        assert_eq!(location.material, MaterialId(1));
        assert_eq!(location.levels.len(), 2);
        assert_eq!(location.levels[1].point, Point::from_xy(0.5, 0.0));
        assert_eq!(location.cell(), Some(CellId(10)));
        assert_eq!(
            geometry.locate(&Point::from_xy(3.0, 0.0)).unwrap(),
            MaterialId(2)
        );
    }

    #[test]
    fn build_checks_references() {
        assert_eq!(
            nested().build(UniverseId(42)).unwrap_err(),
            Error::UnknownUniverse(UniverseId(42))
        );

        let mut builder = nested();
        builder
            .add_universe(Universe::new(5, [Cell::new(50, Fill::Lattice(LatticeId(8)))]))
            .unwrap();
        assert_eq!(
            builder.build(UniverseId(0)).unwrap_err(),
            Error::UnknownLattice(LatticeId(8))
        );

        let mut builder = nested();
        builder
            .add_universe(Universe::new(6, [Cell::new(60, Fill::Material(MaterialId(9)))]))
            .unwrap();
        assert_eq!(
            builder.build(UniverseId(0)).unwrap_err(),
            Error::UnknownMaterial(MaterialId(9))
        );
    }

    #[test]
    fn builder_rejects_duplicates_and_bad_universes() {
        let mut builder = nested();
        assert_eq!(
            builder.add_material(Material::new(1, "again")),
            Err(Error::DuplicateMaterial(MaterialId(1)))
        );
        assert_eq!(
            builder.add_universe(Universe::new(1, [Cell::new(1, Fill::Material(MaterialId(1)))])),
            Err(Error::DuplicateUniverse(UniverseId(1)))
        );
        assert_eq!(
            builder.add_universe(Universe::new(7, Vec::<Cell>::new())),
            Err(Error::EmptyUniverse(UniverseId(7)))
        );
        assert_eq!(
            builder.add_universe(Universe::new(
                8,
                [
                    Cell::new(1, Fill::Material(MaterialId(1))),
                    Cell::new(2, Fill::Material(MaterialId(2))),
                ]
            )),
            Err(Error::MultipleCatchAll {
                universe: UniverseId(8),
                cells: vec![CellId(1), CellId(2)]
            })
        );
    }

    #[test]
    fn cycles_are_fatal() {
        let mut builder = GeometryBuilder::new();
        builder.add_material(Material::new(1, "m")).unwrap();
        builder
            .add_universe(Universe::new(0, [Cell::new(1, Fill::Universe(UniverseId(1)))]))
            .unwrap();
        builder
            .add_universe(Universe::new(1, [Cell::new(2, Fill::Universe(UniverseId(0)))]))
            .unwrap();
        let geometry = builder.build(UniverseId(0)).unwrap();

        let p = Point::from_xy(0.0, 0.0);
        assert_eq!(
            geometry.locate(&p),
            Err(Error::GeometryCycle {
                depth: MAX_DEPTH,
                point: p
            })
        );
        assert_eq!(
            geometry.check_acyclic(),
            Err(Error::CyclicFill(vec![
                UniverseId(0),
                UniverseId(1),
                UniverseId(0)
            ]))
        );
    }

    #[test]
    fn catch_all_is_not_an_overlap() {
        let mut builder = GeometryBuilder::new();
        builder.add_material(Material::new(1, "fuel")).unwrap();
        builder.add_material(Material::new(3, "water")).unwrap();
        let cyl = Surface::z_cylinder(1, 0.0, 0.0, 0.41).unwrap();
        builder
            .add_universe(Universe::new(
                0,
                [
                    Cell::new(1, Fill::Material(MaterialId(1))).with_region(cyl.negative()),
                    Cell::new(2, Fill::Material(MaterialId(3))),
                ],
            ))
            .unwrap();
        let geometry = builder.build(UniverseId(0)).unwrap();

        let points = [
            Point::from_xy(0.0, 0.0),
            Point::from_xy(0.2, -0.1),
            Point::from_xy(0.6, 0.0),
            Point::from_xy(-3.0, 4.0),
        ];
        assert_eq!(geometry.check_overlaps(&points), Ok(()));
    }

    #[test]
    fn overlaps_are_reported() {
        let mut builder = GeometryBuilder::new();
        builder.add_material(Material::new(1, "a")).unwrap();
        builder.add_material(Material::new(2, "b")).unwrap();
        let cyl = Surface::z_cylinder(1, 0.0, 0.0, 1.0).unwrap();
        let plane = Surface::x_plane(2, 0.0);
        builder
            .add_universe(Universe::new(
                0,
                [
                    Cell::new(1, Fill::Material(MaterialId(1))).with_region(cyl.negative()),
                    Cell::new(2, Fill::Material(MaterialId(2))).with_region(plane.positive()),
                ],
            ))
            .unwrap();
        let geometry = builder.build(UniverseId(0)).unwrap();

        // first match still wins on the default path
        let p = Point::from_xy(0.5, 0.0);
        assert_eq!(geometry.locate(&p).unwrap(), MaterialId(1));

        assert!(geometry.check_overlaps(&[Point::from_xy(-0.5, 0.0)]).is_ok());
        assert_eq!(
            geometry.check_overlaps(&[p]),
            Err(Error::OverlappingCells {
                universe: UniverseId(0),
                cells: vec![CellId(1), CellId(2)],
                point: p
            })
        );
    }
}
