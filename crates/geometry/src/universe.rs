// internal modules
use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::ids::UniverseId;
use crate::point::Point;

/// Ordered collection of cells
///
/// Cells are assumed not to overlap. Nothing checks this on the default path:
/// the first cell in definition order that contains a point wins. See
/// [Geometry::check_overlaps()](crate::Geometry::check_overlaps) for an
/// explicit check.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    id: UniverseId,
    name: Option<String>,
    cells: Vec<Cell>,
}

impl Universe {
    /// Create a universe from cells in search order
    pub fn new<I>(id: u32, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        Self {
            id: UniverseId(id),
            name: None,
            cells: cells.into_iter().collect(),
        }
    }

    /// Attach a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Universe identifier
    pub fn id(&self) -> UniverseId {
        self.id
    }

    /// Optional name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Cells in search order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Find the first cell containing a point
    ///
    /// Universes do not transform coordinates, so the point is handed back
    /// unchanged alongside the cell.
    pub fn locate(&self, point: &Point) -> Result<(&Cell, Point)> {
        self.cells
            .iter()
            .find(|cell| cell.contains(point))
            .map(|cell| (cell, *point))
            .ok_or(Error::NoCellFound {
                universe: self.id,
                point: *point,
            })
    }

    /// Every cell containing a point, in search order
    ///
    /// A cell without a region only takes points that no bounded cell
    /// contains, so it is only listed when nothing else matches.
    pub fn matching_cells(&self, point: &Point) -> Vec<&Cell> {
        let bounded: Vec<&Cell> = self
            .cells
            .iter()
            .filter(|cell| cell.region().is_some() && cell.contains(point))
            .collect();

        match bounded.is_empty() {
            true => self.cells.iter().filter(|c| c.region().is_none()).collect(),
            false => bounded,
        }
    }
}
