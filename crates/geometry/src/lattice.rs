//! Regular two-dimensional lattices of universes

// internal modules
use crate::error::{Error, Result};
use crate::ids::{LatticeId, UniverseId};
use crate::point::Point;

// pinlat modules
use pinlat_utils::{f, OptionExt, ValueExt};

/// Result of a point query against a [Lattice]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeHit {
    /// Slot index along x
    pub ix: usize,
    /// Slot index along y
    pub iy: usize,
    /// Universe filling the slot
    pub universe: UniverseId,
    /// Point relative to the slot centre
    pub local: Point,
}

/// Regular 2-D array of universes
///
/// Slots are stored row-major with the outer index along y, starting from the
/// row at `lower_left`. Each slot has its own coordinate system centred on the
/// slot, running from `-pitch/2` to `+pitch/2` along each axis, which matches
/// how a pin universe is authored around its own origin. The z coordinate
/// passes through untouched.
///
/// The lattice is expected to be clipped by the region of the cell it fills,
/// so a point outside the declared extent is an error rather than something
/// to clamp.
///
/// ```rust
/// # use pinlat_geometry::{Lattice, Point, UniverseId};
/// let (f, c) = (UniverseId(1), UniverseId(2));
/// let lattice = Lattice::new(
///     5,
///     [-1.26, -1.26],
///     [1.26, 1.26],
///     vec![vec![f, f], vec![f, c]],
/// )
/// .unwrap();
///
/// let hit = lattice.locate(&Point::from_xy(0.63, 0.63)).unwrap();
/// assert_eq!((hit.ix, hit.iy, hit.universe), (1, 1, c));
/// assert!(hit.local.x.abs() < 1e-12 && hit.local.y.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    id: LatticeId,
    name: Option<String>,
    shape: [usize; 2],
    lower_left: [f64; 2],
    pitch: [f64; 2],
    universes: Vec<UniverseId>,
}

impl Lattice {
    /// Create a lattice from rows of universes, bottom row first
    ///
    /// `rows[iy][ix]` fills the slot `ix` along x and `iy` along y. Every row
    /// must have the same, non-zero, length and the pitch must be positive.
    pub fn new(
        id: u32,
        lower_left: [f64; 2],
        pitch: [f64; 2],
        rows: Vec<Vec<UniverseId>>,
    ) -> Result<Self> {
        let id = LatticeId(id);

        if pitch.iter().any(|p| !(*p > 0.0 && p.is_finite())) {
            return Err(Error::InvalidPitch { lattice: id, pitch });
        }

        let ny = rows.len();
        let nx = rows.first().map(|row| row.len()).unwrap_or(0);
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidShape {
                lattice: id,
                shape: [nx, ny],
            });
        }

        if let Some((row, found)) = rows
            .iter()
            .map(|r| r.len())
            .enumerate()
            .find(|(_, len)| *len != nx)
        {
            return Err(Error::UnexpectedSlotCount {
                lattice: id,
                row,
                expected: nx,
                found,
            });
        }

        Ok(Self {
            id,
            name: None,
            shape: [nx, ny],
            lower_left,
            pitch,
            universes: rows.into_iter().flatten().collect(),
        })
    }

    /// Create a lattice from rows of universes, top row first
    ///
    /// Input decks are usually written the way the lattice looks on a page,
    /// with the highest y row first. This just reverses the rows before
    /// calling [Lattice::new()].
    pub fn from_rows_top_down(
        id: u32,
        lower_left: [f64; 2],
        pitch: [f64; 2],
        mut rows: Vec<Vec<UniverseId>>,
    ) -> Result<Self> {
        rows.reverse();
        Self::new(id, lower_left, pitch, rows)
    }

    /// Attach a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lattice identifier
    pub fn id(&self) -> LatticeId {
        self.id
    }

    /// Optional name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of slots as [nx, ny]
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// Lower left corner as [x, y]
    pub fn lower_left(&self) -> [f64; 2] {
        self.lower_left
    }

    /// Upper right corner as [x, y]
    pub fn upper_right(&self) -> [f64; 2] {
        [
            self.lower_left[0] + self.shape[0] as f64 * self.pitch[0],
            self.lower_left[1] + self.shape[1] as f64 * self.pitch[1],
        ]
    }

    /// Slot spacing as [x, y]
    pub fn pitch(&self) -> [f64; 2] {
        self.pitch
    }

    /// All slot universes, row-major with y outer
    pub fn universes(&self) -> &[UniverseId] {
        &self.universes
    }

    /// Universe in slot (ix, iy), if the slot exists
    pub fn slot(&self, ix: usize, iy: usize) -> Option<UniverseId> {
        if ix < self.shape[0] && iy < self.shape[1] {
            Some(self.universes[iy * self.shape[0] + ix])
        } else {
            None
        }
    }

    /// Global coordinates of the centre of slot (ix, iy)
    pub fn slot_center(&self, ix: usize, iy: usize) -> Option<[f64; 2]> {
        self.slot(ix, iy)?;
        Some([
            self.lower_left[0] + (ix as f64 + 0.5) * self.pitch[0],
            self.lower_left[1] + (iy as f64 + 0.5) * self.pitch[1],
        ])
    }

    /// Find the slot containing a point and the point relative to its centre
    ///
    /// Slot indices are `floor((p - lower_left) / pitch)`. Anything outside
    /// `[0, nx) x [0, ny)` is [Error::OutOfLatticeBounds], never clamped.
    pub fn locate(&self, point: &Point) -> Result<LatticeHit> {
        let dx = point.x - self.lower_left[0];
        let dy = point.y - self.lower_left[1];

        let ix = (dx / self.pitch[0]).floor();
        let iy = (dy / self.pitch[1]).floor();

        let in_bounds = |i: f64, n: usize| i >= 0.0 && i < n as f64;
        if !(in_bounds(ix, self.shape[0]) && in_bounds(iy, self.shape[1])) {
            return Err(Error::OutOfLatticeBounds {
                lattice: self.id,
                point: *point,
                index: [saturating_index(ix), saturating_index(iy)],
            });
        }

        let (ix, iy) = (ix as usize, iy as usize);
        let local = Point {
            x: dx - (ix as f64 + 0.5) * self.pitch[0],
            y: dy - (iy as f64 + 0.5) * self.pitch[1],
            z: point.z,
        };

        Ok(LatticeHit {
            ix,
            iy,
            universe: self.universes[iy * self.shape[0] + ix],
            local,
        })
    }
}

/// Float slot index for error reporting, NaN reported as `i64::MIN`
fn saturating_index(i: f64) -> i64 {
    if i.is_nan() {
        i64::MIN
    } else {
        i as i64
    }
}

impl std::fmt::Display for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!(
            "Lattice {} \"{}\": {}x{} slots, lower left ({}, {}), pitch ({}, {})\n",
            self.id,
            self.name().display_or("unnamed"),
            self.shape[0],
            self.shape[1],
            self.lower_left[0].sci(4, 2),
            self.lower_left[1].sci(4, 2),
            self.pitch[0].sci(4, 2),
            self.pitch[1].sci(4, 2),
        );

        // top row first, the way it looks on the page
        for row in self.universes.chunks(self.shape[0]).rev() {
            for universe in row {
                s += &f!("{:>5}", universe);
            }
            s += "\n";
        }
        write!(f, "{}", s)
    }
}
