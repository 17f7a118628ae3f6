//! Energy group structure

// internal modules
use crate::error::{Error, Result};

// pinlat modules
use pinlat_utils::{f, ValueExt};

// external crates
use serde::{Deserialize, Serialize};

/// Energy group structure
///
/// Boundaries are stored in ascending energy \[eV\] but groups are numbered
/// from the top down, so group 0 is always the fastest group.
///
/// ```text
///     edges:   0.0 ---- 0.625 -------- 2.0e7
///     groups:  |  g=1   |      g=0     |
/// ```
///
/// ```rust
/// # use pinlat_mgxs::EnergyGroups;
/// let groups = EnergyGroups::default();
/// assert_eq!(groups.num_groups(), 2);
/// assert_eq!(groups.find_group(1.0e6).unwrap(), 0);
/// assert_eq!(groups.find_group(0.025).unwrap(), 1);
/// assert!(groups.find_group(3.0e7).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EnergyGroups {
    edges: Vec<f64>,
}

impl EnergyGroups {
    /// Create a group structure from ascending boundaries
    ///
    /// At least two finite, non-negative, strictly increasing values are
    /// required.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::InvalidGroupStructure(f!(
                "{} boundaries given, at least 2 required",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(Error::InvalidGroupStructure(f!(
                "boundaries must be finite and non-negative {edges:?}"
            )));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidGroupStructure(f!(
                "boundaries must be strictly increasing {edges:?}"
            )));
        }
        Ok(Self { edges })
    }

    /// Number of energy groups
    pub fn num_groups(&self) -> usize {
        self.edges.len() - 1
    }

    /// Ascending group boundaries \[eV\]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// (lower, upper) energy bounds of a group
    pub fn bounds(&self, group: usize) -> Option<(f64, f64)> {
        let n = self.num_groups();
        if group >= n {
            return None;
        }
        let bin = n - 1 - group;
        Some((self.edges[bin], self.edges[bin + 1]))
    }

    /// Group containing an energy
    ///
    /// Bins are `lower <= e < upper`, except that the very top boundary
    /// belongs to group 0.
    pub fn find_group(&self, energy: f64) -> Result<usize> {
        let n = self.num_groups();
        let last = self.edges[n];
        if !(energy >= self.edges[0] && energy <= last) {
            return Err(Error::EnergyOutOfRange { energy });
        }
        if energy == last {
            return Ok(0);
        }
        // number of upper edges at or below the energy
        let bin = self.edges[1..].partition_point(|e| *e <= energy);
        Ok(n - 1 - bin)
    }
}

impl Default for EnergyGroups {
    fn default() -> Self {
        Self {
            edges: vec![0.0, 0.625, 2.0e7],
        }
    }
}

impl TryFrom<Vec<f64>> for EnergyGroups {
    type Error = Error;
    fn try_from(edges: Vec<f64>) -> Result<Self> {
        Self::new(edges)
    }
}

impl From<EnergyGroups> for Vec<f64> {
    fn from(groups: EnergyGroups) -> Self {
        groups.edges
    }
}

impl std::fmt::Display for EnergyGroups {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("{} groups\n", self.num_groups());
        for g in 0..self.num_groups() {
            if let Some((lower, upper)) = self.bounds(g) {
                s += &f!(
                    "  g{:<3} {:>12} - {:>12} eV\n",
                    g,
                    lower.sci(4, 2),
                    upper.sci(4, 2)
                );
            }
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_numbering_is_top_down() {
        let groups = EnergyGroups::new(vec![0.0, 1.0, 10.0, 100.0]).unwrap();
        assert_eq!(groups.num_groups(), 3);
        assert_eq!(groups.bounds(0), Some((10.0, 100.0)));
        assert_eq!(groups.bounds(2), Some((0.0, 1.0)));
        assert_eq!(groups.bounds(3), None);

        assert_eq!(groups.find_group(0.0).unwrap(), 2);
        assert_eq!(groups.find_group(1.0).unwrap(), 1);
        assert_eq!(groups.find_group(9.99).unwrap(), 1);
        assert_eq!(groups.find_group(10.0).unwrap(), 0);
        assert_eq!(groups.find_group(100.0).unwrap(), 0);
        assert!(groups.find_group(-1.0).is_err());
        assert!(groups.find_group(f64::NAN).is_err());
    }

    #[test]
    fn rejects_bad_edges() {
        assert!(EnergyGroups::new(vec![1.0]).is_err());
        assert!(EnergyGroups::new(vec![0.0, 1.0, 1.0]).is_err());
        assert!(EnergyGroups::new(vec![-1.0, 1.0]).is_err());
        assert!(EnergyGroups::new(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn serde_validates() {
        let groups: EnergyGroups = serde_json::from_str("[0.0, 0.625, 2e7]").unwrap();
        assert_eq!(groups, EnergyGroups::default());
        assert!(serde_json::from_str::<EnergyGroups>("[2e7, 0.0]").is_err());
        assert_eq!(serde_json::to_string(&groups).unwrap(), "[0.0,0.625,20000000.0]");
    }
}
