//! Collapse of tally means into dense multigroup cross sections

// internal modules
use crate::error::{Error, Result};
use crate::tally::{Reaction, TallyKey, TallySet};

// pinlat modules
use pinlat_utils::{f, OptionExt, ValueExt};

// external crates
use log::{debug, trace, warn};
use nalgebra::{DMatrix, DVector};

/// Relative tolerance for the scatter total against the matrix column sums
const SCATTER_REL_TOL: f64 = 1e-4;

/// Macroscopic multigroup cross sections \[cm^-1\]
///
/// Every vector has one entry per group, with group 0 as the highest energy.
///
/// The scattering matrix uses the destination group as the row and the source
/// group as the column:
///
/// ```text
///     scatter_matrix[(g_out, g_in)] = transfer(g_in -> g_out)
/// ```
///
/// so that the neutron balance reads `(diag(total) - S) phi = (1/k) chi nu_f^T phi`.
/// When fission data are present `chi` always sums to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSections {
    /// Total cross section
    pub total: DVector<f64>,
    /// Absorption cross section
    pub absorption: DVector<f64>,
    /// Total scattering, only when it was tallied separately
    pub scatter: Option<DVector<f64>>,
    /// Fission cross section, only when it was tallied
    ///
    /// Neither operator needs it, so a tally set with only nu-fission is
    /// complete.
    pub fission: Option<DVector<f64>>,
    /// Neutron production cross section
    pub nu_fission: DVector<f64>,
    /// Fission spectrum, sums to 1 when there is a fission source
    pub chi: DVector<f64>,
    /// Group transfer matrix as `S[g_out, g_in]`
    pub scatter_matrix: DMatrix<f64>,
}

impl CrossSections {
    /// Build cross sections directly from dense arrays
    ///
    /// The scattering matrix is row-major with rows as the destination group,
    /// i.e. `scatter_matrix[g_out * G + g_in]`. The number of groups is taken
    /// from `total` and every other array must agree.
    ///
    /// `chi` is normalised whenever there is a fission source.
    ///
    /// ```rust
    /// # use pinlat_mgxs::CrossSections;
    /// let xs = CrossSections::from_arrays(
    ///     &[1.0, 1.0],
    ///     &[0.9, 1.0],
    ///     &[0.2, 0.2],
    ///     &[0.5, 0.5],
    ///     &[2.0, 0.0],
    ///     &[0.0, 0.0, 0.1, 0.0],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(xs.num_groups(), 2);
    /// assert_eq!(xs.chi[0], 1.0);
    /// assert_eq!(xs.scatter_matrix[(1, 0)], 0.1);
    /// ```
    pub fn from_arrays(
        total: &[f64],
        absorption: &[f64],
        fission: &[f64],
        nu_fission: &[f64],
        chi: &[f64],
        scatter_matrix: &[f64],
    ) -> Result<Self> {
        let n = total.len();
        if n == 0 {
            return Err(Error::InvalidGroupStructure("no groups given".to_string()));
        }

        for values in [absorption, fission, nu_fission, chi] {
            check_length(n, values.len())?;
        }
        check_length(n * n, scatter_matrix.len())?;

        let nu_fission = DVector::from_column_slice(nu_fission);
        let chi = DVector::from_column_slice(chi);
        let chi = if nu_fission.iter().any(|v| *v != 0.0) {
            normalise_chi(&chi)?
        } else {
            chi
        };

        let xs = Self {
            total: DVector::from_column_slice(total),
            absorption: DVector::from_column_slice(absorption),
            scatter: None,
            fission: Some(DVector::from_column_slice(fission)),
            nu_fission,
            chi,
            scatter_matrix: DMatrix::from_row_slice(n, n, scatter_matrix),
        };

        Ok(xs)
    }

    /// Number of energy groups
    pub fn num_groups(&self) -> usize {
        self.total.len()
    }

    /// True if any group has a non-zero nu-fission cross section
    pub fn is_fissile(&self) -> bool {
        self.nu_fission.iter().any(|v| *v != 0.0)
    }

    /// Total out-scattering from each source group (column sums of `S`)
    pub fn scatter_out(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.num_groups(),
            self.scatter_matrix.column_iter().map(|c| c.sum()),
        )
    }

    /// Warn about any tallied total scatter that disagrees with the matrix
    fn check_scatter_consistency(&self) {
        let Some(scatter) = &self.scatter else {
            return;
        };

        for (g, (tallied, summed)) in scatter.iter().zip(self.scatter_out().iter()).enumerate() {
            if !tallied.is_close(*summed, SCATTER_REL_TOL, 1e-12) {
                warn!(
                    "Group {g} scatter {} differs from scattering matrix total {}",
                    tallied.sci(5, 2),
                    summed.sci(5, 2)
                );
            }
        }
    }
}

impl std::fmt::Display for CrossSections {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!(
            "{:<6}{:>13}{:>13}{:>13}{:>13}{:>13}\n",
            "group",
            "total",
            "absorption",
            "fission",
            "nu-fission",
            "chi"
        );

        for g in 0..self.num_groups() {
            s += &f!(
                "{:<6}{:>13}{:>13}{:>13}{:>13}{:>13}\n",
                g,
                self.total[g].sci(5, 2),
                self.absorption[g].sci(5, 2),
                self.fission.as_ref().map(|v| v[g].sci(5, 2)).display_or("-"),
                self.nu_fission[g].sci(5, 2),
                self.chi[g].sci(5, 2)
            );
        }

        s += "scattering matrix (row = out, column = in)\n";
        for row in self.scatter_matrix.row_iter() {
            let values = row.iter().map(|v| f!("{:>13}", v.sci(5, 2)));
            s += &f!("      {}\n", values.collect::<String>());
        }

        write!(f, "{}", s.trim_end())
    }
}

/// Collapse tally means into dense multigroup cross sections
///
/// Every group needs `total` and `absorption`, and every (in, out) pair needs
/// a transfer mean, even if it is zero.
///
/// Fission terms are optional as a set. If either `nu-fission` or `chi` is
/// tallied then both are required for every group and `chi` is renormalised
/// to sum to 1. Otherwise they are left as zero. Plain `fission` is kept
/// when tallied but never required.
///
/// A separately tallied `scatter` total is kept for reference and checked
/// against the matrix.
pub fn collapse(num_groups: usize, tallies: &TallySet) -> Result<CrossSections> {
    if num_groups == 0 {
        return Err(Error::InvalidGroupStructure("zero groups".to_string()));
    }

    if let Some(record) = tallies.iter().find(|r| r.key.max_group() >= num_groups) {
        return Err(Error::GroupOutOfRange {
            key: record.key,
            groups: num_groups,
        });
    }

    debug!(
        "Collapsing {} tallies into {num_groups} groups",
        tallies.len()
    );

    let total = group_vector(tallies, num_groups, Reaction::Total)?;
    let absorption = group_vector(tallies, num_groups, Reaction::Absorption)?;

    let scatter = match tallies.has_reaction(Reaction::Scatter) {
        true => Some(group_vector(tallies, num_groups, Reaction::Scatter)?),
        false => None,
    };

    let fission = match tallies.has_reaction(Reaction::Fission) {
        true => Some(group_vector(tallies, num_groups, Reaction::Fission)?),
        false => None,
    };

    let fissile = [Reaction::NuFission, Reaction::Chi]
        .into_iter()
        .any(|r| tallies.has_reaction(r));

    let (nu_fission, chi) = if fissile {
        let chi = group_vector(tallies, num_groups, Reaction::Chi)?;
        (
            group_vector(tallies, num_groups, Reaction::NuFission)?,
            normalise_chi(&chi)?,
        )
    } else {
        debug!("  - no nu-fission or chi tallies, fission source set to zero");
        (DVector::zeros(num_groups), DVector::zeros(num_groups))
    };

    let xs = CrossSections {
        total,
        absorption,
        scatter,
        fission,
        nu_fission,
        chi,
        scatter_matrix: scattering_matrix(tallies, num_groups)?,
    };

    xs.check_scatter_consistency();
    trace!("Collapsed cross sections\n{xs}");
    Ok(xs)
}

/// Scale chi so that it sums to exactly 1
///
/// ```rust
/// # use pinlat_mgxs::normalise_chi;
/// # use nalgebra::DVector;
/// let chi = normalise_chi(&DVector::from_vec(vec![3.0, 1.0])).unwrap();
/// assert_eq!(chi.as_slice(), &[0.75, 0.25]);
///
/// assert!(normalise_chi(&DVector::from_vec(vec![0.0, 0.0])).is_err());
/// ```
pub fn normalise_chi(chi: &DVector<f64>) -> Result<DVector<f64>> {
    let sum = chi.sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(Error::InvalidChiDistribution { sum });
    }
    Ok(chi / sum)
}

/// Per-group means for a reaction, in group order
fn group_vector(tallies: &TallySet, num_groups: usize, reaction: Reaction) -> Result<DVector<f64>> {
    let values = (0..num_groups)
        .map(|g| {
            let key = TallyKey::group(g, reaction);
            tallies.mean(&key).ok_or(Error::MissingTally { key })
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(DVector::from_vec(values))
}

/// Transfer means placed at `S[g_out, g_in]`
fn scattering_matrix(tallies: &TallySet, num_groups: usize) -> Result<DMatrix<f64>> {
    let mut matrix = DMatrix::zeros(num_groups, num_groups);
    for g_in in 0..num_groups {
        for g_out in 0..num_groups {
            let key = TallyKey::transfer(g_in, g_out);
            matrix[(g_out, g_in)] = tallies.mean(&key).ok_or(Error::MissingTally { key })?;
        }
    }
    Ok(matrix)
}

fn check_length(expected: usize, found: usize) -> Result<()> {
    match expected == found {
        true => Ok(()),
        false => Err(Error::DimensionMismatch { expected, found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_group_tallies() -> TallySet {
        let mut set = TallySet::new();
        for (g, total, absorption) in [(0, 0.52, 0.01), (1, 1.25, 0.10)] {
            set.insert_group(g, Reaction::Total, total);
            set.insert_group(g, Reaction::Absorption, absorption);
        }
        set.insert_transfer(0, 0, 0.49);
        set.insert_transfer(0, 1, 0.02);
        set.insert_transfer(1, 0, 0.001);
        set.insert_transfer(1, 1, 1.149);
        set
    }

    #[test]
    fn non_fissile_collapse() {
        let xs = collapse(2, &two_group_tallies()).unwrap();
        assert_eq!(xs.num_groups(), 2);
        assert!(!xs.is_fissile());
        assert_eq!(xs.chi.as_slice(), &[0.0, 0.0]);
        assert_eq!(xs.scatter, None);
        assert_eq!(xs.fission, None);

        // down-scatter lands below the diagonal
        assert_eq!(xs.scatter_matrix[(1, 0)], 0.02);
        assert_eq!(xs.scatter_matrix[(0, 1)], 0.001);
        assert_eq!(xs.scatter_out().as_slice(), &[0.49 + 0.02, 0.001 + 1.149]);
    }

    #[test]
    fn partial_fission_data_is_missing() {
        let mut set = two_group_tallies();
        set.insert_group(0, Reaction::NuFission, 0.01);
        set.insert_group(1, Reaction::NuFission, 0.2);

        let err = collapse(2, &set).unwrap_err();
        assert_eq!(
            err,
            Error::MissingTally {
                key: TallyKey::group(0, Reaction::Chi)
            }
        );
    }

    #[test]
    fn fission_without_nu_fission_is_not_a_source() {
        let mut set = two_group_tallies();
        set.insert_group(0, Reaction::Fission, 0.004);
        set.insert_group(1, Reaction::Fission, 0.08);

        let xs = collapse(2, &set).unwrap();
        assert_eq!(xs.fission.as_ref().unwrap().as_slice(), &[0.004, 0.08]);
        assert!(!xs.is_fissile());
    }

    #[test]
    fn missing_transfer() {
        let mut set = TallySet::new();
        set.insert_group(0, Reaction::Total, 1.0);
        set.insert_group(0, Reaction::Absorption, 1.0);
        let err = collapse(1, &set).unwrap_err();
        assert_eq!(
            err,
            Error::MissingTally {
                key: TallyKey::transfer(0, 0)
            }
        );
    }

    #[test]
    fn group_out_of_range() {
        let err = collapse(1, &two_group_tallies()).unwrap_err();
        assert!(matches!(err, Error::GroupOutOfRange { groups: 1, .. }));
        assert!(collapse(0, &two_group_tallies()).is_err());
    }

    #[test]
    fn from_arrays_lengths() {
        let err = CrossSections::from_arrays(
            &[1.0, 1.0],
            &[1.0],
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[0.0; 4],
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );

        let err = CrossSections::from_arrays(
            &[1.0, 1.0],
            &[1.0, 1.0],
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[0.0; 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn from_arrays_fissile_needs_chi() {
        let err = CrossSections::from_arrays(
            &[1.0, 1.0],
            &[1.0, 1.0],
            &[0.1, 0.1],
            &[0.2, 0.2],
            &[0.0, 0.0],
            &[0.0; 4],
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidChiDistribution { sum: 0.0 });
    }

    #[test]
    fn display_table() {
        let xs = collapse(2, &two_group_tallies()).unwrap();
        let table = xs.to_string();
        assert!(table.starts_with("group"));
        assert!(table.contains("5.20000e-01"));
        assert!(table.contains("scattering matrix"));
    }
}
