//! Generalised k-eigenvalue solve of the multigroup balance equation

// internal modules
use crate::collapse::CrossSections;
use crate::error::{Error, Result};

// pinlat modules
use pinlat_utils::{f, ValueExt};

// external crates
use log::{debug, trace};
use nalgebra::{Complex, DMatrix, DVector};

/// Relative tolerance for treating two eigenvalues as the same
const DEGENERATE_TOL: f64 = 1e-9;

/// Relative size of a singular value that still counts as zero
const NULL_TOL: f64 = 1e-8;

/// Neutron balance operator `A = diag(total) - S`
pub fn balance_operator(xs: &CrossSections) -> DMatrix<f64> {
    DMatrix::from_diagonal(&xs.total) - &xs.scatter_matrix
}

/// Fission source operator `F[i, j] = chi[i] * nu_fission[j]`
pub fn fission_operator(xs: &CrossSections) -> DMatrix<f64> {
    &xs.chi * xs.nu_fission.transpose()
}

/// A single (k, flux) eigenpair
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    /// Eigenvalue, the multiplication factor for the dominant mode
    pub k: Complex<f64>,
    /// Eigenvector, unit 2-norm
    pub flux: DVector<Complex<f64>>,
}

impl Mode {
    /// Real part of the eigenvalue
    pub fn k_eff(&self) -> f64 {
        self.k.re
    }

    /// True if the eigenvalue and flux have no imaginary part beyond `tol`
    pub fn is_real(&self, tol: f64) -> bool {
        self.k.im.abs() <= tol && self.flux.iter().all(|c| c.im.abs() <= tol)
    }

    /// Real part of the flux shape
    pub fn real_flux(&self) -> DVector<f64> {
        self.flux.map(|c| c.re)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("k = {}", fmt_complex(self.k));
        for (g, phi) in self.flux.iter().enumerate() {
            s += &f!("\n  phi[g{g}] = {}", fmt_complex(*phi));
        }
        write!(f, "{}", s)
    }
}

/// Full eigen spectrum of `M = A^-1 F`
///
/// Eigenvalues are sorted by descending real part, then descending magnitude,
/// then descending imaginary part. Column `i` of the eigenvector matrix
/// belongs to eigenvalue `i`.
///
/// Every eigenvector has unit 2-norm and its largest component (the first
/// one, if tied) rotated onto the positive real axis. Identical inputs give
/// bit-for-bit identical results.
///
/// A repeated eigenvalue gets one independent eigenvector per dimension of
/// its null space. Defective eigenvalues have fewer independent eigenvectors
/// than repeats, and the extra columns repeat the last one found.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    eigenvalues: DVector<Complex<f64>>,
    eigenvectors: DMatrix<Complex<f64>>,
}

impl Spectrum {
    /// Sorted eigenvalues
    pub fn eigenvalues(&self) -> &DVector<Complex<f64>> {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, in eigenvalue order
    pub fn eigenvectors(&self) -> &DMatrix<Complex<f64>> {
        &self.eigenvectors
    }

    /// Number of modes
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Mode at a position in the sorted spectrum
    pub fn mode(&self, index: usize) -> Option<Mode> {
        let k = *self.eigenvalues.get(index)?;
        Some(Mode {
            k,
            flux: self.eigenvectors.column(index).into_owned(),
        })
    }

    /// The fundamental mode, i.e. k-effective and the flux shape
    pub fn dominant(&self) -> Option<Mode> {
        self.mode(0)
    }

    /// Iterate over every mode, dominant first
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        (0..self.len()).filter_map(|i| self.mode(i))
    }
}

impl std::fmt::Display for Spectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Spectrum ({} modes)", self.len());
        for (i, k) in self.eigenvalues.iter().enumerate() {
            s += &f!("\n  k[{i}] = {}", fmt_complex(*k));
        }
        write!(f, "{}", s)
    }
}

/// Solve `A phi = (1/k) F phi` for every k and flux shape
///
/// Equivalent to the standard problem `M phi = k phi` with `M = A^-1 F`. The
/// full spectrum is returned, see [Spectrum] for ordering and normalisation.
///
/// Fails if `A` is not invertible.
///
/// ```rust
/// # use pinlat_mgxs::solve;
/// # use nalgebra::dmatrix;
/// let a = dmatrix![1.0, 0.0; -0.1, 1.0];
/// let f = dmatrix![0.5, 0.5; 0.0, 0.0];
///
/// let spectrum = solve(&a, &f).unwrap();
/// let k = spectrum.dominant().unwrap().k_eff();
/// assert!((k - 0.55).abs() < 1e-10);
/// ```
pub fn solve(a: &DMatrix<f64>, f: &DMatrix<f64>) -> Result<Spectrum> {
    let n = a.nrows();
    if n == 0 {
        return Err(Error::DimensionMismatch {
            expected: 1,
            found: 0,
        });
    }
    for found in [a.ncols(), f.nrows(), f.ncols()] {
        if found != n {
            return Err(Error::DimensionMismatch { expected: n, found });
        }
    }

    debug!("Solving {n} group eigenvalue problem");

    let lu = a.clone().lu();
    let determinant = lu.determinant();
    if !lu.is_invertible() || !determinant.is_finite() {
        return Err(Error::SingularBalanceOperator { determinant });
    }

    let m = lu
        .solve(f)
        .ok_or(Error::SingularBalanceOperator { determinant })?;
    if m.iter().any(|v| !v.is_finite()) {
        return Err(Error::SingularBalanceOperator { determinant });
    }
    trace!("M = A^-1 F{m}");

    let mut eigenvalues: Vec<Complex<f64>> = m.complex_eigenvalues().iter().copied().collect();
    eigenvalues.sort_by(|a, b| {
        b.re.total_cmp(&a.re)
            .then(b.norm().total_cmp(&a.norm()))
            .then(b.im.total_cmp(&a.im))
    });

    let m = m.map(|v| Complex::new(v, 0.0));
    let vectors = eigenvalues
        .iter()
        .enumerate()
        .map(|(i, k)| {
            // repeated eigenvalues share one shift and take successive null vectors
            let earlier = &eigenvalues[..i];
            let repeat = earlier.iter().filter(|o| is_degenerate(k, o)).count();
            let shift = earlier
                .iter()
                .find(|o| is_degenerate(k, o))
                .unwrap_or(k);
            eigenvector(&m, *shift, repeat)
        })
        .collect::<Result<Vec<_>>>()?;

    let spectrum = Spectrum {
        eigenvalues: DVector::from_vec(eigenvalues),
        eigenvectors: DMatrix::from_columns(&vectors),
    };

    debug!("  - dominant k = {}", fmt_complex(spectrum.eigenvalues[0]));
    Ok(spectrum)
}

/// Collapse-to-k convenience, builds both operators and returns the dominant
/// mode
pub fn criticality(xs: &CrossSections) -> Result<Mode> {
    if !xs.is_fissile() {
        return Err(Error::NoFissionSource);
    }

    let spectrum = solve(&balance_operator(xs), &fission_operator(xs))?;
    match spectrum.dominant() {
        Some(mode) if mode.k.norm() > 0.0 => Ok(mode),
        _ => Err(Error::NoFissionSource),
    }
}

/// Null vector of `M - kI` from the complex SVD
///
/// The right singular vectors with zero singular value span the null space,
/// `repeat` picks which one for degenerate eigenvalues. Once `repeat` runs
/// past the null space the last null vector is reused.
fn eigenvector(
    m: &DMatrix<Complex<f64>>,
    k: Complex<f64>,
    repeat: usize,
) -> Result<DVector<Complex<f64>>> {
    let n = m.nrows();
    let shifted = m - DMatrix::from_diagonal_element(n, n, k);
    let svd = shifted.svd(false, true);

    let v_t = svd
        .v_t
        .ok_or_else(|| Error::DecompositionFailed(f!("no singular vectors for k = {k}")))?;

    let sigma = &svd.singular_values;
    let mut order: Vec<usize> = (0..sigma.len()).collect();
    order.sort_by(|a, b| sigma[*a].total_cmp(&sigma[*b]));

    // at least the smallest, even if rounding keeps it off zero
    let tol = NULL_TOL * sigma.max().max(k.norm());
    let null = sigma.iter().filter(|s| **s <= tol).count().max(1);
    let index = order[repeat.min(null - 1)];

    let vector = v_t.row(index).adjoint();
    normalise(vector)
}

/// Unit 2-norm with the largest component real and positive
fn normalise(vector: DVector<Complex<f64>>) -> Result<DVector<Complex<f64>>> {
    let norm = vector.norm();
    if !norm.is_finite() || norm == 0.0 {
        return Err(Error::DecompositionFailed(f!(
            "eigenvector has norm {norm}"
        )));
    }

    let mut pivot = 0;
    for (i, c) in vector.iter().enumerate() {
        if c.norm() > vector[pivot].norm() {
            pivot = i;
        }
    }

    let phase = vector[pivot] / vector[pivot].norm();
    let mut vector = vector.map(|c| c / (phase * norm));
    vector[pivot] = Complex::new(vector[pivot].re, 0.0);
    Ok(vector)
}

fn is_degenerate(a: &Complex<f64>, b: &Complex<f64>) -> bool {
    (a - b).norm() <= DEGENERATE_TOL * a.norm().max(b.norm()).max(1.0)
}

fn fmt_complex(c: Complex<f64>) -> String {
    match c.im == 0.0 {
        true => c.re.sci(5, 2),
        false => {
            let sign = if c.im < 0.0 { '-' } else { '+' };
            f!("{} {sign} {}i", c.re.sci(5, 2), c.im.abs().sci(5, 2))
        }
    }
}
