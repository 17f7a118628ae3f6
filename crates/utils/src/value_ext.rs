use crate::f;

/// Extends float primitives with formatting and comparison helpers
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// ```rust
    /// # use pinlat_utils::ValueExt;
    /// assert_eq!((-1.0).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((0.41).sci(3, 2), "4.100e-01".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Check two values agree within a relative or absolute tolerance
    ///
    /// True when `|a - b| <= max(abs_tol, rel_tol * max(|a|, |b|))`. Any `NaN`
    /// is never close to anything.
    ///
    /// ```rust
    /// # use pinlat_utils::ValueExt;
    /// assert!(1.0.is_close(1.0 + 1e-12, 1e-9, 0.0));
    /// assert!(0.0.is_close(1e-15, 0.0, 1e-12));
    /// assert!(!1.0.is_close(1.1, 1e-9, 1e-9));
    /// assert!(!f64::NAN.is_close(f64::NAN, 1.0, 1.0));
    /// ```
    fn is_close(&self, other: f64, rel_tol: f64, abs_tol: f64) -> bool;
}

impl ValueExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // Non-finite values have no exponent to pad
        let Some(idx) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(idx);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn is_close(&self, other: f64, rel_tol: f64, abs_tol: f64) -> bool {
        let diff = (self - other).abs();
        diff <= abs_tol.max(rel_tol * self.abs().max(other.abs()))
    }
}
