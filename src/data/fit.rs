use linreg::linear_regression;
use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Least-squares straight line. Returns `(slope, intercept)`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<(f64, f64)> {
    check_lengths(xs, ys)?;
    if xs.len() < 2 {
        return Err(Error::Fit(format!(
            "need at least 2 points for a linear fit, got {}",
            xs.len()
        )));
    }
    let (slope, intercept) = linear_regression::<f64, f64, f64>(xs, ys)
        .map_err(|e| Error::Fit(format!("linear regression failed: {e:?}")))?;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(Error::Fit("linear regression gave non-finite coefficients".into()));
    }
    Ok((slope, intercept))
}

/// Least-squares polynomial of the given degree.
///
/// Coefficients are returned lowest power first: `c[0] + c[1]·x + c[2]·x² ...`.
pub fn polynomial_fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    check_lengths(xs, ys)?;
    let n_coeffs = degree + 1;
    if xs.len() < n_coeffs {
        return Err(Error::Fit(format!(
            "degree {degree} needs at least {n_coeffs} points, got {}",
            xs.len()
        )));
    }

    // Vandermonde matrix, one row per point, each column scaled to unit norm
    // so that x in the thousands does not swamp the low powers.
    let mut a = DMatrix::from_fn(xs.len(), n_coeffs, |i, j| xs[i].powi(j as i32));
    let scales: Vec<f64> = a
        .column_iter()
        .map(|col| match col.norm() {
            n if n > 0.0 && n.is_finite() => n,
            _ => 1.0,
        })
        .collect();
    for (j, scale) in scales.iter().enumerate() {
        a.column_mut(j).unscale_mut(*scale);
    }
    let b = DVector::from_column_slice(ys);

    let svd = a.svd(true, true);
    let sigma_max = svd.singular_values.max();
    // Relative cutoff, as numpy's polyfit uses: len(x) * machine epsilon.
    let cutoff = xs.len() as f64 * f64::EPSILON * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();
    if rank < n_coeffs {
        return Err(Error::Fit(format!(
            "x values only support rank {rank}, degree {degree} needs {n_coeffs}"
        )));
    }

    let scaled = svd
        .solve(&b, cutoff)
        .map_err(|e| Error::Fit(e.to_string()))?;
    let coeffs: Vec<f64> = scaled
        .iter()
        .zip(&scales)
        .map(|(c, scale)| c / scale)
        .collect();

    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(Error::Fit("least-squares solve gave non-finite coefficients".into()));
    }
    Ok(coeffs)
}

fn check_lengths(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(Error::Fit(format!(
            "x has {} values but y has {}",
            xs.len(),
            ys.len()
        )));
    }
    Ok(())
}

/// Render coefficients (lowest power first) as a host function expression,
/// e.g. `1.0 + 2.5 * x**1 + -0.5 * x**2`.
pub fn polynomial_expression(coeffs: &[f64]) -> String {
    let mut expr = String::new();
    for (i, coeff) in coeffs.iter().enumerate() {
        if i == 0 {
            expr.push_str(&format!("{coeff:?}"));
        } else {
            expr.push_str(&format!(" + {coeff:?} * x**{i}"));
        }
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_through_origin() {
        let (slope, intercept) = linear_fit(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-9);
        assert!(intercept.abs() < 1e-9);
    }

    #[test]
    fn linear_fit_rejects_mismatch() {
        assert!(matches!(
            linear_fit(&[0.0, 1.0], &[1.0]),
            Err(Error::Fit(_))
        ));
    }

    #[test]
    fn quadratic_recovered() {
        let xs: Vec<f64> = (0..8).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 1.0 - 3.0 * x + 0.5 * x * x).collect();
        let c = polynomial_fit(&xs, &ys, 2).unwrap();
        assert_eq!(c.len(), 3);
        assert!((c[0] - 1.0).abs() < 1e-8);
        assert!((c[1] + 3.0).abs() < 1e-8);
        assert!((c[2] - 0.5).abs() < 1e-8);
    }

    #[test]
    fn degree_one_matches_linear_fit() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 2.9, 5.1, 7.0];
        let c = polynomial_fit(&xs, &ys, 1).unwrap();
        let (slope, intercept) = linear_fit(&xs, &ys).unwrap();
        assert!((c[0] - intercept).abs() < 1e-9);
        assert!((c[1] - slope).abs() < 1e-9);
    }

    #[test]
    fn too_few_points_is_fit_error() {
        let err = polynomial_fit(&[0.0, 1.0], &[0.0, 1.0], 3).unwrap_err();
        assert!(matches!(err, Error::Fit(_)));
    }

    #[test]
    fn constant_x_is_fit_error() {
        let err = polynomial_fit(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0], 1).unwrap_err();
        assert!(matches!(err, Error::Fit(_)), "{err:?}");
    }

    #[test]
    fn high_degree_on_wavenumber_axis() {
        // A cubic sampled like an imported spectrum, fitted with spare degrees.
        let xs: Vec<f64> = (0..1000).map(|i| 4000.0 - 3.6 * i as f64).collect();
        let cubic = |x: f64| {
            let u = x / 1000.0;
            1.0 + 0.5 * u - 0.3 * u * u + 0.05 * u * u * u
        };
        let ys: Vec<f64> = xs.iter().map(|&x| cubic(x)).collect();

        for degree in [5, 7] {
            let c = polynomial_fit(&xs, &ys, degree).unwrap();
            assert_eq!(c.len(), degree + 1);
            let worst = xs
                .iter()
                .zip(&ys)
                .map(|(&x, &y)| (evaluate(&c, x) - y).abs())
                .fold(0.0, f64::max);
            assert!(worst < 1e-9, "degree {degree}: max residual {worst:e}");
        }
    }

    fn evaluate(coeffs: &[f64], x: f64) -> f64 {
        coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    #[test]
    fn expression_format() {
        assert_eq!(polynomial_expression(&[1.0]), "1.0");
        assert_eq!(
            polynomial_expression(&[0.5, 2.0, -1.0]),
            "0.5 + 2.0 * x**1 + -1.0 * x**2"
        );
    }
}
