//! Principal stresses of a symmetric 3x3 stress tensor
//!
//! Principal values are the roots of the characteristic polynomial
//! `p³ − A·p² + B·p − C = 0` built from the tensor invariants. One root is
//! found by Newton's method starting at the largest normal stress, the
//! cubic is deflated by that root and the remaining quadratic is solved in
//! closed form. Directions come from a symmetric eigen-decomposition.

use nalgebra::SymmetricEigen;
use serde::{Deserialize, Serialize};

use super::Mat3;
use crate::error::{CdbError, CdbResult};
use crate::options::SolverOptions;

/// Relative slack below which a negative discriminant is rounding noise
const DISCRIMINANT_SLACK: f64 = 1e-12;

/// Discriminant slack for the quadratic left after deflating by a Newton root.
///
/// The deflation inherits the Newton residual (below `tolerance`), which
/// shows up in the discriminant scaled by the tensor magnitude. Repeated
/// roots therefore come out slightly negative and must be clamped.
fn deflation_slack(tensor: &StressTensor, tolerance: f64) -> f64 {
    let magnitude = tensor.matrix().norm_squared();
    DISCRIMINANT_SLACK * magnitude + 4.0 * tolerance * magnitude.sqrt()
}

/// Six independent components of a symmetric stress tensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StressTensor {
    pub sx: f64,
    pub sy: f64,
    pub sz: f64,
    pub txy: f64,
    pub txz: f64,
    pub tyz: f64,
}

impl StressTensor {
    pub fn new(sx: f64, sy: f64, sz: f64, txy: f64, txz: f64, tyz: f64) -> Self {
        Self {
            sx,
            sy,
            sz,
            txy,
            txz,
            tyz,
        }
    }

    /// Hydrostatic state `s` in every direction
    pub fn isotropic(s: f64) -> Self {
        Self::new(s, s, s, 0.0, 0.0, 0.0)
    }

    /// Invariants (A, B, C) of the characteristic polynomial
    pub fn invariants(&self) -> (f64, f64, f64) {
        let Self {
            sx,
            sy,
            sz,
            txy,
            txz,
            tyz,
        } = *self;
        let a = sx + sy + sz;
        let b = sx * sy + sx * sz + sy * sz - txy.powi(2) - txz.powi(2) - tyz.powi(2);
        let c = sx * sy * sz + 2.0 * txy * txz * tyz
            - sx * tyz.powi(2)
            - sy * txz.powi(2)
            - sz * txy.powi(2);
        (a, b, c)
    }

    /// Full symmetric matrix
    pub fn matrix(&self) -> Mat3 {
        Mat3::new(
            self.sx, self.txy, self.txz, //
            self.txy, self.sy, self.tyz, //
            self.txz, self.tyz, self.sz,
        )
    }

    /// Von Mises equivalent stress
    pub fn von_mises(&self) -> f64 {
        let normal = (self.sx - self.sy).powi(2)
            + (self.sy - self.sz).powi(2)
            + (self.sz - self.sx).powi(2);
        let shear = self.txy.powi(2) + self.txz.powi(2) + self.tyz.powi(2);
        (0.5 * normal + 3.0 * shear).sqrt()
    }
}

/// Principal values, largest first, with their unit directions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalStresses {
    /// σ1 ≥ σ2 ≥ σ3
    pub values: [f64; 3],
    /// Direction of each principal value
    pub directions: [[f64; 3]; 3],
}

impl PrincipalStresses {
    /// Principal values (with directions) whose magnitude reaches `threshold`
    pub fn significant(&self, threshold: f64) -> impl Iterator<Item = (f64, [f64; 3])> + '_ {
        self.values
            .iter()
            .zip(self.directions.iter())
            .filter(move |(value, _)| value.abs() >= threshold)
            .map(|(value, direction)| (*value, *direction))
    }
}

/// Approximate a root of `f` by Newton's method.
///
/// Stops as soon as `|f(x)| < tolerance`. An iterate with an exactly zero
/// derivative is shifted by `zero_slope_step`, which uses up an iteration.
/// Returns `None` when the budget runs out.
pub fn solve_newton<F, D>(f: F, df: D, x0: f64, options: &SolverOptions) -> Option<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut xn = x0;
    for _ in 0..options.max_iterations {
        let fxn = f(xn);
        if fxn.abs() < options.tolerance {
            return Some(xn);
        }
        let dfxn = df(xn);
        if dfxn == 0.0 {
            xn += options.zero_slope_step;
            continue;
        }
        xn -= fxn / dfxn;
    }
    None
}

/// Real roots of `a·x² + b·x + c`, larger root first for `a > 0`.
///
/// A negative discriminant no further below zero than `slack` is treated as
/// a double root.
pub fn solve_quadratic(a: f64, b: f64, c: f64, slack: f64) -> CdbResult<(f64, f64)> {
    let mut discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        if discriminant < -slack.max(0.0) {
            return Err(CdbError::NegativeDiscriminant(discriminant));
        }
        discriminant = 0.0;
    }
    let root = discriminant.sqrt();
    Ok(((-b + root) / (2.0 * a), (-b - root) / (2.0 * a)))
}

/// Principal values of `tensor`, largest first
pub fn principal_values(tensor: &StressTensor, options: &SolverOptions) -> CdbResult<[f64; 3]> {
    let (a, b, c) = tensor.invariants();

    let f = |p: f64| p.powi(3) - a * p.powi(2) + b * p - c;
    let df = |p: f64| 3.0 * p.powi(2) - 2.0 * a * p + b;
    let start = tensor.sx.max(tensor.sy).max(tensor.sz);
    let p1 = solve_newton(f, df, start, options)
        .ok_or(CdbError::ConvergenceFailed(options.max_iterations))?;

    let slack = deflation_slack(tensor, options.tolerance);
    let (p2, p3) = solve_quadratic(1.0, p1 - a, p1 * p1 - p1 * a + b, slack)?;

    let mut values = [p1, p2, p3];
    values.sort_by(|x, y| y.total_cmp(x));
    Ok(values)
}

/// Principal values and directions of `tensor`
pub fn principal_stresses(
    tensor: &StressTensor,
    options: &SolverOptions,
) -> CdbResult<PrincipalStresses> {
    let values = principal_values(tensor, options)?;

    let eigen = SymmetricEigen::new(tensor.matrix());
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| eigen.eigenvalues[j].total_cmp(&eigen.eigenvalues[i]));
    let directions = order.map(|i| {
        let v = eigen.eigenvectors.column(i);
        [v[0], v[1], v[2]]
    });

    Ok(PrincipalStresses { values, directions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn options() -> SolverOptions {
        SolverOptions::default()
    }

    #[test]
    fn test_newton_cube_root_of_one() {
        let root = solve_newton(|p| p.powi(3) - 1.0, |p| 3.0 * p.powi(2), 2.0, &options()).unwrap();
        assert_abs_diff_eq!(root, 1.0, epsilon = 1e-5);

        let budget = SolverOptions {
            max_iterations: 10,
            ..options()
        };
        assert!(solve_newton(|p| p.powi(3) - 1.0, |p| 3.0 * p.powi(2), 2.0, &budget).is_some());
    }

    #[test]
    fn test_newton_steps_off_zero_slope() {
        let root = solve_newton(|p| p * p - 1.0, |p| 2.0 * p, 0.0, &options()).unwrap();
        assert_abs_diff_eq!(root, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_newton_without_real_root() {
        assert!(solve_newton(|p| p * p + 1.0, |p| 2.0 * p, 3.0, &options()).is_none());
    }

    #[test]
    fn test_quadratic() {
        let (x1, x2) = solve_quadratic(1.0, -5.0, 6.0, 0.0).unwrap();
        assert_abs_diff_eq!(x1, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x2, 2.0, epsilon = 1e-12);
        assert!(matches!(
            solve_quadratic(1.0, 0.0, 1.0, 1e-6),
            Err(CdbError::NegativeDiscriminant(_))
        ));
    }

    #[test]
    fn test_quadratic_clamps_rounding_noise() {
        // x² - 2x + (1 + 1e-13) has a discriminant of -4e-13
        let (x1, x2) = solve_quadratic(1.0, -2.0, 1.0 + 1e-13, 1e-9).unwrap();
        assert_abs_diff_eq!(x1, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x2, 1.0, epsilon = 1e-12);
        assert!(solve_quadratic(1.0, -2.0, 1.0 + 1e-13, 0.0).is_err());
    }

    #[test]
    fn test_diagonal_tensor() {
        let tensor = StressTensor::new(3.0, -1.0, 7.0, 0.0, 0.0, 0.0);
        let values = principal_values(&tensor, &options()).unwrap();
        assert_abs_diff_eq!(values[0], 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(values[1], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(values[2], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_isotropic_tensor() {
        for s in [5.0, -42.5, 0.1, 0.0, 250.0] {
            let values = principal_values(&StressTensor::isotropic(s), &options()).unwrap();
            for value in values {
                assert_abs_diff_eq!(value, s, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_pure_shear() {
        let tensor = StressTensor::new(0.0, 0.0, 0.0, 5.0, 0.0, 0.0);
        let values = principal_values(&tensor, &options()).unwrap();
        assert_abs_diff_eq!(values[0], 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(values[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(values[2], -5.0, epsilon = 1e-6);
    }

    /// Small deterministic generator for test tensors
    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 % 20_001) as f64 / 100.0 - 100.0
        }
    }

    #[test]
    fn test_matches_symmetric_eigen() {
        let mut rng = XorShift(0x2545_f491_4f6c_dd1d);
        let mut checked = 0;
        for _ in 0..200 {
            let tensor = StressTensor::new(
                rng.next(),
                rng.next(),
                rng.next(),
                rng.next(),
                rng.next(),
                rng.next(),
            );
            let mut reference: Vec<f64> = SymmetricEigen::new(tensor.matrix())
                .eigenvalues
                .iter()
                .copied()
                .collect();
            reference.sort_by(|x, y| y.total_cmp(x));
            if reference[0] - reference[1] < 1.0 || reference[1] - reference[2] < 1.0 {
                continue;
            }

            let values = principal_values(&tensor, &options()).unwrap();
            for (value, expected) in values.iter().zip(&reference) {
                assert_abs_diff_eq!(*value, *expected, epsilon = 1e-4);
            }
            checked += 1;
        }
        assert!(checked > 150);
    }

    fn rotated(diagonal: [f64; 3], roll: f64, pitch: f64, yaw: f64) -> StressTensor {
        let r = nalgebra::Rotation3::from_euler_angles(roll, pitch, yaw).into_inner();
        let d = Mat3::from_diagonal(&super::super::Vec3::from(diagonal));
        let m = r * d * r.transpose();
        StressTensor::new(m[(0, 0)], m[(1, 1)], m[(2, 2)], m[(0, 1)], m[(0, 2)], m[(1, 2)])
    }

    #[test]
    fn test_rotated_tensors_with_repeated_roots() {
        // Uniaxial and two-equal states in arbitrary frames
        for (diagonal, expected) in [
            ([10.0, 0.0, 0.0], [10.0, 0.0, 0.0]),
            ([5.0, 5.0, 1.0], [5.0, 5.0, 1.0]),
            ([1.0, 1.0, 5.0], [5.0, 1.0, 1.0]),
            ([0.0, -8.0, 0.0], [0.0, 0.0, -8.0]),
        ] {
            for k in 0..40 {
                let t = f64::from(k);
                let tensor = rotated(diagonal, 0.31 * t, 0.17 * t + 0.05, 0.53 * t);
                let values = principal_values(&tensor, &options())
                    .unwrap_or_else(|e| panic!("{diagonal:?} at step {k}: {e}"));
                for (value, expected) in values.iter().zip(&expected) {
                    assert_abs_diff_eq!(*value, *expected, epsilon = 1e-2);
                }
            }
        }
    }

    #[test]
    fn test_directions_are_eigenvectors() {
        let tensor = StressTensor::new(50.0, -20.0, 10.0, 30.0, -5.0, 15.0);
        let principal = principal_stresses(&tensor, &options()).unwrap();
        let m = tensor.matrix();
        for (value, direction) in principal.values.iter().zip(&principal.directions) {
            let v = super::super::Vec3::new(direction[0], direction[1], direction[2]);
            let residual = m * v - v * *value;
            assert!(residual.norm() < 1e-3, "residual {}", residual.norm());
            assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_significant_values() {
        let principal = principal_stresses(
            &StressTensor::new(2.0, 0.0005, -3.0, 0.0, 0.0, 0.0),
            &options(),
        )
        .unwrap();
        let kept: Vec<f64> = principal.significant(1e-3).map(|(v, _)| v).collect();
        assert_eq!(kept.len(), 2);
        assert_abs_diff_eq!(kept[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(kept[1], -3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_von_mises_uniaxial() {
        let tensor = StressTensor::new(12.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(tensor.von_mises(), 12.0, epsilon = 1e-12);
    }
}
