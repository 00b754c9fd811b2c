//! Mathematical utilities for stress evaluation

pub mod principal;

use nalgebra::{Matrix3, Vector3};

pub use principal::{
    principal_stresses, principal_values, solve_newton, solve_quadratic, PrincipalStresses,
    StressTensor,
};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// Arithmetic mean of a set of points
pub fn centroid(points: &[[f64; 3]]) -> Option<[f64; 3]> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec3::zeros(), |acc, p| acc + Vec3::new(p[0], p[1], p[2]));
    let mean = sum / points.len() as f64;
    Some([mean.x, mean.y, mean.z])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let c = centroid(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 4.0, 6.0]]).unwrap();
        assert!((c[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((c[1] - 4.0 / 3.0).abs() < 1e-12);
        assert!((c[2] - 2.0).abs() < 1e-12);
        assert!(centroid(&[]).is_none());
    }
}
