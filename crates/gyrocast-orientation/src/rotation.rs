use glam::{DMat3, DVec3};

/// Build the composed Euler rotation matrix for angles in radians.
///
/// Uses the Z-Y-X-style composition the phone's deviceorientation
/// angles map onto. Pure and deterministic: identical inputs produce
/// bit-identical matrices, which the calibration math relies on.
pub fn rotation_matrix(x: f64, y: f64, z: f64) -> DMat3 {
    let (sx, cx) = x.sin_cos();
    let (sy, cy) = y.sin_cos();
    let (sz, cz) = z.sin_cos();

    let m11 = cz * cy - sz * sx * sy;
    let m12 = -cx * sz;
    let m13 = cy * sz * sx + cz * sy;

    let m21 = cy * sz + cz * sx * sy;
    let m22 = cz * cx;
    let m23 = sz * sy - cz * cy * sx;

    let m31 = -cx * sy;
    let m32 = sx;
    let m33 = cx * cy;

    DMat3::from_cols(
        DVec3::new(m11, m21, m31),
        DVec3::new(m12, m22, m32),
        DVec3::new(m13, m23, m33),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn assert_mat_eq(a: DMat3, b: DMat3) {
        for col in 0..3 {
            for row in 0..3 {
                let da = a.col(col)[row];
                let db = b.col(col)[row];
                assert!(
                    (da - db).abs() < EPS,
                    "matrix mismatch at ({row},{col}): {da} vs {db}"
                );
            }
        }
    }

    #[test]
    fn zero_angles_give_identity() {
        assert_mat_eq(rotation_matrix(0.0, 0.0, 0.0), DMat3::IDENTITY);
    }

    #[test]
    fn rotation_matrices_are_orthogonal() {
        let angles = [
            (0.1, -0.4, 2.2),
            (1.0, 1.0, 1.0),
            (-3.0, 0.5, -0.7),
            (std::f64::consts::FRAC_PI_2, 0.0, std::f64::consts::PI),
        ];
        for (x, y, z) in angles {
            let r = rotation_matrix(x, y, z);
            assert_mat_eq(r * r.transpose(), DMat3::IDENTITY);
            assert!((r.determinant() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let a = rotation_matrix(0.33, -1.2, 0.9);
        let b = rotation_matrix(0.33, -1.2, 0.9);
        assert_eq!(a.to_cols_array(), b.to_cols_array());
    }
}
