//! Fixed-size linear algebra used by the transfers and constitutive models.
//!
//! Vector and matrix arithmetic (add, scale, Hadamard product, dot,
//! transpose, determinant, matrix-vector product) comes straight from glam's
//! double precision types. This module adds the pieces glam does not have:
//! the outer product, the analytic 2x2 polar decomposition and the closed-form
//! 2x2 SVD built on top of it.

use bevy::math::{DMat2, DVec2, DVec3};

pub type Real = f64;

pub type Vector = DVec2;
pub type Vector3 = DVec3;
pub type Matrix = DMat2;
pub type Point = DVec2;

/// Off-diagonal magnitude below which the stretch is treated as diagonal.
///
/// Reference scenarios depend on this exact threshold.
pub const SVD_EPSILON: Real = 1.0e-6;

#[inline(always)]
pub fn zero_vector() -> Vector {
    DVec2::ZERO
}

#[inline(always)]
pub fn zero_matrix() -> Matrix {
    DMat2::ZERO
}

#[inline(always)]
pub fn identity_matrix() -> Matrix {
    DMat2::IDENTITY
}

#[inline(always)]
pub fn matrix_determinant(m: &Matrix) -> Real {
    m.determinant()
}

#[inline(always)]
pub fn diagonal_from_value(value: Real) -> Matrix {
    Matrix::from_diagonal(DVec2::splat(value))
}

#[inline(always)]
pub fn diagonal_from_vec(vec: Vector) -> Matrix {
    Matrix::from_diagonal(vec)
}

#[inline(always)]
pub fn matrix_is_finite(m: &Matrix) -> bool {
    m.x_axis.is_finite() && m.y_axis.is_finite()
}

/// `a ⊗ b`, i.e. the matrix `a·bᵀ`.
#[inline(always)]
pub fn outer_product(a: Vector, b: Vector) -> Matrix {
    Matrix::from_cols(a * b.x, a * b.y)
}

/// Builds a matrix from the row-major tuple `[m00, m01, m10, m11]`.
#[inline]
pub fn matrix_from_row_major(m: [Real; 4]) -> Matrix {
    Matrix::from_cols(DVec2::new(m[0], m[2]), DVec2::new(m[1], m[3]))
}

/// Inverse of [`matrix_from_row_major`].
#[inline]
pub fn matrix_to_row_major(m: &Matrix) -> [Real; 4] {
    [m.x_axis.x, m.y_axis.x, m.x_axis.y, m.y_axis.y]
}

/// `M = R·S` with `R` a rotation and `S` symmetric.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PolarDecomposition {
    pub rotation: Matrix,
    pub stretch: Matrix,
}

/// `M = U·Σ·Vᵀ` with singular values sorted in descending order.
///
/// `U` and `V` are rotations; a reflection in `M` shows up as a negative
/// second singular value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SingularValueDecomposition {
    pub u: Matrix,
    pub singular_values: Vector,
    pub v: Matrix,
}

impl SingularValueDecomposition {
    #[inline]
    pub fn sigma(&self) -> Matrix {
        diagonal_from_vec(self.singular_values)
    }

    /// `U·diag(values)·Vᵀ`.
    #[inline]
    pub fn recompose_with(&self, values: Vector) -> Matrix {
        self.u * diagonal_from_vec(values) * self.v.transpose()
    }

    #[inline]
    pub fn recompose(&self) -> Matrix {
        self.recompose_with(self.singular_values)
    }
}

/// Analytic 2x2 polar decomposition.
///
/// When `M` has zero trace and is symmetric (`m00 + m11 = 0` and
/// `m10 = m01`, e.g. the zero matrix) no rotation is singled out; the
/// rotation falls back to the identity and the stretch to `M` itself.
pub fn polar_decomposition(m: &Matrix) -> PolarDecomposition {
    let x = m.x_axis.x + m.y_axis.y;
    let y = m.x_axis.y - m.y_axis.x;
    let norm = (x * x + y * y).sqrt();

    let rotation = if norm > 0.0 {
        let c = x / norm;
        let s = y / norm;
        Matrix::from_cols(DVec2::new(c, s), DVec2::new(-s, c))
    } else {
        identity_matrix()
    };

    PolarDecomposition {
        rotation,
        stretch: rotation.transpose() * *m,
    }
}

/// Closed-form 2x2 SVD: polar decomposition followed by one Jacobi rotation
/// that diagonalizes the symmetric stretch.
pub fn svd(m: &Matrix) -> SingularValueDecomposition {
    let polar = polar_decomposition(m);
    let s = polar.stretch;
    let (s00, s01, s11) = (s.x_axis.x, s.y_axis.x, s.y_axis.y);

    let (c, sn, sigma) = if s01.abs() < SVD_EPSILON {
        (1.0, 0.0, DVec2::new(s00, s11))
    } else {
        let tau = 0.5 * (s00 - s11);
        let w = (tau * tau + s01 * s01).sqrt();
        let t = if tau > 0.0 {
            s01 / (tau + w)
        } else {
            s01 / (tau - w)
        };
        let c = 1.0 / (t * t + 1.0).sqrt();
        let sn = -t * c;
        let sigma = DVec2::new(
            c * c * s00 - 2.0 * c * sn * s01 + sn * sn * s11,
            sn * sn * s00 + 2.0 * c * sn * s01 + c * c * s11,
        );
        (c, sn, sigma)
    };

    // Columns of `v` are the eigenvectors of the stretch, kept right-handed.
    let (singular_values, v) = if sigma.x < sigma.y {
        (
            DVec2::new(sigma.y, sigma.x),
            Matrix::from_cols(DVec2::new(-sn, -c), DVec2::new(c, -sn)),
        )
    } else {
        (
            sigma,
            Matrix::from_cols(DVec2::new(c, -sn), DVec2::new(sn, c)),
        )
    };

    SingularValueDecomposition {
        u: polar.rotation * v,
        singular_values,
        v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_matrix_eq(a: &Matrix, b: &Matrix, epsilon: Real) {
        let (a, b) = (matrix_to_row_major(a), matrix_to_row_major(b));
        for k in 0..4 {
            assert_relative_eq!(a[k], b[k], epsilon = epsilon);
        }
    }

    fn nalgebra_singular_values(m: &Matrix) -> (Real, Real) {
        let [m00, m01, m10, m11] = matrix_to_row_major(m);
        let na = nalgebra::Matrix2::new(m00, m01, m10, m11);
        let values = na.singular_values();
        (values[0].max(values[1]), values[0].min(values[1]))
    }

    #[test]
    fn elementary_operations() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(3.0, 4.0);
        assert_eq!(a + b, Vector::new(4.0, 6.0));
        assert_eq!(b - a, Vector::new(2.0, 2.0));
        assert_eq!(a * 3.0, Vector::new(3.0, 6.0));
        assert_eq!(Vector::new(2.0, 3.0) * Vector::new(4.0, 5.0), Vector::new(8.0, 15.0));
        assert_eq!(a.dot(b), 11.0);

        let m = matrix_from_row_major([1.0, 2.0, 3.0, 4.0]);
        let n = matrix_from_row_major([5.0, 6.0, 7.0, 8.0]);
        assert_eq!(matrix_to_row_major(&(m + n)), [6.0, 8.0, 10.0, 12.0]);
        assert_eq!(matrix_to_row_major(&(m * n)), [19.0, 22.0, 43.0, 50.0]);
        assert_eq!(matrix_to_row_major(&m.transpose()), [1.0, 3.0, 2.0, 4.0]);
        assert_eq!(m.determinant(), -2.0);
        assert_eq!(m * Vector::new(5.0, 6.0), Vector::new(17.0, 39.0));
        assert_eq!(
            matrix_to_row_major(&outer_product(a, b)),
            [3.0, 4.0, 6.0, 8.0]
        );
    }

    #[test]
    fn polar_of_identity_is_trivial() {
        let polar = polar_decomposition(&identity_matrix());
        assert_eq!(polar.rotation, identity_matrix());
        assert_eq!(polar.stretch, identity_matrix());
    }

    #[test]
    fn polar_of_rotation_recovers_it() {
        let f = matrix_from_row_major([0.0, -1.0, 1.0, 0.0]);
        let polar = polar_decomposition(&f);
        assert_matrix_eq(&polar.rotation, &f, 1.0e-12);
        assert_matrix_eq(&polar.stretch, &identity_matrix(), 1.0e-5);
    }

    #[test]
    fn polar_stretch_is_symmetric_and_recomposes() {
        let m = matrix_from_row_major([1.3, 0.4, -0.2, 0.8]);
        let polar = polar_decomposition(&m);
        assert_relative_eq!(polar.stretch.y_axis.x, polar.stretch.x_axis.y, epsilon = 1.0e-12);
        assert_relative_eq!(polar.rotation.determinant(), 1.0, epsilon = 1.0e-12);
        assert_matrix_eq(&(polar.rotation * polar.stretch), &m, 1.0e-12);
    }

    #[test]
    fn polar_of_degenerate_matrix_falls_back_to_identity() {
        let polar = polar_decomposition(&zero_matrix());
        assert_eq!(polar.rotation, identity_matrix());
        assert_eq!(polar.stretch, zero_matrix());
        assert!(matrix_is_finite(&polar.stretch));

        // Zero trace, symmetric: x = y = 0.
        let m = matrix_from_row_major([1.0, 2.0, 2.0, -1.0]);
        let polar = polar_decomposition(&m);
        assert_eq!(polar.rotation, identity_matrix());
        assert_eq!(polar.stretch, m);
    }

    #[test]
    fn svd_of_identity_is_trivial() {
        let svd = svd(&identity_matrix());
        assert_eq!(svd.u, identity_matrix());
        assert_eq!(svd.sigma(), identity_matrix());
        assert_eq!(svd.v, identity_matrix());
    }

    #[test]
    fn svd_recomposes_and_orders_values() {
        let samples = [
            [1.1, 0.0, 0.0, 0.9],
            [0.9, 0.0, 0.0, 1.1],
            [1.02, 0.3, -0.1, 0.97],
            [2.0, 1.0, 1.0, 3.0],
            [0.5, -0.7, 0.2, 1.4],
        ];
        for sample in samples {
            let m = matrix_from_row_major(sample);
            let svd = svd(&m);
            assert!(svd.singular_values.x >= svd.singular_values.y);
            assert_matrix_eq(&svd.recompose(), &m, 1.0e-10);
            assert_relative_eq!(svd.u.determinant(), 1.0, epsilon = 1.0e-10);
            assert_relative_eq!(svd.v.determinant(), 1.0, epsilon = 1.0e-10);

            let (largest, smallest) = nalgebra_singular_values(&m);
            assert_relative_eq!(svd.singular_values.x, largest, epsilon = 1.0e-10);
            assert_relative_eq!(svd.singular_values.y, smallest, epsilon = 1.0e-10);
        }
    }

    #[test]
    fn svd_keeps_reflection_in_the_smallest_value() {
        let m = matrix_from_row_major([1.0, 0.2, 0.1, -0.8]);
        let svd = svd(&m);
        assert!(svd.singular_values.y < 0.0);
        assert_relative_eq!(
            svd.singular_values.x * svd.singular_values.y,
            m.determinant(),
            epsilon = 1.0e-10
        );
        assert_matrix_eq(&svd.recompose(), &m, 1.0e-10);
    }

    #[test]
    fn svd_threshold_skips_the_jacobi_rotation() {
        let m = matrix_from_row_major([1.2, 5.0e-7, 5.0e-7, 0.8]);
        let svd = svd(&m);
        assert_eq!(svd.v, identity_matrix());
        assert_eq!(svd.singular_values.x, polar_decomposition(&m).stretch.x_axis.x);
    }
}
