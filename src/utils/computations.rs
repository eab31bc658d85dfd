use num_traits::Float;

/// Dot product of two 3-vectors
///
/// ```rust
/// use tmd::utils::dot;
///
/// assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
/// ```
pub fn dot<F: Float>(a: &[F; 3], b: &[F; 3]) -> F {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn norm<F: Float>(a: &[F; 3]) -> F {
    dot(a, a).sqrt()
}

/// Displacement `to - from`, without any boundary handling
pub fn displacement<F: Float>(from: &[F; 3], to: &[F; 3]) -> [F; 3] {
    [to[0] - from[0], to[1] - from[1], to[2] - from[2]]
}

pub fn distance_squared<F: Float>(coord1: &[F; 3], coord2: &[F; 3]) -> F {
    let d = displacement(coord1, coord2);
    dot(&d, &d)
}
