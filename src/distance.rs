/// Degree of the Minkowski metric used by the tree (2 = Euclidean).
pub const DEGREE: i32 = 2;

/// The metric every node uses to compare centroids and points.
#[must_use]
pub fn distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    minkowski(a, b, DEGREE)
}

#[must_use]
pub fn euclidean<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        sum += (x - y).powi(2);
    }
    sum.sqrt()
}

/// Minkowski distance of the given degree. Degree 2 takes the Euclidean path.
#[must_use]
pub fn minkowski<const D: usize>(a: &[f64; D], b: &[f64; D], degree: i32) -> f64 {
    if degree == 2 {
        return euclidean(a, b);
    }
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        sum += (x - y).abs().powi(degree);
    }
    sum.powf(1.0 / f64::from(degree))
}
