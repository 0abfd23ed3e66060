use crate::{distance::distance, stats::mean};

/// Anything that can sit inside a node: a representative position plus the
/// extent around it that an enclosing sphere has to cover.
pub trait Bounded<const D: usize> {
    fn center(&self) -> &[f64; D];

    fn radius(&self) -> f64 {
        0.0
    }
}

impl<const D: usize> Bounded<D> for [f64; D] {
    fn center(&self) -> &[f64; D] {
        self
    }
}

impl<const D: usize> Bounded<D> for Sphere<D> {
    fn center(&self) -> &[f64; D] {
        &self.center
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere<const D: usize> {
    pub center: [f64; D],
    pub radius: f64,
}

impl<const D: usize> Sphere<D> {
    #[must_use]
    pub fn new(center: [f64; D], radius: f64) -> Sphere<D> {
        Sphere { center, radius }
    }

    /// Smallest sphere centred at the mean of the entries' positions that
    /// covers every entry in full. Empty input gives the default sphere.
    #[must_use]
    pub fn enclosing<E: Bounded<D>>(entries: &[E]) -> Sphere<D> {
        if entries.is_empty() {
            return Sphere::default();
        }

        // Calculate the centroid
        let mut center = [0.0; D];
        let mut axis_values = Vec::with_capacity(entries.len());
        for (i, x) in center.iter_mut().enumerate() {
            axis_values.clear();
            axis_values.extend(entries.iter().map(|e| e.center()[i]));
            *x = mean(&axis_values).unwrap_or(0.0);
        }

        // Calculate the radius
        let mut radius: f64 = 0.0;
        for entry in entries {
            let distance = distance(&center, entry.center()) + entry.radius();
            radius = radius.max(distance);
        }

        Sphere::new(center, radius)
    }

    #[must_use]
    pub fn contains(&self, point: &[f64; D]) -> bool {
        distance(&self.center, point) <= self.radius
    }

    /// Distance from `point` to the far side of the sphere.
    #[must_use]
    pub fn max_distance(&self, point: &[f64; D]) -> f64 {
        distance(&self.center, point) + self.radius
    }

    /// Whether `other` lies entirely inside this sphere, up to `tolerance`.
    #[must_use]
    pub fn encloses(&self, other: &Sphere<D>, tolerance: f64) -> bool {
        other.max_distance(&self.center) <= self.radius + tolerance
    }
}

impl<const D: usize> Default for Sphere<D> {
    fn default() -> Self {
        Sphere {
            center: [0.0; D],
            radius: 0.0,
        }
    }
}
