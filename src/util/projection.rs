use vek::Vec3;

/// Projection trait for decomposing vectors against other linear types
pub trait Projection<T> {
    type Output;

    /// The component of `self` along `onto`.
    fn projected(self, onto: &T) -> Self::Output;

    /// The component of `self` orthogonal to `from`, i.e. `self` projected
    /// onto the plane whose normal is `from`.
    fn rejected(self, from: &T) -> Self::Output;
}

// Impls

impl Projection<Vec3<f32>> for Vec3<f32> {
    type Output = Self;

    fn projected(self, v: &Self) -> Self::Output {
        let v = *v;
        v * self.dot(v) / v.magnitude_squared()
    }

    fn rejected(self, v: &Self) -> Self::Output { self - self.projected(v) }
}
