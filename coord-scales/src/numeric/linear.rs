use coord_common::value::{ScalarOrArray, ScalarOrArrayRef};

use crate::error::CoordScaleError;

/// A stateless two-point linear map between a numeric domain interval
/// `[d0, d1]` and a numeric range interval `[r0, r1]`, with its
/// algebraic inverse.
///
/// Degenerate intervals are rejected up front rather than surfacing as
/// NaN or infinity in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearInterpolator {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for LinearInterpolator {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }
}

impl LinearInterpolator {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn with_domain(mut self, domain: (f64, f64)) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Slope of the forward map, checked before any division.
    fn forward_scale(&self) -> Result<f64, CoordScaleError> {
        let (d0, d1) = self.domain;
        if d0 == d1 {
            return Err(CoordScaleError::DegenerateInterval { start: d0, end: d1 });
        }
        Ok((self.range.1 - self.range.0) / (d1 - d0))
    }

    /// Slope of the inverse map, checked before any division.
    fn inverse_scale(&self) -> Result<f64, CoordScaleError> {
        let (r0, r1) = self.range;
        if r0 == r1 {
            return Err(CoordScaleError::DegenerateInterval { start: r0, end: r1 });
        }
        Ok((self.domain.1 - self.domain.0) / (r1 - r0))
    }

    /// Maps `x` from the domain interval to the range interval.
    pub fn forward(&self, x: f64) -> Result<f64, CoordScaleError> {
        let scale = self.forward_scale()?;
        Ok(self.range.0 + (x - self.domain.0) * scale)
    }

    /// Maps `y` from the range interval back to the domain interval.
    pub fn invert(&self, y: f64) -> Result<f64, CoordScaleError> {
        let scale = self.inverse_scale()?;
        Ok(self.domain.0 + (y - self.range.0) * scale)
    }

    /// Vectorized [`forward`](Self::forward); the degenerate-interval
    /// check is hoisted out of the loop.
    pub fn forward_values<'a>(
        &self,
        values: impl Into<ScalarOrArrayRef<'a, f64>>,
    ) -> Result<ScalarOrArray<f64>, CoordScaleError> {
        let scale = self.forward_scale()?;
        let (d0, _) = self.domain;
        let (r0, _) = self.range;
        Ok(values.into().map(|x| r0 + (x - d0) * scale))
    }

    /// Vectorized [`invert`](Self::invert).
    pub fn invert_values<'a>(
        &self,
        values: impl Into<ScalarOrArrayRef<'a, f64>>,
    ) -> Result<ScalarOrArray<f64>, CoordScaleError> {
        let scale = self.inverse_scale()?;
        let (d0, _) = self.domain;
        let (r0, _) = self.range;
        Ok(values.into().map(|y| d0 + (y - r0) * scale))
    }
}
