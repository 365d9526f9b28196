use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, PoisonError};

use coord_common::value::{ScalarOrArray, ScalarOrArrayRef};
use serde::{Deserialize, Serialize};

use crate::error::CoordScaleError;
use crate::factor::{FactorRange, SharedFactorRange};
use crate::numeric::LinearInterpolator;

/// A raw categorical value: either a bare factor label, or a label
/// paired with a fractional offset from the factor's center.
///
/// Offsets are unconstrained; values beyond ±0.5 place the point inside
/// a neighboring factor's slot, which is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoricalValue<D> {
    Factor(D),
    FactorOffset(D, f64),
}

impl<D> CategoricalValue<D> {
    pub fn factor(&self) -> &D {
        match self {
            CategoricalValue::Factor(label) => label,
            CategoricalValue::FactorOffset(label, _) => label,
        }
    }

    pub fn offset(&self) -> f64 {
        match self {
            CategoricalValue::Factor(_) => 0.0,
            CategoricalValue::FactorOffset(_, offset) => *offset,
        }
    }
}

impl<D> From<D> for CategoricalValue<D> {
    fn from(label: D) -> Self {
        CategoricalValue::Factor(label)
    }
}

impl<D> From<(D, f64)> for CategoricalValue<D> {
    fn from((label, offset): (D, f64)) -> Self {
        CategoricalValue::FactorOffset(label, offset)
    }
}

/// A scale that maps categorical values onto a continuous render-space
/// interval by composing a [`FactorRange`] with a [`LinearInterpolator`].
///
/// The factor range is held behind shared ownership so other consumers
/// may mutate it; the interpolator is rebuilt from live state on every
/// call, so every compute reflects the current factor set and target
/// range. Inversion returns the continuous synthetic coordinate, not a
/// label.
#[derive(Debug, Clone)]
pub struct CategoricalScale<D: Debug + Clone + Hash + Eq + Sync + 'static> {
    source_range: SharedFactorRange<D>,
    target_range: (f64, f64),
}

impl<D: Debug + Clone + Hash + Eq + Sync + 'static> CategoricalScale<D> {
    /// Creates a new categorical scale with the given factors.
    ///
    /// # Defaults
    /// - target range: (0.0, 1.0)
    pub fn try_new(factors: Vec<D>) -> Result<Self, CoordScaleError> {
        Ok(Self {
            source_range: FactorRange::try_new(factors)?.into_shared(),
            target_range: (0.0, 1.0),
        })
    }

    /// Creates a scale over an existing shared factor range, so that
    /// mutations through either handle are observed by both.
    pub fn with_source_range(source_range: SharedFactorRange<D>) -> Self {
        Self {
            source_range,
            target_range: (0.0, 1.0),
        }
    }

    /// Sets the target render-space interval as (start, end).
    pub fn range(mut self, range: (f64, f64)) -> Self {
        self.target_range = range;
        self
    }

    /// Reassigns the target render-space interval in place.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.target_range = range;
    }

    /// Returns the target range as (start, end).
    pub fn get_range(&self) -> (f64, f64) {
        self.target_range
    }

    /// Returns a handle to the shared factor range.
    pub fn source_range(&self) -> SharedFactorRange<D> {
        Arc::clone(&self.source_range)
    }

    /// Replaces the factor set through the shared range.
    ///
    /// Equivalent to writing through [`source_range`](Self::source_range);
    /// fails with `DuplicateFactor` on repeats, leaving the prior set
    /// unchanged.
    pub fn set_factors(&self, factors: Vec<D>) -> Result<(), CoordScaleError> {
        self.source_range
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_factors(factors)
    }

    fn read_source_range(&self) -> std::sync::RwLockReadGuard<'_, FactorRange<D>> {
        self.source_range
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Interpolator from the current synthetic span to the target range.
    fn interpolator(&self, source_range: &FactorRange<D>) -> LinearInterpolator {
        LinearInterpolator::new(source_range.span(), self.target_range)
    }

    fn synthetic(
        source_range: &FactorRange<D>,
        value: &CategoricalValue<D>,
    ) -> Result<f64, CoordScaleError> {
        match value {
            CategoricalValue::Factor(label) => source_range.synthetic_position(label),
            CategoricalValue::FactorOffset(label, offset) => {
                Ok(source_range.synthetic_position(label)? + offset)
            }
        }
    }

    /// Maps a categorical value to its render-space coordinate.
    ///
    /// Fails with `UnknownFactor` for labels absent from the current
    /// factor set (which is every label when the set is empty).
    pub fn compute(&self, value: impl Into<CategoricalValue<D>>) -> Result<f64, CoordScaleError> {
        let value = value.into();
        let source_range = self.read_source_range();
        let synthetic = Self::synthetic(&source_range, &value)?;
        self.interpolator(&source_range).forward(synthetic)
    }

    /// Maps categorical values element-wise, preserving input order.
    ///
    /// Bare labels and offset pairs may be freely mixed. Fails fast on
    /// the first invalid element; no partial results are produced. The
    /// factor range is read once for the whole batch.
    pub fn v_compute<'a>(
        &self,
        values: impl Into<ScalarOrArrayRef<'a, CategoricalValue<D>>>,
    ) -> Result<ScalarOrArray<f64>, CoordScaleError> {
        let source_range = self.read_source_range();
        let interpolator = self.interpolator(&source_range);
        values
            .into()
            .try_map(|value| interpolator.forward(Self::synthetic(&source_range, value)?))
    }

    /// An empty factor set leaves no synthetic span to invert into.
    fn check_span(source_range: &FactorRange<D>) -> Result<(), CoordScaleError> {
        let (start, end) = source_range.span();
        if start == end {
            return Err(CoordScaleError::DegenerateInterval { start, end });
        }
        Ok(())
    }

    /// Maps a render-space coordinate back to a synthetic coordinate.
    ///
    /// Inversion is continuous: it answers "where in factor space does
    /// this coordinate fall", and never recovers a label. Fails with
    /// `DegenerateInterval` when the factor set is empty or the target
    /// range is zero-width.
    pub fn invert(&self, value: f64) -> Result<f64, CoordScaleError> {
        let source_range = self.read_source_range();
        Self::check_span(&source_range)?;
        self.interpolator(&source_range).invert(value)
    }

    /// Element-wise [`invert`](Self::invert), preserving input order.
    pub fn v_invert<'a>(
        &self,
        values: impl Into<ScalarOrArrayRef<'a, f64>>,
    ) -> Result<ScalarOrArray<f64>, CoordScaleError> {
        let source_range = self.read_source_range();
        Self::check_span(&source_range)?;
        self.interpolator(&source_range).invert_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn mkscale() -> CategoricalScale<&'static str> {
        CategoricalScale::try_new(vec!["foo", "bar", "baz"])
            .unwrap()
            .range((20.0, 80.0))
    }

    #[test]
    fn test_compute_maps_factors_evenly() -> Result<(), CoordScaleError> {
        let scale = mkscale();
        assert_approx_eq!(f64, scale.compute("foo")?, 30.0);
        assert_approx_eq!(f64, scale.compute("bar")?, 50.0);
        assert_approx_eq!(f64, scale.compute("baz")?, 70.0);
        Ok(())
    }

    #[test]
    fn test_compute_unknown_factor() {
        let scale = mkscale();
        assert!(matches!(
            scale.compute("quux"),
            Err(CoordScaleError::UnknownFactor(_))
        ));
    }

    #[test]
    fn test_compute_with_offsets() -> Result<(), CoordScaleError> {
        let scale = mkscale();

        assert_approx_eq!(f64, scale.compute(("foo", -0.6))?, 18.0);
        assert_approx_eq!(f64, scale.compute(("foo", -0.5))?, 20.0);
        assert_approx_eq!(f64, scale.compute(("foo", 0.0))?, 30.0);
        assert_approx_eq!(f64, scale.compute(("foo", 0.5))?, 40.0);
        assert_approx_eq!(f64, scale.compute(("foo", 0.6))?, 42.0);

        assert_approx_eq!(f64, scale.compute(("bar", -0.2))?, 46.0);
        assert_approx_eq!(f64, scale.compute(("bar", 0.2))?, 54.0);

        assert_approx_eq!(f64, scale.compute(("baz", -0.1))?, 68.0);
        assert_approx_eq!(f64, scale.compute(("baz", 0.6))?, 82.0);
        Ok(())
    }

    #[test]
    fn test_offset_linearity() -> Result<(), CoordScaleError> {
        let scale = mkscale();
        // unit width for 3 factors over (20, 80)
        let width = 20.0;
        let center = scale.compute("bar")?;

        for offset in [-0.75, -0.5, -0.1, 0.0, 0.25, 0.5, 1.2] {
            assert_approx_eq!(
                f64,
                scale.compute(("bar", offset))?,
                center + offset * width
            );
        }
        Ok(())
    }

    #[test]
    fn test_invert_returns_synthetic_coordinates() -> Result<(), CoordScaleError> {
        let scale = mkscale();

        assert_approx_eq!(f64, scale.invert(20.0)?, 0.0);
        assert_approx_eq!(f64, scale.invert(30.0)?, 0.5);
        assert_approx_eq!(f64, scale.invert(40.0)?, 1.0);
        assert_approx_eq!(f64, scale.invert(50.0)?, 1.5);
        assert_approx_eq!(f64, scale.invert(60.0)?, 2.0);
        assert_approx_eq!(f64, scale.invert(70.0)?, 2.5);
        assert_approx_eq!(f64, scale.invert(80.0)?, 3.0);
        // Outside the target range extrapolates rather than failing
        assert_approx_eq!(f64, scale.invert(18.0)?, -0.1);
        Ok(())
    }

    #[test]
    fn test_invert_of_compute_on_synthetic_coordinates() -> Result<(), CoordScaleError> {
        let scale = mkscale();

        for (value, synthetic) in [
            (CategoricalValue::from("foo"), 0.5),
            (CategoricalValue::from("baz"), 2.5),
            (CategoricalValue::from(("bar", 0.25)), 1.75),
            (CategoricalValue::from(("foo", -0.6)), -0.1),
        ] {
            assert_approx_eq!(f64, scale.invert(scale.compute(value)?)?, synthetic);
        }
        Ok(())
    }

    #[test]
    fn test_factor_replacement_rederives_mappings() -> Result<(), CoordScaleError> {
        let scale = mkscale();
        scale.set_factors(vec!["a", "b", "c", "d"])?;

        assert_approx_eq!(f64, scale.compute("a")?, 27.5);
        assert_approx_eq!(f64, scale.compute("b")?, 42.5);
        assert_approx_eq!(f64, scale.compute("c")?, 57.5);
        assert_approx_eq!(f64, scale.compute("d")?, 72.5);

        assert_approx_eq!(f64, scale.invert(27.5)?, 0.5);
        assert_approx_eq!(f64, scale.invert(80.0)?, 4.0);

        // Old labels no longer resolve
        assert!(matches!(
            scale.compute("foo"),
            Err(CoordScaleError::UnknownFactor(_))
        ));
        Ok(())
    }

    #[test]
    fn test_factor_replacement_through_shared_range() -> Result<(), CoordScaleError> {
        let scale = mkscale();
        let shared = scale.source_range();
        shared
            .write()
            .unwrap()
            .set_factors(vec!["a", "b", "c", "d"])?;

        assert_approx_eq!(f64, scale.compute("d")?, 72.5);
        Ok(())
    }

    #[test]
    fn test_range_reassignment() -> Result<(), CoordScaleError> {
        let mut scale = mkscale();
        scale.set_range((0.0, 30.0));

        assert_approx_eq!(f64, scale.compute("foo")?, 5.0);
        assert_approx_eq!(f64, scale.compute("baz")?, 25.0);
        assert_approx_eq!(f64, scale.invert(30.0)?, 3.0);
        Ok(())
    }

    #[test]
    fn test_v_compute_matches_scalar() -> Result<(), CoordScaleError> {
        let scale = mkscale();
        let values: Vec<CategoricalValue<&str>> = vec![
            "foo".into(),
            ("foo", -0.6).into(),
            "baz".into(),
            ("bar", 0.5).into(),
        ];

        let result = scale.v_compute(&values)?.as_vec(values.len());
        for (value, mapped) in values.iter().zip(result.iter()) {
            assert_approx_eq!(f64, *mapped, scale.compute(value.clone())?);
        }
        Ok(())
    }

    #[test]
    fn test_v_compute_fails_fast_on_unknown_factor() {
        let scale = mkscale();
        let values: Vec<CategoricalValue<&str>> =
            vec!["foo".into(), "quux".into(), "bar".into()];

        assert!(matches!(
            scale.v_compute(&values),
            Err(CoordScaleError::UnknownFactor(_))
        ));
    }

    #[test]
    fn test_v_invert_matches_scalar() -> Result<(), CoordScaleError> {
        let scale = mkscale();
        let rvalues = vec![18.0, 20.0, 26.0, 28.0, 30.0, 32.0, 34.0, 38.0, 40.0, 42.0];

        let result = scale.v_invert(&rvalues)?.as_vec(rvalues.len());
        let expected = [-0.1, 0.0, 0.3, 0.4, 0.5, 0.6, 0.7, 0.9, 1.0, 1.1];
        for (value, synthetic) in result.iter().zip(expected.iter()) {
            assert_approx_eq!(f64, *value, *synthetic);
        }
        Ok(())
    }

    #[test]
    fn test_empty_factor_set_is_degenerate() -> Result<(), CoordScaleError> {
        let scale: CategoricalScale<&str> = CategoricalScale::try_new(vec![])?.range((0.0, 1.0));
        let degenerate = CoordScaleError::DegenerateInterval {
            start: 0.0,
            end: 0.0,
        };

        // No synthetic span to invert into, even though the target
        // range is non-degenerate.
        assert_eq!(scale.invert(0.5), Err(degenerate.clone()));
        assert_eq!(scale.v_invert(&vec![0.0, 0.5]), Err(degenerate));
        // The forward direction fails at label lookup: nothing is in
        // the factor set.
        assert!(matches!(
            scale.compute("a"),
            Err(CoordScaleError::UnknownFactor(_))
        ));
        Ok(())
    }

    #[test]
    fn test_degenerate_target_range() -> Result<(), CoordScaleError> {
        let scale = CategoricalScale::try_new(vec!["a", "b"])?.range((10.0, 10.0));
        // Forward still works (divides by the domain width only)
        assert_approx_eq!(f64, scale.compute("a")?, 10.0);
        assert_eq!(
            scale.invert(10.0),
            Err(CoordScaleError::DegenerateInterval {
                start: 10.0,
                end: 10.0
            })
        );
        Ok(())
    }

    #[test]
    fn test_categorical_value_deserialization() {
        let values: Vec<CategoricalValue<String>> =
            serde_json::from_str(r#"["foo", ["bar", 0.5], "baz"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CategoricalValue::Factor("foo".to_string()),
                CategoricalValue::FactorOffset("bar".to_string(), 0.5),
                CategoricalValue::Factor("baz".to_string()),
            ]
        );
    }
}
