use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use indexmap::IndexSet;

use crate::error::CoordScaleError;

/// A factor range shared between a scale and any other holders.
///
/// Mutations through one handle are observed by all holders on their
/// next compute call.
pub type SharedFactorRange<D> = Arc<RwLock<FactorRange<D>>>;

/// An ordered, duplicate-free set of category labels ("factors"), each
/// assigned a synthetic numeric coordinate on the line `[0, n]`.
///
/// Factor `i` occupies the unit-width slot `[i, i+1)` and centers at
/// `i + 0.5`. Replacing the factors re-derives every synthetic
/// coordinate; nothing is cached across a replacement.
#[derive(Debug, Clone)]
pub struct FactorRange<D: Debug + Clone + Hash + Eq + Sync + 'static> {
    factors: IndexSet<D>,
    range_padding: f64,
}

impl<D: Debug + Clone + Hash + Eq + Sync + 'static> FactorRange<D> {
    /// Creates a new factor range from an ordered list of labels.
    ///
    /// Fails with `DuplicateFactor` if the list contains repeats.
    pub fn try_new(factors: Vec<D>) -> Result<Self, CoordScaleError> {
        Ok(Self {
            factors: Self::build_set(factors)?,
            range_padding: 0.0,
        })
    }

    fn build_set(labels: Vec<D>) -> Result<IndexSet<D>, CoordScaleError> {
        let mut set = IndexSet::with_capacity(labels.len());
        for label in labels {
            if set.contains(&label) {
                return Err(CoordScaleError::DuplicateFactor(format!("{:?}", label)));
            }
            set.insert(label);
        }
        Ok(set)
    }

    /// Sets the range padding parameter.
    ///
    /// Only `0.0` has defined coordinate semantics; the value is stored
    /// and reported but does not currently alter synthetic positions.
    pub fn with_range_padding(mut self, range_padding: f64) -> Self {
        self.range_padding = range_padding;
        self
    }

    /// Returns the configured range padding.
    pub fn range_padding(&self) -> f64 {
        self.range_padding
    }

    /// Returns the zero-based index of `label`.
    ///
    /// Fails with `UnknownFactor` if the label is absent.
    pub fn index_of(&self, label: &D) -> Result<usize, CoordScaleError> {
        self.factors
            .get_index_of(label)
            .ok_or_else(|| CoordScaleError::UnknownFactor(format!("{:?}", label)))
    }

    /// Returns the synthetic coordinate of `label`: the center of its
    /// unit slot, `index + 0.5`.
    pub fn synthetic_position(&self, label: &D) -> Result<f64, CoordScaleError> {
        Ok(self.index_of(label)? as f64 + 0.5)
    }

    /// Replaces the label sequence in place.
    ///
    /// Fails with `DuplicateFactor` if `factors` contains repeats, in
    /// which case the prior factor set is left unchanged. This is the
    /// only mutation entry point; dependent scales pick up the new
    /// factors on their next compute call.
    pub fn set_factors(&mut self, factors: Vec<D>) -> Result<(), CoordScaleError> {
        // Build the full replacement before swapping so a failure
        // cannot leave a partially replaced set.
        self.factors = Self::build_set(factors)?;
        Ok(())
    }

    /// Returns the labels in order.
    pub fn factors(&self) -> Vec<D> {
        self.factors.iter().cloned().collect()
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// The numeric domain covered by the factor set: `(0, n)`.
    pub fn span(&self) -> (f64, f64) {
        (0.0, self.factors.len() as f64)
    }

    /// Wraps this range for shared ownership between consumers.
    pub fn into_shared(self) -> SharedFactorRange<D> {
        Arc::new(RwLock::new(self))
    }
}
