#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value that is either a single scalar or a dense array of values.
///
/// Scale entry points accept and return this type so that scalar and
/// vectorized invocations share a single code path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum ScalarOrArray<T: Sync + Clone> {
    Scalar(T),
    Array(Vec<T>),
}

impl<T: Sync + Clone> ScalarOrArray<T> {
    /// Iterate over the contained values, repeating a scalar `scalar_len` times.
    pub fn as_iter(&self, scalar_len: usize) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            ScalarOrArray::Scalar(value) => Box::new(std::iter::repeat(value).take(scalar_len)),
            ScalarOrArray::Array(values) => Box::new(values.iter()),
        }
    }

    /// Materialize the values as a dense vector, repeating a scalar
    /// `scalar_len` times.
    pub fn as_vec(&self, scalar_len: usize) -> Vec<T> {
        self.as_iter(scalar_len).cloned().collect::<Vec<_>>()
    }

    /// Apply `f` element-wise, preserving the scalar/array shape.
    pub fn map<U: Sync + Clone>(&self, f: impl Fn(&T) -> U) -> ScalarOrArray<U> {
        match self {
            ScalarOrArray::Scalar(value) => ScalarOrArray::Scalar(f(value)),
            ScalarOrArray::Array(values) => ScalarOrArray::Array(values.iter().map(f).collect()),
        }
    }

    /// Apply a fallible `f` element-wise, preserving the scalar/array shape.
    ///
    /// Fails on the first erroring element; no partial output is produced.
    pub fn try_map<U: Sync + Clone, E>(
        &self,
        f: impl Fn(&T) -> Result<U, E>,
    ) -> Result<ScalarOrArray<U>, E> {
        match self {
            ScalarOrArray::Scalar(value) => Ok(ScalarOrArray::Scalar(f(value)?)),
            ScalarOrArray::Array(values) => Ok(ScalarOrArray::Array(
                values.iter().map(f).collect::<Result<Vec<_>, E>>()?,
            )),
        }
    }
}

impl<T: Sync + Clone> From<Vec<T>> for ScalarOrArray<T> {
    fn from(values: Vec<T>) -> Self {
        ScalarOrArray::Array(values)
    }
}

impl<T: Sync + Clone> From<T> for ScalarOrArray<T> {
    fn from(value: T) -> Self {
        ScalarOrArray::Scalar(value)
    }
}

/// Borrowing counterpart of [`ScalarOrArray`] used for scale inputs.
#[derive(Debug, Clone)]
pub enum ScalarOrArrayRef<'a, T: Sync + Clone> {
    Scalar(T),
    Array(&'a [T]),
}

impl<'a, T: Sync + Clone> ScalarOrArrayRef<'a, T> {
    /// Apply `f` element-wise, producing an owned [`ScalarOrArray`].
    pub fn map<U: Sync + Clone>(self, f: impl Fn(&T) -> U) -> ScalarOrArray<U> {
        match self {
            ScalarOrArrayRef::Scalar(value) => ScalarOrArray::Scalar(f(&value)),
            ScalarOrArrayRef::Array(values) => ScalarOrArray::Array(values.iter().map(f).collect()),
        }
    }

    /// Apply a fallible `f` element-wise, failing fast on the first error.
    pub fn try_map<U: Sync + Clone, E>(
        self,
        f: impl Fn(&T) -> Result<U, E>,
    ) -> Result<ScalarOrArray<U>, E> {
        match self {
            ScalarOrArrayRef::Scalar(value) => Ok(ScalarOrArray::Scalar(f(&value)?)),
            ScalarOrArrayRef::Array(values) => Ok(ScalarOrArray::Array(
                values.iter().map(f).collect::<Result<Vec<_>, E>>()?,
            )),
        }
    }
}

impl<'a, T: Sync + Clone> From<&'a [T]> for ScalarOrArrayRef<'a, T> {
    fn from(values: &'a [T]) -> Self {
        ScalarOrArrayRef::Array(values)
    }
}

impl<'a, T: Sync + Clone> From<&'a Vec<T>> for ScalarOrArrayRef<'a, T> {
    fn from(values: &'a Vec<T>) -> Self {
        ScalarOrArrayRef::Array(values.as_slice())
    }
}

impl<'a, T: Sync + Clone> From<&'a T> for ScalarOrArrayRef<'a, T> {
    fn from(value: &'a T) -> Self {
        ScalarOrArrayRef::Scalar(value.clone())
    }
}

impl<'a, T: Sync + Clone> From<T> for ScalarOrArrayRef<'a, T> {
    fn from(value: T) -> Self {
        ScalarOrArrayRef::Scalar(value)
    }
}
