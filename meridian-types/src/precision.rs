//! [`PrecisionModel`] controls how real values are rounded and compared.
//!
//! There are three kinds of models:
//! * **floating** - values are kept as `f64`, equality is checked with a tolerance relative to the magnitude of the
//!   compared values;
//! * **floating single** - values are rounded to `f32` precision, comparison is relative as well;
//! * **fixed** - values are snapped to a grid of `1 / scale` with `floor(v * scale + 0.5) / scale`, and comparison
//!   uses the absolute tolerance of half a grid cell.
//!
//! Every geometric predicate that needs an epsilon (parallel vectors, coincident points, closed rings) asks the
//! model for it through [`PrecisionModel::tolerance`] instead of using a hardcoded constant.

use std::cmp::Ordering;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::MeridianTypesError;
use crate::vector::CoordinateVector;

const DOUBLE_SIGNIFICANT_DIGITS: u32 = 16;
const SINGLE_SIGNIFICANT_DIGITS: u32 = 6;
const DOUBLE_MAX_PRECISE_VALUE: f64 = 9_007_199_254_740_992.0;
const SINGLE_MAX_PRECISE_VALUE: f64 = 16_777_216.0;

lazy_static! {
    static ref DEFAULT_MODEL: Arc<PrecisionModel> = Arc::new(PrecisionModel::floating());
}

/// Kind of a precision model together with its parameters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecisionModelType {
    /// Double precision floating point values.
    Floating,
    /// Single precision floating point values.
    FloatingSingle,
    /// Fixed precision with the given number of grid cells per unit.
    Fixed {
        /// Number of grid cells per unit. Must be positive.
        scale: f64,
    },
}

/// Rounding and tolerance policy applied to coordinates and scalars.
///
/// The model is immutable after construction and is usually shared between a factory and all the geometries it
/// creates through an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PrecisionModelType", into = "PrecisionModelType")]
pub struct PrecisionModel {
    model_type: PrecisionModelType,
    significant_digits: u32,
    base_tolerance: f64,
}

impl PrecisionModel {
    /// Creates a double precision floating model.
    pub fn floating() -> Self {
        Self {
            model_type: PrecisionModelType::Floating,
            significant_digits: DOUBLE_SIGNIFICANT_DIGITS,
            base_tolerance: relative_tolerance(DOUBLE_SIGNIFICANT_DIGITS),
        }
    }

    /// Creates a single precision floating model.
    pub fn floating_single() -> Self {
        Self {
            model_type: PrecisionModelType::FloatingSingle,
            significant_digits: SINGLE_SIGNIFICANT_DIGITS,
            base_tolerance: relative_tolerance(SINGLE_SIGNIFICANT_DIGITS),
        }
    }

    /// Creates a fixed precision model with `scale` grid cells per unit.
    ///
    /// Returns an error if `scale` is not strictly positive (this includes `NaN`).
    pub fn fixed(scale: f64) -> Result<Self, MeridianTypesError> {
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(MeridianTypesError::InvalidScale(scale));
        }

        let digits = 1.0 + scale.log10().ceil();
        Ok(Self {
            model_type: PrecisionModelType::Fixed { scale },
            significant_digits: digits.max(0.0) as u32,
            base_tolerance: 0.5 / scale,
        })
    }

    /// Creates a model of the given type.
    pub fn new(model_type: PrecisionModelType) -> Result<Self, MeridianTypesError> {
        match model_type {
            PrecisionModelType::Floating => Ok(Self::floating()),
            PrecisionModelType::FloatingSingle => Ok(Self::floating_single()),
            PrecisionModelType::Fixed { scale } => Self::fixed(scale),
        }
    }

    /// Process-wide default model (double precision floating), created on first use.
    pub fn shared_default() -> Arc<PrecisionModel> {
        DEFAULT_MODEL.clone()
    }

    /// Type of the model.
    pub fn model_type(&self) -> PrecisionModelType {
        self.model_type
    }

    /// Scale of a fixed model, `None` for floating models.
    pub fn scale(&self) -> Option<f64> {
        match self.model_type {
            PrecisionModelType::Fixed { scale } => Some(scale),
            _ => None,
        }
    }

    /// Returns true for fixed models.
    pub fn is_fixed(&self) -> bool {
        matches!(self.model_type, PrecisionModelType::Fixed { .. })
    }

    /// Maximum number of significant decimal digits the model can represent.
    pub fn maximum_significant_digits(&self) -> u32 {
        self.significant_digits
    }

    /// Largest magnitude up to which every integer value is represented exactly.
    pub fn maximum_precise_value(&self) -> f64 {
        match self.model_type {
            PrecisionModelType::Floating => DOUBLE_MAX_PRECISE_VALUE,
            PrecisionModelType::FloatingSingle => SINGLE_MAX_PRECISE_VALUE,
            PrecisionModelType::Fixed { scale } => DOUBLE_MAX_PRECISE_VALUE / scale,
        }
    }

    /// Smallest distinguishable step of the model around `1.0`.
    pub fn epsilon(&self) -> f64 {
        match self.model_type {
            PrecisionModelType::Floating => f64::EPSILON,
            PrecisionModelType::FloatingSingle => f32::EPSILON as f64,
            PrecisionModelType::Fixed { scale } => 1.0 / scale,
        }
    }

    /// Rounds a scalar.
    ///
    /// `NaN` and infinite values pass through unchanged.
    pub fn make_precise_value(&self, value: f64) -> f64 {
        match self.model_type {
            PrecisionModelType::Floating => value,
            PrecisionModelType::FloatingSingle => value as f32 as f64,
            PrecisionModelType::Fixed { scale } => {
                if !value.is_finite() {
                    return value;
                }

                (value * scale + 0.5).floor() / scale
            }
        }
    }

    /// Rounds a scalar, coordinate or vector according to the model type.
    pub fn make_precise<T: Precise>(&self, value: T) -> T {
        value.map_components(|v| self.make_precise_value(v))
    }

    /// Checks whether two values are equal within the tolerance of the model.
    ///
    /// Exactly equal values are always equal. Otherwise values containing `NaN` or an infinity are never equal.
    pub fn are_equal<T: Precise>(&self, a: T, b: T) -> bool {
        if a == b {
            return true;
        }

        if !a.magnitude().is_finite() || !b.magnitude().is_finite() {
            return false;
        }

        a.max_deviation(&b) <= self.tolerance(&[a, b])
    }

    /// Effective tolerance for comparing the given values.
    ///
    /// For floating models this is the largest magnitude among `values` multiplied by the base tolerance. For
    /// fixed models it is always half the grid cell size.
    pub fn tolerance<T: Precise>(&self, values: &[T]) -> f64 {
        if self.is_fixed() {
            return self.base_tolerance;
        }

        let magnitude = values
            .iter()
            .map(Precise::magnitude)
            .fold(0.0, |acc: f64, v| if v > acc { v } else { acc });
        magnitude * self.base_tolerance
    }

    /// Orders models by the number of significant digits.
    pub fn compare_precision(&self, other: &PrecisionModel) -> Ordering {
        self.significant_digits.cmp(&other.significant_digits)
    }

    /// Returns true if this model keeps more significant digits than `other`.
    pub fn is_more_precise_than(&self, other: &PrecisionModel) -> bool {
        self.compare_precision(other) == Ordering::Greater
    }

    /// Least precise model among `models`. On ties the first one wins.
    pub fn least_precise<'a>(
        models: impl IntoIterator<Item = &'a PrecisionModel>,
    ) -> Option<&'a PrecisionModel> {
        models.into_iter().fold(None, |selected, model| match selected {
            Some(current) if model.compare_precision(current) != Ordering::Less => Some(current),
            _ => Some(model),
        })
    }

    /// Most precise model among `models`. On ties the first one wins.
    pub fn most_precise<'a>(
        models: impl IntoIterator<Item = &'a PrecisionModel>,
    ) -> Option<&'a PrecisionModel> {
        models.into_iter().fold(None, |selected, model| match selected {
            Some(current) if model.compare_precision(current) != Ordering::Greater => {
                Some(current)
            }
            _ => Some(model),
        })
    }
}

impl Default for PrecisionModel {
    fn default() -> Self {
        Self::floating()
    }
}

impl TryFrom<PrecisionModelType> for PrecisionModel {
    type Error = MeridianTypesError;

    fn try_from(value: PrecisionModelType) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrecisionModel> for PrecisionModelType {
    fn from(value: PrecisionModel) -> Self {
        value.model_type
    }
}

fn relative_tolerance(significant_digits: u32) -> f64 {
    10f64.powi(1 - significant_digits as i32)
}

/// Values that a [`PrecisionModel`] can round and compare.
pub trait Precise: Copy + PartialEq {
    /// Applies `f` to every numeric component.
    fn map_components(self, f: impl Fn(f64) -> f64) -> Self;

    /// Largest absolute component.
    fn magnitude(&self) -> f64;

    /// Largest absolute difference between corresponding components.
    fn max_deviation(&self, other: &Self) -> f64;
}

impl Precise for f64 {
    fn map_components(self, f: impl Fn(f64) -> f64) -> Self {
        f(self)
    }

    fn magnitude(&self) -> f64 {
        self.abs()
    }

    fn max_deviation(&self, other: &Self) -> f64 {
        (self - other).abs()
    }
}

impl Precise for Coordinate {
    fn map_components(self, f: impl Fn(f64) -> f64) -> Self {
        Coordinate::new(f(self.x()), f(self.y()), f(self.z()))
    }

    fn magnitude(&self) -> f64 {
        max3(self.x().abs(), self.y().abs(), self.z().abs())
    }

    fn max_deviation(&self, other: &Self) -> f64 {
        max3(
            (self.x() - other.x()).abs(),
            (self.y() - other.y()).abs(),
            (self.z() - other.z()).abs(),
        )
    }
}

impl Precise for CoordinateVector {
    fn map_components(self, f: impl Fn(f64) -> f64) -> Self {
        CoordinateVector::new(f(self.x()), f(self.y()), f(self.z()))
    }

    fn magnitude(&self) -> f64 {
        max3(self.x().abs(), self.y().abs(), self.z().abs())
    }

    fn max_deviation(&self, other: &Self) -> f64 {
        max3(
            (self.x() - other.x()).abs(),
            (self.y() - other.y()).abs(),
            (self.z() - other.z()).abs(),
        )
    }
}

// NaN-propagating maximum.
fn max3(a: f64, b: f64, c: f64) -> f64 {
    if a.is_nan() || b.is_nan() || c.is_nan() {
        return f64::NAN;
    }

    a.max(b).max(c)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn fixed_model_rounds_half_up() {
        let model = PrecisionModel::fixed(100.0).unwrap();
        assert_eq!(
            model.make_precise(1.005),
            (1.005f64 * 100.0 + 0.5).floor() / 100.0
        );
        assert_eq!(model.make_precise(1.234), 1.23);
        assert_eq!(model.make_precise(-1.236), -1.24);

        let model = PrecisionModel::fixed(1.0).unwrap();
        assert_eq!(model.make_precise(2.5), 3.0);
        assert_eq!(model.make_precise(-2.5), -2.0);
    }

    #[test]
    fn fixed_model_requires_positive_scale() {
        assert_matches!(
            PrecisionModel::fixed(0.0),
            Err(MeridianTypesError::InvalidScale(_))
        );
        assert_matches!(
            PrecisionModel::fixed(-10.0),
            Err(MeridianTypesError::InvalidScale(_))
        );
        assert!(PrecisionModel::fixed(f64::NAN).is_err());
    }

    #[test]
    fn make_precise_is_idempotent() {
        let models = [
            PrecisionModel::floating(),
            PrecisionModel::floating_single(),
            PrecisionModel::fixed(1000.0).unwrap(),
            PrecisionModel::fixed(3.0).unwrap(),
        ];
        let values = [0.0, 1.0, -1.0, 0.1, 1.0 / 3.0, 12345.6789, -98765.4321, 1e-9];

        for model in &models {
            for value in values {
                let once = model.make_precise(value);
                assert_eq!(model.make_precise(once), once, "{model:?} {value}");
            }
        }
    }

    #[test]
    fn nan_passes_through() {
        let model = PrecisionModel::fixed(10.0).unwrap();
        assert!(model.make_precise(f64::NAN).is_nan());
        assert!(PrecisionModel::floating_single()
            .make_precise(f64::NAN)
            .is_nan());
        assert!(!model.make_precise(Coordinate::UNDEFINED).is_valid());
    }

    #[test]
    fn single_model_rounds_to_f32() {
        let model = PrecisionModel::floating_single();
        assert_eq!(model.make_precise(0.1), 0.1f32 as f64);
        assert_ne!(model.make_precise(0.1), 0.1);
    }

    #[test]
    fn relative_equality() {
        let model = PrecisionModel::floating();
        assert!(model.are_equal(0.1 + 0.2, 0.3));
        assert!(!model.are_equal(1.0, 1.0001));
        assert!(model.are_equal(1e20, 1e20 + 1000.0));
        assert!(!model.are_equal(f64::NAN, f64::NAN));
        assert!(model.are_equal(f64::INFINITY, f64::INFINITY));

        let model = PrecisionModel::floating_single();
        assert!(model.are_equal(1.0, 1.000001));
        assert!(!model.are_equal(1.0, 1.001));

        for model in [
            PrecisionModel::floating(),
            PrecisionModel::floating_single(),
            PrecisionModel::fixed(10.0).unwrap(),
        ] {
            assert!(model.are_equal(f64::INFINITY, f64::INFINITY));
            assert!(!model.are_equal(f64::INFINITY, 1.0));
            assert!(!model.are_equal(1.0, f64::NEG_INFINITY));
            assert!(!model.are_equal(f64::INFINITY, f64::NEG_INFINITY));
            assert!(!model.are_equal(
                Coordinate::new(f64::INFINITY, 0.0, 0.0),
                Coordinate::new(1.0, 0.0, 0.0)
            ));
        }
    }

    #[test]
    fn fixed_equality_is_absolute() {
        let model = PrecisionModel::fixed(10.0).unwrap();
        assert!(model.are_equal(1000.0, 1000.04));
        assert!(model.are_equal(0.0, 0.05));
        assert!(!model.are_equal(0.0, 0.06));
        assert_eq!(model.tolerance(&[1e9, 2.0]), 0.05);
    }

    #[test]
    fn equality_is_symmetric() {
        let models = [
            PrecisionModel::floating(),
            PrecisionModel::floating_single(),
            PrecisionModel::fixed(10.0).unwrap(),
        ];
        let values = [0.0, 0.05, 0.3, 0.1 + 0.2, 1.0, 1.000001, -4.0, 1e12, f64::NAN];

        for model in &models {
            for a in values {
                for b in values {
                    assert_eq!(model.are_equal(a, b), model.are_equal(b, a));
                }
            }
        }
    }

    #[test]
    fn coordinate_equality_uses_largest_component() {
        let model = PrecisionModel::floating();
        let a = Coordinate::new(1000.0, 0.0, 0.0);
        let b = Coordinate::new(1000.0, 1e-14, 0.0);
        assert!(model.are_equal(a, b));
        assert!(!model.are_equal(a, Coordinate::new(1000.0, 1e-9, 0.0)));
    }

    #[test]
    fn tolerance_scales_with_magnitude() {
        let model = PrecisionModel::floating();
        approx::assert_relative_eq!(model.tolerance(&[-10.0, 2.0]), 1e-14);
        assert_eq!(model.tolerance::<f64>(&[]), 0.0);
    }

    #[test]
    fn model_properties() {
        let model = PrecisionModel::fixed(100.0).unwrap();
        assert_eq!(model.maximum_significant_digits(), 3);
        assert_eq!(model.scale(), Some(100.0));
        assert_eq!(model.epsilon(), 0.01);
        assert_eq!(PrecisionModel::floating().maximum_significant_digits(), 16);
        assert_eq!(PrecisionModel::floating().scale(), None);
        assert_eq!(
            PrecisionModel::floating_single().maximum_precise_value(),
            16_777_216.0
        );
    }

    #[test]
    fn least_and_most_precise() {
        let double = PrecisionModel::floating();
        let single = PrecisionModel::floating_single();
        let fixed = PrecisionModel::fixed(1000.0).unwrap();

        let models = [single.clone(), double.clone(), fixed.clone()];
        assert_eq!(PrecisionModel::least_precise(&models), Some(&fixed));
        assert_eq!(PrecisionModel::most_precise(&models), Some(&double));
        assert!(double.is_more_precise_than(&single));
        assert_eq!(PrecisionModel::most_precise(std::iter::empty()), None);
    }

    #[test]
    fn ties_keep_first_model() {
        // Both have 6 significant digits.
        let single = PrecisionModel::floating_single();
        let fixed = PrecisionModel::fixed(100_000.0).unwrap();
        assert_eq!(fixed.maximum_significant_digits(), 6);

        let models = [fixed.clone(), single.clone()];
        assert_eq!(PrecisionModel::least_precise(&models), Some(&fixed));
        assert_eq!(PrecisionModel::most_precise(&models), Some(&fixed));

        let models = [single.clone(), fixed];
        assert_eq!(PrecisionModel::least_precise(&models), Some(&single));
        assert_eq!(PrecisionModel::most_precise(&models), Some(&single));
    }

    #[test]
    fn shared_default_is_singleton() {
        let a = PrecisionModel::shared_default();
        let b = PrecisionModel::shared_default();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, PrecisionModel::floating());
    }

    #[test]
    fn deserialization_validates_scale() {
        let model: PrecisionModel =
            serde_json::from_str(r#"{"type":"fixed","scale":100.0}"#).unwrap();
        assert_eq!(model, PrecisionModel::fixed(100.0).unwrap());

        let model: PrecisionModel = serde_json::from_str(r#"{"type":"floating_single"}"#).unwrap();
        assert_eq!(model, PrecisionModel::floating_single());

        assert!(serde_json::from_str::<PrecisionModel>(r#"{"type":"fixed","scale":0.0}"#).is_err());

        let json = serde_json::to_string(&PrecisionModel::floating()).unwrap();
        assert_eq!(json, r#"{"type":"floating"}"#);
    }
}
