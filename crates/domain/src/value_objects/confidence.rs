//! Confidence - how sure a suggestion source is about a candidate completion

use crate::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// A confidence value guaranteed to lie within `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Confidence(f32);

impl Confidence {
    /// Confidence assigned to caller-supplied suggestions
    pub const CERTAIN: Confidence = Confidence(1.0);

    /// Create new confidence with validation
    pub fn new(value: f32) -> DomainResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::InvalidConfidence(value));
        }
        Ok(Self(value))
    }

    /// Clamp an untrusted value into range; NaN becomes 0
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Rounded percentage, as shown next to a suggestion
    pub fn as_percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::CERTAIN
    }
}

impl TryFrom<f32> for Confidence {
    type Error = DomainError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f32 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_validation() {
        assert!(Confidence::new(0.5).is_ok());
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(1.1).is_err());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Confidence::clamped(1.7).value(), 1.0);
        assert_eq!(Confidence::clamped(-3.0).value(), 0.0);
        assert_eq!(Confidence::clamped(f32::NAN).value(), 0.0);
        assert_eq!(Confidence::clamped(0.25).value(), 0.25);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Confidence>("0.8").is_ok());
        assert!(serde_json::from_str::<Confidence>("1.8").is_err());
        let json = serde_json::to_string(&Confidence::CERTAIN).unwrap();
        assert_eq!(json, "1.0");
    }

    #[test]
    fn test_percent() {
        assert_eq!(Confidence::clamped(0.876).as_percent(), 88);
    }
}
