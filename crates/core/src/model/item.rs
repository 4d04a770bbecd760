use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while validating item parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemError {
    #[error("discrimination must be positive, got {provided}")]
    InvalidDiscrimination { provided: f64 },

    #[error("pseudo-guessing must be in [0, 1), got {provided}")]
    InvalidGuessing { provided: f64 },

    #[error("tolerance must be non-negative, got {provided}")]
    InvalidTolerance { provided: f64 },
}

//
// ─── MODALITY ──────────────────────────────────────────────────────────────────
//

/// Fixed set of skill modalities an item can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Verbal,
    Quant,
    Reading,
    Listening,
    Speaking,
    Writing,
}

//
// ─── IRT PARAMETERS ────────────────────────────────────────────────────────────
//

/// Item-Response-Theory parameters for an adaptive item.
///
/// * `a` - discrimination, strictly positive
/// * `b` - difficulty on the theta scale
/// * `c` - optional pseudo-guessing floor in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrtParams {
    pub a: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

impl IrtParams {
    /// Create validated two-parameter IRT values.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::InvalidDiscrimination` if `a` is not strictly positive.
    pub fn new(a: f64, b: f64) -> Result<Self, ItemError> {
        if !a.is_finite() || a <= 0.0 {
            return Err(ItemError::InvalidDiscrimination { provided: a });
        }
        Ok(Self { a, b, c: None })
    }

    /// Add a pseudo-guessing floor, making this a three-parameter item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::InvalidGuessing` if `c` is outside `[0, 1)`.
    pub fn with_guessing(mut self, c: f64) -> Result<Self, ItemError> {
        if !c.is_finite() || !(0.0..1.0).contains(&c) {
            return Err(ItemError::InvalidGuessing { provided: c });
        }
        self.c = Some(c);
        Ok(self)
    }

    /// Effective guessing parameter, defaulting to 0 when absent.
    #[must_use]
    pub fn guessing(&self) -> f64 {
        self.c.unwrap_or(0.0)
    }
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// Answer key attached to a scorable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerKey {
    /// Exact value with an absolute tolerance band.
    Numeric {
        value: f64,
        #[serde(default)]
        tolerance: f64,
    },
    /// Algebraic expression compared by sampled equivalence.
    Expression {
        value: String,
        #[serde(default)]
        variables: Vec<String>,
    },
}

impl AnswerKey {
    /// Numeric key with validated tolerance.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::InvalidTolerance` if `tolerance` is negative or non-finite.
    pub fn numeric(value: f64, tolerance: f64) -> Result<Self, ItemError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ItemError::InvalidTolerance {
                provided: tolerance,
            });
        }
        Ok(Self::Numeric { value, tolerance })
    }

    /// Expression key over the given variable names.
    #[must_use]
    pub fn expression(value: impl Into<String>, variables: Vec<String>) -> Self {
        Self::Expression {
            value: value.into(),
            variables,
        }
    }
}

//
// ─── ITEM ──────────────────────────────────────────────────────────────────────
//

/// One administrable exam item.
///
/// Items are immutable once part of a section; they are authored externally
/// or demo-generated. IRT parameters and answer keys are both optional:
/// an item without IRT parameters never moves the ability estimate, and an
/// item without a key scores as indeterminate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub prompt: String,
    pub modality: Modality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irt: Option<IrtParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<AnswerKey>,
    /// Variable names for expression answers when the key itself carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, prompt: impl Into<String>, modality: Modality) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            modality,
            irt: None,
            key: None,
            variables: None,
        }
    }

    #[must_use]
    pub fn with_irt(mut self, irt: IrtParams) -> Self {
        self.irt = Some(irt);
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: AnswerKey) -> Self {
        self.key = Some(key);
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Vec<String>) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Whether this item participates in adaptive selection and theta updates.
    #[must_use]
    pub fn has_irt(&self) -> bool {
        self.irt.is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irt_rejects_non_positive_discrimination() {
        let err = IrtParams::new(0.0, 1.0).unwrap_err();
        assert!(matches!(err, ItemError::InvalidDiscrimination { .. }));
        assert!(IrtParams::new(-1.0, 1.0).is_err());
    }

    #[test]
    fn irt_guessing_bounds() {
        let params = IrtParams::new(1.0, 0.0).unwrap();
        assert!(params.with_guessing(1.0).is_err());
        assert!(params.with_guessing(-0.1).is_err());
        let ok = params.with_guessing(0.25).unwrap();
        assert_eq!(ok.guessing(), 0.25);
    }

    #[test]
    fn guessing_defaults_to_zero() {
        let params = IrtParams::new(1.2, -0.5).unwrap();
        assert_eq!(params.guessing(), 0.0);
    }

    #[test]
    fn numeric_key_rejects_negative_tolerance() {
        let err = AnswerKey::numeric(10.0, -1.0).unwrap_err();
        assert!(matches!(err, ItemError::InvalidTolerance { .. }));
    }

    #[test]
    fn answer_key_serde_is_tagged() {
        let key = AnswerKey::numeric(10.0, 0.5).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.contains("\"kind\":\"numeric\""));
        let back: AnswerKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn numeric_key_tolerance_defaults_to_zero() {
        let key: AnswerKey = serde_json::from_str(r#"{"kind":"numeric","value":4.0}"#).unwrap();
        assert_eq!(key, AnswerKey::Numeric { value: 4.0, tolerance: 0.0 });
    }

    #[test]
    fn item_builder_round_trips() {
        let item = Item::new(ItemId::new("q1"), "Expand (x+1)^2", Modality::Quant)
            .with_irt(IrtParams::new(1.0, 0.0).unwrap())
            .with_key(AnswerKey::expression("(x+1)^2", vec!["x".into()]));

        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
        assert!(back.has_irt());
    }
}
