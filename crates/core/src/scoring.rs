//! Scores a raw answer string against an item's answer key.

use crate::algebra::equivalent;
use crate::model::{AnswerKey, Item, Verdict};

const DEFAULT_VARIABLE: &str = "x";

/// Score `raw_answer` against the item's key.
///
/// - No key: `Indeterminate` (cannot score).
/// - Numeric key: blank answer is `Indeterminate`; an unparseable answer is
///   `Incorrect`; otherwise correct iff within the tolerance band.
/// - Expression key: variables come from the key, falling back to the item's
///   own `variables`, falling back to `["x"]`. Parse failures fold into
///   `Incorrect`; scoring never reports indeterminate for an expression key.
#[must_use]
pub fn score(item: &Item, raw_answer: &str) -> Verdict {
    let Some(key) = &item.key else {
        return Verdict::Indeterminate;
    };

    match key {
        AnswerKey::Numeric { value, tolerance } => {
            let trimmed = raw_answer.trim();
            if trimmed.is_empty() {
                return Verdict::Indeterminate;
            }
            match trimmed.parse::<f64>() {
                Ok(parsed) => Verdict::from_bool((parsed - value).abs() <= *tolerance),
                Err(_) => Verdict::Incorrect,
            }
        }
        AnswerKey::Expression { value, variables } => {
            let fallback;
            let vars: &[String] = if !variables.is_empty() {
                variables
            } else if let Some(own) = item.variables.as_ref().filter(|v| !v.is_empty()) {
                own
            } else {
                fallback = vec![DEFAULT_VARIABLE.to_string()];
                &fallback
            };
            Verdict::from_bool(equivalent(value, raw_answer, vars))
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemId, Modality};

    fn numeric_item(value: f64, tolerance: f64) -> Item {
        Item::new(ItemId::new("q1"), "Q", Modality::Quant)
            .with_key(AnswerKey::numeric(value, tolerance).unwrap())
    }

    #[test]
    fn no_key_is_indeterminate() {
        let item = Item::new(ItemId::new("q1"), "Q", Modality::Verbal);
        assert_eq!(score(&item, "anything"), Verdict::Indeterminate);
    }

    #[test]
    fn numeric_tolerance_band() {
        let item = numeric_item(10.0, 0.5);
        assert_eq!(score(&item, "10.4"), Verdict::Correct);
        assert_eq!(score(&item, "10.6"), Verdict::Incorrect);
        assert_eq!(score(&item, "  10.5 "), Verdict::Correct);
    }

    #[test]
    fn blank_numeric_answer_is_indeterminate() {
        let item = numeric_item(10.0, 0.5);
        assert_eq!(score(&item, ""), Verdict::Indeterminate);
        assert_eq!(score(&item, "   "), Verdict::Indeterminate);
    }

    #[test]
    fn unparseable_numeric_answer_is_incorrect() {
        let item = numeric_item(10.0, 0.5);
        assert_eq!(score(&item, "ten"), Verdict::Incorrect);
    }

    #[test]
    fn zero_tolerance_requires_exact_value() {
        let item = numeric_item(4.0, 0.0);
        assert_eq!(score(&item, "4"), Verdict::Correct);
        assert_eq!(score(&item, "4.000001"), Verdict::Incorrect);
    }

    #[test]
    fn expression_key_uses_equivalence() {
        let item = Item::new(ItemId::new("q1"), "Q", Modality::Quant)
            .with_key(AnswerKey::expression("(x+1)^2", vec!["x".into()]));
        assert_eq!(score(&item, "x^2 + 2*x + 1"), Verdict::Correct);
        assert_eq!(score(&item, "x^2 + 1"), Verdict::Incorrect);
    }

    #[test]
    fn expression_parse_failure_folds_into_incorrect() {
        let item = Item::new(ItemId::new("q1"), "Q", Modality::Quant)
            .with_key(AnswerKey::expression("x+1", vec!["x".into()]));
        assert_eq!(score(&item, "x&1"), Verdict::Incorrect);
        assert_eq!(score(&item, ""), Verdict::Incorrect);
    }

    #[test]
    fn expression_variables_fall_back_to_item_then_x() {
        let via_item = Item::new(ItemId::new("q1"), "Q", Modality::Quant)
            .with_key(AnswerKey::expression("n*2", Vec::new()))
            .with_variables(vec!["n".into()]);
        assert_eq!(score(&via_item, "n+n"), Verdict::Correct);

        let via_default = Item::new(ItemId::new("q2"), "Q", Modality::Quant)
            .with_key(AnswerKey::expression("x*2", Vec::new()));
        assert_eq!(score(&via_default, "x+x"), Verdict::Correct);
    }
}
