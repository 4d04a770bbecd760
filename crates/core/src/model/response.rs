use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

/// Correctness verdict for a submitted answer.
///
/// `Indeterminate` covers the cases scoring cannot decide: a missing answer
/// key or a blank numeric answer. Indeterminate responses never move the
/// ability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    Indeterminate,
}

impl Verdict {
    #[must_use]
    pub fn from_bool(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }

    /// Boolean view of the verdict; `None` for indeterminate.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Verdict::Correct => Some(true),
            Verdict::Incorrect => Some(false),
            Verdict::Indeterminate => None,
        }
    }

}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

/// Record of one submitted answer for an item.
///
/// Written once per submission; re-submission for the same item overwrites
/// the prior response. No history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    pub recorded_at: DateTime<Utc>,
    pub verdict: Verdict,
}

impl Response {
    #[must_use]
    pub fn new(answer: impl Into<String>, recorded_at: DateTime<Utc>, verdict: Verdict) -> Self {
        Self {
            answer: answer.into(),
            recorded_at,
            verdict,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn verdict_bool_views() {
        assert_eq!(Verdict::Correct.as_bool(), Some(true));
        assert_eq!(Verdict::Incorrect.as_bool(), Some(false));
        assert_eq!(Verdict::Indeterminate.as_bool(), None);
    }

    #[test]
    fn verdict_from_bool_round_trips() {
        assert_eq!(Verdict::from_bool(true), Verdict::Correct);
        assert_eq!(Verdict::from_bool(false), Verdict::Incorrect);
    }

    #[test]
    fn response_serde_uses_iso_timestamps() {
        let response = Response::new("10.4", fixed_now(), Verdict::Correct);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("2023-11-14T22:13:20Z"));
        let back: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
    }
}
