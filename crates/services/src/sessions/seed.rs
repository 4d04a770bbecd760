use chrono::{DateTime, Utc};
use uuid::Uuid;

use exam_core::model::{
    AnswerKey, IrtParams, Item, ItemId, Modality, Section, SectionId, SessionId, SessionSnapshot,
};

/// Fresh random id for a locally seeded practice session.
#[must_use]
pub fn demo_session_id() -> SessionId {
    SessionId::new(format!("demo-{}", Uuid::new_v4()))
}

/// Built-in practice snapshot used when nothing is stored locally.
///
/// Two sections: a quantitative one with adaptive items (expression and
/// numeric keys) and a verbal one that leads with a non-adaptive item.
#[must_use]
pub fn demo_snapshot(session_id: SessionId, created_at: DateTime<Utc>) -> SessionSnapshot {
    let quant = Section::new(
        SectionId::new("sec-1"),
        "Quantitative Reasoning",
        vec![
            Item::new(ItemId::new("q1"), "Expand (x+1)^2", Modality::Quant)
                .with_irt(irt(1.0, 0.0))
                .with_key(AnswerKey::expression("(x+1)^2", vec!["x".into()])),
            Item::new(ItemId::new("q2"), "What is 2+2?", Modality::Quant)
                .with_irt(irt(1.2, 1.0))
                .with_key(numeric(4.0, 0.0)),
            Item::new(ItemId::new("q3"), "Approximate sqrt(80)", Modality::Quant)
                .with_irt(irt(0.8, -1.0))
                .with_key(numeric(8.94, 0.05)),
        ],
    );

    let verbal = Section::new(
        SectionId::new("sec-2"),
        "Verbal Reasoning",
        vec![
            Item::new(
                ItemId::new("v1"),
                "Summarize the passage in one sentence.",
                Modality::Verbal,
            ),
            Item::new(ItemId::new("v2"), "How many vowels in 'exam'?", Modality::Verbal)
                .with_irt(irt(1.0, 0.5))
                .with_key(numeric(2.0, 0.0)),
        ],
    );

    SessionSnapshot::new(session_id, vec![quant, verbal], created_at)
        .with_exam_package("demo-package")
}

fn irt(a: f64, b: f64) -> IrtParams {
    IrtParams::new(a, b).expect("demo discrimination is positive")
}

fn numeric(value: f64, tolerance: f64) -> AnswerKey {
    AnswerKey::numeric(value, tolerance).expect("demo tolerance is non-negative")
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_now;

    #[test]
    fn demo_snapshot_starts_at_first_quant_item() {
        let snapshot = demo_snapshot(SessionId::new("s-1"), fixed_now());
        assert_eq!(snapshot.sections.len(), 2);
        assert_eq!(snapshot.current_item().unwrap().id, ItemId::new("q1"));
        assert_eq!(snapshot.theta_for(&SectionId::new("sec-1")), 0.0);
        assert!(snapshot.responses.is_empty());
    }

    #[test]
    fn demo_session_ids_are_unique() {
        assert_ne!(demo_session_id(), demo_session_id());
    }
}
