//! The exam-session state machine.
//!
//! `apply` is a pure function from a snapshot and an action to the next
//! snapshot. It is synchronous and total: malformed answers surface as
//! verdict values from the scoring path, never as panics or errors. Callers
//! own persistence and re-rendering of the returned value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ability::update_theta;
use crate::model::{Response, SessionSnapshot};
use crate::scoring::score;
use crate::selector::select_next;
use crate::time::epoch_ms;

/// Closed action vocabulary for the session state machine.
///
/// `Noop` is the forward-compatible catch-all: unrecognized action payloads
/// deserialize into it and leave the state unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Replace the whole snapshot with a server-provided one. The server is
    /// canonical: no merge happens and any in-flight draft is discarded.
    /// Id matching is the dispatcher's responsibility, not the engine's.
    HydrateFromSnapshot { snapshot: SessionSnapshot },
    /// Replace the draft answer only.
    SetDraftAnswer { value: String },
    /// Score the current item against the draft and record a response.
    /// Does not clear the draft.
    SubmitDraftAnswer,
    /// Auto-submit a non-blank draft, then move the cursor to the next
    /// selected item and clear the draft.
    Advance,
    /// Stamp the heartbeat-attempt timestamp.
    MarkHeartbeatAttempt,
    #[serde(other)]
    Noop,
}

/// Apply one action, producing the next snapshot.
///
/// `now` comes from the caller's clock so transitions stay deterministic
/// under test.
#[must_use]
pub fn apply(snapshot: &SessionSnapshot, action: &Action, now: DateTime<Utc>) -> SessionSnapshot {
    match action {
        Action::HydrateFromSnapshot { snapshot: server } => {
            let mut next = server.clone();
            next.saved_at_ms = epoch_ms(now);
            next
        }
        Action::SetDraftAnswer { value } => {
            let mut next = snapshot.clone();
            next.draft_answer = value.clone();
            next
        }
        Action::SubmitDraftAnswer => submit_draft(snapshot, now),
        Action::Advance => advance(snapshot, now),
        Action::MarkHeartbeatAttempt => {
            let mut next = snapshot.clone();
            next.heartbeat_attempted_at_ms = Some(epoch_ms(now));
            next
        }
        Action::Noop => snapshot.clone(),
    }
}

fn submit_draft(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> SessionSnapshot {
    let (item_id, irt, verdict) = match snapshot.current_item() {
        Some(item) => (
            item.id.clone(),
            item.irt,
            score(item, &snapshot.draft_answer),
        ),
        None => return snapshot.clone(),
    };

    let mut next = snapshot.clone();
    debug_assert!(next.item_exists(&item_id), "cursor resolved to a foreign item");

    if let (Some(correct), Some(params)) = (verdict.as_bool(), irt) {
        if let Some(section) = next.sections.get(next.active_section) {
            let section_id = section.id.clone();
            let theta = next.theta_for(&section_id);
            next.thetas
                .insert(section_id, update_theta(theta, &params, correct));
        }
    }

    next.responses.insert(
        item_id,
        Response::new(next.draft_answer.clone(), now, verdict),
    );
    next
}

fn advance(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> SessionSnapshot {
    let mut next = if snapshot.current_item().is_some() && !snapshot.draft_answer.trim().is_empty()
    {
        submit_draft(snapshot, now)
    } else {
        snapshot.clone()
    };

    let Some(section) = next.sections.get(next.active_section) else {
        return next;
    };

    let theta = next.theta_for(&section.id);
    let answered = next.responded_ids();
    next.active_item = select_next(section, theta, &answered);
    next.draft_answer.clear();
    next
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
