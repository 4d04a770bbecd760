//! Next-item selection within a section.

use std::collections::BTreeSet;

use crate::model::{ItemId, Section};

/// Choose the index of the next item to administer.
///
/// Scans items in section order, skipping answered ones:
/// - the first unanswered item without IRT parameters wins immediately
///   (non-adaptive items take priority when present);
/// - otherwise the unanswered item whose difficulty `b` is nearest to
///   `theta` wins, ties going to the earliest item (strict `<` on the
///   running best keeps the first).
///
/// When every item is answered the selector falls back to index 0; it does
/// not signal exhaustion, so callers must check section completion
/// separately before trusting the result.
#[must_use]
pub fn select_next(section: &Section, theta: f64, answered: &BTreeSet<ItemId>) -> usize {
    let mut best: Option<(usize, f64)> = None;

    for (index, item) in section.items.iter().enumerate() {
        if answered.contains(&item.id) {
            continue;
        }
        let Some(params) = item.irt else {
            return index;
        };
        let distance = (params.b - theta).abs();
        match best {
            Some((_, best_distance)) if distance < best_distance => {
                best = Some((index, distance));
            }
            None => best = Some((index, distance)),
            Some(_) => {}
        }
    }

    best.map_or(0, |(index, _)| index)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
