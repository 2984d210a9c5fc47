use crate::engine::scoring::{Evaluation, Scorer};
use crate::engine::session::PlacementSession;
use tracing::{debug, instrument};

/// Scores the current placement of a session.
///
/// Buffs are propagated from scratch on every call; nothing derived is cached on the
/// session.
#[instrument(skip_all, name = "evaluate_workflow", fields(slots = session.slot_count()))]
pub fn run(session: &PlacementSession) -> Evaluation {
    let scorer = Scorer::new(
        session.grid(),
        session.catalog(),
        session.config().max_possible_score,
    );
    let evaluation = scorer.score(session.global_modes());
    debug!(
        score = evaluation.score,
        raw_total = evaluation.raw_total,
        violations = evaluation.violations().count(),
        "Evaluated placement."
    );
    evaluation
}
