use crate::core::models::instance::CellSpec;
use crate::core::models::item::{ItemCategory, Rotation};
use crate::engine::error::SessionError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::{GlobalEffectModes, PlacementSession};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("Optimizer request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("No items are placed; place items before optimizing")]
    EmptyBoard,

    #[error("Optimized board could not be applied: {0}")]
    Session(#[from] SessionError),
}

/// One placed copy of an item, as sent to the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemCategory,
    pub upgrade_level: u32,
    /// Always `None` for slates.
    pub priority: Option<u8>,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub items: Vec<RequestItem>,
    pub width: usize,
    pub height: usize,
    pub global_effect_modes: GlobalEffectModes,
}

/// A placed copy in an optimizer board. Missing settings fall back to a fresh copy's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCell {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemCategory>,
    #[serde(default)]
    pub upgrade_level: u32,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub rotation: Rotation,
}

impl From<BoardCell> for CellSpec {
    fn from(cell: BoardCell) -> Self {
        CellSpec {
            item_id: cell.id,
            rotation: cell.rotation,
            upgrade_level: cell.upgrade_level,
            priority: cell.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// Rows of cells; `null` marks an empty cell.
    pub board: Vec<Vec<Option<BoardCell>>>,
    pub score: f64,
}

/// Outcome of applying an optimizer board to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    pub placed: usize,
    pub skipped: usize,
    pub returned: usize,
    /// Score claimed by the optimizer, on its own scale.
    pub optimizer_score: f64,
}

/// An external service that computes a full placement from the owned items.
pub trait Optimizer {
    fn optimize(
        &self,
        request: &OptimizeRequest,
    ) -> impl Future<Output = Result<OptimizeResponse, OptimizeError>>;
}

/// Lists the placed copies of a session, in slot order with their current settings.
///
/// Unplaced stock is not sent; the optimizer rearranges what is on the board.
pub fn build_request(session: &PlacementSession) -> OptimizeRequest {
    let grid = session.grid();
    let mut items = Vec::with_capacity(grid.occupied_count());

    for (slot, _, item) in grid.occupied() {
        if !session.catalog().contains(&item.item_id) {
            warn!(slot, item_id = %item.item_id, "Leaving an uncataloged item out of the optimizer request.");
            continue;
        }
        items.push(RequestItem {
            id: item.item_id.clone(),
            kind: item.category(),
            upgrade_level: item.upgrade_level,
            priority: item.priority(),
            rotation: item.rotation(),
        });
    }

    debug!(items = items.len(), "Built optimizer request.");
    OptimizeRequest {
        items,
        width: grid.width(),
        height: grid.height(),
        global_effect_modes: session.global_modes().clone(),
    }
}

/// Flattens an optimizer board into row-major cells for a grid `width` columns wide.
///
/// Every row occupies exactly `width` cells: shorter rows are padded with empty cells and
/// longer rows are cut.
pub fn flatten_board(board: Vec<Vec<Option<BoardCell>>>, width: usize) -> Vec<Option<CellSpec>> {
    let mut cells = Vec::with_capacity(board.len() * width);
    for (y, row) in board.into_iter().enumerate() {
        if row.len() > width {
            warn!(
                row = y,
                cells = row.len(),
                width,
                "Optimizer row is wider than the grid; dropping the overflow."
            );
        }
        let start = cells.len();
        cells.extend(row.into_iter().take(width).map(|cell| cell.map(CellSpec::from)));
        cells.resize(start + width, None);
    }
    cells
}

/// Replaces the session's board with the optimizer's.
///
/// The board is fitted to the live slot count. Either the whole board is applied or the
/// session keeps its previous grid and stock.
///
/// # Errors
///
/// Returns `OptimizeError::Session` if the board uses more copies of an item than the
/// session owns.
pub fn apply_response(
    session: &mut PlacementSession,
    response: OptimizeResponse,
) -> Result<ApplyReport, OptimizeError> {
    let cells = flatten_board(response.board, session.grid().width());
    let summary = session.replace_board(cells)?;

    info!(
        placed = summary.placed,
        skipped = summary.skipped,
        optimizer_score = response.score,
        "Applied optimized board."
    );
    Ok(ApplyReport {
        placed: summary.placed,
        skipped: summary.skipped,
        returned: summary.returned,
        optimizer_score: response.score,
    })
}

/// Sends the session's placed items to `optimizer` and applies the returned board.
///
/// A failed request leaves the session untouched.
///
/// # Errors
///
/// Returns `OptimizeError::EmptyBoard` without contacting the optimizer if nothing is
/// placed.
#[instrument(skip_all, name = "optimize_workflow")]
pub async fn run<O: Optimizer>(
    session: &mut PlacementSession<'_>,
    optimizer: &O,
    reporter: &ProgressReporter<'_>,
) -> Result<ApplyReport, OptimizeError> {
    if session.grid().occupied_count() == 0 {
        warn!("Nothing is placed; skipping the optimizer.");
        return Err(OptimizeError::EmptyBoard);
    }

    reporter.report(Progress::PhaseStart {
        name: "Preparing optimizer request",
    });
    let request = build_request(session);
    reporter.report(Progress::Message(format!(
        "{} items on a {}x{} grid",
        request.items.len(),
        request.width,
        request.height
    )));
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Waiting for optimizer",
    });
    let response = optimizer.optimize(&request).await?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Applying optimized board",
    });
    let report = apply_response(session, response)?;
    reporter.report(Progress::PhaseFinish);

    Ok(report)
}
