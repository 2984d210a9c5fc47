use super::error::SessionError;
use super::session::{GlobalEffectModes, PlacementSession};
use crate::core::models::grid::PlacementGrid;
use crate::core::models::stock::Stock;
use tracing::trace;

/// Copy of the mutable session state taken before a compound mutation.
struct Snapshot {
    grid: PlacementGrid,
    stock: Stock,
    global_modes: GlobalEffectModes,
}

impl<'a> PlacementSession<'a> {
    /// Runs `action` as a single all-or-nothing mutation.
    ///
    /// If `action` fails, the grid, stock and global modes are restored to the state they
    /// had before the call and every change it emitted is dropped. Changes emitted by a
    /// successful action reach observers only after the outermost transaction commits.
    pub(crate) fn transaction<F, R>(&mut self, action: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut Self) -> Result<R, SessionError>,
    {
        // 1. Record the original state.
        let snapshot = Snapshot {
            grid: self.grid.clone(),
            stock: self.stock.clone(),
            global_modes: self.global_modes.clone(),
        };
        let mark = self.notifier.hold();

        // 2. Execute the action.
        match action(self) {
            Ok(result) => {
                self.notifier.release(mark);
                Ok(result)
            }
            // 3. Revert to the original state on failure.
            Err(err) => {
                trace!(error = %err, "Rolling back session transaction.");
                self.grid = snapshot.grid;
                self.stock = snapshot.stock;
                self.global_modes = snapshot.global_modes;
                self.notifier.discard(mark);
                Err(err)
            }
        }
    }
}
