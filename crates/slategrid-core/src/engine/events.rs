use crate::core::models::item::Rotation;

/// A successful mutation of a placement session.
///
/// Returned by every mutation primitive and delivered to each registered observer.
#[derive(Debug, Clone, PartialEq)]
pub enum GridChange {
    Placed {
        slot: usize,
        item_id: String,
        displaced: Option<String>,
    },
    Removed {
        slot: usize,
        item_id: String,
    },
    Rotated {
        slot: usize,
        rotation: Rotation,
    },
    Swapped {
        a: usize,
        b: usize,
    },
    Resized {
        from: usize,
        to: usize,
        returned: Vec<String>,
    },
    Replaced(ReplaceSummary),
    InstanceUpdated {
        slot: usize,
    },
    StockChanged {
        item_id: String,
        unplaced: u32,
    },
    GlobalModeChanged {
        item_id: String,
        mode: Option<String>,
    },
    /// Board and stock were emptied and global modes reset to their defaults.
    Cleared {
        removed: usize,
    },
}

/// Counts reported by a full-board replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceSummary {
    /// Cells that received a copy.
    pub placed: usize,
    /// Cells naming items missing from the catalog.
    pub skipped: usize,
    /// Copies taken off the previous board.
    pub returned: usize,
}

pub type ChangeCallback<'a> = Box<dyn Fn(&GridChange) + 'a>;

/// Explicit observer list for session changes.
///
/// While held, changes are queued instead of delivered; a transaction releases them on
/// commit and discards them on rollback so observers never see a change that was undone.
#[derive(Default)]
pub struct ChangeNotifier<'a> {
    observers: Vec<ChangeCallback<'a>>,
    held: Option<Vec<GridChange>>,
}

impl<'a> ChangeNotifier<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: ChangeCallback<'a>) {
        self.observers.push(callback);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub fn notify(&mut self, change: &GridChange) {
        match &mut self.held {
            Some(queue) => queue.push(change.clone()),
            None => {
                for observer in &self.observers {
                    observer(change);
                }
            }
        }
    }

    pub(crate) fn hold(&mut self) -> HoldMark {
        match &self.held {
            Some(queue) => HoldMark::Nested(queue.len()),
            None => {
                self.held = Some(Vec::new());
                HoldMark::Outer
            }
        }
    }

    /// Delivers queued changes once the outermost hold is released.
    pub(crate) fn release(&mut self, mark: HoldMark) {
        if mark != HoldMark::Outer {
            return;
        }
        if let Some(queue) = self.held.take() {
            for change in &queue {
                self.notify(change);
            }
        }
    }

    /// Drops every change queued since `mark` was taken.
    pub(crate) fn discard(&mut self, mark: HoldMark) {
        match mark {
            HoldMark::Outer => self.held = None,
            HoldMark::Nested(len) => {
                if let Some(queue) = &mut self.held {
                    queue.truncate(len);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HoldMark {
    Outer,
    Nested(usize),
}

impl std::fmt::Debug for ChangeNotifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .field("held", &self.held.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn removed(slot: usize) -> GridChange {
        GridChange::Removed {
            slot,
            item_id: "artifact_cup".to_string(),
        }
    }

    #[test]
    fn notify_reaches_every_observer() {
        let seen = RefCell::new(Vec::new());
        let mut notifier = ChangeNotifier::new();
        notifier.subscribe(Box::new(|c: &GridChange| seen.borrow_mut().push(("first", c.clone()))));
        notifier.subscribe(Box::new(|c: &GridChange| seen.borrow_mut().push(("second", c.clone()))));
        notifier.notify(&removed(3));
        drop(notifier);
        let seen = seen.into_inner();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("first", removed(3)));
        assert_eq!(seen[1].0, "second");
    }

    #[test]
    fn held_changes_are_delivered_on_outer_release() {
        let count = RefCell::new(0);
        let mut notifier = ChangeNotifier::new();
        notifier.subscribe(Box::new(|_: &GridChange| *count.borrow_mut() += 1));
        let outer = notifier.hold();
        notifier.notify(&removed(0));
        let inner = notifier.hold();
        assert_eq!(inner, HoldMark::Nested(1));
        notifier.notify(&removed(1));
        notifier.release(inner);
        assert_eq!(*count.borrow(), 0);
        notifier.release(outer);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn discarded_changes_are_never_delivered() {
        let count = RefCell::new(0);
        let mut notifier = ChangeNotifier::new();
        notifier.subscribe(Box::new(|_: &GridChange| *count.borrow_mut() += 1));
        let outer = notifier.hold();
        notifier.notify(&removed(0));
        let inner = notifier.hold();
        notifier.notify(&removed(1));
        notifier.discard(inner);
        notifier.release(outer);
        assert_eq!(*count.borrow(), 1, "only the change before the nested hold survives");

        let again = notifier.hold();
        notifier.notify(&removed(2));
        notifier.discard(again);
        notifier.notify(&removed(3));
        assert_eq!(*count.borrow(), 2);
    }
}
