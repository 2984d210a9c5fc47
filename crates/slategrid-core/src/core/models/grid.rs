use super::ids::InstanceId;
use super::instance::PlacedItem;
use slotmap::SlotMap;

/// A fixed-width grid of inventory slots, each empty or holding one placed item.
///
/// Slots are stored in row-major order (`index = y * width + x`). The height is derived from
/// the slot count, so the last row may be partial. Placed instances live in a slot map so
/// that each copy keeps a stable identifier while it moves between slots.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    /// Number of columns; fixed for the lifetime of the grid.
    width: usize,
    /// Slot contents in row-major order.
    slots: Vec<Option<InstanceId>>,
    /// Primary storage for placed instances.
    instances: SlotMap<InstanceId, PlacedItem>,
}

impl PlacementGrid {
    /// Creates an empty grid.
    ///
    /// # Arguments
    ///
    /// * `width` - Number of columns; values below 1 are raised to 1.
    /// * `slot_count` - Total number of slots.
    pub fn new(width: usize, slot_count: usize) -> Self {
        Self {
            width: width.max(1),
            slots: vec![None; slot_count],
            instances: SlotMap::with_key(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of rows, counting a partial last row: `ceil(slot_count / width)`.
    pub fn height(&self) -> usize {
        self.slots.len().div_ceil(self.width)
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.slots.len()
    }

    /// Converts a slot index into `(x, y)` grid coordinates.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Converts signed grid coordinates into a live slot index.
    ///
    /// # Return
    ///
    /// Returns `None` if the coordinates fall outside `[0, width) × [0, height)` or land on
    /// the missing tail of a partial last row.
    pub fn index_at(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height() {
            return None;
        }
        let index = y * self.width + x;
        self.contains(index).then_some(index)
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.slots.get(index).is_none_or(Option::is_none)
    }

    pub fn instance_id(&self, index: usize) -> Option<InstanceId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn get(&self, index: usize) -> Option<&PlacedItem> {
        self.instance_id(index).and_then(|id| self.instances.get(id))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PlacedItem> {
        self.instance_id(index)
            .and_then(|id| self.instances.get_mut(id))
    }

    pub fn instance(&self, id: InstanceId) -> Option<&PlacedItem> {
        self.instances.get(id)
    }

    /// Iterates occupied slots in ascending index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, InstanceId, &PlacedItem)> {
        self.slots.iter().enumerate().filter_map(|(index, &slot)| {
            slot.and_then(|id| self.instances.get(id).map(|item| (index, id, item)))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.instances.len()
    }

    /// Puts a new instance into a slot.
    ///
    /// # Return
    ///
    /// Returns the new instance id together with the instance previously held by the slot,
    /// or `None` if `index` is outside the grid.
    pub fn insert(
        &mut self,
        index: usize,
        item: PlacedItem,
    ) -> Option<(InstanceId, Option<PlacedItem>)> {
        if !self.contains(index) {
            return None;
        }
        let displaced = self.take(index);
        let id = self.instances.insert(item);
        self.slots[index] = Some(id);
        Some((id, displaced))
    }

    /// Empties a slot, returning its instance if there was one.
    pub fn take(&mut self, index: usize) -> Option<PlacedItem> {
        let id = self.slots.get_mut(index)?.take()?;
        self.instances.remove(id)
    }

    /// Exchanges the contents of two slots; returns `false` if either index is invalid.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.slots.swap(a, b);
        true
    }

    /// Changes the slot count, keeping the order and contents of retained slots.
    ///
    /// # Return
    ///
    /// The instances that occupied truncated slots, in ascending slot order.
    pub fn set_slot_count(&mut self, slot_count: usize) -> Vec<PlacedItem> {
        let mut removed = Vec::new();
        if slot_count < self.slots.len() {
            for id in self.slots.drain(slot_count..).flatten() {
                if let Some(item) = self.instances.remove(id) {
                    removed.push(item);
                }
            }
        } else {
            self.slots.resize(slot_count, None);
        }
        removed
    }

    /// Removes every instance, returning them in ascending slot order.
    pub fn clear(&mut self) -> Vec<PlacedItem> {
        let mut removed = Vec::with_capacity(self.instances.len());
        for slot in self.slots.iter_mut() {
            if let Some(id) = slot.take() {
                if let Some(item) = self.instances.remove(id) {
                    removed.push(item);
                }
            }
        }
        removed
    }
}
