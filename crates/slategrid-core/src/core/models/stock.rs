use std::collections::BTreeMap;

/// The owned-but-unplaced item pool, counted per item id.
///
/// Kept in a sorted map so that iteration order (and anything derived from it, such as an
/// optimizer request) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stock {
    counts: BTreeMap<String, u32>,
}

impl Stock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.counts.get(item_id).copied().unwrap_or(0)
    }

    /// Takes one copy out of the pool; returns `false` (and changes nothing) if none is left.
    pub fn take(&mut self, item_id: &str) -> bool {
        match self.counts.get_mut(item_id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(item_id);
                }
                true
            }
            _ => false,
        }
    }

    pub fn give(&mut self, item_id: &str) {
        self.add(item_id, 1);
    }

    pub fn add(&mut self, item_id: &str, copies: u32) {
        if copies == 0 {
            return;
        }
        let count = self.counts.entry(item_id.to_string()).or_insert(0);
        *count = count.saturating_add(copies);
    }

    pub fn set(&mut self, item_id: &str, copies: u32) {
        if copies == 0 {
            self.counts.remove(item_id);
        } else {
            self.counts.insert(item_id.to_string(), copies);
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, &count)| (id.as_str(), count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_fails_without_copies() {
        let mut stock = Stock::new();
        assert!(!stock.take("artifact_cup"));
        stock.add("artifact_cup", 1);
        assert!(stock.take("artifact_cup"));
        assert!(!stock.take("artifact_cup"));
        assert!(stock.is_empty());
    }

    #[test]
    fn give_and_add_accumulate() {
        let mut stock = Stock::new();
        stock.give("slate_a");
        stock.add("slate_a", 2);
        stock.add("slate_b", 0);
        assert_eq!(stock.count("slate_a"), 3);
        assert_eq!(stock.count("slate_b"), 0);
        assert_eq!(stock.total(), 3);
    }

    #[test]
    fn add_saturates_at_the_counter_limit() {
        let mut stock = Stock::new();
        stock.add("slate_a", u32::MAX - 1);
        stock.add("slate_a", 5);
        stock.give("slate_a");
        assert_eq!(stock.count("slate_a"), u32::MAX);
    }

    #[test]
    fn set_overwrites_and_zero_removes() {
        let mut stock = Stock::new();
        stock.add("slate_a", 5);
        stock.set("slate_a", 2);
        assert_eq!(stock.count("slate_a"), 2);
        stock.set("slate_a", 0);
        assert!(stock.is_empty());
    }

    #[test]
    fn iteration_is_sorted_by_id() {
        let mut stock = Stock::new();
        stock.add("b", 1);
        stock.add("a", 2);
        let listed: Vec<_> = stock.iter().collect();
        assert_eq!(listed, vec![("a", 2), ("b", 1)]);
    }
}
