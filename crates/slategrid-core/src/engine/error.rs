use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Slot index {index} is out of range for a grid of {slot_count} slots")]
    OutOfRange { index: usize, slot_count: usize },

    #[error("No unplaced copies of '{item_id}' left in stock")]
    NoStock { item_id: String },

    #[error("Item '{item_id}' is not in the catalog")]
    CatalogMiss { item_id: String },

    #[error("Item '{item_id}' is not an artifact")]
    NotAnArtifact { item_id: String },

    #[error("Mode '{mode}' is not a selectable global effect mode of '{item_id}'")]
    InvalidMode { item_id: String, mode: String },
}
