//! Presentation tree handed to UI layers.

pub mod item;

pub use item::TreeItem;
