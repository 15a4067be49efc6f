//! User-facing notices raised by uploads.

pub mod center;

pub use center::{Notice, NoticeLevel, NotificationCenter};
