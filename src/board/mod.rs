//! Board module for corkboard.
//!
//! Board posts with a single fixed owner:
//! - Board records and the SQLite repository
//! - Owner-gated create, update and delete
//! - Newest-first paginated listings

mod pagination;
mod repository;
mod service;
mod types;

pub use pagination::{page_index_from_number, PageLink, PagePlan};
pub use repository::BoardRepository;
pub use service::{BoardContentService, BoardPage, MAX_BODY_LENGTH, MAX_TITLE_LENGTH};
pub use types::{Board, BoardDetail, BoardUpdate, NewBoard};
