//! Host-agnostic UI-node contracts shared by the overlay runtime and its browser adapter.
//!
//! This crate is the API-first boundary between overlay orchestration logic and the live DOM.
//! Runtime code issues explicit commands (`focus`, `set_attribute`, `bounding_rect`, ...) against
//! a [`DomHost`] implementation keyed by [`NodeId`]. The browser adapter lives in `dom_host_web`;
//! [`MemoryDom`] is an in-memory tree used by tests and non-browser builds.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod geometry;
pub mod memory;
pub mod node;
pub mod tabbable;
pub mod time;

pub use geometry::{Point, Rect, Size};
pub use memory::{DomOp, MemoryDom};
pub use node::{DomHost, NodeId, ELEMENT_NODE};
pub use tabbable::{is_forbidden_sibling_tag, order_tabbable, TabbableCandidate};
pub use time::{monotonic_now_ms, now_ms};
