//! Browser implementation of the [`dom_host::DomHost`] contract on top of `web-sys`.
//!
//! Elements are registered lazily: the first time runtime code hands an element to
//! [`WebDomHost::node_id`], it receives a stable [`dom_host::NodeId`] stamped on the element as an
//! expando property, so repeated lookups resolve to the same id.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod registry;
pub mod tabbable;
pub mod web_host;

pub use registry::ElementRegistry;
pub use tabbable::{effective_tab_index, TABBABLE_SELECTOR};
pub use web_host::WebDomHost;
