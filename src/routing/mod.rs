//! Pattern routing.
//!
//! - **`trie`**: per-method segment trie with `:param` and `*wildcard` nodes
//! - **`router`**: method roots, handler table, lookup and dispatch
//! - **`group`**: prefixed route groups sharing one router and one registry
//! - **`static_files`**: handler serving files from a directory

pub mod group;
pub mod router;
pub mod static_files;
pub mod trie;

pub use group::{GroupRegistry, RouterGroup};
pub use router::{parse_pattern, Router};
pub use trie::Node;
