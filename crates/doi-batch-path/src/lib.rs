//! Record paths for attribute documents.
//!
//! A record path is a dotted key path with an explicit list-iteration
//! marker, e.g. `creators[].name`. A path with N markers addresses the
//! cross product of list positions at each marker.
//!
//! # Example
//!
//! ```
//! use doi_batch_path::{get, parse_path, Segment};
//! use serde_json::json;
//!
//! let path = parse_path("titles[].title");
//! assert_eq!(path.segments()[1], Segment::Each);
//! assert_eq!(path.to_string(), "titles[].title");
//!
//! let doc = json!({"publisher": {"name": "Zenodo"}});
//! let name = get(&doc, parse_path("publisher.name").segments());
//! assert_eq!(name, Some(&json!("Zenodo")));
//! ```

pub mod types;
pub use types::{RecordPath, Segment, ITERATOR_MARKER};

mod util;
pub use util::{format_path, parse_path, shared_list_context, SharedListContext};

mod get;
pub use get::{child, child_mut, get, get_mut};
