//! `steer_core` is the text-processing engine behind the `steer` build
//! tooling for steering and agent prompt documents. It has two independent
//! parts that build orchestration composes.
//!
//! ## Section extraction
//!
//! [`extract_section`] pulls one named section out of a markdown document. A
//! small scanner tracks whether each line starts inside a fenced code block or
//! inside xml-like instruction tags, so heading syntax in example code or in
//! `<definition>` bodies is never mistaken for document structure.
//!
//! ```rust
//! use steer_core::extract_section;
//!
//! let doc = "# Usage\n```sh\n# not a heading\n```\n# Next\n";
//! assert_eq!(
//! 	extract_section(doc, "Usage").unwrap(),
//! 	"# Usage\n```sh\n# not a heading\n```"
//! );
//! ```
//!
//! ## Manifest expansion
//!
//! [`expand_mappings`] turns declarative [`FileMapping`] rules into concrete
//! source and destination pairs for one [`BuildTarget`], resolving glob
//! sources and filling the `{name}` placeholder in destinations.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use steer_core::BuildTarget;
//! use steer_core::FileMapping;
//! use steer_core::expand_mappings;
//!
//! let mappings = vec![FileMapping::new("steering/*.md", "out/{name}.md")];
//! let expanded = expand_mappings(&mappings, Path::new("src"), BuildTarget::Npm).unwrap();
//! for mapping in expanded {
//! 	println!("{} -> {}", mapping.src, mapping.dest);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Loading `steer.toml`.
//! - [`manifest`]: Mapping rules, glob resolution and expansion.
//! - [`section`]: The scope-aware section scanner.
//! - [`shell`]: `{{{TOKEN}}}` substitution for protocol shells.

pub use config::*;
pub use error::*;
pub use manifest::*;
pub use section::*;
pub use shell::*;
pub use slug::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod manifest;
pub mod section;
pub mod shell;
mod slug;
