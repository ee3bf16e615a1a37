//! maestro-links: file-reference resolution for Maestro markdown
//!
//! Agent output and user notes mention project files in many shapes. This
//! crate finds those mentions in a markdown tree and turns the ones that
//! point at real files into links (or image embeds) the renderer can open.
//!
//! # Overview
//!
//! - **Path index**: a flat view of the project file tree ([`tree`])
//! - **Resolution**: scanning text for wiki links, image embeds, absolute and
//!   relative paths, and resolving each against the index ([`resolver`])
//! - **Transform**: splicing resolved references into the node tree as link
//!   and image nodes ([`transform`])
//!
//! # Usage
//!
//! ```ignore
//! use maestro_links::mdast;
//! use maestro_links::resolver::ResolutionContext;
//! use maestro_links::transform::transform_tree;
//! use maestro_links::tree::PathIndex;
//!
//! let index = PathIndex::new(&file_tree);
//! let ctx = ResolutionContext::new(&index, "docs").with_project_root("/home/me/proj");
//!
//! let mut root = mdast::parse("See [[TODO]] and src/main.rs")?;
//! transform_tree(&mut root, &ctx);
//! ```

// Core modules
pub mod resolver;
pub mod transform;
pub mod tree;

// Node tree and configuration
pub mod config;
pub mod mdast;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
