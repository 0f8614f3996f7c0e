//! # rdme-core
//!
//! Core library for the rdme documentation publisher.
//!
//! This crate turns rendered markdown documents into publish-ready artifacts
//! for a documentation hosting platform: it resolves slugs across the whole
//! document set, synthesizes layered YAML frontmatter and rewrites internal
//! links to point at target slugs.

pub mod config;
pub mod excerpt;
pub mod frontmatter;
pub mod links;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod slug;
pub mod slug_map;
pub mod yaml;

pub use config::{AutoFields, ConfigError, Configuration, Platform};
pub use excerpt::extract_excerpt;
pub use frontmatter::{build_frontmatter, deep_merge, extract_title};
pub use links::{rewrite_links_with_slugs, strip_link_extensions, LinkRewriter};
pub use metadata::{extract_metadata, parse_scalar};
pub use output::{output_path, OutputPathError};
pub use pipeline::{transform, Pipeline};
pub use slug::generate_slug;
pub use slug_map::{build_slug_map, SlugMap, SlugMapError};
pub use yaml::emit_frontmatter;

pub use rdme_types::{DocId, Document, FieldValue, FrontmatterFields, MetaValue, MetadataBag};
