//! Configuration parsing and validation.

use crate::excerpt::DEFAULT_EXCERPT_LENGTH;
use crate::links::DEFAULT_LINK_EXTENSION;
use rdme_types::{FieldValue, FrontmatterFields};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid namespace '{0}': must be non-empty and contain no whitespace")]
    InvalidNamespace(String),

    #[error("Invalid link extension '{0}': must start with '.' followed by a name")]
    InvalidLinkExtension(String),

    #[error("excerpt_max_length must be greater than zero")]
    InvalidExcerptLength,

    #[error("Invalid default_frontmatter key '{key}' at '{path}'")]
    InvalidFrontmatterKey { path: String, key: String },
}

/// Target hosting flavour
///
/// Each platform differs only in configuration data: the metadata namespace
/// and whether links are resolved to slugs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    #[default]
    Rdme,
    ReadmeIo,
}

impl Platform {
    pub fn default_namespace(self) -> &'static str {
        match self {
            Platform::Rdme => "rdme",
            Platform::ReadmeIo => "readmeio",
        }
    }

    /// Whether internal links are rewritten to target slugs
    pub fn resolves_slugs(self) -> bool {
        match self {
            Platform::Rdme => true,
            Platform::ReadmeIo => false,
        }
    }
}

/// Which frontmatter fields are generated automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoFields {
    #[serde(default = "default_true")]
    pub title: bool,

    #[serde(default = "default_true")]
    pub slug: bool,

    #[serde(default = "default_true")]
    pub excerpt: bool,
}

impl Default for AutoFields {
    fn default() -> Self {
        Self {
            title: true,
            slug: true,
            excerpt: true,
        }
    }
}

/// Build configuration, read-only while documents are transformed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    #[serde(default)]
    pub platform: Platform,

    /// Metadata key namespace; defaults to the platform's
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default = "default_true")]
    pub emit_frontmatter: bool,

    #[serde(default = "default_true")]
    pub strip_links: bool,

    #[serde(default = "default_link_extension")]
    pub link_extension: String,

    #[serde(default = "default_excerpt_max_length")]
    pub excerpt_max_length: usize,

    #[serde(default)]
    pub auto_fields: AutoFields,

    #[serde(default)]
    pub default_frontmatter: FrontmatterFields,

    /// `None` selects the platform's standard document fields
    #[serde(default)]
    pub passthrough_fields: Option<BTreeSet<String>>,
}

fn default_true() -> bool {
    true
}

fn default_link_extension() -> String {
    DEFAULT_LINK_EXTENSION.to_string()
}

fn default_excerpt_max_length() -> usize {
    DEFAULT_EXCERPT_LENGTH
}

impl Default for Configuration {
    fn default() -> Self {
        Self::for_platform(Platform::default())
    }
}

impl Configuration {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            namespace: None,
            emit_frontmatter: true,
            strip_links: true,
            link_extension: default_link_extension(),
            excerpt_max_length: default_excerpt_max_length(),
            auto_fields: AutoFields::default(),
            default_frontmatter: FrontmatterFields::new(),
            passthrough_fields: None,
        }
    }

    /// Load and validate configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid "all defaults" configuration
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Configuration = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every document's output wrong
    pub fn validate(&self) -> Result<(), ConfigError> {
        let namespace = self.namespace();
        if namespace.is_empty() || namespace.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidNamespace(namespace.to_string()));
        }

        let ext = &self.link_extension;
        if !ext.starts_with('.') || ext.len() < 2 || ext.contains(['/', '\\', '#']) {
            return Err(ConfigError::InvalidLinkExtension(ext.clone()));
        }

        if self.excerpt_max_length == 0 {
            return Err(ConfigError::InvalidExcerptLength);
        }

        validate_keys(&self.default_frontmatter, "default_frontmatter")
    }

    /// Metadata namespace in effect
    pub fn namespace(&self) -> &str {
        self.namespace
            .as_deref()
            .unwrap_or_else(|| self.platform.default_namespace())
    }

    /// Full metadata key prefix, e.g. `rdme-`
    pub fn key_prefix(&self) -> String {
        format!("{}-", self.namespace())
    }

    /// Whether a build with this configuration needs a slug map
    pub fn resolves_slugs(&self) -> bool {
        self.strip_links && self.platform.resolves_slugs()
    }

    pub fn passthrough(&self) -> Option<&BTreeSet<String>> {
        self.passthrough_fields.as_ref()
    }
}

fn validate_keys(fields: &FrontmatterFields, path: &str) -> Result<(), ConfigError> {
    for (key, value) in fields {
        let well_formed = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !well_formed {
            return Err(ConfigError::InvalidFrontmatterKey {
                path: path.to_string(),
                key: key.clone(),
            });
        }
        validate_value(value, &format!("{path}.{key}"))?;
    }
    Ok(())
}

fn validate_value(value: &FieldValue, path: &str) -> Result<(), ConfigError> {
    match value {
        FieldValue::Mapping(map) => validate_keys(map, path),
        FieldValue::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(idx, item)| validate_value(item, &format!("{path}[{idx}]"))),
        _ => Ok(()),
    }
}
