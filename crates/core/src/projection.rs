//! Attribute projection encoding.
//!
//! Every requested attribute name is referenced through a `#`-prefixed
//! placeholder so that names colliding with DynamoDB reserved words
//! (`name`, `size`, `status`, ...) never reach the expression parser raw.

use std::collections::BTreeMap;

/// Sentinel that prefixes every attribute name placeholder.
pub const PLACEHOLDER_PREFIX: char = '#';

/// A projection expression plus the placeholder map it refers to.
///
/// The map keeps insertion order so logs and recorded requests are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionSpec {
    expression: String,
    names: Vec<(String, String)>,
}

impl ProjectionSpec {
    /// Builds the projection for the given attribute names, in order.
    ///
    /// Duplicate names collapse to a single placeholder entry; the expression
    /// keeps one reference per requested name. Names must be non-empty, a bare
    /// `#` placeholder is rejected by the service.
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut placeholders = Vec::new();
        let mut names: Vec<(String, String)> = Vec::new();

        for attribute in attributes {
            let attribute = attribute.as_ref();
            debug_assert!(!attribute.is_empty(), "attribute names must be non-empty");
            let placeholder = placeholder_for(attribute);

            match names.iter_mut().find(|(p, _)| *p == placeholder) {
                Some(entry) => entry.1 = attribute.to_string(),
                None => names.push((placeholder.clone(), attribute.to_string())),
            }
            placeholders.push(placeholder);
        }

        Self {
            expression: placeholders.join(","),
            names,
        }
    }

    /// The comma separated projection expression, e.g. `#id,#name`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Placeholder to attribute name pairs, in insertion order.
    pub fn names(&self) -> &[(String, String)] {
        &self.names
    }

    /// Placeholder map as carried on requests.
    pub fn names_map(&self) -> BTreeMap<String, String> {
        self.names.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Returns the placeholder token for an attribute name.
pub fn placeholder_for(attribute: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{attribute}")
}
