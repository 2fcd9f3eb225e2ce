//! Page descriptor parsing.
//!
//! A page descriptor is a flat JSON object of string properties. The reserved
//! `template` property names the template to render with.

use serde_json::Value;

/// Reserved property naming the page's template.
pub const TEMPLATE_KEY: &str = "template";

/// Error returned when a page descriptor can't be used.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// Text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Top-level JSON value is not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    /// A property has a value other than a string.
    #[error("property \"{key}\" must be a string, found {found}")]
    NonStringProperty {
        /// Offending property name.
        key: String,
        /// JSON type of the value.
        found: &'static str,
    },
}

/// Parsed page descriptor.
///
/// Properties keep the order they appear in the JSON text. The `template`
/// property is kept among them, so templates can reference `[{template}]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageDescriptor {
    properties: Vec<(String, String)>,
}

impl PageDescriptor {
    /// Parse a descriptor from JSON text.
    ///
    /// Every property value must be a string; numbers, booleans, `null`,
    /// arrays and objects are rejected rather than coerced. The one exception
    /// is `"template": null`, which reads as no template at all.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if the text is not a JSON object of strings.
    pub fn parse(json: &str) -> Result<Self, DescriptorError> {
        let value: Value = serde_json::from_str(json)?;
        let map = match value {
            Value::Object(map) => map,
            other => return Err(DescriptorError::NotAnObject(json_type(&other))),
        };

        let properties = map
            .into_iter()
            .filter(|(key, value)| !(key == TEMPLATE_KEY && value.is_null()))
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                other => Err(DescriptorError::NonStringProperty {
                    key,
                    found: json_type(&other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { properties })
    }

    /// Template name, or `None` if absent or empty.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.get(TEMPLATE_KEY).filter(|name| !name.is_empty())
    }

    /// Look up a property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over properties in document order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Human-readable JSON type name.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
