//! Context bags
//!
//! A [`Context`] is a mutable attribute bag used as scratch and cache state.
//! The lifecycle manager owns one global context for its whole lifetime and
//! the dispatch engine keeps one context per registered extension, replaced
//! on every hook invocation.
//!
//! Attributes are stored as JSON values. A context can be built against a
//! declared shape (any [`ContextFields`] type): every declared field that is
//! not supplied takes its `Default` value, every supplied value is set
//! verbatim, and supplied values that the shape does not declare are kept as
//! extra attributes.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Declared shape of a context: named fields with defaults
pub trait ContextFields: Serialize + DeserializeOwned + Default {}

impl<T> ContextFields for T where T: Serialize + DeserializeOwned + Default {}

/// Mutable attribute bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    attributes: Map<String, Value>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding exactly the given attributes
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Create a context shaped by `T`
    ///
    /// Fails when the supplied values do not fit the declared field types.
    pub fn with_fields<T: ContextFields>(supplied: Map<String, Value>) -> Result<Self> {
        let mut attributes = match serde_json::to_value(T::default())? {
            Value::Object(map) => map,
            other => {
                return Err(Error::invalid_config(format!(
                    "context fields must serialize to a map, got {}",
                    other
                )))
            }
        };

        for (key, value) in supplied {
            attributes.insert(key, value);
        }

        // Validate the merged attributes against the declared shape
        serde_json::from_value::<T>(Value::Object(attributes.clone()))?;

        Ok(Self { attributes })
    }

    /// Get an attribute
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get an attribute or the caller's fallback
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a Value) -> &'a Value {
        self.attributes.get(key).unwrap_or(fallback)
    }

    /// Get an attribute converted to `T`; `None` when missing or of another shape
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a mutable reference to an attribute
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.attributes.get_mut(key)
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.attributes.insert(key.into(), value);
        Ok(())
    }

    /// Remove an attribute
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Typed view of the context
    pub fn fields<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.attributes.clone()))?)
    }

    /// Write every field of `fields` into the context, keeping other attributes
    pub fn set_fields<T: Serialize>(&mut self, fields: &T) -> Result<()> {
        match serde_json::to_value(fields)? {
            Value::Object(map) => {
                self.attributes.extend(map);
                Ok(())
            }
            other => Err(Error::invalid_config(format!(
                "context fields must serialize to a map, got {}",
                other
            ))),
        }
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
