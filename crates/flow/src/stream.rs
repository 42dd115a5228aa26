//! Stream role contracts
//!
//! The minimal capabilities every stream must provide to take part in a
//! flow. Input streams are readable, closable and carry provenance metadata.
//! Output streams are writable and closable.
//!
//! Modifiers that wrap a stream should delegate [`InputReader::meta`] to the
//! stream they wrap so that metadata set by the source stays visible at the
//! outermost layer.

use std::collections::HashMap;
use std::io::{self, Read, Write};

use serde_json::Value;

/// Provenance metadata attached to an input stream
///
/// Arbitrary key/value context such as the remote address of a connection
/// or the object path a stream was read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    values: HashMap<String, Value>,
}

impl Meta {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one for this key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a string value by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A resource that must be released explicitly
///
/// `close` may flush buffered data, so it can fail. Dropping a resource
/// without closing it releases memory but gives no flush guarantee.
pub trait Close {
    /// Release the resource
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Close + ?Sized> Close for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Readable input stream with metadata
pub trait InputReader: Read + Close + Send {
    /// Metadata describing where this stream came from
    fn meta(&self) -> &Meta;
}

/// Writable output stream
///
/// A marker over `Write + Close`; `close` is expected to flush.
pub trait OutputWriter: Write + Close + Send {}
