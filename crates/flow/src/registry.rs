//! Component Registry - Named constructors per role
//!
//! The registry maps the names used in flow lines to constructors, one
//! table per role. It is built once at startup and handed to the
//! [`Parser`](crate::Parser); it is read-only while parsing and can be
//! shared between threads parsing different flows.
//!
//! # Design
//!
//! - **Explicit**: no global state, a fresh registry per test or per process
//! - **Type-safe**: each table only yields its own role's trait object
//! - **Lazy**: constructors run when a flow line names them, not at
//!   registration
//!
//! `C` is the construction context threaded through every constructor
//! (session settings, credentials, shutdown handles). This crate never
//! looks inside it.
//!
//! # Example
//!
//! ```
//! use reel_flow::{FactoryResult, InputReader, Modifier, NoopModifier, Registry};
//!
//! struct Session;
//!
//! fn buffered(_: &Session) -> FactoryResult<Box<dyn Modifier<dyn InputReader>>> {
//!     Ok(Box::new(NoopModifier))
//! }
//!
//! let mut registry = Registry::<Session>::new();
//! registry.input_modifiers.register("buffered", buffered);
//!
//! assert!(registry.input_modifiers.contains("buffered"));
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::{BoxError, FlowError, Result, Role};
use crate::modifier::{Modifier, NoopModifier};
use crate::role::{InputFormat, OutputFormat, Sink, Source};
use crate::stream::{InputReader, OutputWriter};

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// Result type returned by constructors
pub type FactoryResult<T> = std::result::Result<T, BoxError>;

/// A registered constructor for components of type `T`
pub type Constructor<C, T> = Box<dyn Fn(&C) -> FactoryResult<Box<T>> + Send + Sync>;

/// Name-to-constructor table for one role
pub struct Table<C, T: ?Sized> {
    role: Role,
    constructors: HashMap<String, Constructor<C, T>>,
}

impl<C, T: ?Sized> Table<C, T> {
    /// Create an empty table for `role`
    pub fn new(role: Role) -> Self {
        Self {
            role,
            constructors: HashMap::new(),
        }
    }

    /// Role of the components this table builds
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Register a constructor
    ///
    /// # Panics
    /// Panics if a constructor is already registered under `name`.
    /// Use `try_register` for fallible registration.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&C) -> FactoryResult<Box<T>> + Send + Sync + 'static,
    {
        if !self.try_register(name, constructor) {
            panic!("{} '{}' already registered", self.role, name);
        }
    }

    /// Try to register a constructor
    ///
    /// Returns `false` if a constructor is already registered under `name`.
    pub fn try_register<F>(&mut self, name: &str, constructor: F) -> bool
    where
        F: Fn(&C) -> FactoryResult<Box<T>> + Send + Sync + 'static,
    {
        if self.constructors.contains_key(name) {
            return false;
        }
        self.constructors
            .insert(name.to_string(), Box::new(constructor));
        true
    }

    /// Check if `name` is registered (exact, case-sensitive match)
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered constructors
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Resolve `name` and run its constructor
    ///
    /// # Errors
    /// - `FlowError::Unknown` if `name` is not registered
    /// - `FlowError::Construct` if the constructor fails
    pub fn create(&self, name: &str, ctx: &C) -> Result<Box<T>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| FlowError::unknown(self.role, name))?;

        constructor(ctx).map_err(|e| FlowError::construct(self.role, name, e))
    }
}

impl<C, T: ?Sized> fmt::Debug for Table<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("role", &self.role)
            .field("names", &self.names())
            .finish()
    }
}

/// Constructor tables for every role a flow line can name
pub struct Registry<C> {
    /// First token of input lines
    pub sources: Table<C, dyn Source>,
    /// Interior tokens of input lines
    pub input_modifiers: Table<C, dyn Modifier<dyn InputReader>>,
    /// Last token of input lines
    pub input_formats: Table<C, dyn InputFormat>,
    /// First token of output lines
    pub output_formats: Table<C, dyn OutputFormat>,
    /// Interior tokens of output lines
    pub output_modifiers: Table<C, dyn Modifier<dyn OutputWriter>>,
    /// Last token of output lines
    pub sinks: Table<C, dyn Sink>,
}

impl<C> Registry<C> {
    /// Create a registry with every table empty
    pub fn new() -> Self {
        Self {
            sources: Table::new(Role::Source),
            input_modifiers: Table::new(Role::InputModifier),
            input_formats: Table::new(Role::InputFormat),
            output_formats: Table::new(Role::OutputFormat),
            output_modifiers: Table::new(Role::OutputModifier),
            sinks: Table::new(Role::Sink),
        }
    }

    /// Total number of registered constructors across all tables
    pub fn len(&self) -> usize {
        self.sources.len()
            + self.input_modifiers.len()
            + self.input_formats.len()
            + self.output_formats.len()
            + self.output_modifiers.len()
            + self.sinks.len()
    }

    /// Check if every table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: 'static> Registry<C> {
    /// Create a registry with the built-in components registered
    ///
    /// Includes:
    /// - `noop` - pass-through modifier, on both sides
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .input_modifiers
            .register(NoopModifier::NAME, noop_input::<C>);
        registry
            .output_modifiers
            .register(NoopModifier::NAME, noop_output::<C>);
        registry
    }
}

fn noop_input<C>(_: &C) -> FactoryResult<Box<dyn Modifier<dyn InputReader>>> {
    Ok(Box::new(NoopModifier::new()))
}

fn noop_output<C>(_: &C) -> FactoryResult<Box<dyn Modifier<dyn OutputWriter>>> {
    Ok(Box::new(NoopModifier::new()))
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("sources", &self.sources.names())
            .field("input_modifiers", &self.input_modifiers.names())
            .field("input_formats", &self.input_formats.names())
            .field("output_formats", &self.output_formats.names())
            .field("output_modifiers", &self.output_modifiers.names())
            .field("sinks", &self.sinks.names())
            .finish()
    }
}
