// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named constant substitution.
//!
//! Constants come from an explicit [`ConstantRegistry`] rather than from
//! process-wide state. A small table of built-in system constants can be
//! included on request.

use super::token::TokenProcessor;
use crate::domain::{ConfigError, ConfigTree, ConfigValue, Result};
use crate::ports::Processor;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Separator between a scope and a constant name.
pub const SCOPE_SEPARATOR: &str = "::";

static SYSTEM_CONSTANTS: Lazy<IndexMap<String, String>> = Lazy::new(|| {
    [
        ("NESTCFG_VERSION", env!("CARGO_PKG_VERSION")),
        ("NESTCFG_OS", std::env::consts::OS),
        ("NESTCFG_ARCH", std::env::consts::ARCH),
        ("NESTCFG_OS_FAMILY", std::env::consts::FAMILY),
        ("NESTCFG_PATH_SEPARATOR", std::path::MAIN_SEPARATOR_STR),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
});

/// Returns the built-in constants describing the running system.
pub fn system_constants() -> &'static IndexMap<String, String> {
    &SYSTEM_CONSTANTS
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn is_scope(scope: &str) -> bool {
    scope.split(SCOPE_SEPARATOR).all(is_identifier)
}

/// User-defined constants available to a [`ConstantProcessor`].
///
/// Three kinds of names are recognised:
///
/// * plain constants, `NAME`
/// * scoped constants, `Scope::NAME`
/// * scope pseudo-constants, `Scope::class` and `Scope::CLASS`, whose value
///   is the scope name itself
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::ConstantRegistry;
///
/// let mut registry = ConstantRegistry::new();
/// registry.define("APP_ENV", "production").unwrap();
/// registry.define_scoped("app::Settings", "TIMEOUT", "30").unwrap();
///
/// assert_eq!(registry.get("app::Settings::TIMEOUT"), Some("30"));
/// assert_eq!(registry.get("app::Settings::class"), Some("app::Settings"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstantRegistry {
    constants: IndexMap<String, String>,
}

impl ConstantRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines or redefines a plain constant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `name` is not an identifier.
    pub fn define(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if !is_identifier(name) {
            return Err(ConfigError::invalid_input(format!(
                "Invalid constant name '{}'",
                name
            )));
        }
        self.constants.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Defines a constant inside `scope` and registers the scope itself.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `scope` or `name` is not identifier-shaped.
    pub fn define_scoped(&mut self, scope: &str, name: &str, value: impl Into<String>) -> Result<()> {
        if !is_identifier(name) {
            return Err(ConfigError::invalid_input(format!(
                "Invalid constant name '{}' in scope '{}'",
                name, scope
            )));
        }
        self.register_scope(scope)?;
        self.constants
            .insert(format!("{}{}{}", scope, SCOPE_SEPARATOR, name), value.into());
        Ok(())
    }

    /// Registers the `Scope::class` and `Scope::CLASS` pseudo-constants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `scope` is not a `::`-separated path of
    /// identifiers.
    pub fn register_scope(&mut self, scope: &str) -> Result<()> {
        if !is_scope(scope) {
            return Err(ConfigError::invalid_input(format!(
                "Invalid constant scope '{}'",
                scope
            )));
        }
        self.insert_scope(scope);
        Ok(())
    }

    /// Registers the Rust type path of `T` as a scope.
    pub fn register_type<T: ?Sized + 'static>(&mut self) {
        self.insert_scope(std::any::type_name::<T>());
    }

    fn insert_scope(&mut self, scope: &str) {
        for suffix in ["class", "CLASS"] {
            self.constants.insert(
                format!("{}{}{}", scope, SCOPE_SEPARATOR, suffix),
                scope.to_string(),
            );
        }
    }

    /// Returns the value of a constant by its full name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }

    /// Iterates over full names and values in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of defined names, pseudo-constants included.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Returns `true` if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

/// Replaces constant names found in configuration values with their values.
///
/// By default only constants from the registry are used; with
/// [`ConstantProcessor::set_user_only`] set to `false` the
/// [`system_constants`] are included too, and registry entries win on a name
/// clash. Keys are left alone unless key processing is enabled.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::{ConstantProcessor, ConstantRegistry};
/// use nestcfg::domain::{ConfigTree, ConfigValue};
/// use nestcfg::ports::Processor;
///
/// let mut registry = ConstantRegistry::new();
/// registry.define("DATA_DIR", "/var/lib/app").unwrap();
///
/// let mut tree = ConfigTree::from_pairs([("cache", "DATA_DIR/cache")], true);
/// ConstantProcessor::new(registry).process(&mut tree).unwrap();
/// assert_eq!(tree.get("cache"), Some(&ConfigValue::from("/var/lib/app/cache")));
/// ```
#[derive(Debug, Clone)]
pub struct ConstantProcessor {
    registry: ConstantRegistry,
    user_only: bool,
    tokens: TokenProcessor,
}

impl ConstantProcessor {
    /// Creates a processor over user constants only.
    pub fn new(registry: ConstantRegistry) -> Self {
        let mut processor = Self {
            registry,
            user_only: true,
            tokens: TokenProcessor::new(),
        };
        processor.load_constants();
        processor
    }

    /// Chooses between user constants only and user plus system constants.
    pub fn with_user_only(mut self, user_only: bool) -> Self {
        self.set_user_only(user_only);
        self
    }

    /// Sets the text expected before each constant name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tokens.set_prefix(prefix);
        self
    }

    /// Sets the text expected after each constant name.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.tokens.set_suffix(suffix);
        self
    }

    /// Enables or disables renaming of keys.
    pub fn with_key_processing(mut self, enabled: bool) -> Self {
        self.tokens = self.tokens.with_key_processing(enabled);
        self
    }

    /// Returns `true` if only user-defined constants are substituted.
    pub fn user_only(&self) -> bool {
        self.user_only
    }

    /// Switches the constant table and rebuilds the token list.
    pub fn set_user_only(&mut self, user_only: bool) {
        self.user_only = user_only;
        self.load_constants();
    }

    /// Returns the registry the token list is built from.
    pub fn registry(&self) -> &ConstantRegistry {
        &self.registry
    }

    /// Replaces the registry and rebuilds the token list.
    pub fn set_registry(&mut self, registry: ConstantRegistry) {
        self.registry = registry;
        self.load_constants();
    }

    /// Returns the constants currently substituted.
    pub fn tokens(&self) -> &IndexMap<String, String> {
        self.tokens.tokens()
    }

    /// Turns on substitution inside keys as well as values.
    pub fn enable_key_processing(&mut self) {
        self.tokens.enable_key_processing();
    }

    fn load_constants(&mut self) {
        let system = if self.user_only {
            None
        } else {
            Some(system_constants())
        };
        let tokens = system
            .into_iter()
            .flat_map(|table| table.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .chain(self.registry.iter());
        self.tokens.set_tokens(tokens);
    }
}

impl Processor for ConstantProcessor {
    fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
        self.tokens.process_value(value)
    }

    fn process(&self, tree: &mut ConfigTree) -> Result<()> {
        tracing::debug!(
            constants = self.tokens.tokens().len(),
            user_only = self.user_only,
            "Resolving constants"
        );
        self.tokens.process(tree)
    }
}
