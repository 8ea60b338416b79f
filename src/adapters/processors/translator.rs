// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation processor and an in-memory message catalog.

use crate::domain::{ConfigValue, Result};
use crate::ports::Processor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Text domain used when none is set.
pub const DEFAULT_TEXT_DOMAIN: &str = "default";

/// A translation backend.
///
/// Backends that depend on an unavailable runtime facility should fail with
/// `ConfigError::ExtensionUnavailable`.
pub trait Translator: Send + Sync {
    /// Translates `message` within `text_domain`.
    ///
    /// `locale` is `None` when the backend should use its own default.
    /// Messages without a translation are returned unchanged.
    fn translate(&self, message: &str, text_domain: &str, locale: Option<&str>) -> Result<String>;
}

/// In-memory translations keyed by locale and text domain.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::{MessageCatalog, Translator};
///
/// let mut catalog = MessageCatalog::new("en_US");
/// catalog.add_translations("de_DE", "default", [("Hello", "Hallo")]);
///
/// assert_eq!(catalog.translate("Hello", "default", Some("de_DE")).unwrap(), "Hallo");
/// assert_eq!(catalog.translate("Hello", "default", None).unwrap(), "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    default_locale: String,
    messages: HashMap<(String, String), HashMap<String, String>>,
}

impl MessageCatalog {
    /// Creates an empty catalog with the locale used when none is requested.
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            messages: HashMap::new(),
        }
    }

    /// Returns the locale used when none is requested.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Adds translations for a locale and text domain.
    pub fn add_translations<I, K, V>(&mut self, locale: &str, text_domain: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .entry((locale.to_string(), text_domain.to_string()))
            .or_default()
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, message: &str, text_domain: &str, locale: Option<&str>) -> Result<String> {
        let locale = locale.unwrap_or(&self.default_locale);
        let translated = self
            .messages
            .get(&(locale.to_string(), text_domain.to_string()))
            .and_then(|domain| domain.get(message));
        Ok(translated.map_or_else(|| message.to_string(), Clone::clone))
    }
}

/// Translates every string leaf of a tree.
///
/// Non-string values are returned unchanged.
#[derive(Clone)]
pub struct TranslatorProcessor {
    translator: Arc<dyn Translator>,
    text_domain: String,
    locale: Option<String>,
}

impl TranslatorProcessor {
    /// Creates a processor using the default text domain and the backend's locale.
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            text_domain: DEFAULT_TEXT_DOMAIN.to_string(),
            locale: None,
        }
    }

    /// Sets the text domain, returning the processor.
    pub fn with_text_domain(mut self, text_domain: impl Into<String>) -> Self {
        self.text_domain = text_domain.into();
        self
    }

    /// Sets the locale, returning the processor.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Returns the backend.
    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }

    /// Replaces the backend.
    pub fn set_translator(&mut self, translator: Arc<dyn Translator>) {
        self.translator = translator;
    }

    /// Returns the text domain.
    pub fn text_domain(&self) -> &str {
        &self.text_domain
    }

    /// Sets the text domain.
    pub fn set_text_domain(&mut self, text_domain: impl Into<String>) {
        self.text_domain = text_domain.into();
    }

    /// Returns the locale, if one is set.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Sets or clears the locale.
    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }
}

impl fmt::Debug for TranslatorProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorProcessor")
            .field("text_domain", &self.text_domain)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl Processor for TranslatorProcessor {
    fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
        match value {
            ConfigValue::String(message) => self
                .translator
                .translate(&message, &self.text_domain, self.locale.as_deref())
                .map(ConfigValue::String),
            other => Ok(other),
        }
    }
}
