//! # Localization Module
//!
//! Every user-facing string lives in a Fluent resource compiled into the
//! binary. Arguments are passed pre-formatted as strings so numbers render
//! exactly as the caller formatted them.

use std::sync::LazyLock;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Russian message catalogue
pub const RU_RESOURCE: &str = include_str!("../locales/ru/main.ftl");

/// Localization manager for the bot
pub struct Localizer {
    bundle: FluentBundle<FluentResource>,
}

impl Localizer {
    /// Create a localizer for `locale` from Fluent source text
    ///
    /// Syntax errors are logged and the messages that did parse stay usable.
    pub fn new(locale: &str, source: &str) -> Self {
        let langid: LanguageIdentifier = locale.parse().unwrap_or_else(|e| {
            warn!(locale = %locale, error = ?e, "Invalid locale identifier, using undetermined");
            LanguageIdentifier::default()
        });

        let mut bundle = FluentBundle::new_concurrent(vec![langid]);
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!(locale = %locale, errors = ?errors, "Fluent resource contains syntax errors");
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(locale = %locale, errors = ?errors, "Failed to add Fluent resource");
        }

        Self { bundle }
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(key = %key, errors = ?errors, "Errors while formatting message");
        }
        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(*value));
        }
        self.get_message(key, Some(&fluent_args))
    }
}

/// Global localization instance
static LOCALIZER: LazyLock<Localizer> = LazyLock::new(|| Localizer::new("ru", RU_RESOURCE));

/// Get the global localizer
pub fn localizer() -> &'static Localizer {
    &LOCALIZER
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    localizer().get_message(key, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    localizer().get_message_with_args(key, args)
}
