//! UI Builder module for formatting static bot messages

use teloxide::utils::html;

// Import localization
use crate::localization::{t, t_args};

/// Greeting shown for `/start`
pub fn format_start_message(first_name: &str) -> String {
    format!(
        "{}\n{}",
        t_args("start-greeting", &[("name", &html::escape(first_name))]),
        t("commands-list")
    )
}

/// Command overview shown for `/help`
pub fn format_help_message() -> String {
    format!("{}\n{}", t("help-title"), t("commands-list"))
}

/// Prompt asking for a city name
pub fn format_weather_prompt(first_name: &str) -> String {
    t_args("weather-prompt", &[("name", &html::escape(first_name))])
}

/// Reply for a city that could not be resolved
pub fn format_weather_not_found(first_name: &str, city: &str) -> String {
    t_args(
        "weather-not-found",
        &[("name", first_name), ("city", city.trim())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_message_greets_and_lists_commands() {
        let message = format_start_message("Иван");
        assert!(message.starts_with("Привет, Иван!"));
        assert!(message.contains("/weather"));
        assert!(message.contains("/chuck_norris"));
    }

    #[test]
    fn test_start_message_escapes_name() {
        let message = format_start_message("<b>");
        assert!(message.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_help_message() {
        let message = format_help_message();
        assert!(message.starts_with("<b>Перечень функций бота:</b>"));
        assert!(message.contains("/help"));
    }

    #[test]
    fn test_not_found_names_city() {
        let message = format_weather_not_found("Анна", " Атлантида ");
        assert!(message.contains("Анна!"));
        assert!(message.contains("«Атлантида»"));
    }
}
