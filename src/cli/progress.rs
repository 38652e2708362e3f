//! Terminal progress display

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a load is in flight
///
/// Hidden when `enabled` is false so callers need not branch on quiet mode.
pub fn load_spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒"]),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_hidden() {
        let spinner = load_spinner("Loading", false);
        assert!(spinner.is_hidden());
        spinner.finish_and_clear();
    }

    #[test]
    fn test_spinner_carries_message() {
        let spinner = load_spinner("📡 Loading dataset...", true);
        assert_eq!(spinner.message(), "📡 Loading dataset...");
        spinner.finish_and_clear();
    }
}
