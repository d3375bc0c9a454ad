//! Host device description used in pusher registrations.
//!
//! The homeserver shows the app and device display names in the user's
//! session list, and the push gateway uses `lang` to localize alerts.

use crate::constants::{FALLBACK_DEVICE_NAME, FALLBACK_LANG};

/// Names and locale reported with every pusher registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Application name with platform suffix, e.g. `"Notify Hub (macOS)"`.
    pub app_display_name: String,
    /// Human-readable device name.
    pub device_display_name: String,
    /// Preferred language tag, e.g. `"en-GB"`.
    pub lang: String,
}

impl DeviceInfo {
    /// Describe the current host.
    ///
    /// Device name comes from the host name; language from `LC_ALL`,
    /// `LC_MESSAGES` then `LANG`.
    pub fn current(bundle_display_name: &str) -> Self {
        let device_display_name = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_DEVICE_NAME.to_string());

        let lang = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find_map(|value| lang_from_locale(&value))
            .unwrap_or_else(|| FALLBACK_LANG.to_string());

        Self {
            app_display_name: app_display_name(bundle_display_name),
            device_display_name,
            lang,
        }
    }
}

/// `"<bundle> (<Platform>)"` for the platform this binary was built for.
pub fn app_display_name(bundle_display_name: &str) -> String {
    format!("{} ({})", bundle_display_name, platform_name())
}

fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "ios" => "iOS",
        "macos" => "macOS",
        "android" => "Android",
        "windows" => "Windows",
        "linux" => "Linux",
        "freebsd" => "FreeBSD",
        _ => "Desktop",
    }
}

/// Convert a POSIX locale (`en_GB.UTF-8@euro`) to a language tag (`en-GB`).
///
/// Returns `None` for empty values and the `C`/`POSIX` locales.
fn lang_from_locale(locale: &str) -> Option<String> {
    let base = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }

    Some(base.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_locale() {
        assert_eq!(lang_from_locale("en_GB.UTF-8").as_deref(), Some("en-GB"));
        assert_eq!(lang_from_locale("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(lang_from_locale("fr").as_deref(), Some("fr"));
    }

    #[test]
    fn test_lang_from_locale_ignores_posix() {
        assert_eq!(lang_from_locale("C"), None);
        assert_eq!(lang_from_locale("POSIX"), None);
        assert_eq!(lang_from_locale("C.UTF-8"), None);
        assert_eq!(lang_from_locale(""), None);
    }

    #[test]
    fn test_app_display_name_has_platform_suffix() {
        let name = app_display_name("Notify Hub");
        assert!(name.starts_with("Notify Hub ("));
        assert!(name.ends_with(')'));
    }

    #[test]
    fn test_current_is_never_empty() {
        let info = DeviceInfo::current("Notify Hub");
        assert!(!info.device_display_name.is_empty());
        assert!(!info.lang.is_empty());
    }
}
