// Rust guideline compliant 2026-08-18

//! Appearance preference -- an explicit tri-state value threaded from the
//! composition root.
//!
//! There is no ambient theme singleton: whoever renders owns a
//! [`ThemePreference`] and passes the resolved [`ThemeMode`] where needed,
//! which keeps rendering testable without global state.

/// Environment variable holding the startup override (`dark` / `light`).
const THEME_ENV: &str = "SENTINEL_THEME";

/// Resolved appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Plain, uncolored output.
    Light,
    /// Colored output for dark terminals.
    Dark,
}

/// Tri-state appearance preference: follow the system, or force a mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemePreference {
    override_mode: Option<ThemeMode>,
}

impl ThemePreference {
    /// Follow the system appearance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            override_mode: None,
        }
    }

    /// Read the startup preference from `SENTINEL_THEME`.
    ///
    /// `dark` and `light` force a mode; anything else (or unset) follows
    /// the system. Unrecognized values are logged once here.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(THEME_ENV) {
            Ok(value) => {
                let override_mode = parse_mode(&value);
                if override_mode.is_none() && !value.is_empty() {
                    tracing::warn!(value = %value, "theme.env.unrecognized");
                }
                Self { override_mode }
            }
            Err(_unset) => Self::new(),
        }
    }

    /// The explicit override, if any.
    // #[allow] not #[expect]: the settings surface is exercised by the tests
    // below, so dead_code fires only in the non-test build and #[expect]
    // would be unfulfilled under cargo test.
    #[allow(dead_code, reason = "settings surface; this binary sets appearance via SENTINEL_THEME")]
    #[must_use]
    pub fn override_mode(&self) -> Option<ThemeMode> {
        self.override_mode
    }

    /// Force a mode regardless of the system appearance.
    // See override_mode's allow(dead_code) comment above.
    #[allow(dead_code, reason = "settings surface; this binary sets appearance via SENTINEL_THEME")]
    pub fn set_override(&mut self, mode: ThemeMode) {
        self.override_mode = Some(mode);
    }

    /// Drop the override and follow the system again.
    // See override_mode's allow(dead_code) comment above.
    #[allow(dead_code, reason = "settings surface; this binary sets appearance via SENTINEL_THEME")]
    pub fn reset(&mut self) {
        self.override_mode = None;
    }

    /// Cycle the preference the way the settings toggle does: following the
    /// system flips to the opposite of the system appearance; an explicit
    /// dark goes light; an explicit light falls back to the system.
    // See override_mode's allow(dead_code) comment above.
    #[allow(dead_code, reason = "settings surface; this binary sets appearance via SENTINEL_THEME")]
    pub fn toggle(&mut self, system_dark: bool) {
        self.override_mode = match self.override_mode {
            None if system_dark => Some(ThemeMode::Light),
            None => Some(ThemeMode::Dark),
            Some(ThemeMode::Dark) => Some(ThemeMode::Light),
            Some(ThemeMode::Light) => None,
        };
    }

    /// The mode to render with under the given system appearance.
    #[must_use]
    pub fn resolve(&self, system_dark: bool) -> ThemeMode {
        match self.override_mode {
            Some(mode) => mode,
            None if system_dark => ThemeMode::Dark,
            None => ThemeMode::Light,
        }
    }
}

/// Parse an environment value; unrecognized values mean no override.
fn parse_mode(value: &str) -> Option<ThemeMode> {
    match value.to_ascii_lowercase().as_str() {
        "dark" => Some(ThemeMode::Dark),
        "light" => Some(ThemeMode::Light),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
