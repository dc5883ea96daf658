// Rust guideline compliant 2026-08-18

//! Console rendering for the alert feed and the spend series.
//!
//! Pure string builders; the composition root decides when to print. Dark
//! mode uses ANSI color, light mode stays uncolored.

use crate::theme::ThemeMode;
use domain::DailySpend;
use feed::AlertSnapshot;

const DARK_HEADER: &str = "\x1b[1;36m";
const DARK_ALERT: &str = "\x1b[1;33m";
const RESET: &str = "\x1b[0m";

/// Renders pipeline state as console text under a fixed theme.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleUi {
    theme: ThemeMode,
}

impl ConsoleUi {
    /// Create a renderer for the given mode.
    #[must_use]
    pub fn new(theme: ThemeMode) -> Self {
        Self { theme }
    }

    /// Render one feed snapshot, newest alert first.
    #[must_use]
    pub fn render_snapshot(&self, snapshot: &AlertSnapshot) -> String {
        let mut out = String::new();
        self.push_header(
            &mut out,
            &format!(
                "fraud alerts (rev {}, {} total)",
                snapshot.revision,
                snapshot.alerts.len()
            ),
        );
        for alert in &snapshot.alerts {
            let line = format!(
                "{}  {}",
                alert.timestamp.format("%Y-%m-%d %H:%M:%S"),
                alert.message
            );
            self.push_line(&mut out, &line);
        }
        out
    }

    /// Render the per-day spend series in its given (ascending) order.
    #[must_use]
    pub fn render_spend(&self, series: &[DailySpend]) -> String {
        let mut out = String::new();
        self.push_header(&mut out, "spend by day");
        if series.is_empty() {
            out.push_str("  (no dated transactions)\n");
            return out;
        }
        for day in series {
            out.push_str(&format!("  {}  ₹{}\n", day.date, day.total));
        }
        out
    }

    fn push_header(&self, out: &mut String, text: &str) {
        match self.theme {
            ThemeMode::Dark => out.push_str(&format!("{DARK_HEADER}== {text} =={RESET}\n")),
            ThemeMode::Light => out.push_str(&format!("== {text} ==\n")),
        }
    }

    fn push_line(&self, out: &mut String, line: &str) {
        match self.theme {
            ThemeMode::Dark => out.push_str(&format!("{DARK_ALERT}{line}{RESET}\n")),
            ThemeMode::Light => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
