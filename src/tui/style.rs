//! Colors and bar scaling for the TUI.

use ratatui::style::Color;

use crate::billing::types::Scheme;

pub const HEADER_FG: Color = Color::White;
pub const HEADER_BG: Color = Color::DarkGray;
pub const FOOTER_FG: Color = Color::DarkGray;
pub const SELECTED_BG: Color = Color::DarkGray;
/// Cheapest-scheme marker.
pub const BEST_FG: Color = Color::Green;

pub fn scheme_color(scheme: Scheme) -> Color {
    match scheme {
        Scheme::Tou => Color::Cyan,
        Scheme::Ulo => Color::Magenta,
        Scheme::Tiered => Color::Yellow,
    }
}

/// Dollar cost as whole cents for bar heights.
pub fn bar_cents(cost: f64) -> u64 {
    if cost.is_finite() && cost > 0.0 {
        (cost * 100.0).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_cents_rounds_and_clamps() {
        assert_eq!(bar_cents(43.5), 4350);
        assert_eq!(bar_cents(0.004), 0);
        assert_eq!(bar_cents(-1.0), 0);
        assert_eq!(bar_cents(f64::NAN), 0);
    }
}
