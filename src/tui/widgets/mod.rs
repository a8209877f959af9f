pub mod modes;
pub mod question;
pub mod results;
pub mod sidebar;
pub mod test_list;

use ratatui::style::Color;

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub(crate) fn score_color(score: f64) -> Color {
    if score >= 70.0 {
        Color::Green
    } else if score >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
