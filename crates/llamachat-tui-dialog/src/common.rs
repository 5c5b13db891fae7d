//! Common dialog helpers.

use ratatui::{layout::Rect, text::Span};

use llamachat_tui_core::Theme;

/// Helper to create a centered rectangle.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Whether a terminal cell lies inside `rect`.
pub(crate) fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Build help line spans from `(key, action)` pairs.
pub(crate) fn help_spans<'a>(pairs: &[(&'a str, &'a str)], theme: &Theme) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (i, (key, action)) in pairs.iter().enumerate() {
        spans.push(Span::styled(*key, theme.highlight_style()));
        let sep = if i + 1 < pairs.len() { "  " } else { "" };
        spans.push(Span::styled(format!(" {action}{sep}"), theme.dim_style()));
    }
    spans
}
