use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Outline button style; `selected` marks the entry that owns the tab stop.
pub fn button_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let style = Style::default().fg(theme.roles().accent_secondary);
    if selected { style.bg(theme.roles().selection_bg) } else { style }
}

/// Style for one row in an open menu panel.
pub fn menu_item_style<T: Theme + ?Sized>(theme: &T, enabled: bool, focused: bool) -> Style {
    match (enabled, focused) {
        (false, _) => theme.text_muted_style(),
        (true, true) => theme.selection_style().add_modifier(Modifier::BOLD),
        (true, false) => theme.text_primary_style(),
    }
}

/// Render options for [`render_button`].
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub borders: Borders,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, selected: bool, borders: Borders) -> Self {
        Self {
            enabled,
            focused,
            selected,
            borders,
        }
    }
}

/// Renders a standard button
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.enabled {
        theme.border_style(options.focused)
    } else {
        theme.text_muted_style()
    };

    // Unbordered buttons get padding so they match bordered ones in size.
    let padding = if options.borders.is_empty() {
        Padding::uniform(1)
    } else {
        Padding::uniform(0)
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(Block::bordered().borders(options.borders).border_style(border_style).padding(padding))
            .style(button_style(theme, options.enabled, options.selected)),
        area,
    );
}

/// Key hint spans for the footer: key in accent, description muted.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}
