use crate::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use worldwindow_core::Messages;

/// Render keybindings help popup
pub fn render_keybindings_help(frame: &mut Frame, app: &App, area: Rect) {
    let t = app.messages();
    let popup_area = centered_rect(60, 70, area);

    // Clear background
    frame.render_widget(Clear, popup_area);

    let help_text = Paragraph::new(keybindings_content(t))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", t.help.title))
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_text, popup_area);

    if popup_area.height < 3 || popup_area.width < 3 {
        return;
    }

    // Footer on the bottom border
    let footer_area = Rect {
        x: popup_area.x + 1,
        y: popup_area.y + popup_area.height - 1,
        width: popup_area.width - 2,
        height: 1,
    };
    let footer = Paragraph::new(Span::styled(
        t.help.close,
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center);

    frame.render_widget(footer, footer_area);
}

fn keybindings_content(t: &Messages) -> Vec<Line<'static>> {
    let key = |k: &str, desc: &'static str| -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:12}", k),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(desc),
        ])
    };

    vec![
        Line::from(""),
        key("j / k", t.help.navigate),
        key("Tab", t.help.focus),
        key("r", t.help.refresh),
        key("m", t.help.load_more),
        key("f", t.help.favorite),
        key("d / Del", t.help.remove),
        key("v", t.help.favorites_refresh),
        key("Enter / o", t.help.open),
        key("l", t.help.language),
        key("Esc", t.help.cancel),
        key("?", t.help.help),
        key("q", t.help.quit),
    ]
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 70, area);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 35);
        assert!(popup.x >= 19 && popup.x <= 21);
        assert!(popup.y + popup.height <= area.height);
    }
}
