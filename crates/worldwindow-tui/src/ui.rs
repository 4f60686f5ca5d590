// UI rendering logic
use crate::{App, Focus, InputMode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use worldwindow_core::format::{
    format_time, hex_to_rgb, palette_from_text, pick_color, strip_html, truncate,
};
use worldwindow_core::{Card, Messages, ToastKind};

const SUMMARY_MAX: usize = 160;
const PROMPT_MAX: usize = 100;
const FAVORITE_SUMMARY_MAX: usize = 80;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Hero + actions
            Constraint::Min(6),    // Cards and favorites
            Constraint::Length(1), // Toast / status bar
        ])
        .split(frame.area());

    render_hero(frame, app, chunks[0]);

    // Narrow terminals give the card list more room
    let (cards_pct, favorites_pct) = if chunks[1].width < 100 { (60, 40) } else { (65, 35) };
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(cards_pct),
            Constraint::Percentage(favorites_pct),
        ])
        .split(chunks[1]);

    render_cards(frame, app, body[0]);
    render_favorites(frame, app, body[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.input_mode == InputMode::Help {
        let area = frame.area();
        crate::help_ui::render_keybindings_help(frame, app, area);
    }
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let t = app.messages();
    let width = area.width.saturating_sub(4) as usize;

    let key = |k: &'static str| {
        Span::styled(
            format!("[{}] ", k),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    };
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let refresh_label = if app.feed.is_refreshing() {
        format!("⟳ {}", t.toast.loading)
    } else {
        format!("⟳ {}", t.hero.refresh)
    };
    let more_label = if app.feed.is_extending() {
        format!("↓ {}", t.toast.loading)
    } else {
        format!("↓ {}", t.hero.load_more)
    };

    let actions = Line::from(vec![
        key("r"),
        Span::styled(
            refresh_label,
            if app.feed.is_refreshing() { disabled } else { enabled },
        ),
        Span::raw("   "),
        key("m"),
        Span::styled(
            more_label,
            if app.feed.is_extending() { disabled } else { enabled },
        ),
        Span::raw("   "),
        key("v"),
        Span::styled(format!("♡ {}", t.hero.view_favorites), enabled),
        Span::raw("   "),
        key("l"),
        Span::styled(t.lang.switch, Style::default().fg(Color::Magenta)),
    ]);

    let lines = vec![
        Line::from(Span::styled(
            format!("◍ {}", t.hero.eyebrow),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            t.hero.heading,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(t.hero.lede, width),
            Style::default().fg(Color::DarkGray),
        )),
        actions,
    ];

    let hero = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", t.app.title))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(hero, area);
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
}

fn render_cards(frame: &mut Frame, app: &mut App, area: Rect) {
    let t = app.messages();
    let focused = app.focus == Focus::Cards;
    let width = area.width.saturating_sub(6) as usize;

    // Placeholders while a refresh is out, one per expected card
    if app.feed.is_refreshing() {
        let skeleton = Style::default().fg(Color::DarkGray);
        let long = "░".repeat(width.min(48));
        let short = "░".repeat(width.min(48) * 2 / 3);
        let items: Vec<ListItem> = (0..app.feed.daily_limit())
            .map(|_| {
                ListItem::new(vec![
                    Line::from(Span::styled(format!("▌ {}", long), skeleton)),
                    Line::from(Span::styled(format!("▌ {}", short), skeleton)),
                    Line::from(""),
                ])
            })
            .collect();

        let title = format!(" {} ({}) ", t.card_grid.title, t.toast.loading);
        frame.render_widget(List::new(items).block(panel_block(title, focused)), area);
        return;
    }

    let title = format!(" {} ({}) ", t.card_grid.title, app.feed.items().len());

    if app.feed.items().is_empty() {
        let empty = Paragraph::new(vec![Line::from(""), Line::from(t.card_grid.empty)])
            .block(panel_block(title, focused))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .feed
        .items()
        .iter()
        .map(|card| card_item(card, t, app.favorites.is_favorited(&card.id), width))
        .collect();

    let list = List::new(items)
        .block(panel_block(title, focused))
        .highlight_style(Style::default().bg(Color::Rgb(40, 42, 54)))
        .highlight_symbol("› ");

    frame.render_stateful_widget(list, area, &mut app.cards_state);
}

fn accent(seed: i64) -> Color {
    rgb(pick_color(seed)).unwrap_or(Color::Cyan)
}

fn rgb(hex: &str) -> Option<Color> {
    hex_to_rgb(hex).map(|(r, g, b)| Color::Rgb(r, g, b))
}

fn card_item(card: &Card, t: &Messages, favorited: bool, width: usize) -> ListItem<'static> {
    let color = accent(card.image_seed);
    let bar = || Span::styled("▌ ", Style::default().fg(color));
    let muted = Style::default().fg(Color::Gray);

    let title = Line::from(vec![
        bar(),
        Span::styled(
            truncate(&strip_html(&card.title), width.saturating_sub(6)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", t.card.ai_badge),
            Style::default().fg(Color::Black).bg(color),
        ),
    ]);

    let summary = Line::from(vec![
        bar(),
        Span::styled(
            truncate(&strip_html(&card.summary), SUMMARY_MAX.min(width)),
            muted,
        ),
    ]);

    let prompt = Line::from(vec![
        bar(),
        Span::styled(t.card.prompt, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("　"),
        Span::styled(
            truncate(&strip_html(&card.image_prompt), PROMPT_MAX.min(width)),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
    ]);

    let mut meta = vec![
        bar(),
        Span::styled(
            format!("◷ {}", format_time(&card.published, t.card.unknown_time)),
            muted,
        ),
        Span::raw("  "),
    ];
    for swatch in palette_from_text(&card.image_palette) {
        if let Some(c) = rgb(swatch) {
            meta.push(Span::styled("■", Style::default().fg(c)));
        }
    }
    meta.push(Span::styled(
        format!("  {} {}  ", t.card.seed, card.image_seed),
        Style::default().fg(Color::DarkGray),
    ));
    meta.push(if favorited {
        Span::styled(
            format!("♥ {}", t.card.favorited),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("♡ {}", t.card.favorite), Style::default().fg(Color::White))
    });

    ListItem::new(vec![title, summary, prompt, Line::from(meta), Line::from("")])
}

fn render_favorites(frame: &mut Frame, app: &mut App, area: Rect) {
    let t = app.messages();
    let focused = app.focus == Focus::Favorites;
    let width = area.width.saturating_sub(6) as usize;
    let title = format!(" {} ({}) ", t.favorites.title, app.favorites.items().len());
    let block = panel_block(title, focused).title_bottom(format!(" v: {} ", t.favorites.refresh));

    if app.favorites.items().is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("♡", Style::default().fg(Color::Magenta))),
            Line::from(t.favorites.empty),
        ])
        .block(block)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .favorites
        .items()
        .iter()
        .map(|card| {
            let color = accent(card.image_seed);
            let bar = Span::styled("▎", Style::default().fg(color));
            ListItem::new(vec![
                Line::from(vec![
                    bar.clone(),
                    Span::styled(
                        truncate(&strip_html(&card.title), width),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    bar.clone(),
                    Span::styled(
                        truncate(&strip_html(&card.summary), FAVORITE_SUMMARY_MAX.min(width)),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
                Line::from(vec![
                    bar,
                    Span::styled(
                        format!("◷ {}", format_time(&card.published, t.card.unknown_time)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 42, 54)))
        .highlight_symbol("› ");

    frame.render_stateful_widget(list, area, &mut app.favorites_state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let t = app.messages();

    let line = if app.toast.is_visible() {
        let style = match app.toast.kind() {
            ToastKind::Info => Style::default().fg(Color::Cyan),
            ToastKind::Success => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ToastKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        Line::from(Span::styled(format!(" {}", app.toast.message()), style))
    } else {
        let contextual = match app.focus {
            Focus::Cards => {
                let saved = app
                    .selected_card()
                    .is_some_and(|card| app.favorites.is_favorited(&card.id));
                let action = if saved { t.card.unfavorite } else { t.card.favorite };
                format!("f: {}", action)
            }
            Focus::Favorites => format!("d: {}", t.favorites.remove),
        };
        Line::from(Span::styled(
            format!(
                " j/k: {} | {} | Enter: {} | Tab: {} | ?: {} | q: {}",
                t.help.navigate, contextual, t.card.view_original, t.help.focus, t.help.help, t.help.quit
            ),
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Completion;
    use crate::Command;
    use ratatui::{backend::TestBackend, Terminal};
    use worldwindow_core::{Config, Locale};

    fn card(id: &str) -> Card {
        Card {
            id: id.to_string(),
            title: format!("<b>Title {}</b>", id),
            summary: "Something happened".to_string(),
            link: String::new(),
            published: "2024-03-05T07:08:09".to_string(),
            image_prompt: "a city at dusk".to_string(),
            image_palette: "#007AFF, #FF2D55".to_string(),
            image_seed: 3,
            image_url: String::new(),
        }
    }

    fn english_app() -> App {
        let mut config = Config::default();
        config.ui.locale = Locale::En;
        App::new(&config)
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_empty_session() {
        let mut app = english_app();
        let screen = draw(&mut app);

        assert!(screen.contains("World Window"));
        assert!(screen.contains("Today's Headlines (0)"));
        assert!(screen.contains("No favorites yet"));
    }

    #[test]
    fn test_skeletons_while_refreshing() {
        let mut app = english_app();
        let _ = app.request_refresh();
        let screen = draw(&mut app);

        assert!(screen.contains("░░░░"));
        assert!(screen.contains("Loading…"));
    }

    #[test]
    fn test_cards_render_clean_text() {
        let mut app = english_app();
        let Some(Command::Feed(ticket, _)) = app.request_refresh() else {
            panic!("refresh should produce a feed command");
        };
        app.apply(Completion::Feed(ticket, Ok(vec![card("a"), card("b")])));
        let screen = draw(&mut app);

        assert!(screen.contains("Title a"));
        assert!(!screen.contains("<b>"));
        assert!(screen.contains("2024-03-05 07:08"));
        assert!(screen.contains("Save"));
    }

    #[test]
    fn test_toast_replaces_hints() {
        let mut app = english_app();
        assert!(draw(&mut app).contains("q: Quit"));

        app.toast.show("Added to favorites", ToastKind::Success);
        let screen = draw(&mut app);
        assert!(screen.contains("Added to favorites"));
        assert!(!screen.contains("q: Quit"));
    }

    #[test]
    fn test_favorite_hint_follows_selection() {
        use worldwindow_core::FavoritesReply;

        let mut app = english_app();
        let Some(Command::Feed(ticket, _)) = app.request_refresh() else {
            panic!("refresh should produce a feed command");
        };
        app.apply(Completion::Feed(ticket, Ok(vec![card("a")])));

        let screen = draw(&mut app);
        assert!(screen.contains("f: Save"));
        assert!(screen.contains("v: Refresh"));

        let Some(Command::Favorites(ticket, _)) = app.request_reload_favorites() else {
            panic!("reload should produce a favorites command");
        };
        app.apply(Completion::Favorites(
            ticket,
            FavoritesReply {
                mutation: Ok(()),
                listing: Ok(vec![card("a")]),
            },
        ));

        let screen = draw(&mut app);
        assert!(screen.contains("f: Unsave"));
        assert!(screen.contains("Favorites (1)"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = english_app();
        app.input_mode = InputMode::Help;
        let screen = draw(&mut app);

        assert!(screen.contains("Keybindings"));
        assert!(screen.contains("Switch language"));
    }
}
