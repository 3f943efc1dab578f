pub mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Page, Popup};
use crate::model::BusinessCard;
use crate::theme::Palette;
use components::{tag_line, Loader, ProgressBar, Tag, TextInputView, Tone, Typography};

pub fn draw(f: &mut Frame, app: &App) {
    let p = app.theme.palette();
    let area = f.area();

    // Root of the frame carries the theme; everything below inherits it
    f.render_widget(Block::default().style(p.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Length(1), // Page tabs
            Constraint::Min(6),    // Page
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, p, chunks[0]);
    draw_tabs(f, app, p, chunks[1]);
    match app.page {
        Page::Profile => draw_profile(f, app, p, chunks[2]),
        Page::Projects => draw_projects(f, app, p, chunks[2]),
        Page::MyCard => draw_my_card(f, app, p, chunks[2]),
    }
    draw_footer(f, app, p, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, p),
        Popup::ConfirmDelete => draw_confirm_popup(f, app, p),
    }
}

fn page_block<'a>(title: &'a str, p: &Palette) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent))
}

fn draw_info_line(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(p.warning)))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(p.text_dim)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_tabs(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for page in app.pages() {
        let style = if page == app.page {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.inactive)
        };
        spans.push(Span::styled(format!(" {} ", page.title()), style));
        spans.push(Span::styled("│", Style::default().fg(p.inactive)));
    }
    spans.pop();

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Name, subtitle, contact rows, bio and tags of a card
fn card_lines<'a>(card: &'a BusinessCard, p: &Palette) -> Vec<Line<'a>> {
    let t = Typography::new(p);
    let mut lines = vec![Line::from(t.heading(card.name.as_str()))];

    if let Some(subtitle) = card.display_subtitle() {
        lines.push(Line::from(t.subheading(subtitle)));
    }
    lines.push(Line::from(""));

    let contact_rows = [
        ("Email   ", &card.email),
        ("Phone   ", &card.phone),
        ("Website ", &card.website),
    ];
    for (label, value) in contact_rows {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            lines.push(Line::from(vec![t.caption(label), t.body(value)]));
        }
    }

    if let Some(bio) = card.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(t.body(bio)));
    }

    let tags: Vec<Tag> = card.visible_tags().map(|t| Tag::new(t, Tone::Neutral)).collect();
    if !tags.is_empty() {
        lines.push(Line::from(""));
        lines.push(tag_line(tags, p));
    }
    lines
}

fn draw_profile(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let block = page_block("Contact profile", p);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(profile) = app.profile.as_ref() else {
        return;
    };

    if !profile.loaded {
        if profile.last_error.is_none() {
            f.render_widget(
                Loader {
                    label: "Loading profile...",
                    tick: app.tick,
                    palette: p,
                },
                inner,
            );
        } else {
            let msg = Paragraph::new("Profile unavailable. Press r to retry.")
                .style(Style::default().fg(p.text_dim));
            f.render_widget(msg, inner);
        }
        return;
    }

    let Some(card) = profile.card.as_ref() else {
        let msg = Paragraph::new(format!("{} has no business card yet", profile.target_user_id))
            .style(Style::default().fg(p.text_dim));
        f.render_widget(msg, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Card
            Constraint::Length(1), // Completeness
            Constraint::Length(1), // Contact state
        ])
        .split(inner);

    let body = Paragraph::new(card_lines(card, p)).wrap(Wrap { trim: false });
    f.render_widget(body, chunks[0]);

    f.render_widget(
        ProgressBar {
            label: "Profile",
            percent: card.completeness(),
            palette: p,
        },
        chunks[1],
    );

    let state = if profile.is_own_profile() {
        Line::from(Tag::new("you", Tone::Accent).span(p))
    } else if profile.is_saved() {
        Line::from(vec![
            Tag::new("in contacts", Tone::Success).span(p),
            Span::styled("  x", Style::default().fg(p.accent)),
            Span::styled(" remove", Style::default().fg(p.text_dim)),
        ])
    } else {
        Line::from(vec![
            Span::styled("s", Style::default().fg(p.accent)),
            Span::styled(" save to contacts", Style::default().fg(p.text_dim)),
        ])
    };
    let state = match profile.last_error.as_deref() {
        Some(err) => {
            let mut spans = vec![Tag::new("error", Tone::Danger).span(p), Span::raw(" ")];
            spans.push(Span::styled(err, Style::default().fg(p.danger)));
            Line::from(spans)
        }
        None => state,
    };
    f.render_widget(Paragraph::new(state), chunks[2]);
}

fn draw_projects(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50), // Project list
            Constraint::Percentage(50), // Members
        ])
        .split(area);

    let page = &app.projects;
    let filter = page.filter.map(|s| s.as_str()).unwrap_or("all");
    let title = format!("Projects ({})", filter);
    let block = page_block(&title, p);

    let visible = page.visible();
    let rows: Vec<Row> = if !page.loaded && page.last_error.is_none() {
        vec![Row::new(vec![Span::styled(
            format!("  {} Loading...", Loader::frame(app.tick)),
            Style::default().fg(p.text_dim),
        )])]
    } else if visible.is_empty() {
        vec![Row::new(vec![Span::styled(
            "  No projects",
            Style::default().fg(p.text_dim),
        )])]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(i, project)| {
                let row_style = if i == page.selected {
                    Style::default().bg(p.bg_selected).fg(p.text)
                } else {
                    Style::default()
                };
                let members = project
                    .member_count
                    .map(|n| n.to_string())
                    .unwrap_or_default();

                Row::new(vec![
                    Line::from(Span::styled(project.name.as_str(), Style::default().fg(p.text))),
                    Line::from(Tag::new(project.status.as_str(), project.status.into()).span(p)),
                    Line::from(Span::styled(members, Style::default().fg(p.text_dim))),
                ])
                .style(row_style)
            })
            .collect()
    };

    let header = Row::new(vec![
        Span::styled("Name", Style::default().fg(p.header)),
        Span::styled("Status", Style::default().fg(p.header)),
        Span::styled("Members", Style::default().fg(p.header)),
    ]);
    let widths = [
        Constraint::Percentage(55),
        Constraint::Percentage(28),
        Constraint::Percentage(17),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, chunks[0]);

    draw_project_detail(f, app, p, chunks[1]);
}

fn draw_project_detail(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Members ", Style::default().fg(p.inactive)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.inactive));

    let Some(detail) = app.projects.detail.as_ref() else {
        let help = Paragraph::new("Press Enter to load members")
            .style(Style::default().fg(p.text_dim))
            .block(block);
        f.render_widget(help, area);
        return;
    };

    let t = Typography::new(p);
    let mut lines = vec![Line::from(t.heading(detail.project.name.as_str()))];
    if let Some(desc) = detail.project.description.as_deref() {
        lines.push(Line::from(t.caption(desc)));
    }
    lines.push(Line::from(""));

    for member in &detail.members {
        let mut spans = vec![
            Tag::new(member.role.as_str(), member.role.into()).span(p),
            Span::raw(" "),
            t.body(member.display_name()),
        ];
        if let Some(subtitle) = member.card.as_ref().and_then(|c| c.display_subtitle()) {
            spans.push(t.caption(format!("  {}", subtitle)));
        }
        lines.push(Line::from(spans));
    }

    let active = detail.active_members().count();
    lines.push(Line::from(""));
    lines.push(Line::from(t.caption(format!(
        "{} active, {} pending",
        active,
        detail.members.len() - active
    ))));

    let body = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn draw_my_card(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let page = &app.my_card;
    let title = if page.editing { "My card (editing)" } else { "My card" };
    let block = page_block(title, p);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !page.loaded && page.last_error.is_none() {
        f.render_widget(
            Loader {
                label: "Loading your card...",
                tick: app.tick,
                palette: p,
            },
            inner,
        );
        return;
    }

    let mut constraints: Vec<Constraint> = page.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(1)); // Completeness
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, input) in page.fields.iter().enumerate() {
        f.render_widget(
            TextInputView {
                input,
                palette: p,
                focused: i == page.focused,
            },
            chunks[i],
        );
    }

    if let Some(card) = page.card.as_ref() {
        f.render_widget(
            ProgressBar {
                label: "Complete",
                percent: card.completeness(),
                palette: p,
            },
            chunks[page.fields.len()],
        );
    }
}

fn draw_footer(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let hints: Vec<(&str, &str)> = if app.is_editing() {
        vec![("Tab", "Next"), ("Enter", "Save"), ("Esc", "Done")]
    } else {
        match app.page {
            Page::Profile => vec![("s", "Save"), ("x", "Remove"), ("r", "Reload"), ("Tab", "Page")],
            Page::Projects => vec![("↑↓", "Nav"), ("Enter", "Members"), ("f", "Filter"), ("Tab", "Page")],
            Page::MyCard => vec![("↑↓", "Field"), ("e", "Edit"), ("s", "Save"), ("Tab", "Page")],
        }
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 2 } else { hints.len() };

    let mut spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(p.accent)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(p.text_dim)),
            ]
        })
        .collect();
    spans.push(Span::styled("t", Style::default().fg(p.accent)));
    spans.push(Span::styled(
        format!(" Theme: {} │ ", app.theme.get()),
        Style::default().fg(p.text_dim),
    ));
    spans.push(Span::styled("?", Style::default().fg(p.accent)));
    spans.push(Span::styled(" Help", Style::default().fg(p.text_dim)));

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, p: &Palette) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("═══ {} ═══", title),
            Style::default().fg(p.header).add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |key: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(p.accent)),
            Span::styled(text, Style::default().fg(p.text)),
        ])
    };

    let help_text = vec![
        section("Navigation"),
        entry("Tab", "Next page (Profile → Projects → My card)"),
        entry("↑/↓ j/k", "Move in lists and forms"),
        entry("r", "Reload current page"),
        Line::from(""),
        section("Contacts"),
        entry("s", "Save shown profile to contacts"),
        entry("x", "Remove from contacts"),
        Line::from(""),
        section("Projects"),
        entry("f", "Cycle status filter"),
        entry("Enter", "Load members of selected project"),
        Line::from(""),
        section("My card"),
        entry("e/Enter", "Edit fields"),
        entry("Enter", "Save while editing"),
        entry("Esc", "Stop editing"),
        Line::from(""),
        section("Theme"),
        entry("t", "Toggle light/dark"),
        entry("L / D", "Light / dark"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(p.text_dim)),
            Span::styled("?", Style::default().fg(p.accent)),
            Span::styled("/", Style::default().fg(p.text_dim)),
            Span::styled("Esc", Style::default().fg(p.accent)),
            Span::styled(" to close", Style::default().fg(p.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .style(p.base())
        .block(
            Block::default()
                .title(Span::styled(" picaton Help ", Style::default().fg(p.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App, p: &Palette) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let name = app
        .profile
        .as_ref()
        .and_then(|pr| pr.card.as_ref())
        .map(|c| c.name.as_str())
        .unwrap_or("this user");

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Remove {} from contacts?", name),
            Style::default().fg(p.warning),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(p.success).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(p.danger).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .style(p.base())
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(p.warning)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.warning)),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
    use crate::config::AppConfig;
    use crate::theme::store::MemorySlot;
    use crate::theme::{ThemePreference, ThemeStore};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> (String, ratatui::buffer::Buffer) {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text = buffer.content().iter().map(|c| c.symbol()).collect();
        (text, buffer)
    }

    fn app() -> App {
        let config = AppConfig {
            user_id: Some("me".to_string()),
            ..Default::default()
        };
        let theme = ThemeStore::new(Box::new(MemorySlot::with_value("light")), &None::<bool>);
        App::new(config, theme, None).unwrap()
    }

    #[test]
    fn test_root_uses_theme_background() {
        let mut app = app();
        let (text, buffer) = screen(&app);
        assert!(text.contains("Theme: light"));
        assert_eq!(buffer[(0, 0)].bg, Palette::light().bg);

        app.theme.set(ThemePreference::Dark);
        let (text, buffer) = screen(&app);
        assert!(text.contains("Theme: dark"));
        assert_eq!(buffer[(0, 0)].bg, Palette::dark().bg);
    }

    #[test]
    fn test_help_popup_renders() {
        let mut app = app();
        app.popup = Popup::Help;
        let (text, _) = screen(&app);
        assert!(text.contains("Toggle light/dark"));
    }
}
