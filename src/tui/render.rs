use super::state::{AppState, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use swiftgg_reader::site::sponsors::SponsorLevel;
use swiftgg_reader::wordpress::types::strip_html;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw(f: &mut Frame, state: &AppState, spinner_frame: u8) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_tabs(f, state, chunks[0]);
    match state.tab {
        Tab::Posts => draw_posts(f, state, chunks[1]),
        Tab::Sponsors => draw_sponsors(f, state, chunks[1]),
        Tab::Contributors => draw_contributors(f, state, chunks[1]),
        Tab::Guide => draw_guide(f, state, chunks[1]),
    }
    draw_status(f, state, chunks[2], spinner_frame);
    draw_footer(f, chunks[3]);
}

fn draw_tabs(f: &mut Frame, state: &AppState, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" SwiftGG "));
    f.render_widget(tabs, area);
}

/// Window `lines` so the line at `cursor` stays visible.
fn window(lines: Vec<Line<'_>>, cursor: usize, area: Rect) -> Paragraph<'_> {
    let visible = area.height.saturating_sub(2) as usize;
    let offset = cursor.saturating_sub(visible.saturating_sub(1).max(1));
    let shown: Vec<Line> = lines.into_iter().skip(offset).collect();
    Paragraph::new(shown)
}

fn draw_posts(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::with_capacity(state.feed.items.len());
    for (i, post) in state.feed.items.iter().enumerate() {
        let selected = i == state.post_selected;
        let marker = if selected { "> " } else { "  " };
        let title_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(strip_html(&post.title.rendered), title_style),
            Span::styled(
                format!("  [{}]", post.sub_category(state.root_category)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("  {}", post.time_ago()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    if lines.is_empty() && !state.feed.is_loading() {
        let hint = if state.feed.load_failed {
            "Nothing loaded. Press R to retry."
        } else {
            "No posts."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Posts ");
    f.render_widget(window(lines, state.post_selected, area).block(block), area);
}

fn draw_sponsors(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for level in SponsorLevel::ALL {
        let tier: Vec<_> = state
            .sponsors
            .sponsors
            .iter()
            .filter(|s| s.level == level)
            .collect();
        if tier.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            level.display_name(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
        for sponsor in tier {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}", sponsor.name)),
                Span::styled(
                    format!("  {}", sponsor.website_url),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    if lines.is_empty() && !state.sponsors.is_loading {
        lines.push(Line::from(Span::styled(
            "No sponsors.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Sponsors ");
    f.render_widget(window(lines, state.sponsor_scroll, area).block(block), area);
}

fn draw_contributors(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for contributor in &state.contributors.contributors {
        let mut spans = vec![
            Span::styled(
                contributor.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", contributor.role),
                Style::default().fg(Color::Cyan),
            ),
        ];
        if let Some(url) = &contributor.url {
            spans.push(Span::styled(
                format!("  {}", url),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }

    if lines.is_empty() && !state.contributors.is_loading {
        lines.push(Line::from(Span::styled(
            "No contributors.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Contributors ");
    f.render_widget(
        window(lines, state.contributor_scroll, area).block(block),
        area,
    );
}

fn draw_guide(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for chapter in &state.chapters {
        lines.push(Line::from(Span::styled(
            chapter.title,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
        for section in &chapter.sections {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}", section.title)),
                Span::styled(
                    format!("  {}", section.url),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    let block = Block::default().borders(Borders::ALL).title(" Swift Guide ");
    f.render_widget(window(lines, state.guide_scroll, area).block(block), area);
}

fn draw_status(f: &mut Frame, state: &AppState, area: Rect, spinner_frame: u8) {
    let spinner = SPINNER_FRAMES[spinner_frame as usize % SPINNER_FRAMES.len()];
    let line = match state.tab {
        Tab::Posts => {
            if state.feed.is_loading_initial {
                Line::from(format!(" {} Loading posts…", spinner))
            } else if state.feed.is_loading_more {
                Line::from(format!(" {} Loading more…", spinner))
            } else if state.feed.load_failed {
                let detail = state.feed_error.as_deref().unwrap_or("load failed");
                Line::from(Span::styled(
                    format!(" ✗ {} — press R to retry", detail),
                    Style::default().fg(Color::Red),
                ))
            } else if !state.feed.has_more_pages {
                Line::from(Span::styled(
                    format!(" {} posts · end of feed", state.feed.items.len()),
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                Line::from(format!(
                    " {} posts · page {}",
                    state.feed.items.len(),
                    state.feed.current_page
                ))
            }
        }
        Tab::Sponsors => service_status(
            spinner,
            state.sponsors.is_loading,
            state.sponsors.error.as_deref(),
            state.sponsors.sponsors.len(),
            "sponsors",
        ),
        Tab::Contributors => service_status(
            spinner,
            state.contributors.is_loading,
            state.contributors.error.as_deref(),
            state.contributors.contributors.len(),
            "contributors",
        ),
        Tab::Guide => Line::from(format!(" {} chapters", state.chapters.len())),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn service_status<'a>(
    spinner: char,
    is_loading: bool,
    error: Option<&'a str>,
    count: usize,
    noun: &'a str,
) -> Line<'a> {
    if is_loading {
        Line::from(format!(" {} Loading {}…", spinner, noun))
    } else if let Some(err) = error {
        Line::from(Span::styled(
            format!(" ✗ {} — press r to reload", err),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(format!(" {} {}", count, noun))
    }
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q quit · tab/shift-tab switch · j/k move · r refresh · R retry",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(footer, area);
}
