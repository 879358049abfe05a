//! Help tab view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "═══ Navigation ═══",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("1-6", "Jump to tab (Build/Forms/Loadout/Calc/Mechanics/Help)"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Navigate lists / scroll"),
        key_line("q / Ctrl+C", "Quit"),
        key_line("?", "Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Build ═══",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("←/→", "Change race/subrace, level or points by one"),
        key_line("Enter", "Type a level or point value"),
        key_line("m", "Put all free points into the selected stat"),
        key_line("r", "Reset level, points, forms and loadout"),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Forms & Loadout ═══",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("←/→ (Forms)", "Pick mastery tier"),
        key_line("Enter / Space", "Toggle form / equip entry"),
        key_line("c", "Clear all forms"),
        key_line("←/→ (Loadout)", "Switch between slots and catalog"),
        key_line("u", "Unequip selected slot"),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Sharing ═══",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("s", "Show a share link for this build"),
        Line::from(format!("  Links use {}", app.share_base)),
        Line::from("  Start with a code or link as the first argument to load it"),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Game Mechanics ═══",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Forms:", Style::default().fg(Color::Yellow))),
        Line::from("  Applied in the order they were switched on"),
        Line::from("  Only one non-stackable form at a time"),
        Line::from(""),
        Line::from(Span::styled("Mastery:", Style::default().fg(Color::Yellow))),
        Line::from("  Scales flat bonuses; multipliers stay fixed"),
        Line::from(""),
        Line::from(Span::styled("Majin / Tuffle:", Style::default().fg(Color::Yellow))),
        Line::from("  Absorb adds a clone or NPC stat block"),
        Line::from("  Possession adds 10% of the body's non-pool stats"),
        Line::from("  A possessed body lends its forms"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help & Mechanics "));

    f.render_widget(paragraph, area);
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:20}", key),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
