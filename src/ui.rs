//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - Tab header
//! - Allele selectors and result panels on the analysis tab
//! - Acetylator bar chart and genotype table on the population tab
//! - Background text on the information tab
//! - Status bar and help overlay

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::allele::{Allele, Position};
use crate::model::{AppMode, AppState, Tab};
use crate::reference::{all_genotypes, frequency_by_acetylator, AcetylatorType};
use crate::report::INFORMATION;
use crate::resolver::Analysis;

/// Height of the tab header (including borders).
const HEADER_HEIGHT: u16 = 3;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;
/// Width of the allele form panel.
const FORM_WIDTH: u16 = 30;

const HELP_LINES: &[&str] = &[
    "Tab / Shift+Tab   switch tabs (or 1, 2, 3)",
    "j / k             select position",
    "h / l             cycle allele",
    ". a c g t         set allele",
    "Enter             generate recommendations",
    "r                 reset to wild type",
    ":282=T,590=A      set calls and generate",
    ":q                quit",
    "",
    "Press any key to close",
];

/// Display color for an allele call.
pub fn allele_color(allele: Allele) -> Color {
    match allele {
        Allele::A => Color::Red,
        Allele::C => Color::Green,
        Allele::G => Color::Yellow,
        Allele::T => Color::Blue,
        Allele::Wild => Color::DarkGray,
    }
}

/// Display color for an acetylator class.
pub fn acetylator_color(acetylator: Option<AcetylatorType>) -> Color {
    match acetylator {
        Some(AcetylatorType::Fast) => Color::Green,
        Some(AcetylatorType::Intermediate) => Color::Yellow,
        Some(AcetylatorType::Slow) => Color::Red,
        None => Color::Gray,
    }
}

/// Per-class bar values in tenths of a percent.
///
/// Bars take integer values, so `15.8%` becomes `158`.
pub fn acetylator_bar_values() -> [(AcetylatorType, u64); 3] {
    frequency_by_acetylator().map(|(class, total)| (class, (total * 10.0).round() as u64))
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);

    render_tabs(frame, state, main_layout[0]);
    match state.tab {
        Tab::Analysis => render_analysis_tab(frame, state, main_layout[1]),
        Tab::Population => render_population_tab(frame, main_layout[1]),
        Tab::Information => render_information_tab(frame, main_layout[1]),
    }
    render_status_bar(frame, state, main_layout[2]);

    if state.show_help {
        render_help(frame, area);
    }
}

fn render_tabs(frame: &mut Frame, state: &AppState, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("NAT2 Genotype Analysis for Isoniazid Therapy"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_analysis_tab(frame: &mut Frame, state: &AppState, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(20)])
        .split(area);

    render_form(frame, state, layout[0]);
    match &state.analysis {
        Some(analysis) => render_result(frame, analysis, layout[1]),
        None => {
            let hint = Paragraph::new(vec![
                Line::from("Select the observed allele at each position,"),
                Line::from("then press Enter to generate recommendations."),
            ])
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Recommendations"))
            .wrap(Wrap { trim: true });
            frame.render_widget(hint, layout[1]);
        }
    }
}

/// Renders the six position selectors.
fn render_form(frame: &mut Frame, state: &AppState, area: Rect) {
    let selected = state.selected_position();
    let mut lines: Vec<Line> = Vec::new();

    for position in Position::ALL {
        let allele = state.observed.get(position);
        let is_selected = position == selected;

        let label_style = if is_selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let marker = if is_selected { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{}Position {}", marker, position), label_style),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", allele.symbol()),
                Style::default().fg(Color::Black).bg(allele_color(allele)),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let block = Block::default().borders(Borders::ALL).title("Patient Genotype");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders genotype, phenotype and dosing guidance.
fn render_result(frame: &mut Frame, analysis: &Analysis, area: Rect) {
    let call = &analysis.call;
    let rec = analysis.recommendation;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Genotype: ", bold),
            Span::styled(call.label(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Acetylator Status: ", bold),
            Span::styled(
                call.acetylator_label(),
                Style::default().fg(acetylator_color(call.acetylator())),
            ),
        ]),
        Line::from(vec![
            Span::styled("Population Frequency: ", bold),
            Span::raw(format!("{:.1}%", call.frequency())),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Recommended Dose: ", bold),
            Span::styled(rec.dose, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::styled("Risk Assessment: ", bold),
            Span::styled(rec.risk, Style::default().fg(Color::Red)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Clinical Recommendations", bold.fg(Color::Cyan))),
        Line::from(rec.details),
        Line::from(vec![Span::styled("Monitoring Plan: ", bold), Span::raw(rec.monitoring)]),
    ];

    let block = Block::default().borders(Borders::ALL).title("Recommendations");
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_population_tab(frame: &mut Frame, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(5)])
        .split(area);

    let bars: Vec<Bar> = acetylator_bar_values()
        .into_iter()
        .map(|(class, tenths)| {
            Bar::default()
                .value(tenths)
                .text_value(format!("{:.1}%", tenths as f64 / 10.0))
                .label(Line::from(class.as_str()))
                .style(Style::default().fg(acetylator_color(Some(class))))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Acetylator Type Distribution (%)"),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(14)
        .bar_gap(3);
    frame.render_widget(chart, layout[0]);

    let header = Row::new(vec!["Genotype", "Acetylator Type", "Frequency"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = all_genotypes()
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.label),
                Cell::from(record.acetylator.as_str())
                    .style(Style::default().fg(acetylator_color(Some(record.acetylator)))),
                Cell::from(format!("{:.1}%", record.frequency)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(14), Constraint::Length(18), Constraint::Length(10)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Genotype Frequency Distribution"),
    );
    frame.render_widget(table, layout[1]);
}

fn render_information_tab(frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for (heading, paragraphs) in INFORMATION {
        lines.push(Line::from(Span::styled(
            *heading,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for paragraph in *paragraphs {
            lines.push(Line::from(*paragraph));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("About NAT2 Testing"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, command_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", String::new()),
        AppMode::Command(cmd) => ("COMMAND", format!(":{}", cmd)),
    };

    let position_info = format!(
        "Pos {} | {} variant(s) ",
        state.selected_position(),
        state.observed.variant_count()
    );

    let message = state.status_message.as_deref().unwrap_or("? for help");

    let left_content = if command_str.is_empty() {
        format!(" {} | {} ", mode_str, message)
    } else {
        format!(" {} | {} ", mode_str, command_str)
    };

    let left_len = left_content.chars().count();
    let status_line = Line::from(vec![
        Span::styled(
            left_content,
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.len())),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Returns a rectangle of at most `width` x `height` centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, HELP_LINES.len() as u16 + 2, area);
    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(Clear, popup);
    frame.render_widget(help, popup);
}
