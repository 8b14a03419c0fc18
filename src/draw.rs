use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use nrl_api::config::Config;
use nrl_api::session::Source;
use nrl_api::{MatchRecord, MatchStatus, TeamSide};

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 5 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }
        draw_matches(f, layout.main, app);
        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.state.last_error.is_some() && app.state.matches.is_empty() {
        " NRL - Error "
    } else if !app.state.loaded {
        " NRL - Loading... "
    } else {
        " NRL Matches "
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(inner);

    let source = match app.state.source {
        _ if app.state.is_placeholder() => "Placeholder data".to_string(),
        Some(Source::Upstream { season, .. }) => format!("Season {season}"),
        _ => String::new(),
    };
    let config = &app.settings.config;
    f.render_widget(
        Paragraph::new(format!(
            "{} | {} | mode: {}",
            app.state.season_state.label(),
            source,
            config.mode.label()
        )),
        left,
    );

    let updated = app
        .state
        .last_updated
        .map(|t| format!("Updated {}  ", t.format("%H:%M:%S")))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(format!("{updated}r=refresh q=quit"))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        right,
    );
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let state = &app.state;
    if state.matches.is_empty() {
        let msg = if let Some(err) = state.last_error.as_deref() {
            format!("Error: {err}")
        } else if !state.loaded {
            "Loading NRL data...".to_string()
        } else {
            "No matches to show".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let config = &app.settings.config;
    let mut widths = vec![
        Constraint::Length(18),
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Fill(1),
    ];
    if config.show_venue {
        widths.push(Constraint::Fill(2));
    }

    let rows: Vec<Row> = state.matches.iter().map(|m| match_row(m, config)).collect();
    let [table_area, status_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(Table::new(rows, widths).column_spacing(2), table_area);

    // A failed cycle keeps the previous list on screen.
    if let Some(err) = state.last_error.as_deref() {
        f.render_widget(
            Paragraph::new(format!("Last refresh failed: {err}")).style(Style::default().fg(Color::Red)),
            status_area,
        );
    }
}

fn match_row<'a>(m: &MatchRecord, config: &Config) -> Row<'a> {
    let mut cells = vec![
        Cell::from(m.display_time.clone()),
        Cell::from(
            Line::from(team_label(&m.home_team, config.show_ladder_position))
                .alignment(Alignment::Right),
        ),
        Cell::from(Line::from(score_text(m, config)).alignment(Alignment::Center)),
        Cell::from(team_label(&m.away_team, config.show_ladder_position)),
    ];
    if config.show_venue {
        cells.push(Cell::from(format!("{} - {}", m.venue, m.round)));
    }
    Row::new(cells).style(row_style(m, config.colored))
}

/// "24 - 18" once a match has started and scores are shown, otherwise "vs".
pub fn score_text(m: &MatchRecord, config: &Config) -> String {
    match (m.home_team.score, m.away_team.score) {
        (Some(home), Some(away)) if config.show_scores && m.status.has_started() => {
            format!("{home} - {away}")
        }
        _ => "vs".to_string(),
    }
}

pub fn team_label(team: &TeamSide, show_ladder_position: bool) -> String {
    match team.ladder_position {
        Some(pos) if show_ladder_position => format!("{} ({pos})", team.name),
        _ => team.name.clone(),
    }
}

fn row_style(m: &MatchRecord, colored: bool) -> Style {
    if m.placeholder {
        return Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    }
    if !colored {
        return Style::default();
    }
    match m.status {
        MatchStatus::Live => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        MatchStatus::Completed => Style::default().fg(Color::Gray),
        MatchStatus::Cancelled => Style::default().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
        MatchStatus::Scheduled | MatchStatus::Unknown => Style::default().fg(Color::White),
    }
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 0, 1, 1)
    };
    f.render_widget(spinner, area);
}
