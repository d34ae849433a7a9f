pub mod projection;
pub mod scoreboard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

use crate::{
    app::{App, AppState, MAX_INPUT_CHARS},
    leaderboard::ScoreStore,
    match_state::{MatchStatus, MISS_LIMIT},
};

use self::projection::{project, urgency_color, visible_slice};
use self::scoreboard::{row_cells, HEADERS};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl<S: ScoreStore> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Playing => render_playing(self, area, buf),
            AppState::GameOver => render_game_over(self, area, buf),
        }
    }
}

fn render_playing<S: ScoreStore>(app: &App<S>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim_style)
        .title(Span::styled(" stantyper ", bold_style));
    let field_area = block.inner(chunks[0]);
    block.render(chunks[0], buf);

    let session = &app.session;
    if !field_area.is_empty() {
        for slot in session.pool().slots().iter().filter(|s| s.is_live()) {
            let cell = project(&slot.bounds, &session.field, field_area);
            let Some((col, text)) = visible_slice(&slot.text, cell.col, field_area.width) else {
                continue;
            };
            let style = bold_style.fg(urgency_color(slot.bounds.x, &session.field));
            buf.set_string(field_area.x + col, field_area.y + cell.row, text, style);
        }
    }

    let state = session.match_state();
    let input = format!("{:<width$}", app.input, width = MAX_INPUT_CHARS);
    let status = Line::from(vec![
        Span::styled(format!("[{input}]"), bold_style.fg(Color::Cyan)),
        Span::raw(format!("  Missed: {}/{}", state.missed_count, MISS_LIMIT)),
        Span::raw(format!("  Score: {}", state.score)),
        Span::raw(format!(
            "  Words: {}/{}",
            state.words_finished,
            state.total_words()
        )),
        Span::styled(format!("  Time: {:.1}s", state.elapsed_secs), dim_style),
    ]);
    Paragraph::new(status).render(chunks[1], buf);
}

fn render_game_over<S: ScoreStore>(app: &App<S>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let header_style = bold_style.fg(Color::LightYellow);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // banner
            Constraint::Length(1), // score and wpm
            Constraint::Length(1), // warnings
            Constraint::Length(1), // padding
            Constraint::Min(1),    // top scores
            Constraint::Length(1), // legend
        ])
        .split(area);

    let status = app.session.status();
    let banner_color = if status == MatchStatus::Won {
        Color::Green
    } else {
        Color::Red
    };
    Paragraph::new(Span::styled(status.to_string(), bold_style.fg(banner_color)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let state = app.session.match_state();
    Paragraph::new(Span::styled(
        format!("Score: {}   WPM: {}", state.score, state.wpm()),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let warning = [app.session.save_warning(), app.board_warning.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("; ");
    if !warning.is_empty() {
        Paragraph::new(Span::styled(warning, italic_style.fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    let rows = app
        .top_scores
        .iter()
        .map(|record| Row::new(row_cells(record)));
    let widths = [
        Constraint::Length(22),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(10),
    ];
    Table::new(rows, widths)
        .header(Row::new(HEADERS).style(header_style))
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(r)estart / (q)uit / (esc)ape",
        italic_style,
    ))
    .render(chunks[5], buf);
}
