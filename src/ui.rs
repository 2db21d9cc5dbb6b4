//! Layout and drawing: start screen, board, sidebar, win/lose banner.

use crate::board::CellColor;
use crate::game::{GameState, Phase};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per board cell.
pub const CELL_COLS: u16 = 2;

const SIDEBAR_WIDTH: u16 = 22;

/// Duration of the win/lose banner fade-in in ms.
const BANNER_FADE_MS: u32 = 600;

/// Largest board side that fits the given terminal, border and sidebar
/// included. Used to clamp `--size` so the board is never cut off.
pub fn max_board_size_for_terminal(term_cols: u16, term_rows: u16) -> u16 {
    let w = term_cols.saturating_sub(2 + SIDEBAR_WIDTH) / CELL_COLS;
    let h = term_rows.saturating_sub(2);
    w.min(h)
}

/// Bordered board rect (board + sidebar centred as one group).
fn board_outer_area(area: Rect, size: u16) -> Rect {
    let w = size * CELL_COLS + 2;
    let h = size + 2;
    let total_w = w + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

/// Board rect without its border; also the mouse hit area.
pub fn board_inner_area(area: Rect, size: u16) -> Rect {
    let outer = board_outer_area(area, size);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (size * CELL_COLS).min(outer.width.saturating_sub(2)),
        height: size.min(outer.height.saturating_sub(2)),
    }
}

fn sidebar_rect(area: Rect, size: u16) -> Rect {
    let outer = board_outer_area(area, size);
    let x = outer.x + outer.width;
    Rect {
        x,
        y: outer.y,
        width: SIDEBAR_WIDTH.min((area.x + area.width).saturating_sub(x)),
        height: outer.height,
    }
}

/// Draw the current phase. `banner_effect` / `banner_time` carry the
/// fade-in across frames once the game is decided.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    banner_effect: &mut Option<Effect>,
    banner_time: &mut Option<Instant>,
    now: Instant,
) {
    match state.phase {
        Phase::StartScreen => draw_start_screen(frame, state, theme, area),
        Phase::Setup | Phase::Playing => {
            draw_board(frame, state, theme, area);
            draw_sidebar(frame, state, theme, area);
        }
        Phase::Won => {
            draw_board(frame, state, theme, area);
            draw_sidebar(frame, state, theme, area);
            draw_banner(
                frame,
                state,
                theme,
                area,
                " You Win! ",
                theme.cell_color(CellColor::Green.color_index()),
                banner_effect,
                banner_time,
                now,
            );
        }
        Phase::Lost => {
            draw_board(frame, state, theme, area);
            draw_sidebar(frame, state, theme, area);
            draw_banner(
                frame,
                state,
                theme,
                area,
                " You Lose! Press r to play again ",
                theme.cell_color(CellColor::Red.color_index()),
                banner_effect,
                banner_time,
                now,
            );
        }
    }
}

/// Swatch row of the six palette colours; the current flood colour is
/// backlit when `target` is given.
fn palette_strip(theme: &Theme, target: Option<CellColor>) -> Line<'static> {
    let mut spans = Vec::with_capacity(CellColor::ALL.len() * 2);
    for color in CellColor::ALL {
        let c = theme.cell_color(color.color_index());
        let style = if target == Some(color) {
            Style::default().fg(c).bg(theme.main_fg)
        } else {
            Style::default().fg(c)
        };
        spans.push(Span::styled("██", style));
        spans.push(Span::from(" "));
    }
    spans.pop();
    Line::from(spans)
}

fn draw_start_screen(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let popup_w = 46u16;
    let popup_h = 15u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };

    let title = Line::from(vec![
        Span::styled(
            " flood ",
            Style::default()
                .fg(theme.cell_color(CellColor::Red.color_index()))
                .bold(),
        ),
        Span::styled(" tui ", Style::default().fg(theme.main_fg).bold()),
    ]);

    let lines = vec![
        Line::from(""),
        title,
        Line::from(""),
        palette_strip(theme, None),
        Line::from(""),
        Line::from(Span::styled(
            "Click a colour to flood the board",
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            "outward from the top-left corner.",
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!("Flood everything within {} moves.", state.move_limit()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " ENTER  play ",
            Style::default().fg(Color::Black).bg(theme.title).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R  new board    Q  quit ",
            Style::default().fg(theme.inactive_fg),
        )),
    ];

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_board(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let size = state.board.size() as u16;
    let outer = board_outer_area(area, size);
    let inner = board_inner_area(area, size);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" floodtui ", Style::default().fg(theme.title)));
    block.render(outer, frame.buffer_mut());

    let revealed_now = state.animation_step();
    let buf = frame.buffer_mut();
    for (id, cell) in state.board.all_cells() {
        let (row, col) = state.board.pos(id);
        let rx = inner.x + col as u16 * CELL_COLS;
        let ry = inner.y + row as u16;
        if rx + CELL_COLS > inner.x + inner.width || ry >= inner.y + inner.height {
            continue;
        }
        let color = theme.cell_color(cell.color.color_index());
        // Cells still waiting on their reveal tick draw darkened; the cell
        // revealed this tick gets a one-frame shimmer.
        let (symbol, style) = if state.queue.is_pending(id) {
            (" ", Style::default().bg(dimmed(color)))
        } else if revealed_now == Some((row, col)) {
            ("░", Style::default().fg(dimmed(color)).bg(color))
        } else {
            (" ", Style::default().bg(color))
        };
        for dx in 0..CELL_COLS {
            buf[(rx + dx, ry)].set_symbol(symbol).set_style(style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let rect = sidebar_rect(area, state.board.size() as u16);
    if rect.width < 4 || rect.height < 3 {
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Fill(1),
        ])
        .split(rect);

    let palette_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Palette ", Style::default().fg(theme.title)));
    let palette_inner = palette_block.inner(chunks[0]);
    palette_block.render(chunks[0], frame.buffer_mut());
    Paragraph::new(palette_strip(theme, Some(state.target_color())))
        .render(palette_inner, frame.buffer_mut());

    let status = if state.is_won() {
        Span::styled(
            "You Win!",
            Style::default()
                .fg(theme.cell_color(CellColor::Green.color_index()))
                .bold(),
        )
    } else if state.is_lost() {
        Span::styled(
            "You Lose!",
            Style::default()
                .fg(theme.cell_color(CellColor::Red.color_index()))
                .bold(),
        )
    } else {
        Span::from("")
    };
    let stats_lines = vec![
        Line::from(Span::styled(
            format!("Moves {}/{}", state.move_count(), state.move_limit()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!("Time Elapsed {}", format_elapsed(state.elapsed_millis())),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(status),
    ];
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Game ", Style::default().fg(theme.title)));
    let stats_inner = stats_block.inner(chunks[1]);
    stats_block.render(chunks[1], frame.buffer_mut());
    Paragraph::new(stats_lines).render(stats_inner, frame.buffer_mut());

    let hints = vec![
        Line::from(""),
        Line::from(Span::styled(
            " click  flood colour",
            Style::default().fg(theme.inactive_fg),
        )),
        Line::from(Span::styled(
            " r      new board",
            Style::default().fg(theme.inactive_fg),
        )),
        Line::from(Span::styled(
            " q      quit",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Paragraph::new(hints).render(chunks[2], frame.buffer_mut());
}

/// Banner overlay over the board once the game is decided, fading in via
/// TachyonFX. The effect is created on first draw and dropped on reset.
fn draw_banner(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    text: &str,
    accent: Color,
    banner_effect: &mut Option<Effect>,
    banner_time: &mut Option<Instant>,
    now: Instant,
) {
    let outer = board_outer_area(area, state.board.size() as u16);
    let w = (text.chars().count() as u16 + 2).min(area.width);
    let popup = Rect {
        x: outer.x + outer.width.saturating_sub(w) / 2,
        y: outer.y + outer.height.saturating_sub(3) / 2,
        width: w,
        height: 3u16.min(area.height),
    };
    let p = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(accent).bold(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());

    let delta = banner_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    *banner_time = Some(now);
    if banner_effect.is_none() {
        let effect = fx::fade_from(theme.bg, theme.bg, (BANNER_FADE_MS, Interpolation::Linear))
            .with_area(popup);
        *banner_effect = Some(effect);
    }
    if let Some(effect) = banner_effect {
        if !effect.done() {
            frame.render_effect(effect, popup, TfxDuration::from_millis(delta_ms));
        }
    }
}

/// Darkened variant of a cell colour for not-yet-revealed cells.
fn dimmed(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        _ => Color::DarkGray,
    }
}

/// MM:SS, zero-padded.
fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(9_999), "00:09");
        assert_eq!(format_elapsed(83_000), "01:23");
        assert_eq!(format_elapsed(3_600_000), "60:00");
    }

    #[test]
    fn test_board_geometry_fits_terminal() {
        let area = Rect::new(0, 0, 80, 24);
        let inner = board_inner_area(area, 22);
        assert_eq!(inner.width, 44);
        assert_eq!(inner.height, 22);
        assert_eq!(max_board_size_for_terminal(80, 24), 22);
        assert!(max_board_size_for_terminal(30, 10) < 22);
    }
}
