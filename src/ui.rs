//! Terminal UI rendering with ratatui

use crate::board::{Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::effects::Effects;
use crate::game::{Phase, Snapshot};
use crate::piece::Piece;
use crate::settings::{Keys, Settings};
use crate::tetromino::MAX_SHAPE_SIZE;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;

const EMPTY: &str = "  ";

/// Total width needed: board(22) + next/stats(18) = 40
const GAME_WIDTH: u16 = 40;
/// Total height needed: board(20) + 2 for borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Render one frame of the game
pub fn render_game(
    frame: &mut Frame,
    snap: &Snapshot,
    effects: &Effects,
    settings: &Settings,
    now: Instant,
) {
    let area = frame.area();
    let block_char = settings.visual.block_chars();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2), // Board
            Constraint::Length(18),                         // Next + stats
        ])
        .split(game_area);

    let board_inner = render_board(frame, main_layout[0], snap, block_char);
    if settings.visual.effects {
        render_sparks(frame, board_inner, effects, now);
    }

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MAX_SHAPE_SIZE as u16 + 2), // Next piece
            Constraint::Min(8),                            // Stats
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], snap.next.as_ref(), block_char);
    render_stats(frame, right_layout[1], snap, settings.best_score());

    let start = key_label(&settings.keys.start);
    match snap.phase {
        Phase::Idle => {
            render_overlay(frame, area, "BLOCKFALL", &format!("Press {} to start", start))
        }
        Phase::Paused => {
            let pause = key_label(&settings.keys.pause);
            render_overlay(frame, area, "PAUSED", &format!("Press {} to resume", pause))
        }
        Phase::GameOver => render_overlay(
            frame,
            area,
            "GAME OVER",
            &format!("Score {} - {}", snap.score, start),
        ),
        Phase::Running => {}
    }
}

/// First key bound to an action, as shown in hints
fn key_label(keys: &Keys) -> String {
    match keys.names().first() {
        Some(name) if name.chars().count() == 1 => name.to_uppercase(),
        Some(name) => name.clone(),
        None => "?".to_string(),
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the board with the falling piece; returns the area inside the border
fn render_board(frame: &mut Frame, area: Rect, snap: &Snapshot, block_char: &str) -> Rect {
    let border = if snap.paused { Color::DarkGray } else { Color::White };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let falling: Vec<(i32, i32)> = snap
        .current
        .as_ref()
        .map(|piece| piece.cells().collect())
        .unwrap_or_default();
    let falling_color = snap.current.map(|piece| piece.kind.color());

    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT);
    for (row, cells) in snap.board.rows().enumerate() {
        let spans: Vec<Span> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let is_falling = falling.contains(&(row as i32, col as i32));
                match (is_falling, falling_color, cell) {
                    (true, Some(color), _) => Span::styled(block_char, Style::default().fg(color)),
                    (_, _, Cell::Filled(kind)) => {
                        Span::styled(block_char, Style::default().fg(kind.color()))
                    }
                    _ => Span::raw(EMPTY),
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
    inner
}

/// Draw line-clear particles over the board
fn render_sparks(frame: &mut Frame, board: Rect, effects: &Effects, now: Instant) {
    let buf = frame.buffer_mut();
    for spark in effects.sparks(now) {
        if spark.row < 0.0 || spark.col < 0.0 {
            continue;
        }
        // Each board cell is two terminal columns wide
        let x = (spark.col * 2.0) as u16;
        let y = spark.row as u16;
        if x >= board.width || y >= board.height {
            continue;
        }
        let symbol = if spark.age < 0.5 { "*" } else { "·" };
        if let Some(cell) = buf.cell_mut((board.x + x, board.y + y)) {
            cell.set_symbol(symbol).set_fg(spark.kind.color());
        }
    }
}

/// Render the next piece, centered in a 4x4 box
fn render_next(frame: &mut Frame, area: Rect, next: Option<&Piece>, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };

    let offset = (MAX_SHAPE_SIZE - piece.shape.size()) / 2;
    let style = Style::default().fg(piece.kind.color());
    let lines: Vec<Line> = (0..MAX_SHAPE_SIZE)
        .map(|row| {
            let spans: Vec<Span> = (0..MAX_SHAPE_SIZE)
                .map(|col| {
                    let filled = row >= offset
                        && col >= offset
                        && piece.shape.is_filled(row - offset, col - offset);
                    if filled {
                        Span::styled(block_char, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snap: &Snapshot, best: Option<u64>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));

    let mut lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            format!("{}", snap.score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        label("LEVEL"),
        Line::from(Span::styled(
            format!("{}", snap.level),
            Style::default().fg(Color::Cyan),
        )),
        label("LINES"),
        Line::from(Span::styled(
            format!("{}", snap.lines),
            Style::default().fg(Color::Green),
        )),
        label("GRAVITY"),
        Line::from(format!("{}ms", snap.drop_interval.as_millis())),
    ];

    if let Some(best) = best {
        lines.push(label("BEST"));
        lines.push(Line::from(Span::styled(
            format!("{}", best),
            Style::default().fg(Color::Magenta),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for start/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 26u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(snap: &Snapshot) -> String {
        draw_with(snap, &Settings::default())
    }

    fn draw_with(snap: &Snapshot, settings: &Settings) -> String {
        let backend = TestBackend::new(60, 26);
        let mut terminal = Terminal::new(backend).unwrap();
        let effects = Effects::new();
        terminal
            .draw(|frame| render_game(frame, snap, &effects, settings, Instant::now()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_idle_overlay() {
        let game = Game::with_seed(5);
        let screen = draw(&game.snapshot());
        assert!(screen.contains("Press Enter to start"));
    }

    #[test]
    fn test_running_shows_stats_and_piece() {
        let mut game = Game::with_seed(5);
        game.start();
        let screen = draw(&game.snapshot());
        assert!(screen.contains("SCORE"));
        assert!(screen.contains("NEXT"));
        assert!(screen.contains("█"));
        assert!(!screen.contains("PAUSED"));
    }

    #[test]
    fn test_paused_overlay() {
        let mut game = Game::with_seed(5);
        game.start();
        game.set_paused(true);
        let screen = draw(&game.snapshot());
        assert!(screen.contains("PAUSED"));
        assert!(screen.contains("Press P to resume"));
    }

    #[test]
    fn test_overlay_hints_follow_bindings() {
        let mut settings = Settings::default();
        settings.keys.pause = ["Tab", "p"].as_slice().into();
        settings.keys.start = "s".into();

        let mut game = Game::with_seed(5);
        assert!(draw_with(&game.snapshot(), &settings).contains("Press S to start"));

        game.start();
        game.set_paused(true);
        let screen = draw_with(&game.snapshot(), &settings);
        assert!(screen.contains("Press Tab to resume"));
    }

    #[test]
    fn test_key_label() {
        assert_eq!(key_label(&"Enter".into()), "Enter");
        assert_eq!(key_label(&["x", "Up"].as_slice().into()), "X");
        assert_eq!(key_label(&Keys::Many(Vec::new())), "?");
    }

    #[test]
    fn test_center_rect_clamps() {
        let area = Rect::new(0, 0, 10, 10);
        let rect = center_rect(area, 20, 4);
        assert_eq!(rect, Rect::new(0, 3, 10, 4));
    }
}
