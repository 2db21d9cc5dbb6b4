//! App: terminal init, main loop, tick, key and mouse handling.

use crate::GameConfig;
use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};
use tachyonfx::Effect;

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    last_tick: Instant,
    tick_interval: Duration,
    /// TachyonFX fade for the win/lose banner (created when the game is
    /// decided, dropped on reset).
    banner_effect: Option<Effect>,
    banner_effect_time: Option<Instant>,
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Result<Self> {
        let size = config.size.max(2);
        let state = GameState::new(size as usize, config.cell_size, make_rng(config.seed));
        let tick_interval = Duration::from_secs_f64(1.0 / config.tick_rate.clamp(1.0, 240.0));
        Ok(Self {
            config,
            theme,
            state,
            last_tick: Instant::now(),
            tick_interval,
            banner_effect: None,
            banner_effect_time: None,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                size,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        // Shrink the board when the terminal cannot show the requested size.
        let (term_cols, term_rows) = size()?;
        let fit = crate::ui::max_board_size_for_terminal(term_cols, term_rows);
        let wanted = self.config.size.min(fit).max(2);
        if wanted as usize != self.state.board.size() {
            self.state = GameState::new(
                wanted as usize,
                self.config.cell_size,
                make_rng(self.config.seed),
            );
        }
        if self.config.no_start {
            self.state.start();
        }

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    f.area(),
                    &mut self.banner_effect,
                    &mut self.banner_effect_time,
                    now,
                );
            })?;

            let timeout = self.tick_interval.saturating_sub(self.last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match key_to_action(key) {
                            Action::Quit => return Ok(()),
                            Action::Start => self.state.start(),
                            Action::Reset => {
                                self.state.reset();
                                self.banner_effect = None;
                                self.banner_effect_time = None;
                            }
                            Action::None => {}
                        }
                    }
                    Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                        self.click_at(terminal, mouse.column, mouse.row)?;
                    }
                    _ => {}
                }
            }
            if self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                self.state.tick();
            }
        }
    }

    /// Map a terminal mouse position into board pixel space and forward it.
    /// Clicks outside the board resolve to nothing and are dropped here.
    fn click_at(&mut self, terminal: &DefaultTerminal, column: u16, row: u16) -> Result<()> {
        let term = terminal.size()?;
        let area = Rect::new(0, 0, term.width, term.height);
        let inner = crate::ui::board_inner_area(area, self.state.board.size() as u16);
        if !inner.contains(Position::new(column, row)) {
            return Ok(());
        }
        let col = (column - inner.x) / crate::ui::CELL_COLS;
        let row = row - inner.y;
        let cs = i32::from(self.state.board.cell_size());
        let x = i32::from(col) * cs + (cs + 1) / 2;
        let y = i32::from(row) * cs + (cs + 1) / 2;
        self.state.click(x, y);
        Ok(())
    }
}
