//! floodtui — Flood-It puzzle game in the terminal.

mod app;
mod board;
mod game;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that shape a game (board size, pacing, seeding).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub size: u16,
    pub cell_size: u16,
    pub tick_rate: f64,
    pub seed: Option<u64>,
    pub no_start: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        size: args.size,
        cell_size: board::CELL_SIZE,
        tick_rate: args.tick_rate,
        seed: args.seed,
        no_start: args.no_start,
    };
    let mut app = App::new(config, theme)?;
    app.run()?;
    Ok(())
}

/// Flood-It puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "floodtui",
    version,
    about = "Flood-It puzzle in the terminal. Click a colour to flood the board from the top-left corner before the moves run out.",
    long_about = "floodtui is a terminal take on the classic Flood-It puzzle.\n\n\
        The board starts as random noise with the top-left cell flooded. Clicking a colour \
        turns the whole flooded region that colour and absorbs every touching cell that \
        matches. Flood the full board within the move budget to win.\n\n\
        CONTROLS:\n  Mouse click  Choose a colour   Enter    Start\n  R            New board         Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme), --seed for a \
        reproducible board."
)]
pub struct Args {
    /// Board side length in cells (the board is N×N). Clamped so the board fits the terminal.
    #[arg(short, long, default_value_t = board::BOARD_SIZE, value_name = "N")]
    pub size: u16,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Logic ticks per second (flood reveal pacing and timer refresh).
    #[arg(long, default_value = "20.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Seed for board generation (reproducible boards).
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Skip the start screen and begin playing immediately.
    #[arg(long)]
    pub no_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
