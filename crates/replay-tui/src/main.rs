mod app;
mod render;
mod theme;

use app::{App, AppAction};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use replay_core::{Board, Difficulty, Generator, ReplaySession, SolveReport, TracingSolver};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use theme::Theme;

/// Step through a constraint-propagation solver trace.
#[derive(Parser, Debug)]
#[command(name = "replay", version, about)]
struct Args {
    /// Difficulty of the generated puzzle (ignored with --puzzle or --import)
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Medium)]
    difficulty: DifficultyArg,

    /// Solve a specific puzzle: 81 characters, '.' or '0' for empty cells
    #[arg(short, long)]
    puzzle: Option<String>,

    /// Replay a previously exported trace instead of solving
    #[arg(short, long, conflicts_with_all = ["puzzle", "difficulty", "seed"])]
    import: Option<String>,

    /// Write the solved trace to a JSON file before replaying
    #[arg(short, long)]
    export: Option<String>,

    /// Seed for puzzle generation, for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Color theme
    #[arg(short, long, value_enum, default_value_t = ThemeArg::Dark)]
    theme: ThemeArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for DifficultyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifficultyArg::Easy => write!(f, "easy"),
            DifficultyArg::Medium => write!(f, "medium"),
            DifficultyArg::Hard => write!(f, "hard"),
        }
    }
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl std::fmt::Display for ThemeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeArg::Dark => write!(f, "dark"),
            ThemeArg::Light => write!(f, "light"),
        }
    }
}

/// On-disk format for `--export` / `--import`. The report alone is not
/// enough to replay: reconstruction needs the starting board.
#[derive(Serialize, Deserialize)]
struct SavedTrace {
    board: Board,
    report: SolveReport,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let session = match build_session(&args) {
        Ok(session) => session,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let theme = match args.theme {
        ThemeArg::Dark => Theme::dark(),
        ThemeArg::Light => Theme::light(),
    };

    if let Err(e) = run_tui(session, theme) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn build_session(args: &Args) -> Result<ReplaySession, String> {
    let (board, report) = if let Some(ref path) = args.import {
        let text = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
        let saved: SavedTrace =
            serde_json::from_str(&text).map_err(|e| format!("cannot parse {}: {}", path, e))?;
        (saved.board, saved.report)
    } else {
        let board = match args.puzzle {
            Some(ref puzzle) => {
                let board = Board::from_string(puzzle).map_err(|e| e.to_string())?;
                if !board.is_valid() {
                    return Err("puzzle violates sudoku constraints".to_string());
                }
                board
            }
            None => {
                let mut generator = match args.seed {
                    Some(seed) => Generator::with_seed(seed),
                    None => Generator::new(),
                };
                generator.generate(args.difficulty.into())
            }
        };
        let report = TracingSolver.solve(&board);
        (board, report)
    };

    if let Some(ref path) = args.export {
        let saved = SavedTrace { board, report };
        let json = serde_json::to_string_pretty(&saved).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("cannot write {}: {}", path, e))?;
        let SavedTrace { board, report } = saved;
        return session_from(board, report);
    }

    session_from(board, report)
}

fn session_from(board: Board, report: SolveReport) -> Result<ReplaySession, String> {
    ReplaySession::from_report(board, &report).map_err(|e| e.to_string())
}

fn run_tui(session: ReplaySession, theme: Theme) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, session, theme);

    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

fn run_app(stdout: &mut io::Stdout, session: ReplaySession, theme: Theme) -> io::Result<()> {
    let mut app = App::new(session, theme);

    loop {
        render::render(stdout, &app)?;
        stdout.flush()?;

        // No animations, so block until the next key.
        if let TermEvent::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                break;
            }
            match app.handle_key(key) {
                AppAction::Continue => {}
                AppAction::Quit => break,
            }
        }
    }

    Ok(())
}
