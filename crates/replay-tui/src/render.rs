use crate::app::App;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use replay_core::{DomainSet, Event, Position};
use std::io;

// Grid geometry: every cell is 7x3 inside a 1-char border lattice.
const CELL_W: u16 = 7;
const CELL_H: u16 = 3;
const GRID_W: u16 = 9 * (CELL_W + 1) + 1; // 73
const GRID_H: u16 = 9 * (CELL_H + 1) + 1; // 37
const PANEL_W: u16 = 42;
const PANEL_GAP: u16 = 3;

/// What one cell displays at the current cursor.
enum CellView {
    Given(u8),
    Assigned(u8),
    Inferred(u8),
    Degraded,
    Candidates(DomainSet),
}

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let theme = &app.theme;

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        Clear(ClearType::All)
    )?;

    let total_width = GRID_W + PANEL_GAP + PANEL_W;
    if term_width < total_width || term_height < GRID_H + 2 {
        execute!(
            stdout,
            MoveTo(1, 1),
            SetForegroundColor(theme.error),
            Print(format!(
                "Terminal too small: need {}x{}, have {}x{}",
                total_width,
                GRID_H + 2,
                term_width,
                term_height
            ))
        )?;
        return Ok(());
    }

    let start_x = (term_width - total_width) / 2;
    let start_y = if term_height > GRID_H + 4 { 1 } else { 0 };

    render_grid(stdout, app, start_x, start_y)?;
    render_panel(stdout, app, start_x + GRID_W + PANEL_GAP, start_y)?;
    render_controls(stdout, app, start_x, start_y + GRID_H + 1)?;

    Ok(())
}

/// The cells the current event touches: (subject, cause).
fn active_cells(event: Option<&Event>) -> (Option<Position>, Option<Position>) {
    match event {
        Some(Event::Arc { from, to, .. }) => (Some(*from), Some(*to)),
        Some(Event::ArcInferred { cell, .. })
        | Some(Event::BacktrackAssign { cell, .. })
        | Some(Event::BacktrackRevert { cell, .. }) => (Some(*cell), None),
        None => (None, None),
    }
}

fn cell_view(app: &App, pos: Position) -> CellView {
    if let Some(v) = app.session.board().value(pos) {
        return CellView::Given(v);
    }
    if let Some(&v) = app.session.overlay().get(&pos) {
        return CellView::Assigned(v);
    }
    // Every original-empty cell has a tracked domain.
    let domain = app.session.domains().get(pos).unwrap_or_else(DomainSet::full);
    if app.session.domains().is_degraded(pos) {
        CellView::Degraded
    } else if let Some(v) = domain.sole_value() {
        CellView::Inferred(v)
    } else {
        CellView::Candidates(domain)
    }
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let (subject, cause) = active_cells(app.session.current_event());

    // Horizontal border lattice; '=' rows separate the 3x3 boxes.
    for r in 0..=9u16 {
        let heavy = r % 3 == 0;
        let color = if heavy { theme.box_border } else { theme.border };
        let fill = if heavy { '=' } else { '-' };
        let mut line = String::with_capacity(GRID_W as usize);
        for _ in 0..9 {
            line.push('+');
            for _ in 0..CELL_W {
                line.push(fill);
            }
        }
        line.push('+');
        execute!(
            stdout,
            MoveTo(x, y + r * (CELL_H + 1)),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(color),
            Print(line)
        )?;
    }

    for row in 0..9usize {
        for line in 0..CELL_H {
            let line_y = y + row as u16 * (CELL_H + 1) + 1 + line;
            execute!(stdout, MoveTo(x, line_y))?;
            for col in 0..9usize {
                let border_color = if col % 3 == 0 {
                    theme.box_border
                } else {
                    theme.border
                };
                execute!(
                    stdout,
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(border_color),
                    Print("|")
                )?;

                let pos = Position::new(row, col);
                let cell_bg = if subject == Some(pos) {
                    theme.active_bg
                } else if cause == Some(pos) {
                    theme.cause_bg
                } else {
                    theme.bg
                };
                render_cell_line(stdout, app, pos, line, cell_bg)?;
            }
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.box_border),
                Print("|")
            )?;
        }
    }
    Ok(())
}

/// One of the three text lines inside a cell.
fn render_cell_line(
    stdout: &mut io::Stdout,
    app: &App,
    pos: Position,
    line: u16,
    bg: Color,
) -> io::Result<()> {
    let theme = &app.theme;
    let (text, color) = match cell_view(app, pos) {
        CellView::Given(v) => (value_line(v, line, false), theme.given),
        CellView::Assigned(v) => (value_line(v, line, false), theme.assigned),
        // Inferred singletons get a corner tick to set them apart from
        // search assignments, which look identical at the domain level.
        CellView::Inferred(v) => (value_line(v, line, true), theme.inferred),
        CellView::Degraded => (value_line_char('!', line), theme.error),
        CellView::Candidates(domain) => (candidate_line(domain, line), theme.candidate),
    };
    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(color),
        Print(text)
    )?;
    Ok(())
}

fn value_line(value: u8, line: u16, tick: bool) -> String {
    match line {
        0 if tick => "     * ".to_string(),
        1 => format!("   {}   ", value),
        _ => " ".repeat(CELL_W as usize),
    }
}

fn value_line_char(c: char, line: u16) -> String {
    if line == 1 {
        format!("   {}   ", c)
    } else {
        " ".repeat(CELL_W as usize)
    }
}

/// Candidates laid out as a 3x3 mini-grid across the cell's three lines.
fn candidate_line(domain: DomainSet, line: u16) -> String {
    let mut s = String::with_capacity(CELL_W as usize);
    s.push(' ');
    for i in 0..3u8 {
        let v = line as u8 * 3 + i + 1;
        if domain.contains(v) {
            s.push((b'0' + v) as char);
        } else {
            s.push(' ');
        }
        s.push(' ');
    }
    s
}

fn render_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;
    let width = PANEL_W as usize;

    let header = if session.cursor() < 0 {
        format!("Initial state (trace: {} steps)", session.trace_len())
    } else {
        format!("Step {} / {}", session.cursor() + 1, session.trace_len())
    };
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.fg),
        Print(truncate(&header, width))
    )?;

    // Current event detail.
    if let Some(event) = session.current_event() {
        execute!(
            stdout,
            MoveTo(x, y + 1),
            SetForegroundColor(theme.key),
            Print(truncate(event.label(), width))
        )?;
        execute!(
            stdout,
            MoveTo(x, y + 2),
            SetForegroundColor(theme.info),
            Print(truncate(&event.to_string(), width))
        )?;
    } else {
        execute!(
            stdout,
            MoveTo(x, y + 1),
            SetForegroundColor(theme.info),
            Print(truncate("No events applied yet", width))
        )?;
    }

    render_step_list(stdout, app, x, y + 4)?;

    let mut status_y = y + GRID_H - 5;
    let assigned = session.overlay().len();
    if assigned > 0 {
        execute!(
            stdout,
            MoveTo(x, status_y),
            SetForegroundColor(theme.assigned),
            Print(truncate(
                &format!("Tentative assignments: {}", assigned),
                width
            ))
        )?;
        status_y += 1;
    }
    let degraded: Vec<Position> = session.domains().degraded_cells().collect();
    if !degraded.is_empty() {
        let cells: Vec<String> = degraded.iter().map(|p| p.to_string()).collect();
        execute!(
            stdout,
            MoveTo(x, status_y),
            SetForegroundColor(theme.error),
            Print(truncate(
                &format!("Domains lost to revert: {}", cells.join(" ")),
                width
            ))
        )?;
        status_y += 1;
    }
    if let Some(ref entry) = app.jump_entry {
        execute!(
            stdout,
            MoveTo(x, status_y),
            SetForegroundColor(theme.key),
            Print(truncate(&format!("Jump to step: {}_", entry), width))
        )?;
        status_y += 1;
    }
    if let Some(ref message) = app.message {
        execute!(
            stdout,
            MoveTo(x, status_y),
            SetForegroundColor(theme.error),
            Print(truncate(message, width))
        )?;
    }

    Ok(())
}

fn render_step_list(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;
    let len = session.trace_len();
    let height = (GRID_H - 10) as usize;
    let width = PANEL_W as usize;

    if len == 0 {
        return Ok(());
    }

    // Keep the cursor roughly centered in the visible window.
    let cursor = session.cursor().max(0) as usize;
    let start = cursor.saturating_sub(height / 2).min(len.saturating_sub(height));

    let end = len.min(start + height);
    for (offset, event) in session.trace().events()[start..end].iter().enumerate() {
        let index = start + offset;
        let is_current = session.cursor() == index as isize;
        let marker = if is_current { ">" } else { " " };
        let text = format!("{} {:>4}  {}", marker, index + 1, event);

        let (fg, bg) = if is_current {
            (theme.fg, theme.step_bg)
        } else if (index as isize) < session.cursor() {
            (theme.info, theme.bg)
        } else {
            (theme.candidate, theme.bg)
        };
        execute!(
            stdout,
            MoveTo(x, y + offset as u16),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(format!("{:<width$}", truncate(&text, width), width = width))
        )?;
    }
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let bindings = [
        ("h/l", "back/forward"),
        ("g/G", "start/end"),
        ("PgUp/PgDn", "-/+10"),
        (":", "jump"),
        ("q", "quit"),
    ];
    execute!(stdout, MoveTo(x, y), SetBackgroundColor(theme.bg))?;
    for (i, (keys, what)) in bindings.iter().enumerate() {
        if i > 0 {
            execute!(stdout, SetForegroundColor(theme.info), Print("  "))?;
        }
        execute!(
            stdout,
            SetForegroundColor(theme.key),
            Print(*keys),
            SetForegroundColor(theme.info),
            Print(format!(" {}", what))
        )?;
    }
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
