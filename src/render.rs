use crate::model::{CellState, Grid};
use crate::sim::{Generation, HaltReason};
use crossterm::{
    cursor, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
    tty::IsTty,
};
use std::io::{self, Write};

pub(crate) const ALIVE_GLYPH: &str = " * ";
pub(crate) const DEAD_GLYPH: &str = " . ";

fn glyph(cell: CellState) -> &'static str {
    match cell {
        CellState::Alive => ALIVE_GLYPH,
        CellState::Dead => DEAD_GLYPH,
    }
}

/// One line per row, each wrapped in parentheses and ending in `\n`.
pub(crate) fn board_text(grid: &Grid) -> String {
    let mut s = String::with_capacity(grid.height() * (grid.width() * 3 + 3));
    for row in grid.rows() {
        s.push('(');
        for &cell in row {
            s.push_str(glyph(cell));
        }
        s.push_str(")\n");
    }
    s
}

/// Where playback frames go.
///
/// `redraw` clears the screen and paints each frame in place; otherwise
/// frames scroll as plain text separated by blank lines.
pub(crate) struct Screen<W: Write> {
    out: W,
    redraw: bool,
}

impl Screen<io::Stdout> {
    pub(crate) fn stdout(force_plain: bool) -> Self {
        let out = io::stdout();
        let redraw = !force_plain && out.is_tty();
        Self { out, redraw }
    }
}

impl<W: Write> Screen<W> {
    #[cfg(test)]
    pub(crate) fn plain(out: W) -> Self {
        Self { out, redraw: false }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    /// Titled board, used when listing the presets.
    pub(crate) fn show_board(&mut self, title: &str, grid: &Grid) -> io::Result<()> {
        writeln!(self.out, "{title}")?;
        writeln!(self.out)?;
        self.out.write_all(board_text(grid).as_bytes())?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub(crate) fn show_frame(&mut self, frame: &Generation, max_iterations: usize) -> io::Result<()> {
        let board = board_text(&frame.grid);
        let status = format!(
            "generation {} / {}   live {}",
            frame.index + 1,
            max_iterations,
            frame.grid.live_count()
        );

        if self.redraw {
            queue!(
                self.out,
                BeginSynchronizedUpdate,
                cursor::MoveTo(0, 0),
                Clear(ClearType::All),
                SetAttribute(Attribute::Bold),
                Print(&status),
                SetAttribute(Attribute::Reset),
                Print("\n\n"),
                Print(&board),
                EndSynchronizedUpdate
            )?;
        } else {
            writeln!(self.out)?;
            self.out.write_all(board.as_bytes())?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub(crate) fn show_halt(&mut self, reason: HaltReason, emitted: usize) -> io::Result<()> {
        match reason {
            HaltReason::Converged => {
                writeln!(self.out, "No change in grid so game will stop.")?
            }
            HaltReason::IterationCap => {
                let noun = if emitted == 1 { "generation" } else { "generations" };
                writeln!(self.out, "Finished after {emitted} {noun}.")?
            }
        }
        self.out.flush()
    }
}
