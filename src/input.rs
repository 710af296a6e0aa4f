use crate::model::{CellState, Grid};
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuChoice {
    Presets,
    Custom,
    Exit,
}

/// Line-oriented prompts over any reader/writer pair.
///
/// Every integer answer is checked against an inclusive range and asked
/// again until it fits. Running out of input is an error.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
    line: String,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            line: String::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }

    pub(crate) fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    pub(crate) fn ask_in_range(&mut self, question: &str, min: i64, max: i64) -> Result<i64> {
        self.say(question)?;
        loop {
            self.line.clear();
            let n = self
                .input
                .read_line(&mut self.line)
                .context("failed to read input")?;
            if n == 0 {
                bail!("input closed while waiting for a number between {min} and {max}");
            }
            match self.line.trim().parse::<i64>() {
                Ok(v) if (min..=max).contains(&v) => return Ok(v),
                _ => self.say(&format!(
                    "You were meant to enter an integer between {min} and {max}.\nPlease try again:"
                ))?,
            }
        }
    }

    pub(crate) fn menu(&mut self) -> Result<MenuChoice> {
        let choice = self.ask_in_range(
            "Menu:\n\
             Press 1 to start the game from a set of pre-defined configurations\n\
             Press 2 to set a custom board\n\
             Press 3 to exit",
            1,
            3,
        )?;
        Ok(match choice {
            1 => MenuChoice::Presets,
            2 => MenuChoice::Custom,
            _ => MenuChoice::Exit,
        })
    }

    pub(crate) fn iterations(&mut self, max_iterations: usize) -> Result<usize> {
        let max = max_iterations as i64;
        let n = self.ask_in_range(
            &format!("How many repeats do you want the game to do? (max {max})"),
            1,
            max,
        )?;
        Ok(n as usize)
    }

    /// Asks for the board size, then every cell in row-major order.
    pub(crate) fn custom_grid(&mut self, max_dimension: usize) -> Result<Grid> {
        let max = max_dimension as i64;
        let height =
            self.ask_in_range("Please enter the length of your custom board:", 1, max)? as usize;
        let width =
            self.ask_in_range("Please enter the width of your custom board:", 1, max)? as usize;
        self.say(&format!("The custom board size is {height} by {width}"))?;
        self.say("\nPlease enter your values in for your custom board - 0 is dead, 1 is alive:")?;

        let mut grid = Grid::dead(height, width)?;
        for r in 0..height {
            for c in 0..width {
                let v = self.ask_in_range(
                    &format!("Please enter your input for the [{r}][{c}] position:"),
                    0,
                    1,
                )?;
                if v == 1 {
                    grid.set(r, c, CellState::Alive);
                }
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn accepts_value_in_range() {
        let mut p = prompter("7\n");
        assert_eq!(p.ask_in_range("pick", 1, 10).unwrap(), 7);
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "pick\n");
    }

    #[test]
    fn reprompts_until_valid() {
        let mut p = prompter("0\nabc\n\n11\n 4 \n");
        assert_eq!(p.ask_in_range("pick", 1, 10).unwrap(), 4);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(
            out.matches("You were meant to enter an integer between 1 and 10.")
                .count(),
            4
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut p = prompter("1\n200\n");
        assert_eq!(p.ask_in_range("n", 1, 200).unwrap(), 1);
        assert_eq!(p.ask_in_range("n", 1, 200).unwrap(), 200);
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut p = prompter("99\n");
        assert!(p.ask_in_range("n", 1, 3).is_err());
    }

    #[test]
    fn menu_maps_choices() {
        let mut p = prompter("4\n2\n3\n1\n");
        assert_eq!(p.menu().unwrap(), MenuChoice::Custom);
        assert_eq!(p.menu().unwrap(), MenuChoice::Exit);
        assert_eq!(p.menu().unwrap(), MenuChoice::Presets);
    }

    #[test]
    fn iterations_respect_configured_cap() {
        let mut p = prompter("51\n50\n");
        assert_eq!(p.iterations(50).unwrap(), 50);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("(max 50)"));
        assert!(out.contains("between 1 and 50"));
    }

    #[test]
    fn custom_grid_reads_cells_row_major() {
        // 2x3 board, one out-of-range cell answer retried
        let mut p = prompter("2\n3\n0\n1\n5\n0\n1\n1\n0\n");
        let g = p.custom_grid(40).unwrap();
        assert_eq!(g, Grid::from_rows(&[[0u8, 1, 0], [1, 1, 0]]).unwrap());
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("The custom board size is 2 by 3"));
        assert!(out.contains("[1][2] position"));
    }

    #[test]
    fn custom_grid_dimensions_are_capped() {
        let mut p = prompter("41\n1\n1\n1\n");
        let g = p.custom_grid(40).unwrap();
        assert_eq!((g.height(), g.width()), (1, 1));
        assert_eq!(g.live_count(), 1);
    }
}
