use crate::model::{CellState, Grid, GridError};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

const PATTERN_SIDE: usize = 40;
const GLIDER_SIDE: usize = 10;
const GLIDER_CELLS: [(usize, usize); 5] = [(2, 7), (3, 5), (3, 7), (4, 6), (4, 7)];

const BUNDLED_PATTERN: &str = include_str!("../patterns/pattern.txt");
const BUNDLED_OSCILLATOR: &str = include_str!("../patterns/oscillator.txt");
const BUNDLED_GUN: &str = include_str!("../patterns/gun.txt");

#[derive(Debug, Error)]
pub(crate) enum PatternError {
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected 0 or 1, found {token:?}")]
    BadToken { line: usize, token: String },
    #[error("line {line}: expected {expected} cells, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("pattern has no rows")]
    Empty,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parses whitespace-separated 0/1 tokens, one row per non-blank line.
///
/// With `dims` set, the row count and every row length must match exactly.
/// Without it the first row fixes the width.
pub(crate) fn parse_pattern(
    text: &str,
    dims: Option<(usize, usize)>,
) -> Result<Grid, PatternError> {
    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut width = dims.map(|(_, w)| w);

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| match tok {
                "0" => Ok(0u8),
                "1" => Ok(1u8),
                _ => Err(PatternError::BadToken {
                    line: line_no,
                    token: tok.to_string(),
                }),
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let expected = *width.get_or_insert(row.len());
        if row.len() != expected {
            return Err(PatternError::RowLength {
                line: line_no,
                expected,
                found: row.len(),
            });
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(PatternError::Empty);
    }
    if let Some((height, _)) = dims {
        if rows.len() != height {
            return Err(PatternError::RowCount {
                expected: height,
                found: rows.len(),
            });
        }
    }

    Ok(Grid::from_rows(&rows)?)
}

/// Reads a board file of any size; dimensions come from the file itself.
pub(crate) fn load_board(path: &Path) -> Result<Grid, PatternError> {
    let text = fs::read_to_string(path).map_err(|source| PatternError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse_pattern(&text, None)?;
    info!(
        path = %path.display(),
        height = grid.height(),
        width = grid.width(),
        "loaded board"
    );
    Ok(grid)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PresetKind {
    Random,
    Glider,
    Pattern,
    Oscillator,
    Gun,
}

impl PresetKind {
    pub(crate) const ALL: [PresetKind; 5] = [
        PresetKind::Random,
        PresetKind::Glider,
        PresetKind::Pattern,
        PresetKind::Oscillator,
        PresetKind::Gun,
    ];

    /// 1-based menu number.
    pub(crate) fn from_choice(choice: usize) -> Option<Self> {
        choice
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            PresetKind::Random => "Picked randomly",
            PresetKind::Glider => "Glider",
            PresetKind::Pattern => "Pattern",
            PresetKind::Oscillator => "Oscillator",
            PresetKind::Gun => "Gun",
        }
    }

    fn file_name(self) -> Option<&'static str> {
        match self {
            PresetKind::Pattern => Some("pattern.txt"),
            PresetKind::Oscillator => Some("oscillator.txt"),
            PresetKind::Gun => Some("gun.txt"),
            _ => None,
        }
    }

    fn bundled(self) -> Option<&'static str> {
        match self {
            PresetKind::Pattern => Some(BUNDLED_PATTERN),
            PresetKind::Oscillator => Some(BUNDLED_OSCILLATOR),
            PresetKind::Gun => Some(BUNDLED_GUN),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Preset {
    pub(crate) kind: PresetKind,
    pub(crate) grid: Grid,
}

/// Where preset boards come from and how the random one is filled.
#[derive(Clone, Debug)]
pub(crate) struct PresetSource {
    pub(crate) patterns_dir: Option<PathBuf>,
    pub(crate) random_size: usize,
    pub(crate) random_density: f64,
    pub(crate) seed: Option<u64>,
}

impl PresetSource {
    pub(crate) fn build(&self, kind: PresetKind) -> Result<Preset, PatternError> {
        let grid = match kind {
            PresetKind::Random => self.random_grid()?,
            PresetKind::Glider => Grid::with_alive(GLIDER_SIDE, GLIDER_SIDE, &GLIDER_CELLS)?,
            _ => self.fixed_pattern(kind)?,
        };
        debug!(preset = kind.title(), live = grid.live_count(), "built preset");
        Ok(Preset { kind, grid })
    }

    pub(crate) fn build_all(&self) -> Result<Vec<Preset>, PatternError> {
        PresetKind::ALL.iter().map(|&k| self.build(k)).collect()
    }

    fn random_grid(&self) -> Result<Grid, PatternError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let side = self.random_size;
        let density = self.random_density.clamp(0.0, 1.0);
        let cells = (0..side * side)
            .map(|_| {
                if rng.gen_bool(density) {
                    CellState::Alive
                } else {
                    CellState::Dead
                }
            })
            .collect();
        Ok(Grid::from_cells(side, side, cells)?)
    }

    fn fixed_pattern(&self, kind: PresetKind) -> Result<Grid, PatternError> {
        let dims = Some((PATTERN_SIDE, PATTERN_SIDE));
        match (&self.patterns_dir, kind.file_name()) {
            (Some(dir), Some(name)) => {
                let path = dir.join(name);
                let text = fs::read_to_string(&path).map_err(|source| PatternError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "reading preset pattern");
                parse_pattern(&text, dims)
            }
            _ => parse_pattern(kind.bundled().unwrap_or_default(), dims),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::step;

    fn source() -> PresetSource {
        PresetSource {
            patterns_dir: None,
            random_size: 10,
            random_density: 0.5,
            seed: Some(7),
        }
    }

    #[test]
    fn parses_rows_and_skips_blank_lines() {
        let g = parse_pattern("0 1 0\n\n1  1\t0\n", None).unwrap();
        assert_eq!((g.height(), g.width()), (2, 3));
        assert_eq!(g.live_count(), 3);
        assert_eq!(g.get(1, 1), CellState::Alive);
    }

    #[test]
    fn rejects_foreign_tokens() {
        let err = parse_pattern("0 1\n0 x\n", None).unwrap_err();
        assert!(matches!(err, PatternError::BadToken { line: 2, ref token } if token == "x"));
        assert!(matches!(
            parse_pattern("0 2\n", None),
            Err(PatternError::BadToken { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_short_rows() {
        let err = parse_pattern("0 1 0\n1 1\n", None).unwrap_err();
        assert!(matches!(
            err,
            PatternError::RowLength {
                line: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn enforces_known_dimensions() {
        assert!(matches!(
            parse_pattern("0 1\n1 0\n", Some((3, 2))),
            Err(PatternError::RowCount {
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            parse_pattern("0 1 1\n", Some((1, 2))),
            Err(PatternError::RowLength { expected: 2, .. })
        ));
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(parse_pattern("\n \n", None), Err(PatternError::Empty)));
    }

    #[test]
    fn bundled_patterns_are_forty_square() {
        let src = source();
        for (kind, live) in [
            (PresetKind::Pattern, 10),
            (PresetKind::Oscillator, 44),
            (PresetKind::Gun, 47),
        ] {
            let p = src.build(kind).unwrap();
            assert_eq!((p.grid.height(), p.grid.width()), (40, 40));
            assert_eq!(p.grid.live_count(), live, "{}", kind.title());
        }
    }

    #[test]
    fn glider_preset_translates_diagonally() {
        let glider = source().build(PresetKind::Glider).unwrap().grid;
        assert_eq!(glider.live_count(), 5);
        let mut g = glider.clone();
        for _ in 0..4 {
            g = step(&g).0;
        }
        let mut shifted = Grid::dead(10, 10).unwrap();
        for &(r, c) in &GLIDER_CELLS {
            shifted.set(r + 1, c + 1, CellState::Alive);
        }
        assert_eq!(g, shifted);
    }

    #[test]
    fn random_preset_is_seeded() {
        let a = source().build(PresetKind::Random).unwrap().grid;
        let b = source().build(PresetKind::Random).unwrap().grid;
        assert_eq!(a, b);
        assert_eq!((a.height(), a.width()), (10, 10));

        let mut full = source();
        full.random_density = 1.0;
        full.random_size = 4;
        assert_eq!(full.build(PresetKind::Random).unwrap().grid.live_count(), 16);
    }

    #[test]
    fn menu_choices_map_in_order() {
        assert_eq!(PresetKind::from_choice(0), None);
        assert_eq!(PresetKind::from_choice(1), Some(PresetKind::Random));
        assert_eq!(PresetKind::from_choice(5), Some(PresetKind::Gun));
        assert_eq!(PresetKind::from_choice(6), None);
        assert_eq!(source().build_all().unwrap().len(), 5);
    }

    #[test]
    fn patterns_dir_overrides_bundled_copy() {
        let dir = std::env::temp_dir().join(format!("torus-life-presets-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let row = format!("1{}\n", " 0".repeat(39));
        let zeros = format!("0{}\n", " 0".repeat(39));
        let text = format!("{}{}", row, zeros.repeat(39));
        fs::write(dir.join("gun.txt"), text).unwrap();

        let mut src = source();
        src.patterns_dir = Some(dir.clone());
        let gun = src.build(PresetKind::Gun).unwrap().grid;
        assert_eq!(gun.live_count(), 1);
        assert_eq!(gun.get(0, 0), CellState::Alive);
        assert!(matches!(
            src.build(PresetKind::Pattern),
            Err(PatternError::Io { .. })
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_board_infers_dimensions() {
        let path = std::env::temp_dir().join(format!("torus-life-board-{}.txt", std::process::id()));
        fs::write(&path, "0 1 0 0\n0 0 1 0\n1 1 1 0\n").unwrap();
        let g = load_board(&path).unwrap();
        assert_eq!((g.height(), g.width()), (3, 4));
        assert_eq!(g.live_count(), 5);
        let _ = fs::remove_file(&path);
    }
}
