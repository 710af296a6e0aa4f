use anyhow::{ensure, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(name = "torus-life", about = "Conway's Game of Life on a wrap-around board")]
pub(crate) struct Args {
    /// ms to pause between generations
    #[arg(long)]
    pub(crate) delay_ms: Option<u64>,

    /// largest iteration count the prompt accepts
    #[arg(long)]
    pub(crate) max_iterations: Option<usize>,

    /// largest custom board height/width the prompt accepts
    #[arg(long)]
    pub(crate) max_dimension: Option<usize>,

    /// seed for the randomized preset
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// read pattern.txt, oscillator.txt and gun.txt from this directory
    #[arg(long)]
    pub(crate) patterns_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long)]
    pub(crate) log_level: Option<String>,

    /// scroll plain text even when stdout is a terminal
    #[arg(long)]
    pub(crate) plain: bool,

    /// run preset N (1-5) once and exit
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5), conflicts_with = "board")]
    pub(crate) preset: Option<u8>,

    /// run a board read from a 0/1 text file once and exit
    #[arg(long)]
    pub(crate) board: Option<PathBuf>,

    /// generations to run with --preset or --board
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) iterations: u32,

    /// settings file to use instead of the per-user one
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) frame_delay_ms: u64,
    pub(crate) max_iterations: usize,
    pub(crate) max_dimension: usize,
    pub(crate) random_size: usize,
    pub(crate) random_density: f64,
    pub(crate) seed: Option<u64>,
    pub(crate) patterns_dir: Option<PathBuf>,
    pub(crate) log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_delay_ms: 1000,
            max_iterations: 200,
            max_dimension: 40,
            random_size: 10,
            random_density: 0.5,
            seed: None,
            patterns_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// CLI values win over whatever the file said.
    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(ms) = args.delay_ms {
            self.frame_delay_ms = ms;
        }
        if let Some(n) = args.max_iterations {
            self.max_iterations = n;
        }
        if let Some(n) = args.max_dimension {
            self.max_dimension = n;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.patterns_dir.is_some() {
            self.patterns_dir = args.patterns_dir.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(self.max_iterations >= 1, "max_iterations must be at least 1");
        ensure!(self.max_dimension >= 1, "max_dimension must be at least 1");
        ensure!(self.random_size >= 1, "random_size must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.random_density),
            "random_density must be within [0, 1], got {}",
            self.random_density
        );
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))?;
        Ok(())
    }

    pub(crate) fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

pub(crate) fn settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "torus-life", "TorusLife")
        .context("could not resolve project directories")?;
    Ok(proj.config_dir().join("settings.json"))
}

/// Settings plus the parse error of a settings file that had to be ignored.
/// Logging is not up yet when this runs, so the caller reports it.
pub(crate) struct Loaded {
    pub(crate) settings: Settings,
    pub(crate) ignored: Option<(PathBuf, serde_json::Error)>,
}

/// A missing file means defaults. A file that exists but does not parse is
/// ignored too, and handed back for reporting.
pub(crate) fn load_settings(path: &Path) -> Result<Loaded> {
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Loaded {
                settings: Settings::default(),
                ignored: None,
            })
        }
        Err(e) => {
            return Err(e).with_context(|| format!("could not read {}", path.display()));
        }
    };
    Ok(match serde_json::from_str::<Settings>(&text) {
        Ok(settings) => Loaded {
            settings,
            ignored: None,
        },
        Err(e) => Loaded {
            settings: Settings::default(),
            ignored: Some((path.to_path_buf(), e)),
        },
    })
}

pub(crate) fn resolve(args: &Args) -> Result<Loaded> {
    let path = match &args.config {
        Some(p) => p.clone(),
        None => settings_path()?,
    };
    let mut loaded = load_settings(&path)?;
    loaded.settings.apply_args(args);
    loaded.settings.validate()?;
    Ok(loaded)
}
