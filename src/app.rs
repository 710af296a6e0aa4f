use crate::config::{self, Args, Settings};
use crate::input::{MenuChoice, Prompter};
use crate::model::Grid;
use crate::presets::{load_board, PresetKind, PresetSource};
use crate::render::Screen;
use crate::sim::{RunState, Simulation};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::{info, warn};

pub(crate) struct App {
    settings: Settings,
    presets: PresetSource,
    plain: bool,
}

impl App {
    fn init(args: &Args) -> Result<Self> {
        let config::Loaded { settings, ignored } = config::resolve(args)?;
        init_logging(&settings.log_level)?;
        if let Some((path, err)) = ignored {
            warn!(path = %path.display(), error = %err, "ignoring malformed settings file");
        }

        let presets = PresetSource {
            patterns_dir: settings.patterns_dir.clone(),
            random_size: settings.random_size,
            random_density: settings.random_density,
            seed: settings.seed,
        };

        Ok(Self {
            settings,
            presets,
            plain: args.plain,
        })
    }

    /// `--preset` / `--board`: one run, no menu.
    fn run_once(&self, args: &Args) -> Result<bool> {
        let grid = if let Some(n) = args.preset {
            let kind = PresetKind::from_choice(n as usize)
                .with_context(|| format!("no preset numbered {n}"))?;
            self.presets.build(kind)?.grid
        } else if let Some(path) = &args.board {
            load_board(path)?
        } else {
            return Ok(false);
        };

        let mut screen = Screen::stdout(self.plain);
        play(&mut screen, grid, args.iterations as usize, self.settings.frame_delay())?;
        Ok(true)
    }

    fn session<R: BufRead, W: Write, S: Write>(
        &self,
        prompt: &mut Prompter<R, W>,
        screen: &mut Screen<S>,
    ) -> Result<()> {
        loop {
            let grid = match prompt.menu()? {
                MenuChoice::Presets => self.choose_preset(prompt, screen)?,
                MenuChoice::Custom => prompt.custom_grid(self.settings.max_dimension)?,
                MenuChoice::Exit => {
                    prompt.say("Thank you for using this code.")?;
                    return Ok(());
                }
            };
            let iterations = prompt.iterations(self.settings.max_iterations)?;
            play(screen, grid, iterations, self.settings.frame_delay())?;
        }
    }

    fn choose_preset<R: BufRead, W: Write, S: Write>(
        &self,
        prompt: &mut Prompter<R, W>,
        screen: &mut Screen<S>,
    ) -> Result<Grid> {
        let mut presets = self.presets.build_all()?;
        prompt.say("Please choose one of the five following starting grids to run.")?;
        for (i, p) in presets.iter().enumerate() {
            let title = format!(
                "Grid {} - {} ({}x{}):",
                i + 1,
                p.kind.title(),
                p.grid.height(),
                p.grid.width()
            );
            screen.show_board(&title, &p.grid)?;
        }
        let choice = prompt.ask_in_range(
            "Please enter 1 for grid 1, 2 for grid 2 etc... :",
            1,
            presets.len() as i64,
        )?;
        let chosen = presets.swap_remove(choice as usize - 1);
        info!(preset = chosen.kind.title(), "preset chosen");
        Ok(chosen.grid)
    }
}

/// Emits every generation of one run, pausing between frames.
fn play<S: Write>(
    screen: &mut Screen<S>,
    grid: Grid,
    iterations: usize,
    delay: Duration,
) -> Result<()> {
    info!(
        height = grid.height(),
        width = grid.width(),
        live = grid.live_count(),
        iterations,
        "run started"
    );

    let mut sim = Simulation::new(grid, iterations);
    while let Some(frame) = sim.next() {
        screen.show_frame(&frame, iterations)?;
        if sim.state() == RunState::Running && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    if let Some(reason) = sim.halt_reason() {
        info!(?reason, generations = sim.emitted(), "run halted");
        screen.show_halt(reason, sim.emitted())?;
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| anyhow!("unknown log level {level:?}"))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();
    let app = App::init(&args)?;

    if app.run_once(&args)? {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut prompt = Prompter::new(stdin.lock(), io::stdout());
    let mut screen = Screen::stdout(app.plain);
    app.session(&mut prompt, &mut screen)
}
