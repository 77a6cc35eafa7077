//! Tumble Sim command-line driver
//!
//! Runs command scripts against the reference board or a challenge, prints
//! the resulting board, and saves/loads board files.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};

    use tumble_sim::Settings;
    use tumble_sim::challenges::{self, Challenge};
    use tumble_sim::persistence;
    use tumble_sim::sim::{BoardState, Command, Grid, parse_script};

    #[derive(Parser)]
    #[command(author, version, about = "Marble-computer board simulator", long_about = None)]
    struct Cli {
        /// Settings file (JSON); defaults apply when missing
        #[arg(long, default_value = "tumble.json")]
        settings: PathBuf,

        #[command(subcommand)]
        cmd: Cmd,
    }

    #[derive(Subcommand)]
    enum Cmd {
        /// Print an empty board, or a challenge's starting board
        Show {
            #[arg(long)]
            challenge: Option<String>,
        },
        /// List built-in challenges
        Challenges,
        /// Apply a JSON command script and print the result
        Run {
            script: PathBuf,
            /// Built-in challenge id, or a path to a challenge file
            #[arg(long)]
            challenge: Option<String>,
            /// Write the final board to this save file
            #[arg(long)]
            save: Option<PathBuf>,
        },
        /// Print a saved board
        Load { save: PathBuf },
    }

    /// Built-in id first, then a challenge file
    fn resolve_challenge(id: &str) -> Result<Challenge> {
        if let Some(challenge) = challenges::find(id) {
            return Ok(challenge);
        }
        let path = Path::new(id);
        if path.exists() {
            return Challenge::load(path)
                .with_context(|| format!("load challenge {}", path.display()));
        }
        bail!("unknown challenge '{id}'");
    }

    fn fresh_board(settings: &Settings, challenge: Option<&Challenge>) -> Result<BoardState> {
        match challenge {
            Some(c) => c.build().with_context(|| format!("build challenge {}", c.id)),
            None => {
                let mut state = BoardState::with_grid(Grid::reference(), settings.supply());
                state.set_launcher(settings.launcher);
                state.checkpoint();
                Ok(state)
            }
        }
    }

    fn print_verdict(settings: &Settings, challenge: &Challenge, state: &BoardState) {
        let solved = challenge.is_satisfied(state.output(), settings.match_mode);
        let expected: Vec<&str> = challenge.expected.iter().map(|c| c.as_str()).collect();
        println!(
            "challenge {} ({}): expected [{}] -> {}",
            challenge.id,
            settings.match_mode.as_str(),
            expected.join(", "),
            if solved { "SOLVED" } else { "not solved" }
        );
    }

    pub fn main() -> Result<()> {
        let cli = Cli::parse();
        let settings = Settings::load(&cli.settings);
        env_logger::Builder::new()
            .filter_level(settings.log_filter())
            .parse_env("RUST_LOG")
            .init();

        match cli.cmd {
            Cmd::Show { challenge } => {
                let challenge = challenge.as_deref().map(resolve_challenge).transpose()?;
                let state = fresh_board(&settings, challenge.as_ref())?;
                if let Some(c) = &challenge {
                    println!("{}\n{}", c.name, c.description);
                    for objective in &c.objectives {
                        println!("  - {objective}");
                    }
                }
                print!("{}", state.snapshot());
            }
            Cmd::Challenges => {
                for c in challenges::builtin() {
                    println!(
                        "{:<8} {:<18} red {:>2} blue {:>2}  {}",
                        c.id, c.name, c.red_marbles, c.blue_marbles, c.description
                    );
                }
            }
            Cmd::Run {
                script,
                challenge,
                save,
            } => {
                let challenge = challenge.as_deref().map(resolve_challenge).transpose()?;
                let mut state = fresh_board(&settings, challenge.as_ref())?;

                let json = std::fs::read_to_string(&script)
                    .with_context(|| format!("read script {}", script.display()))?;
                let commands = parse_script(&json)
                    .with_context(|| format!("parse script {}", script.display()))?;
                let result = state.run_script(&commands);

                // Let anything still in flight finish
                state
                    .apply(&Command::Run {
                        max_ticks: Some(settings.max_ticks),
                    })
                    .context("settle board")?;

                print!("{}", state.snapshot());
                if let Some(c) = &challenge {
                    print_verdict(&settings, c, &state);
                }
                if let Some(path) = save {
                    persistence::save(&state, &path)
                        .with_context(|| format!("save board to {}", path.display()))?;
                }
                result.context("script failed")?;
            }
            Cmd::Load { save } => {
                let state = persistence::load(&save)
                    .with_context(|| format!("load board from {}", save.display()))?;
                print!("{}", state.snapshot());
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::WebBoard, this is just to satisfy the compiler
}
