//! CLI entry point for the cube solver.
//!
//! Usage:
//!   cube-solver new
//!   cube-solver scramble [--moves <n>] [--seed <s>]
//!   cube-solver apply <MOVES>... [--state <file> | --stdin]
//!   cube-solver solve [--state <file> | --stdin] [--no-simplify] [--no-verify]
//!   cube-solver validate <MOVES>...
//!
//! Results are printed as JSON on stdout. A state is read either as the JSON
//! face map or as the 54-digit state string. Logs go to stderr; `--log` or
//! `RUST_LOG` sets the filter.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use cube_solver::scramble::{scramble_with, DEFAULT_SCRAMBLE_LENGTH};
use cube_solver::{
    apply_sequence, Algorithm, CubeError, CubeState, Face, Move, PhaseSolution, ScrambleConfig,
    Solver, SolverConfig,
};

#[derive(Parser)]
#[command(name = "cube-solver")]
#[command(about = "Rubik's Cube move engine and layer-by-layer solver")]
#[command(version)]
struct Cli {
    /// Log filter for stderr output
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the solved state
    New,

    /// Scramble a solved cube
    Scramble {
        /// Number of random moves
        #[arg(long, default_value_t = DEFAULT_SCRAMBLE_LENGTH)]
        moves: usize,

        /// Seed for a reproducible scramble
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Apply moves to a state (solved if none is given)
    Apply {
        /// Moves in notation, e.g. "R U R' U'"
        #[arg(required = true, num_args = 1..)]
        moves: Vec<String>,

        /// Path to a state file
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,

        /// Read the state from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Solve a state layer by layer
    Solve {
        /// Path to a state file (use --stdin to read from stdin)
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,

        /// Read the state from stdin
        #[arg(long)]
        stdin: bool,

        /// Keep each phase's raw moves instead of cancelling adjacent turns
        #[arg(long)]
        no_simplify: bool,

        /// Skip the per-phase postcondition checks
        #[arg(long)]
        no_verify: bool,
    },

    /// Check which move symbols are valid
    Validate {
        #[arg(required = true, num_args = 1..)]
        moves: Vec<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cube(#[from] CubeError),

    #[error("no state given; pass --state <FILE> or --stdin")]
    MissingState,
}

/// Output for commands that end in a cube state
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateOutput {
    success: bool,
    state: CubeState,
    state_string: String,
    is_solved: bool,
    solved_faces: Vec<Face>,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<Algorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scramble: Option<Algorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl StateOutput {
    fn new(state: CubeState) -> Self {
        Self {
            success: true,
            state_string: state.to_state_string(),
            is_solved: state.is_solved(),
            solved_faces: state.solved_faces(),
            state,
            applied: None,
            scramble: None,
            seed: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    success: bool,
    already_solved: bool,
    move_count: usize,
    moves: Algorithm,
    phases: Vec<PhaseSolution>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput {
    success: bool,
    valid: bool,
    invalid_moves: Vec<String>,
    valid_moves: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ErrorOutput {
    success: bool,
    error: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log);

    match run(cli.command) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!(%err, "command failed");
            let output = ErrorOutput {
                success: false,
                error: err.to_string(),
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(_) => eprintln!("Error: {}", err),
            }
            std::process::exit(1);
        }
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::New => emit(&StateOutput::new(CubeState::solved())),

        Commands::Scramble { moves, seed } => {
            let config = ScrambleConfig {
                length: moves,
                seed,
            };
            let (state, scramble, seed) = scramble_with(&CubeState::solved(), &config);
            emit(&StateOutput {
                scramble: Some(scramble),
                seed: Some(seed),
                ..StateOutput::new(state)
            })
        }

        Commands::Apply {
            moves,
            state,
            stdin,
        } => {
            let mut cube = read_state(state, stdin)?.unwrap_or_default();
            let applied = apply_sequence(&mut cube, &moves.join(" "))?;
            debug!(moves = applied.len(), "applied moves");
            emit(&StateOutput {
                applied: Some(applied),
                ..StateOutput::new(cube)
            })
        }

        Commands::Solve {
            state,
            stdin,
            no_simplify,
            no_verify,
        } => {
            let cube = read_state(state, stdin)?.ok_or(CliError::MissingState)?;
            let solver = Solver::new(SolverConfig {
                verify_phases: !no_verify,
                simplify: !no_simplify,
            });
            let solution = solver.solve(&cube)?;
            emit(&SolveOutput {
                success: true,
                already_solved: cube.is_solved(),
                move_count: solution.len(),
                moves: solution.moves(),
                phases: solution.phases().to_vec(),
            })
        }

        Commands::Validate { moves } => {
            let invalid_moves: Vec<String> = moves
                .iter()
                .flat_map(|arg| arg.split_whitespace())
                .filter(|token| token.parse::<Move>().is_err())
                .map(str::to_string)
                .collect();
            emit(&ValidateOutput {
                success: true,
                valid: invalid_moves.is_empty(),
                invalid_moves,
                valid_moves: Move::ALL.iter().map(|m| m.symbol()).collect(),
            })
        }
    }
}

fn emit<T: Serialize>(output: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

/// Read a state from a file or stdin. `None` when neither was requested.
fn read_state(file: Option<PathBuf>, stdin: bool) -> Result<Option<CubeState>, CliError> {
    let content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| CliError::Read {
                origin: "stdin".to_string(),
                source,
            })?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::Read {
            origin: path.display().to_string(),
            source,
        })?
    } else {
        return Ok(None);
    };

    let trimmed = content.trim();
    let state = if trimmed.starts_with('{') {
        serde_json::from_str(trimmed)?
    } else {
        CubeState::from_state_string(trimmed)?
    };
    Ok(Some(state))
}
