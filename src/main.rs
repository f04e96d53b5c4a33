use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};

use stablesat::encoding::{
    decode_assignment, solve_with, write_cnf, write_map, Assignment, ClauseBuilder,
    CommandSolver, Matching, PreferenceStore, VariableRegistry,
};
use stablesat::parser::read_cnf_file;

/// Stable matching through a SAT solver.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the CNF encoding and its variable map
    Encode {
        /// Preference file with `m<id>:` and `w<id>:` lines
        preferences: PathBuf,

        #[arg(long, default_value = "cnf.txt")]
        cnf: PathBuf,

        #[arg(long, default_value = "variable_map.txt")]
        map: PathBuf,
    },
    /// Turn a solver transcript into a matching
    Decode {
        #[arg(long, default_value = "sat.txt")]
        sat: PathBuf,

        #[arg(long, default_value = "variable_map.txt")]
        map: PathBuf,

        #[arg(short, long, default_value = "result.txt")]
        output: PathBuf,

        /// Check the assignment against every clause of this CNF
        #[arg(long)]
        cnf: Option<PathBuf>,

        /// Check the matching for blocking pairs under these preferences
        #[arg(long)]
        preferences: Option<PathBuf>,
    },
    /// Encode, run an external solver on the CNF and print the matching
    Solve {
        preferences: PathBuf,

        /// Solver executable; receives the CNF path as its last argument
        #[arg(long)]
        solver: String,

        /// Extra solver arguments, placed before the CNF path
        #[arg(last = true)]
        solver_args: Vec<String>,

        /// Where the CNF handed to the solver is written
        #[arg(long, default_value = "cnf.txt")]
        cnf: PathBuf,
    },
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Encode {
            preferences,
            cnf,
            map,
        } => encode(preferences, cnf, map),
        Command::Decode {
            sat,
            map,
            output,
            cnf,
            preferences,
        } => decode(sat, map, output, cnf, preferences),
        Command::Solve {
            preferences,
            solver,
            solver_args,
            cnf,
        } => solve(preferences, solver, solver_args, cnf),
    }
}

fn load_preferences(path: &Path) -> Result<PreferenceStore> {
    PreferenceStore::load(path).with_context(|| format!("reading {}", path.display()))
}

fn encode(preferences: PathBuf, cnf: PathBuf, map: PathBuf) -> Result<()> {
    let store = load_preferences(&preferences)?;
    let registry = VariableRegistry::for_store(&store);
    let clauses = ClauseBuilder::new(&store, &registry).build()?;

    let out = File::create(&cnf).with_context(|| format!("creating {}", cnf.display()))?;
    write_cnf(&clauses, BufWriter::new(out))?;
    let out = File::create(&map).with_context(|| format!("creating {}", map.display()))?;
    write_map(&registry, BufWriter::new(out))?;

    println!(
        "Generated '{}' and '{}'. Run a SAT solver and save its output to 'sat.txt'.",
        cnf.display(),
        map.display()
    );
    Ok(())
}

fn decode(
    sat: PathBuf,
    map: PathBuf,
    output: PathBuf,
    cnf: Option<PathBuf>,
    preferences: Option<PathBuf>,
) -> Result<()> {
    let transcript =
        fs::read_to_string(&sat).with_context(|| format!("reading {}", sat.display()))?;
    let map_text =
        fs::read_to_string(&map).with_context(|| format!("reading {}", map.display()))?;
    let registry = VariableRegistry::parse_map(&map_text)
        .with_context(|| format!("parsing {}", map.display()))?;
    let assignment = Assignment::parse_transcript(&transcript);

    let Some(matching) = decode_assignment(&assignment, &registry)? else {
        println!("No results to display. Ensure '{}' holds the solver output.", sat.display());
        return Ok(());
    };

    if let Some(cnf) = cnf {
        let clauses = read_cnf_file(&cnf).with_context(|| format!("reading {}", cnf.display()))?;
        if let Some((index, clause)) = clauses.first_unsatisfied(&assignment) {
            bail!("assignment violates clause {} ({clause})", index + 1);
        }
    }

    if let Some(preferences) = preferences {
        check_stability(&matching, &load_preferences(&preferences)?)?;
    }

    let out = File::create(&output).with_context(|| format!("creating {}", output.display()))?;
    matching.write_result(BufWriter::new(out))?;
    println!("Results have been saved to '{}'.", output.display());
    Ok(())
}

fn solve(
    preferences: PathBuf,
    solver: String,
    solver_args: Vec<String>,
    cnf: PathBuf,
) -> Result<()> {
    let store = load_preferences(&preferences)?;
    let solver = CommandSolver {
        program: solver,
        args: solver_args,
        cnf_path: cnf,
    };
    match solve_with(&store, &solver)? {
        Some(matching) => {
            if let Err(e) = check_stability(&matching, &store) {
                log::warn!("{e}");
            }
            let stdout = io::stdout();
            let mut out = stdout.lock();
            matching.write_result(&mut out)?;
            out.flush()?;
        }
        None => println!("No results to display."),
    }
    Ok(())
}

fn check_stability(matching: &Matching, store: &PreferenceStore) -> Result<()> {
    let blocking = matching.blocking_pairs(store);
    if let Some(first) = blocking.first() {
        bail!(
            "matching is unstable: {} blocking pairs, e.g. m{} w{}",
            blocking.len(),
            first.proposer,
            first.receiver
        );
    }
    Ok(())
}
