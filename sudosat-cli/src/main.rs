use std::env;
use std::fs;
use std::io::{Read, Write};

use anyhow::Error;
use clap::{App, AppSettings, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info};
use log::{Level, LevelFilter, Record};

use sudosat::{sudoku, Solver, SolverConfig};
use sudosat_dimacs::write_model;

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = env::var("SUDOSAT_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is sudosat {}", env!("CARGO_PKG_VERSION"));
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("sudosat")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .arg_from_usage("<PUZZLE> 'The puzzle file to solve (DIMACS CNF or a 9x9 grid)'")
        .arg(
            Arg::with_name("strategy")
                .short("S")
                .value_name("STRATEGY")
                .possible_values(&["1", "2", "3"])
                .help("Branching strategy: 1 first-unassigned, 2 MOM, 3 two-sided Jeroslow-Wang"),
        )
        .arg_from_usage("[rules-file] --rules=[FILE] 'Prepend a DIMACS rules file before parsing'")
        .arg_from_usage("[config-file] --config=[FILE] 'Read solver parameters from a TOML file'")
        .get_matches();

    init_logging();
    banner();

    let mut config = SolverConfig::default();

    if let Some(config_path) = matches.value_of("config-file") {
        let mut config_contents = String::new();
        fs::File::open(config_path)?.read_to_string(&mut config_contents)?;
        config = toml::from_str(&config_contents)?;
    }

    if let Some(strategy) = matches.value_of("strategy") {
        config.strategy = strategy.parse()?;
    }

    let puzzle_path = matches.value_of("PUZZLE").unwrap();
    info!("Reading puzzle from '{}'", puzzle_path);
    let puzzle_text = fs::read_to_string(puzzle_path)?;

    let mut solver = Solver::with_config(config);

    if let Some(rules_path) = matches.value_of("rules-file") {
        info!("Reading rules from '{}'", rules_path);
        solver.add_dimacs_cnf(fs::File::open(rules_path)?)?;
    }

    if sudoku::is_grid(&puzzle_text) {
        let givens = sudoku::encode_givens(&puzzle_text)?;
        info!("Encoded {} givens", givens.len());
        solver.add_formula(&givens);
    } else {
        solver.add_dimacs_cnf(puzzle_text.as_bytes())?;
    }

    let satisfiable = solver.solve()?;

    let stats = solver.stats();
    info!("Number of backtracks: {}", stats.backtracks);
    info!("Maximum recursion depth: {}", stats.max_depth);
    info!("Total recursive calls: {}", stats.recursive_calls);

    let out_path = format!("{}.out", puzzle_path);
    let mut out_file = fs::File::create(&out_path)?;

    if satisfiable {
        println!("s SATISFIABLE");
        let model = solver.model().unwrap();
        write_model(&mut out_file, model.dimacs_lits())?;
        info!("Solution written to '{}'", out_path);

        let grid = sudoku::decode_model(model);
        if sudoku::grid_is_valid(&grid) {
            println!("{}", sudoku::format_grid(&grid));
        }
    } else {
        println!("s UNSATISFIABLE");
        info!("Empty solution written to '{}'", out_path);
    }

    Ok(0)
}
