#![allow(unused_imports)]

use zchess_engine_lib::types::*;
use zchess_engine_lib::tables::*;
use zchess_engine_lib::explore::*;
use zchess_engine_lib::parsing::STARTPOS;

use std::path::PathBuf;
use std::time::{Duration,Instant};

use anyhow::{anyhow,Context,Result};
use clap::{Parser,Subcommand};
use log::{debug,info};
use simplelog::*;

#[derive(Parser,Debug)]
#[command(name = "zchess_engine", about = "perft and search driver")]
struct Cli {
    /// off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level:    String,

    /// log to this file instead of the terminal
    #[arg(long)]
    log_file:     Option<PathBuf>,

    #[command(subcommand)]
    cmd:          Cmd,
}

#[derive(Subcommand,Debug)]
enum Cmd {
    /// Count leaf nodes
    Perft {
        depth:          Depth,
        #[arg(long, default_value = STARTPOS)]
        fen:            String,
        /// split root moves across threads
        #[arg(long)]
        par:            bool,
    },
    /// Leaf count per root move
    Divide {
        depth:          Depth,
        #[arg(long, default_value = STARTPOS)]
        fen:            String,
    },
    /// Search for a best move
    Search {
        #[arg(long, default_value = STARTPOS)]
        fen:            String,
        /// coordinate moves played from the FEN first
        #[arg(long, num_args = 1..)]
        moves:          Vec<String>,
        #[arg(long)]
        depth:          Option<Depth>,
        /// milliseconds
        #[arg(long)]
        movetime:       Option<u64>,
        #[arg(long)]
        nodes:          Option<u64>,
        /// JSON `ExConfig`
        #[arg(long)]
        config:         Option<PathBuf>,
    },
}

fn init_logger(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<()> {
    let cfg = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();

    match log_file {
        Some(path) => {
            let logfile = std::fs::File::create(path)
                .with_context(|| format!("creating log file {:?}", path))?;
            WriteLogger::init(level, cfg, logfile)?;
        },
        None => {
            TermLogger::init(level, cfg, TerminalMode::Stderr, ColorChoice::Auto)?;
        },
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ExConfig> {
    match path {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {:?}", path))?;
            let cfg = ExConfig::from_json(&s)
                .with_context(|| format!("parsing config {:?}", path))?;
            debug!("loaded config: {:?}", cfg);
            Ok(cfg)
        },
        None => Ok(ExConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = cli.log_level.parse::<LevelFilter>()
        .map_err(|_| anyhow!("unknown log level: {}", cli.log_level))?;
    init_logger(level, cli.log_file.as_ref())?;

    let ts = &_TABLES;

    match cli.cmd {
        Cmd::Perft { depth, fen, par } => {
            let mut g = Game::from_fen(ts, &fen)?;
            let t0 = Instant::now();
            let n = if par { g.perft_par(ts, depth) } else { g.perft(ts, depth) };
            let dt = t0.elapsed().as_secs_f64();
            println!("perft({}) = {}", depth, n);
            println!("finished in {:.3} seconds, {:.0} nodes/s", dt, n as f64 / dt.max(1e-9));
        },
        Cmd::Divide { depth, fen } => {
            let mut g = Game::from_fen(ts, &fen)?;
            let mut total = 0;
            for (mv,n) in g.perft_divide(ts, depth) {
                println!("{}: {}", mv, n);
                total += n;
            }
            println!("\nmoves: {}", g.generate_legal(ts).len());
            println!("total: {}", total);
        },
        Cmd::Search { fen, moves, depth, movetime, nodes, config } => {
            let cfg = load_config(config.as_ref())?;
            let mut g = Game::from_fen(ts, &fen)?;
            g.run_moves(ts, &moves)?;

            let limits = SearchLimits {
                depth,
                movetime: movetime.map(Duration::from_millis),
                nodes,
            };
            let limits = if limits == SearchLimits::default() {
                SearchLimits::depth(6)
            } else { limits };

            info!("searching {} with {:?}", g.to_fen(), limits);

            let mut ex = Explorer::new(g, cfg, limits);
            let res = ex.find_best_move(ts);

            res.stats.print(res.elapsed);
            match res.best_move {
                Some(mv) => println!("bestmove {} score {} depth {}", mv, res.score, res.depth),
                None     => println!("no legal moves, score {}", res.score),
            }
        },
    }

    Ok(())
}
