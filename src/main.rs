use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use adventure::GameState;
use adventure::engine::{Output, OutputBlock};
use adventure::persist::JsonFileStore;

fn flush_output(out: Output) {
    let mut printed_anything = false;
    let mut started_events = false;

    for block in out.blocks {
        match block {
            OutputBlock::Title(t) => {
                println!("\n{}", t);
                printed_anything = true;
            }
            OutputBlock::Text(line) => {
                println!("{}", line);
                printed_anything = true;
            }
            OutputBlock::Event(ev) => {
                if !started_events {
                    if printed_anything {
                        println!();
                    }
                    started_events = true;
                }
                println!("{}", ev);
                printed_anything = true;
            }
            OutputBlock::Exits(exits) => {
                println!("\n{}", exits);
                printed_anything = true;
            }
        }
    }
}

struct Args {
    world: PathBuf,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut world = None;
    let mut seed = None;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let value = args.next().ok_or("--seed needs a number")?;
            seed = Some(
                value
                    .parse::<u64>()
                    .map_err(|_| format!("bad seed '{}'", value))?,
            );
        } else if world.is_none() {
            world = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument '{}'", arg));
        }
    }

    Ok(Args {
        world: world.unwrap_or_else(|| PathBuf::from("public/castle.toml")),
        seed,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("usage: adventure [WORLD.toml] [--seed N]\n{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let world = match adventure::load_world_from_file(&args.world) {
        Ok(w) => w,
        Err(e) => {
            error!(path = %args.world.display(), "world failed to load");
            eprintln!("Failed to load world file '{}': {e}", args.world.display());
            return ExitCode::FAILURE;
        }
    };

    println!("Welcome to {}!", world.name);
    if !world.desc.trim().is_empty() {
        println!("{}", world.desc.trim());
    }
    println!();
    println!("Type 'look' to look around, 'quit' to exit.");

    let save_path = args.world.with_extension("save.json");
    let state = match args.seed {
        Some(seed) => GameState::with_seed(world, seed),
        None => GameState::new(world),
    };
    let mut state = state.with_store(JsonFileStore::new(save_path));

    flush_output(state.initialize());

    match run(&mut state) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("I/O error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(state: &mut GameState) -> io::Result<()> {
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            println!("\nGoodbye.");
            return Ok(());
        }

        let (out, quit) = state.step(&input);
        flush_output(out);

        if quit {
            return Ok(());
        }
    }
}
