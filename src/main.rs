use anyhow::Context;
use chalkboard::scheduler::FrameRequests;
use chalkboard::{Capabilities, Chalkboard, Config, export, replay};
use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "chalkboard")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CHALKBOARD_GIT_HASH"), ")"),
    about = "Chalk-textured drawing board, driven by recorded input scripts"
)]
struct Cli {
    /// Replay a JSON input script and export the result
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory exported images are written to (overrides save.directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Seed for chalk grain and background speckle
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Do not export the board after the script finishes
    #[arg(long, action = ArgAction::SetTrue)]
    no_save: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    let Some(script_path) = cli.script.as_deref() else {
        // No script: show usage
        println!("chalkboard: Chalk-textured drawing board");
        println!();
        println!("Usage:");
        println!("  chalkboard --script input.json              Replay a script and save a PNG");
        println!("  chalkboard --script input.json -o out/      Save into a specific directory");
        println!("  chalkboard --print-default-config           Show the default config");
        println!("  chalkboard --help                           Show help");
        println!();
        println!("Controls inside scripts (default bindings):");
        println!("  Space  clear the board");
        println!("  S      save a PNG");
        println!("  E      toggle the eraser");
        println!("  H      toggle help");
        return Ok(());
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.output_dir {
        config.save.directory = dir.to_string_lossy().into_owned();
    }

    let script = replay::load_script(script_path)
        .with_context(|| format!("Failed to load script {}", script_path.display()))?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&saved);
    let capabilities =
        Capabilities::new().on_save(move |path| sink.borrow_mut().push(path.to_path_buf()));

    let start = Instant::now();
    let mut board = Chalkboard::with_rng(
        &config,
        script.width,
        script.height,
        FrameRequests::default(),
        start,
        rng,
    )?
    .with_capabilities(capabilities);

    let (report, end) = replay::run(&mut board, &script, start)
        .with_context(|| format!("Failed to replay {}", script_path.display()))?;
    log::info!(
        "Replay finished: {} events, {} frames, {} points",
        report.events,
        report.frames,
        report.points_rendered
    );

    if !cli.no_save {
        board
            .save(end, export::timestamp_millis())
            .context("Failed to export board")?;
    }

    for path in saved.borrow().iter() {
        println!("{}", path.display());
    }

    Ok(())
}
