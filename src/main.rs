//! Autopin CLI
//!
//! Usage:
//!   autopin [OPTIONS] [SCENE]
//!
//! Options:
//!   -c, --config <FILE>   Layout configuration (TOML format)
//!   -u, --update <FILE>   Scene re-declared in place after installing
//!       --container <NAME> Item whose constraints the update reconciles (default: root)
//!   -d, --describe        Also print every active constraint
//!   -h, --help            Print help
//!
//! Set `RUST_LOG=autopin=debug` to trace batching and updates.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use autopin::{LayoutConfig, LayoutHost, Scene};

#[derive(Parser)]
#[command(name = "autopin")]
#[command(about = "Install constraint scenes and print the solved frames")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    scene: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scene whose constraints update the installed ones in place
    #[arg(short, long)]
    update: Option<PathBuf>,

    /// Item whose constraints the update reconciles (defaults to the root)
    #[arg(long, value_name = "NAME", requires = "update")]
    container: Option<String>,

    /// Print the active constraints after the frames
    #[arg(short, long)]
    describe: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let scene = match &cli.scene {
        Some(path) => Scene::from_file(path),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            Scene::from_toml_str(&buffer)
        }
    };
    let scene = match scene {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut layout = match scene.build(&config) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.update {
        let container = cli.container.as_deref();
        let outcome = Scene::from_file(path)
            .and_then(|update| update.update_named(&mut layout, container));
        match outcome {
            Ok(outcome) => tracing::info!(
                updated = outcome.updated.len(),
                installed = outcome.installed.len(),
                "update applied"
            ),
            Err(e) => {
                eprintln!("Error applying update '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    for (name, frame) in layout.host_mut().frames() {
        println!("{} {}", name, frame);
    }

    if cli.describe {
        let canvas = layout.host();
        for item in canvas.items() {
            for constraint in canvas.current_constraints(item) {
                println!("{}", canvas.describe(&constraint));
            }
        }
    }
}
