use actionflow_rs::action::engine::TickOutcome;
use actionflow_rs::action::loader::GraphLoader;
use actionflow_rs::action::registry::TypeRegistry;
use actionflow_rs::action::runner::ActionRunner;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a graph file and run it to completion
    Run {
        /// Path to the graph file
        #[arg(short, long)]
        file: String,

        /// Ticks per second, overrides the file
        #[arg(long)]
        frame_rate: Option<f32>,

        /// Stop after this many ticks, overrides the file
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Pace ticks in wall-clock time
        #[arg(long)]
        realtime: bool,

        /// Print an engine snapshot as JSON after every tick
        #[arg(long)]
        json: bool,
    },
    /// List registered payload types
    Types,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let registry = TypeRegistry::with_builtins();

    match args.command {
        Commands::Run {
            file,
            frame_rate,
            max_ticks,
            realtime,
            json,
        } => {
            let mut loaded = GraphLoader::new()
                .load_graph(&file, &registry)
                .with_context(|| format!("Failed to load graph from {}", file))?;

            if let Some(frame_rate) = frame_rate {
                loaded.runner.frame_rate = frame_rate;
            }
            if max_ticks.is_some() {
                loaded.runner.max_ticks = max_ticks;
            }
            if !(loaded.runner.frame_rate.is_finite() && loaded.runner.frame_rate > 0.0) {
                bail!("Frame rate must be positive, got {}", loaded.runner.frame_rate);
            }

            println!("Running graph: {}", loaded.name);
            if !loaded.description.is_empty() {
                println!("{}", loaded.description);
            }

            let mut runner = ActionRunner::from_loaded(loaded);
            if !runner.enable() && !runner.start() {
                bail!("Graph has no runnable root Behavior");
            }

            let mut json_error = None;
            let summary = runner
                .run(realtime, |outcome, snapshot| {
                    if json {
                        match serde_json::to_string(&snapshot) {
                            Ok(line) => println!("{}", line),
                            Err(e) => json_error = Some(e),
                        }
                    } else if let TickOutcome::Transitioned { from, via, to } = outcome {
                        println!("{} -> {} -> {}", from, via, to);
                    }
                })
                .await;
            if let Some(e) = json_error {
                return Err(e.into());
            }

            runner.disable();
            match summary.outcome {
                TickOutcome::Completed { node } => {
                    println!("Completed at node {} after {} ticks", node, summary.ticks)
                }
                TickOutcome::Abandoned { node } => {
                    println!("Abandoned at node {} after {} ticks", node, summary.ticks)
                }
                _ => println!("Stopped after {} ticks", summary.ticks),
            }
        }
        Commands::Types => {
            for info in registry.types() {
                match info.kind {
                    Some(kind) => println!("{:<10} {}", kind.to_string(), info.key),
                    None => println!("{:<10} {}", "Custom", info.key),
                }
            }
        }
    }

    Ok(())
}
