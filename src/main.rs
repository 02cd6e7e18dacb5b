use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use shape_canvas::codec;
use shape_canvas::{
    Canvas, CanvasConfig, JournalStore, RenderSurface, ShapeFilter, ShapeRecord, ShapeStore,
    TickOutcome,
};

/// Inspect and replay a shape journal without a UI
#[derive(Parser, Debug)]
#[command(name = "shape_canvas", version)]
struct Cli {
    /// Journal file, created if it does not exist
    #[arg(long, default_value = "shapes.journal")]
    journal: PathBuf,

    /// Optional JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print stored rows
    List {
        #[arg(long, default_value = "all")]
        filter: ShapeFilter,
    },
    /// Remove the newest shape and print the replay
    Undo,
    /// Print every render call for the stored history
    Redraw,
    /// Replay stored shapes at the configured tick interval
    Restore {
        #[arg(long, default_value = "all")]
        filter: ShapeFilter,
    },
}

/// Writes each surface call to stdout
struct PrintSurface;

impl RenderSurface for PrintSurface {
    fn clear(&mut self) {
        println!("clear");
    }

    fn render_shape(&mut self, record: &ShapeRecord) {
        println!(
            "render {} {} border={} fill={} filled={} {}",
            record.id,
            record.shape_type(),
            codec::encode_color(record.style.border),
            codec::encode_color(record.style.fill),
            record.shape.is_filled(),
            codec::encode_geometry(&record.shape),
        );
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => CanvasConfig::load(path)?,
        None => CanvasConfig::default(),
    };
    let store = JournalStore::open(&cli.journal)?;
    let mut canvas = Canvas::with_config(store, &config);
    let mut surface = PrintSurface;

    match cli.command {
        Command::List { filter } => {
            for row in canvas.store().list(filter)? {
                println!(
                    "{}\t{}\tborder={}\tfill={}\tfilled={}\t{}",
                    row.id,
                    row.shape_type,
                    row.border_color,
                    row.fill_color,
                    row.is_filled,
                    row.extra_data
                );
            }
        }
        Command::Undo => {
            if canvas.on_undo_requested(&mut surface)?.is_none() {
                println!("nothing to undo");
            }
        }
        Command::Redraw => {
            canvas.redraw(&mut surface)?;
        }
        Command::Restore { filter } => {
            canvas.on_restore_requested(filter, &mut surface)?;
            canvas.on_poll(Instant::now(), &mut surface);
            while canvas.is_replaying() {
                if let Some(wake) = canvas.scheduler().next_tick_at() {
                    thread::sleep(wake.saturating_duration_since(Instant::now()));
                }
                let outcome = canvas.on_poll(Instant::now(), &mut surface);
                if let Some(TickOutcome::Skipped(id, e)) = outcome {
                    eprintln!("skipped {}: {}", id, e);
                }
            }
        }
    }
    Ok(())
}
