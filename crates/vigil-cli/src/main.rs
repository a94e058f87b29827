//! Demo driver for the VIGIL gaze pipeline.
//!
//! Builds the 12-feed camera wall, scripts a noisy gaze path over it
//! (scan the wall, settle on a bedroom feed past the ghost threshold),
//! and prints every one-shot reaction plus the final report summary.

use clap::{Parser, Subcommand};
use rand::Rng;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use vigil_core::{
    EventSink, GazeEvent, ObservationSession, RawSample, Rect, Region, RegionKind, SampleMailbox,
    Scene, SinkError, TickDriver, VigilConfig, DEFAULT_TICK_MS,
};

#[derive(Parser)]
#[command(name = "vigil-cli")]
struct Cli {
    /// Optional TOML config overriding the built-in tuning.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted demo session and print the report.
    Demo {
        /// Gaze noise amplitude in pixels.
        #[arg(long, default_value_t = 6.0)]
        noise_px: f32,
    },
    /// Print the wall layout the demo uses.
    Wall {},
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vigil_core=info,vigil_cli=info"));
    fmt().with_env_filter(filter).init();
}

/// 12 feeds, 4 types cycling, 4 columns x 3 rows of 220x160 tiles.
fn build_wall() -> Vec<Region> {
    const TYPES: [RegionKind; 4] = [
        RegionKind::Bedroom,
        RegionKind::Office,
        RegionKind::Corridor,
        RegionKind::Elevator,
    ];
    (0..12)
        .map(|i| {
            let col = (i % 4) as f32;
            let row = (i / 4) as f32;
            Region::fixed(
                format!("cam-{i:02}"),
                TYPES[i % TYPES.len()],
                Rect::new(40.0 + col * 240.0, 40.0 + row * 180.0, 220.0, 160.0),
            )
        })
        .collect()
}

struct PrintSink;

impl EventSink for PrintSink {
    fn deliver(&mut self, event: &GazeEvent) -> Result<(), SinkError> {
        match event {
            GazeEvent::RegionEntered { region_id, kind } => {
                info!(region = %region_id, kind = kind.as_str(), "gaze entered feed");
            }
            GazeEvent::DwellLevel {
                region_id,
                dwell_seconds,
                ..
            } => {
                info!(region = %region_id, dwell = dwell_seconds, "dwell level reached");
            }
            GazeEvent::AuditEntry {
                region_id,
                dwell_seconds,
                ..
            } => {
                info!(region = %region_id, dwell = dwell_seconds, sensitive = true, "audit entry");
            }
            GazeEvent::ScoreChanged { total } => {
                info!(total, "score bonus granted");
            }
            GazeEvent::RevealMedia { region_id } => {
                info!(region = %region_id, "revealing feed media");
            }
        }
        Ok(())
    }
}

fn run_demo(cfg: VigilConfig, noise_px: f32) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ObservationSession::new(cfg);
    session.start();
    session.set_scene(Scene::Observation {
        regions: build_wall(),
    });

    let mailbox = SampleMailbox::new();
    let mut driver = TickDriver::new(session, mailbox.clone());
    let mut sink = PrintSink;
    let mut rng = rand::thread_rng();

    // Scripted gaze: sweep the top row for 2s, then settle on cam-00
    // (bedroom, center 150x120) for 4s, straight through the ghost level.
    let tick = DEFAULT_TICK_MS as i64;
    let mut now = 0i64;
    for i in 0..120 {
        let (tx, ty) = if i < 40 {
            (40.0 + (i as f32 / 40.0) * 900.0, 120.0)
        } else {
            (150.0, 120.0)
        };
        let x = tx + rng.gen_range(-noise_px..=noise_px);
        let y = ty + rng.gen_range(-noise_px..=noise_px);
        mailbox.publish(RawSample::new(x, y, now));
        driver.step(now, &mut sink);
        now += tick;
    }

    let session = driver.into_session();
    let summary = session.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => VigilConfig::from_toml_file(path)?,
        None => VigilConfig::default(),
    };

    match cli.cmd {
        Commands::Demo { noise_px } => run_demo(cfg, noise_px)?,
        Commands::Wall {} => {
            for region in build_wall() {
                let b = region.bounds();
                println!(
                    "{}  {:<8}  x={:>5.0} y={:>5.0} w={:.0} h={:.0}",
                    region.id,
                    region.kind.as_str(),
                    b.x,
                    b.y,
                    b.w,
                    b.h
                );
            }
        }
    }
    Ok(())
}
