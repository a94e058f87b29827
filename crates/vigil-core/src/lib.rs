//! # vigil-core
//!
//! Gaze-signal processing and fixation/reaction pipeline for the VIGIL
//! surveillance installation.
//!
//! This crate provides:
//! - **Sample filtering**: EMA smoothing with blink-spike rejection
//! - **Region snapping**: spatial bias toward nearby camera-feed centers
//! - **Fixation tracking**: a leveled dwell state machine with one-shot
//!   escalating reactions
//! - **Scoring & analytics**: weighted voyeur score, per-type dwell
//!   totals, stability rating, behavioral profile
//! - **Tick driving**: a fixed-cadence loop fed by a single-slot mailbox
//!
//! ## Example
//!
//! ```ignore
//! use vigil_core::{
//!     ObservationSession, Region, RegionKind, Rect, Scene, VigilConfig,
//!     SampleMailbox, TickDriver,
//! };
//!
//! let mut session = ObservationSession::new(VigilConfig::default());
//! session.start();
//! session.set_scene(Scene::Observation {
//!     regions: vec![Region::fixed("cam-0", RegionKind::Bedroom,
//!                                 Rect::new(0.0, 0.0, 320.0, 240.0))],
//! });
//!
//! let mailbox = SampleMailbox::new();
//! let mut driver = TickDriver::new(session, mailbox.clone());
//! // publish RawSamples into `mailbox` from the gaze source,
//! // then drive: driver.run(&mut sink) or driver.step(now_ms, &mut sink)
//! println!("{:?}", driver.session().summary());
//! ```

pub mod config;
pub mod domain;
pub mod driver;
pub mod events;
pub mod filter;
pub mod fixation;
pub mod region;
pub mod scoring;
pub mod session;
pub mod snap;

pub use config::{ConfigError, FilterConfig, FixationConfig, ScoringConfig, SnapConfig, VigilConfig};
pub use domain::{RawSample, Rect, RegionKind, SmoothedPoint, SnappedPoint};
pub use driver::{SampleMailbox, StopHandle, TickDriver, DEFAULT_TICK_MS};
pub use events::{EventSink, GazeEvent, NullSink, RecordingSink, SinkError};
pub use filter::{FilterOutput, SampleFilter};
pub use fixation::{FixationEvent, FixationLevel, FixationMachine, FixationSession};
pub use region::{Region, RegionIndex};
pub use scoring::{ScoreEngine, SessionSummary};
pub use session::{ObservationSession, Scene, TickReport};
pub use snap::RegionSnapper;
