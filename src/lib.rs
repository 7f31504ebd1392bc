//! Scans play-by-play scorebooks for single-game feats (multi-homer games,
//! four-hit games, double-digit strikeout games) and prints them as dated logs.

pub mod engine;
pub mod game;
pub mod registry;
pub mod report;
pub mod scorebook;

pub use engine::{accept_all, print_report, process_file, process_game, ProgressSink};
pub use report::{render, render_with, Accumulator, BigGameKind, BigGameLog, LogEntry};
