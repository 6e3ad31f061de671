//! # mc-sim — Weighted Dice Monte Carlo Simulator
//!
//! Rolls one or more weighted dice many times and counts what happened:
//! jackpots, face combinations, and per-roll face counts.
//!
//! ## Architecture
//!
//! ```text
//! Die (faces + weights)
//!     │  shared through DieHandle
//!     v
//! Game (dice, seeded RNG) ── play(rolls) ──> OutcomeTable
//!     │
//!     v
//! Analyzer ──> jackpot / combo / face_counts_per_roll
//!     │
//!     v
//! SimulationReport (text, markdown, JSON)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mc_sim::{Analyzer, DieHandle, Game};
//!
//! let die = DieHandle::from_faces(1..=6)?;
//! die.change_weight(6, 3.0)?;
//!
//! let mut game = Game::with_seed(vec![die.clone(), die], 42)?;
//! game.play(1000)?;
//!
//! let analyzer = Analyzer::new(&game);
//! let jackpots = analyzer.jackpot()?;
//! assert!(jackpots <= 1000);
//! # Ok::<(), mc_sim::SimError>(())
//! ```

pub mod analyzer;
pub mod config;
pub mod die;
pub mod error;
pub mod face;
pub mod game;
pub mod report;
pub mod table;

pub use analyzer::Analyzer;
pub use config::{DieSpec, SimulationConfig, WeightSpec};
pub use die::{DEFAULT_WEIGHT, Die, DieHandle, FaceWeight, parse_weight, validate_weight};
pub use error::{Result, SimError};
pub use face::{Face, faces};
pub use game::Game;
pub use report::{FaceTotal, SimulationReport};
pub use table::*;
