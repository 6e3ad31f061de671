//! Statistics over a played game

use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::face::Face;
use crate::game::Game;
use crate::table::{ComboCount, ComboTable, FaceCountsTable, OutcomeTable};

/// Read-only analysis of a game's latest outcomes
///
/// The analyzer borrows the game, so the game cannot be replayed while an
/// analyzer is alive. Every statistic is computed on demand.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    game: &'a Game,
}

impl<'a> Analyzer<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self { game }
    }

    /// The analyzed game
    pub fn game(&self) -> &'a Game {
        self.game
    }

    fn outcomes(&self) -> Result<&'a OutcomeTable> {
        self.game.outcomes().ok_or(SimError::NotPlayed)
    }

    /// Number of rolls in which every die shows the same face
    pub fn jackpot(&self) -> Result<usize> {
        Ok(self.jackpot_rolls()?.len())
    }

    /// 1-based roll numbers of every jackpot
    pub fn jackpot_rolls(&self) -> Result<Vec<usize>> {
        let outcomes = self.outcomes()?;
        Ok(outcomes
            .iter_rolls()
            .filter(|(_, faces)| is_jackpot(faces))
            .map(|(roll, _)| roll)
            .collect())
    }

    /// Share of rolls that were jackpots
    pub fn jackpot_rate(&self) -> Result<f64> {
        let rolls = self.outcomes()?.num_rolls();
        let jackpots = self.jackpot()?;
        Ok(if rolls > 0 {
            jackpots as f64 / rolls as f64
        } else {
            0.0
        })
    }

    /// How often each order-independent face combination was rolled
    pub fn combo(&self) -> Result<ComboTable> {
        let outcomes = self.outcomes()?;

        let mut counts: HashMap<Vec<Face>, usize> = HashMap::new();
        for (_, faces) in outcomes.iter_rolls() {
            let mut key = faces.to_vec();
            key.sort();
            *counts.entry(key).or_insert(0) += 1;
        }

        Ok(ComboTable::new(
            counts
                .into_iter()
                .map(|(faces, count)| ComboCount { faces, count })
                .collect(),
        ))
    }

    /// Per-roll count of every face observed anywhere in the outcomes
    pub fn face_counts_per_roll(&self) -> Result<FaceCountsTable> {
        let outcomes = self.outcomes()?;
        let faces = outcomes.distinct_faces();
        let column: HashMap<&Face, usize> = faces.iter().enumerate().map(|(i, f)| (f, i)).collect();

        let rows = outcomes
            .rows()
            .iter()
            .map(|row| {
                let mut counts = vec![0usize; faces.len()];
                for face in row {
                    counts[column[face]] += 1;
                }
                counts
            })
            .collect();

        Ok(FaceCountsTable::new(faces, rows))
    }
}

fn is_jackpot(faces: &[Face]) -> bool {
    match faces.split_first() {
        Some((first, rest)) => rest.iter().all(|f| f == first),
        None => false,
    }
}
