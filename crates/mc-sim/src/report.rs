//! Report generation for analyzed games

use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::error::Result;
use crate::face::Face;
use crate::table::ComboCount;

/// Combos listed in text and Markdown output
const TOP_COMBOS: usize = 10;

/// Summary of one played game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Report title
    pub title: String,

    pub dice: usize,
    pub faces_per_die: usize,
    pub rolls: usize,
    pub seed: Option<u64>,

    pub jackpots: usize,
    pub jackpot_rate: f64,

    /// Every distinct combination, most frequent first
    pub combos: Vec<ComboCount>,

    /// Observed faces and how often each appeared across all dice and rolls
    pub face_totals: Vec<FaceTotal>,
}

/// Total appearances of one face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceTotal {
    pub face: Face,
    pub count: usize,
}

impl SimulationReport {
    /// Run every analysis and collect the results
    pub fn from_analyzer(title: impl Into<String>, analyzer: &Analyzer<'_>) -> Result<Self> {
        let game = analyzer.game();
        let counts = analyzer.face_counts_per_roll()?;
        let face_totals = counts
            .faces()
            .iter()
            .cloned()
            .zip(counts.totals())
            .map(|(face, count)| FaceTotal { face, count })
            .collect();

        Ok(Self {
            title: title.into(),
            dice: game.dice_count(),
            faces_per_die: game.faces_per_die(),
            rolls: game.rolls(),
            seed: game.seed(),
            jackpots: analyzer.jackpot()?,
            jackpot_rate: analyzer.jackpot_rate()?,
            combos: analyzer.combo()?.entries().to_vec(),
            face_totals,
        })
    }

    fn combo_label(combo: &ComboCount) -> String {
        combo
            .faces
            .iter()
            .map(Face::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generate text report
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", self.title));
        output.push_str(&format!("{}\n\n", "=".repeat(self.title.len())));

        output.push_str(&format!(
            "Dice: {} x {} faces, {} rolls",
            self.dice, self.faces_per_die, self.rolls
        ));
        if let Some(seed) = self.seed {
            output.push_str(&format!(", seed {}", seed));
        }
        output.push_str("\n\n");

        output.push_str(&format!(
            "Jackpots: {} ({:.2}%)\n",
            self.jackpots,
            self.jackpot_rate * 100.0
        ));
        output.push_str(&format!("Distinct combos: {}\n\n", self.combos.len()));

        output.push_str("Top combos:\n");
        for combo in self.combos.iter().take(TOP_COMBOS) {
            output.push_str(&format!("  [{}] x {}\n", Self::combo_label(combo), combo.count));
        }
        if self.combos.len() > TOP_COMBOS {
            output.push_str(&format!("  ... and {} more\n", self.combos.len() - TOP_COMBOS));
        }
        output.push('\n');

        output.push_str("Face totals:\n");
        for total in &self.face_totals {
            output.push_str(&format!("  {}: {}\n", total.face, total.count));
        }

        output
    }

    /// Generate JSON report
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }

    /// Generate markdown report
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Dice | {} |\n", self.dice));
        output.push_str(&format!("| Faces per die | {} |\n", self.faces_per_die));
        output.push_str(&format!("| Rolls | {} |\n", self.rolls));
        if let Some(seed) = self.seed {
            output.push_str(&format!("| Seed | {} |\n", seed));
        }
        output.push_str(&format!("| Jackpots | {} |\n", self.jackpots));
        output.push_str(&format!("| Jackpot rate | {:.2}% |\n", self.jackpot_rate * 100.0));
        output.push_str(&format!("| Distinct combos | {} |\n\n", self.combos.len()));

        output.push_str("## Top Combos\n\n");
        output.push_str("| Combo | Count |\n");
        output.push_str("|-------|-------|\n");
        for combo in self.combos.iter().take(TOP_COMBOS) {
            output.push_str(&format!("| {} | {} |\n", Self::combo_label(combo), combo.count));
        }
        output.push('\n');

        output.push_str("## Face Totals\n\n");
        output.push_str("| Face | Count |\n");
        output.push_str("|------|-------|\n");
        for total in &self.face_totals {
            output.push_str(&format!("| {} | {} |\n", total.face, total.count));
        }

        output
    }
}
