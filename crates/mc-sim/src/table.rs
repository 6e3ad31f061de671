//! Result tables produced by games and analyzers
//!
//! Tables are plain row-major containers. Row indices are 1-based roll
//! numbers (index name `roll`), matching how results are reported.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::face::Face;

/// Name of the row index in every per-roll table
pub const ROLL_INDEX: &str = "roll";

/// Name of the single column of the narrow table
pub const FACES_COLUMN: &str = "faces";

/// Column name for a 1-based die ordinal (`die1`, `die2`, ...)
pub fn die_column(ordinal: usize) -> String {
    format!("die{}", ordinal)
}

/// Layout of [`crate::Game::show_game`] output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// One row per roll, one column per die
    #[default]
    Wide,
    /// One row per (roll, die) pair
    Narrow,
}

impl FromStr for TableFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide" => Ok(TableFormat::Wide),
            "narrow" => Ok(TableFormat::Narrow),
            other => Err(SimError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Wide => f.write_str("wide"),
            TableFormat::Narrow => f.write_str("narrow"),
        }
    }
}

/// Outcomes of one play: rows = rolls, columns = dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTable {
    columns: Vec<String>,
    rows: Vec<Vec<Face>>,
}

impl OutcomeTable {
    /// Assemble a table from per-die roll columns
    ///
    /// Every column must have the same length.
    pub(crate) fn from_columns(columns: Vec<Vec<Face>>) -> Self {
        let rolls = columns.first().map_or(0, Vec::len);
        debug_assert!(columns.iter().all(|c| c.len() == rolls));

        let rows = (0..rolls)
            .map(|r| columns.iter().map(|col| col[r].clone()).collect())
            .collect();
        let names = (1..=columns.len()).map(die_column).collect();

        Self {
            columns: names,
            rows,
        }
    }

    /// Column names, `die1..dieN`
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in roll order
    pub fn rows(&self) -> &[Vec<Face>] {
        &self.rows
    }

    /// Faces of a 1-based roll
    pub fn roll(&self, roll: usize) -> Option<&[Face]> {
        roll.checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .map(Vec::as_slice)
    }

    /// Rows with their 1-based roll numbers
    pub fn iter_rolls(&self) -> impl Iterator<Item = (usize, &[Face])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i + 1, row.as_slice()))
    }

    /// Number of rolls
    pub fn num_rolls(&self) -> usize {
        self.rows.len()
    }

    /// Number of dice
    pub fn num_dice(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rolls(), self.num_dice())
    }

    /// Every face observed anywhere in the table, sorted and deduplicated
    pub fn distinct_faces(&self) -> Vec<Face> {
        let mut faces: Vec<Face> = self.rows.iter().flatten().cloned().collect();
        faces.sort();
        faces.dedup();
        faces
    }

    /// Stack into one row per (roll, die) pair, roll-major
    pub fn to_narrow(&self) -> NarrowTable {
        let rows = self
            .iter_rolls()
            .flat_map(|(roll, faces)| {
                faces.iter().enumerate().map(move |(d, face)| NarrowRow {
                    roll,
                    die: die_column(d + 1),
                    face: face.clone(),
                })
            })
            .collect();
        NarrowTable { rows }
    }
}

/// One row of the narrow table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowRow {
    pub roll: usize,
    pub die: String,
    pub face: Face,
}

/// Stacked outcomes: index (roll, die), one column `faces`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrowTable {
    rows: Vec<NarrowRow>,
}

impl NarrowTable {
    pub fn rows(&self) -> &[NarrowRow] {
        &self.rows
    }

    /// (rows, 1)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), 1)
    }
}

/// Either layout of a game's outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum GameTable {
    Wide(OutcomeTable),
    Narrow(NarrowTable),
}

impl GameTable {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            GameTable::Wide(t) => t.shape(),
            GameTable::Narrow(t) => t.shape(),
        }
    }

    pub fn format(&self) -> TableFormat {
        match self {
            GameTable::Wide(_) => TableFormat::Wide,
            GameTable::Narrow(_) => TableFormat::Narrow,
        }
    }

    pub fn as_wide(&self) -> Option<&OutcomeTable> {
        match self {
            GameTable::Wide(t) => Some(t),
            GameTable::Narrow(_) => None,
        }
    }

    pub fn as_narrow(&self) -> Option<&NarrowTable> {
        match self {
            GameTable::Wide(_) => None,
            GameTable::Narrow(t) => Some(t),
        }
    }
}

impl fmt::Display for GameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameTable::Wide(t) => {
                write!(f, "{}", ROLL_INDEX)?;
                for col in t.columns() {
                    write!(f, "\t{}", col)?;
                }
                writeln!(f)?;
                for (roll, faces) in t.iter_rolls() {
                    write!(f, "{}", roll)?;
                    for face in faces {
                        write!(f, "\t{}", face)?;
                    }
                    writeln!(f)?;
                }
            }
            GameTable::Narrow(t) => {
                writeln!(f, "{}\tdie\t{}", ROLL_INDEX, FACES_COLUMN)?;
                for row in t.rows() {
                    writeln!(f, "{}\t{}\t{}", row.roll, row.die, row.face)?;
                }
            }
        }
        Ok(())
    }
}

/// One distinct combination and how many rolls produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboCount {
    /// Faces of the roll, sorted ascending
    pub faces: Vec<Face>,
    pub count: usize,
}

/// Frequency of order-independent face combinations
///
/// Entries are ordered by count descending, ties by combination ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTable {
    entries: Vec<ComboCount>,
}

impl ComboTable {
    pub(crate) fn new(mut entries: Vec<ComboCount>) -> Self {
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.faces.cmp(&b.faces)));
        Self { entries }
    }

    pub fn entries(&self) -> &[ComboCount] {
        &self.entries
    }

    /// Number of distinct combinations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for a combination, in any face order
    pub fn count_of(&self, faces: &[Face]) -> usize {
        let mut key = faces.to_vec();
        key.sort();
        self.entries
            .iter()
            .find(|e| e.faces == key)
            .map_or(0, |e| e.count)
    }

    /// Sum of all counts (equals the number of rolls)
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Most frequent combination
    pub fn most_common(&self) -> Option<&ComboCount> {
        self.entries.first()
    }
}

/// Per-roll count of each observed face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCountsTable {
    faces: Vec<Face>,
    rows: Vec<Vec<usize>>,
}

impl FaceCountsTable {
    pub(crate) fn new(faces: Vec<Face>, rows: Vec<Vec<usize>>) -> Self {
        Self { faces, rows }
    }

    /// Column faces, sorted ascending
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Count of `face` in a 1-based roll (0 for faces never observed)
    pub fn count(&self, roll: usize, face: &Face) -> usize {
        let Some(col) = self.faces.iter().position(|f| f == face) else {
            return 0;
        };
        roll.checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .map_or(0, |row| row[col])
    }

    /// Total count of each face across all rolls, in column order
    pub fn totals(&self) -> Vec<usize> {
        (0..self.faces.len())
            .map(|col| self.rows.iter().map(|row| row[col]).sum())
            .collect()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.faces.len())
    }
}
