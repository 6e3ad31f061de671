//! Simulation configuration
//!
//! A config describes the dice of a game, how many rolls to play and an
//! optional seed. Configs load from JSON or YAML.
//!
//! ```yaml
//! rolls: 1000
//! seed: 42
//! dice:
//!   - faces: [1, 2, 3, 4, 5, 6]
//!     weights:
//!       - { face: 6, weight: 3.0 }
//!     count: 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::die::{Die, DieHandle, validate_weight};
use crate::error::{Result, SimError};
use crate::face::Face;
use crate::game::Game;
use crate::table::TableFormat;

/// Weight override for one face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    pub face: Face,
    pub weight: f64,
}

/// Description of one die, optionally repeated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieSpec {
    /// Faces in order
    pub faces: Vec<Face>,

    /// Weight overrides (faces not listed keep 1.0)
    #[serde(default)]
    pub weights: Vec<WeightSpec>,

    /// How many game columns share this die
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

impl DieSpec {
    /// A single unweighted die
    pub fn new<I, F>(faces: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Face>,
    {
        Self {
            faces: faces.into_iter().map(Into::into).collect(),
            weights: Vec::new(),
            count: 1,
        }
    }

    /// Builder: override one face's weight
    pub fn with_weight(mut self, face: impl Into<Face>, weight: f64) -> Self {
        self.weights.push(WeightSpec {
            face: face.into(),
            weight,
        });
        self
    }

    /// Builder: repeat this die
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Build the die with its weights applied
    pub fn build(&self) -> Result<Die> {
        let mut die = Die::new(self.faces.iter().cloned())?;
        for w in &self.weights {
            die.change_weight(w.face.clone(), w.weight)?;
        }
        Ok(die)
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Dice in column order
    pub dice: Vec<DieSpec>,

    /// Rolls per play
    #[serde(default = "default_rolls")]
    pub rolls: usize,

    /// Random seed for reproducibility (None = random)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Layout used when showing the outcome table
    #[serde(default)]
    pub format: TableFormat,
}

fn default_rolls() -> usize {
    1000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dice: Vec::new(),
            rolls: default_rolls(),
            seed: None,
            format: TableFormat::Wide,
        }
    }
}

impl SimulationConfig {
    /// `count` fair six-sided dice
    pub fn fair_d6(count: usize) -> Self {
        Self {
            dice: vec![DieSpec::new(1..=6).with_count(count)],
            ..Default::default()
        }
    }

    /// A single fair coin with faces `H` and `T`
    pub fn coin() -> Self {
        Self {
            dice: vec![DieSpec::new(["H", "T"])],
            ..Default::default()
        }
    }

    /// Builder: add a die
    pub fn with_die(mut self, die: DieSpec) -> Self {
        self.dice.push(die);
        self
    }

    /// Builder: set rolls per play
    pub fn with_rolls(mut self, rolls: usize) -> Self {
        self.rolls = rolls;
        self
    }

    /// Builder: set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: set table format
    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }

    /// Total number of game columns
    pub fn dice_count(&self) -> usize {
        self.dice.iter().map(|d| d.count).sum()
    }

    /// Parse a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Config(format!("JSON: {}", e)))
    }

    /// Parse a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| SimError::Config(format!("YAML: {}", e)))
    }

    /// Load a config file, choosing the parser by extension (`.json`, otherwise YAML)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        log::debug!("Loaded config from {} ({} dice)", path.display(), config.dice_count());
        Ok(config)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Check the config without building anything
    pub fn validate(&self) -> Result<()> {
        if self.dice.is_empty() {
            return Err(SimError::InvalidInput("config has no dice".into()));
        }
        if self.rolls == 0 {
            return Err(SimError::InvalidInput("rolls must be positive".into()));
        }
        for (idx, spec) in self.dice.iter().enumerate() {
            if spec.count == 0 {
                return Err(SimError::InvalidInput(format!("die spec {} has count 0", idx + 1)));
            }
            for w in &spec.weights {
                validate_weight(w.weight)?;
            }
        }
        Ok(())
    }

    /// Build an unplayed game from this config
    ///
    /// Each spec is built once; its `count` columns share that die.
    pub fn build(&self) -> Result<Game> {
        self.validate()?;

        let mut dice = Vec::with_capacity(self.dice_count());
        for spec in &self.dice {
            let handle = DieHandle::new(spec.build()?);
            dice.extend(std::iter::repeat_n(handle, spec.count));
        }

        match self.seed {
            Some(seed) => Game::with_seed(dice, seed),
            None => Game::new(dice),
        }
    }
}
