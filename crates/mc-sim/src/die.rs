//! Weighted die model

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::face::Face;

/// Default weight assigned to every face at construction
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One row of [`Die::show_die`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceWeight {
    pub face: Face,
    pub weight: f64,
}

/// A die with a fixed face set and adjustable per-face weights
///
/// Deserialization runs the same checks as [`Die::new`] and
/// [`Die::change_weight`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDie")]
pub struct Die {
    faces: Vec<Face>,
    weights: Vec<f64>,
}

/// Unchecked serialized form of a [`Die`]
#[derive(Deserialize)]
struct RawDie {
    faces: Vec<Face>,
    #[serde(default)]
    weights: Option<Vec<f64>>,
}

impl TryFrom<RawDie> for Die {
    type Error = SimError;

    fn try_from(raw: RawDie) -> Result<Self> {
        let mut die = Die::new(raw.faces)?;
        if let Some(weights) = raw.weights {
            if weights.len() != die.faces.len() {
                return Err(SimError::InvalidInput(format!(
                    "{} weights for {} faces",
                    weights.len(),
                    die.faces.len()
                )));
            }
            for (idx, weight) in weights.into_iter().enumerate() {
                die.weights[idx] = validate_weight(weight)?;
            }
        }
        Ok(die)
    }
}

impl Die {
    /// Create a die with every face weighted 1.0
    ///
    /// Faces must be non-empty and unique.
    pub fn new<I, F>(faces: I) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Face>,
    {
        let faces: Vec<Face> = faces.into_iter().map(Into::into).collect();
        if faces.is_empty() {
            return Err(SimError::InvalidInput("die needs at least one face".into()));
        }

        let mut seen = HashSet::with_capacity(faces.len());
        for face in &faces {
            if !seen.insert(face) {
                return Err(SimError::InvalidInput(format!("duplicate face {}", face)));
            }
        }

        let weights = vec![DEFAULT_WEIGHT; faces.len()];
        Ok(Self { faces, weights })
    }

    /// Faces in construction order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn index_of(&self, face: &Face) -> Option<usize> {
        self.faces.iter().position(|f| f == face)
    }

    /// Replace the weight of one face
    pub fn change_weight(&mut self, face: impl Into<Face>, new_weight: f64) -> Result<()> {
        let face = face.into();
        let idx = self
            .index_of(&face)
            .ok_or_else(|| SimError::InvalidFace(face.to_string()))?;
        let weight = validate_weight(new_weight)?;

        log::debug!("Weight of face {} changed {} -> {}", face, self.weights[idx], weight);
        self.weights[idx] = weight;
        Ok(())
    }

    /// Replace the weight of one face from a textual value such as `"2.5"`
    pub fn change_weight_str(&mut self, face: impl Into<Face>, new_weight: &str) -> Result<()> {
        let face = face.into();
        if self.index_of(&face).is_none() {
            return Err(SimError::InvalidFace(face.to_string()));
        }
        let weight = parse_weight(new_weight)?;
        self.change_weight(face, weight)
    }

    /// Weight of a face, if the face is on the die
    pub fn weight_of(&self, face: &Face) -> Option<f64> {
        self.index_of(face).map(|idx| self.weights[idx])
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Draw probability of a face (0.0 when the face is absent or all weights are zero)
    pub fn probability_of(&self, face: &Face) -> f64 {
        let total = self.total_weight();
        match self.weight_of(face) {
            Some(w) if total > 0.0 => w / total,
            _ => 0.0,
        }
    }

    /// Current face/weight table in construction order
    pub fn show_die(&self) -> Vec<FaceWeight> {
        self.faces
            .iter()
            .zip(&self.weights)
            .map(|(face, &weight)| FaceWeight {
                face: face.clone(),
                weight,
            })
            .collect()
    }

    /// Roll the die `num_rolls` times using the thread-local generator
    pub fn roll(&self, num_rolls: usize) -> Result<Vec<Face>> {
        self.roll_with(num_rolls, &mut rand::rng())
    }

    /// Roll the die `num_rolls` times with replacement
    ///
    /// Each draw picks a face with probability `weight / total_weight`; the
    /// weights are snapshotted once for the whole call.
    pub fn roll_with<R: Rng + ?Sized>(&self, num_rolls: usize, rng: &mut R) -> Result<Vec<Face>> {
        if num_rolls == 0 {
            return Err(SimError::InvalidInput("number of rolls must be positive".into()));
        }

        let dist = WeightedIndex::<f64>::new(self.weights.iter().copied())
            .map_err(|e| SimError::InvalidWeight(format!("cannot sample die: {}", e)))?;

        let mut rolls = Vec::with_capacity(num_rolls);
        for _ in 0..num_rolls {
            rolls.push(self.faces[dist.sample(rng)].clone());
        }
        Ok(rolls)
    }
}

/// Check that a weight is finite and non-negative
pub fn validate_weight(weight: f64) -> Result<f64> {
    if !weight.is_finite() {
        return Err(SimError::InvalidWeight(format!("{} is not a finite number", weight)));
    }
    if weight < 0.0 {
        return Err(SimError::InvalidWeight(format!("{} is negative", weight)));
    }
    Ok(weight)
}

/// Parse a textual weight into a non-negative finite number
pub fn parse_weight(text: &str) -> Result<f64> {
    let weight: f64 = text
        .trim()
        .parse()
        .map_err(|_| SimError::InvalidWeight(format!("{:?} is not a number", text)))?;
    validate_weight(weight)
}

/// Shared, mutable handle to a [`Die`]
///
/// Cloning the handle shares the die: a weight change through any clone is
/// seen by every game holding it on its next play.
#[derive(Debug, Clone)]
pub struct DieHandle {
    inner: Arc<RwLock<Die>>,
}

impl DieHandle {
    /// Wrap a die in a shared handle
    pub fn new(die: Die) -> Self {
        Self {
            inner: Arc::new(RwLock::new(die)),
        }
    }

    /// Build a die from faces and wrap it
    pub fn from_faces<I, F>(faces: I) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Face>,
    {
        Die::new(faces).map(Self::new)
    }

    pub fn change_weight(&self, face: impl Into<Face>, new_weight: f64) -> Result<()> {
        self.inner.write().change_weight(face, new_weight)
    }

    pub fn change_weight_str(&self, face: impl Into<Face>, new_weight: &str) -> Result<()> {
        self.inner.write().change_weight_str(face, new_weight)
    }

    pub fn roll(&self, num_rolls: usize) -> Result<Vec<Face>> {
        self.inner.read().roll(num_rolls)
    }

    pub fn roll_with<R: Rng + ?Sized>(&self, num_rolls: usize, rng: &mut R) -> Result<Vec<Face>> {
        self.inner.read().roll_with(num_rolls, rng)
    }

    pub fn show_die(&self) -> Vec<FaceWeight> {
        self.inner.read().show_die()
    }

    pub fn face_count(&self) -> usize {
        self.inner.read().face_count()
    }

    /// Copy of the die as it is right now
    pub fn snapshot(&self) -> Die {
        self.inner.read().clone()
    }

    /// Whether two handles point at the same die
    pub fn same_die(&self, other: &DieHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<Die> for DieHandle {
    fn from(die: Die) -> Self {
        Self::new(die)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_die_has_unit_weights() {
        let die = Die::new([1, 2, 3]).unwrap();
        let table = die.show_die();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|row| row.weight == 1.0));
        assert_eq!(table[0].face, Face::Int(1));
        assert_eq!(table[2].face, Face::Int(3));
    }

    #[test]
    fn test_new_die_rejects_bad_faces() {
        let empty: Vec<i64> = Vec::new();
        assert!(matches!(Die::new(empty), Err(SimError::InvalidInput(_))));
        assert!(matches!(Die::new([1, 1]), Err(SimError::InvalidInput(_))));
        assert!(matches!(Die::new(["H", "T", "H"]), Err(SimError::InvalidInput(_))));
    }

    #[test]
    fn test_change_weight() {
        let mut die = Die::new([1, 2, 3]).unwrap();
        die.change_weight(1, 2.0).unwrap();

        let table = die.show_die();
        assert_eq!(table[0].weight, 2.0);
        assert_eq!(table[1].weight, 1.0);
        assert_eq!(table[2].weight, 1.0);
        assert_eq!(die.total_weight(), 4.0);
    }

    #[test]
    fn test_change_weight_errors_leave_die_untouched() {
        let mut die = Die::new(["A", "B"]).unwrap();
        let before = die.clone();

        assert!(matches!(die.change_weight("C", 2.0), Err(SimError::InvalidFace(_))));
        assert!(matches!(die.change_weight("A", -1.0), Err(SimError::InvalidWeight(_))));
        assert!(matches!(die.change_weight("A", f64::NAN), Err(SimError::InvalidWeight(_))));
        assert!(matches!(die.change_weight_str("A", "heavy"), Err(SimError::InvalidWeight(_))));
        assert!(matches!(die.change_weight_str("Z", "1.0"), Err(SimError::InvalidFace(_))));

        assert_eq!(die, before);
    }

    #[test]
    fn test_change_weight_from_text() {
        let mut die = Die::new(["A", "B"]).unwrap();
        die.change_weight_str("B", " 3 ").unwrap();
        assert_eq!(die.weight_of(&Face::from("B")), Some(3.0));
        assert_relative_eq!(die.probability_of(&Face::from("B")), 0.75);
    }

    #[test]
    fn test_roll_count_and_membership() {
        let die = Die::new([1, 2, 3]).unwrap();
        let one = die.roll(1).unwrap();
        assert_eq!(one.len(), 1);
        assert!(die.faces().contains(&one[0]));

        let many = die.roll(50).unwrap();
        assert_eq!(many.len(), 50);
        assert!(many.iter().all(|f| die.faces().contains(f)));
    }

    #[test]
    fn test_roll_rejects_zero() {
        let die = Die::new([1, 2]).unwrap();
        assert!(matches!(die.roll(0), Err(SimError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_weight_face_never_drawn() {
        let mut die = Die::new([1, 2, 3]).unwrap();
        die.change_weight(2, 0.0).unwrap();
        die.change_weight(3, 0.0).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rolls = die.roll_with(200, &mut rng).unwrap();
        assert!(rolls.iter().all(|f| *f == Face::Int(1)));
    }

    #[test]
    fn test_all_zero_weights_cannot_roll() {
        let mut die = Die::new([1, 2]).unwrap();
        die.change_weight(1, 0.0).unwrap();
        die.change_weight(2, 0.0).unwrap();
        assert!(matches!(die.roll(1), Err(SimError::InvalidWeight(_))));
        assert_eq!(die.probability_of(&Face::Int(1)), 0.0);
    }

    #[test]
    fn test_weighted_sampling_converges() {
        let mut die = Die::new(["A", "B"]).unwrap();
        die.change_weight("B", 3.0).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let rolls = die.roll_with(100_000, &mut rng).unwrap();
        let a = rolls.iter().filter(|f| f.as_text() == Some("A")).count();
        let b = rolls.len() - a;

        assert_relative_eq!(b as f64 / a as f64, 3.0, epsilon = 0.1);
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let die = Die::new(1..=6).unwrap();
        let first = die.roll_with(20, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let second = die.roll_with(20, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_show_die_is_idempotent() {
        let die = Die::new(["x", "y"]).unwrap();
        assert_eq!(die.show_die(), die.show_die());
    }

    #[test]
    fn test_handle_shares_weights() {
        let handle = DieHandle::from_faces([1, 2]).unwrap();
        let other = handle.clone();
        assert!(handle.same_die(&other));

        other.change_weight(1, 0.0).unwrap();
        assert_eq!(handle.show_die()[0].weight, 0.0);
        assert_eq!(handle.roll(10).unwrap(), vec![Face::Int(2); 10]);
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let die: Die = serde_json::from_str(r#"{"faces":[1,2],"weights":[0.0,4.0]}"#).unwrap();
        assert_eq!(die.weight_of(&Face::Int(2)), Some(4.0));

        let unweighted: Die = serde_json::from_str(r#"{"faces":["H","T"]}"#).unwrap();
        assert_eq!(unweighted.total_weight(), 2.0);

        let duplicate = serde_json::from_str::<Die>(r#"{"faces":[1,1],"weights":[-5.0,1.0]}"#);
        assert!(duplicate.is_err());

        let negative = serde_json::from_str::<Die>(r#"{"faces":[1,2],"weights":[-5.0,1.0]}"#);
        assert!(negative.is_err());

        let too_many = serde_json::from_str::<Die>(r#"{"faces":[1],"weights":[0.0,1.0]}"#);
        assert!(too_many.is_err());

        let too_few = serde_json::from_str::<Die>(r#"{"faces":[1,2,3],"weights":[1.0]}"#);
        assert!(too_few.is_err());
    }

    #[test]
    fn test_serialized_die_reloads() {
        let mut die = Die::new(["A", "B", "C"]).unwrap();
        die.change_weight("C", 2.5).unwrap();
        let json = serde_json::to_string(&die).unwrap();
        assert_eq!(serde_json::from_str::<Die>(&json).unwrap(), die);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("1.5").unwrap(), 1.5);
        assert_eq!(parse_weight("0").unwrap(), 0.0);
        assert!(parse_weight("-2").is_err());
        assert!(parse_weight("inf").is_err());
        assert!(parse_weight("").is_err());
    }
}
