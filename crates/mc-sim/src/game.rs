//! Game sessions: a fixed set of dice rolled together

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::die::DieHandle;
use crate::error::{Result, SimError};
use crate::table::{GameTable, OutcomeTable, TableFormat, die_column};

/// A set of dice with equal face counts and the outcomes of their latest play
///
/// Dice are held through shared handles, so weight changes made after the
/// game is built still apply to every later [`Game::play`].
#[derive(Debug)]
pub struct Game {
    dice: Vec<DieHandle>,
    rng: ChaCha8Rng,
    seed: Option<u64>,
    outcomes: Option<OutcomeTable>,
}

impl Game {
    /// Create a game seeded from the operating system
    pub fn new(dice: impl IntoIterator<Item = DieHandle>) -> Result<Self> {
        Self::build(dice, None)
    }

    /// Create a game whose plays are reproducible for a given seed
    pub fn with_seed(dice: impl IntoIterator<Item = DieHandle>, seed: u64) -> Result<Self> {
        Self::build(dice, Some(seed))
    }

    fn build(dice: impl IntoIterator<Item = DieHandle>, seed: Option<u64>) -> Result<Self> {
        let dice: Vec<DieHandle> = dice.into_iter().collect();
        let Some(first) = dice.first() else {
            return Err(SimError::InvalidInput("game needs at least one die".into()));
        };

        let expected = first.face_count();
        for (idx, die) in dice.iter().enumerate().skip(1) {
            let found = die.face_count();
            if found != expected {
                return Err(SimError::MismatchedDice {
                    die: idx + 1,
                    expected,
                    found,
                });
            }
        }

        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };

        Ok(Self {
            dice,
            rng,
            seed,
            outcomes: None,
        })
    }

    /// Dice in column order
    pub fn dice(&self) -> &[DieHandle] {
        &self.dice
    }

    pub fn dice_count(&self) -> usize {
        self.dice.len()
    }

    /// Face count shared by every die
    pub fn faces_per_die(&self) -> usize {
        self.dice[0].face_count()
    }

    /// Seed the game was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Column names, `die1..dieN`
    pub fn column_names(&self) -> Vec<String> {
        (1..=self.dice.len()).map(die_column).collect()
    }

    pub fn is_played(&self) -> bool {
        self.outcomes.is_some()
    }

    /// Outcomes of the latest play
    pub fn outcomes(&self) -> Option<&OutcomeTable> {
        self.outcomes.as_ref()
    }

    /// Number of rolls in the latest play (0 before any play)
    pub fn rolls(&self) -> usize {
        self.outcomes.as_ref().map_or(0, OutcomeTable::num_rolls)
    }

    /// Roll every die `rolls` times, replacing any previous outcomes
    ///
    /// On error the previous outcomes are kept.
    pub fn play(&mut self, rolls: usize) -> Result<()> {
        if rolls == 0 {
            return Err(SimError::InvalidInput("number of rolls must be positive".into()));
        }

        let mut columns = Vec::with_capacity(self.dice.len());
        for die in &self.dice {
            columns.push(die.roll_with(rolls, &mut self.rng)?);
        }

        let table = OutcomeTable::from_columns(columns);
        log::debug!(
            "Played {} rolls of {} dice ({} faces each)",
            rolls,
            self.dice.len(),
            self.faces_per_die()
        );
        self.outcomes = Some(table);
        Ok(())
    }

    /// Outcomes of the latest play as `"wide"` or `"narrow"`
    pub fn show_game(&self, format: &str) -> Result<GameTable> {
        self.show_game_as(format.parse()?)
    }

    /// Outcomes of the latest play in the given layout
    pub fn show_game_as(&self, format: TableFormat) -> Result<GameTable> {
        let outcomes = self.outcomes.as_ref().ok_or(SimError::NotPlayed)?;
        Ok(match format {
            TableFormat::Wide => GameTable::Wide(outcomes.clone()),
            TableFormat::Narrow => GameTable::Narrow(outcomes.to_narrow()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::Face;

    fn d3() -> DieHandle {
        DieHandle::from_faces([1, 2, 3]).unwrap()
    }

    #[test]
    fn test_game_requires_dice() {
        let err = Game::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SimError::InvalidInput(_)));
    }

    #[test]
    fn test_mismatched_dice_rejected() {
        let coin = DieHandle::from_faces(["H", "T"]).unwrap();
        let err = Game::new(vec![d3(), d3(), coin]).unwrap_err();
        assert_eq!(
            err,
            SimError::MismatchedDice {
                die: 3,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_equal_counts_with_different_faces_allowed() {
        let letters = DieHandle::from_faces(["a", "b", "c"]).unwrap();
        let game = Game::new(vec![d3(), letters]).unwrap();
        assert_eq!(game.dice_count(), 2);
        assert_eq!(game.faces_per_die(), 3);
        assert_eq!(game.column_names(), vec!["die1", "die2"]);
    }

    #[test]
    fn test_play_shapes() {
        let die = d3();
        let mut game = Game::with_seed(vec![die.clone(), die.clone(), die], 1).unwrap();
        game.play(3).unwrap();

        assert_eq!(game.show_game("wide").unwrap().shape(), (3, 3));
        assert_eq!(game.show_game("narrow").unwrap().shape(), (9, 1));
        assert_eq!(game.rolls(), 3);
    }

    #[test]
    fn test_show_game_errors() {
        let mut game = Game::new(vec![d3()]).unwrap();
        assert_eq!(game.show_game("wide"), Err(SimError::NotPlayed));

        game.play(2).unwrap();
        assert!(matches!(game.show_game("invalid"), Err(SimError::InvalidFormat(_))));
    }

    #[test]
    fn test_play_replaces_outcomes() {
        let mut game = Game::with_seed(vec![d3(), d3()], 5).unwrap();
        game.play(10).unwrap();
        assert_eq!(game.rolls(), 10);
        game.play(4).unwrap();
        assert_eq!(game.rolls(), 4);
        assert_eq!(game.outcomes().unwrap().shape(), (4, 2));
    }

    #[test]
    fn test_failed_play_keeps_previous_outcomes() {
        let die = d3();
        let mut game = Game::with_seed(vec![die.clone()], 5).unwrap();
        game.play(3).unwrap();
        let before = game.outcomes().cloned();

        assert!(matches!(game.play(0), Err(SimError::InvalidInput(_))));
        for face in 1..=3 {
            die.change_weight(face, 0.0).unwrap();
        }
        assert!(matches!(game.play(3), Err(SimError::InvalidWeight(_))));
        assert_eq!(game.outcomes().cloned(), before);
    }

    #[test]
    fn test_show_game_is_idempotent() {
        let mut game = Game::with_seed(vec![d3(), d3()], 11).unwrap();
        game.play(5).unwrap();
        assert_eq!(game.show_game("wide").unwrap(), game.show_game("wide").unwrap());
        assert_eq!(game.show_game("narrow").unwrap(), game.show_game("narrow").unwrap());
    }

    #[test]
    fn test_seeded_games_repeat() {
        let mut a = Game::with_seed(vec![d3(), d3()], 99).unwrap();
        let mut b = Game::with_seed(vec![d3(), d3()], 99).unwrap();
        a.play(25).unwrap();
        b.play(25).unwrap();
        assert_eq!(a.outcomes(), b.outcomes());
        assert_eq!(a.seed(), Some(99));
    }

    #[test]
    fn test_weight_change_after_construction_applies() {
        let die = d3();
        let mut game = Game::with_seed(vec![die.clone(), die.clone()], 3).unwrap();
        die.change_weight(1, 0.0).unwrap();
        die.change_weight(2, 0.0).unwrap();

        game.play(20).unwrap();
        let outcomes = game.outcomes().unwrap();
        assert!(outcomes.rows().iter().flatten().all(|f| *f == Face::Int(3)));
    }
}
