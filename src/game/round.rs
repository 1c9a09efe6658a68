use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub const KEY_COUNT: usize = 8;

/// A grid position. Correctness is judged by slot, never by which icon is drawn there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySlot(usize);

impl KeySlot {
    pub fn new(index: usize) -> Option<Self> {
        (index < KEY_COUNT).then_some(KeySlot(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn all() -> impl Iterator<Item = KeySlot> {
        (0..KEY_COUNT).filter_map(KeySlot::new)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        KeySlot(rng.random_range(0..KEY_COUNT))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }

    pub fn title(self) -> &'static str {
        match self {
            Outcome::Correct => "Correct!",
            Outcome::Incorrect => "Incorrect",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Highlighting,
    Hidden,
    Playable,
    Resolved(Outcome),
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Highlighting => "highlighting",
            Phase::Hidden => "hidden",
            Phase::Playable => "playable",
            Phase::Resolved(_) => "resolved",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("keys are not accepting input while the round is {0}")]
    NotPlayable(&'static str),
    #[error("round was already resolved as {0:?}")]
    AlreadyResolved(Outcome),
    #[error("no round in progress")]
    NoRound,
}

/// One play-through: the answer slot, the current icon arrangement and the phase.
///
/// `order[slot]` is the icon drawn at `slot`. It is only ever replaced by a full
/// shuffle, so it stays a permutation of `0..KEY_COUNT`.
#[derive(Clone, Debug)]
pub struct Round {
    answer: KeySlot,
    order: [usize; KEY_COUNT],
    phase: Phase,
    shuffles: u32,
    chosen: Option<KeySlot>,
}

impl Round {
    pub fn new(answer: KeySlot) -> Self {
        Round {
            answer,
            order: std::array::from_fn(|idx| idx),
            phase: Phase::Highlighting,
            shuffles: 0,
            chosen: None,
        }
    }

    pub fn answer(&self) -> KeySlot {
        self.answer
    }

    pub fn order(&self) -> &[usize; KEY_COUNT] {
        &self.order
    }

    pub fn icon_at(&self, slot: KeySlot) -> usize {
        self.order[slot.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }

    pub fn chosen(&self) -> Option<KeySlot> {
        self.chosen
    }

    pub fn highlight_active(&self) -> bool {
        self.phase == Phase::Highlighting
    }

    pub fn input_enabled(&self) -> bool {
        self.phase == Phase::Playable
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, Phase::Resolved(_))
    }

    pub fn highlighted_slot(&self) -> Option<KeySlot> {
        self.highlight_active().then_some(self.answer)
    }

    pub(crate) fn end_highlight(&mut self) -> bool {
        if self.phase != Phase::Highlighting {
            return false;
        }
        self.phase = Phase::Hidden;
        true
    }

    pub(crate) fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != Phase::Hidden {
            return false;
        }
        self.order.shuffle(rng);
        self.shuffles = self.shuffles.saturating_add(1);
        true
    }

    pub(crate) fn enable_input(&mut self) -> bool {
        if self.phase != Phase::Hidden {
            return false;
        }
        self.phase = Phase::Playable;
        true
    }

    pub(crate) fn guess(&mut self, slot: KeySlot) -> Result<Outcome, GuessError> {
        match self.phase {
            Phase::Playable => {}
            Phase::Resolved(outcome) => return Err(GuessError::AlreadyResolved(outcome)),
            other => return Err(GuessError::NotPlayable(other.name())),
        }

        let outcome = if slot == self.answer {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.phase = Phase::Resolved(outcome);
        self.chosen = Some(slot);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn slot(index: usize) -> KeySlot {
        KeySlot::new(index).expect("slot in range")
    }

    fn playable_round(answer: usize) -> Round {
        let mut round = Round::new(slot(answer));
        assert!(round.end_highlight());
        assert!(round.enable_input());
        round
    }

    #[test]
    fn key_slot_rejects_out_of_range() {
        assert!(KeySlot::new(7).is_some());
        assert!(KeySlot::new(KEY_COUNT).is_none());
        assert_eq!(KeySlot::all().count(), KEY_COUNT);
    }

    #[test]
    fn new_round_highlights_answer_with_identity_order() {
        let round = Round::new(slot(3));
        assert_eq!(round.order(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(round.highlight_active());
        assert!(!round.input_enabled());
        assert_eq!(round.highlighted_slot(), Some(slot(3)));
        assert_eq!(round.icon_at(slot(3)), 3);
    }

    #[test]
    fn shuffle_only_applies_while_hidden() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut round = Round::new(slot(0));
        assert!(!round.shuffle(&mut rng));
        assert_eq!(round.shuffles(), 0);

        round.end_highlight();
        for _ in 0..50 {
            assert!(round.shuffle(&mut rng));
            let mut sorted = *round.order();
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3, 4, 5, 6, 7]);
        }
        assert_eq!(round.shuffles(), 50);

        round.enable_input();
        assert!(!round.shuffle(&mut rng));
    }

    #[test]
    fn input_cannot_be_enabled_during_highlight() {
        let mut round = Round::new(slot(1));
        assert!(!round.enable_input());
        assert!(!round.input_enabled());
    }

    #[test]
    fn guess_before_playable_is_rejected() {
        let mut round = Round::new(slot(5));
        assert_eq!(
            round.guess(slot(5)),
            Err(GuessError::NotPlayable("highlighting"))
        );
        round.end_highlight();
        assert_eq!(round.guess(slot(5)), Err(GuessError::NotPlayable("hidden")));
        assert!(round.chosen().is_none());
    }

    #[test]
    fn guess_compares_slots_not_icons() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut round = Round::new(slot(2));
        round.end_highlight();
        for _ in 0..23 {
            round.shuffle(&mut rng);
        }
        round.enable_input();
        assert_eq!(round.guess(slot(2)), Ok(Outcome::Correct));
    }

    #[test]
    fn first_guess_locks_the_round() {
        let mut round = playable_round(4);
        assert_eq!(round.guess(slot(6)), Ok(Outcome::Incorrect));
        assert!(round.is_resolved());
        assert!(!round.input_enabled());
        assert_eq!(round.chosen(), Some(slot(6)));

        assert_eq!(
            round.guess(slot(4)),
            Err(GuessError::AlreadyResolved(Outcome::Incorrect))
        );
        assert_eq!(round.phase(), Phase::Resolved(Outcome::Incorrect));
        assert_eq!(round.chosen(), Some(slot(6)));
    }
}
