use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use super::choreography::{self, Cue};
use super::round::{GuessError, KeySlot, Outcome, Round};
use super::scheduler::{Scheduler, TimerHandle};

pub const DEFAULT_SOUND_ASSET: &str = "Song";

pub trait AudioCue {
    /// Best effort; failures are the implementation's to log.
    fn play(&mut self, asset: &str);
    fn stop(&mut self);
}

pub trait Celebration {
    fn trigger(&mut self);
}

pub trait ResultNotifier {
    fn present(&mut self, outcome: Outcome);
}

pub struct Collaborators {
    pub audio: Box<dyn AudioCue>,
    pub celebration: Box<dyn Celebration>,
    pub notifier: Box<dyn ResultNotifier>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    Started,
    HighlightEnded,
    Shuffled { step: u32 },
    InputEnabled,
    Resolved(Outcome),
    Aborted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("a round is already in progress ({phase})")]
    RoundInFlight { phase: &'static str },
}

type Listener = Box<dyn Fn(&Round, RoundEvent)>;

pub struct Sequencer {
    round: Option<Round>,
    round_id: u64,
    pending: Vec<TimerHandle>,
    scheduler: Rc<dyn Scheduler>,
    rng: StdRng,
    sound_asset: String,
    collaborators: Collaborators,
    listeners: Vec<Listener>,
}

impl Sequencer {
    pub fn new(scheduler: Rc<dyn Scheduler>, collaborators: Collaborators) -> Self {
        Self::with_rng(scheduler, collaborators, StdRng::from_os_rng())
    }

    pub fn with_rng(
        scheduler: Rc<dyn Scheduler>,
        collaborators: Collaborators,
        rng: StdRng,
    ) -> Self {
        Sequencer {
            round: None,
            round_id: 0,
            pending: Vec::new(),
            scheduler,
            rng,
            sound_asset: DEFAULT_SOUND_ASSET.to_string(),
            collaborators,
            listeners: Vec::new(),
        }
    }

    pub fn set_sound_asset(&mut self, asset: impl Into<String>) {
        self.sound_asset = asset.into();
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Round, RoundEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: RoundEvent) {
        if let Some(round) = &self.round {
            for listener in &self.listeners {
                listener(round, event);
            }
        }
    }

    fn cancel_pending(&mut self) {
        for handle in self.pending.drain(..) {
            self.scheduler.cancel(handle);
        }
    }

    fn apply_cue(&mut self, cue: Cue) -> Option<RoundEvent> {
        let round = self.round.as_mut()?;
        match cue {
            Cue::EndHighlight => round
                .end_highlight()
                .then_some(RoundEvent::HighlightEnded),
            Cue::Shuffle(step) => round
                .shuffle(&mut self.rng)
                .then_some(RoundEvent::Shuffled { step }),
            Cue::EnableInput => {
                if !round.enable_input() {
                    return None;
                }
                self.pending.clear();
                Some(RoundEvent::InputEnabled)
            }
        }
    }
}

/// Presses Start: picks a fresh answer and arms the whole choreography.
pub fn start(seq: &Rc<RefCell<Sequencer>>) -> Result<(), StartError> {
    begin_round(seq, None)
}

pub(crate) fn begin_round(
    seq: &Rc<RefCell<Sequencer>>,
    forced_answer: Option<KeySlot>,
) -> Result<(), StartError> {
    let mut guard = seq.borrow_mut();
    let st = &mut *guard;

    if let Some(round) = &st.round
        && !round.is_resolved()
    {
        return Err(StartError::RoundInFlight {
            phase: round.phase().name(),
        });
    }

    st.cancel_pending();
    st.round_id = st.round_id.wrapping_add(1);
    let round_id = st.round_id;

    st.collaborators.audio.stop();
    st.collaborators.audio.play(&st.sound_asset);

    let answer = forced_answer.unwrap_or_else(|| KeySlot::random(&mut st.rng));
    st.round = Some(Round::new(answer));
    tracing::info!(round = round_id, answer = answer.index(), "Round started");
    st.emit(RoundEvent::Started);

    let weak = Rc::downgrade(seq);
    for (offset, cue) in choreography::timeline() {
        let weak = Weak::clone(&weak);
        let handle = st
            .scheduler
            .schedule(offset, Box::new(move || run_cue(&weak, round_id, cue)));
        st.pending.push(handle);
    }
    Ok(())
}

fn run_cue(seq: &Weak<RefCell<Sequencer>>, round_id: u64, cue: Cue) {
    let Some(seq) = seq.upgrade() else {
        return;
    };
    let mut st = seq.borrow_mut();
    if st.round_id != round_id {
        tracing::debug!(round = round_id, ?cue, "Dropping stale cue");
        return;
    }
    if let Some(event) = st.apply_cue(cue) {
        st.emit(event);
    }
}

/// The single guess of a round. Anything but the first guess after input opens
/// is rejected without side effects.
pub fn choose_key(seq: &Rc<RefCell<Sequencer>>, slot: KeySlot) -> Result<Outcome, GuessError> {
    let mut guard = seq.borrow_mut();
    let st = &mut *guard;
    let round = st.round.as_mut().ok_or(GuessError::NoRound)?;

    let outcome = match round.guess(slot) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(slot = slot.index(), %err, "Guess ignored");
            return Err(err);
        }
    };
    tracing::info!(
        round = st.round_id,
        slot = slot.index(),
        answer = round.answer().index(),
        ?outcome,
        "Round resolved"
    );

    if outcome.is_correct() {
        st.collaborators.celebration.trigger();
    }
    st.collaborators.notifier.present(outcome);
    st.emit(RoundEvent::Resolved(outcome));
    Ok(outcome)
}

/// Drops the current round, cancelling every timer it still has queued.
pub fn abort(seq: &Rc<RefCell<Sequencer>>) {
    let mut st = seq.borrow_mut();
    st.cancel_pending();
    st.collaborators.audio.stop();
    if st.round.is_some() {
        st.round_id = st.round_id.wrapping_add(1);
        st.emit(RoundEvent::Aborted);
        st.round = None;
        tracing::info!("Round aborted");
    }
}
