//! Round lifecycle for the key game, independent of any toolkit.

pub mod choreography;
pub mod round;
pub mod scheduler;
pub mod sequencer;


pub use round::{GuessError, KEY_COUNT, KeySlot, Outcome, Phase, Round};
pub use scheduler::{Scheduler, TimerHandle};
pub use sequencer::{
    AudioCue, Celebration, Collaborators, ResultNotifier, RoundEvent, Sequencer, StartError,
    abort, choose_key, start,
};
