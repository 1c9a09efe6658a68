use gettextrs::gettext;

use crate::game::choreography::SHUFFLE_COUNT;
use crate::game::{Phase, Round};

use super::state::AppState;

pub(super) fn status_text(round: Option<&Round>) -> String {
    let Some(round) = round else {
        return gettext("Press Start");
    };
    match round.phase() {
        Phase::Highlighting => gettext("Watch the key"),
        Phase::Hidden if round.shuffles() == 0 || round.shuffles() >= SHUFFLE_COUNT => {
            gettext("Get ready")
        }
        Phase::Hidden => format!(
            "{} {}/{}",
            gettext("Shuffling"),
            round.shuffles(),
            SHUFFLE_COUNT
        ),
        Phase::Playable => gettext("Pick a key"),
        Phase::Resolved(outcome) => gettext(outcome.title()),
    }
}

pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.title_subtitle {
        match &st.debug_banner {
            Some(banner) => subtitle.set_text(banner),
            None => subtitle.set_text(&status_text(st.round.as_ref())),
        }
    }
}
