use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gdk;

use crate::config::debug_mode_enabled;
use crate::game;

use super::hud::update_subtitle;
use super::state::AppState;

fn show_debug_banner(state: &Rc<RefCell<AppState>>, text: &str) {
    let mut st = state.borrow_mut();
    st.debug_banner = Some(text.to_string());
    update_subtitle(&st);
}

pub fn handle_debug_shortcut(
    state: &Rc<RefCell<AppState>>,
    key: gdk::Key,
    mods: gdk::ModifierType,
) -> bool {
    if !mods.contains(gdk::ModifierType::CONTROL_MASK) {
        return false;
    }

    let is_debug_key = matches!(key, gdk::Key::A | gdk::Key::a | gdk::Key::R | gdk::Key::r);
    if !is_debug_key {
        return false;
    }

    if !debug_mode_enabled() {
        show_debug_banner(state, "DEBUG OFF | export LIMBOKEYS_DEBUG=1");
        return true;
    }

    match key {
        gdk::Key::A | gdk::Key::a => {
            let sequencer = state.borrow().sequencer();
            let answer = sequencer.and_then(|seq| seq.borrow().round().map(|round| round.answer()));
            match answer {
                Some(answer) => {
                    tracing::info!(slot = answer.index(), "[DEBUG] Answer slot");
                    show_debug_banner(state, &format!("DEBUG | Answer: key {}", answer.index() + 1));
                }
                None => show_debug_banner(state, "DEBUG | No round"),
            }
            true
        }
        _ => {
            let sequencer = state.borrow().sequencer();
            if let Some(sequencer) = sequencer {
                let pending = sequencer.borrow().pending_timers();
                game::abort(&sequencer);
                tracing::info!(pending, "[DEBUG] Round reset");
            }
            true
        }
    }
}
