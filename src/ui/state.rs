use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;

use crate::config::Settings;
use crate::game::{Round, Sequencer};

use super::board::KeyTile;

pub struct AppState {
    pub title_subtitle: Option<gtk::Label>,
    pub start_button: Option<gtk::Button>,
    pub celebration_layer: Option<gtk::Fixed>,
    pub keys: Vec<KeyTile>,

    // Game state
    pub sequencer: Option<Rc<RefCell<Sequencer>>>,
    pub round: Option<Round>,
    pub shuffle_anim_phase: bool,
    pub debug_banner: Option<String>,
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            title_subtitle: None,
            start_button: None,
            celebration_layer: None,
            keys: Vec::new(),
            sequencer: None,
            round: None,
            shuffle_anim_phase: false,
            debug_banner: None,
            settings: Settings::default(),
        }
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        AppState {
            settings,
            ..Self::default()
        }
    }

    pub fn input_enabled(&self) -> bool {
        self.round.as_ref().is_some_and(Round::input_enabled)
    }

    pub fn sequencer(&self) -> Option<Rc<RefCell<Sequencer>>> {
        self.sequencer.clone()
    }
}
