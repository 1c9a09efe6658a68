use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use gettextrs::gettext;
use gio::SimpleAction;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use crate::audio::RodioCue;
use crate::config::load_settings;
use crate::game::{self, Collaborators, KeySlot, Round, RoundEvent, Scheduler, Sequencer};

use super::board::{CONTENT_MARGIN, build_key_grid, render_round, reset_board};
use super::celebration::Fireworks;
use super::debug_tools;
use super::dialogs::{ResultDialog, show_about_dialog, show_instructions_dialog};
use super::hud::update_subtitle;
use super::state::AppState;
use super::timers::GlibScheduler;

pub const APP_ID: &str = "io.tiramisu.LimboKeys";

pub fn handle_key_click(state: &Rc<RefCell<AppState>>, slot: KeySlot) {
    let sequencer = {
        let st = state.borrow();
        if !st.input_enabled() {
            tracing::debug!(slot = slot.index(), "Tap ignored, keys are inert");
            return;
        }
        st.sequencer()
    };
    let Some(sequencer) = sequencer else {
        return;
    };
    if let Err(err) = game::choose_key(&sequencer, slot) {
        tracing::debug!(slot = slot.index(), %err, "Guess rejected");
    }
}

pub(super) fn press_start(state: &Rc<RefCell<AppState>>) {
    let sequencer = state.borrow().sequencer();
    let Some(sequencer) = sequencer else {
        return;
    };
    if let Err(err) = game::start(&sequencer) {
        tracing::debug!(%err, "Start ignored");
    }
}

fn on_round_event(state: &Rc<RefCell<AppState>>, round: &Round, event: RoundEvent) {
    let mut st = state.borrow_mut();
    match event {
        RoundEvent::Started => {
            st.debug_banner = None;
            if let Some(button) = &st.start_button {
                button.set_visible(false);
            }
        }
        RoundEvent::Resolved(_) => st.debug_banner = None,
        RoundEvent::Aborted => {
            st.debug_banner = None;
            st.round = None;
            reset_board(&st);
            if let Some(button) = &st.start_button {
                button.set_visible(true);
            }
            update_subtitle(&st);
            return;
        }
        _ => {}
    }
    let previous = st.round.replace(round.clone());
    render_round(&mut st, previous.as_ref(), round, event);
    update_subtitle(&st);
}

fn connect_sequencer(state: &Rc<RefCell<AppState>>, window: &adw::ApplicationWindow) {
    let (settings, start_button, layer) = {
        let st = state.borrow();
        (
            st.settings.clone(),
            st.start_button.clone(),
            st.celebration_layer.clone(),
        )
    };
    let (Some(start_button), Some(layer)) = (start_button, layer) else {
        tracing::warn!("Game view incomplete, sequencer not connected");
        return;
    };

    let scheduler: Rc<dyn Scheduler> = Rc::new(GlibScheduler::new());
    let collaborators = Collaborators {
        audio: Box::new(RodioCue::new(&settings)),
        celebration: Box::new(Fireworks::new(layer)),
        notifier: Box::new(ResultDialog::new(window, &start_button)),
    };
    let mut sequencer = Sequencer::new(scheduler, collaborators);
    sequencer.set_sound_asset(settings.sound_asset.clone());

    let state_weak = Rc::downgrade(state);
    sequencer.subscribe(move |round, event| {
        if let Some(state) = state_weak.upgrade() {
            on_round_event(&state, round, event);
        }
    });

    state.borrow_mut().sequencer = Some(Rc::new(RefCell::new(sequencer)));
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    let mut registered = true;
    RESOURCES_INIT.call_once(|| {
        if let Err(err) = gio::resources_register_include!("limbokeys.gresource") {
            tracing::warn!(%err, "Failed to register embedded resources");
            registered = false;
        }
    });
    if !registered {
        return;
    }

    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    for resource_path in [
        "/io/tiramisu/LimboKeys/style.css",
        "/io/tiramisu/LimboKeys/style.dark.css",
    ] {
        let provider = gtk::CssProvider::new();
        provider.load_from_resource(resource_path);
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Center);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_grid = build_key_grid(state);
    board_grid.set_margin_top(40);
    board_grid.set_margin_bottom(40);
    board_grid.set_margin_start(40);
    board_grid.set_margin_end(40);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Center);
    board_card.set_valign(gtk::Align::Center);
    board_card.add_css_class("limbo-board-container");
    board_card.append(&board_grid);

    let celebration_layer = gtk::Fixed::new();
    celebration_layer.set_hexpand(true);
    celebration_layer.set_vexpand(true);
    celebration_layer.set_can_target(false);
    celebration_layer.add_css_class("celebration-layer");

    let board_overlay = gtk::Overlay::new();
    board_overlay.set_child(Some(&board_card));
    board_overlay.add_overlay(&celebration_layer);

    let start_button = gtk::Button::with_label(&gettext("Start"));
    start_button.add_css_class("suggested-action");
    start_button.add_css_class("pill");
    start_button.add_css_class("start-button");
    start_button.set_halign(gtk::Align::Center);
    start_button.set_size_request(100, -1);
    start_button.connect_clicked({
        let state = state.clone();
        move |_| {
            press_start(&state);
        }
    });

    content.append(&board_overlay);
    content.append(&start_button);
    root.append(&content);

    {
        let mut st = state.borrow_mut();
        st.start_button = Some(start_button);
        st.celebration_layer = Some(celebration_layer);
    }

    root
}

pub fn run() -> glib::ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let state = Rc::new(RefCell::new(AppState::new(load_settings())));

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<primary>q"]);

        let title_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_box.set_valign(gtk::Align::Center);
        title_box.set_halign(gtk::Align::Center);

        let title_main = gtk::Label::builder()
            .label(gettext("LimboKeys"))
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let title_subtitle = gtk::Label::builder()
            .label("")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_box.append(&title_main);
        title_box.append(&title_subtitle);

        let header = adw::HeaderBar::builder().title_widget(&title_box).build();
        header.add_css_class("flat");

        let menu_model = gio::Menu::new();
        menu_model.append(Some(&gettext("Instructions")), Some("app.instructions"));
        menu_model.append(Some(&gettext("About LimboKeys")), Some("app.about"));
        menu_model.append(Some(&gettext("Quit")), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();
        header.pack_end(&menu_button);

        let game_view = build_game_view(&state);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title(gettext("LimboKeys"))
            .icon_name(APP_ID)
            .default_width(420)
            .default_height(620)
            .content(&toolbar)
            .build();
        win.set_size_request(320, 520);
        win.add_css_class("app-window");

        let style_manager = adw::StyleManager::default();
        if style_manager.is_dark() {
            win.add_css_class("theme-dark");
        }
        style_manager.connect_notify_local(Some("dark"), {
            let win = win.clone();
            move |manager, _| {
                if manager.is_dark() {
                    win.add_css_class("theme-dark");
                } else {
                    win.remove_css_class("theme-dark");
                }
            }
        });

        {
            let mut st = state.borrow_mut();
            st.title_subtitle = Some(title_subtitle);
            update_subtitle(&st);
        }
        connect_sequencer(&state, &win);

        let global_key = gtk::EventControllerKey::new();
        global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
        global_key.connect_key_pressed({
            let state = state.clone();
            move |_, key, _, mods| {
                if debug_tools::handle_debug_shortcut(&state, key, mods) {
                    return glib::Propagation::Stop;
                }
                glib::Propagation::Proceed
            }
        });
        win.add_controller(global_key);

        win.connect_close_request({
            let state = state.clone();
            move |_| {
                let sequencer = state.borrow().sequencer();
                if let Some(sequencer) = sequencer {
                    game::abort(&sequencer);
                }
                glib::Propagation::Proceed
            }
        });

        win.present();
    });

    app.run()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::game::choreography::{HIGHLIGHT_DURATION, INPUT_ENABLE_AT};
    use crate::game::scheduler::ManualScheduler;
    use crate::game::{AudioCue, Celebration, Outcome, ResultNotifier};

    use super::*;

    struct SilentAudio;

    impl AudioCue for SilentAudio {
        fn play(&mut self, _asset: &str) {}
        fn stop(&mut self) {}
    }

    struct CountingCelebration(Rc<Cell<u32>>);

    impl Celebration for CountingCelebration {
        fn trigger(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct RecordingNotifier(Rc<RefCell<Vec<Outcome>>>);

    impl ResultNotifier for RecordingNotifier {
        fn present(&mut self, outcome: Outcome) {
            self.0.borrow_mut().push(outcome);
        }
    }

    fn snapshot(sequencer: &Rc<RefCell<Sequencer>>) -> Round {
        sequencer
            .borrow()
            .round()
            .cloned()
            .expect("round in progress")
    }

    #[test]
    fn taps_are_dropped_until_the_board_has_seen_input_open() {
        let scheduler = Rc::new(ManualScheduler::default());
        let celebrations = Rc::new(Cell::new(0));
        let notices = Rc::new(RefCell::new(Vec::new()));
        let collaborators = Collaborators {
            audio: Box::new(SilentAudio),
            celebration: Box::new(CountingCelebration(Rc::clone(&celebrations))),
            notifier: Box::new(RecordingNotifier(Rc::clone(&notices))),
        };
        let dyn_scheduler: Rc<dyn Scheduler> = scheduler.clone();
        let sequencer = Rc::new(RefCell::new(Sequencer::with_rng(
            dyn_scheduler,
            collaborators,
            StdRng::seed_from_u64(5),
        )));
        game::start(&sequencer).expect("round starts");

        scheduler.advance(HIGHLIGHT_DURATION);
        let hidden = snapshot(&sequencer);
        assert!(!hidden.input_enabled());
        scheduler.advance(INPUT_ENABLE_AT - HIGHLIGHT_DURATION + Duration::from_millis(1));
        assert!(snapshot(&sequencer).input_enabled());

        let state = Rc::new(RefCell::new(AppState::default()));
        {
            let mut st = state.borrow_mut();
            st.sequencer = Some(Rc::clone(&sequencer));
            st.round = Some(hidden);
        }

        let answer = snapshot(&sequencer).answer();
        handle_key_click(&state, answer);
        assert_eq!(celebrations.get(), 0);
        assert!(notices.borrow().is_empty());
        assert!(snapshot(&sequencer).input_enabled());

        state.borrow_mut().round = Some(snapshot(&sequencer));
        handle_key_click(&state, answer);
        assert_eq!(celebrations.get(), 1);
        assert_eq!(*notices.borrow(), vec![Outcome::Correct]);
        assert!(snapshot(&sequencer).is_resolved());
    }

    #[test]
    fn outcome_replaces_a_debug_banner() {
        let state = Rc::new(RefCell::new(AppState::default()));
        let mut round = Round::new(KeySlot::all().next().expect("eight slots"));
        on_round_event(&state, &round, RoundEvent::Started);
        state.borrow_mut().debug_banner = Some("DEBUG | Answer: key 1".to_string());

        round.end_highlight();
        round.enable_input();
        let outcome = round.guess(round.answer()).expect("input is open");
        on_round_event(&state, &round, RoundEvent::Resolved(outcome));
        assert!(state.borrow().debug_banner.is_none());

        state.borrow_mut().debug_banner = Some("DEBUG | Answer: key 1".to_string());
        on_round_event(&state, &round, RoundEvent::Aborted);
        let st = state.borrow();
        assert!(st.debug_banner.is_none());
        assert!(st.round.is_none());
    }

    #[test]
    fn taps_without_a_round_do_nothing() {
        let state = Rc::new(RefCell::new(AppState::default()));
        handle_key_click(&state, KeySlot::all().next().expect("eight slots"));
        assert!(state.borrow().round.is_none());
    }
}
