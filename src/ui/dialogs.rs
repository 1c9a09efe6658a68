use gettextrs::gettext;
use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;

use adw::prelude::*;

use crate::game::{Outcome, ResultNotifier};

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let body = gettext(
        "Press Start and watch which key lights up.\n\
The keys are then shuffled around the grid.\n\
When they settle, pick the key sitting where the lit one started.",
    );
    let dialog = adw::AlertDialog::new(Some(&gettext("Instructions")), Some(&body));
    dialog.add_response("ok", &gettext("Got it"));
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("LimboKeys")
        .application_icon("io.tiramisu.LimboKeys")
        .developer_name("tiramisu")
        .developers(vec!["tiramisu"])
        .version(env!("CARGO_PKG_VERSION"))
        .comments(gettext("Keep your eye on the key."))
        .build();
    dialog.add_legal_section(
        "LimboKeys",
        Some("© 2024 tiramisu"),
        gtk::License::MitX11,
        None,
    );
    dialog.present(app.active_window().as_ref());
    dialog
}

pub struct ResultDialog {
    window: glib::WeakRef<adw::ApplicationWindow>,
    start_button: gtk::Button,
}

impl ResultDialog {
    pub fn new(window: &adw::ApplicationWindow, start_button: &gtk::Button) -> Self {
        ResultDialog {
            window: window.downgrade(),
            start_button: start_button.clone(),
        }
    }
}

impl ResultNotifier for ResultDialog {
    fn present(&mut self, outcome: Outcome) {
        let dialog = adw::AlertDialog::new(Some(&gettext(outcome.title())), None);
        dialog.add_response("ok", &gettext("OK"));
        dialog.set_default_response(Some("ok"));
        dialog.set_close_response("ok");
        dialog.connect_response(None, {
            let start_button = self.start_button.clone();
            move |_, _| {
                start_button.set_visible(true);
                start_button.grab_focus();
            }
        });
        let parent = self.window.upgrade();
        dialog.present(parent.as_ref());
    }
}
