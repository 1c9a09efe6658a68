mod audio;
mod config;
mod game;
mod ui;

use gettextrs::{bind_textdomain_codeset, bindtextdomain, textdomain};
use gtk4::glib;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const GETTEXT_PACKAGE: &str = "limbokeys";
const LOCALEDIR: &str = "/usr/share/locale";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(config::LOG_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn init_gettext() {
    if let Err(err) = bindtextdomain(GETTEXT_PACKAGE, LOCALEDIR) {
        tracing::warn!(%err, "Unable to bind the text domain");
        return;
    }
    if let Err(err) = bind_textdomain_codeset(GETTEXT_PACKAGE, "UTF-8") {
        tracing::warn!(%err, "Unable to set the text domain encoding");
    }
    if let Err(err) = textdomain(GETTEXT_PACKAGE) {
        tracing::warn!(%err, "Unable to switch to the text domain");
    }
}

fn main() -> glib::ExitCode {
    init_tracing();
    init_gettext();
    ui::run()
}
