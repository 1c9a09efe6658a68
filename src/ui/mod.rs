mod app;
mod board;
mod celebration;
mod debug_tools;
mod dialogs;
mod hud;
mod state;
mod timers;

pub use app::run;
