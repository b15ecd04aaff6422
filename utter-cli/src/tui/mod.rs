mod app;
mod input_handler;
mod state;
mod ui;
mod widgets;

pub use app::TuiApp;
