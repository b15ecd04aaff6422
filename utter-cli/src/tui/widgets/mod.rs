pub mod controls;
pub mod input_area;
pub mod status_bar;
pub mod voice_panel;
