pub mod chat_area;
pub mod dialog;
pub mod status_bar;
