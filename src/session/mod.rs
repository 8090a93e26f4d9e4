pub mod answer;
pub mod extract;
pub mod prompt;
pub mod state;
pub mod timing;
pub mod transcript;
