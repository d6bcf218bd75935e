// Windowed front end: frame loop state, viewport UI and orbit input
pub mod state;
pub mod ui;
pub mod input;

pub use state::RoomApp;
