pub mod app;
pub mod assets;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod objects;
pub mod render;
pub mod room;
pub mod scene;
