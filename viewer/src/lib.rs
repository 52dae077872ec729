pub mod app;
pub mod config;
pub mod driver;
mod error;
pub mod simple_viewer;
pub mod source;

pub use {
    app::{App, Lifecycle},
    config::{Cli, Config},
    error::{Error, Result},
    simple_viewer::SimpleViewer,
    source::{Format, Source},
};

pub mod conf {
    pub const TITLE: &str = "glTF Viewer";
    pub const DEFAULT_IBL: &str = "envs/venetian_crossroads";
    pub const SAMPLE_COUNT: u8 = 4;
    pub const FRAME_RESOLUTION: (u32, u32) = (1600, 1200);
}
