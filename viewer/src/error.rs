use std::{io, path::PathBuf};

use crate::app::Lifecycle;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file {} not found!", .0.display())]
    NotFound(PathBuf),
    #[error("Unable to open {}", .0.display())]
    Unopenable(PathBuf),
    #[error("Unable to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Unable to parse glTF: {0}")]
    Parse(#[source] scene::Error),
    #[error("Unable to load resources: {0}")]
    Resources(#[source] scene::Error),
    #[error("Unable to extract animations: {0}")]
    Animation(#[source] scene::Error),
    #[error("{event} is not valid while {from:?}")]
    InvalidTransition { from: Lifecycle, event: &'static str },
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T> = std::result::Result<T, Error>;
