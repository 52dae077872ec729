#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("image {index} holds fewer pixels than its dimensions require")]
    ImageData { index: usize },

    #[error("source data has already been released")]
    SourceReleased,

    #[error("resources have not been loaded yet")]
    ResourcesNotLoaded,
}

pub type Result<T> = std::result::Result<T, Error>;
