use std::{
    borrow::Cow,
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

static DEFAULT_ASSET: &[u8] = include_bytes!("../assets/default.glb");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Binary,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Embedded(&'static [u8]),
    File(PathBuf),
}

impl Format {
    // The extension alone decides, the contents are never inspected.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("glb") => Self::Binary,
            _ => Self::Json,
        }
    }
}

impl Source {
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("No file given, using the embedded default asset");
            return Ok(Self::Embedded(DEFAULT_ASSET));
        };
        if !path.exists() {
            return Err(Error::NotFound(path.to_owned()));
        }
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_owned());
        Ok(Self::File(path))
    }

    pub fn size(&self) -> Result<usize> {
        match self {
            Self::Embedded(bytes) => Ok(bytes.len()),
            Self::File(path) => match fs::metadata(path) {
                Ok(metadata) if metadata.len() > 0 => Ok(metadata.len() as usize),
                _ => Err(Error::Unopenable(path.clone())),
            },
        }
    }

    // Reads into a buffer sized up front from the probed length.
    pub fn load(&self) -> Result<Cow<'static, [u8]>> {
        firestorm::profile_method!(load);

        let Self::File(path) = self else {
            return Ok(Cow::Borrowed(DEFAULT_ASSET));
        };
        let size = self.size()?;
        let mut bytes = vec![0; size];
        File::open(path)
            .and_then(|mut file| file.read_exact(&mut bytes))
            .map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
        tracing::debug!("Read {size} bytes from {}", path.display());
        Ok(Cow::Owned(bytes))
    }

    pub fn format(&self) -> Format {
        match self {
            Self::Embedded(_) => Format::Binary,
            Self::File(path) => Format::detect(path),
        }
    }

    pub fn base_path(&self) -> PathBuf {
        match self {
            Self::Embedded(_) => PathBuf::new(),
            Self::File(path) => path.parent().map(Path::to_owned).unwrap_or_default(),
        }
    }

    pub fn describe(&self) -> Cow<'_, str> {
        match self {
            Self::Embedded(_) => Cow::Borrowed("embedded default asset"),
            Self::File(path) => path.to_string_lossy(),
        }
    }
}
