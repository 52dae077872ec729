use std::path::PathBuf;

use clap::Parser;

use renderer::Backend;
use scene::MaterialSource;

use crate::conf;

/// glTF viewer
#[derive(Debug, Default, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Rendering backend: opengl, vulkan or metal
    #[arg(short, long)]
    pub api: Option<String>,
    /// Directory of the image based lighting environment
    #[arg(short, long, value_name = "PATH")]
    pub ibl: Option<PathBuf>,
    /// Load precompiled ubershaders instead of generating materials
    #[arg(short, long)]
    pub ubershader: bool,
    /// glTF (.gltf) or binary glTF (.glb) file to display
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub ibl_directory: PathBuf,
    pub title: String,
    pub material_source: MaterialSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            ibl_directory: PathBuf::from(conf::DEFAULT_IBL),
            title: conf::TITLE.to_owned(),
            material_source: MaterialSource::GenerateShaders,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();

        if let Some(api) = &cli.api {
            match api.parse::<Backend>() {
                Ok(backend) => config.backend = backend,
                Err(err) => tracing::warn!("{err}, keeping the {:?} backend", config.backend),
            }
        }
        if let Some(ibl) = &cli.ibl {
            config.ibl_directory.clone_from(ibl);
        }
        if cli.ubershader {
            config.material_source = MaterialSource::LoadUbershaders;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("viewer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_arguments() {
        let cli = parse(&[]);
        assert!(cli.file.is_none());
        assert_eq!(Config::from_cli(&cli), Config::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["-a", "vulkan", "--ibl", "envs/studio", "-u", "model.glb"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.backend, Backend::Vulkan);
        assert_eq!(config.ibl_directory, PathBuf::from("envs/studio"));
        assert_eq!(config.material_source, MaterialSource::LoadUbershaders);
        assert_eq!(cli.file, Some(PathBuf::from("model.glb")));
    }

    #[test]
    fn unknown_backend_keeps_default() {
        let cli = parse(&["--api=quantum", "scene.gltf"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.backend, Backend::default());
        assert_eq!(cli.file, Some(PathBuf::from("scene.gltf")));
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(Cli::try_parse_from(["viewer", "--quantum"]).is_err());
    }
}
