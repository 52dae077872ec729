use renderer::{Destroy, Engine, Fence, Scene, View};
use scene::{
    Asset, AssetConfiguration, AssetLoader, MaterialSource, Names, ResourceConfiguration,
    ResourceLoader,
};

use crate::{
    conf,
    error::{Error, Result},
    simple_viewer::SimpleViewer,
    source::{Format, Source},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Running,
    ShuttingDown,
    Destroyed,
}

// Everything acquired by `setup`, released in reverse by `cleanup`.
struct Loaded {
    names: Names,
    loader: AssetLoader,
    asset: Asset,
    viewer: SimpleViewer,
}

pub struct App {
    source: Source,
    material_source: MaterialSource,
    state: Lifecycle,
    loaded: Option<Loaded>,
}

impl App {
    pub const fn new(source: Source, material_source: MaterialSource) -> Self {
        Self {
            source,
            material_source,
            state: Lifecycle::Uninitialized,
            loaded: None,
        }
    }

    pub const fn state(&self) -> Lifecycle {
        self.state
    }

    pub const fn source(&self) -> &Source {
        &self.source
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.loaded.as_ref().map(|loaded| &loaded.asset)
    }

    pub fn names(&self) -> Option<&Names> {
        self.loaded.as_ref().map(|loaded| &loaded.names)
    }

    pub fn viewer(&self) -> Option<&SimpleViewer> {
        self.loaded.as_ref().map(|loaded| &loaded.viewer)
    }

    fn transition(&self, allowed: &[Lifecycle], event: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.state,
                event,
            })
        }
    }

    pub fn setup(&mut self, engine: &mut Engine, view: &mut View, scene: &mut Scene) -> Result<()> {
        firestorm::profile_method!(setup);
        self.transition(&[Lifecycle::Uninitialized], "setup")?;

        let mut names = Names::new();
        let mut viewer = SimpleViewer::new();
        let mut loader = AssetLoader::create(
            engine,
            AssetConfiguration {
                material_source: self.material_source,
            },
        );

        let mut asset = match self.load_asset(engine, &mut names, &mut loader) {
            Ok(asset) => asset,
            Err(err) => {
                loader.destroy_materials(engine);
                loader.destroy(engine);
                return Err(err);
            }
        };

        viewer.set_asset(engine, scene, &mut asset, &names);
        view.set_sample_count(conf::SAMPLE_COUNT);

        tracing::info!(
            "Loaded {} ({} renderables, {} textures, {} animations)",
            self.source.describe(),
            asset.renderables().len(),
            asset.textures().len(),
            viewer.animation_count()
        );

        self.loaded = Some(Loaded {
            names,
            loader,
            asset,
            viewer,
        });
        self.state = Lifecycle::Ready;
        Ok(())
    }

    // Bytes, parse, resources, animator. A partially built asset is handed back to the
    // loader before the error is returned.
    fn load_asset(
        &self,
        engine: &mut Engine,
        names: &mut Names,
        loader: &mut AssetLoader,
    ) -> Result<Asset> {
        firestorm::profile_method!(load_asset);

        let bytes = self.source.load()?;
        let parsed = match self.source.format() {
            Format::Binary => loader.create_asset_from_binary(engine, names, &bytes),
            Format::Json => loader.create_asset_from_json(engine, names, &bytes),
        };
        drop(bytes);
        let mut asset = parsed.map_err(Error::Parse)?;

        let resources = ResourceLoader::new(ResourceConfiguration {
            base_path: self.source.base_path(),
            recompute_bounding_boxes: false,
        });
        let prepared = resources
            .load_resources(engine, &mut asset)
            .map_err(Error::Resources)
            .and_then(|()| asset.animator().map(|_| ()).map_err(Error::Animation));
        if let Err(err) = prepared {
            loader.destroy_asset(engine, names, asset);
            return Err(err);
        }

        asset.release_source_data();
        Ok(asset)
    }

    pub fn animate(&mut self, engine: &mut Engine, now: f64) -> Result<()> {
        self.transition(&[Lifecycle::Ready, Lifecycle::Running], "animate")?;
        self.state = Lifecycle::Running;

        if let Some(Loaded { asset, viewer, .. }) = &mut self.loaded {
            viewer.apply_animation(engine, asset, now);
        }
        Ok(())
    }

    pub fn cleanup(&mut self, engine: &mut Engine, scene: &mut Scene) -> Result<()> {
        firestorm::profile_method!(cleanup);
        self.transition(&[Lifecycle::Ready, Lifecycle::Running], "cleanup")?;
        self.state = Lifecycle::ShuttingDown;

        let fence = engine.create_fence();
        Fence::wait_and_destroy(engine, fence);

        if let Some(Loaded {
            mut names,
            mut loader,
            asset,
            mut viewer,
        }) = self.loaded.take()
        {
            viewer.destroy_with(scene);
            loader.destroy_asset(engine, &mut names, asset);
            loader.destroy_materials(engine);
            loader.destroy(engine);
            drop(names);
        }

        self.state = Lifecycle::Destroyed;
        tracing::info!("Viewer shut down");
        Ok(())
    }
}
