use std::time::Instant;

use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use renderer::{Engine, Scene, View};

use crate::{
    conf,
    error::{Error, Result},
    App, Config, Source,
};

// Owns the window and engine and feeds the app's transitions from the event loop.
pub struct Driver {
    window: Window,
    engine: Engine,
    view: View,
    scene: Scene,
    app: App,
    started: Instant,
    failure: Option<Error>,
}

impl Driver {
    pub fn create(event_loop: &EventLoop<()>, config: &Config, source: Source) -> Result<Self> {
        firestorm::profile_method!(create);

        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::<u32>::from(conf::FRAME_RESOLUTION))
            .build(event_loop)?;

        if !config.ibl_directory.is_dir() {
            tracing::warn!(
                "IBL directory {} not found, rendering without environment lighting",
                config.ibl_directory.display()
            );
        }

        let size = window.inner_size();
        Ok(Self {
            window,
            engine: Engine::create(config.backend),
            view: View::new((size.width, size.height)),
            scene: Scene::default(),
            app: App::new(source, config.material_source),
            started: Instant::now(),
            failure: None,
        })
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<()> {
        self.app
            .setup(&mut self.engine, &mut self.view, &mut self.scene)?;
        tracing::info!(
            "Opened window '{}' ({:?} backend)",
            self.window.title(),
            self.engine.backend()
        );
        self.started = Instant::now();

        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run(|event, elwt| match event {
            Event::AboutToWait => {
                if let Err(err) = self.frame() {
                    self.failure = Some(err);
                    elwt.exit();
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => self.view.set_viewport((size.width, size.height)),
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => elwt.exit(),
                _ => (),
            },
            Event::LoopExiting => {
                if let Err(err) = self.app.cleanup(&mut self.engine, &mut self.scene) {
                    self.failure.get_or_insert(err);
                }
            }
            _ => (),
        })?;

        self.failure.map_or(Ok(()), Err)
    }

    fn frame(&mut self) -> Result<()> {
        let now = self.started.elapsed().as_secs_f64();
        self.app.animate(&mut self.engine, now)?;
        self.engine.render(&self.view, &self.scene);
        Ok(())
    }
}
