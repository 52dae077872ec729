use crate::conf;

pub struct View {
    viewport: (u32, u32),
    sample_count: u8,
}

impl View {
    pub const fn new(viewport: (u32, u32)) -> Self {
        Self {
            viewport,
            sample_count: conf::DEFAULT_SAMPLE_COUNT,
        }
    }

    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        self.viewport = viewport;
    }

    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn set_sample_count(&mut self, count: u8) {
        let count = count.clamp(1, 16).next_power_of_two();
        tracing::debug!("View sample count set to {count}");
        self.sample_count = count;
    }

    pub const fn sample_count(&self) -> u8 {
        self.sample_count
    }
}
