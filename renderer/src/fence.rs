use crate::Engine;

#[derive(Debug, PartialEq, Eq)]
pub struct Fence {
    pub(crate) id: u32,
    pub(crate) frame: u64,
}

impl Fence {
    pub fn wait_and_destroy(engine: &mut Engine, fence: Self) {
        firestorm::profile_method!(wait_and_destroy);

        engine.wait_for_fence(&fence);
        engine.destroy_fence(fence);
    }
}
