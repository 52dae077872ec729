#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Texture(pub(crate) u32);

pub(crate) struct TextureData {
    pub name: String,
    pub extent: (u32, u32),
    pub srgb: bool,
    pub texels: Vec<u8>,
}

impl TextureData {
    pub fn from_image(name: impl AsRef<str>, image: &image::RgbaImage, srgb: bool) -> Self {
        Self {
            name: name.as_ref().to_owned(),
            extent: image.dimensions(),
            srgb,
            texels: image.as_raw().clone(),
        }
    }

    pub fn size(&self) -> usize {
        self.texels.len()
    }
}
