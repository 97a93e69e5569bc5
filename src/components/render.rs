/// What the renderer needs to draw a body. Controllers only ever change the
/// animation key, the horizontal flip and the tint.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: &'static str,
    pub animation: Option<&'static str>,
    pub flip_x: bool,
    /// `0xRRGGBB` multiply tint; `None` draws untinted.
    pub tint: Option<u32>,
}

impl Sprite {
    pub fn new(texture: &'static str) -> Self {
        Self {
            texture,
            animation: None,
            flip_x: false,
            tint: None,
        }
    }
}
