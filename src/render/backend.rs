use crate::foundation::core::Canvas;
use crate::foundation::error::RingburstResult;
use crate::foundation::math::unpremultiply_rgba8;
use crate::scene::state::Scene;

/// A rendered overlay frame as RGBA8 pixels.
///
/// Frames coming out of [`crate::CpuRenderer`] are **premultiplied alpha**. The
/// `premultiplied` flag makes this explicit wherever frames cross an API boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame covering `canvas`.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.frame_len_bytes()],
            premultiplied: true,
        }
    }

    /// Write this frame as straight (non-premultiplied) RGBA into `dst`, reusing its allocation.
    pub fn write_straight_rgba(&self, dst: &mut Vec<u8>) {
        dst.resize(self.data.len(), 0);
        if self.premultiplied {
            unpremultiply_rgba8(dst, &self.data);
        } else {
            dst.copy_from_slice(&self.data);
        }
    }
}

/// Something that can draw a [`Scene`] into a frame.
pub trait SceneRenderer {
    /// Draw the current state of `scene`. Never mutates the scene.
    fn render(&mut self, scene: &Scene) -> RingburstResult<FrameRGBA>;
}
