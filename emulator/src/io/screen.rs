
use std::sync::Mutex;

// A framebuffer collaborator. The core never draws; when the driver elects
// to flush it hands the screen window to whatever sink is installed, which
// must eventually reflect the written pixels.
pub trait PixelSink: Send + Sync {
    fn present_pixels(&self, pixels: &[u16]);
}

#[derive(Default)]
pub struct PipeSink {
    frames: Mutex<Vec<Vec<u16>>>,
}

impl PixelSink for PipeSink {
    fn present_pixels(&self, pixels: &[u16]) {
        self.frames.lock().unwrap().push(pixels.to_vec());
    }
}

impl PipeSink {
    pub fn take_frames(&self) -> Vec<Vec<u16>> {
        std::mem::take(&mut self.frames.lock().unwrap())
    }
}
