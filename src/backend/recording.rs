//! Headless backend.
//!
//! [`RecordingBackend`] keeps every frame's draw calls in memory and hands out
//! fake texture handles. Files are "loaded" from a table of known sizes
//! registered with [`RecordingBackend::with_file`]; any other path fails the
//! way a missing file would.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::backend::{DrawCall, LoadedTexture, RenderBackend, TextureLoader};
use crate::components::color::Color;
use crate::components::texture::TextureHandle;

#[derive(Debug, Default)]
pub struct RecordingBackend {
    files: FxHashMap<String, (i32, i32)>,
    live: FxHashSet<TextureHandle>,
    next_handle: u32,
    loads: usize,
    unloads: usize,
    frames: Vec<Vec<DrawCall>>,
    current: Option<Vec<DrawCall>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `path` loadable as a `width` x `height` texture.
    pub fn with_file(mut self, path: impl Into<String>, width: i32, height: i32) -> Self {
        self.files.insert(path.into(), (width, height));
        self
    }

    /// Completed frames, oldest first.
    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawCall]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Number of textures created so far (files and solids).
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn unloads(&self) -> usize {
        self.unloads
    }

    /// Handles created and not yet unloaded.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    fn issue(&mut self, width: i32, height: i32) -> LoadedTexture {
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        self.live.insert(handle);
        self.loads += 1;
        LoadedTexture {
            handle,
            width,
            height,
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self) {
        self.current = Some(Vec::new());
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), String> {
        if !self.live.contains(&call.texture) {
            return Err(format!("texture handle {} is not loaded", call.texture.0));
        }
        match self.current.as_mut() {
            Some(frame) => {
                frame.push(call.clone());
                Ok(())
            }
            None => Err("draw outside of a frame".to_string()),
        }
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.current.take() {
            debug!("recorded frame {} with {} draw calls", self.frames.len(), frame.len());
            self.frames.push(frame);
        }
    }
}

impl TextureLoader for RecordingBackend {
    fn load_file(&mut self, path: &str) -> Result<LoadedTexture, String> {
        let (width, height) = *self
            .files
            .get(path)
            .ok_or_else(|| format!("no such file: {}", path))?;
        Ok(self.issue(width, height))
    }

    fn create_solid(
        &mut self,
        width: i32,
        height: i32,
        _color: Color,
    ) -> Result<LoadedTexture, String> {
        if width <= 0 || height <= 0 {
            return Err(format!("invalid texture size {}x{}", width, height));
        }
        Ok(self.issue(width, height))
    }

    fn unload(&mut self, handle: TextureHandle) {
        if self.live.remove(&handle) {
            self.unloads += 1;
        }
    }
}
