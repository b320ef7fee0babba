//! raylib window backend.
//!
//! raylib only allows drawing inside a `begin_drawing` scope that borrows the
//! handle, so draw calls are buffered between [`RenderBackend::begin_frame`]
//! and [`RenderBackend::end_frame`] and replayed inside one drawing scope.
//!
//! Render options map onto `draw_texture_pro`: flips use a negative source
//! width/height, rotations turn around the destination center, and the
//! blend group selects a raylib blend mode for the call.

use ::raylib::consts::BlendMode as RaylibBlend;
use ::raylib::prelude::{
    Color as RaylibColor, Image, RaylibBlendModeExt, RaylibDraw, RaylibHandle, RaylibThread,
    Rectangle, Texture2D, Vector2,
};
use log::info;
use rustc_hash::FxHashMap;

use crate::backend::{DrawCall, LoadedTexture, RenderBackend, TextureLoader};
use crate::components::color::Color;
use crate::components::renderoptions::{BlendMode, RenderOptions};
use crate::components::texture::TextureHandle;
use crate::resources::displayconfig::DisplayConfig;
use crate::resources::screensize::ScreenSize;

pub struct RaylibBackend {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: FxHashMap<TextureHandle, Texture2D>,
    next_handle: u32,
    clear_color: Color,
    pending: Vec<DrawCall>,
}

impl RaylibBackend {
    /// Open the window described by `config`.
    pub fn new(config: &DisplayConfig) -> Self {
        let (mut rl, thread) = ::raylib::init()
            .size(config.width as i32, config.height as i32)
            .resizable()
            .title(&config.title)
            .build();
        rl.set_target_fps(config.target_fps);
        info!(
            "window '{}' opened at {}x{}",
            config.title, config.width, config.height
        );
        Self {
            rl,
            thread,
            textures: FxHashMap::default(),
            next_handle: 0,
            clear_color: Color::BLACK,
            pending: Vec::new(),
        }
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }

    pub fn screen_size(&self) -> ScreenSize {
        ScreenSize::new(self.rl.get_screen_width(), self.rl.get_screen_height())
    }

    fn register(&mut self, texture: Texture2D) -> LoadedTexture {
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        let loaded = LoadedTexture {
            handle,
            width: texture.width,
            height: texture.height,
        };
        self.textures.insert(handle, texture);
        loaded
    }
}

fn to_raylib(color: Color) -> RaylibColor {
    RaylibColor::new(color.r, color.g, color.b, color.a)
}

fn tint(call: &DrawCall) -> RaylibColor {
    let mut tint = RaylibColor::WHITE;
    if call.options.contains(RenderOptions::COLOR_MOD) {
        tint.r = call.color.r;
        tint.g = call.color.g;
        tint.b = call.color.b;
    }
    if call.options.contains(RenderOptions::ALPHA_MOD) {
        tint.a = call.color.a;
    }
    tint
}

fn blend(mode: BlendMode) -> RaylibBlend {
    match mode {
        BlendMode::Additive => RaylibBlend::BLEND_ADDITIVE,
        BlendMode::Multiplied => RaylibBlend::BLEND_MULTIPLIED,
        BlendMode::Alpha | BlendMode::None => RaylibBlend::BLEND_ALPHA,
    }
}

impl RenderBackend for RaylibBackend {
    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), String> {
        if !self.textures.contains_key(&call.texture) {
            return Err(format!("texture handle {} is not loaded", call.texture.0));
        }
        self.pending.push(call.clone());
        Ok(())
    }

    fn end_frame(&mut self) {
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(to_raylib(self.clear_color));
        for call in &self.pending {
            let Some(texture) = self.textures.get(&call.texture) else {
                continue;
            };
            let flip_h = call.options.contains(RenderOptions::FLIP_H);
            let flip_v = call.options.contains(RenderOptions::FLIP_V);
            let src = Rectangle {
                x: call.source.x as f32,
                y: call.source.y as f32,
                width: if flip_h { -call.source.w } else { call.source.w } as f32,
                height: if flip_v { -call.source.h } else { call.source.h } as f32,
            };
            // rotate around the destination center
            let origin = Vector2 {
                x: call.destination.w as f32 / 2.0,
                y: call.destination.h as f32 / 2.0,
            };
            let dest = Rectangle {
                x: call.destination.x as f32 + origin.x,
                y: call.destination.y as f32 + origin.y,
                width: call.destination.w as f32,
                height: call.destination.h as f32,
            };
            let rotation = call.options.rotation_degrees();
            let mut b = d.begin_blend_mode(blend(call.options.blend_mode()));
            b.draw_texture_pro(texture, src, dest, origin, rotation, tint(call));
        }
    }
}

impl TextureLoader for RaylibBackend {
    fn load_file(&mut self, path: &str) -> Result<LoadedTexture, String> {
        let texture = self
            .rl
            .load_texture(&self.thread, path)
            .map_err(|e| e.to_string())?;
        Ok(self.register(texture))
    }

    fn create_solid(
        &mut self,
        width: i32,
        height: i32,
        color: Color,
    ) -> Result<LoadedTexture, String> {
        let image = Image::gen_image_color(width, height, to_raylib(color));
        let texture = self
            .rl
            .load_texture_from_image(&self.thread, &image)
            .map_err(|e| e.to_string())?;
        Ok(self.register(texture))
    }

    fn unload(&mut self, handle: TextureHandle) {
        // Texture2D unloads on drop
        self.textures.remove(&handle);
    }
}
