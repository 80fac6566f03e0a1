use egui::{ColorImage, Context, Pos2, TextureHandle, TextureOptions, Vec2};

// Image display capability consumed by the highlight panel: holds the
// texture, the resize (scale) factor and the user-defined-scale toggle,
// and converts between screen pixels and model coordinates.
pub struct ImageDisplay {
    texture: Option<TextureHandle>,
    image_size: Vec2,
    resize_factor: f32,
    user_defined_scale: bool,
}

impl ImageDisplay {
    pub fn new() -> Self {
        Self {
            texture: None,
            image_size: Vec2::ZERO,
            resize_factor: 1.0,
            user_defined_scale: true,
        }
    }

    pub fn set_image(&mut self, ctx: &Context, name: &str, image: ColorImage) {
        self.image_size = Vec2::new(image.size[0] as f32, image.size[1] as f32);
        self.texture = Some(ctx.load_texture(name, image, TextureOptions::LINEAR));
    }

    pub fn clear_image(&mut self) {
        self.texture = None;
        self.image_size = Vec2::ZERO;
    }

    pub fn has_image(&self) -> bool {
        self.image_size.x > 0.0 && self.image_size.y > 0.0
    }

    // Pretend an image of the given size is loaded, without needing an egui
    // context to allocate a texture
    #[cfg(test)]
    pub(crate) fn set_test_image(&mut self, size: Vec2) {
        self.image_size = size;
    }

    pub fn get_texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    pub fn get_image_size(&self) -> Vec2 {
        self.image_size
    }

    pub fn get_resize_factor(&self) -> f32 {
        self.resize_factor
    }

    pub fn set_resize_factor(&mut self, factor: f32) {
        self.resize_factor = factor;
    }

    pub fn is_user_defined_scale(&self) -> bool {
        self.user_defined_scale
    }

    pub fn set_user_defined_scale(&mut self, user_defined: bool) {
        self.user_defined_scale = user_defined;
    }

    // Recompute the resize factor to fit the image inside the available
    // panel rect. No-op when the host drives the scale itself.
    pub fn update_scale(&mut self, available: Vec2) {
        if self.user_defined_scale {
            return;
        }
        if let Some(factor) = self.fit_factor(available) {
            self.resize_factor = factor;
        }
    }

    pub fn fit_factor(&self, available: Vec2) -> Option<f32> {
        if self.image_size.x <= 0.0 || self.image_size.y <= 0.0 {
            return None;
        }
        Some((available.x / self.image_size.x).min(available.y / self.image_size.y))
    }

    // Size of the drawn image in screen pixels
    pub fn scaled_size(&self) -> Vec2 {
        self.image_size * self.resize_factor
    }

    pub fn screen_to_model(&self, screen_pos: Pos2) -> Pos2 {
        Pos2::new(
            screen_pos.x / self.resize_factor,
            screen_pos.y / self.resize_factor,
        )
    }

    pub fn model_to_screen(&self, model_pos: Pos2) -> Pos2 {
        Pos2::new(
            model_pos.x * self.resize_factor,
            model_pos.y * self.resize_factor,
        )
    }
}
