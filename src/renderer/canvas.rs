//! Canvas2D backend

use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{DrawCmd, SpriteId, SpriteSheet, css_color};

/// One sprite image plus the readiness flag its load callbacks flip
struct SpriteImage {
    image: HtmlImageElement,
    ready: Rc<Cell<bool>>,
}

impl SpriteImage {
    fn load(sprite: SpriteId) -> Result<Self, JsValue> {
        let image = HtmlImageElement::new()?;
        let ready = Rc::new(Cell::new(false));

        let onload = {
            let ready = ready.clone();
            Closure::<dyn FnMut()>::new(move || {
                ready.set(true);
                log::info!("Loaded sprite {}", sprite.path());
            })
        };
        let onerror = {
            let ready = ready.clone();
            Closure::<dyn FnMut()>::new(move || {
                ready.set(false);
                log::warn!("Sprite {} failed to load, using fallback", sprite.path());
            })
        };
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();

        image.set_src(sprite.path());
        Ok(Self { image, ready })
    }
}

/// Executes draw lists on a 2D canvas context
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: Vec<(SpriteId, SpriteImage)>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let mut images = Vec::new();
        for sprite in SpriteId::ALL {
            match SpriteImage::load(sprite) {
                Ok(image) => images.push((sprite, image)),
                Err(e) => log::warn!("Could not create image for {}: {e:?}", sprite.path()),
            }
        }

        Ok(Self { canvas, ctx, images })
    }

    /// Current readiness of every sprite image
    pub fn sprite_sheet(&self) -> SpriteSheet {
        let mut sheet = SpriteSheet::default();
        for (sprite, image) in &self.images {
            // Zero natural width means the image decoded as broken
            let ready = image.ready.get() && image.image.natural_width() > 0;
            sheet.set_ready(*sprite, ready);
        }
        sheet
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn image(&self, sprite: SpriteId) -> Option<&HtmlImageElement> {
        self.images
            .iter()
            .find(|(id, _)| *id == sprite)
            .map(|(_, image)| &image.image)
    }

    pub fn draw(&self, cmds: &[DrawCmd]) {
        let ctx = &self.ctx;
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        ctx.set_image_smoothing_enabled(false);

        for cmd in cmds {
            match cmd {
                DrawCmd::Clear => ctx.clear_rect(0.0, 0.0, width, height),
                DrawCmd::Image { sprite, rect, mirrored } => {
                    let Some(image) = self.image(*sprite) else {
                        continue;
                    };
                    ctx.save();
                    let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                    let result = if *mirrored {
                        let _ = ctx.translate(x + w, y);
                        let _ = ctx.scale(-1.0, 1.0);
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, w, h)
                    } else {
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
                    };
                    if let Err(e) = result {
                        log::debug!("drawImage failed for {}: {e:?}", sprite.path());
                    }
                    ctx.restore();
                }
                DrawCmd::Block { rect, color, alpha } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                    ctx.set_global_alpha(1.0);
                }
                DrawCmd::Glow {
                    center,
                    radius,
                    color,
                    alpha,
                } => {
                    ctx.save();
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    let _ = ctx.ellipse(
                        center.x as f64,
                        center.y as f64,
                        radius.x as f64,
                        radius.y as f64,
                        0.0,
                        0.0,
                        TAU,
                    );
                    ctx.fill();
                    ctx.restore();
                }
                DrawCmd::Overlay { color, alpha } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(0.0, 0.0, width, height);
                    ctx.set_global_alpha(1.0);
                }
                DrawCmd::Text {
                    text,
                    center,
                    color,
                    size_px,
                } => {
                    ctx.save();
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.set_font(&format!("bold {size_px}px sans-serif"));
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    let _ = ctx.fill_text(text, center.x as f64, center.y as f64);
                    ctx.restore();
                }
            }
        }
    }
}
