use crate::error::{Result, StitchError};
use crate::model::Layout;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;

/// Blit all of `src` into `canvas` with its top-left at (dx, dy). Pixels
/// falling outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(xx, yy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}

/// Draws every placed sprite of `layout` onto a transparent canvas of the
/// layout's final size. `images` is keyed by sprite name.
///
/// A missing image or one whose size differs from the placed frame is a
/// `Render` error; the layout itself is left untouched.
pub fn render_sheet(layout: &Layout, images: &HashMap<String, RgbaImage>) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::new(layout.width, layout.height);
    for p in layout.placed() {
        let src = images
            .get(&p.name)
            .ok_or_else(|| StitchError::Render(format!("no image for sprite '{}'", p.name)))?;
        if src.dimensions() != (p.frame.w, p.frame.h) {
            return Err(StitchError::Render(format!(
                "image for '{}' is {}x{}, placed frame is {}x{}",
                p.name,
                src.width(),
                src.height(),
                p.frame.w,
                p.frame.h
            )));
        }
        blit_rgba(src, &mut canvas, p.frame.x, p.frame.y);
    }
    Ok(canvas)
}

/// Encodes `img` as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| StitchError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Encodes `img` as a `data:image/png;base64,...` URI, usable as the
/// stylesheet's `image_url`.
pub fn png_data_uri(img: &RgbaImage) -> Result<String> {
    let bytes = encode_png(img)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Placement, Rect};
    use base64::Engine as _;
    use image::Rgba;

    fn solid(w: u32, h: u32, c: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(c))
    }

    fn two_sprite_layout() -> Layout {
        Layout {
            width: 6,
            height: 4,
            sprites: vec![
                Placement {
                    name: "red".into(),
                    frame: Rect::new(0, 0, 4, 4),
                    placed: true,
                },
                Placement {
                    name: "blue".into(),
                    frame: Rect::new(4, 0, 2, 2),
                    placed: true,
                },
            ],
            order: vec![0, 1],
            failures: Vec::new(),
        }
    }

    #[test]
    fn sprites_land_at_their_frames() {
        let mut images = HashMap::new();
        images.insert("red".to_string(), solid(4, 4, [255, 0, 0, 255]));
        images.insert("blue".to_string(), solid(2, 2, [0, 0, 255, 255]));
        let sheet = render_sheet(&two_sprite_layout(), &images).unwrap();
        assert_eq!(sheet.dimensions(), (6, 4));
        assert_eq!(sheet.get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(sheet.get_pixel(5, 1).0, [0, 0, 255, 255]);
        // below the small sprite stays transparent
        assert_eq!(sheet.get_pixel(5, 3).0, [0, 0, 0, 0]);
    }

    #[test]
    fn missing_image_is_render_error() {
        let mut images = HashMap::new();
        images.insert("red".to_string(), solid(4, 4, [255, 0, 0, 255]));
        let err = render_sheet(&two_sprite_layout(), &images).unwrap_err();
        assert!(matches!(err, StitchError::Render(msg) if msg.contains("blue")));
    }

    #[test]
    fn png_has_signature() {
        let bytes = encode_png(&solid(2, 2, [1, 2, 3, 4])).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn data_uri_wraps_base64_png() {
        let img = solid(3, 2, [9, 8, 7, 255]);
        let uri = png_data_uri(&img).unwrap();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        assert!(payload.starts_with("iVBORw0KGgo"));
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, encode_png(&img).unwrap());
        let back = image::load_from_memory(&decoded).unwrap().to_rgba8();
        assert_eq!(back, img);
    }
}
