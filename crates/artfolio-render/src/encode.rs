//! PNG encoding of rendered frames.

use crate::renderer::{RenderResult, RendererError};
use image::RgbaImage;

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("header: {}", e)))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|e| RendererError::Encode(format!("data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| RendererError::Encode(format!("finish: {}", e)))?;
    }

    Ok(png_data)
}
