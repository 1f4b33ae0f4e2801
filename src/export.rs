use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma};

use crate::noise_field::NoiseMap;

/// Map a normalized value to a gray level, 0.0 = black and 1.0 = white.
pub fn gray_level(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Render a noise map as a grayscale image, one pixel per cell.
pub fn grayscale_image(map: &NoiseMap) -> GrayImage {
    let mut img: GrayImage = ImageBuffer::new(map.width as u32, map.height as u32);

    for (x, y, &val) in map.iter() {
        img.put_pixel(x as u32, y as u32, Luma([gray_level(val)]));
    }

    img
}

/// Export a noise map as a grayscale PNG (format picked from the extension).
pub fn export_grayscale(map: &NoiseMap, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
    grayscale_image(map).save(path)
}
