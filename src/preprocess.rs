//! Image decoding and the fixed input transform for the classifier.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageReader};
use ndarray::Array4;

use crate::error::PredictError;

/// Model input edge length (Xception-style 299x299).
pub const IMAGE_INPUT_SIZE: usize = 299;
pub const CHANNELS: usize = 3;

/// Decode raw upload bytes, sniffing the format from the content itself.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, PredictError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PredictError::Decode(e.to_string()))?;

    reader.decode().map_err(|e| PredictError::Decode(e.to_string()))
}

/// Convert a decoded image into a `(1, 299, 299, 3)` tensor with values in [0, 1].
///
/// Alpha is dropped and grayscale is expanded to three channels. The resize
/// ignores aspect ratio, so non-square scans are stretched.
pub fn preprocess(image: &DynamicImage) -> Array4<f32> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8())
        .resize_exact(
            IMAGE_INPUT_SIZE as u32,
            IMAGE_INPUT_SIZE as u32,
            FilterType::CatmullRom,
        )
        .to_rgb8();

    let mut input = Array4::<f32>::zeros((1, IMAGE_INPUT_SIZE, IMAGE_INPUT_SIZE, CHANNELS));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (x, y) = (x as usize, y as usize);
        input[[0, y, x, 0]] = r as f32 / 255.0;
        input[[0, y, x, 1]] = g as f32 / 255.0;
        input[[0, y, x, 2]] = b as f32 / 255.0;
    }

    input
}
