//! Frame preprocessing for classification.
//!
//! Models expect a fixed square input; camera frames are not square. The
//! crop policy is center-crop: take the largest centered square, then scale
//! it to the model's input dimensions.

use image::{imageops, RgbImage};

use crate::capture::normalize;
use crate::error::Error;
use crate::frame::Frame;

/// Crop the largest centered square out of a frame, then scale it to the
/// target dimensions. Output always matches `target_width` x
/// `target_height`, whatever the input shape.
pub fn center_crop_and_scale(
    frame: &Frame,
    target_width: u32,
    target_height: u32,
) -> Result<RgbImage, Error> {
    let rgb = normalize::bgra_to_rgb24(frame.pixels(), frame.width(), frame.height())?;
    let img = RgbImage::from_raw(frame.width(), frame.height(), rgb)
        .ok_or_else(|| Error::Inference("frame buffer does not match its dimensions".to_string()))?;

    let square = largest_center_square(&img);
    Ok(imageops::resize(
        &square,
        target_width,
        target_height,
        imageops::FilterType::Triangle,
    ))
}

/// The largest centered square region of an image.
fn largest_center_square(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    if width == height {
        return img.clone();
    }
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    imageops::crop_imm(img, x, y, side, side).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// BGRA frame whose largest centered square is green and whose
    /// off-center margin is red.
    fn framed_square(width: u32, height: u32) -> Frame {
        let side = width.min(height);
        let x0 = (width - side) / 2;
        let y0 = (height - side) / 2;
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let centered =
                    x >= x0 && x < x0 + side && y >= y0 && y < y0 + side;
                if centered {
                    data.extend_from_slice(&[0, 255, 0, 255]); // BGRA green
                } else {
                    data.extend_from_slice(&[0, 0, 255, 255]); // BGRA red
                }
            }
        }
        Frame::new(data, width, height).unwrap()
    }

    #[test]
    fn portrait_input_scales_to_target() -> Result<(), Error> {
        let frame = framed_square(4, 8);
        let out = center_crop_and_scale(&frame, 2, 2)?;
        assert_eq!(out.dimensions(), (2, 2));
        // The centered square is uniformly green; the red margins are
        // cropped away before scaling.
        for pixel in out.pixels() {
            assert_mostly_green(pixel);
        }
        Ok(())
    }

    #[test]
    fn landscape_input_scales_to_target() -> Result<(), Error> {
        let frame = framed_square(8, 4);
        let out = center_crop_and_scale(&frame, 2, 2)?;
        assert_eq!(out.dimensions(), (2, 2));
        for pixel in out.pixels() {
            assert_mostly_green(pixel);
        }
        Ok(())
    }

    fn assert_mostly_green(pixel: &Rgb<u8>) {
        assert!(pixel[1] > 200, "expected green, got {:?}", pixel);
        assert!(pixel[0] < 50, "expected no red, got {:?}", pixel);
    }

    #[test]
    fn square_input_is_only_scaled() -> Result<(), Error> {
        let frame = framed_square(6, 6);
        let out = center_crop_and_scale(&frame, 3, 3)?;
        assert_eq!(out.dimensions(), (3, 3));
        Ok(())
    }
}
