use crate::error::Error;

/// Convert packed RGB24 device output to the pipeline's BGRA32 format.
pub(crate) fn rgb24_to_bgra(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, Error> {
    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::Capture("RGB frame dimensions overflow".to_string()))?;
    let expected = pixel_count
        .checked_mul(3)
        .ok_or_else(|| Error::Capture("RGB frame dimensions overflow".to_string()))?;
    if pixels.len() != expected {
        return Err(Error::Capture(format!(
            "RGB frame length mismatch: expected {}, got {}",
            expected,
            pixels.len()
        )));
    }

    let mut bgra = Vec::with_capacity(pixel_count * 4);
    for rgb in pixels.chunks_exact(3) {
        bgra.extend_from_slice(&[rgb[2], rgb[1], rgb[0], 0xFF]);
    }
    Ok(bgra)
}

/// Convert a BGRA32 frame buffer to packed RGB24 for inference preprocessing.
pub(crate) fn bgra_to_rgb24(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, Error> {
    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::Capture("BGRA frame dimensions overflow".to_string()))?;
    let expected = pixel_count
        .checked_mul(4)
        .ok_or_else(|| Error::Capture("BGRA frame dimensions overflow".to_string()))?;
    if pixels.len() != expected {
        return Err(Error::Capture(format!(
            "BGRA frame length mismatch: expected {}, got {}",
            expected,
            pixels.len()
        )));
    }

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for bgra in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&[bgra[2], bgra[1], bgra[0]]);
    }
    Ok(rgb)
}
