use crate::core::color::unpack_rgb;
use crate::error::RenderError;
use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

/// Saves a packed 0RGB buffer (as produced by `post_process_to_buffer`) to
/// an image file. The format follows the path's extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    let save_error = |reason: String| RenderError::Save {
        path: path.display().to_string(),
        reason,
    };

    if buffer.len() != width * height {
        return Err(save_error(format!(
            "buffer holds {} pixels, expected {}x{}",
            buffer.len(),
            width,
            height
        )));
    }

    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Rgb(unpack_rgb(buffer[y as usize * width + x as usize]))
    });

    img_buf.save(path).map_err(|e| save_error(e.to_string()))?;
    info!("Saved {}x{} frame to '{}'", width, height, path.display());
    Ok(())
}
