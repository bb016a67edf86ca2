use nalgebra::Vector3;

/// Linear RGB -> sRGB (simple 2.2 gamma).
pub fn linear_to_srgb(color: Vector3<f32>) -> Vector3<f32> {
    let gamma = 1.0 / 2.2;
    color.map(|c| c.max(0.0).powf(gamma))
}

/// Clamps each channel into [0, 1] and packs the result as 0RGB, the layout
/// `minifb` and the PNG writer expect.
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (255 << 24) | (to_byte(color.x) << 16) | (to_byte(color.y) << 8) | to_byte(color.z)
}

/// Reverse of [`pack_rgb`], ignoring the alpha byte.
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}
