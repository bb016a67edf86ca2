pub mod emissive;
pub mod phong;
