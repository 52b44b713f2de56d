/// Frame-sized RGBA8 raster type.
pub mod frame;
/// Polygon mask rasterization.
pub mod mask;
/// Overlay resizing.
pub mod resample;
/// Perspective warping.
pub mod warp;
