/// Source video probing.
pub mod media;
/// Overlay image loading.
pub mod overlay;
