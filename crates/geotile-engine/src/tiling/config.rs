/// Tile size limits.
///
/// The maxima bound every buffer size request, whatever the caller asks for, so a
/// single tile never allocates more than `max_buffer_width * max_buffer_height`
/// pixels per renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TilingConfig {
    pub max_buffer_width: u32,
    pub max_buffer_height: u32,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_buffer_width: 1024,
            max_buffer_height: 1024,
        }
    }
}
