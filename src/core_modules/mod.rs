pub mod color_spec;
pub mod compositor;
pub mod mask;
pub mod pixel_buffer;
pub mod polygon;
pub mod region_filter;
pub mod thresholder;
pub mod utils;
pub mod variance;
