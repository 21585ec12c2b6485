pub mod bit_buffer2;
pub mod buffer2;
pub mod file_format;
pub mod float_ext;
pub mod log_setup;
pub mod serde;

pub use bit_buffer2::BitBuffer2;
pub use buffer2::Buffer2;
pub use file_format::{FileExtensionError, SerdeFormat};
pub use float_ext::FloatExt;

pub const EPSILON: f64 = 1e-6;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
