/// Errors raised while turning an image into a height field
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("file could not be loaded as an image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{actual} height samples do not fill a {width}x{height} field")]
    SampleCount {
        width: usize,
        height: usize,
        actual: usize,
    },
}
