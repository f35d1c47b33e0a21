// One error type for the whole crate.
// Every variant states *where* things went wrong.

use thiserror::Error;

/// Result alias used across the canvas engine and the host window.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Creating directories or writing the exported file failed
    #[error("Export io error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the layer into the raster format failed
    #[error("Export encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// A colour string could not be parsed (expects `#rrggbb`)
    #[error("Invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
}
