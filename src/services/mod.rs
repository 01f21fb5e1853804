pub mod image_host;

pub use image_host::{HttpImageHost, ImageHost, ImageHostError, LocalImageHost, UploadedImage};
