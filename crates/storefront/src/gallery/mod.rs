//! Image gallery: paginated browsing and validated uploads.
//!
//! Images are hosted elsewhere; the gallery API only stores their title,
//! description and URL. [`ImageFeed`] accumulates cursor-paginated pages
//! for infinite scrolling and [`submit_image`] validates an [`ImageForm`]
//! before registering it.

mod client;
mod feed;
mod types;
mod upload;

pub use client::GalleryClient;
pub use feed::ImageFeed;
pub use types::{ImageCard, ImagePage, NewImage};
pub use upload::{
    ACCEPTED_CONTENT_TYPES, Field, FieldError, ImageFile, ImageForm, MAX_IMAGE_BYTES,
    ValidationErrors, submit_image,
};

use std::path::PathBuf;

use thiserror::Error;

use crate::http::ApiError;

/// Errors that can occur in the gallery.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The gallery API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The submitted form broke one or more rules.
    #[error("Invalid image form: {0}")]
    Validation(ValidationErrors),

    /// A local image file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
