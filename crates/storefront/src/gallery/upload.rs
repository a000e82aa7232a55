//! Image submission: form validation and upload.

use std::fmt;
use std::path::Path;

use super::GalleryError;
use super::client::GalleryClient;
use super::feed::ImageFeed;
use super::types::NewImage;
use crate::notify::{Notice, Notifier};

/// Files must be strictly smaller than this many bytes.
pub const MAX_IMAGE_BYTES: u64 = 10_000_000;

/// Accepted image content types.
pub const ACCEPTED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

const TITLE_MIN_CHARS: usize = 2;
const TITLE_MAX_CHARS: usize = 20;
const DESCRIPTION_MAX_CHARS: usize = 65;

const IMAGE_NOT_ADDED: &str =
    "Image not added: upload an image and wait for it to finish before submitting";

/// The local file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub size: u64,
    pub content_type: String,
}

impl ImageFile {
    /// Describe a file on disk, guessing the content type from its extension.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Io` if the file metadata cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, GalleryError> {
        let metadata = std::fs::metadata(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let content_type = match extension.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };

        Ok(Self {
            size: metadata.len(),
            content_type: content_type.to_string(),
        })
    }
}

/// The image submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageForm {
    pub image: Option<ImageFile>,
    /// URL of the already-hosted image; empty until the file upload finishes.
    pub url: String,
    pub title: String,
    pub description: String,
}

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Image,
    Url,
    Title,
    Description,
}

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every failed rule of a form, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn for_field(&self, field: Field) -> Vec<&'static str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message)
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl ImageForm {
    /// Check every rule and build the request body.
    ///
    /// # Errors
    ///
    /// Returns all failed rules at once.
    pub fn validate(&self) -> Result<NewImage, ValidationErrors> {
        let mut errors = Vec::new();
        let mut fail = |field, message| errors.push(FieldError { field, message });

        match &self.image {
            None => fail(Field::Image, "Image file is required"),
            Some(file) => {
                if file.size >= MAX_IMAGE_BYTES {
                    fail(Field::Image, "File must be smaller than 10MB");
                }
                if !ACCEPTED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
                    fail(Field::Image, "Only PNG, JPEG and GIF files are accepted");
                }
            }
        }

        if self.url.trim().is_empty() {
            fail(Field::Url, IMAGE_NOT_ADDED);
        }

        let title_chars = self.title.trim().chars().count();
        if title_chars == 0 {
            fail(Field::Title, "Title is required");
        } else if title_chars < TITLE_MIN_CHARS {
            fail(Field::Title, "Title must be at least 2 characters");
        } else if title_chars > TITLE_MAX_CHARS {
            fail(Field::Title, "Title must be at most 20 characters");
        }

        let description_chars = self.description.trim().chars().count();
        if description_chars == 0 {
            fail(Field::Description, "Description is required");
        } else if description_chars > DESCRIPTION_MAX_CHARS {
            fail(Field::Description, "Description must be at most 65 characters");
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(NewImage {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            url: self.url.trim().to_string(),
        })
    }
}

/// Validate and upload an image, then invalidate the feed so the next fetch
/// shows it.
///
/// The outcome is reported through `notifier` as well as returned.
///
/// # Errors
///
/// Returns `GalleryError::Validation` if the form is invalid, or
/// `GalleryError::Api` if the upload fails. The feed is untouched on error.
pub async fn submit_image(
    client: &GalleryClient,
    feed: &mut ImageFeed,
    notifier: &dyn Notifier,
    form: &ImageForm,
) -> Result<(), GalleryError> {
    let new_image = match form.validate() {
        Ok(new_image) => new_image,
        Err(errors) => {
            if !errors.for_field(Field::Url).is_empty() {
                notifier.notify(Notice::error(IMAGE_NOT_ADDED));
            }
            return Err(GalleryError::Validation(errors));
        }
    };

    match client.create_image(&new_image).await {
        Ok(()) => {
            feed.invalidate();
            notifier.notify(Notice::success("Image uploaded successfully!"));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Image upload failed");
            notifier.notify(Notice::error("Unexpected error while saving the image!"));
            Err(e.into())
        }
    }
}
