//! Collects the task, topic and optional image from a form submission.

use axum::extract::Multipart;
use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

use crate::error::AppError;
use crate::task::Task;

/// Extensions the upload control accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}

/// An image taken from the upload field. Only lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub filename: String,
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Accepts an uploaded file, or returns `None` for an empty file part.
    ///
    /// The extension must be one of [`ACCEPTED_EXTENSIONS`] and the content
    /// must sniff as PNG or JPEG. Nothing is decoded or re-encoded.
    pub fn from_upload(filename: &str, bytes: Vec<u8>) -> Result<Option<Self>, AppError> {
        if bytes.is_empty() {
            return Ok(None);
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported file {filename:?}: upload a jpg, jpeg or png image"
            )));
        }

        let kind = match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => ImageKind::Png,
            Ok(ImageFormat::Jpeg) => ImageKind::Jpeg,
            Ok(other) => {
                return Err(AppError::BadRequest(format!(
                    "{filename:?} is a {other:?} image, only PNG and JPEG are accepted"
                )))
            }
            Err(_) => {
                return Err(AppError::BadRequest(format!(
                    "{filename:?} is not a recognisable image"
                )))
            }
        };

        Ok(Some(Self {
            filename: filename.to_string(),
            kind,
            bytes,
        }))
    }

    /// Width and height read from the image header, if it can be parsed.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::io::Reader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

/// Everything one Generate action submits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerateForm {
    pub task: Task,
    pub topic: String,
    pub image: Option<UploadedImage>,
}

/// Reads the `task`, `topic` and `image` fields of a generate submission.
///
/// Unknown fields are ignored. A missing task falls back to the first option
/// of the select, a missing topic to the empty string.
pub async fn collect(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("task") => {
                let value = field.text().await?;
                form.task = value
                    .parse::<Task>()
                    .map_err(|e| AppError::BadRequest(format!("{e}")))?;
            }
            Some("topic") => {
                form.topic = field.text().await?;
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                form.image = UploadedImage::from_upload(&filename, bytes)?;
            }
            _ => {}
        }
    }

    debug!(
        task = form.task.slug(),
        topic_len = form.topic.len(),
        image = form.image.as_ref().map(|i| i.filename.as_str()),
        "Collected form"
    );

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat};

    fn encoded(format: ImageOutputFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(3, 2)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn empty_part_means_no_image() {
        assert_eq!(UploadedImage::from_upload("", Vec::new()).unwrap(), None);
    }

    #[test]
    fn png_and_jpeg_are_sniffed() {
        let png = UploadedImage::from_upload("cat.PNG", encoded(ImageOutputFormat::Png))
            .unwrap()
            .unwrap();
        assert_eq!(png.kind, ImageKind::Png);
        assert_eq!(png.kind.mime_type(), "image/png");
        assert_eq!(png.dimensions(), Some((3, 2)));

        let jpeg = UploadedImage::from_upload("cat.jpg", encoded(ImageOutputFormat::Jpeg(85)))
            .unwrap()
            .unwrap();
        assert_eq!(jpeg.kind, ImageKind::Jpeg);
        assert_eq!(jpeg.kind.mime_type(), "image/jpeg");
    }

    #[test]
    fn content_decides_the_mime_type() {
        let image = UploadedImage::from_upload("photo.jpeg", encoded(ImageOutputFormat::Png))
            .unwrap()
            .unwrap();
        assert_eq!(image.kind, ImageKind::Png);
    }

    #[test]
    fn other_extensions_are_rejected() {
        let err = UploadedImage::from_upload("anim.gif", encoded(ImageOutputFormat::Png)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(UploadedImage::from_upload("noext", encoded(ImageOutputFormat::Png)).is_err());
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let err = UploadedImage::from_upload("notes.png", b"hello world".to_vec()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn unsupported_formats_are_rejected_even_with_a_png_name() {
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
        assert_eq!(image::guess_format(&gif).unwrap(), ImageFormat::Gif);
        assert!(UploadedImage::from_upload("fake.png", gif).is_err());
    }
}
