//! Image loading collaborator.
//!
//! The core never decodes pixels. It only needs an image's dimensions, which
//! the default loader reads from the file header with `imagesize`.

use std::io;
use std::path::Path;

use crate::error::BoxlabelError;
use crate::model::{Image, ImageFormat};

/// Turns a file path into an [`Image`] entry with known dimensions.
pub trait ImageLoader {
    /// Loads image metadata from `path`.
    ///
    /// # Errors
    /// Implementations fail for missing files, unsupported extensions, and
    /// content that cannot be decoded.
    fn load(&self, path: &Path) -> Result<Image, BoxlabelError>;
}

/// Loader that reads dimensions from the file header.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImagesizeLoader;

impl ImageLoader for ImagesizeLoader {
    fn load(&self, path: &Path) -> Result<Image, BoxlabelError> {
        if !path.is_file() {
            return Err(BoxlabelError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("image file not found: {}", path.display()),
            )));
        }

        if ImageFormat::from_path(path).is_none() {
            return Err(BoxlabelError::UnsupportedImageFormat {
                path: path.to_path_buf(),
            });
        }

        let (width, height) = read_image_dimensions(path)?;
        let absolute = std::path::absolute(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Image::new(absolute, filename, width, height))
    }
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), BoxlabelError> {
    let size = imagesize::size(path).map_err(|source| BoxlabelError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let corrupted = || BoxlabelError::ImageDecode {
        path: path.to_path_buf(),
        source: imagesize::ImageError::CorruptedImage,
    };

    let width: u32 = size.width.try_into().map_err(|_| corrupted())?;
    let height: u32 = size.height.try_into().map_err(|_| corrupted())?;

    if width == 0 || height == 0 {
        return Err(corrupted());
    }

    Ok((width, height))
}
