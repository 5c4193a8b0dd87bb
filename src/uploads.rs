//! Upload pipeline: per-file validation and conversion to inline data URIs,
//! plus the pending selection the add-project form draws from.

use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Per-image ceiling. Anything strictly larger is rejected.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Validate one candidate file and encode it as a `data:` URI.
///
/// Rejections mirror the form-side rules: the declared media type must be an
/// image type, the payload must not exceed 5 MiB, and the bytes must sniff
/// as a decodable image (a renamed .exe does not become a PNG).
pub fn encode_image(declared_type: Option<&str>, bytes: &[u8]) -> Result<String, String> {
    let is_image_type = declared_type
        .map(|t| t.starts_with("image/"))
        .unwrap_or(false);
    if !is_image_type {
        return Err("Only image files (JPG, PNG, GIF) are allowed".to_string());
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err("File too large — maximum 5 MB per image".to_string());
    }

    let format = image::guess_format(bytes)
        .map_err(|_| "File is not a readable image".to_string())?;

    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Images accepted so far for the next project, in the order their reads
/// completed. Held as managed state; the dashboard preview renders from it
/// and a successful create consumes it.
pub struct PendingUploads {
    images: Mutex<Vec<String>>,
}

impl PendingUploads {
    pub fn new() -> Self {
        PendingUploads {
            images: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, data_uri: String) {
        self.images.lock().unwrap().push(data_uri);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.images.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.images.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.images.lock().unwrap().clear();
    }

    /// Hand the accumulated images to a new record and reset the selection.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.images.lock().unwrap())
    }
}

impl Default for PendingUploads {
    fn default() -> Self {
        Self::new()
    }
}
