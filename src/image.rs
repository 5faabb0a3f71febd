//! Image fields hold either a remote URL or an embedded `data:` URL. The store
//! does not care which; these helpers produce and recognise both.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use derive_debug::Dbg;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("not an image file ({path:?}): {mime}")]
    NotAnImage { path: PathBuf, mime: String },
    #[error("failed to read image file ({path:?}): {error}")]
    Read {
        error: std::io::Error,
        path: PathBuf,
    },
}

/// A local image file turned into a value an image field can hold.
#[derive(Dbg, Clone, PartialEq, Eq)]
pub struct Attachment {
    #[dbg(skip)]
    pub data_url: String,
    pub mime: mime::Mime,
    pub size: usize,
}

pub async fn attach_image(path: &Path) -> Result<Attachment, AttachError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime::IMAGE {
        return Err(AttachError::NotAnImage {
            path: path.to_owned(),
            mime: mime.to_string(),
        });
    }
    let body = tokio::fs::read(path)
        .await
        .map_err(|error| AttachError::Read {
            error,
            path: path.to_owned(),
        })?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&body);
    debug!(path = %path.display(), %mime, size = body.len(), "image attached");
    Ok(Attachment {
        data_url: format!("data:{mime};base64,{payload}"),
        mime,
        size: body.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Empty,
    Remote(url::Url),
    Embedded { mime: String, size: Option<usize> },
    Other,
}

impl ImageSource {
    pub fn classify(src: &str) -> Self {
        let src = src.trim();
        if src.is_empty() {
            return ImageSource::Empty;
        }
        if let Ok(url) = url::Url::parse(src) {
            if matches!(url.scheme(), "https" | "http") {
                return ImageSource::Remote(url);
            }
        }
        if let Ok(data) = data_url::DataUrl::process(src) {
            let mime = data.mime_type();
            let mime = format!("{}/{}", mime.type_, mime.subtype);
            let size = data.decode_to_vec().ok().map(|(body, _)| body.len());
            return ImageSource::Embedded { mime, size };
        }
        ImageSource::Other
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Empty => write!(f, "(none)"),
            ImageSource::Remote(url) => write!(f, "{url}"),
            ImageSource::Embedded {
                mime,
                size: Some(size),
            } => write!(f, "embedded {mime}, {size} bytes"),
            ImageSource::Embedded { mime, size: None } => write!(f, "embedded {mime}, corrupt"),
            ImageSource::Other => write!(f, "(unrecognised)"),
        }
    }
}
