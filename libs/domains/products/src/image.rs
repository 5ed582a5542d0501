//! Product image ingestion.
//!
//! Images arrive either as a multipart file or as a base64 string (optionally a
//! `data:image/...;base64,` URI). Both become raw bytes plus a generated
//! `.webp` filename under `products/`. Bytes are stored as received.

use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use rand::RngExt;
use regex::Regex;

use crate::error::{ProductError, ProductResult};

/// Directory inside the content store
pub const IMAGE_DIR: &str = "products";

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];
const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 15;

static DATA_URI_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^data:image/\w+;base64,").unwrap());

/// Where a product image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Multipart file part
    Upload {
        bytes: Vec<u8>,
        content_type: Option<String>,
        file_name: Option<String>,
    },
    /// Base64 string, with or without a data URI header
    DataUri(String),
}

/// Decoded image ready for the content store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    /// Path relative to the store root, e.g. `products/AbC..._1729300000.webp`
    pub path: String,
    pub bytes: Vec<u8>,
}

impl ImageSource {
    /// Validate and decode into bytes plus a fresh storage path
    pub fn into_stored(self) -> ProductResult<StoredImage> {
        let timestamp = Utc::now().timestamp();
        match self {
            ImageSource::Upload {
                bytes,
                content_type,
                file_name,
            } => {
                if !is_allowed_upload(content_type.as_deref(), file_name.as_deref()) {
                    return Err(ProductError::Validation(
                        "image: must be a file of type jpeg, jpg, png".into(),
                    ));
                }
                if bytes.is_empty() {
                    return Err(ProductError::Validation("image: file is empty".into()));
                }
                Ok(StoredImage {
                    path: format!("{}/{}-{}.webp", IMAGE_DIR, random_token(), timestamp),
                    bytes,
                })
            }
            ImageSource::DataUri(raw) => Ok(StoredImage {
                path: format!("{}/{}_{}.webp", IMAGE_DIR, random_token(), timestamp),
                bytes: decode_data_uri(&raw)?,
            }),
        }
    }
}

fn is_allowed_upload(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    match content_type.map(str::trim).filter(|ct| !ct.is_empty()) {
        Some(ct) => ALLOWED_CONTENT_TYPES
            .iter()
            .any(|allowed| ct.eq_ignore_ascii_case(allowed)),
        None => file_name
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| {
                ALLOWED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            }),
    }
}

/// Strip an optional `data:image/<type>;base64,` header and decode the rest
pub fn decode_data_uri(raw: &str) -> ProductResult<Vec<u8>> {
    let body = DATA_URI_HEADER.replace(raw.trim(), "");
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ProductError::Validation(format!("image: invalid base64 payload ({})", e)))?;
    if bytes.is_empty() {
        return Err(ProductError::Validation("image: is empty".into()));
    }
    Ok(bytes)
}

fn random_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}
