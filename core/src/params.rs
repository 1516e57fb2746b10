//! Caller-supplied parameters validated before a request is built.
//!
//! String inputs parse case-insensitively; an unknown value is reported as
//! `ApiError::InvalidParameter` naming the parameter, and no request is sent.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;

/// Largest image, inline or remote, the platform accepts (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10_485_760;

/// Pagination for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub per_page: u32,
    pub page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { per_page: 10, page: 1 }
    }
}

impl Page {
    pub fn new(per_page: u32, page: u32) -> Self {
        Self { per_page, page }
    }

    pub fn query(&self) -> String {
        format!("per_page={}&page={}", self.per_page, self.page)
    }
}

/// Sort direction for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ApiError::InvalidParameter("order_by")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implements `as_str`, `FromStr` and `Display` for a lowercase wire enum.
macro_rules! wire_enum {
    ($name:ident, $param:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ApiError::InvalidParameter($param)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Order lifecycle states accepted by the order listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Returned,
    Canceled,
}

wire_enum!(OrderStatus, "status", {
    Pending => "pending",
    Paid => "paid",
    Shipped => "shipped",
    Completed => "completed",
    Returned => "returned",
    Canceled => "canceled",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Available,
    Archived,
}

wire_enum!(ProductStatus, "status", {
    Draft => "draft",
    Available => "available",
    Archived => "archived",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatType {
    High,
    Low,
}

wire_enum!(VatType, "VAT", {
    High => "high",
    Low => "low",
});

/// How a product image string will be checked before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// An `http`/`https` URL; existence and size need a HEAD probe.
    Remote(Url),
    /// Standard base64 data with the decoded byte count.
    Inline { decoded_len: usize },
    Invalid,
}

pub fn classify_image(candidate: &str) -> ImageSource {
    if let Ok(url) = Url::parse(candidate) {
        if matches!(url.scheme(), "http" | "https") {
            return ImageSource::Remote(url);
        }
    }
    if candidate.is_empty() {
        return ImageSource::Invalid;
    }
    match STANDARD.decode(candidate) {
        Ok(bytes) => ImageSource::Inline { decoded_len: bytes.len() },
        Err(_) => ImageSource::Invalid,
    }
}

pub fn within_image_limit(bytes: u64) -> bool {
    bytes <= MAX_IMAGE_BYTES
}
