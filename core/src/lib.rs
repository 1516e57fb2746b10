//! Client core for the Orderdaily e-commerce API.
//!
//! # Overview
//! Two API surfaces are covered: the administrative main API (shops,
//! orders, categories, attributes, products) and the partner API used to
//! submit orders. `Client` builds authenticated `HttpRequest` values and
//! parses `HttpResponse` values without touching the network; `Session`
//! runs them over HTTP with `ureq`, re-attempting once on a 500 and probing
//! remote product images.
//!
//! # Design
//! - `Client` is stateless apart from its `Config`; credentials are checked
//!   when a request needs them.
//! - Parameters are typed (`SortOrder`, `OrderStatus`, `ProductStatus`,
//!   `VatType`) and parse case-insensitively from strings.
//! - Every failure is an `ApiError` whose `Display` is the platform's own
//!   message.
//! - `slug` turns product and attribute names into the `slug` fields the
//!   platform requires.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod response;
pub mod session;
pub mod slug;
pub mod types;

pub use client::Client;
pub use config::Config;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{OrderStatus, Page, ProductStatus, SortOrder, VatType};
pub use session::{Session, Transport, UreqTransport};
pub use slug::{slugify, unique_slug};
pub use types::{NewOrder, NewProduct, ProductChanges, Variation};
