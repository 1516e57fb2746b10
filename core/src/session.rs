//! Blocking execution of `Client` requests.
//!
//! # Design
//! `Session` is the host half of the host-does-IO split: it sends what
//! `Client` builds through a `Transport` and feeds the response back. It adds
//! the two behaviours that need the network: one immediate re-attempt when
//! the platform answers 500, and HEAD probes for remote product images.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::Client;
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{classify_image, within_image_limit, ImageSource, OrderStatus, Page, SortOrder};
use crate::response::{self, Outcome};
use crate::types::{NewOrder, NewProduct, ProductChanges};

/// Total attempts for a request the platform answers with 500.
const SERVER_ERROR_ATTEMPTS: usize = 2;

/// Performs one HTTP round-trip. Non-2xx statuses are data, not errors.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a blocking `ureq` agent. Redirects are followed.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Head => with_headers(self.agent.head(url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), headers).send(body),
            HttpMethod::Put => with_headers(self.agent.put(url), headers).send(body),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = if request.method == HttpMethod::Head {
            String::new()
        } else {
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?
        };

        Ok(HttpResponse { status, headers, body })
    }
}

/// A `Client` paired with a `Transport`.
#[derive(Debug, Clone)]
pub struct Session<T = UreqTransport> {
    client: Client,
    transport: T,
}

impl Session<UreqTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Session<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            client: Client::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends `request`, re-attempting once immediately on a 500.
    pub fn send(&self, request: &HttpRequest) -> Result<Value, ApiError> {
        let mut attempt = 1;
        loop {
            debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let response = self.transport.execute(request)?;
            match response::interpret(request.method, &response) {
                Outcome::Success(value) => return Ok(value),
                Outcome::Failure(err) => return Err(err),
                Outcome::ServerError if attempt < SERVER_ERROR_ATTEMPTS => {
                    warn!(method = %request.method, url = %request.url, "server error, re-attempting");
                    attempt += 1;
                }
                Outcome::ServerError => return Err(ApiError::ServerError { status: response.status }),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    pub fn get_shops(&self, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_shops(page)?)
    }

    pub fn get_shop(&self, shop_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_shop(shop_id)?)
    }

    pub fn get_shop_orders(&self, shop_id: u64, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_shop_orders(shop_id, page)?)
    }

    pub fn get_shop_products(&self, shop_id: u64, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_shop_products(shop_id, page)?)
    }

    pub fn get_orders(&self, order_by: SortOrder, status: Option<OrderStatus>, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_orders(order_by, status, page)?)
    }

    pub fn create_order(&self, order: &NewOrder) -> Result<Value, ApiError> {
        self.send(&self.client.build_create_order(order)?)
    }

    pub fn get_categories(&self, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_categories(page)?)
    }

    pub fn get_category(&self, category_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_category(category_id)?)
    }

    pub fn get_attributes(&self, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_attributes(page)?)
    }

    pub fn get_attribute(&self, attribute_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_attribute(attribute_id)?)
    }

    pub fn create_attribute(&self, name: &str, description: &str) -> Result<Value, ApiError> {
        self.send(&self.client.build_create_attribute(name, description)?)
    }

    pub fn delete_attribute(&self, attribute_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_delete_attribute(attribute_id)?)
    }

    pub fn get_attribute_values(&self, attribute_id: u64, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_attribute_values(attribute_id, page)?)
    }

    pub fn get_attribute_value(&self, attribute_id: u64, value_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_attribute_value(attribute_id, value_id)?)
    }

    pub fn create_attribute_value(&self, attribute_id: u64, value: &str) -> Result<Value, ApiError> {
        self.send(&self.client.build_create_attribute_value(attribute_id, value)?)
    }

    pub fn delete_attribute_value(&self, attribute_id: u64, value_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_delete_attribute_value(attribute_id, value_id)?)
    }

    pub fn get_products(&self, page: Page) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_products(page)?)
    }

    pub fn get_product(&self, product_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_get_product(product_id)?)
    }

    /// Drops images that fail validation, then creates the product.
    pub fn create_product(&self, product: &NewProduct) -> Result<Value, ApiError> {
        let mut product = product.clone();
        product.images = self.filter_images(&product.images);
        self.send(&self.client.build_create_product(&product)?)
    }

    pub fn update_product(&self, product_id: u64, changes: &ProductChanges) -> Result<Value, ApiError> {
        let mut changes = changes.clone();
        if let Some(images) = changes.images.as_deref() {
            changes.images = Some(self.filter_images(images));
        }
        self.send(&self.client.build_update_product(product_id, &changes)?)
    }

    pub fn delete_product(&self, product_id: u64) -> Result<Value, ApiError> {
        self.send(&self.client.build_delete_product(product_id)?)
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// `true` when a HEAD request to `url` succeeds with a status below 400.
    pub fn image_exists(&self, url: &str) -> bool {
        self.probe_image(url).is_some()
    }

    /// Keeps, in order, the images the platform will accept: reachable URLs
    /// of at most 10 MiB, and base64 data decoding to at most 10 MiB.
    pub fn filter_images(&self, images: &[String]) -> Vec<String> {
        images
            .iter()
            .filter(|image| {
                let accepted = self.accepts_image(image);
                if !accepted {
                    debug!(image = %truncate_for_log(image), "dropping product image");
                }
                accepted
            })
            .cloned()
            .collect()
    }

    fn accepts_image(&self, image: &str) -> bool {
        match classify_image(image) {
            ImageSource::Remote(url) => self
                .probe_image(url.as_str())
                .is_some_and(|response| response.content_length().is_none_or(within_image_limit)),
            ImageSource::Inline { decoded_len } => {
                within_image_limit(u64::try_from(decoded_len).unwrap_or(u64::MAX))
            }
            ImageSource::Invalid => false,
        }
    }

    fn probe_image(&self, url: &str) -> Option<HttpResponse> {
        let request = self.client.build_image_probe(url);
        match self.transport.execute(&request) {
            Ok(response) if response.status < 400 => Some(response),
            Ok(response) => {
                debug!(url, status = response.status, "image probe failed");
                None
            }
            Err(err) => {
                debug!(url, error = %err, "image probe failed");
                None
            }
        }
    }
}

/// Inline images can be megabytes of base64; log only the head.
fn truncate_for_log(image: &str) -> &str {
    match image.char_indices().nth(64) {
        Some((idx, _)) => &image[..idx],
        None => image,
    }
}
