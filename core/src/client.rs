//! Stateless request builder and response parser for the Orderdaily API.
//!
//! # Design
//! `Client` holds only a `Config`. Each endpoint has a `build_*` method that
//! validates its inputs, attaches the right credentials and produces an
//! `HttpRequest`; `parse_response` turns whatever the host got back into
//! `Result<Value, ApiError>`. Nothing here performs I/O, so the only
//! non-deterministic part of a request is the random suffix of a `slug`.

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{OrderStatus, Page, SortOrder};
use crate::response;
use crate::slug::unique_slug;
use crate::types::{AttributePayload, AttributeValuePayload, NewOrder, NewProduct, ProductChanges, ProductPayload};

const MAIN_API_PREFIX: &str = "/api/v1";
const PARTNER_ORDER_PATH: &str = "/api/orders/create";

#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Shops
    // -----------------------------------------------------------------------

    pub fn build_get_shops(&self, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/shops?{}", page.query()))
    }

    pub fn build_get_shop(&self, shop_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/shops/{shop_id}"))
    }

    pub fn build_get_shop_orders(&self, shop_id: u64, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/shops/{shop_id}/orders?{}", page.query()))
    }

    pub fn build_get_shop_products(&self, shop_id: u64, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/shops/{shop_id}/products?{}", page.query()))
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    pub fn build_get_orders(
        &self,
        order_by: SortOrder,
        status: Option<OrderStatus>,
        page: Page,
    ) -> Result<HttpRequest, ApiError> {
        let mut path = format!("/orders?{}&order_by={order_by}", page.query());
        if let Some(status) = status {
            path.push_str(&format!("&status={status}"));
        }
        self.main_get(&path)
    }

    /// Submits an order through the partner API.
    pub fn build_create_order(&self, order: &NewOrder) -> Result<HttpRequest, ApiError> {
        let headers = self.config.partner_headers()?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{PARTNER_ORDER_PATH}", self.config.partner_base_url),
            headers,
            body: Some(serde_json::to_string(order)?),
        })
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    pub fn build_get_categories(&self, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/categories?{}", page.query()))
    }

    pub fn build_get_category(&self, category_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/categories/{category_id}"))
    }

    // -----------------------------------------------------------------------
    // Attributes and attribute values
    // -----------------------------------------------------------------------

    pub fn build_get_attributes(&self, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/attributes?{}", page.query()))
    }

    pub fn build_get_attribute(&self, attribute_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/attributes/{attribute_id}"))
    }

    /// The slug is derived from `name` with a random 5-digit suffix.
    pub fn build_create_attribute(&self, name: &str, description: &str) -> Result<HttpRequest, ApiError> {
        let payload = AttributePayload {
            name: name.to_string(),
            slug: unique_slug(name),
            description: description.to_string(),
        };
        self.main_json(HttpMethod::Post, "/attributes", &payload)
    }

    pub fn build_delete_attribute(&self, attribute_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_delete(&format!("/attributes/{attribute_id}"))
    }

    pub fn build_get_attribute_values(&self, attribute_id: u64, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/attributes/{attribute_id}/attribute_values?{}", page.query()))
    }

    pub fn build_get_attribute_value(&self, attribute_id: u64, value_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/attributes/{attribute_id}/attribute_values/{value_id}"))
    }

    pub fn build_create_attribute_value(&self, attribute_id: u64, value: &str) -> Result<HttpRequest, ApiError> {
        let payload = AttributeValuePayload {
            value: value.to_string(),
        };
        self.main_json(
            HttpMethod::Post,
            &format!("/attributes/{attribute_id}/attribute_values"),
            &payload,
        )
    }

    pub fn build_delete_attribute_value(&self, attribute_id: u64, value_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_delete(&format!("/attributes/{attribute_id}/attribute_values/{value_id}"))
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    pub fn build_get_products(&self, page: Page) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/products?{}", page.query()))
    }

    pub fn build_get_product(&self, product_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_get(&format!("/products/{product_id}"))
    }

    /// Images are sent as given; `Session::create_product` filters them first.
    pub fn build_create_product(&self, product: &NewProduct) -> Result<HttpRequest, ApiError> {
        let payload = ProductPayload::create(product, unique_slug(&product.name));
        self.main_json(HttpMethod::Post, "/products", &payload)
    }

    /// A new slug is generated only when the name changes.
    pub fn build_update_product(&self, product_id: u64, changes: &ProductChanges) -> Result<HttpRequest, ApiError> {
        let slug = changes.name.as_deref().map(unique_slug);
        let payload = ProductPayload::update(changes, slug);
        self.main_json(HttpMethod::Put, &format!("/products/{product_id}"), &payload)
    }

    pub fn build_delete_product(&self, product_id: u64) -> Result<HttpRequest, ApiError> {
        self.main_delete(&format!("/products/{product_id}"))
    }

    // -----------------------------------------------------------------------
    // Images and responses
    // -----------------------------------------------------------------------

    /// Unauthenticated HEAD request used to check that a remote image exists.
    pub fn build_image_probe(&self, url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Head,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Interprets `response` to a request sent with `method`. A 500 is
    /// reported as `ApiError::ServerError`; `Session` re-attempts it instead.
    pub fn parse_response(&self, method: HttpMethod, response: &HttpResponse) -> Result<Value, ApiError> {
        response::into_result(method, response)
    }

    fn main_get(&self, path: &str) -> Result<HttpRequest, ApiError> {
        self.main_request(HttpMethod::Get, path, None)
    }

    fn main_delete(&self, path: &str) -> Result<HttpRequest, ApiError> {
        self.main_request(HttpMethod::Delete, path, None)
    }

    fn main_json<T: Serialize>(&self, method: HttpMethod, path: &str, payload: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload)?;
        self.main_request(method, path, Some(body))
    }

    fn main_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<HttpRequest, ApiError> {
        let headers = self.config.main_headers()?;
        Ok(HttpRequest {
            method,
            url: format!("{}{MAIN_API_PREFIX}{path}", self.config.main_base_url),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ProductStatus, VatType};
    use crate::types::Variation;

    fn client() -> Client {
        Client::new(
            Config::new("tests")
                .with_main_api_key("main-key")
                .with_partner_api_key("partner-key")
                .with_main_base_url("http://localhost:3000/")
                .with_partner_base_url("http://localhost:4000"),
        )
    }

    fn body(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    fn assert_suffixed_slug(slug: &str, base: &str) {
        let (prefix, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(prefix, base);
        assert!(suffix.len() == 5 && suffix.bytes().all(|b| b.is_ascii_digit()), "{slug}");
    }

    fn product() -> NewProduct {
        NewProduct {
            name: "Blue Mug".to_string(),
            shop_id: 1,
            status: ProductStatus::Draft,
            description: "Ceramic".to_string(),
            price: 7.5,
            is_large: false,
            weight: 300,
            sku: "MUG-B".to_string(),
            manage_stock: false,
            stock: 0,
            vat_type: VatType::Low,
            seo_title: "Mug".to_string(),
            seo_description: "Blue mug".to_string(),
            images: vec!["aGVsbG8=".to_string()],
            category_ids: vec![4],
            variations: vec![Variation {
                attribute_value_id: 2,
                manage_stock: true,
                stock: 8,
            }],
        }
    }

    #[test]
    fn build_get_shops_produces_correct_request() {
        let req = client().build_get_shops(Page::default()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v1/shops?per_page=10&page=1");
        assert_eq!(req.header("authorization"), Some("Bearer main-key"));
        assert_eq!(req.header("user-agent"), Some("orderdaily-api-rust/tests"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_orders_with_and_without_status() {
        let req = client()
            .build_get_orders(SortOrder::Desc, None, Page::new(25, 2))
            .unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/api/v1/orders?per_page=25&page=2&order_by=DESC"
        );

        let req = client()
            .build_get_orders(SortOrder::Asc, Some(OrderStatus::Shipped), Page::default())
            .unwrap();
        assert!(req.url.ends_with("order_by=ASC&status=shipped"));
    }

    #[test]
    fn nested_resource_paths() {
        let c = client();
        assert!(c.build_get_shop(5).unwrap().url.ends_with("/api/v1/shops/5"));
        assert!(c
            .build_get_shop_orders(5, Page::default())
            .unwrap()
            .url
            .ends_with("/shops/5/orders?per_page=10&page=1"));
        assert!(c
            .build_get_shop_products(5, Page::default())
            .unwrap()
            .url
            .ends_with("/shops/5/products?per_page=10&page=1"));
        assert!(c.build_get_category(8).unwrap().url.ends_with("/categories/8"));
        assert!(c
            .build_get_attribute_value(3, 11)
            .unwrap()
            .url
            .ends_with("/attributes/3/attribute_values/11"));
    }

    #[test]
    fn build_create_attribute_generates_slug() {
        let req = client().build_create_attribute("Shirt Size", "Sizes").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/v1/attributes");
        let body = body(&req);
        assert_eq!(body["name"], "Shirt Size");
        assert_eq!(body["description"], "Sizes");
        assert_suffixed_slug(body["slug"].as_str().unwrap(), "shirt-size");
    }

    #[test]
    fn build_create_attribute_value_sends_value() {
        let req = client().build_create_attribute_value(3, "XL").unwrap();
        assert!(req.url.ends_with("/attributes/3/attribute_values"));
        assert_eq!(body(&req), serde_json::json!({"value": "XL"}));
    }

    #[test]
    fn deletes_carry_no_body() {
        let c = client();
        for req in [
            c.build_delete_attribute(1).unwrap(),
            c.build_delete_attribute_value(1, 2).unwrap(),
            c.build_delete_product(3).unwrap(),
        ] {
            assert_eq!(req.method, HttpMethod::Delete);
            assert!(req.body.is_none());
        }
    }

    #[test]
    fn build_create_product_maps_fields() {
        let req = client().build_create_product(&product()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.url.ends_with("/api/v1/products"));
        let body = body(&req);
        assert_suffixed_slug(body["slug"].as_str().unwrap(), "blue-mug");
        assert_eq!(body["content"], "Ceramic");
        assert_eq!(body["status"], "draft");
        assert_eq!(body["vat_type"], "low");
        assert_eq!(body["images"], serde_json::json!(["aGVsbG8="]));
        assert_eq!(body["categories"], serde_json::json!([4]));
    }

    #[test]
    fn build_update_product_regenerates_slug_only_on_rename() {
        let c = client();
        let changes = ProductChanges {
            stock: Some(3),
            ..ProductChanges::default()
        };
        let req = c.build_update_product(9, &changes).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert!(req.url.ends_with("/products/9"));
        assert_eq!(body(&req), serde_json::json!({"stock": 3}));

        let changes = ProductChanges {
            name: Some("Green Mug".to_string()),
            ..ProductChanges::default()
        };
        let body = body(&c.build_update_product(9, &changes).unwrap());
        assert_eq!(body["name"], "Green Mug");
        assert_suffixed_slug(body["slug"].as_str().unwrap(), "green-mug");
    }

    #[test]
    fn build_create_order_uses_partner_api() {
        let order = NewOrder {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            street: "Dam".to_string(),
            house_number: "1".to_string(),
            postal_code: "1012JS".to_string(),
            city: "Amsterdam".to_string(),
            note: Some("Ring twice".to_string()),
        };
        let req = client().build_create_order(&order).unwrap();
        assert_eq!(req.url, "http://localhost:4000/api/orders/create");
        assert_eq!(req.header("authorization"), Some("partner-key"));
        assert_eq!(body(&req)["note"], "Ring twice");
    }

    #[test]
    fn missing_credentials_stop_the_build() {
        let c = Client::new(Config::new("tests").with_partner_api_key("p"));
        let err = c.build_get_products(Page::default()).unwrap_err();
        assert_eq!(err.to_string(), "Main API Key is not defined.");

        let c = Client::new(Config::default());
        let err = c.build_get_products(Page::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingApplicationName));
    }

    #[test]
    fn image_probe_is_unauthenticated_head() {
        let req = client().build_image_probe("https://cdn.example.com/a.png");
        assert_eq!(req.method, HttpMethod::Head);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn parse_response_maps_status() {
        let ok = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"data":[]}"#.to_string(),
        };
        assert_eq!(
            client().parse_response(HttpMethod::Get, &ok).unwrap()["data"],
            serde_json::json!([])
        );

        let forbidden = HttpResponse {
            status: 403,
            headers: Vec::new(),
            body: r#"{"message":"Forbidden"}"#.to_string(),
        };
        let err = client().parse_response(HttpMethod::Get, &forbidden).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = client().build_get_products(Page::default()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/v1/products?per_page=10&page=1");
    }
}
