//! Request payloads for the Orderdaily API.
//!
//! # Design
//! `NewProduct` / `ProductChanges` are what callers fill in; `ProductPayload`
//! is what goes on the wire, with the platform's field names (`content`,
//! `large`, `stock`, `categories`) and a generated `slug`. Responses are left
//! as `serde_json::Value`: the platform does not publish a stable schema.

use serde::{Deserialize, Serialize};

use crate::params::{ProductStatus, VatType};

/// Stock tracking for one attribute value of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub attribute_value_id: u64,
    pub manage_stock: bool,
    pub stock: i64,
}

/// A product to create. Every field is required by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub shop_id: u64,
    pub status: ProductStatus,
    pub description: String,
    pub price: f64,
    pub is_large: bool,
    pub weight: u32,
    pub sku: String,
    pub manage_stock: bool,
    pub stock: i64,
    pub vat_type: VatType,
    pub seo_title: String,
    pub seo_description: String,
    /// URLs or base64 data; `Session` drops the ones that fail validation.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<u64>,
    #[serde(default)]
    pub variations: Vec<Variation>,
}

/// A partial product update. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub shop_id: Option<u64>,
    pub status: Option<ProductStatus>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_large: Option<bool>,
    pub weight: Option<u32>,
    pub sku: Option<String>,
    pub manage_stock: Option<bool>,
    pub stock: Option<i64>,
    pub vat_type: Option<VatType>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_ids: Option<Vec<u64>>,
    pub variations: Option<Vec<Variation>>,
}

/// Product body as sent to `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_type: Option<VatType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<Variation>>,
}

impl ProductPayload {
    pub fn create(product: &NewProduct, slug: String) -> Self {
        Self {
            name: Some(product.name.clone()),
            slug: Some(slug),
            shop_id: Some(product.shop_id),
            status: Some(product.status),
            content: Some(product.description.clone()),
            price: Some(product.price),
            large: Some(product.is_large),
            weight: Some(product.weight),
            sku: Some(product.sku.clone()),
            manage_stock: Some(product.manage_stock),
            stock: Some(product.stock),
            vat_type: Some(product.vat_type),
            seo_title: Some(product.seo_title.clone()),
            seo_description: Some(product.seo_description.clone()),
            images: Some(product.images.clone()),
            categories: Some(product.category_ids.clone()),
            variations: Some(product.variations.clone()),
        }
    }

    /// `slug` is expected to be `Some` exactly when `changes.name` is.
    pub fn update(changes: &ProductChanges, slug: Option<String>) -> Self {
        Self {
            name: changes.name.clone(),
            slug,
            shop_id: changes.shop_id,
            status: changes.status,
            content: changes.description.clone(),
            price: changes.price,
            large: changes.is_large,
            weight: changes.weight,
            sku: changes.sku.clone(),
            manage_stock: changes.manage_stock,
            stock: changes.stock,
            vat_type: changes.vat_type,
            seo_title: changes.seo_title.clone(),
            seo_description: changes.seo_description.clone(),
            images: changes.images.clone(),
            categories: changes.category_ids.clone(),
            variations: changes.variations.clone(),
        }
    }
}

/// Body of `POST /attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePayload {
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Body of `POST /attributes/{id}/attribute_values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValuePayload {
    pub value: String,
}

/// Order submitted through the partner API. `note` is sent as `null` when
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> NewProduct {
        NewProduct {
            name: "Red Shirt".to_string(),
            shop_id: 3,
            status: ProductStatus::Available,
            description: "Cotton".to_string(),
            price: 19.95,
            is_large: false,
            weight: 250,
            sku: "RS-1".to_string(),
            manage_stock: true,
            stock: 12,
            vat_type: VatType::High,
            seo_title: "Red shirt".to_string(),
            seo_description: "A red shirt".to_string(),
            images: vec![],
            category_ids: vec![1, 2],
            variations: vec![Variation {
                attribute_value_id: 9,
                manage_stock: true,
                stock: 4,
            }],
        }
    }

    #[test]
    fn create_payload_uses_wire_names() {
        let payload = ProductPayload::create(&sample_product(), "red-shirt-12345".to_string());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["content"], "Cotton");
        assert_eq!(json["large"], false);
        assert_eq!(json["stock"], 12);
        assert_eq!(json["categories"], serde_json::json!([1, 2]));
        assert_eq!(json["status"], "available");
        assert_eq!(json["vat_type"], "high");
        assert_eq!(json["variations"][0]["attribute_value_id"], 9);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn update_payload_omits_absent_fields() {
        let changes = ProductChanges {
            price: Some(5.0),
            images: Some(vec![]),
            ..ProductChanges::default()
        };
        let json = serde_json::to_value(ProductPayload::update(&changes, None)).unwrap();
        assert_eq!(json, serde_json::json!({"price": 5.0, "images": []}));
    }

    #[test]
    fn order_note_serializes_as_null() {
        let order = NewOrder {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            street: "Main".to_string(),
            house_number: "1".to_string(),
            postal_code: "1234AB".to_string(),
            city: "Utrecht".to_string(),
            note: None,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert!(json["note"].is_null());
        assert!(json.as_object().unwrap().contains_key("note"));
    }
}
