//! In-memory records served by the mock.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Byte size of the seeded `small.png` image.
pub const SMALL_IMAGE_BYTES: usize = 2048;
/// One byte over the platform's 10 MiB image limit.
pub const LARGE_IMAGE_BYTES: usize = 10_485_761;

pub const PRODUCT_STATUSES: [&str; 3] = ["draft", "available", "archived"];
pub const VAT_TYPES: [&str; 2] = ["high", "low"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Shop {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub shop_id: u64,
    pub status: String,
    pub firstname: String,
    pub lastname: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttributeValue {
    pub id: u64,
    pub attribute_id: u64,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Variation {
    pub attribute_value_id: u64,
    pub manage_stock: bool,
    pub stock: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub shop_id: u64,
    pub status: String,
    pub content: String,
    pub price: f64,
    pub large: bool,
    pub weight: u32,
    pub sku: String,
    pub manage_stock: bool,
    pub stock: i64,
    pub vat_type: String,
    pub seo_title: String,
    pub seo_description: String,
    pub images: Vec<String>,
    pub categories: Vec<u64>,
    pub variations: Vec<Variation>,
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: u64,
    pub shops: BTreeMap<u64, Shop>,
    pub categories: BTreeMap<u64, Category>,
    pub orders: BTreeMap<u64, Order>,
    pub attributes: BTreeMap<u64, Attribute>,
    pub attribute_values: BTreeMap<u64, AttributeValue>,
    pub products: BTreeMap<u64, Product>,
    /// Image name to size in bytes, served under `/images/{name}`.
    pub images: HashMap<String, usize>,
}

impl Store {
    /// One shop, one category, one paid order and two images.
    pub fn seeded() -> Self {
        let mut store = Self::default();

        let shop_id = store.next_id();
        store.shops.insert(
            shop_id,
            Shop {
                id: shop_id,
                name: "Corner Shop".to_string(),
            },
        );

        let category_id = store.next_id();
        store.categories.insert(
            category_id,
            Category {
                id: category_id,
                name: "Shirts".to_string(),
            },
        );

        let order_id = store.next_id();
        store.orders.insert(
            order_id,
            Order {
                id: order_id,
                shop_id,
                status: "paid".to_string(),
                firstname: "Grace".to_string(),
                lastname: "Hopper".to_string(),
                street: "Harbour".to_string(),
                house_number: "12".to_string(),
                postal_code: "1011AB".to_string(),
                city: "Amsterdam".to_string(),
                note: None,
            },
        );

        store.images.insert("small.png".to_string(), SMALL_IMAGE_BYTES);
        store.images.insert("large.png".to_string(), LARGE_IMAGE_BYTES);
        store
    }

    /// Ids are unique across every record type.
    pub fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn first_shop_id(&self) -> Option<u64> {
        self.shops.keys().next().copied()
    }
}
