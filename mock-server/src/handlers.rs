//! Route handlers. Every response, including errors, carries a JSON body.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::{
    Attribute, AttributeValue, Order, Product, Variation, PRODUCT_STATUSES, VAT_TYPES,
};
use crate::AppState;

/// Error answer: a status code plus `{"message": ...}`.
#[derive(Debug)]
pub struct MockError {
    status: StatusCode,
    message: String,
}

impl MockError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found.")
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<JsonRejection> for MockError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

type HandlerResult<T> = Result<T, MockError>;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderParams {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub order_by: Option<String>,
    pub status: Option<String>,
}

fn paginate<T: Serialize>(items: Vec<T>, per_page: Option<u32>, page: Option<u32>) -> Json<Value> {
    let per_page = per_page.unwrap_or(10).max(1) as usize;
    let page = page.unwrap_or(1).max(1) as usize;
    let total = items.len();
    let data: Vec<T> = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    Json(json!({ "data": data, "page": page, "per_page": per_page, "total": total }))
}

fn deleted() -> Json<Value> {
    Json(json!({ "message": "Deleted." }))
}

fn require_non_empty(fields: &[(&str, &str)]) -> HandlerResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(MockError::unprocessable(format!("The {name} field is required."))),
        None => Ok(()),
    }
}

pub async fn unknown_endpoint() -> MockError {
    MockError::new(StatusCode::BAD_REQUEST, "Unknown endpoint.")
}

// ---------------------------------------------------------------------------
// Shops and orders
// ---------------------------------------------------------------------------

pub async fn list_shops(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = state.db.read().await;
    paginate(store.shops.values().cloned().collect(), params.per_page, params.page)
}

pub async fn get_shop(State(state): State<AppState>, Path(id): Path<u64>) -> HandlerResult<impl IntoResponse> {
    let store = state.db.read().await;
    store.shops.get(&id).cloned().map(Json).ok_or_else(MockError::not_found)
}

pub async fn list_shop_orders(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<ListParams>,
) -> HandlerResult<Json<Value>> {
    let store = state.db.read().await;
    if !store.shops.contains_key(&id) {
        return Err(MockError::not_found());
    }
    let orders = store.orders.values().filter(|o| o.shop_id == id).cloned().collect();
    Ok(paginate(orders, params.per_page, params.page))
}

pub async fn list_shop_products(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<ListParams>,
) -> HandlerResult<Json<Value>> {
    let store = state.db.read().await;
    if !store.shops.contains_key(&id) {
        return Err(MockError::not_found());
    }
    let products = store.products.values().filter(|p| p.shop_id == id).cloned().collect();
    Ok(paginate(products, params.per_page, params.page))
}

pub async fn list_orders(State(state): State<AppState>, Query(params): Query<OrderParams>) -> Json<Value> {
    let store = state.db.read().await;
    let status = params.status.map(|s| s.to_ascii_lowercase());
    let mut orders: Vec<Order> = store
        .orders
        .values()
        .filter(|o| status.as_deref().is_none_or(|s| o.status == s))
        .cloned()
        .collect();
    let ascending = params
        .order_by
        .as_deref()
        .is_some_and(|o| o.eq_ignore_ascii_case("asc"));
    if !ascending {
        orders.reverse();
    }
    paginate(orders, params.per_page, params.page)
}

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub note: Option<String>,
}

pub async fn create_partner_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(input) = payload?;
    require_non_empty(&[
        ("firstname", input.firstname.as_str()),
        ("lastname", input.lastname.as_str()),
        ("street", input.street.as_str()),
        ("house_number", input.house_number.as_str()),
        ("postal_code", input.postal_code.as_str()),
        ("city", input.city.as_str()),
    ])?;

    let mut store = state.db.write().await;
    let shop_id = store
        .first_shop_id()
        .ok_or_else(|| MockError::unprocessable("No shop accepts partner orders."))?;
    let id = store.next_id();
    let order = Order {
        id,
        shop_id,
        status: "pending".to_string(),
        firstname: input.firstname,
        lastname: input.lastname,
        street: input.street,
        house_number: input.house_number,
        postal_code: input.postal_code,
        city: input.city,
        note: input.note,
    };
    store.orders.insert(id, order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn list_categories(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = state.db.read().await;
    paginate(store.categories.values().cloned().collect(), params.per_page, params.page)
}

pub async fn get_category(State(state): State<AppState>, Path(id): Path<u64>) -> HandlerResult<impl IntoResponse> {
    let store = state.db.read().await;
    store.categories.get(&id).cloned().map(Json).ok_or_else(MockError::not_found)
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NewAttribute {
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct NewAttributeValue {
    pub value: String,
}

pub async fn list_attributes(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = state.db.read().await;
    paginate(store.attributes.values().cloned().collect(), params.per_page, params.page)
}

pub async fn get_attribute(State(state): State<AppState>, Path(id): Path<u64>) -> HandlerResult<impl IntoResponse> {
    let store = state.db.read().await;
    store.attributes.get(&id).cloned().map(Json).ok_or_else(MockError::not_found)
}

pub async fn create_attribute(
    State(state): State<AppState>,
    payload: Result<Json<NewAttribute>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(input) = payload?;
    require_non_empty(&[("name", input.name.as_str()), ("slug", input.slug.as_str())])?;

    let mut store = state.db.write().await;
    if store.attributes.values().any(|a| a.slug == input.slug) {
        return Err(MockError::unprocessable("The slug has already been taken."));
    }
    let id = store.next_id();
    let attribute = Attribute {
        id,
        name: input.name,
        slug: input.slug,
        description: input.description,
    };
    store.attributes.insert(id, attribute.clone());
    Ok((StatusCode::CREATED, Json(attribute)))
}

pub async fn delete_attribute(State(state): State<AppState>, Path(id): Path<u64>) -> HandlerResult<Json<Value>> {
    let mut store = state.db.write().await;
    store.attributes.remove(&id).ok_or_else(MockError::not_found)?;
    store.attribute_values.retain(|_, v| v.attribute_id != id);
    Ok(deleted())
}

pub async fn list_attribute_values(
    State(state): State<AppState>,
    Path(attribute_id): Path<u64>,
    Query(params): Query<ListParams>,
) -> HandlerResult<Json<Value>> {
    let store = state.db.read().await;
    if !store.attributes.contains_key(&attribute_id) {
        return Err(MockError::not_found());
    }
    let values = store
        .attribute_values
        .values()
        .filter(|v| v.attribute_id == attribute_id)
        .cloned()
        .collect();
    Ok(paginate(values, params.per_page, params.page))
}

pub async fn get_attribute_value(
    State(state): State<AppState>,
    Path((attribute_id, value_id)): Path<(u64, u64)>,
) -> HandlerResult<impl IntoResponse> {
    let store = state.db.read().await;
    store
        .attribute_values
        .get(&value_id)
        .filter(|v| v.attribute_id == attribute_id)
        .cloned()
        .map(Json)
        .ok_or_else(MockError::not_found)
}

pub async fn create_attribute_value(
    State(state): State<AppState>,
    Path(attribute_id): Path<u64>,
    payload: Result<Json<NewAttributeValue>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(input) = payload?;
    require_non_empty(&[("value", input.value.as_str())])?;

    let mut store = state.db.write().await;
    if !store.attributes.contains_key(&attribute_id) {
        return Err(MockError::not_found());
    }
    let id = store.next_id();
    let value = AttributeValue {
        id,
        attribute_id,
        value: input.value,
    };
    store.attribute_values.insert(id, value.clone());
    Ok((StatusCode::CREATED, Json(value)))
}

pub async fn delete_attribute_value(
    State(state): State<AppState>,
    Path((attribute_id, value_id)): Path<(u64, u64)>,
) -> HandlerResult<Json<Value>> {
    let mut store = state.db.write().await;
    let belongs = store
        .attribute_values
        .get(&value_id)
        .is_some_and(|v| v.attribute_id == attribute_id);
    if !belongs {
        return Err(MockError::not_found());
    }
    store.attribute_values.remove(&value_id);
    Ok(deleted())
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NewProduct {
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

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub shop_id: Option<u64>,
    pub status: Option<String>,
    pub content: Option<String>,
    pub price: Option<f64>,
    pub large: Option<bool>,
    pub weight: Option<u32>,
    pub sku: Option<String>,
    pub manage_stock: Option<bool>,
    pub stock: Option<i64>,
    pub vat_type: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub images: Option<Vec<String>>,
    pub categories: Option<Vec<u64>>,
    pub variations: Option<Vec<Variation>>,
}

fn check_choice(field: &str, value: &str, allowed: &[&str]) -> HandlerResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(MockError::unprocessable(format!("The selected {field} is invalid.")))
    }
}

pub async fn list_products(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Value> {
    let store = state.db.read().await;
    paginate(store.products.values().cloned().collect(), params.per_page, params.page)
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<u64>) -> HandlerResult<impl IntoResponse> {
    let store = state.db.read().await;
    store.products.get(&id).cloned().map(Json).ok_or_else(MockError::not_found)
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(input) = payload?;
    require_non_empty(&[("name", input.name.as_str()), ("slug", input.slug.as_str()), ("sku", input.sku.as_str())])?;
    check_choice("status", &input.status, &PRODUCT_STATUSES)?;
    check_choice("vat_type", &input.vat_type, &VAT_TYPES)?;

    let mut store = state.db.write().await;
    if !store.shops.contains_key(&input.shop_id) {
        return Err(MockError::unprocessable("The selected shop_id is invalid."));
    }
    let id = store.next_id();
    let product = Product {
        id,
        name: input.name,
        slug: input.slug,
        shop_id: input.shop_id,
        status: input.status,
        content: input.content,
        price: input.price,
        large: input.large,
        weight: input.weight,
        sku: input.sku,
        manage_stock: input.manage_stock,
        stock: input.stock,
        vat_type: input.vat_type,
        seo_title: input.seo_title,
        seo_description: input.seo_description,
        images: input.images,
        categories: input.categories,
        variations: input.variations,
    };
    store.products.insert(id, product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> HandlerResult<Json<Product>> {
    let Json(patch) = payload?;
    if let Some(status) = patch.status.as_deref() {
        check_choice("status", status, &PRODUCT_STATUSES)?;
    }
    if let Some(vat_type) = patch.vat_type.as_deref() {
        check_choice("vat_type", vat_type, &VAT_TYPES)?;
    }

    let mut store = state.db.write().await;
    let product = store.products.get_mut(&id).ok_or_else(MockError::not_found)?;
    macro_rules! apply {
        ($($field:ident),+ $(,)?) => {
            $(if let Some(value) = patch.$field {
                product.$field = value;
            })+
        };
    }
    apply!(
        name, slug, shop_id, status, content, price, large, weight, sku, manage_stock, stock,
        vat_type, seo_title, seo_description, images, categories, variations,
    );
    Ok(Json(product.clone()))
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<u64>) -> HandlerResult<Json<Value>> {
    let mut store = state.db.write().await;
    store.products.remove(&id).ok_or_else(MockError::not_found)?;
    Ok(deleted())
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Serves a zero-filled PNG of the registered size. HEAD gets the same
/// headers and no body is built.
pub async fn get_image(
    State(state): State<AppState>,
    method: Method,
    Path(name): Path<String>,
) -> HandlerResult<Response> {
    let size = *state.db.read().await.images.get(&name).ok_or_else(MockError::not_found)?;
    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (header::CONTENT_LENGTH, size.to_string()),
    ];
    let body = if method == Method::HEAD { Vec::new() } else { vec![0u8; size] };
    Ok((headers, body).into_response())
}
