//! Verify build/parse behaviour against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file lists inputs and the expected outcome. Request bodies and
//! response values are compared as parsed JSON, not raw strings, so field
//! order does not matter.

use orderdaily_core::{
    slugify, Client, Config, HttpMethod, HttpRequest, HttpResponse, NewOrder, OrderStatus, Page, SortOrder,
};
use serde_json::Value;

const MAIN_BASE: &str = "http://main.test";
const PARTNER_BASE: &str = "http://partner.test";

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "HEAD" => HttpMethod::Head,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn header_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

#[test]
fn slugify_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/slugify.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        assert_eq!(slugify(input), case["expected"].as_str().unwrap(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/responses.json"));
    let client = Client::new(Config::new("vectors"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };

        let result = client.parse_response(method, &response);
        match case.get("error") {
            Some(message) => {
                let err = result.expect_err(name);
                assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}");
            }
            None => assert_eq!(result.expect(name), case["ok"], "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn build(client: &Client, operation: &str, args: &Value) -> HttpRequest {
    let id = || args["id"].as_u64().unwrap();
    let value_id = || args["value_id"].as_u64().unwrap();
    let page = || {
        Page::new(
            args["per_page"].as_u64().unwrap() as u32,
            args["page"].as_u64().unwrap() as u32,
        )
    };

    let built = match operation {
        "get_shops" => client.build_get_shops(page()),
        "get_shop" => client.build_get_shop(id()),
        "get_shop_orders" => client.build_get_shop_orders(id(), page()),
        "get_shop_products" => client.build_get_shop_products(id(), page()),
        "get_orders" => {
            let order_by: SortOrder = args["order_by"].as_str().unwrap().parse().unwrap();
            let status: Option<OrderStatus> = args["status"].as_str().map(|s| s.parse().unwrap());
            client.build_get_orders(order_by, status, page())
        }
        "get_categories" => client.build_get_categories(page()),
        "get_category" => client.build_get_category(id()),
        "get_attributes" => client.build_get_attributes(page()),
        "get_attribute" => client.build_get_attribute(id()),
        "delete_attribute" => client.build_delete_attribute(id()),
        "get_attribute_values" => client.build_get_attribute_values(id(), page()),
        "get_attribute_value" => client.build_get_attribute_value(id(), value_id()),
        "create_attribute_value" => client.build_create_attribute_value(id(), args["value"].as_str().unwrap()),
        "delete_attribute_value" => client.build_delete_attribute_value(id(), value_id()),
        "get_products" => client.build_get_products(page()),
        "get_product" => client.build_get_product(id()),
        "delete_product" => client.build_delete_product(id()),
        "create_order" => {
            let order: NewOrder = serde_json::from_value(args.clone()).unwrap();
            client.build_create_order(&order)
        }
        other => panic!("unknown operation: {other}"),
    };
    built.unwrap()
}

#[test]
fn request_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));
    let config = &vectors["config"];
    let client = Client::new(
        Config::new(config["application_name"].as_str().unwrap())
            .with_main_api_key(config["main_api_key"].as_str().unwrap())
            .with_partner_api_key(config["partner_api_key"].as_str().unwrap())
            .with_main_base_url(MAIN_BASE)
            .with_partner_base_url(PARTNER_BASE),
    );
    let main_headers = header_pairs(&vectors["main_headers"]);
    let partner_headers = header_pairs(&vectors["partner_headers"]);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let partner = case["partner"].as_bool().unwrap_or(false);
        let req = build(&client, case["operation"].as_str().unwrap(), &case["args"]);

        let base = if partner { PARTNER_BASE } else { MAIN_BASE };
        assert_eq!(req.method, parse_method(case["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base}{}", case["path"].as_str().unwrap()), "{name}: url");

        let expected_headers = if partner { &partner_headers } else { &main_headers };
        assert_eq!(&req.headers, expected_headers, "{name}: headers");

        match case.get("body") {
            Some(expected) => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: body"),
        }
    }
}
