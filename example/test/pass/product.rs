use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use transcodable::codable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Dimensions {
    width: f64,
    height: f64,
}

#[codable]
#[derive(Debug)]
struct Product {
    name: String,
    #[lossy]
    prices: BTreeMap<u16, f64>,
    #[lossy]
    #[default_on_failure(vec!["misc".to_string()])]
    categories: Vec<String>,
    #[raw_string]
    dimensions: Dimensions,
    #[default_on_failure(1)]
    stock: u32,
}

fn main() {
    let product: Product = serde_json::from_str(
        r#"{
            "name": "desk",
            "prices": {"2020": 99.5, "twenty": 80.0, "2021": "n/a", "2022": 120.0},
            "categories": "furniture",
            "dimensions": "{\"width\": 1.2, \"height\": 0.8}"
        }"#,
    )
    .unwrap();

    assert_eq!(product.name, "desk");
    assert_eq!(product.prices.keys().copied().collect::<Vec<_>>(), vec![2020, 2022]);
    assert_eq!(product.categories, vec!["misc".to_string()]);
    assert_eq!(product.dimensions.height, 0.8);
    assert_eq!(product.stock, 1);

    let value = serde_json::to_value(&product).unwrap();
    assert_eq!(value["dimensions"], r#"{"width":1.2,"height":0.8}"#);
    assert_eq!(value["prices"]["2020"], 99.5);
}
