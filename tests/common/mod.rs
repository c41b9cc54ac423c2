#![allow(dead_code)]

use std::sync::Once;

use serde_json::{json, Value};
use wiremock::MockServer;

pub const COLLECTION: &str = "/api/character/";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(character_browser::logging::initialize_for_tests);
}

pub fn endpoint(server: &MockServer) -> String {
    format!("{}{COLLECTION}", server.uri())
}

pub fn page_link(server: &MockServer, page: u32) -> String {
    format!("{}?page={page}", endpoint(server))
}

pub fn search_link(server: &MockServer, name: &str, page: u32) -> String {
    format!("{}?page={page}&name={name}", endpoint(server))
}

pub fn character(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Character {id}"),
        "status": "Alive",
        "species": "Human",
        "image": format!("https://example.com/avatar/{id}.jpeg"),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn body(
    ids: std::ops::RangeInclusive<u64>,
    count: u64,
    pages: u64,
    next: Option<String>,
    prev: Option<String>,
) -> Value {
    let results: Vec<Value> = ids.map(character).collect();
    json!({
        "info": { "count": count, "pages": pages, "next": next, "prev": prev },
        "results": results
    })
}
