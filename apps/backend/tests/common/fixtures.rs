//! Request bodies for API tests.

use serde_json::json;

/// Create a user register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create a card request body.
pub fn create_card_request(question: &str, answer: &str) -> serde_json::Value {
    json!({ "question": question, "answer": answer })
}

/// Create an answer request body.
pub fn answer_request(is_correct: bool) -> serde_json::Value {
    json!({ "is_correct": is_correct })
}

/// Create a hero bonus request body.
pub fn bonus_request(kind: &str, amount: f64, coins_drop: u32) -> serde_json::Value {
    json!({ "type": kind, "amount": amount, "coins_drop": coins_drop })
}

/// Create an equip request body.
pub fn equip_request(equipped: bool) -> serde_json::Value {
    json!({ "equipped": equipped })
}
