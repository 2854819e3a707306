use serde_json::{Value, json};

pub fn page(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    format!("file://{}", path.display())
}

/// One element record as the scan script reports it.
pub fn scanned(selector: &str, tag: &str, id: Option<&str>, text: Option<&str>, visible: bool) -> Value {
    json!({
        "selector": selector,
        "visible": visible,
        "tag": tag,
        "testId": null,
        "id": id,
        "text": text,
    })
}

pub fn payload(elements: Vec<Value>) -> Value {
    json!({ "elements": elements, "errors": [] })
}
