use serde_json::Value;

/// Pretty-print JSON to stdout. The table view is a rendering aid for the
/// other formats and is left out.
pub fn print_json(value: &Value) {
    let printable = match value {
        Value::Object(map) if map.contains_key("view") => {
            let mut map = map.clone();
            map.remove("view");
            Value::Object(map)
        }
        _ => value.clone(),
    };
    match serde_json::to_string_pretty(&printable) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
