use serde_json::{Map, Value};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

pub const RECORD_SUFFIX: &str = "_N1-WSDL.json";
pub const RESHAPED_PREFIX: &str = "modelo-datos-";

/// Splits a record's top-level keys into `control` (the service name),
/// `metadatos` (empty) and `datos` (everything else). Values are untouched.
pub fn reshape(record: Value) -> Value {
    let mut control = Map::new();
    let mut datos = Map::new();

    if let Value::Object(fields) = record {
        for (key, value) in fields {
            if key == "service_name" {
                control.insert(key, value);
            } else {
                datos.insert(key, value);
            }
        }
    }

    let mut reshaped = Map::new();
    reshaped.insert("control".to_owned(), Value::Object(control));
    reshaped.insert("metadatos".to_owned(), Value::Object(Map::new()));
    reshaped.insert("datos".to_owned(), Value::Object(datos));
    Value::Object(reshaped)
}

pub fn record_file_name(service_name: &str) -> String {
    let safe = service_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect::<String>();
    format!("{}{}", safe, RECORD_SUFFIX)
}

/// Writes `value` as indented JSON, creating `directory` if needed, and
/// returns the absolute path written.
pub fn write_json(directory: &Path, file_name: &str, value: &Value) -> io::Result<PathBuf> {
    fs::create_dir_all(directory)?;
    let path = directory.join(file_name);

    let mut file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    writeln!(file)?;

    path.canonicalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reshape_moves_service_name_to_control() {
        let record = json!({
            "service_name": "Calc",
            "messages": [],
            "binding": null,
        });

        assert_eq!(
            reshape(record),
            json!({
                "control": {"service_name": "Calc"},
                "metadatos": {},
                "datos": {"messages": [], "binding": null},
            })
        );
    }

    #[test]
    fn reshape_keeps_key_order() {
        let record = json!({"service_name": "S", "b": 1, "a": 2});
        let reshaped = reshape(record);

        let keys = reshaped["datos"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(record_file_name("Calc"), "Calc_N1-WSDL.json");
        assert_eq!(record_file_name("a/b"), "a_b_N1-WSDL.json");
    }

    #[test]
    fn writes_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("N1-WSDL");

        let path = write_json(&target, "Calc_N1-WSDL.json", &json!({"a": 1})).unwrap();

        assert!(path.is_absolute());
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"a": 1}));
    }
}
