//! Tests for the JSON shapes consumed by the vim plugin.

use std::fs;
use std::path::PathBuf;

use pyoutline::bridge::VimBridge;
use tempfile::TempDir;

fn write_module(temp: &TempDir, source: &str) -> PathBuf {
    let path = temp.path().join("module.py");
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_document_top_level_keys() {
    let temp = TempDir::new().unwrap();
    let path = write_module(&temp, "import os\n\ndef main():\n    pass\n");

    let bridge = VimBridge::new(None, Some(path));
    let document = bridge.analyze_current_file().unwrap();
    let json = serde_json::to_value(&document).unwrap();

    let object = json.as_object().unwrap();
    for key in ["file", "errors", "definitions", "imports", "complexity"] {
        assert!(object.contains_key(key), "missing top-level key {}", key);
    }
    assert!(json["file"].as_str().unwrap().ends_with("module.py"));
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_definition_json_fields() {
    let temp = TempDir::new().unwrap();
    let path = write_module(
        &temp,
        "def add(a, b) -> int:\n    \"\"\"Add.\"\"\"\n    return a + b\n\nclass C:\n    def m(self):\n        pass\n",
    );

    let bridge = VimBridge::new(None, Some(path));
    let document = bridge.analyze_current_file().unwrap();
    let json = serde_json::to_value(&document).unwrap();
    let definitions = json["definitions"].as_array().unwrap();
    assert_eq!(definitions.len(), 3);

    let function = &definitions[0];
    assert_eq!(function["kind"], "function");
    assert_eq!(function["name"], "add");
    assert_eq!(function["line"], 1);
    assert_eq!(function["docstring"], "Add.");
    assert_eq!(function["args"].as_array().unwrap().len(), 2);
    assert_eq!(function["returns"], "int");
    assert!(function.get("methods").is_none());

    let class = &definitions[1];
    assert_eq!(class["kind"], "class");
    assert_eq!(class["name"], "C");
    assert!(class.get("args").is_none());
    let methods = class["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["name"], "m");
    assert_eq!(methods[0]["is_private"], false);

    // the method also appears flat, with self filtered from its args
    let flat_method = &definitions[2];
    assert_eq!(flat_method["kind"], "function");
    assert_eq!(flat_method["name"], "m");
    assert_eq!(flat_method["args"].as_array().unwrap().len(), 0);
}

#[test]
fn test_import_json_shapes() {
    let temp = TempDir::new().unwrap();
    let path = write_module(
        &temp,
        "import os.path as p\nfrom collections import OrderedDict, defaultdict\n",
    );

    let bridge = VimBridge::new(None, Some(path));
    let document = bridge.analyze_current_file().unwrap();
    let json = serde_json::to_value(&document).unwrap();
    let imports = json["imports"].as_array().unwrap();
    assert_eq!(imports.len(), 2);

    assert_eq!(imports[0]["kind"], "import");
    assert_eq!(imports[0]["module"], "os.path");
    assert_eq!(imports[0]["alias"], "p");

    assert_eq!(imports[1]["kind"], "from_import");
    assert_eq!(imports[1]["module"], "collections");
    assert_eq!(
        imports[1]["names"],
        serde_json::json!(["OrderedDict", "defaultdict"])
    );
    assert_eq!(imports[1]["alias"]["OrderedDict"], serde_json::Value::Null);
    assert_eq!(imports[1]["alias"]["defaultdict"], serde_json::Value::Null);
}

#[test]
fn test_complexity_json_fields() {
    let temp = TempDir::new().unwrap();
    let path = write_module(&temp, "import os\n\ndef f():\n    pass\n");

    let bridge = VimBridge::new(None, Some(path));
    let document = bridge.analyze_current_file().unwrap();
    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["complexity"]["function_count"], 1);
    assert_eq!(json["complexity"]["class_count"], 0);
    assert_eq!(json["complexity"]["import_count"], 1);
}

#[test]
fn test_document_for_broken_file() {
    let temp = TempDir::new().unwrap();
    let path = write_module(&temp, "def broken(:\n    pass\n");

    let bridge = VimBridge::new(None, Some(path));
    let document = bridge.analyze_current_file().unwrap();
    let json = serde_json::to_value(&document).unwrap();

    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["kind"], "syntax_error");
    assert!(errors[0]["line"].as_u64().unwrap() >= 1);
    assert!(errors[0]["filename"].as_str().unwrap().ends_with("module.py"));

    assert_eq!(json["definitions"].as_array().unwrap().len(), 0);
    assert_eq!(json["imports"].as_array().unwrap().len(), 0);
    assert_eq!(json["complexity"]["function_count"], 0);
}

#[test]
fn test_quickfix_json_shape() {
    let temp = TempDir::new().unwrap();
    let path = write_module(
        &temp,
        "class Shape:\n    def area(self):\n        pass\n\ndef free():\n    pass\n",
    );

    let bridge = VimBridge::new(None, Some(path));
    let entries = bridge.quickfix_entries().unwrap();
    let json = serde_json::to_value(&entries).unwrap();
    let array = json.as_array().unwrap();

    // class + its method + flat method entry + free function
    assert_eq!(array.len(), 4);
    assert_eq!(array[0]["text"], "Class: Shape");
    assert_eq!(array[0]["lnum"], 1);
    assert_eq!(array[1]["text"], "Method: area in Shape");
    assert_eq!(array[1]["lnum"], 2);
    assert_eq!(array[2]["text"], "Function: area");
    assert_eq!(array[3]["text"], "Function: free");
    assert_eq!(array[3]["lnum"], 5);

    for entry in array {
        let object = entry.as_object().unwrap();
        assert!(object.contains_key("filename"));
        assert!(object.contains_key("lnum"));
        assert!(object.contains_key("text"));
    }

    // compact serialization for the editor
    let compact = serde_json::to_string(&entries).unwrap();
    assert!(compact.starts_with("[{"));
    assert!(!compact.contains('\n'));
}
