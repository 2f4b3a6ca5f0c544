use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            },
            "challenges": {
                "type": "object",
                "properties": {
                    "source_dirs": { "type": "array", "items": { "type": "string" } },
                    "hint_dir": { "type": "string" }
                }
            },
            "tracker": {
                "type": "object",
                "properties": {
                    "backend": { "type": "string", "enum": ["memory", "sqlite"] },
                    "db_path": { "type": "string" }
                }
            },
            "debug_commands": {
                "type": "object",
                "properties": {
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "allowlist": {
                        "type": "object",
                        "propertyNames": { "pattern": "^[A-Za-z0-9_-]+$" },
                        "additionalProperties": { "$ref": "#/$defs/command" }
                    }
                }
            }
        },
        "$defs": {
            "command": {
                "type": "object",
                "required": ["executable"],
                "properties": {
                    "executable": { "type": "string", "minLength": 1 },
                    "args": { "type": "array", "items": { "type": "string" } }
                }
            }
        }
    })
});
