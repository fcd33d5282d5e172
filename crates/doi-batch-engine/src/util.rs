use std::borrow::Cow;

use serde_json::Value;

/// String form of a leaf value used for regex tests and substitutions.
///
/// Strings are taken as-is; every other value uses its compact JSON text.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(2020)), "2020");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(["a", 1])), r#"["a",1]"#);
    }
}
