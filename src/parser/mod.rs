//! Parser Module
//!
//! フィードXMLのツリー化と、ツリーからドメインモデルへの変換に使う共通処理。

mod normalize;
mod tree;

use serde_json::Value;

use crate::error::FeedError;

pub(crate) use normalize::build_row;
pub(crate) use tree::{into_root, parse_document};

/// 要素自身のテキストを格納するキー
pub(crate) const CHAR_KEY: &str = "_";

/// 要素の属性を格納するキー
pub(crate) const ATTR_KEY: &str = "$";

/// `gsx$`形式（JSON版フィード）でテキストを格納するキー
pub(crate) const TEXT_KEY: &str = "$t";

/// 単一要素と配列の揺れを吸収し、常にスライスとして扱えるようにする
///
/// フィールドが存在しない（または`null`の）場合は空になります。
pub(crate) fn coerce_to_sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// ノードのテキストを取り出す
///
/// 文字列ならそのまま、オブジェクトなら`"_"`または`"$t"`の値を返します。
/// テキストを持たないオブジェクトは空文字列として扱います。
pub(crate) fn text_of(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => match map.get(CHAR_KEY).or_else(|| map.get(TEXT_KEY)) {
            Some(inner) => text_of(inner),
            None => Some(String::new()),
        },
        _ => None,
    }
}

/// 必須フィールドのテキストを取り出す
pub(crate) fn required_text(parent: &Value, field: &str, context: &str) -> Result<String, FeedError> {
    parent
        .get(field)
        .and_then(text_of)
        .ok_or_else(|| FeedError::MalformedFeed(format!("{} has no <{}>", context, field)))
}

/// 任意フィールドのテキストを取り出す（欠落時は空文字列）
pub(crate) fn optional_text(parent: &Value, field: &str) -> String {
    parent.get(field).and_then(text_of).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_to_sequence() {
        let single = json!({"id": "a"});
        assert_eq!(coerce_to_sequence(Some(&single)), vec![&single]);

        let many = json!([{"id": "a"}, {"id": "b"}]);
        assert_eq!(coerce_to_sequence(Some(&many)).len(), 2);

        assert!(coerce_to_sequence(None).is_empty());
        assert!(coerce_to_sequence(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_text_of() {
        assert_eq!(text_of(&json!("plain")), Some("plain".to_string()));
        assert_eq!(
            text_of(&json!({"$": {"type": "text"}, "_": "Budget"})),
            Some("Budget".to_string())
        );
        assert_eq!(text_of(&json!({"$t": "Budget"})), Some("Budget".to_string()));
        assert_eq!(text_of(&json!({})), Some(String::new()));
        assert_eq!(text_of(&json!(12)), Some("12".to_string()));
        assert_eq!(text_of(&json!([1, 2])), None);
    }

    #[test]
    fn test_required_and_optional_text() {
        let entry = json!({"title": "Sheet1"});
        assert_eq!(required_text(&entry, "title", "entry").unwrap(), "Sheet1");
        assert!(matches!(
            required_text(&entry, "id", "worksheet entry"),
            Err(FeedError::MalformedFeed(msg)) if msg == "worksheet entry has no <id>"
        ));
        assert_eq!(optional_text(&entry, "updated"), "");
    }
}
