//! Namespace Normalizer Module
//!
//! リストフィードの1エントリを、ユーザーが見る列名をキーとするフラットな行に変換する。
//!
//! 同じ列データでも、パーサーの設定次第で`gsx:name`（XML版）と`gsx$name`（JSON版）の
//! 2通りの表現で届くため、どちらの形でも同じ結果になるように正規化します。

use serde_json::{Map, Value};

use super::TEXT_KEY;
use crate::error::FeedError;
use crate::types::Row;

/// XML版のカスタム列プレフィックス
const CUSTOM_COLON_PREFIX: &str = "gsx:";

/// JSON版のカスタム列プレフィックス
const CUSTOM_DOLLAR_PREFIX: &str = "gsx$";

/// エントリの`id`フィールド名
const ID_KEY: &str = "id";

/// プレフィックスだけのキーに使うフィールド名（プレフィックスの先頭3文字）
const BARE_PREFIX_NAME: &str = "gsx";

/// エントリのキーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyKind<'a> {
    /// エントリ自身の識別子（`id`）
    Identifier,
    /// `gsx:<列名>`
    CustomColon(&'a str),
    /// `gsx$<列名>`
    CustomDollar(&'a str),
    /// `gsx:`または`gsx$`のみ（列名なし）
    BarePrefix,
    /// 上記以外（`title`、`updated`など）
    Other,
}

/// キーを分類する
pub(crate) fn classify_key(key: &str) -> KeyKind<'_> {
    if key == ID_KEY {
        return KeyKind::Identifier;
    }

    if let Some(suffix) = key.strip_prefix(CUSTOM_COLON_PREFIX) {
        return if suffix.is_empty() {
            KeyKind::BarePrefix
        } else {
            KeyKind::CustomColon(suffix)
        };
    }

    if let Some(suffix) = key.strip_prefix(CUSTOM_DOLLAR_PREFIX) {
        return if suffix.is_empty() {
            KeyKind::BarePrefix
        } else {
            KeyKind::CustomDollar(suffix)
        };
    }

    KeyKind::Other
}

/// フィールドのないオブジェクトを`null`にする
fn null_if_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.is_empty() => Value::Null,
        other => other.clone(),
    }
}

/// `$t`にスカラー値があればそれを取り出す
fn text_member(value: &Value) -> Option<&Value> {
    match value.get(TEXT_KEY)? {
        scalar @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => Some(scalar),
        _ => None,
    }
}

/// スカラー値が値を持つか（空文字列・0・`false`は持たない）
fn has_value(scalar: &Value) -> bool {
    match scalar {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::Bool(b) => *b,
        _ => false,
    }
}

/// 1つのキーと値を正規化する
///
/// # 戻り値
///
/// * `Some((name, value))` - 行に格納するフィールド名と値
/// * `None` - 行に含めないフィールド
pub(crate) fn normalize_field(key: &str, value: &Value) -> Option<(String, Value)> {
    match classify_key(key) {
        KeyKind::Identifier => Some((key.to_string(), value.clone())),
        KeyKind::CustomColon(name) => Some((name.to_string(), null_if_empty(value))),
        KeyKind::CustomDollar(name) => {
            let value = match null_if_empty(value) {
                Value::Null => Value::Null,
                node => text_member(&node).cloned().unwrap_or(node),
            };
            Some((name.to_string(), value))
        }
        KeyKind::BarePrefix => Some((BARE_PREFIX_NAME.to_string(), null_if_empty(value))),
        // 値のないテキストは`null`にせずフィールドごと落とす
        KeyKind::Other => text_member(value)
            .filter(|scalar| has_value(scalar))
            .map(|scalar| (key.to_string(), scalar.clone())),
    }
}

/// リストフィードの1エントリから行を構築する
pub(crate) fn build_row(entry: &Value) -> Result<Row, FeedError> {
    let fields = entry.as_object().ok_or_else(|| {
        FeedError::MalformedFeed("list entry is not an element with fields".to_string())
    })?;

    let mut row = Map::new();
    for (key, value) in fields {
        if let Some((name, value)) = normalize_field(key, value) {
            row.insert(name, value);
        }
    }

    Ok(Row::from_fields(row))
}
