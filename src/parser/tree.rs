//! XML Tree Module
//!
//! フィードのXML文書を、キーと値のネスト構造（`serde_json::Value`）へ変換するモジュール。
//!
//! 生成されるツリーの形:
//!
//! - 属性も子要素も持たない要素は、そのテキスト（文字列）になる。テキストもなければ空オブジェクト
//! - テキストは前後の空白を含めてそのまま保持する。空白だけのテキスト（要素間の改行や
//!   インデント）はテキストなしとして扱う。ただしCDATAは空白だけでも保持する
//! - それ以外はオブジェクトになり、属性は`"$"`、自身のテキストは`"_"`、子要素は修飾名
//!   （例: `gsx:name`）をキーとして格納される
//! - 同じ親の下で同じ名前の子要素が複数ある場合だけ配列になる（単一要素は配列に包まない）

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::{ATTR_KEY, CHAR_KEY};
use crate::error::FeedError;
use crate::security::{check_depth, FeedLimits};

/// 解析途中の要素
struct Frame {
    name: String,
    attrs: Map<String, Value>,
    text: String,
    cdata: bool,
    children: Map<String, Value>,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, FeedError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();

        let mut attrs = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attrs.insert(key, Value::String(value));
        }

        Ok(Self {
            name,
            attrs,
            text: String::new(),
            cdata: false,
            children: Map::new(),
        })
    }

    /// 要素を閉じてツリーのノードに変換
    fn close(mut self) -> (String, Value) {
        if !self.cdata && self.text.chars().all(char::is_whitespace) {
            self.text.clear();
        }

        if self.attrs.is_empty() && self.children.is_empty() {
            let node = if self.text.is_empty() {
                Value::Object(Map::new())
            } else {
                Value::String(self.text)
            };
            return (self.name, node);
        }

        let mut node = self.children;
        if !self.attrs.is_empty() {
            node.insert(ATTR_KEY.to_string(), Value::Object(self.attrs));
        }
        if !self.text.is_empty() {
            node.insert(CHAR_KEY.to_string(), Value::String(self.text));
        }
        (self.name, Value::Object(node))
    }
}

/// 子要素を追加する。同名の要素が既にあれば配列にまとめる
fn insert_child(children: &mut Map<String, Value>, name: String, node: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(node),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, node]);
        }
        None => {
            children.insert(name, node);
        }
    }
}

/// XML文書をツリーに変換する
///
/// # 引数
///
/// * `xml` - レスポンス本文
/// * `limits` - ネスト深さの上限
///
/// # 戻り値
///
/// * `Ok(Value)` - ルート要素名をただ1つのキーとするオブジェクト
/// * `Err(FeedError)` - XMLが不正、または制限値を超えた場合
pub(crate) fn parse_document(xml: &[u8], limits: &FeedLimits) -> Result<Value, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                check_depth(stack.len() + 1, limits)?;
                stack.push(Frame::open(&e)?);
            }
            Event::Empty(e) => {
                check_depth(stack.len() + 1, limits)?;
                let (name, node) = Frame::open(&e)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, node),
                    None => root = Some((name, node)),
                }
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(std::str::from_utf8(&e)?);
                    frame.cdata = true;
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    FeedError::MalformedFeed("unbalanced closing tag".to_string())
                })?;
                let (name, node) = frame.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, node),
                    None => root = Some((name, node)),
                }
            }
            Event::Eof => break,
            // 宣言・コメント・処理命令・DOCTYPEは無視
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(FeedError::MalformedFeed(
            "unexpected end of document".to_string(),
        ));
    }

    let (name, node) =
        root.ok_or_else(|| FeedError::MalformedFeed("document has no root element".to_string()))?;
    let mut document = Map::new();
    document.insert(name, node);
    Ok(Value::Object(document))
}

/// ツリーから指定したルート要素を取り出す
pub(crate) fn into_root(document: Value, name: &str) -> Result<Value, FeedError> {
    match document {
        Value::Object(mut map) => match map.remove(name) {
            Some(root @ Value::Object(_)) => Ok(root),
            Some(_) => Err(FeedError::MalformedFeed(format!(
                "<{}> root element has no fields",
                name
            ))),
            None => Err(FeedError::MalformedFeed(format!(
                "expected <{}> root element",
                name
            ))),
        },
        _ => Err(FeedError::MalformedFeed(format!(
            "expected <{}> root element",
            name
        ))),
    }
}
