//! Grid Module
//!
//! セルフィードのエントリを、(行, 列)をキーとするスパースな2次元マッピングへ変換するモジュール。

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::FeedError;
use crate::parser::{coerce_to_sequence, text_of, ATTR_KEY, CHAR_KEY};

/// 1つのセル
///
/// `row`と`col`はフィードの属性値（1始まり）をそのまま保持します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub row: String,
    pub col: String,
    /// セルの値（テキストがなければ空文字列）
    pub value: String,
}

/// スパースなセルグリッド
///
/// `cells[row][col]`の形でセルを保持します。フィードに存在しないセルは
/// キー自体が存在しません（`null`のエントリは作りません）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cells {
    cells: BTreeMap<String, BTreeMap<String, Cell>>,
}

impl Cells {
    /// 空のグリッドを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// セルフィードのルートからグリッドを構築する
    ///
    /// `entry`が単一要素でも配列でも扱えます。`entry`がなければ空のグリッドを返します。
    /// 同じ座標が繰り返された場合は後のエントリが優先されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Cells)` - 構築に成功した場合
    /// * `Err(FeedError::MalformedFeed)` - エントリに`gs:cell`や行・列の属性がない場合
    pub(crate) fn from_feed(feed: &Value) -> Result<Self, FeedError> {
        let mut grid = Cells::new();

        for entry in coerce_to_sequence(feed.get("entry")) {
            let cell = entry.get("gs:cell").ok_or_else(|| {
                FeedError::MalformedFeed("cell entry has no <gs:cell>".to_string())
            })?;
            let attrs = cell.get(ATTR_KEY).ok_or_else(|| {
                FeedError::MalformedFeed("<gs:cell> has no attributes".to_string())
            })?;

            let row = coordinate(attrs, "row")?;
            let col = coordinate(attrs, "col")?;
            let value = cell.get(CHAR_KEY).and_then(text_of).unwrap_or_default();

            grid.insert(Cell { row, col, value });
        }

        Ok(grid)
    }

    fn insert(&mut self, cell: Cell) {
        self.cells
            .entry(cell.row.clone())
            .or_default()
            .insert(cell.col.clone(), cell);
    }

    /// 座標でセルを取得
    pub fn get(&self, row: &str, col: &str) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    /// 1行分のセルを取得
    pub fn row(&self, row: &str) -> Option<&BTreeMap<String, Cell>> {
        self.cells.get(row)
    }

    /// 行ごとのセルを列挙する
    pub fn rows(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Cell>)> {
        self.cells.iter()
    }

    /// セルの総数
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn coordinate(attrs: &Value, name: &str) -> Result<String, FeedError> {
    attrs
        .get(name)
        .and_then(text_of)
        .ok_or_else(|| FeedError::MalformedFeed(format!("<gs:cell> has no {} attribute", name)))
}
