//! Types Module
//!
//! フィードから構築されるドメインモデル（スプレッドシート、ワークシート、行）を定義するモジュール。

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::{CellsOptions, RowsOptions};
use crate::builder::Client;
use crate::error::FeedError;
use crate::grid::Cells;
use crate::parser::{coerce_to_sequence, optional_text, required_text};
use crate::transport::Transport;

/// リストフィードの1行
///
/// 列名からスカラー値（文字列または`null`）へのフラットなマッピングです。
/// エントリ自身の識別子は`id`フィールドにそのまま保持されます。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    pub(crate) fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 列名で値を取得
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// 列の値を文字列として取得（`null`や未定義の列は`None`）
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// エントリの識別子
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 列名と値の組を列挙する（順序は保証しない）
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// 内部のマッピングを取り出す
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

/// スプレッドシートの作成者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// ワークシートが属するスプレッドシートを指す値
///
/// ワークシートからの行・セル取得は、常にこの（key, auth）とワークシートIDの
/// 組で範囲指定されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetScope {
    pub key: String,
    pub auth: Option<String>,
}

/// スプレッドシートのメタデータ
///
/// ワークシートフィードから構築されます。`worksheets`はフィードのエントリ順です。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spreadsheet {
    pub key: String,
    #[serde(skip)]
    pub auth: Option<String>,
    pub title: String,
    /// 更新日時（フィードの文字列をそのまま保持）
    pub updated: String,
    pub author: Author,
    pub worksheets: Vec<Worksheet>,
}

impl Spreadsheet {
    /// ワークシートフィードのルートからスプレッドシートを構築する
    ///
    /// # 引数
    ///
    /// * `key` - スプレッドシートキー
    /// * `auth` - 認証トークン（ワークシートからの取得に引き継がれる）
    /// * `feed` - `<feed>`要素のツリー
    ///
    /// # 戻り値
    ///
    /// * `Ok(Spreadsheet)` - 構築に成功した場合
    /// * `Err(FeedError::MalformedFeed)` - `title`やエントリの`id`が欠けている場合
    pub(crate) fn from_feed(
        key: &str,
        auth: Option<&str>,
        feed: &Value,
    ) -> Result<Self, FeedError> {
        let title = required_text(feed, "title", "worksheets feed")?;
        let updated = optional_text(feed, "updated");

        // 作成者が複数いる場合は先頭のみ
        let author = coerce_to_sequence(feed.get("author"))
            .first()
            .map(|node| Author {
                name: optional_text(node, "name"),
                email: optional_text(node, "email"),
            })
            .unwrap_or_default();

        let scope = SheetScope {
            key: key.to_string(),
            auth: auth.map(str::to_string),
        };
        let worksheets = coerce_to_sequence(feed.get("entry"))
            .into_iter()
            .map(|entry| Worksheet::from_entry(scope.clone(), entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            key: scope.key,
            auth: scope.auth,
            title,
            updated,
            author,
            worksheets,
        })
    }

    /// `updated`をRFC 3339の日時として解釈する
    ///
    /// 保持している文字列は変更しません。解釈できなければ`None`を返します。
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.updated).ok()
    }

    /// タイトルでワークシートを検索
    pub fn worksheet(&self, title: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.title == title)
    }
}

/// ワークシートのメタデータ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worksheet {
    /// エントリ識別子URLの最後のセグメント
    pub id: String,
    pub title: String,
    /// 行数（フィードの値をそのまま保持）
    pub row_count: String,
    /// 列数（フィードの値をそのまま保持）
    pub col_count: String,
    #[serde(skip)]
    scope: SheetScope,
}

impl Worksheet {
    pub(crate) fn from_entry(scope: SheetScope, entry: &Value) -> Result<Self, FeedError> {
        let full_id = required_text(entry, "id", "worksheet entry")?;
        let id = worksheet_id(&full_id).to_string();

        Ok(Self {
            id,
            title: required_text(entry, "title", "worksheet entry")?,
            row_count: optional_text(entry, "gs:rowCount"),
            col_count: optional_text(entry, "gs:colCount"),
            scope,
        })
    }

    /// このワークシートが属するスプレッドシート
    pub fn scope(&self) -> &SheetScope {
        &self.scope
    }

    /// このワークシートの行を取得する
    ///
    /// `options`のkey・auth・worksheetは、このワークシートの値で上書きされます。
    pub async fn rows<T: Transport>(
        &self,
        client: &Client<T>,
        options: RowsOptions,
    ) -> Result<Vec<Row>, FeedError> {
        let options = options
            .with_key(self.scope.key.clone())
            .with_worksheet(self.id.clone())
            .with_auth_opt(self.scope.auth.clone());
        client.rows(&options).await
    }

    /// このワークシートのセルを取得する
    pub async fn cells<T: Transport>(
        &self,
        client: &Client<T>,
        options: CellsOptions,
    ) -> Result<Cells, FeedError> {
        let options = options
            .with_key(self.scope.key.clone())
            .with_worksheet(self.id.clone())
            .with_auth_opt(self.scope.auth.clone());
        client.cells(&options).await
    }
}

/// 識別子URLの最後の`/`以降をワークシートIDとする
fn worksheet_id(full_id: &str) -> &str {
    full_id.rsplit('/').next().unwrap_or(full_id)
}
