//! Public API Types
//!
//! 公開APIで使用するオプション型と列挙型を定義するモジュール。

use crate::error::FeedError;

/// フィードの公開範囲
///
/// 認証トークンの有無で決まり、フィードURLの最後から2番目のセグメントになります。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Visibility {
    /// 公開されたスプレッドシート（認証なし）
    Public,

    /// 認証済みユーザーのスプレッドシート
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// フィードに含めるフィールドの範囲
///
/// URLの最後のセグメントになります。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Projection {
    /// 値のみ（認証なし）
    Values,

    /// すべてのフィールド（認証あり）
    Full,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::Values => "values",
            Projection::Full => "full",
        }
    }
}

/// 認証トークンの有無から公開範囲とフィールド範囲を選ぶ
pub(crate) fn access_path(auth: Option<&str>) -> (Visibility, Projection) {
    match auth {
        Some(_) => (Visibility::Private, Projection::Full),
        None => (Visibility::Public, Projection::Values),
    }
}

/// 取得対象のフィードの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedResource {
    /// ワークシート一覧（スプレッドシートのメタデータ）
    Worksheets,
    /// 行単位のリストフィード
    List,
    /// セル単位のフィード
    Cells,
}

impl FeedResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedResource::Worksheets => "worksheets",
            FeedResource::List => "list",
            FeedResource::Cells => "cells",
        }
    }
}

/// 空文字列は未指定として扱う
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn require_key(key: &Option<String>) -> Result<&str, FeedError> {
    non_empty(key).ok_or(FeedError::Precondition("Spreadsheet key not provided."))
}

fn require_worksheet(worksheet: &Option<String>) -> Result<&str, FeedError> {
    non_empty(worksheet).ok_or(FeedError::Precondition("Worksheet not specified."))
}

/// 正の数値だけをクエリに含める
fn push_positive(query: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<u32>) {
    if let Some(n) = value.filter(|n| *n > 0) {
        query.push((name, n.to_string()));
    }
}

/// スプレッドシートのメタデータ取得オプション
///
/// # 使用例
///
/// ```rust,no_run
/// use gdata_sheets::SpreadsheetOptions;
///
/// let options = SpreadsheetOptions::new("0AkD...").with_auth("token");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetOptions {
    pub(crate) key: Option<String>,
    pub(crate) auth: Option<String>,
}

impl SpreadsheetOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            auth: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// 認証トークンを指定する（`private/full`のフィードを取得する）
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub(crate) fn require_key(&self) -> Result<&str, FeedError> {
        require_key(&self.key)
    }

    pub(crate) fn auth(&self) -> Option<&str> {
        non_empty(&self.auth)
    }
}

/// 行（リストフィード）の取得オプション
///
/// 各オプションは指定された場合のみクエリパラメータになります。
///
/// | メソッド | クエリパラメータ |
/// | --- | --- |
/// | `with_start` | `start-index` |
/// | `with_num` | `max-results` |
/// | `with_orderby` | `orderby` |
/// | `with_reverse` | `reverse` |
/// | `with_sq` | `sq` |
///
/// # 使用例
///
/// ```rust,no_run
/// use gdata_sheets::RowsOptions;
///
/// let options = RowsOptions::new("0AkD...", "od6")
///     .with_start(1)
///     .with_num(50)
///     .with_orderby("column:name")
///     .with_sq("age > 25");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowsOptions {
    pub(crate) key: Option<String>,
    pub(crate) worksheet: Option<String>,
    pub(crate) auth: Option<String>,
    pub(crate) start: Option<u32>,
    pub(crate) num: Option<u32>,
    pub(crate) orderby: Option<String>,
    pub(crate) reverse: bool,
    pub(crate) sq: Option<String>,
}

impl RowsOptions {
    /// スプレッドシートキーとワークシートIDを指定して生成
    pub fn new(key: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            worksheet: Some(worksheet.into()),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }

    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub(crate) fn with_auth_opt(mut self, auth: Option<String>) -> Self {
        self.auth = auth;
        self
    }

    /// 取得を開始する行（1始まり）
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    /// 取得する最大行数
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    /// 並び替えの列（例: `column:name`）
    pub fn with_orderby(mut self, orderby: impl Into<String>) -> Self {
        self.orderby = Some(orderby.into());
        self
    }

    /// 逆順で取得する
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// 構造化クエリ（例: `age > 25`）
    pub fn with_sq(mut self, sq: impl Into<String>) -> Self {
        self.sq = Some(sq.into());
        self
    }

    pub(crate) fn require_target(&self) -> Result<(&str, &str), FeedError> {
        Ok((require_key(&self.key)?, require_worksheet(&self.worksheet)?))
    }

    pub(crate) fn auth(&self) -> Option<&str> {
        non_empty(&self.auth)
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_positive(&mut query, "start-index", self.start);
        push_positive(&mut query, "max-results", self.num);
        if let Some(orderby) = non_empty(&self.orderby) {
            query.push(("orderby", orderby.to_string()));
        }
        if self.reverse {
            query.push(("reverse", "true".to_string()));
        }
        if let Some(sq) = non_empty(&self.sq) {
            query.push(("sq", sq.to_string()));
        }
        query
    }
}

/// セルフィードの取得オプション
///
/// | メソッド | クエリパラメータ |
/// | --- | --- |
/// | `with_range` | `range` |
/// | `with_max_row` | `max-row` |
/// | `with_min_row` | `min-row` |
/// | `with_max_col` | `max-col` |
/// | `with_min_col` | `min-col` |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellsOptions {
    pub(crate) key: Option<String>,
    pub(crate) worksheet: Option<String>,
    pub(crate) auth: Option<String>,
    pub(crate) range: Option<String>,
    pub(crate) max_row: Option<u32>,
    pub(crate) min_row: Option<u32>,
    pub(crate) max_col: Option<u32>,
    pub(crate) min_col: Option<u32>,
}

impl CellsOptions {
    /// スプレッドシートキーとワークシートIDを指定して生成
    pub fn new(key: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            worksheet: Some(worksheet.into()),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }

    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub(crate) fn with_auth_opt(mut self, auth: Option<String>) -> Self {
        self.auth = auth;
        self
    }

    /// A1形式の範囲（例: `A1:C10`）
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_max_row(mut self, max_row: u32) -> Self {
        self.max_row = Some(max_row);
        self
    }

    pub fn with_min_row(mut self, min_row: u32) -> Self {
        self.min_row = Some(min_row);
        self
    }

    pub fn with_max_col(mut self, max_col: u32) -> Self {
        self.max_col = Some(max_col);
        self
    }

    pub fn with_min_col(mut self, min_col: u32) -> Self {
        self.min_col = Some(min_col);
        self
    }

    pub(crate) fn require_target(&self) -> Result<(&str, &str), FeedError> {
        Ok((require_key(&self.key)?, require_worksheet(&self.worksheet)?))
    }

    pub(crate) fn auth(&self) -> Option<&str> {
        non_empty(&self.auth)
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(range) = non_empty(&self.range) {
            query.push(("range", range.to_string()));
        }
        push_positive(&mut query, "max-row", self.max_row);
        push_positive(&mut query, "min-row", self.min_row);
        push_positive(&mut query, "max-col", self.max_col);
        push_positive(&mut query, "min-col", self.min_col);
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_path() {
        assert_eq!(
            access_path(Some("token")),
            (Visibility::Private, Projection::Full)
        );
        assert_eq!(access_path(None), (Visibility::Public, Projection::Values));
        assert_eq!(Visibility::Private.as_str(), "private");
        assert_eq!(Projection::Values.as_str(), "values");
    }

    #[test]
    fn test_rows_query_mapping() {
        let options = RowsOptions::new("KEY", "od6")
            .with_start(11)
            .with_num(10)
            .with_orderby("column:name")
            .with_reverse(true)
            .with_sq("age > 25");

        assert_eq!(
            options.query(),
            vec![
                ("start-index", "11".to_string()),
                ("max-results", "10".to_string()),
                ("orderby", "column:name".to_string()),
                ("reverse", "true".to_string()),
                ("sq", "age > 25".to_string()),
            ]
        );
    }

    #[test]
    fn test_rows_query_skips_unset_values() {
        let options = RowsOptions::new("KEY", "od6")
            .with_start(0)
            .with_orderby("")
            .with_reverse(false);
        assert!(options.query().is_empty());
    }

    #[test]
    fn test_cells_query_mapping() {
        let options = CellsOptions::new("KEY", "od6")
            .with_range("A1:C3")
            .with_max_row(3)
            .with_min_row(1)
            .with_max_col(3)
            .with_min_col(1);

        assert_eq!(
            options.query(),
            vec![
                ("range", "A1:C3".to_string()),
                ("max-row", "3".to_string()),
                ("min-row", "1".to_string()),
                ("max-col", "3".to_string()),
                ("min-col", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_require_target() {
        assert_eq!(
            RowsOptions::new("KEY", "od6").require_target().unwrap(),
            ("KEY", "od6")
        );

        let missing_key = RowsOptions::default().with_worksheet("od6");
        assert!(matches!(
            missing_key.require_target(),
            Err(FeedError::Precondition("Spreadsheet key not provided."))
        ));

        let missing_worksheet = CellsOptions::default().with_key("KEY");
        assert!(matches!(
            missing_worksheet.require_target(),
            Err(FeedError::Precondition("Worksheet not specified."))
        ));

        let empty_worksheet = CellsOptions::new("KEY", "");
        assert!(empty_worksheet.require_target().is_err());

        assert!(SpreadsheetOptions::default().require_key().is_err());
    }

    #[test]
    fn test_empty_auth_is_treated_as_absent() {
        let options = SpreadsheetOptions::new("KEY").with_auth("");
        assert_eq!(options.auth(), None);
    }
}
