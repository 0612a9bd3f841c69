//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// トランスポート層から受け取るエラーの型
///
/// ネットワーク障害やDNS解決失敗など、HTTPクライアント固有のエラーを
/// 変換せずにそのまま保持するために使用します。
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// gdata-sheetsクレート全体で使用するエラー型
///
/// フィードの取得、XMLの解析、ドメインモデルへの変換中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Precondition`: 必須パラメータ（key / worksheet）の欠落。通信前に返される
/// - `Transport` / `MissingResponse`: トランスポート層の失敗
/// - `Auth` / `Http`: サーバーがエラーステータスを返した
/// - `Xml` / `Utf8` / `MalformedFeed`: レスポンス本文を解釈できない
/// - `Config` / `SecurityViolation`: クライアント設定と制限値
///
/// # 使用例
///
/// ```rust,no_run
/// use gdata_sheets::{ClientBuilder, FeedError, RowsOptions};
///
/// # async fn run() -> Result<(), FeedError> {
/// let client = ClientBuilder::new().build()?;
/// match client.rows(&RowsOptions::new("KEY", "od6")).await {
///     Err(FeedError::Auth) => eprintln!("token rejected"),
///     Err(e) => return Err(e),
///     Ok(rows) => println!("{} rows", rows.len()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum FeedError {
    /// 呼び出しの前提条件違反
    ///
    /// スプレッドシートキーやワークシートIDが指定されていない場合に発生します。
    /// 実行時の状態ではなく呼び出し側の誤りを示すため、トランスポートを
    /// 呼び出す前に返されます。
    #[error("Invalid arguments: {0}")]
    Precondition(&'static str),

    /// トランスポート層のエラー
    ///
    /// 接続失敗、DNS解決失敗、タイムアウトなど。元のエラーは`source()`で取得できます。
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// トランスポートがレスポンスを返さなかった
    #[error("Missing response.")]
    MissingResponse,

    /// HTTP 401（認証トークンが無効、または必要なのに指定されていない）
    #[error("Invalid authorization key.")]
    Auth,

    /// 401以外のHTTPエラー（400以上）
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use gdata_sheets::FeedError;
    ///
    /// let error = FeedError::Http {
    ///     status: 500,
    ///     reason: "Internal Server Error".to_string(),
    /// };
    /// // 出力: "HTTP error 500: Internal Server Error"
    /// println!("{}", error);
    /// ```
    #[error("HTTP error {status}: {reason}")]
    Http {
        /// HTTPステータスコード
        status: u16,
        /// ステータスコードに対応する理由句
        reason: String,
    },

    /// XMLの解析エラー（quick-xml由来）
    ///
    /// `#[from]`属性により、`quick_xml::Error`から自動的に変換されます。
    #[error("Failed to parse feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// フィードの構造が期待と異なる
    ///
    /// `feed`ルート要素がない、ワークシートエントリに`id`がないなど、
    /// モデル構築に必要なフィールドが欠けている場合に発生します。
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ClientBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 制限値に違反したエラー
    ///
    /// レスポンス本文のサイズやXMLのネストの深さが上限を超えた場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl FeedError {
    /// トランスポート層のエラーをラップする
    ///
    /// トランスポートが`FeedError`自体を返した場合（本文サイズの上限超過など）は、
    /// ラップせずにそのまま返します。
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        match error.into().downcast::<FeedError>() {
            Ok(error) => *error,
            Err(error) => FeedError::Transport(error),
        }
    }
}
