//! Builder Module
//!
//! Fluent Builder APIを提供し、`Client`インスタンスを段階的に構築する。

use std::time::Duration;

use reqwest::Url;

use crate::api::{CellsOptions, FeedResource, RowsOptions, SpreadsheetOptions};
use crate::error::FeedError;
use crate::feed::{FeedFetcher, FEED_URL};
use crate::grid::Cells;
use crate::parser::{build_row, coerce_to_sequence};
use crate::security::FeedLimits;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Row, Spreadsheet};

/// 既定のUser-Agent
const DEFAULT_USER_AGENT: &str = concat!("gdata-sheets/", env!("CARGO_PKG_VERSION"));

/// クライアントの設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ClientConfig {
    /// フィードのベースURL
    pub feed_url: String,

    /// 既定トランスポートのタイムアウト
    pub timeout: Duration,

    /// 既定トランスポートのUser-Agent
    pub user_agent: String,

    /// レスポンスの制限値
    pub limits: FeedLimits,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limits: FeedLimits::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::time::Duration;
/// use gdata_sheets::ClientBuilder;
///
/// # fn main() -> Result<(), gdata_sheets::FeedError> {
/// let client = ClientBuilder::new()
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    /// 内部設定（構築中）
    config: ClientConfig,
}

impl ClientBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - フィードURL: `https://spreadsheets.google.com/feeds/`
    /// - タイムアウト: 30秒
    /// - 制限値: `FeedLimits::default()`
    pub fn new() -> Self {
        Self::default()
    }

    /// フィードのベースURLを指定する
    ///
    /// 互換サーバーやテスト用サーバーに向ける場合に使用します。末尾は`/`で終わる必要があります。
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.config.feed_url = url.into();
        self
    }

    /// 既定トランスポートのタイムアウトを指定する
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// 既定トランスポートのUser-Agentを指定する
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// レスポンスの制限値を指定する
    pub fn with_limits(mut self, limits: FeedLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// 設定を検証し、`reqwest`トランスポートを使う`Client`を生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `FeedError::Config(String)`: 設定の検証に失敗した場合
    ///   * フィードURLが絶対URLでない、http(s)でない、`/`で終わらない
    ///   * タイムアウトが0
    ///   * HTTPクライアントを生成できない
    pub fn build(self) -> Result<Client<ReqwestTransport>, FeedError> {
        self.validate_timeout()?;
        let transport = ReqwestTransport::new(self.config.timeout, &self.config.user_agent)?
            .with_max_body_size(self.config.limits.max_body_size);
        self.build_with_transport(transport)
    }

    /// 設定を検証し、指定したトランスポートを使う`Client`を生成する
    ///
    /// タイムアウトとUser-Agentはトランスポート側の責務のため、ここでは使用しません。
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>, FeedError> {
        let base_url = self.validate_feed_url()?;
        Ok(Client {
            fetcher: FeedFetcher::new(transport, base_url, self.config.limits),
        })
    }

    fn validate_feed_url(&self) -> Result<Url, FeedError> {
        let url = Url::parse(&self.config.feed_url).map_err(|e| {
            FeedError::Config(format!("Invalid feed URL '{}': {}", self.config.feed_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FeedError::Config(format!(
                "Feed URL must use http or https: '{}'",
                self.config.feed_url
            )));
        }

        if !url.path().ends_with('/') || url.query().is_some() {
            return Err(FeedError::Config(format!(
                "Feed URL must end with '/' and have no query: '{}'",
                self.config.feed_url
            )));
        }

        Ok(url)
    }

    fn validate_timeout(&self) -> Result<(), FeedError> {
        if self.config.timeout.is_zero() {
            return Err(FeedError::Config("Timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// フィード取得のファサード
///
/// スプレッドシート・行・セルの取得を提供するメインエントリーポイントです。
/// 各呼び出しはリクエストを1回だけ発行し、状態を共有しません。
///
/// # 使用例
///
/// ```rust,no_run
/// use gdata_sheets::{ClientBuilder, RowsOptions, SpreadsheetOptions};
///
/// # async fn run() -> Result<(), gdata_sheets::FeedError> {
/// let client = ClientBuilder::new().build()?;
///
/// let sheet = client.spreadsheet(&SpreadsheetOptions::new("0AkD...")).await?;
/// for worksheet in &sheet.worksheets {
///     let rows = worksheet.rows(&client, RowsOptions::default()).await?;
///     println!("{}: {} rows", worksheet.title, rows.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client<T> {
    fetcher: FeedFetcher<T>,
}

impl<T: Transport> Client<T> {
    /// 使用しているトランスポート
    pub fn transport(&self) -> &T {
        self.fetcher.transport()
    }

    /// スプレッドシートのメタデータとワークシート一覧を取得する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Spreadsheet)` - 取得に成功した場合
    /// * `Err(FeedError::Precondition)` - keyが指定されていない場合（通信前に返る）
    /// * `Err(FeedError)` - 通信・解析のエラー
    pub async fn spreadsheet(&self, options: &SpreadsheetOptions) -> Result<Spreadsheet, FeedError> {
        let key = options.require_key()?;
        let auth = options.auth();

        let feed = self
            .fetcher
            .get_feed(FeedResource::Worksheets, &[key], auth, &[])
            .await?;

        let spreadsheet = Spreadsheet::from_feed(key, auth, &feed)?;
        log::trace!(
            "spreadsheet {}: {} worksheets",
            key,
            spreadsheet.worksheets.len()
        );
        Ok(spreadsheet)
    }

    /// リストフィードの行を取得する
    ///
    /// フィードにエントリがなければ空のベクターを返します（エラーにはなりません）。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<Row>)` - フィードのエントリ順の行
    /// * `Err(FeedError::Precondition)` - key / worksheetが指定されていない場合（通信前に返る）
    /// * `Err(FeedError)` - 通信・解析のエラー
    pub async fn rows(&self, options: &RowsOptions) -> Result<Vec<Row>, FeedError> {
        let (key, worksheet) = options.require_target()?;
        let query = options.query();

        let feed = self
            .fetcher
            .get_feed(FeedResource::List, &[key, worksheet], options.auth(), &query)
            .await?;

        let rows = coerce_to_sequence(feed.get("entry"))
            .into_iter()
            .map(build_row)
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("list feed {}/{}: {} rows", key, worksheet, rows.len());
        Ok(rows)
    }

    /// セルフィードのセルを取得する
    ///
    /// フィードにエントリがなければ空の`Cells`を返します（エラーにはなりません）。
    pub async fn cells(&self, options: &CellsOptions) -> Result<Cells, FeedError> {
        let (key, worksheet) = options.require_target()?;
        let query = options.query();

        let feed = self
            .fetcher
            .get_feed(FeedResource::Cells, &[key, worksheet], options.auth(), &query)
            .await?;

        let cells = Cells::from_feed(&feed)?;
        log::trace!("cells feed {}/{}: {} cells", key, worksheet, cells.len());
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder_new() {
        let builder = ClientBuilder::new();
        assert_eq!(builder.config.feed_url, FEED_URL);
        assert_eq!(builder.config.timeout, Duration::from_secs(30));
        assert!(builder.config.user_agent.starts_with("gdata-sheets/"));
        assert_eq!(builder.config.limits, FeedLimits::default());
    }

    #[test]
    fn test_builder_method_chaining() {
        let limits = FeedLimits::new().with_max_depth(8);
        let builder = ClientBuilder::new()
            .with_feed_url("http://localhost:8080/feeds/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent")
            .with_limits(limits);

        assert_eq!(builder.config.feed_url, "http://localhost:8080/feeds/");
        assert_eq!(builder.config.timeout, Duration::from_secs(5));
        assert_eq!(builder.config.user_agent, "test-agent");
        assert_eq!(builder.config.limits.max_depth, 8);
    }

    #[test]
    fn test_build_success() {
        assert!(ClientBuilder::new().build().is_ok());
    }

    #[test]
    fn test_build_with_invalid_feed_url() {
        match ClientBuilder::new().with_feed_url("not a url").build() {
            Err(FeedError::Config(msg)) => assert!(msg.contains("Invalid feed URL")),
            other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_with_non_http_scheme() {
        match ClientBuilder::new().with_feed_url("ftp://example.com/feeds/").build() {
            Err(FeedError::Config(msg)) => assert!(msg.contains("http or https")),
            other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_without_trailing_slash() {
        let result = ClientBuilder::new()
            .with_feed_url("https://example.com/feeds")
            .build();
        assert!(matches!(result, Err(FeedError::Config(_))));
    }

    #[test]
    fn test_build_with_zero_timeout() {
        match ClientBuilder::new().with_timeout(Duration::ZERO).build() {
            Err(FeedError::Config(msg)) => assert!(msg.contains("Timeout")),
            other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
        }
    }
}
