//! Transport Module
//!
//! フィードを取得するHTTPトランスポートの抽象化と、`reqwest`による既定の実装。

use std::future::Future;
use std::time::Duration;

use crate::error::{BoxError, FeedError};
use crate::security::{check_body_len, FeedLimits};

/// トランスポートに渡すリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    /// クエリ文字列を含む完全なURL
    pub url: String,
    /// 追加するヘッダー（名前, 値）
    pub headers: Vec<(String, String)>,
}

impl FeedRequest {
    /// 指定した名前のヘッダー値を取得（大文字小文字を区別しない）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// トランスポートから返るレスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// HTTP GETを発行するトランスポート
///
/// テストや独自のHTTPクライアントを使う場合は、このトレイトを実装して
/// `ClientBuilder::build_with_transport`に渡します。
///
/// # 戻り値
///
/// * `Ok(Some(response))` - レスポンスを受信した場合（ステータスコードに関係なく）
/// * `Ok(None)` - レスポンスがなかった場合
/// * `Err(error)` - 接続失敗などのトランスポート層のエラー（そのまま呼び出し側へ返される）
pub trait Transport: Send + Sync {
    fn get(
        &self,
        request: FeedRequest,
    ) -> impl Future<Output = Result<Option<FeedResponse>, BoxError>> + Send;
}

/// `reqwest`による既定のトランスポート
///
/// 本文は上限サイズを確認しながら読み込みます。`Content-Length`が上限を超える場合は
/// 本文を読まずに、ストリームの途中で上限を超えた場合はその時点で打ち切ります。
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_body_size: usize,
}

impl ReqwestTransport {
    /// タイムアウトとUser-Agentを指定してトランスポートを生成
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FeedError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    /// 既存の`reqwest::Client`を使う
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_body_size: FeedLimits::default().max_body_size,
        }
    }

    /// 読み込む本文の最大サイズを指定する
    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }
}

impl Transport for ReqwestTransport {
    fn get(
        &self,
        request: FeedRequest,
    ) -> impl Future<Output = Result<Option<FeedResponse>, BoxError>> + Send {
        async move {
            let mut builder = self.client.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let mut response = builder.send().await?;
            let status = response.status().as_u16();
            let body = read_body_with_limit(&mut response, self.max_body_size).await?;

            Ok::<_, BoxError>(Some(FeedResponse { status, body }))
        }
    }
}

/// 上限サイズを超えない範囲で本文を読み込む
///
/// 上限超過は`FeedError::SecurityViolation`として返り、`FeedError::transport`で
/// そのまま取り出されます。
async fn read_body_with_limit(
    response: &mut reqwest::Response,
    max_body_size: usize,
) -> Result<Vec<u8>, BoxError> {
    if let Some(content_length) = response.content_length() {
        check_body_len(content_length, max_body_size)?;
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let received = body.len().saturating_add(chunk.len());
        check_body_len(received as u64, max_body_size)?;
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
