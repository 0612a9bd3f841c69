//! Feed Fetcher Module
//!
//! フィードURLの組み立て、トランスポートの呼び出し、ステータスコードの判定、
//! XMLのツリー化までを行い、`<feed>`ルートを返すモジュール。

use reqwest::{StatusCode, Url};
use serde_json::Value;

use crate::api::{access_path, FeedResource};
use crate::error::FeedError;
use crate::parser::{into_root, parse_document};
use crate::security::{check_body_size, FeedLimits};
use crate::transport::{FeedRequest, Transport};

/// 既定のフィードURL
pub const FEED_URL: &str = "https://spreadsheets.google.com/feeds/";

/// 認証ヘッダーの値の接頭辞
const AUTH_SCHEME: &str = "GoogleLogin auth=";

/// フィードの取得を担当する
#[derive(Debug, Clone)]
pub(crate) struct FeedFetcher<T> {
    transport: T,
    base_url: Url,
    limits: FeedLimits,
}

impl<T: Transport> FeedFetcher<T> {
    pub fn new(transport: T, base_url: Url, limits: FeedLimits) -> Self {
        Self {
            transport,
            base_url,
            limits,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// フィードURLを組み立てる
    ///
    /// `{base}/{resource}/{segments...}/{visibility}/{projection}[?query]`
    ///
    /// 公開範囲とフィールド範囲は常に最後の2セグメントになり、
    /// クエリは空でない場合のみ付加されます。
    pub fn feed_url(
        &self,
        resource: FeedResource,
        segments: &[&str],
        auth: Option<&str>,
        query: &[(&'static str, String)],
    ) -> Result<Url, FeedError> {
        let (visibility, projection) = access_path(auth);

        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                FeedError::Config(format!("Feed URL cannot be a base: {}", self.base_url))
            })?;
            path.pop_if_empty()
                .push(resource.as_str())
                .extend(segments)
                .push(visibility.as_str())
                .push(projection.as_str());
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    /// フィードを取得し、`<feed>`ルートのツリーを返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(Value)` - `<feed>`要素のツリー
    /// * `Err(FeedError::Transport)` - トランスポートのエラー（変換せずに返す）
    /// * `Err(FeedError::SecurityViolation)` - 本文が上限サイズを超えた場合
    /// * `Err(FeedError::MissingResponse)` - レスポンスがなかった場合
    /// * `Err(FeedError::Auth)` - HTTP 401
    /// * `Err(FeedError::Http)` - 401以外の400以上のステータス
    /// * `Err(FeedError::Xml)` など - 本文を解釈できなかった場合
    pub async fn get_feed(
        &self,
        resource: FeedResource,
        segments: &[&str],
        auth: Option<&str>,
        query: &[(&'static str, String)],
    ) -> Result<Value, FeedError> {
        let url = self.feed_url(resource, segments, auth, query)?;
        log::debug!("GET {}", url);

        let mut headers = Vec::new();
        if let Some(token) = auth {
            headers.push(("Authorization".to_string(), format!("{}{}", AUTH_SCHEME, token)));
        }

        let request = FeedRequest {
            url: url.into(),
            headers,
        };
        let response = self
            .transport
            .get(request)
            .await
            .map_err(FeedError::transport)?
            .ok_or(FeedError::MissingResponse)?;

        check_status(response.status)?;
        check_body_size(&response.body, &self.limits)?;

        let document = parse_document(&response.body, &self.limits)?;
        into_root(document, "feed")
    }
}

/// ステータスコードを判定する
fn check_status(status: u16) -> Result<(), FeedError> {
    if status == 401 {
        log::warn!("feed request rejected: invalid authorization key");
        return Err(FeedError::Auth);
    }

    if status >= 400 {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        log::warn!("feed request failed: HTTP {} {}", status, reason);
        return Err(FeedError::Http { status, reason });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::transport::FeedResponse;
    use std::future::Future;

    /// URL組み立てのテスト用（呼び出されるとエラーを返す）
    struct NoTransport;

    impl Transport for NoTransport {
        fn get(
            &self,
            _request: FeedRequest,
        ) -> impl Future<Output = Result<Option<FeedResponse>, BoxError>> + Send {
            std::future::ready(Err("transport must not be called".into()))
        }
    }

    fn fetcher() -> FeedFetcher<NoTransport> {
        FeedFetcher::new(
            NoTransport,
            Url::parse(FEED_URL).unwrap(),
            FeedLimits::default(),
        )
    }

    #[test]
    fn test_public_url() {
        let url = fetcher()
            .feed_url(FeedResource::Worksheets, &["KEY"], None, &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://spreadsheets.google.com/feeds/worksheets/KEY/public/values"
        );
    }

    #[test]
    fn test_private_url_with_query() {
        let query = vec![
            ("start-index", "2".to_string()),
            ("sq", "age > 25".to_string()),
        ];
        let url = fetcher()
            .feed_url(FeedResource::List, &["KEY", "od6"], Some("token"), &query)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://spreadsheets.google.com/feeds/list/KEY/od6/private/full?start-index=2&sq=age+%3E+25"
        );
    }

    #[test]
    fn test_empty_query_has_no_question_mark() {
        let url = fetcher()
            .feed_url(FeedResource::Cells, &["KEY", "od6"], None, &[])
            .unwrap();
        assert!(url.query().is_none());
        assert!(!url.as_str().contains('?'));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(304).is_ok());
        assert!(matches!(check_status(401), Err(FeedError::Auth)));

        match check_status(500) {
            Err(FeedError::Http { status, reason }) => {
                assert_eq!(status, 500);
                assert_eq!(reason, "Internal Server Error");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }

        match check_status(403) {
            Err(e @ FeedError::Http { .. }) => {
                assert_eq!(e.to_string(), "HTTP error 403: Forbidden");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }
}
