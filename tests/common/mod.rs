//! Shared helpers for the integration tests: fixture loading and a recording transport.

#![allow(dead_code)]

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use gdata_sheets::{BoxError, Client, ClientBuilder, FeedRequest, FeedResponse, Transport};

/// テストフィクスチャを読み込む
pub fn fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// モックトランスポートの応答
#[derive(Debug, Clone)]
pub enum Reply {
    /// ステータスコードと本文を返す
    Response(u16, String),
    /// レスポンスなし
    NoResponse,
    /// 接続エラー
    ConnectionRefused,
}

/// 受け取ったリクエストを記録し、決められた応答を返すトランスポート
#[derive(Debug, Clone)]
pub struct MockTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<FeedRequest>>>,
}

impl MockTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(Reply::Response(200, body.into()))
    }

    pub fn status(status: u16) -> Self {
        Self::new(Reply::Response(status, String::new()))
    }

    pub fn requests(&self) -> Vec<FeedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> FeedRequest {
        self.requests()
            .pop()
            .expect("transport was never called")
    }
}

impl Transport for MockTransport {
    fn get(
        &self,
        request: FeedRequest,
    ) -> impl Future<Output = Result<Option<FeedResponse>, BoxError>> + Send {
        self.requests.lock().unwrap().push(request);

        let result: Result<Option<FeedResponse>, BoxError> = match &self.reply {
            Reply::Response(status, body) => Ok(Some(FeedResponse {
                status: *status,
                body: body.clone().into_bytes(),
            })),
            Reply::NoResponse => Ok(None),
            Reply::ConnectionRefused => Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        };
        std::future::ready(result)
    }
}

/// 呼び出されるとテストを失敗させるトランスポート
#[derive(Debug, Clone, Copy)]
pub struct ForbiddenTransport;

impl Transport for ForbiddenTransport {
    fn get(
        &self,
        request: FeedRequest,
    ) -> impl Future<Output = Result<Option<FeedResponse>, BoxError>> + Send {
        forbidden(&request.url)
    }
}

fn forbidden(url: &str) -> std::future::Ready<Result<Option<FeedResponse>, BoxError>> {
    panic!("transport must not be called, got request for {}", url)
}

pub fn client_with(transport: MockTransport) -> Client<MockTransport> {
    ClientBuilder::new()
        .build_with_transport(transport)
        .expect("client should build")
}
