//! Security Module
//!
//! サーバーから受け取るレスポンスに対する制限を実装するモジュール。
//! 巨大なレスポンス本文や、極端に深くネストしたXMLへの対策を提供します。

use crate::error::FeedError;

/// レスポンスに対する制限値
///
/// フィード処理時の上限を定義します。`ClientBuilder::with_limits`で変更できます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLimits {
    /// レスポンス本文の最大サイズ（バイト）
    /// デフォルト: 64MB (67_108_864 bytes)
    pub max_body_size: usize,
    /// XML要素の最大ネスト深さ
    /// デフォルト: 64
    pub max_depth: usize,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            max_body_size: 67_108_864, // 64MB
            max_depth: 64,
        }
    }
}

impl FeedLimits {
    /// デフォルトの制限値を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// レスポンス本文の最大サイズを指定する
    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// XML要素の最大ネスト深さを指定する
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// レスポンス本文のサイズを検証
///
/// # 戻り値
///
/// * `Ok(())` - 上限以内の場合
/// * `Err(FeedError::SecurityViolation)` - 上限を超えた場合
pub(crate) fn check_body_size(body: &[u8], limits: &FeedLimits) -> Result<(), FeedError> {
    check_body_len(body.len() as u64, limits.max_body_size)
}

/// 本文のバイト数（受信済み、または`Content-Length`で予告された値）を検証
pub(crate) fn check_body_len(len: u64, max_body_size: usize) -> Result<(), FeedError> {
    if len > max_body_size as u64 {
        return Err(FeedError::SecurityViolation(format!(
            "Response body exceeds maximum size: {} bytes (max: {} bytes)",
            len, max_body_size
        )));
    }
    Ok(())
}

/// XMLのネスト深さを検証
pub(crate) fn check_depth(depth: usize, limits: &FeedLimits) -> Result<(), FeedError> {
    if depth > limits.max_depth {
        return Err(FeedError::SecurityViolation(format!(
            "XML nesting depth exceeds maximum: {} (max: {})",
            depth, limits.max_depth
        )));
    }
    Ok(())
}
