//! Application Error - Unified error type for the gate
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// サーバーエラー時にクライアントへ返す汎用メッセージ
pub const GENERIC_FAULT_MESSAGE: &str = "FATAL:: Unexpected exception has occurred while handling request.\nTrying again may solve the problem.\n\nIf you are the service owner, please check the server log and fix the code.";

/// アプリケーション統一エラー型
///
/// ワークスペース全体で使用する標準エラー型です。
/// ビルダーパターンを使用してエラーを構築できます。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `message` - エラーメッセージ（4xx の場合はそのままクライアントに返す）
/// * `source` - 元のエラー（オプション、デバッグ用）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Forbidden, "Request was filtered");
/// assert_eq!(err.status_code(), 403);
/// ```
pub struct AppError {
    /// エラー種別
    kind: ErrorKind,
    /// メッセージ
    message: Cow<'static, str>,
    /// 元のエラー（デバッグ用）
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// アプリケーション結果型エイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// 元のエラーを設定（デバッグ用）
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// エラー種別を取得
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP ステータスコードを取得
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// メッセージを取得
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// クライアントに返してよいメッセージを組み立てる
    ///
    /// 4xx はメッセージをそのまま返します。5xx は汎用メッセージを返し、
    /// `debug` が `true` の場合のみエラーチェーンを付加します。
    pub fn public_message(&self, debug: bool) -> String {
        if !self.is_server_error() {
            return self.message.to_string();
        }
        if !debug {
            return GENERIC_FAULT_MESSAGE.to_string();
        }

        let mut out = format!("Fatal Error\n============\nError:\n\t{}", self.message);
        let mut cause = self.source();
        while let Some(err) = cause {
            out.push_str(&format!("\nCaused by:\n\t{}", err));
            cause = err.source();
        }
        out
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// `Result<T, E>` を `AppResult<T>` に変換するための拡張トレイト
pub trait ResultExt<T, E> {
    /// エラーを `AppError` に変換し、指定した種別とメッセージでラップ
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(kind, message).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::Forbidden, "Request was filtered");
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), "Request was filtered");
    }

    #[test]
    fn test_client_error_message_is_public() {
        let err = AppError::new(ErrorKind::BadRequest, "Invalid JSON body");
        assert_eq!(err.public_message(false), "Invalid JSON body");
        assert_eq!(err.public_message(true), "Invalid JSON body");
    }

    #[test]
    fn test_server_error_detail_gated_by_debug() {
        let io_err = std::io::Error::other("disk on fire");
        let err = AppError::new(ErrorKind::InternalServerError, "Error serving static file").with_source(io_err);

        let public = err.public_message(false);
        assert_eq!(public, GENERIC_FAULT_MESSAGE);
        assert!(!public.contains("disk on fire"));

        let debug = err.public_message(true);
        assert!(debug.contains("Error serving static file"));
        assert!(debug.contains("disk on fire"));
    }

    #[test]
    fn test_display() {
        let err = AppError::new(ErrorKind::NotFound, "The request was not handled");
        assert_eq!(err.to_string(), "[Not Found] The request was not handled");
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "truncated",
        ));
        let app_result = result.map_app_err(ErrorKind::BadRequest, "Failed to read body");
        let err = app_result.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.source().is_some());
    }
}
