/*
 * Responsibility
 * - 起動時の設定エラー定義 (必須キー不足なら起動失敗)
 */
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
}
