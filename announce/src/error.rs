//! 错误定义
//!
//! 所有注册表操作在其定义域上都是全函数：未知主题返回 `0`/`false`，不会出错。
//! 唯一的“失败”信号是 once 订阅在触发前被取消或清除，这属于常规的取消等待，
//! 调用方不应将其视为业务错误。
//!
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnounceError {
    /// once 订阅在触发前被 cancel/clear 终止，或注册表已被释放
    #[error("once subscription canceled before delivery")]
    Canceled,
}

/// 统一 Result 类型别名
pub type AnnounceResult<T> = Result<T, AnnounceError>;
