//! 进程内类型化发布/订阅（announce）
//!
//! 提供单线程、同步投递的事件注册表，用于在同一进程内解耦组件：
//! - 主题（`topic`）：类型化的主题键，字符串或唯一符号，载荷类型在编译期绑定；
//! - 注册表（`Announcement`）：`on` / `once` / `emit` / `count` / `clear`；
//! - 监听句柄（`Listener`）与单次订阅（`Once`）：幂等注销、可取消的单次 Future；
//! - 配置（`config`）与错误（`error`）。
//!
//! 不提供跨进程投递、持久化、背压与重试；投递语义为“同步、尽力而为、
//! 仅投递给调用开始前已存在的订阅者”。
//!
//! 典型用法：
//! 1. 使用 `#[catalog]` 声明主题目录，或直接定义 `Topic<P>` 常量；
//! 2. 创建 `Announcement`，通过 `on` 注册处理器、`once` 等待单次事件；
//! 3. 通过 `emit` 同步发布，处理器中可安全地重入订阅、注销、发布与清除。
//!
pub mod announcement;
pub mod config;
pub mod error;
pub mod listener;
pub mod once;
pub mod topic;

mod channel;
mod registry;
mod tracker;

pub use announcement::Announcement;
pub use config::AnnouncementConfig;
pub use error::{AnnounceError, AnnounceResult};
pub use listener::Listener;
pub use once::Once;
pub use topic::{AnyPayload, Catalog, Topic, TopicKey};

#[cfg(feature = "macros")]
pub use announce_macros::catalog;

// `#[catalog]` 展开为 ::announce::... 路径，单元测试中同样需要能解析
extern crate self as announce;
