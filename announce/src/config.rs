//! 注册表配置（AnnouncementConfig）
//!
use bon::Builder;

/// 注册表配置
#[derive(Builder, Clone, Debug)]
pub struct AnnouncementConfig {
    /// 注册表名称，写入每条 tracing 事件的 `registry` 字段
    #[builder(into, default = String::from("announcement"))]
    pub name: String,
    /// 通道由单引用升级为序列时的初始容量
    #[builder(default = 4)]
    pub sequence_capacity: usize,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_defaults() {
        let cfg = AnnouncementConfig::builder().name("ui").build();
        assert_eq!(cfg.name, "ui");
        assert_eq!(cfg.sequence_capacity, 4);

        let cfg = AnnouncementConfig::default();
        assert_eq!(cfg.name, "announcement");
    }
}
