//! 订阅追踪器（Tracker）
//!
//! 每个订阅对应一个 Tracker，记录：
//! - 所属通道键（主题 + 载荷类型）；
//! - 存活标记：alive → dead 仅转换一次；
//! - 创建时的周期快照 `cycle`，用于在发布过程中屏蔽新加入的订阅；
//! - 投递回调 `process` 与可选的终止回调 `kill`。
//!
//! 存活期间由注册表独占持有，句柄只保留弱引用。
//!
use crate::registry::Registry;
use crate::topic::{ChannelKey, TopicKey};
use std::cell::Cell;

pub(crate) type Process<P> = Box<dyn Fn(&P)>;
pub(crate) type Kill = Box<dyn FnOnce()>;

pub(crate) struct Tracker<P> {
    key: ChannelKey,
    alive: Cell<bool>,
    cycle: u64,
    process: Process<P>,
    kill: Cell<Option<Kill>>,
}

impl<P: 'static> Tracker<P> {
    pub(crate) fn new(key: ChannelKey, cycle: u64, process: Process<P>, kill: Option<Kill>) -> Self {
        Self {
            key,
            alive: Cell::new(true),
            cycle,
            process,
            kill: Cell::new(kill),
        }
    }

    pub(crate) fn key(&self) -> &ChannelKey {
        &self.key
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// 是否应在周期 `now` 的发布中被调用：存活且创建早于本次发布
    pub(crate) fn is_due(&self, now: u64) -> bool {
        self.alive.get() && self.cycle < now
    }

    pub(crate) fn process(&self, payload: &P) {
        (self.process)(payload)
    }

    /// 仅标记死亡，不触发终止回调（once 正常投递路径）
    pub(crate) fn retire(&self) {
        self.alive.set(false);
    }

    /// 标记死亡并执行终止回调；回调至多执行一次
    pub(crate) fn terminate(&self) {
        self.alive.set(false);
        if let Some(kill) = self.kill.take() {
            kill();
        }
    }
}

/// 类型擦除后的追踪器操作，供不带载荷类型参数的句柄使用
pub(crate) trait Subscription {
    fn topic(&self) -> &TopicKey;

    fn is_alive(&self) -> bool;

    /// 幂等注销：已死亡返回 false；否则移出通道、标记死亡、执行终止回调并返回 true
    fn dispose(&self, registry: &Registry) -> bool;
}

impl<P: 'static> Subscription for Tracker<P> {
    fn topic(&self) -> &TopicKey {
        &self.key.topic
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn dispose(&self, registry: &Registry) -> bool {
        if !self.alive.get() {
            return false;
        }
        registry.remove(self);
        self.terminate();
        true
    }
}
