//! 发布/订阅入口（Announcement）
//!
//! 单线程、完全同步的进程内发布/订阅：
//! - `on` / `on_with_teardown`：注册处理器，返回 `Listener`；
//! - `once`：等待一次投递，返回可取消的 `Once` Future；
//! - `emit` / `signal`：在调用线程上同步投递给本次调用开始前已存在的订阅者；
//! - `count` / `clear`：查询与清除某个主题的订阅者。
//!
//! 处理器可以重入调用上述任意操作。重入安全依赖两点：
//! 1. 周期屏蔽：每次 `emit` 周期加一，只调用 `cycle` 严格小于本次周期的存活追踪器，
//!    本次发布期间新增的订阅不会在本次被调用；
//! 2. 清除快照：`clear` 先整体摘除通道再逐个终止，终止回调中新增的订阅落入新通道，
//!    不受本次清除影响。
//!
use crate::channel::Channel;
use crate::config::AnnouncementConfig;
use crate::listener::Listener;
use crate::once::{self, Once};
use crate::registry::Registry;
use crate::topic::Topic;
use crate::tracker::{Kill, Process, Tracker};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// 发布/订阅注册表句柄，克隆开销低，所有克隆共享同一注册表
#[derive(Clone)]
pub struct Announcement {
    registry: Rc<Registry>,
}

impl Default for Announcement {
    fn default() -> Self {
        Self::with_config(AnnouncementConfig::default())
    }
}

impl Announcement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnnouncementConfig) -> Self {
        Self {
            registry: Rc::new(Registry::new(config)),
        }
    }

    pub fn config(&self) -> &AnnouncementConfig {
        self.registry.config()
    }

    /// 订阅主题
    pub fn on<P, F>(&self, topic: &Topic<P>, handler: F) -> Listener
    where
        P: 'static,
        F: Fn(&P) + 'static,
    {
        self.subscribe(topic, Box::new(handler), None)
    }

    /// 订阅主题，并在订阅被注销或清除时执行一次 `teardown`
    pub fn on_with_teardown<P, F, T>(&self, topic: &Topic<P>, handler: F, teardown: T) -> Listener
    where
        P: 'static,
        F: Fn(&P) + 'static,
        T: FnOnce() + 'static,
    {
        self.subscribe(topic, Box::new(handler), Some(Box::new(teardown)))
    }

    /// 等待主题的下一次投递
    pub fn once<P>(&self, topic: &Topic<P>) -> Once<P>
    where
        P: Clone + 'static,
    {
        let (tracker, receiver) = once::tracker(&self.registry, topic);
        Once::new(receiver, self.attach(topic, tracker))
    }

    fn subscribe<P: 'static>(
        &self,
        topic: &Topic<P>,
        process: Process<P>,
        kill: Option<Kill>,
    ) -> Listener {
        let tracker = Rc::new(Tracker::new(
            topic.channel_key(),
            self.registry.cycle(),
            process,
            kill,
        ));
        self.attach(topic, tracker)
    }

    fn attach<P: 'static>(&self, topic: &Topic<P>, tracker: Rc<Tracker<P>>) -> Listener {
        let listener = Listener::new(&self.registry, &tracker);
        let count = self.registry.add(tracker);
        debug!(
            registry = %self.registry.config().name,
            topic = %topic,
            count,
            "subscribed"
        );
        listener
    }

    /// 同步发布
    ///
    /// 主题没有任何订阅者时返回 false 且不改变任何状态；否则按订阅顺序调用
    /// 本次调用开始前已存在且仍存活的订阅者，返回 true。
    pub fn emit<P: 'static>(&self, topic: &Topic<P>, payload: P) -> bool {
        let Some(channel) = self.registry.channel::<P>(&topic.channel_key()) else {
            trace!(
                registry = %self.registry.config().name,
                topic = %topic,
                "emit without subscribers"
            );
            return false;
        };

        let now = self.registry.advance();
        let delivered = match channel {
            // 通道中唯一的追踪器必然存活且早于本次发布：被注销的瞬间就已移出通道
            Channel::Single(tracker) => {
                debug_assert!(tracker.is_due(now));
                tracker.process(&payload);
                1
            }
            Channel::Many(trackers) => {
                let mut delivered = 0usize;
                for tracker in trackers.iter() {
                    if tracker.is_due(now) {
                        tracker.process(&payload);
                        delivered += 1;
                    }
                }
                delivered
            }
        };

        trace!(
            registry = %self.registry.config().name,
            topic = %topic,
            cycle = now,
            delivered,
            "emitted"
        );
        true
    }

    /// 发布无载荷主题
    pub fn signal(&self, topic: &Topic<()>) -> bool {
        self.emit(topic, ())
    }

    /// 当前订阅者数量，不受进行中的发布影响
    pub fn count<P: 'static>(&self, topic: &Topic<P>) -> usize {
        self.registry.count::<P>(&topic.channel_key())
    }

    /// 清除主题的全部订阅者并逐个终止，返回清除前是否存在订阅者
    pub fn clear<P: 'static>(&self, topic: &Topic<P>) -> bool {
        let Some(channel) = self.registry.take::<P>(&topic.channel_key()) else {
            return false;
        };

        let trackers = channel.into_trackers();
        debug!(
            registry = %self.registry.config().name,
            topic = %topic,
            count = trackers.len(),
            "cleared"
        );

        // 快照中的追踪器可能已在前一个终止回调里被注销
        for tracker in trackers {
            if tracker.is_alive() {
                tracker.terminate();
            }
        }
        true
    }
}

impl fmt::Debug for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcement")
            .field("name", &self.registry.config().name)
            .field("cycle", &self.registry.cycle())
            .finish()
    }
}
