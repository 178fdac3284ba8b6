//! 通道注册表（Registry）
//!
//! 以 `ChannelKey`（主题 + 载荷 TypeId）索引各通道，通道以类型擦除方式存放，
//! 读取时按载荷类型还原。不变式：通道存在当且仅当其中至少有一个存活的追踪器，
//! 最后一个追踪器被移除时立即删除整个条目。
//!
//! 注册表同时持有发布周期计数器：每次找到通道的 `emit` 调用恰好递增一次。
//!
use crate::channel::{Channel, Removal};
use crate::config::AnnouncementConfig;
use crate::topic::ChannelKey;
use crate::tracker::Tracker;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) struct Registry {
    // 键中已包含载荷 TypeId，值必为对应的 `Channel<P>`
    channels: RefCell<HashMap<ChannelKey, Box<dyn Any>>>,
    cycle: Cell<u64>,
    config: AnnouncementConfig,
}

impl Registry {
    pub(crate) fn new(config: AnnouncementConfig) -> Self {
        Self {
            channels: RefCell::new(HashMap::new()),
            cycle: Cell::new(0),
            config,
        }
    }

    pub(crate) fn config(&self) -> &AnnouncementConfig {
        &self.config
    }

    /// 当前周期值（新追踪器以此为快照）
    pub(crate) fn cycle(&self) -> u64 {
        self.cycle.get()
    }

    /// 开始一次发布：周期加一并返回新值
    pub(crate) fn advance(&self) -> u64 {
        let now = self.cycle.get() + 1;
        self.cycle.set(now);
        now
    }

    /// 注册追踪器，返回该通道注册后的追踪器数量
    pub(crate) fn add<P: 'static>(&self, tracker: Rc<Tracker<P>>) -> usize {
        let mut channels = self.channels.borrow_mut();

        if let Some(channel) = channels
            .get_mut(tracker.key())
            .and_then(|slot| slot.downcast_mut::<Channel<P>>())
        {
            channel.push(tracker, self.config.sequence_capacity);
            return channel.len();
        }

        channels.insert(tracker.key().clone(), Box::new(Channel::Single(tracker)));
        1
    }

    /// 按身份移除追踪器；追踪器不在注册表中时为空操作
    pub(crate) fn remove<P: 'static>(&self, tracker: &Tracker<P>) {
        // 被删除的通道在借用释放后才析构，析构中的回调捕获物可以安全地重入注册表
        let _stale = {
            let mut channels = self.channels.borrow_mut();
            let removal = channels
                .get_mut(tracker.key())
                .and_then(|slot| slot.downcast_mut::<Channel<P>>())
                .map_or(Removal::Missing, |channel| channel.remove(tracker));

            match removal {
                Removal::Emptied => channels.remove(tracker.key()),
                Removal::Removed | Removal::Missing => None,
            }
        };
    }

    pub(crate) fn count<P: 'static>(&self, key: &ChannelKey) -> usize {
        self.channels
            .borrow()
            .get(key)
            .and_then(|slot| slot.downcast_ref::<Channel<P>>())
            .map_or(0, Channel::len)
    }

    /// 当前通道的一份引用（单引用或写时复制序列），不持有注册表借用
    pub(crate) fn channel<P: 'static>(&self, key: &ChannelKey) -> Option<Channel<P>> {
        self.channels
            .borrow()
            .get(key)
            .and_then(|slot| slot.downcast_ref::<Channel<P>>())
            .cloned()
    }

    /// 删除并取出整个通道
    pub(crate) fn take<P: 'static>(&self, key: &ChannelKey) -> Option<Channel<P>> {
        let slot = self.channels.borrow_mut().remove(key)?;
        slot.downcast::<Channel<P>>().ok().map(|channel| *channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::Topic;

    fn tracker(registry: &Registry, topic: &Topic<u32>) -> Rc<Tracker<u32>> {
        Rc::new(Tracker::new(
            topic.channel_key(),
            registry.cycle(),
            Box::new(|_: &u32| {}),
            None,
        ))
    }

    #[test]
    fn entry_exists_iff_trackers_remain() {
        let registry = Registry::new(AnnouncementConfig::default());
        let topic = Topic::<u32>::new("n");
        let key = topic.channel_key();

        let a = tracker(&registry, &topic);
        let b = tracker(&registry, &topic);
        assert_eq!(registry.add(a.clone()), 1);
        assert_eq!(registry.add(b.clone()), 2);
        assert_eq!(registry.count::<u32>(&key), 2);

        registry.remove(&a);
        registry.remove(&a);
        assert_eq!(registry.count::<u32>(&key), 1);

        registry.remove(&b);
        assert_eq!(registry.count::<u32>(&key), 0);
        assert!(registry.channel::<u32>(&key).is_none());
        assert!(registry.channels.borrow().is_empty());
    }

    #[test]
    fn take_removes_the_entry() {
        let registry = Registry::new(AnnouncementConfig::default());
        let topic = Topic::<u32>::new("n");
        registry.add(tracker(&registry, &topic));

        let taken = registry.take::<u32>(&topic.channel_key());
        assert_eq!(taken.map(|c| c.len()), Some(1));
        assert!(registry.take::<u32>(&topic.channel_key()).is_none());
    }

    #[test]
    fn advance_is_monotonic() {
        let registry = Registry::new(AnnouncementConfig::default());
        assert_eq!(registry.cycle(), 0);
        assert_eq!(registry.advance(), 1);
        assert_eq!(registry.advance(), 2);
        assert_eq!(registry.cycle(), 2);
    }
}
