//! 监听句柄（Listener）
//!
//! `on` 返回的可注销能力，仅持有注册表与追踪器的弱引用：
//! 句柄本身不会延长订阅的生命周期，丢弃句柄也不会自动注销。
//!
use crate::registry::Registry;
use crate::tracker::{Subscription, Tracker};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

pub struct Listener {
    registry: Weak<Registry>,
    tracker: Weak<dyn Subscription>,
}

impl Listener {
    pub(crate) fn new<P: 'static>(registry: &Rc<Registry>, tracker: &Rc<Tracker<P>>) -> Self {
        let tracker: Weak<Tracker<P>> = Rc::downgrade(tracker);
        Self {
            registry: Rc::downgrade(registry),
            tracker,
        }
    }

    /// 注销订阅
    ///
    /// 首次成功注销返回 true；订阅已死亡（已注销、已清除、once 已触发）
    /// 或注册表已被释放时返回 false。可在任意回调内部安全调用。
    pub fn dispose(&self) -> bool {
        let (Some(registry), Some(tracker)) = (self.registry.upgrade(), self.tracker.upgrade())
        else {
            return false;
        };

        let disposed = tracker.dispose(&registry);
        if disposed {
            debug!(
                registry = %registry.config().name,
                topic = %tracker.topic(),
                "listener disposed"
            );
        }
        disposed
    }

    pub fn is_active(&self) -> bool {
        self.tracker.upgrade().is_some_and(|tracker| tracker.is_alive())
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("active", &self.is_active())
            .finish()
    }
}
