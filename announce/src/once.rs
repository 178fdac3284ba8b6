//! 单次订阅（Once）
//!
//! `once` 返回一个可取消的 Future，与一个特殊的追踪器绑定：
//! - 投递时：先把自己移出注册表并标记死亡，再以载荷完成 Future（`Ok(payload)`）；
//! - 被 cancel/clear 终止时：丢弃发送端，Future 以 `Err(Canceled)` 完成，不携带载荷；
//! - 两者互斥，生命周期内恰好发生一次终态；既未触发也未取消时保持挂起。
//!
use crate::error::{AnnounceError, AnnounceResult};
use crate::listener::Listener;
use crate::registry::Registry;
use crate::topic::Topic;
use crate::tracker::{Kill, Process, Tracker};
use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// 单次订阅的 Future
#[must_use = "a once subscription does nothing unless awaited or canceled"]
pub struct Once<P> {
    receiver: oneshot::Receiver<P>,
    listener: Listener,
}

impl<P> Once<P> {
    pub(crate) fn new(receiver: oneshot::Receiver<P>, listener: Listener) -> Self {
        Self { receiver, listener }
    }

    /// 取消订阅；与 `Listener::dispose` 走同一路径
    ///
    /// 触发前取消返回 true，且 Future 以 `Err(AnnounceError::Canceled)` 完成；
    /// 已完成（投递或取消）后返回 false。
    pub fn cancel(&self) -> bool {
        self.listener.dispose()
    }

    /// 订阅是否仍在等待投递
    pub fn is_pending(&self) -> bool {
        self.listener.is_active()
    }
}

impl<P> Future for Once<P> {
    type Output = AnnounceResult<P>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map_err(|_| AnnounceError::Canceled)
    }
}

/// 构造 once 追踪器与对应的接收端，由 `Announcement::once` 负责注册
pub(crate) fn tracker<P: Clone + 'static>(
    registry: &Rc<Registry>,
    topic: &Topic<P>,
) -> (Rc<Tracker<P>>, oneshot::Receiver<P>) {
    let (tx, receiver) = oneshot::channel();
    let sender = Rc::new(Cell::new(Some(tx)));
    let deliver = sender.clone();
    let owner = Rc::downgrade(registry);
    let key = topic.channel_key();
    let cycle = registry.cycle();

    let tracker = Rc::new_cyclic(|me: &Weak<Tracker<P>>| {
        let me = me.clone();
        let process: Process<P> = Box::new(move |payload: &P| {
            let Some(tracker) = me.upgrade() else {
                return;
            };
            if let Some(registry) = owner.upgrade() {
                registry.remove(&tracker);
            }
            tracker.retire();
            if let Some(tx) = deliver.take() {
                // 接收端已被丢弃时无人等待，忽略即可
                let _ = tx.send(payload.clone());
            }
        });
        let kill: Kill = Box::new(move || drop(sender.take()));

        Tracker::new(key, cycle, process, Some(kill))
    });

    (tracker, receiver)
}
