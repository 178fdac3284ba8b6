//! 通道（Channel）：单个通道键下的全部追踪器
//!
//! 常见的 0~1 个订阅者走单引用快速路径，第二个订阅者到来时才升级为序列。
//! 序列以 `Rc<Vec<_>>` 写时复制：发布过程持有序列的一份引用按位置遍历，
//! 回调中的增删通过 `Rc::make_mut` 落在新副本上，不会挪动正在遍历的位置。
//!
use crate::tracker::Tracker;
use std::rc::Rc;

pub(crate) enum Channel<P> {
    Single(Rc<Tracker<P>>),
    /// 发布期间首次增删会复制整个序列（O(n)），其余时候追加为均摊 O(1)
    Many(Rc<Vec<Rc<Tracker<P>>>>),
}

/// 移除结果
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Removal {
    Removed,
    /// 移除的是最后一个追踪器，通道应被删除
    Emptied,
    Missing,
}

impl<P> Clone for Channel<P> {
    fn clone(&self) -> Self {
        match self {
            Channel::Single(tracker) => Channel::Single(tracker.clone()),
            Channel::Many(trackers) => Channel::Many(trackers.clone()),
        }
    }
}

impl<P> Channel<P> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Channel::Single(_) => 1,
            Channel::Many(trackers) => trackers.len(),
        }
    }

    pub(crate) fn push(&mut self, tracker: Rc<Tracker<P>>, capacity: usize) {
        match self {
            Channel::Single(first) => {
                let mut trackers = Vec::with_capacity(capacity.max(2));
                trackers.push(first.clone());
                trackers.push(tracker);
                *self = Channel::Many(Rc::new(trackers));
            }
            Channel::Many(trackers) => Rc::make_mut(trackers).push(tracker),
        }
    }

    /// 按身份（指针）移除
    pub(crate) fn remove(&mut self, tracker: &Tracker<P>) -> Removal {
        match self {
            Channel::Single(only) => {
                if std::ptr::eq(Rc::as_ptr(only), tracker) {
                    Removal::Emptied
                } else {
                    Removal::Missing
                }
            }
            Channel::Many(trackers) => {
                let Some(pos) = trackers
                    .iter()
                    .position(|t| std::ptr::eq(Rc::as_ptr(t), tracker))
                else {
                    return Removal::Missing;
                };

                let list = Rc::make_mut(trackers);
                list.remove(pos);

                // 两元素序列降级回单引用
                if let [last] = list.as_slice() {
                    let last = last.clone();
                    *self = Channel::Single(last);
                }
                Removal::Removed
            }
        }
    }

    /// 取出全部追踪器（订阅顺序）
    pub(crate) fn into_trackers(self) -> Vec<Rc<Tracker<P>>> {
        match self {
            Channel::Single(tracker) => vec![tracker],
            Channel::Many(trackers) => Rc::unwrap_or_clone(trackers),
        }
    }
}
