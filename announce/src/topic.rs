//! 主题（Topic）
//!
//! 主题是发布/订阅的键，同时在类型层面携带该主题的载荷类型 `P`：
//! - 字符串主题：`Topic::new("number")` / `Topic::named(format!(...))`；
//! - 符号主题：`Topic::symbol("foo")`，每次调用生成唯一键，描述相同也互不相等；
//! - 注册表以 `(TopicKey, TypeId::of::<P>())` 作为通道键，同名不同载荷类型互不干扰。
//!
//! 载荷形状仅在编译期约束，运行时不做任何检查。
//!
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 不受约束的载荷：`None` 表示零参数发布，`Some(..)` 携带任意类型的值
pub type AnyPayload = Option<Rc<dyn Any>>;

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// 主题的运行时键
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TopicKey {
    Name(Cow<'static, str>),
    Symbol { id: u64, description: &'static str },
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicKey::Name(name) => f.write_str(name),
            TopicKey::Symbol { id, description } => write!(f, "Symbol({description})#{id}"),
        }
    }
}

/// 带载荷类型的主题
pub struct Topic<P> {
    key: TopicKey,
    _payload: PhantomData<fn(P) -> P>,
}

impl<P> Topic<P> {
    /// 以静态字符串创建主题，可用于 `const`
    pub const fn new(name: &'static str) -> Self {
        Self {
            key: TopicKey::Name(Cow::Borrowed(name)),
            _payload: PhantomData,
        }
    }

    /// 以运行时字符串创建主题
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: TopicKey::Name(name.into()),
            _payload: PhantomData,
        }
    }

    /// 创建唯一的符号主题
    pub fn symbol(description: &'static str) -> Self {
        let id = NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed);
        Self {
            key: TopicKey::Symbol { id, description },
            _payload: PhantomData,
        }
    }

    pub fn key(&self) -> &TopicKey {
        &self.key
    }
}

impl<P: 'static> Topic<P> {
    pub(crate) fn channel_key(&self) -> ChannelKey {
        ChannelKey {
            topic: self.key.clone(),
            payload: TypeId::of::<P>(),
        }
    }
}

// 手写实现，避免 derive 对 `P` 追加不必要的约束
impl<P> Clone for Topic<P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for Topic<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Topic").field(&self.key).finish()
    }
}

impl<P> fmt::Display for Topic<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.key.fmt(f)
    }
}

impl<P> PartialEq for Topic<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<P> Eq for Topic<P> {}

impl<P> Hash for Topic<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// 通道键：主题键 + 载荷类型
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ChannelKey {
    pub(crate) topic: TopicKey,
    pub(crate) payload: TypeId,
}

/// 主题目录：由 `#[catalog]` 宏为结构体生成
///
/// 结构体的每个字段声明一个主题，字段类型即载荷类型。
pub trait Catalog {
    /// 目录中声明的全部主题名，按字段顺序
    const TOPICS: &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_with_same_description_are_distinct() {
        let a = Topic::<()>::symbol("foo");
        let b = Topic::<()>::symbol("foo");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.to_string().starts_with("Symbol(foo)#"));
    }

    #[test]
    fn channel_key_separates_payload_types() {
        let as_int = Topic::<i32>::new("value");
        let as_text = Topic::<String>::named("value".to_string());
        assert_eq!(as_int.key(), as_text.key());
        assert_ne!(as_int.channel_key(), as_text.channel_key());
    }

    #[cfg(feature = "macros")]
    #[test]
    fn catalog_declares_typed_topics() {
        #[crate::catalog(prefix = "app.")]
        struct AppTopics {
            number: i32,
            void: (),
            #[topic(name = "user.created")]
            user_created: String,
        }

        let number: Topic<i32> = AppTopics::NUMBER;
        let _: Topic<()> = AppTopics::VOID;
        assert_eq!(number.to_string(), "app.number");
        assert_eq!(AppTopics::USER_CREATED.key(), &TopicKey::Name("app.user.created".into()));
        assert_eq!(
            AppTopics::TOPICS,
            &["app.number", "app.void", "app.user.created"]
        );
    }
}
