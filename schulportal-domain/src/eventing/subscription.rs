use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// 订阅者标识：同一事件类型下唯一，重复注册会替换而非追加
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(Arc<str>);

impl SubscriberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for SubscriberId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// 订阅回执：可用于 `EventBus::cancel` 单独退订
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub(crate) event_type: TypeId,
    pub(crate) event_name: &'static str,
    pub(crate) subscriber_id: SubscriberId,
}

impl Subscription {
    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    pub fn subscriber_id(&self) -> &SubscriberId {
        &self.subscriber_id
    }
}
