//! 装配与关闭
//!
//! 启动时显式构造事件总线与用例服务，按配置构造事件消费者并逐个订阅；
//! 未构造的消费者不会产生任何订阅。关闭时释放全部订阅。
//!
use crate::config::AppConfig;
use crate::rules::PersonenkontextRules;
use crate::service::PersonenkontextService;
use crate::subscribers::{
    AuditLog, AuditSink, DirectoryPort, DirectorySync, GroupwareLifecycle, GroupwarePort,
    LearningPlatformPort, LearningPlatformSync, MailLifecycle, MailPort, TracingAuditSink,
};
use bon::Builder;
use schulportal_domain::eventing::{EventBus, EventSubscriber, Subscription};
use schulportal_domain::repository::{
    OrganisationRepository, PersonenkontextRepository, PersonenkontextWriter, RoleRepository,
};
use std::sync::Arc;

/// 基础设施适配器；缺省的出站端口对应的消费者不会被构造
#[derive(Builder)]
pub struct Adapters {
    organisations: Arc<dyn OrganisationRepository>,
    roles: Arc<dyn RoleRepository>,
    kontexte: Arc<dyn PersonenkontextRepository>,
    writer: Arc<dyn PersonenkontextWriter>,
    directory: Option<Arc<dyn DirectoryPort>>,
    mail: Option<Arc<dyn MailPort>>,
    groupware: Option<Arc<dyn GroupwarePort>>,
    learning_platform: Option<Arc<dyn LearningPlatformPort>>,
    /// 缺省时写入 tracing 的 `audit` target
    audit: Option<Arc<dyn AuditSink>>,
}

/// 订阅组件声明的全部处理器
pub fn register<S>(bus: &EventBus, component: Arc<S>) -> Vec<Subscription>
where
    S: EventSubscriber,
{
    let subscriptions = bus.register_subscriber(component);
    tracing::info!(
        component = std::any::type_name::<S>(),
        handlers = subscriptions.len(),
        "event subscriber registered"
    );
    subscriptions
}

fn port<T: ?Sized>(enabled: bool, name: &'static str, adapter: Option<Arc<T>>) -> Option<Arc<T>> {
    match (enabled, adapter) {
        (false, _) => None,
        (true, None) => {
            tracing::warn!(consumer = name, "consumer enabled but no adapter configured, skipped");
            None
        }
        (true, adapter) => adapter,
    }
}

pub struct Application {
    bus: Arc<EventBus>,
    service: PersonenkontextService,
    subscriptions: Vec<Subscription>,
}

impl Application {
    pub fn start(config: &AppConfig, adapters: Adapters) -> Self {
        let Adapters {
            organisations,
            roles,
            kontexte,
            writer,
            directory,
            mail,
            groupware,
            learning_platform,
            audit,
        } = adapters;

        let bus = Arc::new(EventBus::new());
        let rules =
            PersonenkontextRules::new(organisations.clone(), roles.clone(), kontexte.clone());
        let service = PersonenkontextService::new(rules, kontexte.clone(), writer, bus.clone());

        let mut subscriptions = Vec::new();
        if let Some(directory) = port(config.directory_sync, "directory-sync", directory) {
            let component = DirectorySync::new(directory, kontexte.clone());
            subscriptions.extend(register(&bus, Arc::new(component)));
        }
        if let Some(mail) = port(config.mail, "mail", mail) {
            let component = MailLifecycle::new(mail, kontexte.clone());
            subscriptions.extend(register(&bus, Arc::new(component)));
        }
        if let Some(groupware) = port(config.groupware, "groupware", groupware) {
            let component = GroupwareLifecycle::new(groupware, roles.clone());
            subscriptions.extend(register(&bus, Arc::new(component)));
        }
        if let Some(platform) = port(
            config.learning_platform,
            "learning-platform",
            learning_platform,
        ) {
            let component = LearningPlatformSync::new(platform, organisations, roles);
            subscriptions.extend(register(&bus, Arc::new(component)));
        }
        if config.audit_log {
            let sink = audit.unwrap_or_else(|| Arc::new(TracingAuditSink) as Arc<dyn AuditSink>);
            subscriptions.extend(register(&bus, Arc::new(AuditLog::new(sink))));
        }

        tracing::info!(subscriptions = subscriptions.len(), "application started");
        Self {
            bus,
            service,
            subscriptions,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn service(&self) -> &PersonenkontextService {
        &self.service
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// 释放启动时登记的订阅以及之后追加的全部订阅，返回释放总数
    pub fn shutdown(self) -> usize {
        let cancelled = self
            .subscriptions
            .iter()
            .filter(|s| self.bus.cancel(s))
            .count();
        let remaining = self.bus.unsubscribe_all();

        tracing::info!(cancelled, remaining, "application shut down");
        cancelled + remaining
    }
}
