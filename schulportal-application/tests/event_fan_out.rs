mod common;

use common::{eventually, kontext, organisation, role, Outbound};
use schulportal_application::subscribers::{AuditLog, DirectorySync, MailLifecycle};
use schulportal_application::wiring::register;
use schulportal_application::{Adapters, AppConfig, Application};
use schulportal_domain::event::{OrganisationDeletedEvent, PersonenkontextDeletedEvent};
use schulportal_domain::eventing::EventBus;
use schulportal_domain::model::{OrganisationType, PersonId, RoleKind};
use schulportal_domain::repository::InMemoryDirectory;
use std::sync::Arc;

fn start(config: AppConfig, dir: &Arc<InMemoryDirectory>, outbound: &Arc<Outbound>) -> Application {
    Application::start(
        &config,
        Adapters::builder()
            .organisations(dir.clone())
            .roles(dir.clone())
            .kontexte(dir.clone())
            .writer(dir.clone())
            .directory(outbound.clone())
            .mail(outbound.clone())
            .groupware(outbound.clone())
            .learning_platform(outbound.clone())
            .audit(outbound.clone())
            .build(),
    )
}

#[tokio::test]
async fn deleted_event_reaches_each_consumer_exactly_once() {
    let dir = Arc::new(InMemoryDirectory::new());
    let outbound = Arc::new(Outbound::default());
    let config = AppConfig::builder()
        .groupware(false)
        .learning_platform(false)
        .build();
    let app = start(config, &dir, &outbound);
    assert_eq!(app.bus().subscriber_count::<PersonenkontextDeletedEvent>(), 3);

    let school = organisation(&dir, OrganisationType::School, None);
    let teacher = role(&dir, RoleKind::Teacher);
    let person = PersonId::generate();
    let event = PersonenkontextDeletedEvent::from(kontext(person, school, teacher));

    let report = app.bus().publish(event).completed().await;
    assert_eq!(report.delivered, 3);
    assert!(report.is_clean());

    assert_eq!(outbound.count(&format!("directory.remove:{person}:{school}")), 1);
    assert_eq!(outbound.count(&format!("mail.disable:{person}")), 1);
    assert_eq!(outbound.count("audit:personenkontext.deleted"), 1);
    assert_eq!(outbound.calls().len(), 3);
}

#[tokio::test]
async fn delivery_does_not_depend_on_registration_order() {
    let dir = Arc::new(InMemoryDirectory::new());
    let school = organisation(&dir, OrganisationType::School, None);
    let teacher = role(&dir, RoleKind::Teacher);

    let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];
    for order in orders {
        let outbound = Arc::new(Outbound::default());
        let bus = EventBus::new();
        for component in order {
            match component {
                0 => register(&bus, Arc::new(DirectorySync::new(outbound.clone(), dir.clone()))),
                1 => register(&bus, Arc::new(MailLifecycle::new(outbound.clone(), dir.clone()))),
                _ => register(&bus, Arc::new(AuditLog::new(outbound.clone()))),
            };
        }

        let person = PersonId::generate();
        bus.publish_and_wait(PersonenkontextDeletedEvent::from(kontext(person, school, teacher)))
            .await;

        assert_eq!(outbound.count_prefix("directory.remove:"), 1);
        assert_eq!(outbound.count_prefix("mail.disable:"), 1);
        assert_eq!(outbound.count("audit:personenkontext.deleted"), 1);
    }
}

#[tokio::test]
async fn failing_consumer_does_not_block_the_others() {
    let dir = Arc::new(InMemoryDirectory::new());
    let outbound = Arc::new(Outbound::directory_down());
    let app = start(AppConfig::default(), &dir, &outbound);

    let school = organisation(&dir, OrganisationType::School, None);
    let teacher = role(&dir, RoleKind::Teacher);
    let event = PersonenkontextDeletedEvent::from(kontext(PersonId::generate(), school, teacher));

    let report = app.bus().publish(event).completed().await;
    assert_eq!(report.failures.len(), 1);
    assert!(
        report.failures[0]
            .subscriber_id
            .as_str()
            .starts_with("DirectorySync::")
    );
    assert!(report.failures[0].reason.contains("directory unreachable"));
    assert_eq!(report.delivered, 3);
    assert_eq!(outbound.count("audit:personenkontext.deleted"), 1);
}

#[tokio::test]
async fn service_changes_fan_out_to_consumers() {
    let dir = Arc::new(InMemoryDirectory::new());
    let outbound = Arc::new(Outbound::default());
    let app = start(AppConfig::default(), &dir, &outbound);

    let school = organisation(&dir, OrganisationType::School, None);
    let class = organisation(&dir, OrganisationType::Class, Some(school));
    let teacher = role(&dir, RoleKind::Teacher);
    let person = PersonId::generate();

    let at_school = kontext(person, school, teacher);
    let at_class = kontext(person, class, teacher);
    app.service().create(at_school).await.unwrap();
    app.service().create(at_class).await.unwrap();
    assert_eq!(dir.kontext_count().unwrap(), 2);

    eventually(|| outbound.count("audit:personenkontext.created") == 2).await;
    eventually(|| outbound.count(&format!("mail.ensure:{person}")) == 2).await;
    let enrolled = format!("lms.enrol:{person}:{class}:{}", RoleKind::Teacher);
    eventually(|| outbound.count(&enrolled) == 1).await;
    assert_eq!(outbound.count(&format!("directory.add:{person}:{school}")), 1);
    assert_eq!(outbound.count_prefix("lms.enrol:"), 1);

    // 重复创建不会再次发布事件
    app.service().create(at_class).await.unwrap();

    let summary = app.service().update(person, vec![at_school]).await.unwrap();
    assert_eq!(summary.deleted, vec![at_class]);
    assert!(summary.created.is_empty());
    assert_eq!(summary.current, vec![at_school]);

    eventually(|| outbound.count("audit:personenkontexte.updated") == 1).await;
    eventually(|| outbound.count(&format!("lms.unenrol:{person}:{class}")) == 1).await;
    assert_eq!(outbound.count("audit:personenkontext.created"), 2);
    assert_eq!(outbound.count(&format!("mail.disable:{person}")), 0);

    let removed = app
        .service()
        .delete_person(person, Some("mmuster".into()))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(dir.kontext_count().unwrap(), 0);

    eventually(|| outbound.count("audit:person.deleted") == 1).await;
    eventually(|| outbound.count(&format!("directory.delete:{person}:mmuster")) == 1).await;
    eventually(|| outbound.count(&format!("mail.delete:{person}")) == 1).await;
    eventually(|| outbound.count(&format!("groupware.deactivate:{person}")) == 1).await;
}

#[tokio::test]
async fn class_deletion_archives_course() {
    let dir = Arc::new(InMemoryDirectory::new());
    let outbound = Arc::new(Outbound::default());
    let app = start(AppConfig::default(), &dir, &outbound);
    let school = organisation(&dir, OrganisationType::School, None);
    let class = organisation(&dir, OrganisationType::Class, Some(school));

    for (organisation_id, kind) in [
        (school, OrganisationType::School),
        (class, OrganisationType::Class),
    ] {
        app.bus()
            .publish_and_wait(OrganisationDeletedEvent {
                organisation_id,
                kind,
            })
            .await;
    }

    assert_eq!(outbound.count_prefix("lms.archive:"), 1);
    assert_eq!(outbound.count(&format!("lms.archive:{class}")), 1);
    assert_eq!(outbound.count("audit:organisation.deleted"), 2);
}

#[tokio::test]
async fn disabled_consumers_are_never_subscribed() {
    let dir = Arc::new(InMemoryDirectory::new());
    let outbound = Arc::new(Outbound::default());
    let config = AppConfig::builder().mail(false).groupware(false).build();
    let app = start(config, &dir, &outbound);

    assert!(
        app.subscriptions()
            .iter()
            .all(|s| !s.subscriber_id().as_str().starts_with("MailLifecycle::")
                && !s.subscriber_id().as_str().starts_with("GroupwareLifecycle::"))
    );
    assert_eq!(app.subscriptions().len(), 3 + 3 + 5);
}

#[tokio::test]
async fn shutdown_releases_every_subscription() {
    let dir = Arc::new(InMemoryDirectory::new());
    let outbound = Arc::new(Outbound::default());
    let app = start(AppConfig::default(), &dir, &outbound);
    assert_eq!(app.subscriptions().len(), 17);

    app.bus()
        .subscribe_fn::<PersonenkontextDeletedEvent, _, _>("late-subscriber", |_| async { Ok(()) });
    let bus = app.bus().clone();

    assert_eq!(app.shutdown(), 18);
    assert_eq!(bus.subscriber_count::<PersonenkontextDeletedEvent>(), 0);

    let report = bus
        .publish_and_wait(PersonenkontextDeletedEvent::from(kontext(
            PersonId::generate(),
            organisation(&dir, OrganisationType::School, None),
            role(&dir, RoleKind::Teacher),
        )))
        .await;
    assert_eq!(report.attempted(), 0);
    assert!(outbound.calls().is_empty());
}
