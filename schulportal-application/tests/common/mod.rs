#![allow(dead_code)]

use async_trait::async_trait;
use schulportal_application::subscribers::{
    AuditEntry, AuditSink, DirectoryPort, GroupwarePort, LearningPlatformPort, MailPort,
};
use schulportal_domain::error::{DomainError, DomainResult};
use schulportal_domain::model::{
    Organisation, OrganisationId, OrganisationType, PersonId, Personenkontext, Role, RoleId,
    RoleKind,
};
use schulportal_domain::repository::{
    InMemoryDirectory, PersonenkontextRepository, PersonenkontextWriter,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn organisation(
    dir: &InMemoryDirectory,
    kind: OrganisationType,
    administered_by: Option<OrganisationId>,
) -> OrganisationId {
    let id = OrganisationId::generate();
    dir.insert_organisation(
        Organisation::builder()
            .id(id)
            .name(format!("{kind} {id}"))
            .kind(kind)
            .maybe_administered_by(administered_by)
            .build(),
    )
    .unwrap();
    id
}

pub fn role(dir: &InMemoryDirectory, kind: RoleKind) -> RoleId {
    let id = RoleId::generate();
    dir.insert_role(Role::builder().id(id).name(kind.to_string()).kind(kind).build())
        .unwrap();
    id
}

pub fn kontext(
    person_id: PersonId,
    organisation_id: OrganisationId,
    role_id: RoleId,
) -> Personenkontext {
    Personenkontext::new(person_id, organisation_id, role_id)
}

/// 记录全部出站调用
#[derive(Default)]
pub struct Outbound {
    calls: Mutex<Vec<String>>,
    /// 目录服务调用一律失败
    pub directory_down: bool,
}

impl Outbound {
    pub fn directory_down() -> Self {
        Self {
            directory_down: true,
            ..Self::default()
        }
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl DirectoryPort for Outbound {
    async fn add_membership(
        &self,
        person_id: PersonId,
        organisation_id: OrganisationId,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(!self.directory_down, "directory unreachable");
        self.push(format!("directory.add:{person_id}:{organisation_id}"));
        Ok(())
    }

    async fn remove_membership(
        &self,
        person_id: PersonId,
        organisation_id: OrganisationId,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(!self.directory_down, "directory unreachable");
        self.push(format!("directory.remove:{person_id}:{organisation_id}"));
        Ok(())
    }

    async fn delete_entry(
        &self,
        person_id: PersonId,
        username: Option<&str>,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(!self.directory_down, "directory unreachable");
        let username = username.unwrap_or("-");
        self.push(format!("directory.delete:{person_id}:{username}"));
        Ok(())
    }
}

#[async_trait]
impl MailPort for Outbound {
    async fn ensure_mailbox(&self, person_id: PersonId) -> anyhow::Result<()> {
        self.push(format!("mail.ensure:{person_id}"));
        Ok(())
    }

    async fn disable_mailbox(&self, person_id: PersonId) -> anyhow::Result<()> {
        self.push(format!("mail.disable:{person_id}"));
        Ok(())
    }

    async fn delete_mailbox(&self, person_id: PersonId) -> anyhow::Result<()> {
        self.push(format!("mail.delete:{person_id}"));
        Ok(())
    }
}

#[async_trait]
impl GroupwarePort for Outbound {
    async fn provision_account(&self, person_id: PersonId) -> anyhow::Result<()> {
        self.push(format!("groupware.provision:{person_id}"));
        Ok(())
    }

    async fn deactivate_account(&self, person_id: PersonId) -> anyhow::Result<()> {
        self.push(format!("groupware.deactivate:{person_id}"));
        Ok(())
    }
}

#[async_trait]
impl LearningPlatformPort for Outbound {
    async fn enrol(
        &self,
        person_id: PersonId,
        course: OrganisationId,
        kind: RoleKind,
    ) -> anyhow::Result<()> {
        self.push(format!("lms.enrol:{person_id}:{course}:{kind}"));
        Ok(())
    }

    async fn unenrol(&self, person_id: PersonId, course: OrganisationId) -> anyhow::Result<()> {
        self.push(format!("lms.unenrol:{person_id}:{course}"));
        Ok(())
    }

    async fn archive_course(&self, course: OrganisationId) -> anyhow::Result<()> {
        self.push(format!("lms.archive:{course}"));
        Ok(())
    }
}

#[async_trait]
impl AuditSink for Outbound {
    async fn record(&self, entry: AuditEntry) -> anyhow::Result<()> {
        self.push(format!("audit:{}", entry.event));
        Ok(())
    }
}

/// 查询一律失败的仓储
pub struct Unavailable;

#[async_trait]
impl PersonenkontextRepository for Unavailable {
    async fn find_kontexte_by_person(&self, _: &PersonId) -> DomainResult<Vec<Personenkontext>> {
        Err(DomainError::lookup("personenkontext", "connection refused"))
    }
}

/// 删除照常执行、写入一律失败的写入端口
pub struct SaveRejected(pub Arc<InMemoryDirectory>);

#[async_trait]
impl PersonenkontextWriter for SaveRejected {
    async fn save(&self, _: &Personenkontext) -> DomainResult<()> {
        Err(DomainError::lookup("personenkontext", "write rejected"))
    }

    async fn delete(&self, kontext: &Personenkontext) -> DomainResult<bool> {
        self.0.delete(kontext).await
    }
}

/// 等待即发即弃的扇出产生效果
pub async fn eventually<F>(condition: F)
where
    F: Fn() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within 1s");
}
