//! Administrative decisions over enterprises and agent requests.

use domain::models::{
    AgentInstanceStatus, AgentRequest, Enterprise, EnterpriseProfile, EnterpriseStatus,
    ADMIN_MARKER,
};
use domain::services::{AgentStore, EnterpriseStore, StoreError};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::services::email::EmailService;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid status filter: {0}")]
    InvalidFilter(String),

    #[error("Account not found")]
    EnterpriseNotFound,

    #[error("Request not found")]
    RequestNotFound,

    /// The entity is not in a state that allows the transition.
    #[error("{0}")]
    Conflict(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Parses a list filter: absent or `all` means unfiltered.
pub fn parse_status_filter<S: FromStr>(raw: Option<&str>) -> Result<Option<S>, AdminError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AdminError::InvalidFilter(value.to_string())),
    }
}

#[derive(Clone)]
pub struct AdminService {
    enterprises: Arc<dyn EnterpriseStore>,
    agents: Arc<dyn AgentStore>,
    email: EmailService,
}

impl AdminService {
    pub fn new(
        enterprises: Arc<dyn EnterpriseStore>,
        agents: Arc<dyn AgentStore>,
        email: EmailService,
    ) -> Self {
        Self {
            enterprises,
            agents,
            email,
        }
    }

    pub async fn list_enterprises(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<EnterpriseProfile>, AdminError> {
        let status = parse_status_filter::<EnterpriseStatus>(filter)?;
        Ok(self.enterprises.list(status).await?)
    }

    async fn load_enterprise(&self, id: Uuid) -> Result<Enterprise, AdminError> {
        self.enterprises
            .find_by_id(id)
            .await?
            .ok_or(AdminError::EnterpriseNotFound)
    }

    async fn transition(
        &self,
        enterprise: &Enterprise,
        status: EnterpriseStatus,
    ) -> Result<(), AdminError> {
        self.enterprises.update_status(enterprise.id, status).await?;
        info!(
            enterprise_id = %enterprise.id,
            from = %enterprise.status,
            to = %status,
            "Enterprise status changed by admin"
        );
        Ok(())
    }

    /// Activates an account from any state but `active`.
    pub async fn approve_enterprise(&self, id: Uuid) -> Result<Enterprise, AdminError> {
        let enterprise = self.load_enterprise(id).await?;
        if enterprise.status == EnterpriseStatus::Active {
            return Err(AdminError::Conflict("This account has already been approved"));
        }

        self.transition(&enterprise, EnterpriseStatus::Active).await?;
        self.email
            .send_approval(&enterprise.email, &enterprise.name)
            .await;
        Ok(enterprise)
    }

    pub async fn reject_enterprise(
        &self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Enterprise, AdminError> {
        let enterprise = self.load_enterprise(id).await?;
        if enterprise.status == EnterpriseStatus::Rejected {
            return Err(AdminError::Conflict("This account has already been rejected"));
        }

        self.transition(&enterprise, EnterpriseStatus::Rejected).await?;
        self.email
            .send_rejection(&enterprise.email, &enterprise.name, reason)
            .await;
        Ok(enterprise)
    }

    /// Disables an active account.
    pub async fn suspend_enterprise(&self, id: Uuid) -> Result<Enterprise, AdminError> {
        let enterprise = self.load_enterprise(id).await?;
        match enterprise.status {
            EnterpriseStatus::Active => {}
            EnterpriseStatus::Suspended => {
                return Err(AdminError::Conflict("This account is already suspended"))
            }
            _ => return Err(AdminError::Conflict("Only active accounts can be suspended")),
        }

        self.transition(&enterprise, EnterpriseStatus::Suspended)
            .await?;
        Ok(enterprise)
    }

    /// Restores a suspended account to `active`.
    pub async fn unsuspend_enterprise(&self, id: Uuid) -> Result<Enterprise, AdminError> {
        let enterprise = self.load_enterprise(id).await?;
        if enterprise.status != EnterpriseStatus::Suspended {
            return Err(AdminError::Conflict("This account is not suspended"));
        }

        self.transition(&enterprise, EnterpriseStatus::Active).await?;
        Ok(enterprise)
    }

    pub async fn list_agent_requests(
        &self,
        filter: Option<&str>,
    ) -> Result<Vec<AgentRequest>, AdminError> {
        let status = parse_status_filter::<AgentInstanceStatus>(filter)?;
        Ok(self.agents.list_requests(status).await?)
    }

    async fn load_request(&self, id: Uuid) -> Result<AgentRequest, AdminError> {
        self.agents
            .find_request(id)
            .await?
            .ok_or(AdminError::RequestNotFound)
    }

    pub async fn approve_agent_request(&self, id: Uuid) -> Result<AgentRequest, AdminError> {
        let request = self.load_request(id).await?;
        if request.status == AgentInstanceStatus::Active {
            return Err(AdminError::Conflict("This request has already been approved"));
        }

        self.agents
            .approve_instance(id, ADMIN_MARKER)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AdminError::Conflict(
                    "The enterprise already has an outstanding instance of this agent type",
                ),
                other => AdminError::Store(other),
            })?;

        info!(instance_id = %id, enterprise_id = %request.enterprise_id, "Agent request approved");
        self.email
            .send_agent_activation(
                &request.enterprise_email,
                &request.enterprise_name,
                &request.instance_name,
                &request.agent_type_name,
            )
            .await;
        Ok(request)
    }

    pub async fn reject_agent_request(&self, id: Uuid) -> Result<AgentRequest, AdminError> {
        let request = self.load_request(id).await?;
        if request.status == AgentInstanceStatus::Rejected {
            return Err(AdminError::Conflict("This request has already been rejected"));
        }

        self.agents.reject_instance(id, ADMIN_MARKER).await?;
        info!(instance_id = %id, enterprise_id = %request.enterprise_id, "Agent request rejected");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;
    use chrono::{Duration, Utc};
    use domain::models::{AgentType, AgentTypeStatus, NewAgentInstance, NewEnterprise};
    use domain::services::MockMailer;
    use persistence::InMemoryStore;

    struct Fixture {
        store: InMemoryStore,
        mailer: MockMailer,
        service: AdminService,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let mailer = MockMailer::new();
        let email = EmailService::new(
            Arc::new(mailer.clone()),
            &EmailConfig {
                enabled: true,
                ..EmailConfig::default()
            },
            "https://aitrify.com",
        );
        let service = AdminService::new(Arc::new(store.clone()), Arc::new(store.clone()), email);
        Fixture {
            store,
            mailer,
            service,
        }
    }

    async fn enterprise(store: &InMemoryStore, email: &str, status: EnterpriseStatus) -> Uuid {
        let created = store
            .create(NewEnterprise {
                name: "Lan".to_string(),
                company: "Acme".to_string(),
                email: email.to_string(),
                email_domain: "acme-corp.com".to_string(),
                password_hash: "pbkdf2:00:00".to_string(),
                verification_token: format!("tok-{}", email),
                token_expires_at: Utc::now() + Duration::hours(24),
            })
            .await
            .unwrap();
        store.update_status(created.id, status).await.unwrap();
        created.id
    }

    async fn agent_request(store: &InMemoryStore, enterprise_id: Uuid) -> Uuid {
        store
            .seed_agent_type(AgentType {
                id: "hr-assistant".to_string(),
                name: "HR Assistant".to_string(),
                description: "Answers HR questions".to_string(),
                industry: "Services".to_string(),
                status: AgentTypeStatus::Active,
            })
            .await;
        store
            .create_instance(NewAgentInstance {
                enterprise_id,
                agent_type_id: "hr-assistant".to_string(),
                instance_name: "People <Bot>".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter::<EnterpriseStatus>(None).unwrap(), None);
        assert_eq!(parse_status_filter::<EnterpriseStatus>(Some("all")).unwrap(), None);
        assert_eq!(
            parse_status_filter::<EnterpriseStatus>(Some("pending_review")).unwrap(),
            Some(EnterpriseStatus::PendingReview)
        );
        assert!(matches!(
            parse_status_filter::<AgentInstanceStatus>(Some("archived")),
            Err(AdminError::InvalidFilter(_))
        ));
    }

    #[tokio::test]
    async fn test_approve_enterprise_once() {
        let f = fixture();
        let id = enterprise(&f.store, "lan@acme-corp.com", EnterpriseStatus::PendingReview).await;

        f.service.approve_enterprise(id).await.unwrap();
        assert!(matches!(
            f.service.approve_enterprise(id).await,
            Err(AdminError::Conflict(_))
        ));

        let active = f.service.list_enterprises(Some("active")).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert_eq!(f.mailer.sent_to("lan@acme-corp.com").len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_enterprise() {
        let f = fixture();
        assert!(matches!(
            f.service.approve_enterprise(Uuid::new_v4()).await,
            Err(AdminError::EnterpriseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_reject_enterprise_with_reason() {
        let f = fixture();
        let id = enterprise(&f.store, "lan@acme-corp.com", EnterpriseStatus::PendingReview).await;

        f.service
            .reject_enterprise(id, Some("Not a registered business"))
            .await
            .unwrap();
        assert!(matches!(
            f.service.reject_enterprise(id, None).await,
            Err(AdminError::Conflict(_))
        ));

        let sent = f.mailer.sent_to("lan@acme-corp.com");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("Not a registered business"));
    }

    #[tokio::test]
    async fn test_suspend_and_unsuspend() {
        let f = fixture();
        let id = enterprise(&f.store, "lan@acme-corp.com", EnterpriseStatus::Active).await;
        let pending = enterprise(&f.store, "b@acme-corp.com", EnterpriseStatus::PendingReview).await;

        assert!(matches!(
            f.service.unsuspend_enterprise(id).await,
            Err(AdminError::Conflict(_))
        ));
        assert!(matches!(
            f.service.suspend_enterprise(pending).await,
            Err(AdminError::Conflict(_))
        ));

        f.service.suspend_enterprise(id).await.unwrap();
        assert!(matches!(
            f.service.suspend_enterprise(id).await,
            Err(AdminError::Conflict(_))
        ));
        f.service.unsuspend_enterprise(id).await.unwrap();

        let stored = f.store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, EnterpriseStatus::Active);
    }

    #[tokio::test]
    async fn test_approve_agent_request_sends_activation() {
        let f = fixture();
        let owner = enterprise(&f.store, "lan@acme-corp.com", EnterpriseStatus::Active).await;
        let request_id = agent_request(&f.store, owner).await;

        f.service.approve_agent_request(request_id).await.unwrap();
        assert!(matches!(
            f.service.approve_agent_request(request_id).await,
            Err(AdminError::Conflict(_))
        ));

        let request = f.store.find_request(request_id).await.unwrap().unwrap();
        assert_eq!(request.status, AgentInstanceStatus::Active);
        assert_eq!(request.approved_by.as_deref(), Some(ADMIN_MARKER));

        let sent = f.mailer.sent_to("lan@acme-corp.com");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("People &lt;Bot&gt;"));
        assert!(sent[0].html.contains("HR Assistant"));
    }

    #[tokio::test]
    async fn test_reject_agent_request_and_filter() {
        let f = fixture();
        let owner = enterprise(&f.store, "lan@acme-corp.com", EnterpriseStatus::Active).await;
        let request_id = agent_request(&f.store, owner).await;

        f.service.reject_agent_request(request_id).await.unwrap();
        assert!(matches!(
            f.service.reject_agent_request(request_id).await,
            Err(AdminError::Conflict(_))
        ));
        assert!(matches!(
            f.service.reject_agent_request(Uuid::new_v4()).await,
            Err(AdminError::RequestNotFound)
        ));

        let rejected = f.service.list_agent_requests(Some("rejected")).await.unwrap();
        assert_eq!(rejected.len(), 1);
        assert!(f
            .service
            .list_agent_requests(Some("pending"))
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            f.service.list_agent_requests(Some("bogus")).await,
            Err(AdminError::InvalidFilter(_))
        ));
    }
}
