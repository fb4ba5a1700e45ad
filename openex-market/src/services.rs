use crate::models::{ContactCard, Decision};
use chrono::{DateTime, Utc};
use openex_core::identity::Session;
use openex_core::repository::UserRepository;
use openex_core::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::repository::ServiceRepository;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Pending,
    Approved,
    Rejected,
}

/// A skill offered by a student (tutoring, notes, laundry runs). Like
/// listings, offerings go through admin moderation before they are visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub hostel_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(
        provider_id: Uuid,
        hostel_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            provider_id,
            hostel_id,
            title: title.into(),
            description: description.into(),
            price,
            category: category.into(),
            status: ServiceStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: ServiceStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

/// A request for help posted by a student, fulfilled by a volunteering
/// provider. `open → in-progress → completed`, with `cancelled` reachable
/// only from `open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTask {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub hostel_id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    pub status: TaskStatus,
    /// Set when a provider accepts.
    pub provider_id: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceTask {
    pub fn new(
        requester_id: Uuid,
        hostel_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        budget: f64,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            requester_id,
            hostel_id,
            title: title.into(),
            description: description.into(),
            budget,
            category: category.into(),
            status: TaskStatus::Open,
            provider_id: None,
            accepted_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("admin access required")]
    AdminRequired,

    #[error("not authorized to act on this task")]
    NotAuthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("service is {0:?}; only pending services can be moderated")]
    AlreadyModerated(ServiceStatus),

    #[error("task is {0:?}")]
    WrongState(TaskStatus),

    #[error("backing service failure: {0}")]
    Store(#[from] StoreError),
}

/// Contact details exchanged when a provider takes on a task.
#[derive(Debug)]
pub struct TaskAcceptance {
    pub task: ServiceTask,
    pub requester_contact: Option<ContactCard>,
    pub provider_contact: Option<ContactCard>,
}

/// The services side of the marketplace: offerings behind admin moderation,
/// and open tasks that providers pick up.
pub struct ServiceBoard {
    services: Arc<dyn ServiceRepository>,
    users: Arc<dyn UserRepository>,
}

impl ServiceBoard {
    pub fn new(services: Arc<dyn ServiceRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { services, users }
    }

    /// Post a new offering; it stays `pending` until an admin moderates it.
    pub async fn offer(
        &self,
        session: &Session,
        hostel_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Result<Service, ServiceError> {
        let service = Service::new(
            session.user_id,
            hostel_id,
            title,
            description,
            price,
            category,
        );
        self.services.save_service(&service).await?;
        info!(service_id = %service.id, "service offered");
        Ok(service)
    }

    /// Admin decision on a pending offering.
    pub async fn moderate_service(
        &self,
        session: &Session,
        service_id: Uuid,
        decision: Decision,
    ) -> Result<Service, ServiceError> {
        if !session.is_admin() {
            return Err(ServiceError::AdminRequired);
        }

        let mut service = self
            .services
            .get_service(service_id)
            .await?
            .ok_or(ServiceError::NotFound("service"))?;
        if service.status != ServiceStatus::Pending {
            return Err(ServiceError::AlreadyModerated(service.status));
        }

        let verdict = match decision {
            Decision::Approve => ServiceStatus::Approved,
            Decision::Reject => ServiceStatus::Rejected,
        };
        service.update_status(verdict);
        self.services.save_service(&service).await?;
        info!(service_id = %service.id, ?verdict, "service moderated");

        Ok(service)
    }

    /// Approved offerings, the browsable marketplace.
    pub async fn browse_services(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(self
            .services
            .list_services_with_status(ServiceStatus::Approved)
            .await?)
    }

    /// Post a task; it is open to any provider immediately.
    pub async fn post_task(
        &self,
        session: &Session,
        hostel_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        budget: f64,
        category: impl Into<String>,
    ) -> Result<ServiceTask, ServiceError> {
        let task = ServiceTask::new(
            session.user_id,
            hostel_id,
            title,
            description,
            budget,
            category,
        );
        self.services.save_task(&task).await?;
        info!(task_id = %task.id, "task posted");
        Ok(task)
    }

    pub async fn open_tasks(&self) -> Result<Vec<ServiceTask>, ServiceError> {
        Ok(self.services.list_open_tasks().await?)
    }

    /// Take on an open task. Accepting is the contact-exchange moment, like
    /// request approval on the goods side.
    pub async fn accept_task(
        &self,
        session: &Session,
        task_id: Uuid,
    ) -> Result<TaskAcceptance, ServiceError> {
        let mut task = self
            .services
            .get_task(task_id)
            .await?
            .ok_or(ServiceError::NotFound("task"))?;

        if !task.is_open() {
            return Err(ServiceError::WrongState(task.status));
        }
        if task.requester_id == session.user_id {
            return Err(ServiceError::NotAuthorized);
        }

        let now = Utc::now();
        task.status = TaskStatus::InProgress;
        task.provider_id = Some(session.user_id);
        task.accepted_at = Some(now);
        task.updated_at = now;
        self.services.save_task(&task).await?;
        info!(task_id = %task.id, provider_id = %session.user_id, "task accepted");

        let requester = self.users.get_user(task.requester_id).await?;
        let provider = self.users.get_user(session.user_id).await?;

        Ok(TaskAcceptance {
            task,
            requester_contact: requester.as_ref().map(ContactCard::from),
            provider_contact: provider.as_ref().map(ContactCard::from),
        })
    }

    /// Only the requester signs off on a finished task.
    pub async fn complete_task(
        &self,
        session: &Session,
        task_id: Uuid,
    ) -> Result<ServiceTask, ServiceError> {
        let mut task = self
            .services
            .get_task(task_id)
            .await?
            .ok_or(ServiceError::NotFound("task"))?;

        if task.requester_id != session.user_id {
            return Err(ServiceError::NotAuthorized);
        }
        if task.status != TaskStatus::InProgress {
            return Err(ServiceError::WrongState(task.status));
        }

        let now = Utc::now();
        task.status = TaskStatus::Completed;
        task.completed_at = Some(now);
        task.updated_at = now;
        self.services.save_task(&task).await?;
        info!(task_id = %task.id, "task completed");

        Ok(task)
    }

    /// Requesters may withdraw a task no provider has taken yet.
    pub async fn cancel_task(
        &self,
        session: &Session,
        task_id: Uuid,
    ) -> Result<ServiceTask, ServiceError> {
        let mut task = self
            .services
            .get_task(task_id)
            .await?
            .ok_or(ServiceError::NotFound("task"))?;

        if task.requester_id != session.user_id {
            return Err(ServiceError::NotAuthorized);
        }
        if !task.is_open() {
            return Err(ServiceError::WrongState(task.status));
        }

        task.status = TaskStatus::Cancelled;
        task.updated_at = Utc::now();
        self.services.save_task(&task).await?;
        info!(task_id = %task.id, "task cancelled");

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_service_awaits_moderation() {
        let service = Service::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Maths tutoring",
            "Calculus and linear algebra",
            150.0,
            "tutoring",
        );
        assert_eq!(service.status, ServiceStatus::Pending);
    }

    #[test]
    fn new_task_is_open() {
        let task = ServiceTask::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Need notes",
            "Thermodynamics, week 6",
            0.0,
            "notes",
        );
        assert!(task.is_open());
        assert!(task.provider_id.is_none());
    }

    #[test]
    fn task_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Open).unwrap(), "\"open\"");
    }
}
