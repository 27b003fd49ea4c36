use super::{Template, TemplateId};
use crate::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn save(&self, template: &Template) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TemplateId) -> Result<Option<Template>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Template>, DomainError>;

    async fn delete(&self, id: &TemplateId) -> Result<bool, DomainError>;
}
