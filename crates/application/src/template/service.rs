use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use domain::event::{DomainEvent, EventPublisher};
use domain::media::MediaType;
use domain::template::{Template, TemplateDraft, TemplateId};
use domain::DomainError;

use crate::store::{ContentStore, emit};

/// Slide layouts that playlists can reference
pub struct TemplateService {
    store: ContentStore,
    publisher: Arc<dyn EventPublisher>,
}

impl TemplateService {
    pub fn new(store: ContentStore, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn list(&self) -> Result<Vec<Template>, DomainError> {
        self.store.templates.find_all().await
    }

    pub async fn get(&self, id: &TemplateId) -> Result<Template, DomainError> {
        self.store
            .templates
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Template", id))
    }

    pub async fn create(&self, draft: TemplateDraft) -> Result<Template, DomainError> {
        let _guard = self.store.lock().await;

        if let Some(background) = &draft.background {
            let media = self
                .store
                .media
                .find_by_path(background)
                .await?
                .ok_or_else(|| DomainError::not_found("Media", background))?;
            if media.media_type != MediaType::Image {
                return Err(DomainError::Validation(format!(
                    "Background {background} is not an image"
                )));
            }
        }

        let template = Template::create(TemplateId::new(Uuid::new_v4().to_string()), draft)?;
        self.store.templates.save(&template).await?;

        info!(template_id = %template.id, name = %template.name, "Template created");
        emit(
            &self.publisher,
            DomainEvent::template_created(template.id.clone(), template.name.clone()),
        )
        .await;
        Ok(template)
    }

    pub async fn delete(&self, id: &TemplateId) -> Result<(), DomainError> {
        let _guard = self.store.lock().await;

        self.get(id).await?;
        if let Some(playlist) = self
            .store
            .playlists
            .find_all()
            .await?
            .into_iter()
            .find(|p| p.template_id.as_ref() == Some(id))
        {
            return Err(DomainError::Conflict(format!(
                "Template {id} is used by playlist {}",
                playlist.id()
            )));
        }

        self.store.templates.delete(id).await?;
        info!(template_id = %id, "Template deleted");
        emit(&self.publisher, DomainEvent::template_deleted(id.clone())).await;
        Ok(())
    }
}
