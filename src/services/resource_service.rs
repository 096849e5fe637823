use crate::{
    forms::{resource_form::ResourceForm, ValidationError},
    interfaces::{
        resources::{Resource, ResourceShare},
        Message,
    },
    remote::repositories::{resources::ResourceRepository, RepositoryError},
    services::auth_service::Session,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("repository error: {0:#?}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct ResourceService {
    resource_repository: ResourceRepository,
}

impl ResourceService {
    pub fn new(resource_repository: ResourceRepository) -> Self {
        Self {
            resource_repository,
        }
    }

    pub async fn get_resource(
        &self,
        session: &Session,
        resource_id: i64,
    ) -> Result<Option<Resource>, ResourceServiceError> {
        Ok(self
            .resource_repository
            .find_one_by_id(session, resource_id)
            .await?)
    }

    /// Validates the form before anything is sent to the backend.
    pub async fn create_resource(
        &self,
        session: &Session,
        form: ResourceForm,
    ) -> Result<Resource, ResourceServiceError> {
        let resource = form.into_creating()?;

        Ok(self
            .resource_repository
            .create_one(session, &resource)
            .await?)
    }

    pub async fn update_resource(
        &self,
        session: &Session,
        resource_id: i64,
        form: ResourceForm,
    ) -> Result<Option<Resource>, ResourceServiceError> {
        let resource = form.into_updating()?;

        Ok(self
            .resource_repository
            .update_one(session, resource_id, &resource)
            .await?)
    }

    pub async fn delete_resource(
        &self,
        session: &Session,
        resource_id: i64,
    ) -> Result<Option<Resource>, ResourceServiceError> {
        Ok(self
            .resource_repository
            .delete_one(session, resource_id)
            .await?)
    }

    pub async fn share_resource(
        &self,
        session: &Session,
        resource_id: i64,
        share: ResourceShare,
    ) -> Result<Option<Message>, ResourceServiceError> {
        Ok(self
            .resource_repository
            .share(session, resource_id, &share)
            .await?)
    }

    pub async fn unshare_resource(
        &self,
        session: &Session,
        resource_id: i64,
        user_id: i64,
    ) -> Result<Option<Message>, ResourceServiceError> {
        Ok(self
            .resource_repository
            .unshare(session, resource_id, user_id)
            .await?)
    }
}
