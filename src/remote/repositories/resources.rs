use super::{read_json, read_optional_json, RepositoryError};
use crate::{
    browser::ResourceSource,
    interfaces::{
        pages::Page,
        resources::{
            CreatingResource, ListParams, ListingScope, Resource, ResourceShare,
            UpdatingResource,
        },
        Message,
    },
    remote::api_client::ApiClient,
    services::auth_service::Session,
};
use reqwest::Method;
use rocket::async_trait;

// The backend serves the collection itself with a trailing slash and
// redirects the bare path.
const COLLECTION_PATH: &str = "resources/";
const ACCESSIBLE_PATH: &str = "resources/me";

#[derive(Clone)]
pub struct ResourceRepository {
    api_client: ApiClient,
}

impl ResourceRepository {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    pub async fn list(
        &self,
        session: &Session,
        params: &ListParams,
    ) -> Result<Page<Resource>, RepositoryError> {
        let path = match params.scope {
            ListingScope::Collection => COLLECTION_PATH,
            ListingScope::Accessible => ACCESSIBLE_PATH,
        };
        let response = self
            .api_client
            .request(Method::GET, path, Some(&session.access_token))
            .query(params)
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn find_one_by_id(
        &self,
        session: &Session,
        resource_id: i64,
    ) -> Result<Option<Resource>, RepositoryError> {
        let response = self
            .api_client
            .request(
                Method::GET,
                &format!("resources/{resource_id}"),
                Some(&session.access_token),
            )
            .send()
            .await?;

        read_optional_json(response).await
    }

    pub async fn create_one(
        &self,
        session: &Session,
        resource: &CreatingResource,
    ) -> Result<Resource, RepositoryError> {
        let response = self
            .api_client
            .request(Method::POST, COLLECTION_PATH, Some(&session.access_token))
            .json(resource)
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn update_one(
        &self,
        session: &Session,
        resource_id: i64,
        resource: &UpdatingResource,
    ) -> Result<Option<Resource>, RepositoryError> {
        let response = self
            .api_client
            .request(
                Method::PUT,
                &format!("resources/{resource_id}"),
                Some(&session.access_token),
            )
            .json(resource)
            .send()
            .await?;

        read_optional_json(response).await
    }

    pub async fn delete_one(
        &self,
        session: &Session,
        resource_id: i64,
    ) -> Result<Option<Resource>, RepositoryError> {
        let response = self
            .api_client
            .request(
                Method::DELETE,
                &format!("resources/{resource_id}"),
                Some(&session.access_token),
            )
            .send()
            .await?;

        read_optional_json(response).await
    }

    pub async fn share(
        &self,
        session: &Session,
        resource_id: i64,
        share: &ResourceShare,
    ) -> Result<Option<Message>, RepositoryError> {
        let response = self
            .api_client
            .request(
                Method::POST,
                &format!("resources/{resource_id}/share"),
                Some(&session.access_token),
            )
            .json(share)
            .send()
            .await?;

        read_optional_json(response).await
    }

    pub async fn unshare(
        &self,
        session: &Session,
        resource_id: i64,
        user_id: i64,
    ) -> Result<Option<Message>, RepositoryError> {
        let response = self
            .api_client
            .request(
                Method::DELETE,
                &format!("resources/{resource_id}/share/{user_id}"),
                Some(&session.access_token),
            )
            .send()
            .await?;

        read_optional_json(response).await
    }
}

#[async_trait]
impl ResourceSource for ResourceRepository {
    async fn list_resources(
        &self,
        session: &Session,
        params: &ListParams,
    ) -> Result<Page<Resource>, RepositoryError> {
        self.list(session, params).await
    }
}
