use super::{expire, remote_status};
use crate::{
    forms::resource_form::ResourceForm,
    guards::console_session::Authenticated,
    interfaces::{
        browser::{BrowserView, DeletedResource},
        resources::{ResourceDetail, ResourceShare},
        Message,
    },
    remote::repositories::RepositoryError,
    services::{
        browser_service::BrowserService,
        resource_service::{ResourceService, ResourceServiceError},
        session_service::{ConsoleSession, SessionService},
    },
};
use rocket::{delete, get, http::Status, post, put, routes, serde::json::Json, Route, State};

pub fn routes() -> Vec<Route> {
    routes![
        resources_get,
        resources_create,
        resources_update,
        resources_delete,
        resources_share,
        resources_unshare,
    ]
}

#[get("/<resource_id>")]
async fn resources_get(
    resource_service: &State<ResourceService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    resource_id: i64,
) -> Result<Json<ResourceDetail>, Status> {
    let resource = match resource_service
        .get_resource(&authenticated.console.session, resource_id)
        .await
    {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return Err(Status::NotFound);
        }
        Err(err) => {
            return Err(failure(session_service, &authenticated, "get resource", err).await);
        }
    };

    Ok(Json(resource.into()))
}

#[post("/", data = "<body>")]
async fn resources_create(
    browser_service: &State<BrowserService>,
    resource_service: &State<ResourceService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    body: Json<ResourceForm>,
) -> Result<Json<ResourceDetail>, Status> {
    let resource = match resource_service
        .create_resource(&authenticated.console.session, body.into_inner())
        .await
    {
        Ok(resource) => resource,
        Err(err) => {
            return Err(failure(session_service, &authenticated, "create resource", err).await);
        }
    };

    refreshed_view(browser_service, &authenticated.console).await;

    Ok(Json(resource.into()))
}

#[put("/<resource_id>", data = "<body>")]
async fn resources_update(
    browser_service: &State<BrowserService>,
    resource_service: &State<ResourceService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    resource_id: i64,
    body: Json<ResourceForm>,
) -> Result<Json<ResourceDetail>, Status> {
    let resource = match resource_service
        .update_resource(&authenticated.console.session, resource_id, body.into_inner())
        .await
    {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return Err(Status::NotFound);
        }
        Err(err) => {
            return Err(failure(session_service, &authenticated, "update resource", err).await);
        }
    };

    refreshed_view(browser_service, &authenticated.console).await;

    Ok(Json(resource.into()))
}

#[delete("/<resource_id>")]
async fn resources_delete(
    browser_service: &State<BrowserService>,
    resource_service: &State<ResourceService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    resource_id: i64,
) -> Result<Json<DeletedResource>, Status> {
    let resource = match resource_service
        .delete_resource(&authenticated.console.session, resource_id)
        .await
    {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return Err(Status::NotFound);
        }
        Err(err) => {
            return Err(failure(session_service, &authenticated, "delete resource", err).await);
        }
    };

    let view = refreshed_view(browser_service, &authenticated.console).await;

    Ok(Json(DeletedResource { resource, view }))
}

#[post("/<resource_id>/share", data = "<body>")]
async fn resources_share(
    resource_service: &State<ResourceService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    resource_id: i64,
    body: Json<ResourceShare>,
) -> Result<Json<Message>, Status> {
    match resource_service
        .share_resource(&authenticated.console.session, resource_id, body.into_inner())
        .await
    {
        Ok(Some(message)) => Ok(Json(message)),
        Ok(None) => Err(Status::NotFound),
        Err(err) => Err(failure(session_service, &authenticated, "share resource", err).await),
    }
}

#[delete("/<resource_id>/share/<user_id>")]
async fn resources_unshare(
    resource_service: &State<ResourceService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    resource_id: i64,
    user_id: i64,
) -> Result<Json<Message>, Status> {
    match resource_service
        .unshare_resource(&authenticated.console.session, resource_id, user_id)
        .await
    {
        Ok(Some(message)) => Ok(Json(message)),
        Ok(None) => Err(Status::NotFound),
        Err(err) => Err(failure(session_service, &authenticated, "unshare resource", err).await),
    }
}

/// Reloads the session's list after a change. A failed reload leaves the
/// change in place and falls back to what is already rendered.
async fn refreshed_view(browser_service: &BrowserService, console: &ConsoleSession) -> BrowserView {
    match browser_service.refresh(console).await {
        Ok(view) => view,
        Err(err) => {
            log::warn!("failed to refresh resource list: {err:#?}");
            console.controller.lock().await.view()
        }
    }
}

async fn failure(
    session_service: &SessionService,
    authenticated: &Authenticated,
    action: &str,
    err: ResourceServiceError,
) -> Status {
    match err {
        ResourceServiceError::Validation(err) => {
            log::warn!("rejected resource form: {err}");
            Status::UnprocessableEntity
        }
        ResourceServiceError::RepositoryError(RepositoryError::Unauthorized) => {
            expire(session_service, authenticated).await
        }
        ResourceServiceError::RepositoryError(err) => {
            log::error!("failed to {action}: {err:#?}");
            remote_status(&err)
        }
    }
}
