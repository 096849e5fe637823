use super::expire;
use crate::{
    browser::query::{Filters, Sort},
    guards::console_session::Authenticated,
    interfaces::browser::BrowserView,
    services::{
        browser_service::{BrowserService, BrowserServiceError},
        session_service::SessionService,
    },
};
use rocket::{get, http::Status, post, put, routes, serde::json::Json, Route, State};

pub fn routes() -> Vec<Route> {
    routes![
        browser_view,
        browser_set_filters,
        browser_set_sort,
        browser_apply,
        browser_reset,
        browser_set_page,
        browser_set_limit,
        browser_retry,
        browser_refresh,
    ]
}

#[get("/")]
async fn browser_view(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service.view(&authenticated.console).await;
    respond(session_service, &authenticated, result).await
}

#[put("/filters", data = "<body>")]
async fn browser_set_filters(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    body: Json<Filters>,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service
        .set_filters(&authenticated.console, body.into_inner())
        .await;
    respond(session_service, &authenticated, result).await
}

#[put("/sort", data = "<body>")]
async fn browser_set_sort(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    body: Json<Sort>,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service
        .set_sort(&authenticated.console, body.into_inner())
        .await;
    respond(session_service, &authenticated, result).await
}

#[post("/apply")]
async fn browser_apply(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service.apply(&authenticated.console).await;
    respond(session_service, &authenticated, result).await
}

#[post("/reset")]
async fn browser_reset(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service.reset_filters(&authenticated.console).await;
    respond(session_service, &authenticated, result).await
}

#[put("/page/<page>")]
async fn browser_set_page(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    page: u32,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service.set_page(&authenticated.console, page).await;
    respond(session_service, &authenticated, result).await
}

#[put("/limit/<limit>")]
async fn browser_set_limit(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
    limit: u32,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service
        .set_limit(&authenticated.console, limit)
        .await;
    respond(session_service, &authenticated, result).await
}

#[post("/retry")]
async fn browser_retry(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service.retry(&authenticated.console).await;
    respond(session_service, &authenticated, result).await
}

#[post("/refresh")]
async fn browser_refresh(
    browser_service: &State<BrowserService>,
    session_service: &State<SessionService>,
    authenticated: Authenticated,
) -> Result<Json<BrowserView>, Status> {
    let result = browser_service.refresh(&authenticated.console).await;
    respond(session_service, &authenticated, result).await
}

async fn respond(
    session_service: &SessionService,
    authenticated: &Authenticated,
    result: Result<BrowserView, BrowserServiceError>,
) -> Result<Json<BrowserView>, Status> {
    match result {
        Ok(view) => Ok(Json(view)),
        Err(BrowserServiceError::SessionInvalid) => Err(expire(session_service, authenticated).await),
        Err(BrowserServiceError::Validation(err)) => {
            log::warn!("rejected browser change: {err}");
            Err(Status::UnprocessableEntity)
        }
    }
}
