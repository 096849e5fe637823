#![forbid(unsafe_code)]

mod browser;
mod config;
mod forms;
mod guards;
mod interfaces;
mod remote;
mod routes;
mod services;

use config::ConsoleConfig;
use remote::{
    api_client::{ApiClient, ApiClientError},
    repositories::{resources::ResourceRepository, users::UserRepository},
};
use rocket::{fairing::AdHoc, Build, Rocket};
use services::{
    auth_service::AuthService,
    browser_service::BrowserService,
    resource_service::ResourceService,
    session_service::{BrowserSettings, SessionService},
};
use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
};

#[rocket::launch]
fn rocket() -> _ {
    dotenvy::dotenv().ok();

    let config = ConsoleConfig::init().expect("failed to load console configuration");

    stage(&config).expect("failed to initialize resource api client")
}

/// Wires the services for `config` into an unlaunched rocket.
pub fn stage(config: &ConsoleConfig) -> Result<Rocket<Build>, ApiClientError> {
    let api_client = ApiClient::init(config)?;
    let resource_repository = ResourceRepository::new(api_client.clone());

    let auth_service = AuthService::new(UserRepository::new(api_client));
    let resource_service = ResourceService::new(resource_repository.clone());
    let session_service = SessionService::new(
        Arc::new(resource_repository),
        BrowserSettings {
            apply_mode: config.apply_mode,
            cache_mode: config.cache_mode,
            default_limit: config.default_limit,
        },
        config.session_ttl,
    );
    let browser_service = BrowserService::new();

    let rocket_config = rocket::Config {
        address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        port: config.port,
        ..rocket::Config::default()
    };
    let api_url = config.api_url.clone();
    let (apply_mode, cache_mode) = (config.apply_mode, config.cache_mode);
    let rocket = rocket::custom(&rocket_config)
        .attach(AdHoc::on_liftoff("Resource API", move |_| {
            Box::pin(async move {
                log::info!(
                    "serving resources from `{api_url}` ({apply_mode:?} apply mode, cache {cache_mode:?})"
                );
            })
        }))
        .manage(auth_service)
        .manage(browser_service)
        .manage(resource_service)
        .manage(session_service);

    Ok(routes::register_root(rocket))
}
