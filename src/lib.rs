mod auth;
pub mod client;
mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use crate::service::token::TokenService;
use rocket::{Build, Rocket, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid CORS configuration: {0}")]
    Cors(String),
    #[error("could not merge OpenAPI spec: {0}")]
    OpenApi(String),
}

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=info,agriconnect::routes=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // A subscriber may already be installed (tests build several rockets).
    let _ = if json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
}

fn build_cors(cors_config: &config::CorsConfig) -> Result<CorsOptions, BuildError> {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        return Err(BuildError::Cors(
            "wildcard origins (*) cannot be combined with credentials".to_string(),
        ));
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    Ok(CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Authorization", "X-Client-Info", "Apikey", "Content-Type"]),
        allow_credentials: cors_config.allow_credentials,
        send_wildcard: is_wildcard,
        ..Default::default()
    })
}

fn get_swagger_config(openapi_url: &str) -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: openapi_url.to_string(),
        ..Default::default()
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

fn collect_base_paths(api_config: &config::ApiConfig) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    let mut push_unique = |path: String| {
        if !normalized.contains(&path) {
            normalized.push(path);
        }
    };

    push_unique(normalize_base_path(&api_config.base_path));
    for extra in &api_config.additional_base_paths {
        push_unique(normalize_base_path(extra));
    }

    normalized
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
    openapi: rocket_okapi::okapi::openapi3::OpenApi,
}

fn collect_route_specs() -> Vec<RouteSpec> {
    let (listing_routes, listing_openapi) = app_routes::listing::routes();
    let (profile_routes, profile_openapi) = app_routes::profile::routes();
    let (auth_routes, auth_openapi) = app_routes::auth::routes();
    let (health_routes, health_openapi) = app_routes::health::routes();

    vec![
        RouteSpec {
            path: "/listings",
            routes: listing_routes,
            openapi: listing_openapi,
        },
        RouteSpec {
            path: "/profiles",
            routes: profile_routes,
            openapi: profile_openapi,
        },
        RouteSpec {
            path: "/auth",
            routes: auth_routes,
            openapi: auth_openapi,
        },
        RouteSpec {
            path: "/health",
            routes: health_routes,
            openapi: health_openapi,
        },
    ]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Result<Rocket<Build>, BuildError> {
    let route_specs = collect_route_specs();

    if !enable_swagger {
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
        }
        return Ok(rocket);
    }

    let mut openapi_list = Vec::new();
    for spec in route_specs {
        rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
        openapi_list.push((spec.path, spec.openapi));
    }

    let openapi_docs = marge_spec_list(&openapi_list).map_err(|err| BuildError::OpenApi(err.to_string()))?;

    let settings = rocket_okapi::settings::OpenApiSettings::default();
    rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

    let docs_path = join_base_path(base_path, "docs");
    let openapi_url = join_base_path(base_path, "openapi.json");
    Ok(rocket.mount(docs_path, make_swagger_ui(&get_swagger_config(&openapi_url))))
}

/// Attaches CORS and request logging, mounts every API under each base path and registers
/// the JSON catchers. The caller provides the database pool and token service.
pub(crate) fn assemble(rocket: Rocket<Build>, config: &Config) -> Result<Rocket<Build>, BuildError> {
    let cors = build_cors(&config.cors)?.to_cors().map_err(|err| BuildError::Cors(err.to_string()))?;

    let mut rocket = rocket.attach(cors).attach(RequestLogger);

    for base_path in collect_base_paths(&config.api) {
        rocket = mount_api_routes(rocket, &base_path, config.api.enable_swagger)?;
        rocket = rocket.register(base_path.as_str(), app_routes::error::catchers());
    }

    Ok(rocket)
}

pub fn build_rocket(config: Config) -> Result<Rocket<Build>, BuildError> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    let tokens = TokenService::from_config(&config.auth);
    let rocket = rocket::custom(figment).attach(stage_db(config.database.clone())).manage(tokens);

    assemble(rocket, &config)
}
