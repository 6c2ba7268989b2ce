//! Thin HTTP implementations of the repository/actor traits.
//!
//! One JSON call per method, warnings decoded from the
//! `X-Strato-Warnings` response header. Retries, pagination, and token
//! refresh live outside this crate.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{
    ApiError, ApiResponse, Application, ApplicationRepository, Domain, Organization,
    OrganizationActor, Quota, QuotaRepository, Route, RouteRepository, Warnings,
};

const WARNINGS_HEADER: &str = "x-strato-warnings";

/// Shared HTTP plumbing for all repositories: base URL, bearer token,
/// warning-header decoding, and error-body mapping.
pub struct HttpClient {
    base: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base: &str, token: Option<String>) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResponse<T> {
        let mut request = self.http.get(format!("{}{}", self.base, path)).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ApiResponse::fail(ApiError::Unreachable(e.to_string())),
        };

        let warnings = decode_warnings(response.headers());
        let status = response.status();
        if !status.is_success() {
            return ApiResponse::fail(error_from_body(status, response).await)
                .with_warnings(warnings);
        }

        match response.json::<T>().await {
            Ok(value) => ApiResponse::ok(value).with_warnings(warnings),
            Err(e) => ApiResponse::fail(ApiError::Failed(format!(
                "failed to decode the platform response: {e}"
            )))
            .with_warnings(warnings),
        }
    }

    async fn send_no_body(&self, method: Method, path: &str) -> ApiResponse<()> {
        let mut request = self.http.request(method, format!("{}{}", self.base, path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ApiResponse::fail(ApiError::Unreachable(e.to_string())),
        };

        let warnings = decode_warnings(response.headers());
        let status = response.status();
        if !status.is_success() {
            return ApiResponse::fail(error_from_body(status, response).await)
                .with_warnings(warnings);
        }

        ApiResponse::ok(()).with_warnings(warnings)
    }
}

fn decode_warnings(headers: &reqwest::header::HeaderMap) -> Warnings {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|warning| warning.trim().to_string())
        .filter(|warning| !warning.is_empty())
        .collect()
}

async fn error_from_body(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| format!("the platform API responded with status {status}"));
    ApiError::Failed(message)
}

// ── Wire types ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AppList {
    apps: Vec<AppEntry>,
}

#[derive(Deserialize)]
struct AppEntry {
    guid: String,
    name: String,
}

#[derive(Deserialize)]
struct RouteList {
    routes: Vec<RouteEntry>,
}

#[derive(Deserialize)]
struct RouteEntry {
    guid: String,
    host: String,
    domain: DomainEntry,
}

#[derive(Deserialize)]
struct DomainEntry {
    guid: String,
    name: String,
}

#[derive(Deserialize)]
struct QuotaList {
    quotas: Vec<QuotaEntry>,
}

#[derive(Deserialize)]
struct QuotaEntry {
    name: String,
    memory_limit_mb: u64,
    routes_limit: u32,
    services_limit: u32,
    non_basic_services_allowed: bool,
}

#[derive(Deserialize)]
struct OrgList {
    organizations: Vec<OrgEntry>,
}

#[derive(Deserialize)]
struct OrgEntry {
    guid: String,
    name: String,
    quota_name: String,
    #[serde(default)]
    domains: Vec<String>,
}

impl From<AppEntry> for Application {
    fn from(entry: AppEntry) -> Self {
        Application {
            guid: entry.guid,
            name: entry.name,
        }
    }
}

impl From<RouteEntry> for Route {
    fn from(entry: RouteEntry) -> Self {
        Route {
            guid: entry.guid,
            host: entry.host,
            domain: Domain {
                guid: entry.domain.guid,
                name: entry.domain.name,
            },
        }
    }
}

impl From<QuotaEntry> for Quota {
    fn from(entry: QuotaEntry) -> Self {
        Quota {
            name: entry.name,
            memory_limit_mb: entry.memory_limit_mb,
            routes_limit: entry.routes_limit,
            services_limit: entry.services_limit,
            non_basic_services_allowed: entry.non_basic_services_allowed,
        }
    }
}

impl From<OrgEntry> for Organization {
    fn from(entry: OrgEntry) -> Self {
        Organization {
            guid: entry.guid,
            name: entry.name,
            quota_name: entry.quota_name,
            domains: entry.domains,
        }
    }
}

// ── Repositories ──────────────────────────────────────────────────

pub struct HttpApplicationRepository {
    client: Arc<HttpClient>,
}

impl HttpApplicationRepository {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApplicationRepository for HttpApplicationRepository {
    async fn find_by_name(&self, name: &str) -> ApiResponse<Application> {
        let reply: ApiResponse<AppList> =
            self.client.get_json("/v1/apps", &[("name", name)]).await;
        let (value, warnings, error) = reply.into_parts();
        if let Some(error) = error {
            return ApiResponse::fail(error).with_warnings(warnings);
        }
        match value.and_then(|list| list.apps.into_iter().next()) {
            Some(entry) => ApiResponse::ok(entry.into()).with_warnings(warnings),
            None => ApiResponse::fail(ApiError::not_found("Application", name))
                .with_warnings(warnings),
        }
    }
}

pub struct HttpRouteRepository {
    client: Arc<HttpClient>,
}

impl HttpRouteRepository {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RouteRepository for HttpRouteRepository {
    async fn find_by_host_and_domain(&self, host: &str, domain: &str) -> ApiResponse<Route> {
        let reply: ApiResponse<RouteList> = self
            .client
            .get_json("/v1/routes", &[("host", host), ("domain", domain)])
            .await;
        let (value, warnings, error) = reply.into_parts();
        if let Some(error) = error {
            return ApiResponse::fail(error).with_warnings(warnings);
        }
        match value.and_then(|list| list.routes.into_iter().next()) {
            Some(entry) => ApiResponse::ok(entry.into()).with_warnings(warnings),
            None => {
                let label = if host.is_empty() {
                    domain.to_string()
                } else {
                    format!("{host}.{domain}")
                };
                ApiResponse::fail(ApiError::not_found("Route", &label)).with_warnings(warnings)
            }
        }
    }

    async fn bind(&self, route: &Route, app: &Application) -> ApiResponse<()> {
        self.client
            .send_no_body(
                Method::PUT,
                &format!("/v1/apps/{}/routes/{}", app.guid, route.guid),
            )
            .await
    }

    async fn unbind(&self, route: &Route, app: &Application) -> ApiResponse<()> {
        self.client
            .send_no_body(
                Method::DELETE,
                &format!("/v1/apps/{}/routes/{}", app.guid, route.guid),
            )
            .await
    }
}

pub struct HttpQuotaRepository {
    client: Arc<HttpClient>,
}

impl HttpQuotaRepository {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuotaRepository for HttpQuotaRepository {
    async fn find_all(&self) -> ApiResponse<Vec<Quota>> {
        let reply: ApiResponse<QuotaList> = self.client.get_json("/v1/quotas", &[]).await;
        let (value, warnings, error) = reply.into_parts();
        if let Some(error) = error {
            return ApiResponse::fail(error).with_warnings(warnings);
        }
        let quotas = value
            .map(|list| list.quotas.into_iter().map(Quota::from).collect())
            .unwrap_or_default();
        ApiResponse::ok(quotas).with_warnings(warnings)
    }
}

pub struct HttpOrganizationActor {
    client: Arc<HttpClient>,
}

impl HttpOrganizationActor {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrganizationActor for HttpOrganizationActor {
    async fn get_organization(&self, name: &str) -> ApiResponse<Organization> {
        let reply: ApiResponse<OrgList> = self
            .client
            .get_json("/v1/organizations", &[("name", name)])
            .await;
        let (value, warnings, error) = reply.into_parts();
        if let Some(error) = error {
            return ApiResponse::fail(error).with_warnings(warnings);
        }
        match value.and_then(|list| list.organizations.into_iter().next()) {
            Some(entry) => ApiResponse::ok(entry.into()).with_warnings(warnings),
            None => ApiResponse::fail(ApiError::not_found("Org", name)).with_warnings(warnings),
        }
    }
}
