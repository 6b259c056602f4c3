//! HTTP client for the Prisma Cloud Code Security API.
//!
//! Requests are issued one at a time. Each operation asks the
//! [`TokenProvider`] for a token first, so a token that is still fresh is
//! reused across operations and a stale one is refreshed transparently.

mod http;
mod requests;

pub(crate) use http::send_json;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::TokenProvider;
use crate::config::{PackageSearchQuery, TopCvssQuery};
use crate::error::{Error, Result};
use crate::model::{Cve, Package, VulnerabilityRecord};
use requests::{PackageSearchRequest, TopCvssRequest};

/// API paths, relative to the regional base URL.
pub mod endpoints {
    pub const LOGIN: &str = "/login";
    pub const TOP_CVSS: &str = "/code/api/v2/dashboard/top-cvss";
    pub const REPOSITORIES: &str = "/code/api/v1/repositories";
    pub const PACKAGE_SEARCH: &str = "/bridgecrew/api/v1/vulnerabilities/packages/search";

    pub fn package_cves(package_id: &str) -> String {
        format!("/code/api/v1/vulnerabilities/packages/{}/cves", package_id)
    }
}

/// Builds the base URL for a regional API host, e.g. `api.gov` or `api2`.
pub fn base_url_for(endpoint: &str) -> String {
    format!("https://{}.prismacloud.io", endpoint)
}

#[derive(Deserialize)]
struct DataResponse<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct PackageSearchResponse {
    packages: Vec<Package>,
}

pub struct PrismaClient {
    http: reqwest::Client,
    base_url: String,
    auth: Box<dyn TokenProvider>,
}

impl PrismaClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        auth: Box<dyn TokenProvider>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Builds the underlying reqwest client. No timeout unless one is given.
    pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(Error::HttpClient)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<RequestBuilder> {
        let token = self.auth.acquire().await?;
        Ok(self
            .http
            .get(self.url(path))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, token.as_str()))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<RequestBuilder> {
        let token = self.auth.acquire().await?;
        Ok(self
            .http
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, token.as_str())
            .json(body))
    }

    /// Dashboard query for the highest-CVSS findings. Returns the `data`
    /// entries untouched.
    pub async fn top_cvss(&self, query: &TopCvssQuery) -> Result<Vec<serde_json::Value>> {
        let body = TopCvssRequest::from(query);
        let request = self.post(endpoints::TOP_CVSS, &body).await?;
        let response: DataResponse<serde_json::Value> =
            send_json(endpoints::TOP_CVSS, request).await?;
        debug!(entries = response.data.len(), "top-cvss entries received");
        Ok(response.data)
    }

    /// The full repository listing, as returned by the platform.
    pub async fn list_repositories(&self) -> Result<serde_json::Value> {
        let request = self.get(endpoints::REPOSITORIES).await?;
        send_json(endpoints::REPOSITORIES, request).await
    }

    /// First page of packages with open vulnerabilities in a repository.
    pub async fn search_packages(
        &self,
        repo_id: &str,
        query: &PackageSearchQuery,
    ) -> Result<Vec<Package>> {
        let body = PackageSearchRequest::new(repo_id, query);
        let request = self.post(endpoints::PACKAGE_SEARCH, &body).await?;
        let response =
            match send_json::<PackageSearchResponse>(endpoints::PACKAGE_SEARCH, request).await {
                Err(Error::UnexpectedStatus { status: 404, .. }) => {
                    return Err(Error::RepoNotFound(repo_id.to_string()))
                }
                other => other?,
            };

        let count = response.packages.len();
        info!(repo_id, packages = count, "package search complete");
        if query.limit > 0 && count >= query.limit as usize {
            warn!(
                repo_id,
                limit = query.limit,
                "package search returned a full page; packages beyond it are not listed"
            );
        }
        Ok(response.packages)
    }

    pub async fn package_cves(&self, package_id: &str) -> Result<Vec<Cve>> {
        let path = endpoints::package_cves(package_id);
        let request = self.get(&path).await?;
        let response: DataResponse<Cve> = send_json(&path, request).await?;
        Ok(response.data)
    }

    /// Searches a repository's packages, then fetches each package's CVEs in
    /// turn. Every record is handed to `on_record` as soon as it exists, and
    /// all of them are returned at the end.
    pub async fn code_issues<F>(
        &self,
        repo_id: &str,
        query: &PackageSearchQuery,
        mut on_record: F,
    ) -> Result<Vec<VulnerabilityRecord>>
    where
        F: FnMut(&VulnerabilityRecord) -> Result<()>,
    {
        let packages = self.search_packages(repo_id, query).await?;
        let mut records = Vec::new();

        for package in &packages {
            let cves = self.package_cves(&package.package_id).await?;
            debug!(
                package = %package.package_name,
                version = %package.package_version,
                cves = cves.len(),
                "package cves received"
            );
            for record in VulnerabilityRecord::flatten(package, cves) {
                on_record(&record)?;
                records.push(record);
            }
        }

        Ok(records)
    }
}
