use serde::{Deserialize, Serialize};

use super::Package;

/// A CVE as returned by the per-package CVE endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cve {
    pub cve_id: String,
    pub cvss: Option<f64>,
    pub cve_status: String,
    pub severity: String,
    pub source_id: String,
    pub resource_id: String,
}

/// One output row: a package joined with one of its CVEs.
///
/// Field order here is the order keys appear when a record is printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityRecord {
    pub package_name: String,
    pub package_version: String,
    pub package_licenses: String,
    pub package_id: String,
    pub cve_id: String,
    pub cvss: Option<f64>,
    pub cve_status: String,
    pub severity: String,
    pub source_id: String,
    pub resource_id: String,
}

impl VulnerabilityRecord {
    pub fn new(package: &Package, cve: Cve) -> Self {
        Self {
            package_name: package.package_name.clone(),
            package_version: package.package_version.clone(),
            package_licenses: package.joined_licenses(),
            package_id: package.package_id.clone(),
            cve_id: cve.cve_id,
            cvss: cve.cvss,
            cve_status: cve.cve_status,
            severity: cve.severity,
            source_id: cve.source_id,
            resource_id: cve.resource_id,
        }
    }

    /// Produces one record per CVE, in the order the CVEs were given.
    pub fn flatten(package: &Package, cves: Vec<Cve>) -> Vec<Self> {
        cves.into_iter().map(|cve| Self::new(package, cve)).collect()
    }
}
