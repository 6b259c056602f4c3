//! Core data types for packages, CVEs, and flattened vulnerability records.
//!
//! - [`Package`] - A source package returned by the package search
//! - [`Cve`] - A CVE attached to a package
//! - [`VulnerabilityRecord`] - One row of output per (package, CVE) pair
//! - [`Severity`] - Severity levels used in query filters
//!
//! # Example
//!
//! ```
//! use prisma_sbom::model::{Cve, Package, VulnerabilityRecord};
//!
//! let package = Package::new("pkg-1", "lodash", "4.17.20", vec!["MIT".to_string()]);
//! let cve = Cve {
//!     cve_id: "CVE-2021-23337".to_string(),
//!     cvss: Some(7.2),
//!     cve_status: "OPEN".to_string(),
//!     severity: "HIGH".to_string(),
//!     source_id: "src-1".to_string(),
//!     resource_id: "res-1".to_string(),
//! };
//!
//! let records = VulnerabilityRecord::flatten(&package, vec![cve]);
//! assert_eq!(records.len(), 1);
//! ```

mod package;
mod vulnerability;

pub use package::*;
pub use vulnerability::*;
