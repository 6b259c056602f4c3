use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source package as reported by the package search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub package_id: String,
    pub package_name: String,
    pub package_version: String,
    #[serde(default)]
    pub package_licenses: Vec<String>,
}

impl Package {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        licenses: Vec<String>,
    ) -> Self {
        Self {
            package_id: id.into(),
            package_name: name.into(),
            package_version: version.into(),
            package_licenses: licenses,
        }
    }

    /// Licenses joined with `|`, the way they appear in output rows.
    pub fn joined_licenses(&self) -> String {
        self.package_licenses.join("|")
    }
}
