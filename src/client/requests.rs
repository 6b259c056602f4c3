use serde::Serialize;

use crate::config::{PackageSearchQuery, TopCvssQuery};
use crate::model::Severity;

#[derive(Serialize)]
pub(super) struct TopCvssRequest<'a> {
    repositories: &'a [String],
    severities: &'a [Severity],
    size: u32,
}

impl<'a> From<&'a TopCvssQuery> for TopCvssRequest<'a> {
    fn from(query: &'a TopCvssQuery) -> Self {
        Self {
            repositories: &query.repositories,
            severities: &query.severities,
            size: query.size,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PackageSearchRequest<'a> {
    q: &'static str,
    repositories: [&'a str; 1],
    statuses: &'a [String],
    include: &'a [String],
    sort_by: &'a [String],
    filter: SearchFilter,
    limit: u32,
    offset: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchFilter {
    fixable_only: bool,
}

impl<'a> PackageSearchRequest<'a> {
    pub(super) fn new(repo_id: &'a str, query: &'a PackageSearchQuery) -> Self {
        Self {
            q: "",
            repositories: [repo_id],
            statuses: &query.statuses,
            include: &query.include,
            sort_by: &query.sort_by,
            filter: SearchFilter {
                fixable_only: query.fixable_only,
            },
            limit: query.limit,
            offset: 0,
        }
    }
}
