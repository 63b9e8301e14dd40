use crate::client::workspace::{CONFIG_FILE, DATABASE_FILE};
use crate::config::Config;
use crate::ops::SearchService;
use crate::time::{Bound, parse_bound};
use crate::Result;
use sessionseek_engine::{PageRequest, check_row_window};
use sessionseek_index::{Database, QueryBuilder, SearchPlan};
use sessionseek_types::{GroupedResults, MatchRow, Role, SearchFilters, SearchScope};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point for queries against a workspace.
///
/// Cheap to clone and safe to share between threads: every call opens a
/// read-only connection of its own and drops it before returning, on the
/// error path too.
#[derive(Clone)]
pub struct SearchOps {
    db_path: PathBuf,
    config: Arc<Config>,
}

impl SearchOps {
    pub fn new(db_path: PathBuf, config: Arc<Config>) -> Self {
        Self { db_path, config }
    }

    /// Search the workspace in `data_dir` without opening it for writing.
    ///
    /// Nothing on disk is created or changed. A missing index surfaces on
    /// the first query as [`ErrorKind::IndexUnavailable`](crate::ErrorKind).
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let config = Config::load_from(&data_dir.join(CONFIG_FILE))?;
        Ok(Self::new(data_dir.join(DATABASE_FILE), Arc::new(config)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Page size to use when the caller has none.
    pub fn default_page_size(&self) -> i64 {
        self.config.search.sessions_per_page
    }

    /// Sessions matching `query`, newest match first, one page at a time.
    ///
    /// Page parameters are validated before any connection is opened.
    pub fn search_grouped_by_session(
        &self,
        query: &str,
        scope: SearchScope,
        filters: &SearchFilters,
        sessions_per_page: i64,
        page: i64,
    ) -> Result<GroupedResults> {
        let request = PageRequest::new(page, sessions_per_page)?;
        let plan = self.plan(query, scope, filters, None)?;

        let db = self.open_reader()?;
        let results = SearchService::new(&db).grouped(&plan, request)?;

        if results.has_more && results.len() as i64 != sessions_per_page {
            warn!(
                sessions = results.len(),
                sessions_per_page, "short page reported more results"
            );
        }
        info!(
            scope = scope.as_str(),
            page,
            sessions_per_page,
            sessions = results.len(),
            total_sessions = results.total_sessions,
            has_more = results.has_more,
            "grouped search complete"
        );
        Ok(results)
    }

    /// Same as [`search_grouped_by_session`](Self::search_grouped_by_session)
    /// with the scope given by name.
    pub fn search_grouped_by_scope_name(
        &self,
        query: &str,
        scope: &str,
        filters: &SearchFilters,
        sessions_per_page: i64,
        page: i64,
    ) -> Result<GroupedResults> {
        let scope: SearchScope = scope.parse()?;
        self.search_grouped_by_session(query, scope, filters, sessions_per_page, page)
    }

    /// Matching records without grouping, most relevant first.
    ///
    /// `role` narrows message rows only; tool rows ignore it.
    pub fn search_records(
        &self,
        query: &str,
        scope: SearchScope,
        filters: &SearchFilters,
        role: Option<Role>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MatchRow>> {
        check_row_window(limit, offset)?;
        let plan = self.plan(query, scope, filters, role)?;

        let db = self.open_reader()?;
        SearchService::new(&db).records(&plan, limit, offset)
    }

    /// Number of records in one session matching `query` under scope and filters.
    pub fn count_matches_in_session(
        &self,
        query: &str,
        session_id: &str,
        scope: SearchScope,
        filters: &SearchFilters,
    ) -> Result<usize> {
        let plan = self.plan(query, scope, filters, None)?;

        let db = self.open_reader()?;
        SearchService::new(&db).count_in_session(&plan, session_id)
    }

    /// Distinct tool names, ascending.
    pub fn list_tool_names(&self) -> Result<Vec<String>> {
        let db = self.open_reader()?;
        SearchService::new(&db).tool_names()
    }

    fn plan(
        &self,
        query: &str,
        scope: SearchScope,
        filters: &SearchFilters,
        role: Option<Role>,
    ) -> Result<SearchPlan> {
        let filters = normalize_filters(filters)?;
        Ok(QueryBuilder::new(query, scope)
            .filters(&filters)
            .role(role)
            .build())
    }

    fn open_reader(&self) -> Result<Database> {
        let db = Database::open_read_only(&self.db_path)?
            .with_capabilities(self.config.capabilities())
            .with_snippet_options(self.config.snippet_options());
        Ok(db)
    }
}

/// Bring time bounds into millisecond UTC form.
fn normalize_filters(filters: &SearchFilters) -> Result<SearchFilters> {
    let mut normalized = filters.clone();
    normalized.start_time = filters
        .start_time
        .as_deref()
        .map(|t| parse_bound(t, Bound::Start))
        .transpose()?;
    normalized.end_time = filters
        .end_time
        .as_deref()
        .map(|t| parse_bound(t, Bound::End))
        .transpose()?;
    Ok(normalized)
}
