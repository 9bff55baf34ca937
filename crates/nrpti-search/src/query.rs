//! # Search Query
//!
//! Bundles keywords, record types, project restriction and pagination into
//! the filter document handed to the external query layer. Nothing here
//! executes a query.

use serde_json::{json, Map, Value};

use nrpti_core::{FlavourKind, RecordType};

use crate::error::SearchError;
use crate::filter::ProjectFilter;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_SORT: &str = "-dateIssued";

/// One search request against master or flavour documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: Option<String>,
    pub record_types: Vec<RecordType>,
    /// Search a site's flavour documents instead of masters.
    pub flavour: Option<FlavourKind>,
    pub projects: ProjectFilter,
    pub page_num: u32,
    pub page_size: u32,
    /// Field name, prefixed with `-` for descending order.
    pub sort_by: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keywords: None,
            record_types: Vec::new(),
            flavour: None,
            projects: ProjectFilter::none(),
            page_num: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT.to_string(),
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        let keywords = keywords.into();
        self.keywords = (!keywords.trim().is_empty()).then(|| keywords.trim().to_string());
        self
    }

    pub fn with_record_types(mut self, types: impl IntoIterator<Item = RecordType>) -> Self {
        self.record_types = types.into_iter().collect();
        self
    }

    /// Parse a comma-separated record type parameter such as
    /// `"Order,Inspection"`. Empty items are skipped; duplicates keep their
    /// first position.
    pub fn parse_record_types(raw: &str) -> Result<Vec<RecordType>, SearchError> {
        let mut types = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let rt: RecordType = item.parse()?;
            if !types.contains(&rt) {
                types.push(rt);
            }
        }
        Ok(types)
    }

    pub fn with_flavour(mut self, flavour: FlavourKind) -> Self {
        self.flavour = Some(flavour);
        self
    }

    pub fn with_projects(mut self, projects: ProjectFilter) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_page(mut self, page_num: u32, page_size: u32) -> Self {
        self.page_num = page_num;
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Schema names the query is restricted to. Record types the selected
    /// flavour does not support are dropped. A flavour with no record types
    /// covers every record type published to that site.
    pub fn schema_names(&self) -> Vec<String> {
        let record_types: &[RecordType] = match self.flavour {
            Some(_) if self.record_types.is_empty() => RecordType::all(),
            _ => &self.record_types,
        };
        record_types
            .iter()
            .filter_map(|rt| match self.flavour {
                None => Some(rt.as_str().to_string()),
                Some(f) if rt.supports(f) => Some(f.schema_name(*rt)),
                Some(_) => None,
            })
            .collect()
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(SearchError::InvalidPageSize {
                size: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        let field = self.sort_by.strip_prefix(['-', '+']).unwrap_or(&self.sort_by);
        let valid = !field.is_empty()
            && field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            return Err(SearchError::InvalidSort(self.sort_by.clone()));
        }
        Ok(())
    }

    /// The filter document for the query layer.
    ///
    /// ```json
    /// {
    ///   "filter": { "$and": [ { "_schemaName": { "$in": [...] } }, { "$or": [...] } ] },
    ///   "keywords": "spill",
    ///   "pageNum": 0, "pageSize": 25, "sortBy": "-dateIssued"
    /// }
    /// ```
    ///
    /// `filter` is `{}` when nothing restricts the search.
    pub fn to_document(&self) -> Result<Value, SearchError> {
        self.validate()?;

        let mut clauses = Vec::new();
        let flavour_scoped = self.flavour.is_some();
        if !self.record_types.is_empty() || flavour_scoped {
            clauses.push(json!({ "_schemaName": { "$in": self.schema_names() } }));
        }
        if let Some(clause) = self.projects.to_clause() {
            clauses.push(clause);
        }

        let filter = match clauses.len() {
            0 => Value::Object(Map::new()),
            1 => clauses.remove(0),
            _ => json!({ "$and": clauses }),
        };

        let mut doc = Map::new();
        doc.insert("filter".to_string(), filter);
        if let Some(keywords) = &self.keywords {
            doc.insert("keywords".to_string(), json!(keywords));
        }
        doc.insert("pageNum".to_string(), json!(self.page_num));
        doc.insert("pageSize".to_string(), json!(self.page_size));
        doc.insert("sortBy".to_string(), json!(self.sort_by));
        Ok(Value::Object(doc))
    }
}
