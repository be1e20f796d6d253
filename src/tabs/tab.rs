//! Tab (view configuration) model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single filter clause as stored in a tab.
///
/// `filter` has the form `<namespace>:<target>:<field>`. `operator` stays a
/// plain string here; it is parsed when the filter is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub filter: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

impl FilterClause {
    pub fn new(filter: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            filter: filter.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// A saved, named combination of filters, ordering and pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Overwritten by the store on save, so request bodies may omit it
    #[serde(default)]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "hiddenColumns", default)]
    pub hidden_columns: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterClause>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conjunction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,

    /// Frontend keys the engine does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tab {
    /// A bare tab carrying only its id
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: None,
            hidden_columns: None,
            filters: None,
            conjunction: None,
            ordering: None,
            page: None,
            page_size: None,
            extra: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_filter(mut self, clause: FilterClause) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(clause);
        self
    }

    pub fn with_conjunction(mut self, conjunction: impl Into<String>) -> Self {
        self.conjunction = Some(conjunction.into());
        self
    }

    pub fn with_ordering<I, S>(mut self, ordering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ordering = Some(ordering.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Filter clauses, empty when none are configured
    pub fn filter_clauses(&self) -> &[FilterClause] {
        self.filters.as_deref().unwrap_or(&[])
    }

    /// Ordering directives, empty when none are configured
    pub fn ordering_directives(&self) -> &[String] {
        self.ordering.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frontend_shape() {
        let tab: Tab = serde_json::from_value(json!({
            "id": 2,
            "title": "Review",
            "hiddenColumns": {"explore": ["tasks:data.image"]},
            "filters": [{"filter": "filter:tasks:id", "operator": "greater", "value": 3}],
            "conjunction": "and",
            "ordering": ["-tasks:completed_at"],
            "selectedItems": []
        }))
        .unwrap();

        assert_eq!(tab.id, 2);
        assert_eq!(tab.filter_clauses().len(), 1);
        assert_eq!(tab.ordering_directives(), ["-tasks:completed_at"]);
        assert_eq!(tab.extra["selectedItems"], json!([]));

        let back = serde_json::to_value(&tab).unwrap();
        assert_eq!(back["hiddenColumns"]["explore"][0], "tasks:data.image");
        assert_eq!(back["selectedItems"], json!([]));
    }

    #[test]
    fn test_bare_tab_serializes_null_hidden_columns() {
        let value = serde_json::to_value(Tab::new(5)).unwrap();
        assert_eq!(value, json!({"id": 5, "hiddenColumns": null}));
    }

    #[test]
    fn test_clause_value_defaults_to_null() {
        let clause: FilterClause =
            serde_json::from_value(json!({"filter": "f:tasks:data.x", "operator": "empty"}))
                .unwrap();
        assert_eq!(clause.value, Value::Null);
    }
}
