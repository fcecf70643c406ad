//! Query parameters for a contacts listing and their query-string encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}' (expected asc or desc)")),
        }
    }
}

/// One request for a page of contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsQuery {
    /// Free-text search; blank means "everything".
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl ContactsQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn effective_page_size(&self, default_page_size: u32) -> u32 {
        self.page_size.filter(|&s| s > 0).unwrap_or(default_page_size)
    }

    /// Encode as `?k=v&...`, or an empty string when nothing survives.
    ///
    /// Keys appear in a fixed order. Values are trimmed and dropped when
    /// empty. The page size is sent as both `page_size` and `pageSize`.
    pub fn to_query_string(&self, default_page_size: u32) -> String {
        let size = self.effective_page_size(default_page_size).to_string();
        let page = self.page.map(|p| p.to_string());
        let order = self.order.map(SortOrder::as_str);

        let pairs: [(&str, Option<&str>); 6] = [
            ("q", Some(self.q.as_str())),
            ("sort", self.sort.as_deref()),
            ("order", order),
            ("page", page.as_deref()),
            ("page_size", Some(size.as_str())),
            ("pageSize", Some(size.as_str())),
        ];

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        for (key, value) in pairs {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            serializer.append_pair(key, value);
            any = true;
        }

        if any {
            format!("?{}", serializer.finish())
        } else {
            String::new()
        }
    }
}
