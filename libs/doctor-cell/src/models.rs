use serde::{Deserialize, Serialize};

use shared_utils::validation::non_empty;

pub const DEFAULT_PAGE_SIZE: u32 = 9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        if self.name.starts_with("Dr.") {
            self.name.clone()
        } else {
            format!("Dr. {}", self.name)
        }
    }
}

/// Parameters of one page of the doctor directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub specialization: Option<String>,
}

impl Default for DoctorQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            specialization: None,
        }
    }
}

impl DoctorQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = non_empty(term);
        self
    }

    pub fn specialization(mut self, specialization: Option<&str>) -> Self {
        self.specialization = non_empty(specialization);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(search) = non_empty(self.search.as_deref()) {
            pairs.push(("search", search));
        }
        if let Some(specialization) = non_empty(self.specialization.as_deref()) {
            pairs.push(("specialization", specialization));
        }
        pairs
    }
}
