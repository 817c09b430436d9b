use std::sync::Arc;
use reqwest::Method;
use tracing::debug;

use shared_api::ApiClient;
use shared_models::error::ClientError;
use shared_models::pagination::Paginated;

use crate::models::{Doctor, DoctorQuery};

pub struct DoctorService {
    api: Arc<ApiClient>,
}

impl DoctorService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// One page of the doctor directory.
    pub async fn list_doctors(&self, query: &DoctorQuery) -> Result<Paginated<Doctor>, ClientError> {
        debug!("Listing doctors with query: {:?}", query);

        let page: Paginated<Doctor> = self
            .api
            .request(Method::GET, "/doctors", &query.to_query_pairs(), None)
            .await?;

        debug!(
            "Received {} doctors (page {} of {})",
            page.data.len(),
            page.pagination.current_page,
            page.pagination.total_pages
        );
        Ok(page)
    }

    pub async fn list_specializations(&self) -> Result<Vec<String>, ClientError> {
        debug!("Fetching specializations");
        self.api.request(Method::GET, "/specializations", &[], None).await
    }
}
