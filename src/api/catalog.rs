//! Usage: Institution and scholarship discovery endpoints.

use super::types::{Institution, InstitutionFilter, Scholarship, ScholarshipFilter};
use super::ApiClient;
use crate::shared::error::AppResult;

const INSTITUTIONS_FAILED: &str = "Failed to load institutions";
const INSTITUTION_FAILED: &str = "Failed to load institution";
const SCHOLARSHIPS_FAILED: &str = "Failed to load scholarships";
const SCHOLARSHIP_FAILED: &str = "Failed to load scholarship";
const SAVE_SCHOLARSHIP_FAILED: &str = "Failed to save scholarship";
const SAVED_SCHOLARSHIPS_FAILED: &str = "Failed to load saved scholarships";

impl ApiClient {
    /// Catalog browsing is public; no bearer header is attached.
    pub async fn institutions(&self, filter: &InstitutionFilter) -> AppResult<Vec<Institution>> {
        let builder = self
            .http
            .get(self.url("/api/v1/institutions"))
            .query(&filter.query_pairs());
        self.execute(builder, INSTITUTIONS_FAILED).await
    }

    pub async fn institution(&self, id: i64) -> AppResult<Institution> {
        let builder = self.http.get(self.url(&format!("/api/v1/institutions/{id}")));
        self.execute(builder, INSTITUTION_FAILED).await
    }

    pub async fn scholarships(&self, filter: &ScholarshipFilter) -> AppResult<Vec<Scholarship>> {
        let builder = self
            .http
            .get(self.url("/api/v1/scholarships"))
            .query(&filter.query_pairs());
        self.execute(builder, SCHOLARSHIPS_FAILED).await
    }

    pub async fn scholarship(&self, id: i64) -> AppResult<Scholarship> {
        let builder = self.http.get(self.url(&format!("/api/v1/scholarships/{id}")));
        self.execute(builder, SCHOLARSHIP_FAILED).await
    }

    /// Bookmarks a scholarship on the signed-in profile.
    pub async fn save_scholarship(&self, id: i64) -> AppResult<()> {
        let builder = self.authorized(
            self.http
                .post(self.url(&format!("/api/v1/scholarships/{id}/save"))),
        );
        self.execute_no_body(builder, SAVE_SCHOLARSHIP_FAILED).await
    }

    pub async fn saved_scholarships(&self) -> AppResult<Vec<Scholarship>> {
        let builder = self.authorized(self.http.get(self.url("/api/v1/scholarships/saved")));
        self.execute(builder, SAVED_SCHOLARSHIPS_FAILED).await
    }
}
