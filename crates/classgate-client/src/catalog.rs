//! Course catalog client

use classgate_api::{CourseRecord, ListEnvelope};

use crate::{ApiClient, ClientResult};

/// Fetches available and enrolled courses
#[derive(Debug, Clone)]
pub struct CourseCatalogClient {
    api: ApiClient,
}

impl CourseCatalogClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /api/courses`
    pub async fn available_courses(&self) -> ClientResult<Vec<CourseRecord>> {
        let courses: ListEnvelope<CourseRecord> = self.api.get_json(&["api", "courses"]).await?;
        Ok(courses.into_vec())
    }

    /// `GET /api/user/student/my-courses`
    pub async fn my_courses(&self) -> ClientResult<Vec<CourseRecord>> {
        let courses: ListEnvelope<CourseRecord> = self
            .api
            .get_json(&["api", "user", "student", "my-courses"])
            .await?;
        Ok(courses.into_vec())
    }
}
