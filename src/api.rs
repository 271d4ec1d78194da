//! REST client for the school records API.
//!
//! Every call is a plain `async fn` so the app can hand it to `Task::perform`.
//! Authorized calls take the bearer token read from the session at the moment
//! the user acted; login and register are the only unauthenticated endpoints.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::ApiError;
use crate::model::{
    Assignment, Credentials, EntityId, ErrorResponse, Grade, GradeUpdate, IdBody, NewGrade,
    NewStudent, NewSubject, Student, Subject, SubjectUpdate, TokenResponse,
};
use crate::session::AuthMode;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    grades_upsert_path: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            grades_upsert_path: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            grades_upsert_path: config.grades_upsert_path.clone(),
        })
    }

    pub fn with_grades_upsert(mut self, path: impl Into<String>) -> Self {
        self.grades_upsert_path = Some(path.into());
        self
    }

    pub fn supports_grade_upsert(&self) -> bool {
        self.grades_upsert_path.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, method: Method, path: &str, token: Option<&str>) -> Result<RequestBuilder, ApiError> {
        let token = token.ok_or(ApiError::MissingCredential)?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    // --- auth ---

    /// Posts credentials to the mode-specific endpoint and returns the issued token.
    pub async fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> Result<String, ApiError> {
        let path = match mode {
            AuthMode::Login => "auth/login",
            AuthMode::Register => "auth/register",
        };
        let response = self.http.post(self.url(path)).json(&credentials).send().await?;
        let body: TokenResponse = decode(response).await?;
        Ok(body.token)
    }

    // --- collections ---

    pub async fn list_students(&self, token: Option<String>) -> Result<Vec<Student>, ApiError> {
        self.fetch("students", token.as_deref()).await
    }

    pub async fn list_subjects(&self, token: Option<String>) -> Result<Vec<Subject>, ApiError> {
        self.fetch("subjects", token.as_deref()).await
    }

    pub async fn list_grades(&self, token: Option<String>) -> Result<Vec<Grade>, ApiError> {
        self.fetch("grades", token.as_deref()).await
    }

    // --- students ---

    pub async fn create_student(&self, token: Option<String>, student: NewStudent) -> Result<Student, ApiError> {
        self.send_json(Method::POST, "students/create", token.as_deref(), &student).await
    }

    pub async fn update_student(&self, token: Option<String>, student: Student) -> Result<Student, ApiError> {
        self.send_json(Method::PUT, "students/update", token.as_deref(), &student).await
    }

    pub async fn delete_student(&self, token: Option<String>, id: EntityId) -> Result<EntityId, ApiError> {
        self.send_ignored(Method::DELETE, "students/delete", token.as_deref(), &IdBody { id }).await?;
        Ok(id)
    }

    // --- subjects ---

    pub async fn create_subject(&self, token: Option<String>, subject: NewSubject) -> Result<Subject, ApiError> {
        self.send_json(Method::POST, "subjects/create", token.as_deref(), &subject).await
    }

    pub async fn update_subject(&self, token: Option<String>, subject: SubjectUpdate) -> Result<Subject, ApiError> {
        self.send_json(Method::PUT, "subjects/update", token.as_deref(), &subject).await
    }

    pub async fn delete_subject(&self, token: Option<String>, id: EntityId) -> Result<EntityId, ApiError> {
        self.send_ignored(Method::DELETE, "subjects/delete", token.as_deref(), &IdBody { id }).await?;
        Ok(id)
    }

    /// Replaces the full set of students assigned to a subject.
    pub async fn assign_subject(&self, token: Option<String>, assignment: Assignment) -> Result<Assignment, ApiError> {
        self.send_ignored(Method::POST, "subjects/assign", token.as_deref(), &assignment).await?;
        Ok(assignment)
    }

    // --- grades ---

    pub async fn create_grade(&self, token: Option<String>, grade: NewGrade) -> Result<Grade, ApiError> {
        self.send_json(Method::POST, "grades/create", token.as_deref(), &grade).await
    }

    pub async fn update_grade(&self, token: Option<String>, grade: GradeUpdate) -> Result<Grade, ApiError> {
        self.send_json(Method::PUT, "grades/update", token.as_deref(), &grade).await
    }

    /// Match-or-create on (studentId, subjectId). Only available when the
    /// server exposes an upsert endpoint, see `Config::grades_upsert_path`.
    pub async fn upsert_grade(&self, token: Option<String>, grade: NewGrade) -> Result<Grade, ApiError> {
        let path = self
            .grades_upsert_path
            .clone()
            .ok_or(ApiError::Unsupported("grade upsert"))?;
        self.send_json(Method::POST, &path, token.as_deref(), &grade).await
    }

    pub async fn delete_grade(&self, token: Option<String>, id: EntityId) -> Result<EntityId, ApiError> {
        self.send_ignored(Method::DELETE, "grades/delete", token.as_deref(), &IdBody { id }).await?;
        Ok(id)
    }

    // --- plumbing ---

    async fn fetch<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError> {
        let response = self.authorized(Method::GET, path, token)?.send().await?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.authorized(method, path, token)?.json(body).send().await?;
        decode(response).await
    }

    async fn send_ignored<B>(&self, method: Method, path: &str, token: Option<&str>, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.authorized(method, path, token)?.json(body).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.error);
    Err(ApiError::Status { status: status.as_u16(), message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/students"), "http://localhost:8080/students");
        assert_eq!(client.url("grades/create"), "http://localhost:8080/grades/create");
    }

    #[tokio::test]
    async fn authorized_call_without_token_is_not_sent() {
        // Port 9 (discard) would refuse; MissingCredential proves no request went out.
        let client = ApiClient::new("http://127.0.0.1:9");
        assert_eq!(client.list_students(None).await, Err(ApiError::MissingCredential));
        assert_eq!(client.delete_grade(None, 4).await, Err(ApiError::MissingCredential));
    }

    #[tokio::test]
    async fn upsert_requires_configured_endpoint() {
        let client = ApiClient::new("http://127.0.0.1:9");
        assert!(!client.supports_grade_upsert());
        let err = client
            .upsert_grade(Some("t".into()), NewGrade { value: 1.0, student_id: 1, subject_id: 1 })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Unsupported("grade upsert"));
        assert_eq!(err.user_message(), crate::error::GENERIC_FAILURE);
    }
}
