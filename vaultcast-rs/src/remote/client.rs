//! Blocking HTTP client for the Discourse API.

use super::error::{classify, is_success, RemoteError};
use super::types::{CreatedTopic, SiteCategory, SiteInfo, UploadResponse, UploadedFile};
use super::{ForumApi, RemoteResult};
use crate::config::RemoteSettings;
use crate::error::{Result, SyncError};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::Path;
use tracing::debug;

const USER_AGENT: &str = concat!("vaultcast/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 5;

/// HTTP client authenticated with an API key.
#[derive(Clone)]
pub struct DiscourseClient {
    http: Client,
    base_url: String,
}

impl DiscourseClient {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("api-key", header_value("api key", &settings.api_key)?);
        headers.insert("api-username", header_value("api username", &settings.api_username)?);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(RemoteError::from)?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl ForumApi for DiscourseClient {
    fn create_topic(&self, title: &str, raw: &str, category: i64) -> RemoteResult<CreatedTopic> {
        debug!(title, category, "POST /posts.json");
        let body = json!({
            "title": title,
            "raw": raw,
            "category": category,
            "skip_validations": true,
        });
        let response = self.http.post(self.url("/posts.json")).json(&body).send()?;
        read_json(response)
    }

    fn update_post(&self, post_id: i64, raw: &str) -> RemoteResult<()> {
        debug!(post_id, "PUT /posts/{{id}}.json");
        let body = json!({ "post": { "raw": raw } });
        let response = self
            .http
            .put(self.url(&format!("/posts/{}.json", post_id)))
            .json(&body)
            .send()?;
        check_status(response).map(|_| ())
    }

    fn upload_file(&self, path: &Path) -> RemoteResult<UploadedFile> {
        debug!(path = %path.display(), "POST /uploads.json");
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let bytes = std::fs::read(path).map_err(|e| {
            RemoteError::Transport(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        let form = Form::new()
            .text("type", "composer")
            .text("synchronous", "true")
            .part("file", part);

        let response = self.http.post(self.url("/uploads.json")).multipart(form).send()?;
        let (status, body) = read_body(response)?;
        upload_result(status, &body)
    }

    fn fetch_site_categories(&self) -> RemoteResult<Vec<SiteCategory>> {
        debug!("GET /site.json");
        let response = self.http.get(self.url("/site.json")).send()?;
        let site: SiteInfo = read_json(response)?;
        Ok(site.categories)
    }
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| SyncError::Config(format!("{} contains invalid header characters", what)))
}

fn read_body(response: Response) -> RemoteResult<(u16, String)> {
    let status = response.status().as_u16();
    Ok((status, response.text()?))
}

/// Return the body of a successful response, or the classified error.
fn check_status(response: Response) -> RemoteResult<String> {
    let (status, body) = read_body(response)?;
    success_body(status, body)
}

fn read_json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let (status, body) = read_body(response)?;
    decode(status, body)
}

fn success_body(status: u16, body: String) -> RemoteResult<String> {
    if is_success(status) {
        Ok(body)
    } else {
        Err(classify(status, &body))
    }
}

/// Decode a JSON response body, classifying failures first.
fn decode<T: DeserializeOwned>(status: u16, body: String) -> RemoteResult<T> {
    let body = success_body(status, body)?;
    serde_json::from_str(&body).map_err(|e| RemoteError::UnexpectedPayload(e.to_string()))
}

/// Discourse can answer an upload with 200 and still report failure in `errors`.
fn upload_result(status: u16, body: &str) -> RemoteResult<UploadedFile> {
    let upload: UploadResponse = decode(status, body.to_string())?;

    if !upload.errors.is_empty() {
        return Err(RemoteError::Unprocessable {
            message: upload.errors.join(", "),
        });
    }
    match (upload.short_url, upload.original_filename) {
        (Some(short_url), Some(original_filename)) => Ok(UploadedFile {
            short_url,
            original_filename,
        }),
        _ => Err(RemoteError::UnexpectedPayload(
            "upload response lacks short_url or original_filename".to_string(),
        )),
    }
}
