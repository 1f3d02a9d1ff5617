// API client module: a small blocking HTTP client for the OpenAI files and
// assistants endpoints, plus the `ResourceClient` trait the menu talks to.
// Everything is synchronous; one request is in flight at a time.

use crate::config::Config;
use crate::error::{parse_error_response, ClientError};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;

/// Page size requested from the list endpoints.
const PAGE_LIMIT: &str = "100";
const BETA_HEADER: &str = "OpenAI-Beta";
const ASSISTANTS_BETA: &str = "assistants=v2";

/// A file stored on the remote service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// An assistant object. The API allows `null` for name and instructions.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AssistantRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub model: Option<String>,
}

/// Acknowledgement returned by both delete endpoints.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Deletion {
    pub id: String,
    pub deleted: bool,
}

/// A local file opened by the caller and ready to be streamed to the
/// service. The client never looks at the bytes.
#[derive(Debug)]
pub struct FileUpload {
    pub file_name: String,
    pub purpose: String,
    pub contents: File,
}

/// The remote operations the menu needs. `ApiClient` talks HTTP; tests
/// provide an in-memory fake.
pub trait ResourceClient {
    fn create_file(&self, upload: FileUpload) -> Result<FileRecord, ClientError>;
    fn list_files(&self, purpose: &str) -> Result<Vec<FileRecord>, ClientError>;
    fn delete_file(&self, id: &str) -> Result<Deletion, ClientError>;
    fn list_assistants(&self) -> Result<Vec<AssistantRecord>, ClientError>;
    fn delete_assistant(&self, id: &str) -> Result<Deletion, ClientError>;
}

/// Records that can act as a pagination cursor.
trait Listed {
    fn cursor(&self) -> &str;
}

impl Listed for FileRecord {
    fn cursor(&self) -> &str {
        &self.id
    }
}

impl Listed for AssistantRecord {
    fn cursor(&self) -> &str {
        &self.id
    }
}

/// One page of a list endpoint.
#[derive(Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

/// Blocking client holding a configured reqwest client (auth headers and
/// timeout baked in) and the API base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from environment configuration. See `Config::from_env`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_config(&Config::from_env()?)
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ClientError::InvalidHeader("Authorization"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        if let Some(org) = &config.organization {
            let value = HeaderValue::from_str(org)
                .map_err(|_| ClientError::InvalidHeader("OpenAI-Organization"))?;
            headers.insert("OpenAI-Organization", value);
        }
        if let Some(project) = &config.project {
            let value = HeaderValue::from_str(project)
                .map_err(|_| ClientError::InvalidHeader("OpenAI-Project"))?;
            headers.insert("OpenAI-Project", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(ApiClient {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch every page of a list endpoint, following `has_more` with the
    /// last id of each page as the `after` cursor.
    fn list_all<T>(&self, path: &str, query: &[(&str, &str)], beta: bool) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned + Listed,
    {
        let url = self.url(path);
        let mut records = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut req = self.client.get(&url).query(query).query(&[("limit", PAGE_LIMIT)]);
            if let Some(cursor) = &after {
                req = req.query(&[("after", cursor.as_str())]);
            }
            if beta {
                req = req.header(BETA_HEADER, ASSISTANTS_BETA);
            }

            tracing::debug!(%url, after = ?after, "GET list page");
            let page: Page<T> = read_json(req.send()?)?;
            let has_more = page.has_more;
            after = page.data.last().map(|r| r.cursor().to_string());
            records.extend(page.data);

            if !has_more || after.is_none() {
                break;
            }
        }

        tracing::debug!(%url, count = records.len(), "listed records");
        Ok(records)
    }

    fn delete(&self, path: &str, beta: bool) -> Result<Deletion, ClientError> {
        let url = self.url(path);
        let mut req: RequestBuilder = self.client.delete(&url);
        if beta {
            req = req.header(BETA_HEADER, ASSISTANTS_BETA);
        }
        tracing::debug!(%url, "DELETE");
        read_json(req.send()?)
    }
}

impl ResourceClient for ApiClient {
    /// Upload via multipart/form-data: a `purpose` text field and the file
    /// part streamed straight from the open handle.
    fn create_file(&self, upload: FileUpload) -> Result<FileRecord, ClientError> {
        let url = self.url("/files");
        let part = multipart::Part::reader(upload.contents).file_name(upload.file_name.clone());
        let form = multipart::Form::new()
            .text("purpose", upload.purpose)
            .part("file", part);

        tracing::debug!(%url, file = %upload.file_name, "POST multipart upload");
        read_json(self.client.post(&url).multipart(form).send()?)
    }

    fn list_files(&self, purpose: &str) -> Result<Vec<FileRecord>, ClientError> {
        self.list_all("/files", &[("purpose", purpose)], false)
    }

    fn delete_file(&self, id: &str) -> Result<Deletion, ClientError> {
        self.delete(&format!("/files/{}", id), false)
    }

    fn list_assistants(&self) -> Result<Vec<AssistantRecord>, ClientError> {
        self.list_all("/assistants", &[("order", "desc")], true)
    }

    fn delete_assistant(&self, id: &str) -> Result<Deletion, ClientError> {
        self.delete(&format!("/assistants/{}", id), true)
    }
}

/// Decode a successful JSON body, or map the failure body to a `ClientError`.
fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().unwrap_or_default();
        return Err(parse_error_response(status, &body));
    }
    Ok(res.json()?)
}
