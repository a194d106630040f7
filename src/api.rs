use log::{debug, error, trace};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::app::{Error, Result};
use crate::auth::{Credentials, LoginResponse, Token};
use crate::image::{Image, ImageId};
use crate::upload::PendingUpload;

pub const DEFAULT_API_URL: &str = "http://localhost/api";

/// The server accepted a mutation. Refetching the gallery requires one of
/// these, so a refetch can only follow an acknowledged write.
#[derive(Debug)]
#[must_use]
pub struct Ack(());

/// Thin typed wrapper over the server's REST endpoints.
pub struct Api {
    http: Client,
    base: String,
}

impl Api {
    pub fn new(base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|e| {
            error!("invalid server url \"{base}\": {e}");
            Error::Config
        })?;

        if url.cannot_be_a_base() {
            error!("server url \"{base}\" can't have paths appended");
            return Err(Error::Config);
        }

        Ok(Self {
            http: Client::new(),
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await.map_err(|e| {
            error!("{what}: {e}");
            Error::Network
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("{what}: server responded {status}: {}", body.trim());
            return Err(Error::Status(status.as_u16()));
        }

        trace!("{what}: {status}");
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T> {
        resp.json().await.map_err(|e| {
            error!("{what}: malformed response: {e}");
            Error::Body
        })
    }

    pub async fn login(&self, creds: &Credentials) -> Result<Token> {
        let what = format!("login as \"{}\"", creds.username());

        let req = self.http.post(self.endpoint("login")).json(creds);
        let resp = self.send(&what, req).await?;
        let LoginResponse { token } = Self::json(&what, resp).await?;

        if token.as_str().is_empty() {
            error!("{what}: server sent an empty token");
            return Err(Error::Body);
        }

        Ok(token)
    }

    pub async fn register(&self, creds: &Credentials) -> Result<Ack> {
        let what = format!("register \"{}\"", creds.username());

        let req = self.http.post(self.endpoint("register")).json(creds);
        self.send(&what, req).await?;

        Ok(Ack(()))
    }

    pub async fn images(&self, token: &Token) -> Result<Vec<Image>> {
        let what = "fetch images";

        let req = self
            .http
            .get(self.endpoint("images"))
            .header(AUTHORIZATION, token.as_str());
        let resp = self.send(what, req).await?;

        Self::json(what, resp).await
    }

    pub async fn upload(
        &self,
        token: &Token,
        upload: &PendingUpload,
        contents: Vec<u8>,
    ) -> Result<Ack> {
        let what = format!("upload \"{}\"", upload.name());

        debug!("{what}: {} bytes, {}", contents.len(), upload.mime());
        let part = Part::bytes(contents)
            .file_name(upload.name().to_string())
            .mime_str(&upload.mime())
            .map_err(|e| {
                error!("{what}: {e}");
                Error::Io
            })?;
        let form = Form::new().part("image", part);

        let req = self
            .http
            .post(self.endpoint("images"))
            .header(AUTHORIZATION, token.as_str())
            .multipart(form);
        self.send(&what, req).await?;

        Ok(Ack(()))
    }

    pub async fn like(&self, token: &Token, id: ImageId) -> Result<Ack> {
        let what = format!("like image {id}");

        let req = self
            .http
            .post(self.endpoint(&format!("images/{id}/like")))
            .header(AUTHORIZATION, token.as_str());
        self.send(&what, req).await?;

        Ok(Ack(()))
    }

    /// Where the server exposes an uploaded file. The filename is used as-is.
    pub fn thumbnail_url(&self, filename: &str) -> String {
        self.endpoint(&format!("images/expose/{filename}"))
    }

    pub async fn thumbnail(&self, filename: &str) -> Result<Vec<u8>> {
        let what = format!("fetch \"{filename}\"");

        let req = self.http.get(self.thumbnail_url(filename));
        let resp = self.send(&what, req).await?;

        let bytes = resp.bytes().await.map_err(|e| {
            error!("{what}: {e}");
            Error::Network
        })?;

        Ok(bytes.to_vec())
    }
}
