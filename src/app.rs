use std::path::PathBuf;
use std::result;

use log::{debug, error, info, warn};

use crate::api::{Ack, Api};
use crate::auth::{Credentials, Token};
use crate::image::{Image, ImageId};
use crate::render::View;
use crate::store::{LoadError, TokenStore};
use crate::upload::PendingUpload;

/// Every failure is logged where it happens; the variant only says where.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Network,
    Status(u16),
    Body,
    Storage,
    Io,
    Config,
}

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    LoggedOut,
    LoggedIn(Token),
}

/// Session and gallery state for one client. All mutation goes through
/// here; renderers get a read-only [`View`].
pub struct App {
    api: Api,
    store: TokenStore,
    session: Session,
    images: Vec<Image>,
    pending: Option<PendingUpload>,
    draft: Credentials,
}

impl App {
    pub fn new(api: Api, store: TokenStore) -> Self {
        Self {
            api,
            store,
            session: Session::LoggedOut,
            images: vec![],
            pending: None,
            draft: Credentials::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&Token> {
        match &self.session {
            Session::LoggedIn(token) => Some(token),
            Session::LoggedOut => None,
        }
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn pending(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    pub fn draft(&self) -> &Credentials {
        &self.draft
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.draft.set_username(username);
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.draft.set_password(password);
    }

    pub fn view(&self) -> View<'_> {
        View::new(self)
    }

    /// Pick up a token left by a previous run. The token isn't checked,
    /// a stale one only shows up as a failed fetch.
    pub async fn restore_session(&mut self) -> Result<()> {
        let token = match self.store.load() {
            Ok(token) => token,
            Err(LoadError::NotFound) => {
                debug!("no stored session");
                return Ok(());
            }
            Err(LoadError::Internal) => {
                error!("couldn't read stored session");
                return Err(Error::Storage);
            }
        };

        info!("restored session");
        self.session = Session::LoggedIn(token.clone());
        self.fetch_images(&token).await
    }

    pub async fn login(&mut self) -> Result<()> {
        let token = self.api.login(&self.draft).await?;

        info!("{} logged in", self.draft.username());
        self.session = Session::LoggedIn(token.clone());

        if let Err(e) = self.store.save(&token) {
            warn!("couldn't persist session: {e}");
        }

        self.fetch_images(&token).await
    }

    pub async fn register(&mut self) -> Result<()> {
        let _ack = self.api.register(&self.draft).await?;

        info!("{} registered", self.draft.username());
        self.login().await
    }

    /// Replace the gallery with the server's listing. On failure the old
    /// listing stays.
    pub async fn fetch_images(&mut self, token: &Token) -> Result<()> {
        let images = self.api.images(token).await?;

        debug!("{} images", images.len());
        self.images = images;
        Ok(())
    }

    async fn refetch(&mut self, token: &Token, _ack: Ack) -> Result<()> {
        self.fetch_images(token).await
    }

    pub fn resolve_thumbnail_url(&self, filename: &str) -> String {
        self.api.thumbnail_url(filename)
    }

    pub async fn fetch_thumbnail(&self, filename: &str) -> Result<Vec<u8>> {
        self.api.thumbnail(filename).await
    }

    /// Returns false, keeping any earlier selection, if `path` names no file.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> bool {
        match PendingUpload::new(path) {
            Some(upload) => {
                debug!("selected {}", upload.name());
                self.pending = Some(upload);
                true
            }
            None => false,
        }
    }

    /// No-op without both a selected file and a session. The selection is
    /// kept after uploading.
    pub async fn submit_upload(&mut self) -> Result<()> {
        let (Some(upload), Some(token)) = (self.pending.clone(), self.token().cloned()) else {
            debug!("upload skipped: need a file and a session");
            return Ok(());
        };

        let contents = upload.contents().await.map_err(|e| {
            error!("read {:?}: {e}", upload.path());
            Error::Io
        })?;

        let ack = self.api.upload(&token, &upload, contents).await?;
        info!("uploaded {}", upload.name());

        self.refetch(&token, ack).await
    }

    /// Adds a like; there's no way to take one back.
    pub async fn toggle_like(&mut self, id: ImageId) -> Result<()> {
        let Some(token) = self.token().cloned() else {
            debug!("like skipped: not logged in");
            return Ok(());
        };

        let ack = self.api.like(&token, id).await?;
        info!("liked image {id}");

        self.refetch(&token, ack).await
    }
}
