use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use log::{debug, error};

use crate::auth::Token;

mod kv;

const SESSION_FILE: &str = "session.txt";
const TOKEN_KEY: &str = "token";

#[derive(Debug)]
pub enum LoadError {
    NotFound,
    Internal,
}

/// Persists the session token across runs, under a fixed key in
/// `<root>/session.txt`.
pub struct TokenStore {
    root: PathBuf,
}

impl TokenStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    fn read(&self) -> Result<kv::KeyValues, LoadError> {
        let path = self.path();
        let file = File::open(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                return LoadError::NotFound;
            }
            error!("open {path:?}: {e:?}");
            LoadError::Internal
        })?;

        kv::read(file)
    }

    pub fn load(&self) -> Result<Token, LoadError> {
        let mut kv = self.read()?;

        kv.remove(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(Token::from)
            .ok_or(LoadError::NotFound)
    }

    pub fn save(&self, token: &Token) -> io::Result<()> {
        // keep whatever else is in there
        let mut kv = match self.read() {
            Ok(kv) => kv,
            Err(LoadError::NotFound) => Default::default(),
            Err(LoadError::Internal) => {
                debug!("overwriting unreadable {:?}", self.path());
                Default::default()
            }
        };
        kv.insert(TOKEN_KEY.into(), token.as_str().into());

        // don't truncate the old session for a token that can't be written
        kv::check(&kv)?;

        fs::create_dir_all(&self.root)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;

        kv::write(file, &kv)
    }
}
