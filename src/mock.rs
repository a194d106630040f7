//! In-process fake of the image server, recording every request it sees.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::TryStreamExt;
use serde::Deserialize;
use warp::http::{Method, StatusCode};
use warp::multipart::{FormData, Part};
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Buf, Filter, Rejection, Reply};

use crate::image::{Image, ImageId};

pub const ISSUED_TOKEN: &str = "xyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct State {
    pub users: HashMap<String, String>,
    pub tokens: HashSet<String>,
    pub images: Vec<Image>,
    pub files: HashMap<String, Vec<u8>>,
    pub requests: Vec<Request>,
    pub fail_uploads: bool,
    pub fail_listing: bool,
    pub raw_listing: Option<String>,
    /// Replaces [`ISSUED_TOKEN`] in login responses.
    pub issued_token: Option<String>,
}

type Shared = Arc<Mutex<State>>;

pub struct MockServer {
    addr: SocketAddr,
    state: Shared,
}

#[derive(Deserialize)]
struct CredentialsBody {
    username: String,
    password: String,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Shared::default();

        let (addr, server) = warp::serve(routes(Arc::clone(&state)))
            .bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn add_user(&self, username: &str, password: &str) {
        self.state().users.insert(username.into(), password.into());
    }

    pub fn add_token(&self, token: &str) {
        self.state().tokens.insert(token.into());
    }

    pub fn add_image(&self, filename: &str, contents: &[u8]) {
        self.state().store(filename.into(), contents.to_vec());
    }
}

impl State {
    fn store(&mut self, filename: String, contents: Vec<u8>) {
        let id = self.images.len() as ImageId + 1;
        self.images.push(Image {
            id,
            filename: filename.clone(),
            likes: 0,
        });
        self.files.insert(filename, contents);
    }

    fn authorized(&self, header: Option<&str>) -> bool {
        header.map_or(false, |token| self.tokens.contains(token))
    }
}

fn status(code: StatusCode, body: &'static str) -> Response {
    warp::reply::with_status(body, code).into_response()
}

fn routes(state: Shared) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let with_state = {
        let state = Arc::clone(&state);
        warp::any().map(move || Arc::clone(&state))
    };

    let record = {
        let state = Arc::clone(&state);
        warp::method()
            .and(warp::path::full())
            .and(warp::header::optional::<String>("authorization"))
            .map(move |method: Method, path: FullPath, authorization| {
                state.lock().unwrap().requests.push(Request {
                    method: method.to_string(),
                    path: path.as_str().into(),
                    authorization,
                });
            })
            .untuple_one()
    };

    let login = warp::path!("api" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state.clone())
        .map(|body: CredentialsBody, state: Shared| {
            let mut state = state.lock().unwrap();
            if state.users.get(&body.username) != Some(&body.password) {
                return status(StatusCode::BAD_REQUEST, "Invalid username or password");
            }
            let token = state
                .issued_token
                .clone()
                .unwrap_or_else(|| ISSUED_TOKEN.into());
            state.tokens.insert(token.clone());
            warp::reply::json(&serde_json::json!({ "token": token })).into_response()
        });

    let register = warp::path!("api" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state.clone())
        .map(|body: CredentialsBody, state: Shared| {
            if body.username.is_empty() {
                return status(StatusCode::BAD_REQUEST, "Invalid input");
            }
            state.lock().unwrap().users.insert(body.username, body.password);
            status(StatusCode::CREATED, "User registered successfully")
        });

    let list = warp::path!("api" / "images")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_state.clone())
        .map(|auth: Option<String>, state: Shared| {
            let state = state.lock().unwrap();
            if !state.authorized(auth.as_deref()) {
                return status(StatusCode::UNAUTHORIZED, "Invalid token");
            }
            if state.fail_listing {
                return status(StatusCode::INTERNAL_SERVER_ERROR, "database gone");
            }
            match &state.raw_listing {
                Some(raw) => Response::new(raw.clone().into()),
                None => warp::reply::json(&state.images).into_response(),
            }
        });

    let upload = warp::path!("api" / "images")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::multipart::form())
        .and(with_state.clone())
        .and_then(handle_upload);

    let like = warp::path!("api" / "images" / ImageId / "like")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_state.clone())
        .map(|id: ImageId, auth: Option<String>, state: Shared| {
            let mut state = state.lock().unwrap();
            if !state.authorized(auth.as_deref()) {
                return status(StatusCode::UNAUTHORIZED, "Invalid token");
            }
            match state.images.iter_mut().find(|image| image.id == id) {
                Some(image) => {
                    image.likes += 1;
                    status(StatusCode::OK, "Like toggled successfully")
                }
                None => status(StatusCode::NOT_FOUND, "Image not found"),
            }
        });

    let expose = warp::path!("api" / "images" / "expose" / String)
        .and(warp::get())
        .and(with_state)
        .map(|filename: String, state: Shared| {
            let state = state.lock().unwrap();
            match state.files.get(&filename) {
                Some(contents) => Response::new(contents.clone().into()),
                None => status(StatusCode::NOT_FOUND, "Image not found"),
            }
        });

    record.and(
        login
            .or(register)
            .unify()
            .or(list)
            .unify()
            .or(upload)
            .unify()
            .or(like)
            .unify()
            .or(expose)
            .unify(),
    )
}

async fn handle_upload(
    auth: Option<String>,
    mut form: FormData,
    state: Shared,
) -> Result<Response, Rejection> {
    let (authorized, fail) = {
        let state = state.lock().unwrap();
        (state.authorized(auth.as_deref()), state.fail_uploads)
    };
    if !authorized {
        return Ok(status(StatusCode::UNAUTHORIZED, "Invalid token"));
    }
    if fail {
        return Ok(status(StatusCode::INTERNAL_SERVER_ERROR, "disk full"));
    }

    // multer hands out one field at a time, each must be drained before the next
    while let Some(part) = form.try_next().await.map_err(|_| warp::reject())? {
        if part.name() != "image" {
            continue;
        }
        let Some(filename) = part.filename().map(str::to_owned) else {
            break;
        };

        let contents = read_part(part).await?;

        state.lock().unwrap().store(filename, contents);
        return Ok(status(StatusCode::CREATED, "Image uploaded successfully"));
    }

    Ok(status(StatusCode::BAD_REQUEST, "Invalid file"))
}

async fn read_part(part: Part) -> Result<Vec<u8>, Rejection> {
    part.stream()
        .try_fold(Vec::new(), |mut acc, buf| async move {
            acc.extend_from_slice(buf.chunk());
            Ok(acc)
        })
        .await
        .map_err(|_| warp::reject())
}
