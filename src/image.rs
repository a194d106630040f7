use serde::{Deserialize, Serialize};

pub type ImageId = u64;

/// One row of `GET /images`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    pub id: ImageId,
    pub filename: String,
    pub likes: i64,
}
