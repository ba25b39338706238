use serde::{Deserialize, Serialize};

/// Entry of `/movie/{id}/videos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String, // "YouTube", "Vimeo"
    #[serde(rename = "type")]
    pub kind: String, // "Trailer", "Teaser", "Featurette", ...
    pub official: bool,
    pub published_at: String,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.kind == "Trailer" && self.site == "YouTube"
    }
}
