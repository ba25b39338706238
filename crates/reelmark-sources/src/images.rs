use reelmark_models::Video;

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W185,
    W500,
    W1280,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W185 => "w185",
            ImageSize::W500 => "w500",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize::W500
    }
}

/// What to return when a movie has no image path.
///
/// Posters in lists fall back to a bundled placeholder, backdrops to an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFallback {
    Empty,
    Placeholder,
}

pub fn image_url(image_base: &str, path: Option<&str>, size: ImageSize, fallback: ImageFallback) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{}", image_base.trim_end_matches('/'), size.as_str(), path),
        None => match fallback {
            ImageFallback::Empty => String::new(),
            ImageFallback::Placeholder => PLACEHOLDER_IMAGE.to_string(),
        },
    }
}

pub fn youtube_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

/// First YouTube trailer, official uploads first.
pub fn find_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube_trailer() && v.official)
        .or_else(|| videos.iter().find(|v| v.is_youtube_trailer()))
}
