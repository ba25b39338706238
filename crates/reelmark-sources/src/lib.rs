pub mod error;
pub mod fetch;
pub mod images;
pub mod tmdb;
pub mod transform;
pub mod url;

pub use error::SourceError;
pub use fetch::{fetch_all, HttpFetcher, JsonFetcher};
pub use images::{find_trailer, image_url, youtube_url, ImageFallback, ImageSize};
pub use tmdb::{api_paths, get_movie_detail, get_movie_list, get_movie_search, movie_detail_urls, TmdbApi};
pub use transform::{transform_credits, transform_movie, transform_movie_detail, transform_videos};
pub use url::{ApiUrlBuilder, ParamValue};
