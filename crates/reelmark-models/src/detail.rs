use serde::{Deserialize, Serialize};
use crate::credits::Credits;
use crate::movie::Movie;
use crate::video::Video;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    pub english_name: String,
    pub name: String,
}

/// Full movie record from `/movie/{id}`.
///
/// The summary fields are flattened so the serialized form matches the API shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub runtime: u32, // minutes
    pub genres: Vec<Genre>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub status: String,
    pub tagline: String,
    pub budget: u64,
    pub revenue: u64,
    pub homepage: String,
    pub imdb_id: String,
}

/// Detail, credits and videos of one movie, assembled from three requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllMovieDetail {
    pub movie: MovieDetail,
    pub credits: Credits,
    pub videos: Vec<Video>,
}
