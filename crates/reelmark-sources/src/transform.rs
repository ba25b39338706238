//! Normalization of raw TMDB payloads into closed model types.
//!
//! Every function here is total: missing or wrong-typed fields become
//! type-correct defaults and malformed list entries are skipped. Nothing
//! downstream of this module looks at raw JSON.

use reelmark_models::{
    AllMovieDetail, CastMember, Credits, CrewMember, Genre, Movie, MovieDetail, ProductionCompany,
    ProductionCountry, SpokenLanguage, Video,
};
use serde_json::Value;

const UNKNOWN_TITLE: &str = "Unknown Title";
const DEFAULT_LANGUAGE: &str = "en";
const UNKNOWN_STATUS: &str = "Unknown";

/// Non-empty string field, else `default`
fn string_or(value: &Value, key: &str, default: &str) -> String {
    optional_string(value, key).unwrap_or_else(|| default.to_string())
}

/// Non-empty string field
fn optional_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn u64_or_zero(value: &Value, key: &str) -> u64 {
    let Some(field) = value.get(key) else {
        return 0;
    };
    field
        .as_u64()
        .or_else(|| field.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64))
        .unwrap_or(0)
}

fn f64_or_zero(value: &Value, key: &str) -> f64 {
    value
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn bool_or_false(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Objects only; anything else in a list is dropped
fn objects<'a>(items: &'a [Value]) -> impl Iterator<Item = &'a Value> + 'a {
    items.iter().filter(|item| item.is_object())
}

pub fn transform_movie(raw: &Value) -> Movie {
    Movie {
        id: u64_or_zero(raw, "id"),
        title: string_or(raw, "title", UNKNOWN_TITLE),
        overview: string_or(raw, "overview", ""),
        poster_path: optional_string(raw, "poster_path"),
        backdrop_path: optional_string(raw, "backdrop_path"),
        release_date: string_or(raw, "release_date", ""),
        vote_average: f64_or_zero(raw, "vote_average"),
        vote_count: u64_or_zero(raw, "vote_count"),
        genre_ids: array(raw, "genre_ids").iter().filter_map(Value::as_u64).collect(),
        adult: bool_or_false(raw, "adult"),
        original_language: string_or(raw, "original_language", DEFAULT_LANGUAGE),
        original_title: string_or(raw, "original_title", ""),
        popularity: f64_or_zero(raw, "popularity"),
        video: bool_or_false(raw, "video"),
    }
}

fn transform_detail_fields(raw: &Value) -> MovieDetail {
    MovieDetail {
        movie: transform_movie(raw),
        runtime: u32::try_from(u64_or_zero(raw, "runtime")).unwrap_or(0),
        genres: objects(array(raw, "genres"))
            .map(|g| Genre {
                id: u64_or_zero(g, "id"),
                name: string_or(g, "name", ""),
            })
            .collect(),
        production_companies: objects(array(raw, "production_companies"))
            .map(|c| ProductionCompany {
                id: u64_or_zero(c, "id"),
                name: string_or(c, "name", ""),
                logo_path: optional_string(c, "logo_path"),
                origin_country: string_or(c, "origin_country", ""),
            })
            .collect(),
        production_countries: objects(array(raw, "production_countries"))
            .map(|c| ProductionCountry {
                iso_3166_1: string_or(c, "iso_3166_1", ""),
                name: string_or(c, "name", ""),
            })
            .collect(),
        spoken_languages: objects(array(raw, "spoken_languages"))
            .map(|l| SpokenLanguage {
                iso_639_1: string_or(l, "iso_639_1", ""),
                english_name: string_or(l, "english_name", ""),
                name: string_or(l, "name", ""),
            })
            .collect(),
        status: string_or(raw, "status", UNKNOWN_STATUS),
        tagline: string_or(raw, "tagline", ""),
        budget: u64_or_zero(raw, "budget"),
        revenue: u64_or_zero(raw, "revenue"),
        homepage: string_or(raw, "homepage", ""),
        imdb_id: string_or(raw, "imdb_id", ""),
    }
}

pub fn transform_credits(raw: Option<&Value>) -> Credits {
    let Some(raw) = raw else {
        return Credits::default();
    };

    Credits {
        cast: objects(array(raw, "cast"))
            .map(|c| CastMember {
                id: u64_or_zero(c, "id"),
                name: string_or(c, "name", ""),
                character: string_or(c, "character", ""),
                profile_path: optional_string(c, "profile_path"),
            })
            .collect(),
        crew: objects(array(raw, "crew"))
            .map(|c| CrewMember {
                id: u64_or_zero(c, "id"),
                name: string_or(c, "name", ""),
                job: string_or(c, "job", ""),
                department: string_or(c, "department", ""),
                profile_path: optional_string(c, "profile_path"),
            })
            .collect(),
    }
}

/// Accepts the `/videos` response (`{"results": [...]}`) or the bare list.
pub fn transform_videos(raw: Option<&Value>) -> Vec<Video> {
    let items = match raw {
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => array(other, "results"),
        None => &[],
    };

    objects(items)
        .map(|v| Video {
            id: string_or(v, "id", ""),
            key: string_or(v, "key", ""),
            name: string_or(v, "name", ""),
            site: string_or(v, "site", ""),
            kind: string_or(v, "type", ""),
            official: bool_or_false(v, "official"),
            published_at: string_or(v, "published_at", ""),
        })
        .collect()
}

/// Merge the three detail fragments. Each may be absent on its own.
pub fn transform_movie_detail(
    movie: Option<&Value>,
    credits: Option<&Value>,
    videos: Option<&Value>,
) -> AllMovieDetail {
    AllMovieDetail {
        movie: transform_detail_fields(movie.unwrap_or(&Value::Null)),
        credits: transform_credits(credits),
        videos: transform_videos(videos),
    }
}
