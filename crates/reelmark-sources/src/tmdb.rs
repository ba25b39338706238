use reelmark_models::{AllMovieDetail, MoviePage};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::fetch::{fetch_all, JsonFetcher};
use crate::transform::{transform_movie, transform_movie_detail};
use crate::url::{ApiUrlBuilder, ParamValue};

pub mod api_paths {
    pub const MOVIE: &str = "/movie";
    pub const MOVIE_POPULAR: &str = "/movie/popular";
    pub const MOVIE_SEARCH: &str = "/search/movie";
}

fn request_url(
    urls: &ApiUrlBuilder,
    path: &str,
    params: Option<&[(&str, ParamValue)]>,
) -> Result<String, SourceError> {
    urls.api_url(path, params, None)
        .ok_or_else(|| SourceError::InvalidRequest(path.to_string()))
}

/// Paginated list body: `{page, results, total_pages, total_results}`
fn parse_movie_page(body: &Value, requested_page: u32) -> Result<MoviePage, SourceError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or(SourceError::MissingResults)?;

    let number = |key: &str| body.get(key).and_then(Value::as_u64).unwrap_or(0);

    Ok(MoviePage {
        page: u32::try_from(number("page")).ok().filter(|p| *p > 0).unwrap_or(requested_page),
        results: results.iter().map(transform_movie).collect(),
        total_pages: u32::try_from(number("total_pages")).unwrap_or(u32::MAX),
        total_results: number("total_results"),
    })
}

/// Fetch one page of popular movies
pub async fn get_movie_list(
    urls: &ApiUrlBuilder,
    fetcher: &dyn JsonFetcher,
    page: u32,
) -> Result<MoviePage, SourceError> {
    let params = [("page", ParamValue::from(page))];
    let url = request_url(urls, api_paths::MOVIE_POPULAR, Some(&params))?;
    let body = fetcher.fetch_json(&url).await?;
    let movie_page = parse_movie_page(&body, page)?;
    debug!(
        "Popular movies page {}/{}: {} results",
        movie_page.page,
        movie_page.total_pages,
        movie_page.results.len()
    );
    Ok(movie_page)
}

/// Fetch one page of search results for `query`
pub async fn get_movie_search(
    urls: &ApiUrlBuilder,
    fetcher: &dyn JsonFetcher,
    page: u32,
    query: &str,
) -> Result<MoviePage, SourceError> {
    let params = [("page", ParamValue::from(page)), ("query", ParamValue::from(query))];
    let url = request_url(urls, api_paths::MOVIE_SEARCH, Some(&params))?;
    let body = fetcher.fetch_json(&url).await?;
    let movie_page = parse_movie_page(&body, page)?;
    debug!(
        "Search '{}' page {}/{}: {} results",
        query,
        movie_page.page,
        movie_page.total_pages,
        movie_page.results.len()
    );
    Ok(movie_page)
}

/// Detail, credits and videos URLs for one movie, in that order
pub fn movie_detail_urls(urls: &ApiUrlBuilder, id: u64) -> Result<Vec<String>, SourceError> {
    let base = format!("{}/{}", api_paths::MOVIE, id);
    Ok(vec![
        request_url(urls, &base, None)?,
        request_url(urls, &format!("{}/credits", base), None)?,
        request_url(urls, &format!("{}/videos", base), None)?,
    ])
}

/// Fetch detail, credits and videos concurrently and merge them.
///
/// Any failing request fails the whole call; nothing is partially merged.
pub async fn get_movie_detail(
    urls: &ApiUrlBuilder,
    fetcher: &dyn JsonFetcher,
    id: u64,
) -> Result<AllMovieDetail, SourceError> {
    let request_urls = movie_detail_urls(urls, id)?;
    let bodies = fetch_all(fetcher, &request_urls).await?;

    let detail = transform_movie_detail(bodies.first(), bodies.get(1), bodies.get(2));
    info!("Loaded movie {} ({}): {} cast, {} videos",
        id,
        detail.movie.movie.title,
        detail.credits.cast.len(),
        detail.videos.len()
    );
    Ok(detail)
}

/// URL builder plus fetcher, shared by the data resources.
#[derive(Clone)]
pub struct TmdbApi {
    urls: ApiUrlBuilder,
    fetcher: Arc<dyn JsonFetcher>,
}

impl TmdbApi {
    pub fn new(urls: ApiUrlBuilder, fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self { urls, fetcher }
    }

    pub fn urls(&self) -> &ApiUrlBuilder {
        &self.urls
    }

    pub async fn movie_list(&self, page: u32) -> Result<MoviePage, SourceError> {
        get_movie_list(&self.urls, self.fetcher.as_ref(), page).await
    }

    pub async fn movie_search(&self, page: u32, query: &str) -> Result<MoviePage, SourceError> {
        get_movie_search(&self.urls, self.fetcher.as_ref(), page, query).await
    }

    pub async fn movie_detail(&self, id: u64) -> Result<AllMovieDetail, SourceError> {
        get_movie_detail(&self.urls, self.fetcher.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers by path suffix and records requested URLs
    struct RouteFetcher {
        routes: Vec<(&'static str, Result<Value, SourceError>)>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl JsonFetcher for RouteFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
            self.requested.lock().unwrap().push(url.to_string());
            let path = url.split('?').next().unwrap_or_default();
            self.routes
                .iter()
                .find(|(suffix, _)| path.ends_with(suffix))
                .map(|(_, result)| result.clone())
                .unwrap_or_else(|| Err(SourceError::Status { status: 404, message: "not found".to_string() }))
        }
    }

    fn fetcher(routes: Vec<(&'static str, Result<Value, SourceError>)>) -> RouteFetcher {
        RouteFetcher { routes, requested: Mutex::new(Vec::new()) }
    }

    fn urls() -> ApiUrlBuilder {
        ApiUrlBuilder::new("https://api.themoviedb.org/3", "key", "zh-TW").unwrap()
    }

    #[tokio::test]
    async fn test_get_movie_list() {
        let fetcher = fetcher(vec![(
            "/movie/popular",
            Ok(json!({"page": 1, "results": [{"id": 1, "title": "A"}, {"id": 2}], "total_pages": 500, "total_results": 10000})),
        )]);
        let page = get_movie_list(&urls(), &fetcher, 1).await.unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].title, "Unknown Title");
        assert_eq!(page.total_pages, 500);
        assert!(page.has_more_after(1));
        assert!(fetcher.requested.lock().unwrap()[0].contains("page=1"));
    }

    #[tokio::test]
    async fn test_get_movie_search_targets_search_endpoint() {
        let fetcher = fetcher(vec![(
            "/search/movie",
            Ok(json!({"page": 1, "results": [], "total_pages": 1, "total_results": 0})),
        )]);
        get_movie_search(&urls(), &fetcher, 1, "dune").await.unwrap();
        let requested = fetcher.requested.lock().unwrap();
        assert!(requested[0].starts_with("https://api.themoviedb.org/3/search/movie?"));
        assert!(requested[0].contains("query=dune"));
    }

    #[tokio::test]
    async fn test_list_without_results_is_an_error() {
        let fetcher = fetcher(vec![("/movie/popular", Ok(json!({"status_code": 34})))]);
        let err = get_movie_list(&urls(), &fetcher, 1).await.unwrap_err();
        assert_eq!(err, SourceError::MissingResults);
    }

    #[tokio::test]
    async fn test_get_movie_detail_merges_three_requests() {
        let fetcher = fetcher(vec![
            ("/movie/123/credits", Ok(json!({"cast": [{"id": 9, "name": "Zendaya", "character": "Chani"}]}))),
            ("/movie/123/videos", Ok(json!({"results": [{"key": "k", "site": "YouTube", "type": "Trailer"}]}))),
            ("/movie/123", Ok(json!({"id": 123, "title": "Dune", "runtime": 155}))),
        ]);
        let detail = get_movie_detail(&urls(), &fetcher, 123).await.unwrap();
        assert_eq!(detail.movie.movie.id, 123);
        assert_eq!(detail.movie.runtime, 155);
        assert_eq!(detail.credits.cast[0].name, "Zendaya");
        assert_eq!(detail.videos[0].key, "k");
        assert_eq!(fetcher.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_movie_detail_fails_when_one_request_fails() {
        let fetcher = fetcher(vec![
            ("/movie/123/credits", Err(SourceError::Network("reset".to_string()))),
            ("/movie/123/videos", Ok(json!({"results": []}))),
            ("/movie/123", Ok(json!({"id": 123}))),
        ]);
        let err = get_movie_detail(&urls(), &fetcher, 123).await.unwrap_err();
        assert_eq!(err, SourceError::Network("reset".to_string()));
    }

    #[test]
    fn test_parse_movie_page_falls_back_to_requested_page() {
        let page = parse_movie_page(&json!({"results": []}), 3).unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_more_after(3));
    }
}
