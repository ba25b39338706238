use reqwest::Url;
use crate::error::SourceError;

/// Query parameter value: a string, a number or a flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl ParamValue {
    /// Empty strings, zero, NaN and `false` are left out of the query string.
    pub fn is_falsy(&self) -> bool {
        match self {
            ParamValue::Text(s) => s.is_empty(),
            ParamValue::Integer(n) => *n == 0,
            ParamValue::Float(n) => *n == 0.0 || n.is_nan(),
            ParamValue::Flag(b) => !b,
        }
    }

    fn to_query_value(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Float(n) => n.to_string(),
            ParamValue::Flag(b) => b.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(ParamValue::Integer)
            .unwrap_or(ParamValue::Float(value as f64))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

/// Builds TMDB request URLs carrying the API key and a language tag.
#[derive(Debug, Clone)]
pub struct ApiUrlBuilder {
    base: Url,
    api_key: String,
    language: String,
}

impl ApiUrlBuilder {
    /// Fails only when `base_url` is not an absolute URL. Callers treat that as fatal.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let base = Url::parse(base_url).map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(SourceError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            base,
            api_key: api_key.into(),
            language: language.into(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Build `{base}{path}?api_key=..&language=..&<params>`.
    ///
    /// `params: None` builds a URL with only the key and language.
    /// `params: Some(&[])` returns `None`. Falsy values are skipped.
    pub fn api_url(
        &self,
        path: &str,
        params: Option<&[(&str, ParamValue)]>,
        language: Option<&str>,
    ) -> Option<String> {
        if matches!(params, Some(p) if p.is_empty()) {
            return None;
        }

        let mut url = self.base.clone();
        let base_path = self.base.path().trim_end_matches('/');
        if path.starts_with('/') || path.is_empty() {
            url.set_path(&format!("{}{}", base_path, path));
        } else {
            url.set_path(&format!("{}/{}", base_path, path));
        }
        url.set_query(None);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            query.append_pair("language", language.unwrap_or(&self.language));
            for (key, value) in params.unwrap_or(&[]) {
                if value.is_falsy() {
                    continue;
                }
                query.append_pair(key, &value.to_query_value());
            }
        }

        Some(url.to_string())
    }
}

/// Replace the `api_key` query value so URLs can be logged.
pub fn redact_api_key(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            if k == "api_key" {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    if pairs.is_empty() {
        return parsed.to_string();
    }

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ApiUrlBuilder {
        ApiUrlBuilder::new("https://api.themoviedb.org/3", "secret", "zh-TW").unwrap()
    }

    #[test]
    fn test_absent_params_builds_url_with_key_and_language() {
        let url = builder().api_url("/movie/popular", None, None).unwrap();
        assert_eq!(url, "https://api.themoviedb.org/3/movie/popular?api_key=secret&language=zh-TW");
    }

    #[test]
    fn test_empty_params_returns_none() {
        assert_eq!(builder().api_url("/movie/popular", Some(&[]), None), None);
    }

    #[test]
    fn test_params_appended_in_order() {
        let params = [("page", ParamValue::from(2u32)), ("query", ParamValue::from("dune"))];
        let url = builder().api_url("/search/movie", Some(&params), None).unwrap();
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/search/movie?api_key=secret&language=zh-TW&page=2&query=dune"
        );
    }

    #[test]
    fn test_falsy_params_dropped() {
        let params = [
            ("page", ParamValue::from(0u32)),
            ("query", ParamValue::from("")),
            ("include_adult", ParamValue::from(false)),
            ("year", ParamValue::from(f64::NAN)),
            ("region", ParamValue::from("TW")),
        ];
        let url = builder().api_url("/search/movie", Some(&params), None).unwrap();
        assert!(url.ends_with("language=zh-TW&region=TW"), "{}", url);
    }

    #[test]
    fn test_language_override() {
        let url = builder().api_url("/movie/550", None, Some("en-US")).unwrap();
        assert!(url.contains("language=en-US"));
        assert!(!url.contains("zh-TW"));
    }

    #[test]
    fn test_query_is_encoded() {
        let params = [("query", ParamValue::from("the lord & rings"))];
        let url = builder().api_url("/search/movie", Some(&params), None).unwrap();
        assert!(url.contains("query=the+lord+%26+rings"), "{}", url);
    }

    #[test]
    fn test_base_with_trailing_slash() {
        let builder = ApiUrlBuilder::new("http://localhost:8080/3/", "k", "en").unwrap();
        let url = builder.api_url("/movie/1/credits", None, None).unwrap();
        assert!(url.starts_with("http://localhost:8080/3/movie/1/credits?"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiUrlBuilder::new("not a url", "k", "en").unwrap_err();
        assert!(matches!(err, SourceError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_redact_api_key() {
        let url = builder().api_url("/movie/popular", None, None).unwrap();
        let redacted = redact_api_key(&url);
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("api_key=***") || redacted.contains("api_key=%2A%2A%2A"));
    }
}
