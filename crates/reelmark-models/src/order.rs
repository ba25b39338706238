use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field a watchlist can be sorted by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    Popularity,
    VoteAverage,
    ReleaseDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKey::Popularity => "popularity",
            OrderKey::VoteAverage => "vote_average",
            OrderKey::ReleaseDate => "release_date",
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "popularity" => Ok(OrderKey::Popularity),
            "vote_average" | "rating" => Ok(OrderKey::VoteAverage),
            "release_date" | "date" => Ok(OrderKey::ReleaseDate),
            _ => Err(format!("Invalid order key: {}. Use 'popularity', 'vote_average' or 'release_date'", s)),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "asc"),
            OrderDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for OrderDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(OrderDirection::Asc),
            "desc" => Ok(OrderDirection::Desc),
            _ => Err(format!("Invalid order direction: {}. Use 'asc' or 'desc'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_key_from_str() {
        assert_eq!("popularity".parse::<OrderKey>().unwrap(), OrderKey::Popularity);
        assert_eq!("vote-average".parse::<OrderKey>().unwrap(), OrderKey::VoteAverage);
        assert_eq!("RELEASE_DATE".parse::<OrderKey>().unwrap(), OrderKey::ReleaseDate);
        assert!("title".parse::<OrderKey>().is_err());
    }

    #[test]
    fn test_order_direction_from_str() {
        assert_eq!("ASC".parse::<OrderDirection>().unwrap(), OrderDirection::Asc);
        assert_eq!("desc".parse::<OrderDirection>().unwrap(), OrderDirection::Desc);
        assert!("up".parse::<OrderDirection>().is_err());
    }
}
