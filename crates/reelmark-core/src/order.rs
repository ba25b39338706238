use reelmark_models::{Movie, OrderDirection, OrderKey};
use std::cmp::Ordering;

/// Sorted copy of `list`. Ties keep their input order.
///
/// Release dates compare as timestamps; an empty or unparseable date sorts as
/// the earliest possible value.
pub fn order_list(list: &[Movie], key: OrderKey, direction: OrderDirection) -> Vec<Movie> {
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: &Movie, b: &Movie, key: OrderKey) -> Ordering {
    match key {
        OrderKey::Popularity => a.popularity.total_cmp(&b.popularity),
        OrderKey::VoteAverage => a.vote_average.total_cmp(&b.vote_average),
        OrderKey::ReleaseDate => a.release_timestamp().cmp(&b.release_timestamp()),
    }
}
