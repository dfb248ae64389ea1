use std::collections::{BTreeMap, HashMap};

use crate::models::{NO_RATINGS_YET, Rating, RatingStats};

/// Summarize every rating in one pass.
///
/// "Most popular" picks the label with the highest count; ties go to the
/// lexicographically smallest label so the answer does not depend on the
/// order the store returns rows in.
pub fn compute_stats(ratings: &[Rating]) -> RatingStats {
    if ratings.is_empty() {
        return RatingStats::default();
    }

    let mut styles: HashMap<&str, usize> = HashMap::new();
    let mut breweries: HashMap<&str, usize> = HashMap::new();
    let mut rating_counts: BTreeMap<i32, usize> = BTreeMap::new();

    for rating in ratings {
        *styles.entry(rating.style.as_str()).or_default() += 1;
        *breweries.entry(rating.brewery.as_str()).or_default() += 1;
        *rating_counts.entry(rating.rating).or_default() += 1;
    }

    RatingStats {
        total_beers: ratings.len(),
        most_popular_style: most_frequent(&styles),
        most_rated_brewery: most_frequent(&breweries),
        rating_counts,
    }
}

fn most_frequent(counts: &HashMap<&str, usize>) -> String {
    counts
        .iter()
        .max_by(|(label_a, count_a), (label_b, count_b)| {
            count_a.cmp(count_b).then_with(|| label_b.cmp(label_a))
        })
        .map(|(label, _)| label.to_string())
        .unwrap_or_else(|| NO_RATINGS_YET.to_string())
}
