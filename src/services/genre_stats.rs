use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::{CatalogWork, GenreId, GenreStat};

/// Computes per-genre frequency across the seed works
///
/// A genre listed twice on one work counts once for that work. The display name
/// comes from the first seed observed carrying the genre. Ordered by frequency
/// descending, then by name ascending.
pub fn aggregate(seed_works: &[CatalogWork]) -> Vec<GenreStat> {
    if seed_works.is_empty() {
        return Vec::new();
    }

    let mut index: HashMap<GenreId, usize> = HashMap::new();
    let mut stats: Vec<GenreStat> = Vec::new();

    for work in seed_works {
        let mut seen_in_work = HashSet::new();
        for genre in &work.genres {
            if !seen_in_work.insert(genre.id) {
                continue;
            }

            match index.get(&genre.id) {
                Some(&position) => stats[position].frequency += 1,
                None => {
                    index.insert(genre.id, stats.len());
                    stats.push(GenreStat {
                        genre_id: genre.id,
                        name: genre.name.clone(),
                        frequency: 1,
                        percentage: 0.0,
                    });
                }
            }
        }
    }

    let total = seed_works.len() as f64;
    for stat in &mut stats {
        stat.percentage = stat.frequency as f64 / total * 100.0;
    }

    stats.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| compare_names(&a.name, &b.name))
    });

    stats
}

/// Case-insensitive name order, falling back to byte order for a total order
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn work(id: u64, genres: &[(u64, &str)]) -> CatalogWork {
        let mut work = CatalogWork::new(id, format!("Work {}", id));
        work.genres = genres.iter().map(|(gid, name)| Genre::new(*gid, *name)).collect();
        work
    }

    #[test]
    fn test_empty_seeds() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_frequency_and_percentage() {
        let seeds = vec![
            work(1, &[(1, "Action"), (10, "Fantasy")]),
            work(2, &[(1, "Action"), (4, "Comedy")]),
            work(3, &[(1, "Action"), (10, "Fantasy")]),
            work(4, &[(22, "Romance")]),
        ];

        let stats = aggregate(&seeds);
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Fantasy", "Comedy", "Romance"]);

        assert_eq!(stats[0].frequency, 3);
        assert_eq!(stats[0].percentage, 75.0);
        assert_eq!(stats[1].frequency, 2);
        assert_eq!(stats[1].percentage, 50.0);
        assert_eq!(stats[3].percentage, 25.0);

        // Percentages need not sum to 100
        let sum: f64 = stats.iter().map(|s| s.percentage).sum();
        assert_eq!(sum, 175.0);
    }

    #[test]
    fn test_duplicate_genre_within_work_counts_once() {
        let seeds = vec![work(1, &[(1, "Action"), (1, "Action")]), work(2, &[])];

        let stats = aggregate(&seeds);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].frequency, 1);
        assert_eq!(stats[0].percentage, 50.0);
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let seeds = vec![work(
            1,
            &[(10, "Fantasy"), (8, "Drama"), (2, "adventure"), (1, "Action")],
        )];

        let names: Vec<String> = aggregate(&seeds).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Action", "adventure", "Drama", "Fantasy"]);
    }

    #[test]
    fn test_first_seen_name_wins() {
        let seeds = vec![work(1, &[(1, "Action")]), work(2, &[(1, "Acción")])];

        let stats = aggregate(&seeds);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "Action");
        assert_eq!(stats[0].frequency, 2);
    }
}
