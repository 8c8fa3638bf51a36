//! Similar Breeds
//!
//! Same origin scores 2, each shared temperament tag scores 1 (both
//! case-insensitive). Ties break on name then id.

use std::collections::HashSet;

use crate::domain::Breed;

const SAME_ORIGIN_SCORE: usize = 2;

pub fn similar_breeds(target: &Breed, catalog: &[Breed], limit: usize) -> Vec<Breed> {
    let origin = target.origin.trim().to_lowercase();
    let tags: HashSet<String> = target
        .temperament
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    let mut scored: Vec<(usize, &Breed)> = catalog
        .iter()
        .filter(|b| b.id != target.id)
        .filter(|b| seen.insert(b.id.as_str()))
        .filter_map(|b| {
            let mut score = b
                .temperament
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect::<HashSet<_>>()
                .intersection(&tags)
                .count();
            if !origin.is_empty() && b.origin.trim().to_lowercase() == origin {
                score += SAME_ORIGIN_SCORE;
            }
            (score > 0).then_some((score, b))
        })
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| {
        sb.cmp(sa)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, b)| b.clone())
        .collect()
}
