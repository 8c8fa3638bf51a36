//! Search filter and favorite annotation for breed lists

use std::collections::HashSet;

use cat_breeds_lib::domain::Breed;

/// Case-insensitive substring match on name, origin or any temperament tag.
/// `query` must already be lowercase.
fn matches(breed: &Breed, query: &str) -> bool {
    breed.name.to_lowercase().contains(query)
        || breed.origin.to_lowercase().contains(query)
        || breed
            .temperament
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

/// Breeds matching `query` as typed, whitespace included; only the empty
/// query keeps everything
pub fn filter_breeds(breeds: &[Breed], query: &str) -> Vec<Breed> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return breeds.to_vec();
    }
    breeds
        .iter()
        .filter(|breed| matches(breed, &query))
        .cloned()
        .collect()
}

pub fn annotate(breed: &Breed, favorites: &HashSet<String>) -> Breed {
    breed.annotated(favorites.contains(&breed.id))
}

pub fn favorite_ids(favorites: &[Breed]) -> HashSet<String> {
    favorites.iter().map(|breed| breed.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breeds() -> Vec<Breed> {
        vec![
            Breed::new("pers", "Persian", "Iran").with_temperament(["Calm", "Affectionate"]),
            Breed::new("sibe", "Siberian", "Russia").with_temperament(["Playful"]),
            Breed::new("abys", "Abyssinian", "Egypt").with_temperament(["Active", "Gentle"]),
        ]
    }

    #[test]
    fn test_search_by_origin() {
        let result = filter_breeds(&breeds()[..2], "iran");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Persian");
    }

    #[test]
    fn test_search_fields_case_insensitive() {
        let all = breeds();
        let ids = |q: &str| -> Vec<String> {
            filter_breeds(&all, q).into_iter().map(|b| b.id).collect()
        };
        assert_eq!(ids("SIBER"), vec!["sibe"]);
        assert_eq!(ids("gentle"), vec!["abys"]);
        assert_eq!(ids("a"), vec!["pers", "sibe", "abys"]);
        assert!(ids("zebra").is_empty());
    }

    #[test]
    fn test_empty_query_is_identity() {
        let all = breeds();
        assert_eq!(filter_breeds(&all, ""), all);
    }

    #[test]
    fn test_whitespace_is_part_of_the_query() {
        let all = vec![
            Breed::new("emau", "Egyptian Mau", "Egypt"),
            Breed::new("abys", "Abyssinian", "Egypt"),
        ];
        let ids = |q: &str| -> Vec<String> {
            filter_breeds(&all, q).into_iter().map(|b| b.id).collect()
        };
        assert_eq!(ids(" "), vec!["emau"]);
        assert!(ids("abyssinian ").is_empty());
        assert_eq!(ids("n m"), vec!["emau"]);
    }

    #[test]
    fn test_annotation_follows_membership() {
        let favorites: HashSet<String> = ["abys".to_string()].into_iter().collect();
        for breed in breeds() {
            let annotated = annotate(&breed.annotated(true), &favorites);
            assert_eq!(annotated.is_favorite, breed.id == "abys");
        }
    }

    #[test]
    fn test_favorite_ids() {
        let ids = favorite_ids(&breeds());
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("sibe"));
    }
}
