//! Movie search criteria

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BEGINNING_THE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^the\s").expect("valid regex"));
static SPECIAL_CHARACTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[`'.]").expect("valid regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("valid regex"));
static REPEATED_PLUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+{2,}").expect("valid regex"));

/// What to look for when searching an indexer for a movie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieSearchCriteria {
    /// TMDB id; `None` or non-positive means unknown
    pub tmdb_id: Option<i32>,
    /// Scene titles as released
    pub scene_titles: Vec<String>,
    /// Cleaned scene titles, same order and length as `scene_titles`
    pub clean_scene_titles: Vec<String>,
    /// Release year
    pub year: i32,
}

impl MovieSearchCriteria {
    pub fn new(tmdb_id: Option<i32>, year: i32) -> Self {
        Self {
            tmdb_id,
            year,
            ..Default::default()
        }
    }

    /// Add a scene title together with its cleaned variant
    pub fn with_scene_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.clean_scene_titles.push(clean_scene_title(&title));
        self.scene_titles.push(title);
        self
    }

    /// The TMDB id if it identifies a movie
    pub fn known_tmdb_id(&self) -> Option<i32> {
        self.tmdb_id.filter(|id| *id > 0)
    }
}

/// Clean a scene title for indexers that tokenize queries themselves
///
/// Drops a leading "The", spells out `&`, removes apostrophes and dots and
/// joins the remaining words with `+`.
///
/// ```ignore
/// assert_eq!(clean_scene_title("The Lord of the Rings"), "Lord+of+the+Rings");
/// ```
pub fn clean_scene_title(title: &str) -> String {
    let clean = BEGINNING_THE.replace(title, "");
    let clean = clean.replace('&', "and");
    let clean = SPECIAL_CHARACTER.replace_all(&clean, "");
    let clean = NON_WORD.replace_all(&clean, "+");
    let clean = REPEATED_PLUS.replace_all(&clean, "+");

    clean.trim_matches(|c| c == '+' || c == ' ').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_scene_title() {
        assert_eq!(clean_scene_title("The Lord of the Rings"), "Lord+of+the+Rings");
        assert_eq!(clean_scene_title("Fast & Furious"), "Fast+and+Furious");
        assert_eq!(clean_scene_title("Ocean's Eleven"), "Oceans+Eleven");
        assert_eq!(clean_scene_title("Mr. Nobody"), "Mr+Nobody");
        assert_eq!(clean_scene_title("Star Wars: Episode IV"), "Star+Wars+Episode+IV");
        assert_eq!(clean_scene_title("Amélie"), "Amélie");
        assert_eq!(clean_scene_title(""), "");
    }

    #[test]
    fn test_with_scene_title_keeps_variants_aligned() {
        let criteria = MovieSearchCriteria::new(Some(603), 1999)
            .with_scene_title("The Matrix")
            .with_scene_title("Matrix, The");

        assert_eq!(criteria.scene_titles, vec!["The Matrix", "Matrix, The"]);
        assert_eq!(criteria.clean_scene_titles, vec!["Matrix", "Matrix+The"]);
    }

    #[test]
    fn test_known_tmdb_id() {
        assert_eq!(MovieSearchCriteria::new(Some(603), 1999).known_tmdb_id(), Some(603));
        assert_eq!(MovieSearchCriteria::new(Some(0), 1999).known_tmdb_id(), None);
        assert_eq!(MovieSearchCriteria::new(Some(-1), 1999).known_tmdb_id(), None);
        assert_eq!(MovieSearchCriteria::new(None, 1999).known_tmdb_id(), None);
    }
}
