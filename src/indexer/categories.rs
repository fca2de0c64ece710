//! Newznab movie category definitions
//!
//! Newznab categories are numbered in thousands for the main category
//! (2000 = Movies) and add tens for subcategories (2040 = Movies/HD).

/// A Newznab category definition
#[derive(Debug, Clone)]
pub struct NewznabCategory {
    pub id: i32,
    pub name: &'static str,
    pub parent_id: Option<i32>,
}

impl NewznabCategory {
    pub const fn new(id: i32, name: &'static str, parent_id: Option<i32>) -> Self {
        Self {
            id,
            name,
            parent_id,
        }
    }
}

/// Common category constants for easy reference
pub mod cats {
    pub const MOVIES: i32 = 2000;
    pub const MOVIES_FOREIGN: i32 = 2010;
    pub const MOVIES_OTHER: i32 = 2020;
    pub const MOVIES_SD: i32 = 2030;
    pub const MOVIES_HD: i32 = 2040;
    pub const MOVIES_UHD: i32 = 2045;
    pub const MOVIES_BLURAY: i32 = 2050;
    pub const MOVIES_3D: i32 = 2060;
    pub const MOVIES_DVD: i32 = 2070;
    pub const MOVIES_WEBDL: i32 = 2080;
}

/// Standard movie categories from the Newznab category list
pub static MOVIE_CATEGORIES: &[NewznabCategory] = &[
    NewznabCategory::new(cats::MOVIES, "Movies", None),
    NewznabCategory::new(cats::MOVIES_FOREIGN, "Movies/Foreign", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_OTHER, "Movies/Other", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_SD, "Movies/SD", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_HD, "Movies/HD", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_UHD, "Movies/UHD", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_BLURAY, "Movies/BluRay", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_3D, "Movies/3D", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_DVD, "Movies/DVD", Some(cats::MOVIES)),
    NewznabCategory::new(cats::MOVIES_WEBDL, "Movies/WEB-DL", Some(cats::MOVIES)),
];

/// Categories a newly configured indexer searches by default
pub const DEFAULT_MOVIE_CATEGORIES: &[i32] = &[
    cats::MOVIES,
    cats::MOVIES_FOREIGN,
    cats::MOVIES_OTHER,
    cats::MOVIES_SD,
    cats::MOVIES_HD,
    cats::MOVIES_UHD,
    cats::MOVIES_BLURAY,
    cats::MOVIES_3D,
];

/// Get a category by ID
pub fn get_category(id: i32) -> Option<&'static NewznabCategory> {
    MOVIE_CATEGORIES.iter().find(|c| c.id == id)
}

/// Sort and deduplicate categories into the `cat=` query value
pub fn categories_query(categories: &[i32]) -> String {
    let mut sorted = categories.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    sorted
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
