//! Fixed catalogue of word-set categories. Selection tokens refer to these by index.

pub const CATEGORIES: &[&str] = &[
    "Animals",
    "Food",
    "Travel",
    "Family",
    "Work",
    "Home",
    "Nature",
    "Sports",
    "Health",
    "Clothes",
    "Weather",
    "Emotions",
    "Technology",
    "Colors",
    "City",
    "Education",
];

pub fn category(index: usize) -> Option<&'static str> {
    CATEGORIES.get(index).copied()
}
