//! Singularisation of resource type names.
//!
//! `there are multiple widgets called:` names the resource type in the
//! plural. [`Inflector`] turns it back into the singular form used to look
//! up fixtures. The transform is a plain function so suites with irregular
//! or non-English type names can supply their own.

use std::borrow::Cow;

/// Signature of a singularisation transform.
pub type Singularize = fn(&str) -> String;

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("data", "datum"),
    ("criteria", "criterion"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "news",
    "series",
    "species",
    "sheep",
    "fish",
    "metadata",
];

/// Plurals ending in `-ies` whose singular keeps the `ie`.
const IE_PLURALS: &[&str] = &["movies", "cookies", "zombies", "pies", "ties", "lies", "selfies"];

/// Singularise a common English plural.
///
/// Handles a small irregular list, uncountable nouns and the regular
/// `-ies`, `-lves`, `-es` and `-s` endings. Only the plural ending is
/// rewritten, so the stem keeps its case (`BlogPosts` becomes `BlogPost`).
/// Words that do not look plural are returned unchanged.
///
/// # Examples
///
/// ```
/// use hexavel::inflect::english_singular;
/// assert_eq!(english_singular("widgets"), "widget");
/// assert_eq!(english_singular("Categories"), "Category");
/// assert_eq!(english_singular("BlogPosts"), "BlogPost");
/// ```
#[must_use]
pub fn english_singular(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }
    if let Some(singular) = irregular_singular(word, &lower) {
        return singular;
    }
    suffix_rule(&lower).map_or_else(
        || word.to_owned(),
        |(strip, replacement)| replace_suffix(word, strip, replacement),
    )
}

/// Irregular plurals match the whole word or its last camel-case segment.
fn irregular_singular(word: &str, lower: &str) -> Option<String> {
    IRREGULAR.iter().find_map(|(plural, singular)| {
        let cut = lower.strip_suffix(plural)?.len();
        let prefix = word.get(..cut)?;
        let tail = word.get(cut..)?;
        let at_boundary =
            prefix.is_empty() || tail.chars().next().is_some_and(char::is_uppercase);
        at_boundary.then(|| format!("{prefix}{}", match_case(tail, singular)))
    })
}

/// Bytes to drop from the end of the word and the text replacing them.
fn suffix_rule(lower: &str) -> Option<(usize, &'static str)> {
    if IE_PLURALS.iter().any(|plural| lower.ends_with(plural)) {
        return Some((1, ""));
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return Some((3, "y"));
    }
    if lower.ends_with("lves") {
        return Some((3, "f"));
    }
    if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|ending| lower.ends_with(ending))
    {
        return Some((2, ""));
    }
    // statuses, buses; houses and causes only drop the `s`
    if let Some(stem) = lower.strip_suffix("uses")
        && stem.chars().next_back().is_some_and(|c| !"aeiou".contains(c))
    {
        return Some((2, ""));
    }
    if ["ss", "us", "is"].iter().any(|ending| lower.ends_with(ending)) {
        return None;
    }
    lower.ends_with('s').then_some((1, ""))
}

fn replace_suffix(word: &str, strip: usize, replacement: &str) -> String {
    let cut = word.len().saturating_sub(strip);
    let (Some(stem), Some(removed)) = (word.get(..cut), word.get(cut..)) else {
        return word.to_owned();
    };
    if removed.chars().any(char::is_uppercase) {
        format!("{stem}{}", replacement.to_uppercase())
    } else {
        format!("{stem}{replacement}")
    }
}

fn match_case(original: &str, singular: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic());
    if letters.clone().next().is_some() && letters.all(char::is_uppercase) {
        return singular.to_uppercase();
    }
    let mut chars = singular.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(lead)) if first.is_uppercase() => {
            lead.to_uppercase().chain(chars).collect()
        }
        _ => singular.to_owned(),
    }
}

/// Switchable singularisation applied to resource type names.
#[derive(Debug, Clone, Copy)]
pub struct Inflector {
    enabled: bool,
    transform: Singularize,
}

impl Inflector {
    /// Create an inflector using [`english_singular`].
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            transform: english_singular,
        }
    }

    /// Replace the singularisation transform.
    #[must_use]
    pub const fn with_transform(mut self, transform: Singularize) -> Self {
        self.transform = transform;
        self
    }

    /// Report whether singularisation is applied.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Singularise `word` when enabled, otherwise borrow it unchanged.
    #[must_use]
    pub fn singular<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if self.enabled {
            Cow::Owned((self.transform)(word))
        } else {
            Cow::Borrowed(word)
        }
    }
}

impl Default for Inflector {
    fn default() -> Self {
        Self::new(true)
    }
}
