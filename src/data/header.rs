//! Two-level header flattening and the category index.
//!
//! A sheet header is two rows: categories on top, subcategories below. Each
//! column becomes a single flat name `Category_Subcategory`, made unique by
//! suffixing repeats with `_1`, `_2`, ... in the order they are seen.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::error::{MatrixError, Result};

/// Separator between the category and subcategory parts of a flat name.
pub const SEPARATOR: char = '_';

// ---------------------------------------------------------------------------
// HeaderCell – one column of the two-level header
// ---------------------------------------------------------------------------

/// The `(top, bottom)` header pair of one column. Either level may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub top: Option<String>,
    pub bottom: Option<String>,
}

impl HeaderCell {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        HeaderCell {
            top: Some(top.into()),
            bottom: Some(bottom.into()),
        }
    }

    /// A column with only a top-level label, such as the employee name column.
    pub fn identifier(top: impl Into<String>) -> Self {
        HeaderCell {
            top: Some(top.into()),
            bottom: None,
        }
    }

    /// Join the present levels with `_` and trim the result.
    ///
    /// A blank level counts as absent.
    pub fn flat_name(&self) -> String {
        let parts: Vec<&str> = [self.top.as_deref(), self.bottom.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        parts.join("_").trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// CategoryIndex – category → ordered subcategories
// ---------------------------------------------------------------------------

/// Category → subcategories, both in first-seen order.
///
/// Subcategories may repeat under one category; every score column contributes
/// exactly one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryIndex {
    /// Append `subcategory` under `category`, creating the category if new.
    pub fn push(&mut self, category: &str, subcategory: &str) {
        match self.entries.iter_mut().find(|(c, _)| c == category) {
            Some((_, subs)) => subs.push(subcategory.to_string()),
            None => self
                .entries
                .push((category.to_string(), vec![subcategory.to_string()])),
        }
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn subcategories(&self, category: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, subs)| subs.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(c, subs)| (c.as_str(), subs.as_slice()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Output of [`flatten_header`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatHeader {
    /// One unique name per input column, in input order.
    pub names: Vec<String>,
    pub categories: CategoryIndex,
}

/// Build the flat column name for a category/subcategory pair.
pub fn flat_column_name(category: &str, subcategory: &str) -> String {
    format!("{category}{SEPARATOR}{subcategory}")
}

/// Split a flat name at its first `_` into `(category, subcategory)`.
pub fn split_flat_name(name: &str) -> Option<(&str, &str)> {
    name.split_once(SEPARATOR)
}

/// Text after the first `_`, or the whole name when there is none.
pub fn subcategory_label(name: &str) -> &str {
    split_flat_name(name).map_or(name, |(_, sub)| sub)
}

/// Make names unique: the n-th repeat of a name (n ≥ 1) gets suffix `_n`.
///
/// A suffixed name that collides with a name already produced keeps counting
/// up, so the output is always pairwise distinct.
pub fn dedupe_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut produced: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for name in names {
        let name = name.into();
        let first = !repeats.contains_key(&name) && !produced.contains(&name);
        let count = repeats.entry(name.clone()).or_insert(0);
        let unique = if first {
            name
        } else {
            loop {
                *count += 1;
                let candidate = format!("{name}{SEPARATOR}{count}");
                if !produced.contains(&candidate) {
                    break candidate;
                }
            }
        };
        produced.insert(unique.clone());
        out.push(unique);
    }
    out
}

/// Flatten a two-level header and index its score columns by category.
///
/// Column 0 is the identifier and is not indexed. Every other flat name must
/// split at a `_` into a non-blank category and subcategory, otherwise the
/// header is rejected as malformed.
pub fn flatten_header(header: &[HeaderCell]) -> Result<FlatHeader> {
    if header.is_empty() {
        return Err(MatrixError::EmptyHeader);
    }

    let names = dedupe_names(header.iter().map(HeaderCell::flat_name));

    let mut categories = CategoryIndex::default();
    for (position, name) in names.iter().enumerate().skip(1) {
        let (category, subcategory) = split_flat_name(name)
            .filter(|(c, s)| !c.trim().is_empty() && !s.trim().is_empty())
            .ok_or_else(|| MatrixError::MalformedHeader {
                position,
                name: name.clone(),
            })?;
        categories.push(category, subcategory);
    }

    Ok(FlatHeader { names, categories })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn skill_header() -> Vec<HeaderCell> {
        vec![
            HeaderCell::identifier("Name"),
            HeaderCell::new("Coding", "Python"),
            HeaderCell::new("Coding", "Go"),
            HeaderCell::new("Soft Skills", "Communication"),
            HeaderCell::new("Coding", "Python"),
        ]
    }

    #[test]
    fn test_flat_name_joins_and_trims() {
        assert_eq!(HeaderCell::new("Coding", "Python").flat_name(), "Coding_Python");
        assert_eq!(HeaderCell::identifier(" Name ").flat_name(), "Name");
        assert_eq!(HeaderCell::new(" Coding", "Rust ").flat_name(), "Coding_Rust");
        let bottom_only = HeaderCell {
            top: None,
            bottom: Some("Python".to_string()),
        };
        assert_eq!(bottom_only.flat_name(), "Python");
    }

    #[test]
    fn test_dedupe_counts_per_name() {
        let names = dedupe_names(["a_x", "a_y", "a_x", "a_x", "a_y"]);
        assert_eq!(names, vec!["a_x", "a_y", "a_x_1", "a_x_2", "a_y_1"]);
    }

    #[test]
    fn test_flatten_header() {
        let flat = flatten_header(&skill_header()).unwrap();
        assert_eq!(
            flat.names,
            vec![
                "Name",
                "Coding_Python",
                "Coding_Go",
                "Soft Skills_Communication",
                "Coding_Python_1"
            ]
        );
        let categories: Vec<&str> = flat.categories.categories().collect();
        assert_eq!(categories, vec!["Coding", "Soft Skills"]);
        assert_eq!(
            flat.categories.subcategories("Coding").unwrap(),
            &["Python", "Go", "Python_1"]
        );
        assert_eq!(
            flat.categories.subcategories("Soft Skills").unwrap(),
            &["Communication"]
        );
    }

    #[test]
    fn test_subcategory_keeps_embedded_underscores() {
        let header = vec![
            HeaderCell::identifier("Name"),
            HeaderCell::new("Cloud", "AWS_Lambda"),
        ];
        let flat = flatten_header(&header).unwrap();
        assert_eq!(
            flat.categories.subcategories("Cloud").unwrap(),
            &["AWS_Lambda"]
        );
    }

    #[test]
    fn test_duplicate_subcategory_strings_allowed() {
        // Repeated headers are deduplicated by flattening, so the index only
        // sees identical subcategories when pushed directly.
        let header = vec![
            HeaderCell::identifier("Name"),
            HeaderCell::new("A", "B"),
            HeaderCell::new("A", "B"),
        ];
        let flat = flatten_header(&header).unwrap();
        assert_eq!(flat.categories.subcategories("A").unwrap(), &["B", "B_1"]);

        let mut index = CategoryIndex::default();
        index.push("A", "B");
        index.push("A", "B");
        assert_eq!(index.subcategories("A").unwrap(), &["B", "B"]);
    }

    #[test]
    fn test_missing_subcategory_is_malformed() {
        let header = vec![
            HeaderCell::identifier("Name"),
            HeaderCell::new("Coding", "Python"),
            HeaderCell::identifier("Leadership"),
        ];
        assert_eq!(
            flatten_header(&header).unwrap_err(),
            MatrixError::MalformedHeader {
                position: 2,
                name: "Leadership".to_string()
            }
        );
    }

    #[test]
    fn test_blank_subcategory_is_malformed() {
        let header = vec![
            HeaderCell::identifier("Name"),
            HeaderCell::new("Coding", "Python"),
            HeaderCell::new("Leadership", "   "),
        ];
        assert_eq!(
            flatten_header(&header).unwrap_err(),
            MatrixError::MalformedHeader {
                position: 2,
                name: "Leadership".to_string()
            }
        );
        assert_eq!(HeaderCell::new("Leadership", "").flat_name(), "Leadership");
    }

    #[test]
    fn test_trailing_separator_is_malformed() {
        let header = vec![
            HeaderCell::identifier("Name"),
            HeaderCell::identifier("Leadership_"),
        ];
        assert!(matches!(
            flatten_header(&header),
            Err(MatrixError::MalformedHeader { position: 1, .. })
        ));
    }

    #[test]
    fn test_identifier_may_lack_separator() {
        let flat = flatten_header(&[HeaderCell::identifier("Name")]).unwrap();
        assert_eq!(flat.names, vec!["Name"]);
        assert!(flat.categories.is_empty());
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(flatten_header(&[]).unwrap_err(), MatrixError::EmptyHeader);
    }

    #[test]
    fn test_subcategory_label() {
        assert_eq!(subcategory_label("Coding_Python"), "Python");
        assert_eq!(subcategory_label("Cloud_AWS_Lambda"), "AWS_Lambda");
        assert_eq!(subcategory_label("Name"), "Name");
    }

    fn header_strategy() -> impl Strategy<Value = Vec<HeaderCell>> {
        let part = prop::sample::select(vec!["Coding", "Python", "Go", "Soft", "A_B", "x"]);
        prop::collection::vec((part.clone(), part), 0..12).prop_map(|pairs| {
            let mut header = vec![HeaderCell::identifier("Name")];
            header.extend(pairs.into_iter().map(|(t, b)| HeaderCell::new(t, b)));
            header
        })
    }

    proptest! {
        #[test]
        fn flattened_names_are_unique_and_complete(header in header_strategy()) {
            let flat = flatten_header(&header).unwrap();
            prop_assert_eq!(flat.names.len(), header.len());
            let distinct: HashSet<&String> = flat.names.iter().collect();
            prop_assert_eq!(distinct.len(), flat.names.len());
        }

        #[test]
        fn category_index_counts_match_columns(header in header_strategy()) {
            let flat = flatten_header(&header).unwrap();
            let mut expected_order: Vec<&str> = Vec::new();
            for name in flat.names.iter().skip(1) {
                let (category, _) = split_flat_name(name).unwrap();
                if !expected_order.contains(&category) {
                    expected_order.push(category);
                }
            }
            let order: Vec<&str> = flat.categories.categories().collect();
            prop_assert_eq!(&order, &expected_order);
            for category in order {
                let count = flat
                    .names
                    .iter()
                    .skip(1)
                    .filter(|n| split_flat_name(n).map(|(c, _)| c) == Some(category))
                    .count();
                prop_assert_eq!(flat.categories.subcategories(category).unwrap().len(), count);
            }
        }

        #[test]
        fn nth_repeat_gets_numeric_suffix(k in 1usize..6) {
            let names = dedupe_names(std::iter::repeat("Coding_Go").take(k));
            for (i, name) in names.iter().enumerate() {
                if i == 0 {
                    prop_assert_eq!(name.as_str(), "Coding_Go");
                } else {
                    prop_assert_eq!(name, &format!("Coding_Go_{i}"));
                }
            }
        }
    }
}
