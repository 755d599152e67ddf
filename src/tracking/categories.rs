//! Category configuration.
//!
//! Categories map to an ordered list of allowed subcategories. The
//! configuration lives in `categories.json` as a plain JSON object; when the
//! file is absent the built-in defaults are used until the first change is
//! saved.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TimetrackError;
use crate::storage;

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Product dev",
        &[
            "Software development",
            "SysAdmin for products",
            "Tech check-in for development",
        ],
    ),
    (
        "Swarm Support",
        &[
            "Tech support",
            "Tech maintenance",
            "Communication",
            "Administration",
            "Coordination",
        ],
    ),
    (
        "Internal Tech",
        &[
            "Support",
            "Galaxy",
            "Homepage development",
            "SysAdmin",
            "Tech Coordination",
            "Tech check-in SysAdmin",
        ],
    ),
    (
        "Sales",
        &[
            "Direct sales",
            "Sales meetings/calls",
            "CRM work",
            "Customer research",
            "Marketing & Sales Meeting",
        ],
    ),
    (
        "Marketing",
        &[
            "Branding",
            "Campaigns",
            "Social media",
            "Homepage maintenance",
            "Design",
            "Marketing & Sales Meeting",
        ],
    ),
    (
        "Admin & Coord",
        &[
            "Financial",
            "Administration",
            "Legal",
            "Planning",
            "Board",
            "Quality management",
            "Coordination meetings",
            "General communication",
            "General Sprint meetings",
        ],
    ),
    ("Other", &["MetaLand", "Other Other"]),
];

/// Category name to allowed subcategories, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories {
    entries: IndexMap<String, Vec<String>>,
}

impl Default for Categories {
    fn default() -> Self {
        let entries = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, subs)| {
                (
                    (*name).to_string(),
                    subs.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }
}

impl Categories {
    /// Empty configuration.
    #[cfg(test)]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Load from `path`, using the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageRead` if the file exists but is not a JSON object of
    /// string lists.
    pub fn load(path: &Path) -> Result<Self, TimetrackError> {
        Ok(storage::read_json(path)?.unwrap_or_default())
    }

    /// Write to `path`.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TimetrackError> {
        storage::write_json_atomic(path, self)
    }

    /// Category names in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate `(category, subcategories)` in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no categories are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, category: &str) -> Option<(&String, &Vec<String>)> {
        let wanted = category.trim();
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
    }

    /// Canonical name of a category, matched case-insensitively.
    #[must_use]
    pub fn canonical(&self, category: &str) -> Option<&str> {
        self.find(category).map(|(name, _)| name.as_str())
    }

    /// Allowed subcategories for a category (empty if unknown).
    #[must_use]
    pub fn subcategories(&self, category: &str) -> &[String] {
        self.find(category)
            .map(|(_, subs)| subs.as_slice())
            .unwrap_or_default()
    }

    /// Resolve a category/subcategory pair to canonical spellings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` listing the valid choices if either name
    /// is unknown.
    pub fn resolve(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<(String, Option<String>), TimetrackError> {
        let Some((name, subs)) = self.find(category) else {
            let valid = self.names().collect::<Vec<_>>().join(", ");
            return Err(TimetrackError::InvalidCategory(format!(
                "Unknown category '{category}'. Valid categories are: {valid}"
            )));
        };

        let Some(sub) = subcategory else {
            return Ok((name.clone(), None));
        };

        let wanted = sub.trim();
        subs.iter()
            .find(|s| s.eq_ignore_ascii_case(wanted))
            .map(|s| (name.clone(), Some(s.clone())))
            .ok_or_else(|| {
                let valid = subs
                    .iter()
                    .map(|s| format!("- {s}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                TimetrackError::InvalidCategory(format!(
                    "Invalid subcategory '{sub}'! Valid subcategories for {name} are:\n{valid}"
                ))
            })
    }

    /// Add a category, or extend an existing one with new subcategories.
    ///
    /// Returns the subcategories that were actually added.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` if a name is blank.
    pub fn add(
        &mut self,
        category: &str,
        subcategories: &[String],
    ) -> Result<Vec<String>, TimetrackError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TimetrackError::InvalidCategory(
                "Category name cannot be empty".to_string(),
            ));
        }
        if subcategories.iter().any(|s| s.trim().is_empty()) {
            return Err(TimetrackError::InvalidCategory(
                "Subcategory name cannot be empty".to_string(),
            ));
        }

        let key = self
            .canonical(category)
            .map_or_else(|| category.to_string(), str::to_string);
        let subs = self.entries.entry(key).or_default();

        let mut added = Vec::new();
        for sub in subcategories {
            let sub = sub.trim();
            if !subs.iter().any(|s| s.eq_ignore_ascii_case(sub)) {
                subs.push(sub.to_string());
                added.push(sub.to_string());
            }
        }
        Ok(added)
    }

    /// Remove a whole category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` if the category is unknown.
    pub fn remove(&mut self, category: &str) -> Result<String, TimetrackError> {
        let (name, _) = self.resolve(category, None)?;
        self.entries.shift_remove(&name);
        Ok(name)
    }

    /// Remove one subcategory from a category.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCategory` if either name is unknown.
    pub fn remove_subcategory(
        &mut self,
        category: &str,
        subcategory: &str,
    ) -> Result<(String, String), TimetrackError> {
        let (name, sub) = self.resolve(category, Some(subcategory))?;
        let sub = sub.unwrap_or_default();
        if let Some(subs) = self.entries.get_mut(&name) {
            subs.retain(|s| s != &sub);
        }
        Ok((name, sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_keep_order() {
        let categories = Categories::default();
        let names: Vec<_> = categories.names().collect();
        assert_eq!(names.first(), Some(&"Product dev"));
        assert_eq!(names.last(), Some(&"Other"));
        assert_eq!(categories.len(), 7);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let categories = Categories::default();
        let (cat, sub) = categories.resolve("sales", Some("crm WORK")).unwrap();
        assert_eq!(cat, "Sales");
        assert_eq!(sub.as_deref(), Some("CRM work"));
    }

    #[test]
    fn test_resolve_without_subcategory() {
        let categories = Categories::default();
        let (cat, sub) = categories.resolve("Marketing", None).unwrap();
        assert_eq!(cat, "Marketing");
        assert!(sub.is_none());
    }

    #[test]
    fn test_resolve_unknown_category() {
        let categories = Categories::default();
        let err = categories.resolve("Gardening", None).unwrap_err();
        assert!(matches!(err, TimetrackError::InvalidCategory(_)));
        assert!(err.to_string().contains("Valid categories"));
    }

    #[test]
    fn test_resolve_unknown_subcategory_lists_valid() {
        let categories = Categories::default();
        let err = categories.resolve("Other", Some("Nope")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("- MetaLand"));
        assert!(msg.contains("- Other Other"));
    }

    #[test]
    fn test_add_and_remove() {
        let mut categories = Categories::empty();
        let added = categories
            .add("Research", &["Reading".to_string(), "Writing".to_string()])
            .unwrap();
        assert_eq!(added.len(), 2);

        // Existing subcategory is not duplicated
        let added = categories
            .add("research", &["reading".to_string(), "Review".to_string()])
            .unwrap();
        assert_eq!(added, vec!["Review".to_string()]);
        assert_eq!(categories.subcategories("Research").len(), 3);

        categories.remove_subcategory("Research", "writing").unwrap();
        assert_eq!(categories.subcategories("Research"), ["Reading", "Review"]);

        assert_eq!(categories.remove("RESEARCH").unwrap(), "Research");
        assert!(categories.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_names() {
        let mut categories = Categories::empty();
        assert!(categories.add("  ", &[]).is_err());
        assert!(categories.add("Research", &[" ".to_string()]).is_err());
    }

    #[test]
    fn test_load_missing_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let categories = Categories::load(&temp_dir.path().join("categories.json")).unwrap();
        assert_eq!(categories, Categories::default());
    }

    #[test]
    fn test_save_and_load_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");

        let mut categories = Categories::empty();
        categories.add("Zeta", &["b".to_string(), "a".to_string()]).unwrap();
        categories.add("Alpha", &[]).unwrap();
        categories.save(&path).unwrap();

        let loaded = Categories::load(&path).unwrap();
        assert_eq!(loaded.names().collect::<Vec<_>>(), ["Zeta", "Alpha"]);
        assert_eq!(loaded.subcategories("Zeta"), ["b", "a"]);
    }

    #[test]
    fn test_load_malformed_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        std::fs::write(&path, r#"{"Sales": "not a list"}"#).unwrap();

        let err = Categories::load(&path).unwrap_err();
        assert!(matches!(err, TimetrackError::StorageRead { .. }));
        assert!(err.to_string().contains("categories.json"));
    }
}
