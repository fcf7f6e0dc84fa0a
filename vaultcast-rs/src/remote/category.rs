//! Site categories with their effective, parent-qualified names.

use super::types::SiteCategory;
use serde::Serialize;
use std::collections::BTreeMap;

/// A category whose `name` already carries its parent prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    /// Effective name, `"Parent/Child"` for subcategories.
    pub name: String,
    pub slug: String,
    pub read_restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<i64>,
}

/// Categories of a site, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Categories {
    by_id: BTreeMap<i64, Category>,
}

impl Categories {
    /// Build from the raw `/site.json` listing.
    pub fn from_site(site: Vec<SiteCategory>) -> Self {
        let own_names: BTreeMap<i64, String> =
            site.iter().map(|c| (c.id, c.name.clone())).collect();

        let by_id = site
            .into_iter()
            .map(|c| {
                let name = match c.parent_category_id.and_then(|p| own_names.get(&p)) {
                    Some(parent) => format!("{}/{}", parent, c.name),
                    None => c.name,
                };
                let category = Category {
                    id: c.id,
                    name,
                    slug: c.slug,
                    read_restricted: c.read_restricted,
                    parent_category_id: c.parent_category_id,
                };
                (category.id, category)
            })
            .collect();

        Self { by_id }
    }

    /// Effective names, ordered by category id.
    pub fn names(&self) -> Vec<&str> {
        self.by_id.values().map(|c| c.name.as_str()).collect()
    }

    /// Find a category id by its effective name (exact match).
    pub fn id_by_name(&self, name: &str) -> Option<i64> {
        self.by_id.values().find(|c| c.name == name).map(|c| c.id)
    }

    pub fn get(&self, id: i64) -> Option<&Category> {
        self.by_id.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
