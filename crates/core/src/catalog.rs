//! The media catalog: items, the category taxonomy, and category filtering.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    /// Reserved id of the pseudo-category matching every item.
    pub const ALL: &'static str = "all";

    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::all()
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
}

impl Category {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: CategoryId::from(id),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u32,
    /// Opaque handle to the displayable media (an asset path or URL).
    #[serde(alias = "src")]
    pub source: String,
    pub category: CategoryId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate media item id {0}")]
    DuplicateItem(u32),
    #[error("duplicate category id \"{0}\"")]
    DuplicateCategory(CategoryId),
    #[error("catalog has no \"all\" category")]
    MissingAllCategory,
    #[error("media item {item} references unknown category \"{category}\"")]
    UnknownCategory { item: u32, category: CategoryId },
}

/// Immutable set of media items and their categories, both in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<MediaItem>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    categories: Vec<Category>,
    items: Vec<MediaItem>,
}

impl TryFrom<CatalogDocument> for Catalog {
    type Error = CatalogError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        Catalog::new(doc.categories, doc.items)
    }
}

impl Catalog {
    pub fn new(categories: Vec<Category>, items: Vec<MediaItem>) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }
        if !category_ids.contains(CategoryId::ALL) {
            return Err(CatalogError::MissingAllCategory);
        }

        let mut item_ids = HashSet::new();
        for item in &items {
            if !item_ids.insert(item.id) {
                return Err(CatalogError::DuplicateItem(item.id));
            }
            if item.category.is_all() || !category_ids.contains(item.category.as_str()) {
                return Err(CatalogError::UnknownCategory {
                    item: item.id,
                    category: item.category.clone(),
                });
            }
        }

        Ok(Self { categories, items })
    }

    /// The gallery shipped with the site: six categories and eighteen photos.
    pub fn builtin() -> Self {
        let categories = vec![
            Category::new("all", "Tous"),
            Category::new("gardiennage", "Gardiennage"),
            Category::new("nettoyage", "Nettoyage"),
            Category::new("entretien", "Entretien"),
            Category::new("hygiene", "Hygiène"),
            Category::new("evenements", "Événements"),
        ];

        let rows: [(&str, &str, &str); 18] = [
            ("security-1", "gardiennage", "Surveillance Corporate"),
            ("security-2", "gardiennage", "Patrouille Nocturne"),
            ("security-3", "gardiennage", "Sécurité Événementielle"),
            ("cleaning-1", "nettoyage", "Nettoyage Bureau"),
            ("cleaning-2", "nettoyage", "Entretien des Sols"),
            ("cleaning-3", "nettoyage", "Nettoyage Industriel"),
            ("maintenance-1", "entretien", "Maintenance Technique"),
            ("maintenance-2", "entretien", "Entretien Espaces Verts"),
            ("maintenance-3", "entretien", "Jardinage Nocturne"),
            ("hygiene-1", "hygiene", "Désinfection Professionnelle"),
            ("hygiene-2", "hygiene", "Station Hygiène"),
            ("hygiene-3", "hygiene", "Équipe Sanitaire"),
            ("event-1", "evenements", "Préparation Gala"),
            ("event-2", "evenements", "Sécurité VIP"),
            ("event-3", "evenements", "Gestion de Foule"),
            ("event-4", "evenements", "Configuration Conférence"),
            ("protocol-1", "evenements", "Documentation Sécurité"),
            ("protocol-2", "evenements", "Centre de Contrôle"),
        ];

        let items = rows
            .iter()
            .zip(1u32..)
            .map(|((file, category, title), id)| MediaItem {
                id,
                source: format!("gallery/{file}.jpg"),
                category: CategoryId::from(*category),
                title: title.to_string(),
            })
            .collect();

        Self { categories, items }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn has_category(&self, id: &CategoryId) -> bool {
        self.categories.iter().any(|c| c.id == *id)
    }

    pub fn category_label(&self, id: &CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == *id)
            .map(|c| c.label.as_str())
    }

    pub fn item(&self, id: u32) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items of `category` in catalog order. Unknown categories match nothing.
    pub fn filter(&self, category: &CategoryId) -> Vec<&MediaItem> {
        if !category.is_all() && !self.has_category(category) {
            return Vec::new();
        }
        filter_items(&self.items, category)
    }
}

pub fn filter_items<'a>(items: &'a [MediaItem], category: &CategoryId) -> Vec<&'a MediaItem> {
    if category.is_all() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.category == *category).collect()
}
