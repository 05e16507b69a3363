use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{ExpenseStore, Result};

/// Categorises expenses for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
        }
    }
}

static BUILTIN_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    [
        ("food", "Food", "#FF6B6B", "restaurant"),
        ("transport", "Transport", "#4ECDC4", "car"),
        ("shopping", "Shopping", "#45B7D1", "bag"),
        ("bills", "Bills", "#FFA07A", "receipt"),
        ("entertainment", "Entertainment", "#98D8C8", "film"),
        ("other", "Other", "#95A5A6", "ellipsis-horizontal"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| Category {
        id: id.into(),
        name: name.into(),
        color: color.into(),
        icon: icon.into(),
    })
    .collect()
});

/// The fixed default category set every install starts with.
pub fn builtin_categories() -> &'static [Category] {
    &BUILTIN_CATEGORIES
}

/// One lookup surface over built-in and store-backed custom categories, so
/// callers never branch on where a category came from.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Snapshots built-ins plus the store's custom categories. Built-ins come
    /// first; a custom category may not shadow a built-in id.
    pub fn load<S: ExpenseStore + ?Sized>(store: &S) -> Result<Self> {
        let mut categories = BUILTIN_CATEGORIES.clone();
        for custom in store.custom_categories()? {
            if !categories.iter().any(|c| c.id == custom.id) {
                categories.push(custom);
            }
        }
        Ok(Self { categories })
    }

    pub fn resolve(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn builtins_are_present() {
        assert_eq!(builtin_categories().len(), 6);
        assert!(builtin_categories().iter().any(|c| c.id == "food"));
    }

    #[test]
    fn catalog_merges_custom_categories() {
        let mut store = MemoryStore::new();
        let custom = Category::new("Pets", "#ABCDEF", "paw");
        let custom_id = custom.id.clone();
        store.add_custom_category(custom).unwrap();

        let catalog = CategoryCatalog::load(&store).unwrap();
        assert_eq!(catalog.all().len(), 7);
        assert_eq!(catalog.resolve(&custom_id).unwrap().name, "Pets");
        assert_eq!(catalog.resolve("transport").unwrap().icon, "car");
        assert!(catalog.resolve("missing").is_none());
    }
}
