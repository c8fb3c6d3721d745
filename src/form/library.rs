//! Component library shown in the designer's left panel.

use super::schema::{FieldConfig, FieldKind};

/// A placeable library entry with its default configuration.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem {
    pub kind: FieldKind,
    pub label: String,
    pub default_config: FieldConfig,
}

impl LibraryItem {
    pub fn for_kind(kind: FieldKind) -> Self {
        LibraryItem {
            kind,
            label: kind.display_name().to_string(),
            default_config: kind.default_config(),
        }
    }
}

/// A named group of library entries.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryCategory {
    pub name: String,
    pub items: Vec<LibraryItem>,
}

/// Defines the component library.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLibrary {
    categories: Vec<LibraryCategory>,
}

impl Default for ComponentLibrary {
    fn default() -> Self {
        ComponentLibrary::standard()
    }
}

impl ComponentLibrary {
    /// Return the standard library: basic inputs followed by advanced components.
    ///
    pub fn standard() -> Self {
        let basic = [
            FieldKind::Text,
            FieldKind::MultilineText,
            FieldKind::Number,
            FieldKind::Money,
            FieldKind::SingleChoice,
            FieldKind::MultiChoice,
            FieldKind::Dropdown,
            FieldKind::Date,
        ];
        let advanced = [FieldKind::FileUpload, FieldKind::Signature, FieldKind::SubTable];
        ComponentLibrary {
            categories: vec![
                LibraryCategory {
                    name: "基础组件".to_string(),
                    items: basic.iter().map(|k| LibraryItem::for_kind(*k)).collect(),
                },
                LibraryCategory {
                    name: "高级组件".to_string(),
                    items: advanced.iter().map(|k| LibraryItem::for_kind(*k)).collect(),
                },
            ],
        }
    }

    pub fn categories(&self) -> &[LibraryCategory] {
        &self.categories
    }

    /// Iterate all items in display order.
    ///
    pub fn items(&self) -> impl Iterator<Item = &LibraryItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the item at a flat display index.
    ///
    pub fn item_at(&self, index: usize) -> Option<&LibraryItem> {
        self.items().nth(index)
    }

    pub fn item(&self, kind: FieldKind) -> Option<&LibraryItem> {
        self.items().find(|i| i.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_covers_every_kind() {
        let library = ComponentLibrary::standard();
        assert_eq!(library.len(), FieldKind::ALL.len());
        for kind in FieldKind::ALL {
            let item = library.item(kind).unwrap();
            assert_eq!(item.default_config.kind(), kind);
        }
        assert_eq!(library.categories().len(), 2);
    }

    #[test]
    fn test_item_at_follows_display_order() {
        let library = ComponentLibrary::standard();
        assert_eq!(library.item_at(0).unwrap().kind, FieldKind::Text);
        assert_eq!(library.item_at(8).unwrap().kind, FieldKind::FileUpload);
        assert!(library.item_at(11).is_none());
    }
}
