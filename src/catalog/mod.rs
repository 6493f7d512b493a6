//! Catalog Module
//!
//! 組み込みのカテゴリ`INSERT`文と、そこから構築するカテゴリツリーを提供します。

mod tree;

pub use tree::{CatalogEntry, CategoryRecord, CategoryTree, PATH_SEPARATOR};

/// 組み込みのカテゴリ定義（`catalog.product_categories`への`INSERT`文）
pub const DEFAULT_CATEGORIES_SQL: &str = include_str!("../../data/product_categories.sql");

/// 組み込みのカテゴリ定義からツリーを構築する
pub fn default_tree() -> CategoryTree {
    CategoryTree::from_sql(DEFAULT_CATEGORIES_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_parses_every_row() {
        let tree = default_tree();
        assert_eq!(tree.len(), 121);
    }

    #[test]
    fn test_default_catalog_roots_first() {
        let entries = default_tree().entries();
        let first = &entries[0];
        assert_eq!(first.level, 0);
        assert_eq!(first.name, "Refacciones");
        assert_eq!(first.slug, "refacciones");
        assert!(first.parent_name.is_empty());

        // レベルは単調非減少
        assert!(entries.windows(2).all(|w| w[0].level <= w[1].level));
    }

    #[test]
    fn test_default_catalog_known_path() {
        let entries = default_tree().entries();
        let filtros = entries
            .iter()
            .find(|e| e.id == "00000001-0000-0000-0000-000000000011")
            .expect("Filtros category");
        assert_eq!(filtros.level, 2);
        assert_eq!(filtros.path_string(), "Refacciones > Motor > Filtros");
        assert_eq!(filtros.parent_slug, "motor");
    }
}
