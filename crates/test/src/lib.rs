//! Test helpers and fixtures.

use std::sync::Arc;

use galerie_application::ViewController;
use galerie_core::{Catalog, Category, CategoryId, MediaItem, Settings, Theme};

pub fn make_settings(page_size: usize) -> Settings {
    Settings {
        page_size,
        theme: Theme::Dark,
    }
}

/// Controller over the built-in gallery.
pub fn make_controller(page_size: usize) -> ViewController {
    ViewController::new(Arc::new(Catalog::builtin()), page_size)
}

/// A catalog with `per_category` items in each of the given categories,
/// numbered from 1 in category order.
pub fn make_catalog(categories: &[&str], per_category: u32) -> Catalog {
    let mut all = vec![Category::new(CategoryId::ALL, "All")];
    all.extend(categories.iter().map(|id| Category::new(id, &id.to_uppercase())));

    let mut items = Vec::new();
    let mut next_id = 1;
    for category in categories {
        for _ in 0..per_category {
            items.push(MediaItem {
                id: next_id,
                source: format!("{category}/{next_id}.jpg"),
                category: CategoryId::from(*category),
                title: format!("{category} #{next_id}"),
            });
            next_id += 1;
        }
    }

    Catalog::new(all, items).unwrap_or_else(|err| panic!("fixture catalog: {err}"))
}

#[cfg(test)]
mod tests {
    use galerie_application::{LightboxState, NavDirection, View};
    use galerie_storage::parse_catalog_json;

    use super::*;

    fn ids(view: &View<'_>) -> Vec<u32> {
        view.page_items.iter().map(|item| item.id).collect()
    }

    #[test]
    fn session_uses_stored_page_size() {
        let mut settings = make_settings(6);
        settings.normalize();
        let mut ctl = ViewController::new(Arc::new(Catalog::builtin()), settings.page_size);
        assert_eq!(ctl.current_view().total_pages, 3);

        ctl.set_page(3);
        assert_eq!(ids(&ctl.current_view()), (13..=18).collect::<Vec<_>>());

        let mut oversized = make_settings(500);
        oversized.normalize();
        let ctl = ViewController::new(Arc::new(Catalog::builtin()), oversized.page_size);
        assert_eq!(ctl.current_view().total_pages, 1);
        assert_eq!(ctl.current_view().page_items.len(), 18);
    }

    #[test]
    fn builds_catalog() {
        let catalog = make_catalog(&["a", "b"], 3);
        assert_eq!(catalog.items().len(), 6);
        assert_eq!(catalog.categories().len(), 3);
    }

    #[test]
    fn browsing_the_builtin_gallery() {
        let mut ctl = make_controller(9);

        ctl.set_filter(CategoryId::all());
        let view = ctl.current_view();
        assert_eq!(view.filtered_count, 18);
        assert_eq!(view.total_pages, 2);

        ctl.set_page(2);
        let view = ctl.current_view();
        assert_eq!(view.page_items.len(), 9);
        assert_eq!(ids(&view), (10..=18).collect::<Vec<_>>());

        ctl.set_filter("nettoyage".into());
        let view = ctl.current_view();
        assert_eq!(view.effective_page, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(ids(&view), vec![4, 5, 6]);
        assert!(view.page_items.iter().all(|item| item.category.as_str() == "nettoyage"));
    }

    #[test]
    fn stepping_through_the_lightbox() {
        let mut ctl = make_controller(9);
        ctl.set_filter("entretien".into());
        let first = ctl.current_view().page_items[0].id;
        let second = ctl.current_view().page_items[1].id;

        ctl.select_item(first);
        assert_eq!(ctl.current_view().lightbox, LightboxState::Open(first));

        ctl.navigate_lightbox(NavDirection::Prev);
        assert_eq!(ctl.current_view().lightbox, LightboxState::Open(first));

        ctl.navigate_lightbox(NavDirection::Next);
        assert_eq!(ctl.current_view().lightbox, LightboxState::Open(second));

        ctl.close_lightbox();
        assert_eq!(ctl.current_view().lightbox, LightboxState::Closed);
    }

    #[test]
    fn next_at_last_item_holds() {
        let mut ctl = make_controller(9);
        ctl.select_item(18);
        ctl.navigate_lightbox(NavDirection::Next);
        assert_eq!(ctl.state().selected_item_id(), Some(18));
    }

    #[test]
    fn filter_resets_page_for_every_category() {
        let catalog = Arc::new(make_catalog(&["a", "b", "c"], 7));
        let ids: Vec<CategoryId> = catalog.categories().iter().map(|c| c.id.clone()).collect();
        for id in ids {
            let mut ctl = ViewController::new(Arc::clone(&catalog), 2);
            ctl.set_page(3);
            assert_eq!(ctl.current_view().effective_page, 3);
            ctl.set_filter(id);
            assert_eq!(ctl.current_view().effective_page, 1);
        }
    }

    #[test]
    fn selection_valid_iff_in_filtered_set() {
        let catalog = Arc::new(make_catalog(&["a", "b"], 4));
        for category in ["a", "b"] {
            for id in 1..=10u32 {
                let mut ctl = ViewController::new(Arc::clone(&catalog), 3);
                ctl.set_filter(category.into());
                ctl.select_item(id);
                let in_set = catalog
                    .item(id)
                    .is_some_and(|item| item.category.as_str() == category);
                let expected = if in_set {
                    LightboxState::Open(id)
                } else {
                    LightboxState::Closed
                };
                assert_eq!(ctl.current_view().lightbox, expected, "{category} / {id}");
            }
        }
    }

    #[test]
    fn imported_catalog_drives_the_controller() -> anyhow::Result<()> {
        let catalog = parse_catalog_json(
            r#"{
                "categories": [{"id": "all", "label": "Tous"}, {"id": "x", "label": "X"}],
                "items": [
                    {"id": 5, "src": "five.jpg", "category": "x", "title": "Five"},
                    {"id": 2, "src": "two.jpg", "category": "x", "title": "Two"}
                ]
            }"#,
        )?;
        let mut ctl = ViewController::new(Arc::new(catalog), 1);
        assert_eq!(ctl.current_view().total_pages, 2);
        ctl.select_item(5);
        ctl.navigate_lightbox(NavDirection::Next);
        assert_eq!(ctl.state().selected_item_id(), Some(2));
        Ok(())
    }
}
