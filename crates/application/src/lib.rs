//! Application orchestration layer for Galerie.
//!
//! [`ViewController`] owns the session's [`ViewState`] and is the only thing
//! that mutates it. Everything the presentation layer shows is re-derived from
//! that state and the catalog by [`ViewController::current_view`].

use std::sync::Arc;

use galerie_core::{Catalog, CategoryId, MediaItem, paginate, total_pages};

mod lightbox;

pub use lightbox::{LightboxNavigator, LightboxState, NavDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub active_filter: CategoryId,
    pub current_page: usize,
    pub lightbox: LightboxNavigator,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_filter: CategoryId::all(),
            current_page: 1,
            lightbox: LightboxNavigator::default(),
        }
    }
}

impl ViewState {
    pub fn selected_item_id(&self) -> Option<u32> {
        self.lightbox.state().selected()
    }
}

/// Read-only projection of the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    pub active_filter: &'a CategoryId,
    pub filtered_count: usize,
    pub page_items: Vec<&'a MediaItem>,
    pub total_pages: usize,
    pub effective_page: usize,
    pub lightbox: LightboxState,
    /// The open item, looked up in the whole catalog so a selection left
    /// behind by a filter change still resolves.
    pub selected: Option<&'a MediaItem>,
    /// 1-based position of the open item within the filtered set.
    pub selected_position: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ViewController {
    catalog: Arc<Catalog>,
    page_size: usize,
    state: ViewState,
}

impl ViewController {
    pub fn new(catalog: Arc<Catalog>, page_size: usize) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            state: ViewState::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn filtered(&self) -> Vec<&MediaItem> {
        self.catalog.filter(&self.state.active_filter)
    }

    pub fn set_filter(&mut self, category: CategoryId) {
        if !category.is_all() && !self.catalog.has_category(&category) {
            log::debug!("ignoring unknown category {category:?}");
            return;
        }
        log::debug!("filter -> {category}");
        self.state.active_filter = category;
        self.state.current_page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        let total = total_pages(self.filtered().len(), self.page_size);
        self.state.current_page = page.clamp(1, total);
        log::debug!("page -> {}/{total}", self.state.current_page);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.state.current_page.saturating_sub(1));
    }

    pub fn select_item(&mut self, id: u32) {
        let filtered = self.catalog.filter(&self.state.active_filter);
        self.state.lightbox.select(id, &filtered);
        log::debug!("lightbox -> {:?}", self.state.lightbox.state());
    }

    pub fn navigate_lightbox(&mut self, direction: NavDirection) {
        let filtered = self.catalog.filter(&self.state.active_filter);
        self.state.lightbox.navigate(direction, &filtered);
        log::debug!("lightbox {direction:?} -> {:?}", self.state.lightbox.state());
    }

    pub fn close_lightbox(&mut self) {
        self.state.lightbox.close();
    }

    pub fn current_view(&self) -> View<'_> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.page_size, self.state.current_page);
        let lightbox = self.state.lightbox.state();
        let selected_id = lightbox.selected();

        View {
            active_filter: &self.state.active_filter,
            filtered_count: filtered.len(),
            page_items: page.items.to_vec(),
            total_pages: page.total_pages,
            effective_page: page.effective_page,
            lightbox,
            selected: selected_id.and_then(|id| self.catalog.item(id)),
            selected_position: selected_id
                .and_then(|id| filtered.iter().position(|item| item.id == id))
                .map(|idx| idx + 1),
        }
    }
}
