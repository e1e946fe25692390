use galerie_core::MediaItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open(u32),
}

impl LightboxState {
    pub fn selected(&self) -> Option<u32> {
        match self {
            LightboxState::Closed => None,
            LightboxState::Open(id) => Some(*id),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, LightboxState::Open(_))
    }
}

/// Full-size viewer over the filtered set.
///
/// The navigator never looks at pages: stepping walks the whole filtered set,
/// and a selection stays put when the set it was made from changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LightboxNavigator {
    state: LightboxState,
}

impl LightboxNavigator {
    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn select(&mut self, id: u32, filtered: &[&MediaItem]) {
        if filtered.iter().any(|item| item.id == id) {
            self.state = LightboxState::Open(id);
        }
    }

    pub fn navigate(&mut self, direction: NavDirection, filtered: &[&MediaItem]) {
        let LightboxState::Open(id) = self.state else {
            return;
        };

        let position = filtered.iter().position(|item| item.id == id);
        let target = match (direction, position) {
            (NavDirection::Prev, Some(idx)) => idx.checked_sub(1),
            (NavDirection::Next, Some(idx)) => Some(idx + 1),
            // Stale selection: stepping forward lands on the head of the set.
            (NavDirection::Next, None) => Some(0),
            (NavDirection::Prev, None) => None,
        };

        if let Some(item) = target.and_then(|idx| filtered.get(idx)) {
            self.state = LightboxState::Open(item.id);
        }
    }

    pub fn close(&mut self) {
        self.state = LightboxState::Closed;
    }
}
