use crate::models::Device;

/// Focused device id. Set by the user, or by falling back to the first device of the
/// current list when the selected id is not in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Returns the focused device, updating the selection to the first device when the
    /// current one is absent (or clearing it when `devices` is empty).
    pub fn resolve<'a>(&mut self, devices: &'a [Device]) -> Option<&'a Device> {
        let current = self
            .selected
            .as_deref()
            .and_then(|id| devices.iter().find(|d| d.id == id));
        let focused = current.or_else(|| devices.first());
        self.selected = focused.map(|d| d.id.clone());
        focused
    }
}
