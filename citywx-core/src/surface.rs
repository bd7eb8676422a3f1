//! The display surface the presenter and controller write into.
//!
//! A surface is a fixed set of named text slots plus three controls: the
//! region layout, the trigger (enabled or busy) and the input field.

use std::collections::BTreeMap;

/// Named output slots, one per field of the weather card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    CityName,
    CurrentDate,
    IconUrl,
    IconAlt,
    Temperature,
    Description,
    Humidity,
    WindSpeed,
    Pressure,
    Visibility,
    FeelsLike,
    Cloudiness,
    Background,
    Theme,
    ErrorMessage,
}

/// Which regions are showing. Always derived from a [`crate::UiState`];
/// the trigger is driven separately through [`Surface::set_trigger_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub placeholder_visible: bool,
    pub result_visible: bool,
    pub error_visible: bool,
}

pub trait Surface {
    fn set_text(&mut self, slot: Slot, text: &str);

    fn apply_layout(&mut self, layout: Layout);

    /// `false` disables the trigger and shows the busy affordance.
    fn set_trigger_enabled(&mut self, enabled: bool);

    fn clear_input(&mut self);
}

/// In-memory surface. Keeps the latest text per slot and counts control
/// changes; hosts that print or draw can wrap it for slot storage.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    slots: BTreeMap<Slot, String>,
    layout: Layout,
    trigger_enabled: bool,
    busy_count: usize,
    enable_count: usize,
    input_clears: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
            layout: crate::UiState::Placeholder.layout(),
            trigger_enabled: true,
            busy_count: 0,
            enable_count: 0,
            input_clears: 0,
        }
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of `slot`, empty if never written.
    pub fn text(&self, slot: Slot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or_default()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    /// Number of times the trigger was disabled.
    pub fn busy_count(&self) -> usize {
        self.busy_count
    }

    /// Number of times the trigger was re-enabled.
    pub fn enable_count(&self) -> usize {
        self.enable_count
    }

    pub fn input_clears(&self) -> usize {
        self.input_clears
    }

    /// Snapshot of every written slot, in slot order.
    pub fn snapshot(&self) -> Vec<(Slot, String)> {
        self.slots.iter().map(|(slot, text)| (*slot, text.clone())).collect()
    }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, slot: Slot, text: &str) {
        self.slots.insert(slot, text.to_string());
    }

    fn apply_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable_count += 1;
        } else {
            self.busy_count += 1;
        }
        self.trigger_enabled = enabled;
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_surface_tracks_trigger_changes() {
        let mut surface = MemorySurface::new();
        assert!(surface.trigger_enabled());

        surface.set_trigger_enabled(false);
        assert!(!surface.trigger_enabled());
        surface.set_trigger_enabled(true);

        assert_eq!(surface.busy_count(), 1);
        assert_eq!(surface.enable_count(), 1);
    }

    #[test]
    fn unwritten_slot_reads_empty() {
        let mut surface = MemorySurface::new();
        assert_eq!(surface.text(Slot::Humidity), "");

        surface.set_text(Slot::Humidity, "80%");
        assert_eq!(surface.text(Slot::Humidity), "80%");
        assert_eq!(surface.snapshot(), vec![(Slot::Humidity, "80%".to_string())]);
    }
}
