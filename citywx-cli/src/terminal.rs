use std::io::Write;

use citywx_core::{Layout, MemorySurface, Slot, Surface};
use tracing::warn;

/// Surface that prints the weather card or the error line whenever the
/// layout reveals them. Slot text is kept in a [`MemorySurface`].
#[derive(Debug)]
pub struct TerminalSurface<W> {
    slots: MemorySurface,
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            slots: MemorySurface::new(),
            out,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn card(&self) -> String {
        let s = &self.slots;
        let rows = [
            ("Feels like", s.text(Slot::FeelsLike)),
            ("Humidity", s.text(Slot::Humidity)),
            ("Wind", s.text(Slot::WindSpeed)),
            ("Pressure", s.text(Slot::Pressure)),
            ("Visibility", s.text(Slot::Visibility)),
            ("Cloudiness", s.text(Slot::Cloudiness)),
            ("Icon", s.text(Slot::IconUrl)),
            ("Theme", s.text(Slot::Theme)),
        ];

        let mut card = format!(
            "{}\n{}\n\n  {}°C  {}\n",
            s.text(Slot::CityName),
            s.text(Slot::CurrentDate),
            s.text(Slot::Temperature),
            s.text(Slot::Description),
        );
        for (label, value) in rows {
            card.push_str(&format!("  {label:<11} {value}\n"));
        }
        card
    }

    fn print(&mut self, text: &str) {
        let written = writeln!(self.out, "{text}").and_then(|_| self.out.flush());
        if let Err(err) = written {
            warn!(error = %err, "Failed to write to terminal");
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn set_text(&mut self, slot: Slot, text: &str) {
        self.slots.set_text(slot, text);
    }

    fn apply_layout(&mut self, layout: Layout) {
        self.slots.apply_layout(layout);

        if layout.result_visible {
            let card = self.card();
            self.print(&card);
        } else if layout.error_visible {
            let line = format!("error: {}", self.slots.text(Slot::ErrorMessage));
            self.print(&line);
        }
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.slots.set_trigger_enabled(enabled);
        if !enabled {
            self.print("Loading...");
        }
    }

    fn clear_input(&mut self) {
        self.slots.clear_input();
    }
}
