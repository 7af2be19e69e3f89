use tracing::{debug, warn};

use crate::error::Result;
use crate::model::theme::Theme;
use crate::repository::{keys, KeyValueStore};

/// Reads and writes the `theme` slot next to the task data.
pub struct PreferenceService<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> PreferenceService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The saved theme, or the light default when nothing usable is stored.
    pub fn theme(&self) -> Result<Theme> {
        let Some(raw) = self.storage.get(keys::THEME)? else {
            return Ok(Theme::default());
        };

        // Accept both a JSON string and a bare word.
        let parsed = serde_json::from_str::<Theme>(&raw)
            .ok()
            .or_else(|| raw.parse::<Theme>().ok());
        match parsed {
            Some(theme) => Ok(theme),
            None => {
                warn!(value = %raw, "ignoring unreadable theme preference");
                Ok(Theme::default())
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let payload = serde_json::to_string(&theme)?;
        self.storage.set(keys::THEME, &payload)?;
        debug!(%theme, "theme saved");
        Ok(())
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        let next = self.theme()?.toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}
