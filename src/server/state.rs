use std::sync::Arc;

use crate::config::Settings;
use crate::template::FillOptions;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub fill_options: Arc<FillOptions>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let fill_options = Arc::new(FillOptions::from(&settings.fill));

        Self {
            settings: Arc::new(settings),
            fill_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_options_from_settings() {
        let mut settings = Settings::default();
        settings.fill.table_font_size_pt = 10;
        settings.fill.quality_table = "growth".to_string();

        let state = AppState::new(settings);
        assert_eq!(state.fill_options.table_font_size, 1000);
        assert_eq!(state.fill_options.quality_table, "growth");
        assert_eq!(state.fill_options.added_column_width, 1_371_600);
    }
}
