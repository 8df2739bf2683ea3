use std::env;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDateTime};

pub const DEFAULT_TITLE: &str = "Player Report";
pub const DEFAULT_BRANDING: &str = "Squad Manager";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Header title on every page.
    pub title: String,
    /// Footer branding text.
    pub branding: String,
    /// Diagonal name watermark on every page.
    pub watermark: bool,
    pub timestamp_format: String,
    /// Fixed generation time; `None` uses the local clock at render time.
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            branding: DEFAULT_BRANDING.to_string(),
            watermark: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            generated_at: None,
        }
    }
}

impl RenderOptions {
    /// Defaults overridden by `SQUAD_REPORT_TITLE`, `SQUAD_REPORT_BRANDING`,
    /// `SQUAD_REPORT_WATERMARK` and `SQUAD_REPORT_TIMESTAMP_FORMAT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            title: opt_env("SQUAD_REPORT_TITLE").unwrap_or(defaults.title),
            branding: opt_env("SQUAD_REPORT_BRANDING").unwrap_or(defaults.branding),
            watermark: opt_env("SQUAD_REPORT_WATERMARK")
                .and_then(|val| parse_bool(&val))
                .unwrap_or(defaults.watermark),
            timestamp_format: opt_env("SQUAD_REPORT_TIMESTAMP_FORMAT")
                .unwrap_or(defaults.timestamp_format),
            generated_at: None,
        }
    }

    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn timestamp(&self) -> String {
        let at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        let format = if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            DEFAULT_TIMESTAMP_FORMAT
        } else {
            self.timestamp_format.as_str()
        };
        at.format(format).to_string()
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val.trim().to_string())
        }
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn bool_values() {
        assert_eq!(parse_bool(" Yes "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn fixed_timestamp_uses_format() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 14)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .unwrap();
        let options = RenderOptions::default().generated_at(at);
        assert_eq!(options.timestamp(), "2026-03-14 09:05");

        let mut broken = options.clone();
        broken.timestamp_format = "%Q".to_string();
        assert_eq!(broken.timestamp(), "2026-03-14 09:05");
    }
}
