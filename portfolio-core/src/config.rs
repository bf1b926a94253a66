//! Site-wide tunables.

use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// Configuration for the page behavior.
///
/// `Default` gives the production values. The browser host may pass a JSON
/// override at construction time (useful for staging recipients and for
/// exercising breakpoints in tests).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Offset added to the scroll position when matching sections, and
    /// subtracted from section tops when scrolling to them (px).
    pub scroll_offset: f64,
    /// Widths at or below this are mobile (px).
    pub mobile_breakpoint: f64,
    /// Widths above mobile and at or below this are tablet (px).
    pub tablet_breakpoint: f64,
    /// Minimum interval between scroll handler invocations (ms, ~60fps).
    pub throttle_ms: f64,
    /// Quiescence interval before resize handlers run (ms).
    pub debounce_ms: f64,
    /// Intersection ratios at which the reveal observer fires.
    pub observer_thresholds: Vec<f64>,
    /// Root margin for the reveal observer; the negative bottom edge
    /// triggers reveals slightly before the literal viewport edge.
    pub observer_root_margin: String,
    /// Proximity margin for the lazy image observer (px).
    pub lazy_margin_px: u32,
    /// Recipient identifier for the messaging deep link.
    pub whatsapp_number: String,
    /// Domain named in the message footer.
    pub site_domain: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            scroll_offset: 80.0,
            mobile_breakpoint: 768.0,
            tablet_breakpoint: 1024.0,
            throttle_ms: 16.0,
            debounce_ms: 250.0,
            observer_thresholds: vec![0.1, 0.3, 0.5],
            observer_root_margin: "0px 0px -50px 0px".to_string(),
            lazy_margin_px: 50,
            whatsapp_number: "5567992865982".to_string(),
            site_domain: "maria-lucila.com".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse a configuration from JSON, falling back to defaults for
    /// omitted fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the resulting
    /// configuration is inconsistent.
    pub fn from_json(json: &str) -> PortfolioResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if the breakpoints are not strictly ordered or the
    /// recipient identifier is empty.
    pub fn validate(&self) -> PortfolioResult<()> {
        if self.mobile_breakpoint >= self.tablet_breakpoint {
            return Err(PortfolioError::Config(format!(
                "mobile breakpoint {} must be below tablet breakpoint {}",
                self.mobile_breakpoint, self.tablet_breakpoint
            )));
        }
        if self.whatsapp_number.trim().is_empty() {
            return Err(PortfolioError::Config(
                "whatsapp_number must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn from_json_merges_partial_overrides() {
        let config = SiteConfig::from_json(r#"{"whatsapp_number":"123"}"#).unwrap();
        assert_eq!(config.whatsapp_number, "123");
        assert!((config.mobile_breakpoint - 768.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_json_rejects_inverted_breakpoints() {
        let result = SiteConfig::from_json(r#"{"mobile_breakpoint":1200.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn from_json_rejects_empty_recipient() {
        let result = SiteConfig::from_json(r#"{"whatsapp_number":"  "}"#);
        assert!(result.is_err());
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(SiteConfig::from_json("{ not json }").is_err());
    }
}
