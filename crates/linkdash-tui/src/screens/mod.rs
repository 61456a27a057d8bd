//! Screen implementations. Each screen is a top-level Component.

pub mod analytics;
pub mod links;
pub mod overview;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Overview,
            Box::new(overview::OverviewScreen::new()),
        ),
        (ScreenId::Links, Box::new(links::LinksScreen::new())),
        (
            ScreenId::Analytics,
            Box::new(analytics::AnalyticsScreen::new()),
        ),
    ]
}
