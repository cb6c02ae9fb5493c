//! Events pushed into the toolbar by its collaborators
//!
//! Every collaborator talks to the engine through [`ToolbarEvent`]; there are
//! no observer registrations to keep in sync.

use serde::{Deserialize, Serialize};
use url::Url;

use chromebar_geometry::{Color, Rect};

use crate::compositor::Sibling;

/// Security level of the active page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    #[default]
    None,
    Secure,
    Warning,
    Dangerous,
}

/// Toolbar event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolbarEvent {
    /// Active tab's URL changed; `display_text` is what the field shows
    UrlChanged { url: Url, display_text: String },
    TitleChanged { title: String },
    /// Load progress in [0, 1]
    LoadProgressChanged { progress: f32 },
    NavigationCommitted { url: Url, is_native_page: bool },
    NavigationFailed { url: Url, error: String },
    /// The tab's contents were replaced
    ContentSwapped { did_start_load: bool, did_finish_load: bool },
    SecurityStateChanged { level: SecurityLevel },
    /// A different tab became active
    TabSwitched {
        incognito: bool,
        brand_color: Option<Color>,
        url: Option<Url>,
        display_text: String,
        /// Search box bounds if the tab shows a scroll-linked new-tab surface
        new_tab_surface: Option<Rect>,
    },
    TabCountChanged { count: usize },
    /// `None` reverts to the theme color
    BrandColorChanged { color: Option<Color>, animate: bool },
    OverviewStartedShowing { show_toolbar: bool },
    OverviewStartedHiding { show_toolbar: bool, delay_settle: bool },
    OverviewFinishedHiding,
    UrlFocusChanged { has_focus: bool },
    /// Horizontal scroll of the address field text
    UrlScrolled { scroll_x: f32 },
    NewTabSurfaceAttached { search_box: Rect },
    NewTabSurfaceScrolled { percent: f32 },
    NewTabSurfaceDetached,
    /// Host relayout (rotation, resize)
    LayoutChanged {
        collapsed: Rect,
        expanded: Rect,
        siblings: Vec<Sibling>,
        rtl: bool,
    },
}

/// Clickable toolbar targets with host-supplied handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickTarget {
    TabSwitcherButton,
    NewEntryButton,
}
