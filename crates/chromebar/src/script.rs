//! Timed event scripts fed to the toolbar by the frame driver

use std::collections::VecDeque;

use serde::Deserialize;
use url::Url;

use chromebar_engine::{ClickTarget, Sibling, SiblingKind, Toolbar, ToolbarEvent};
use chromebar_geometry::{Color, Rect};

/// One timed step
///
/// Exactly one of the action fields is normally set; several are applied in
/// field order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    #[serde(default)]
    pub event: Option<ToolbarEvent>,
    #[serde(default)]
    pub click: Option<ClickTarget>,
    #[serde(default)]
    pub finish_animations: bool,
    #[serde(default)]
    pub texture_capture: Option<bool>,
}

impl ScriptStep {
    fn event(at_ms: u64, event: ToolbarEvent) -> Self {
        Self {
            at_ms,
            event: Some(event),
            ..Default::default()
        }
    }

    fn click(at_ms: u64, target: ClickTarget) -> Self {
        Self {
            at_ms,
            click: Some(target),
            ..Default::default()
        }
    }

    pub fn apply(self, toolbar: &mut Toolbar) {
        if let Some(event) = self.event {
            toolbar.handle_event(event);
        }
        if let Some(target) = self.click {
            toolbar.click(target);
        }
        if self.finish_animations {
            toolbar.finish_animations();
        }
        if let Some(enabled) = self.texture_capture {
            toolbar.set_texture_capture_mode(enabled);
        }
    }
}

/// Steps ordered by time
#[derive(Debug, Default)]
pub struct Script {
    steps: VecDeque<ScriptStep>,
}

impl Script {
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        // Stable sort keeps same-time steps in file order
        steps.sort_by_key(|step| step.at_ms);
        Self {
            steps: steps.into(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Ok(Self::new(steps))
    }

    /// Remove and return every step due at `now_ms`
    pub fn take_due(&mut self, now_ms: u64) -> Vec<ScriptStep> {
        let mut due = Vec::new();
        while self.steps.front().map_or(false, |step| step.at_ms <= now_ms) {
            if let Some(step) = self.steps.pop_front() {
                due.push(step);
            }
        }
        due
    }

    pub fn is_exhausted(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Built-in walkthrough: load, brand, focus, switcher round trip
    pub fn demo() -> Result<Self, url::ParseError> {
        let url = Url::parse("https://example.com/")?;
        let collapsed = Rect::new(56.0, 8.0, 264.0, 48.0);
        let expanded = Rect::new(8.0, 8.0, 352.0, 48.0);

        Ok(Self::new(vec![
            ScriptStep::event(
                0,
                ToolbarEvent::LayoutChanged {
                    collapsed,
                    expanded,
                    siblings: vec![
                        Sibling {
                            kind: SiblingKind::HomeButton,
                            bounds: Rect::new(0.0, 8.0, 48.0, 48.0),
                        },
                        Sibling {
                            kind: SiblingKind::TabSwitcherButton,
                            bounds: Rect::new(264.0, 8.0, 312.0, 48.0),
                        },
                        Sibling {
                            kind: SiblingKind::MenuButton,
                            bounds: Rect::new(312.0, 8.0, 360.0, 48.0),
                        },
                    ],
                    rtl: false,
                },
            ),
            ScriptStep::event(0, ToolbarEvent::TabCountChanged { count: 3 }),
            ScriptStep::event(
                0,
                ToolbarEvent::UrlChanged {
                    url: url.clone(),
                    display_text: "example.com".to_string(),
                },
            ),
            ScriptStep::event(
                0,
                ToolbarEvent::ContentSwapped {
                    did_start_load: true,
                    did_finish_load: false,
                },
            ),
            ScriptStep::event(
                48,
                ToolbarEvent::NavigationCommitted {
                    url,
                    is_native_page: false,
                },
            ),
            ScriptStep::event(96, ToolbarEvent::LoadProgressChanged { progress: 0.6 }),
            ScriptStep::event(
                160,
                ToolbarEvent::BrandColorChanged {
                    color: Some(Color::rgb(25, 118, 210)),
                    animate: true,
                },
            ),
            ScriptStep::event(240, ToolbarEvent::LoadProgressChanged { progress: 1.0 }),
            ScriptStep::event(480, ToolbarEvent::UrlFocusChanged { has_focus: true }),
            ScriptStep::event(800, ToolbarEvent::UrlFocusChanged { has_focus: false }),
            ScriptStep::event(
                1280,
                ToolbarEvent::OverviewStartedShowing { show_toolbar: true },
            ),
            ScriptStep::click(1520, ClickTarget::NewEntryButton),
            ScriptStep::event(
                1600,
                ToolbarEvent::OverviewStartedHiding {
                    show_toolbar: true,
                    delay_settle: true,
                },
            ),
            ScriptStep::event(1856, ToolbarEvent::OverviewFinishedHiding),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_order() {
        let json = r#"[
            { "at_ms": 32, "event": { "type": "overview_finished_hiding" } },
            { "at_ms": 0, "event": { "type": "tab_count_changed", "count": 2 } },
            { "at_ms": 16, "click": "TabSwitcherButton" },
            { "at_ms": 16, "finish_animations": true }
        ]"#;
        let mut script = Script::from_json(json).unwrap();
        assert_eq!(script.len(), 4);

        let due = script.take_due(0);
        assert_eq!(due.len(), 1);
        assert_eq!(
            due[0].event,
            Some(ToolbarEvent::TabCountChanged { count: 2 })
        );

        let due = script.take_due(20);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].click, Some(ClickTarget::TabSwitcherButton));
        assert!(due[1].finish_animations);

        assert!(!script.is_exhausted());
        script.take_due(100);
        assert!(script.is_exhausted());
    }

    #[test]
    fn test_rejects_unknown_event() {
        let json = r#"[{ "at_ms": 0, "event": { "type": "teleport" } }]"#;
        assert!(Script::from_json(json).is_err());
    }

    #[test]
    fn test_demo_runs_to_completion() {
        let mut script = Script::demo().unwrap();
        let mut toolbar = Toolbar::new(Default::default());
        let mut now_ms = 0;
        while !(script.is_exhausted() && !toolbar.is_animating()) {
            for step in script.take_due(now_ms) {
                step.apply(&mut toolbar);
            }
            toolbar.tick(16.0);
            now_ms += 16;
            assert!(now_ms < 10_000, "demo never settled");
        }
        assert!(!toolbar.is_in_switcher_mode());
        assert_eq!(toolbar.frame().tab_count, 3);
    }
}
