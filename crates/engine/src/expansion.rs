//! Expansion axis coordinator
//!
//! Merges the url-focus percent and the new-tab scroll percent into a single
//! expansion percent, and runs the batch of animations that make up a focus
//! change. Downstream geometry only ever sees the merged value, so it cannot
//! tell a scroll-driven expansion from a focus-driven one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use chromebar_geometry::Easing;

use crate::animation::{Animation, AnimationHandle};
use crate::axis::{AnimationAxis, AxisValue};
use crate::config::ToolbarConfig;

/// Toolbar elements animated alongside a focus change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolbarElement {
    /// Secondary location bar content hidden while editing (security/status icon)
    StatusIcon,
    MenuButton,
    TabSwitcherButton,
}

impl ToolbarElement {
    pub const ALL: [ToolbarElement; 3] = [
        ToolbarElement::StatusIcon,
        ToolbarElement::MenuButton,
        ToolbarElement::TabSwitcherButton,
    ];
}

/// Per-element visuals written by focus animations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementVisuals {
    pub alpha: f32,
    pub translation_x: f32,
}

impl Default for ElementVisuals {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            translation_x: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementProperty {
    Alpha,
    TranslationX,
}

#[derive(Debug, Clone)]
struct ElementAnimation {
    element: ToolbarElement,
    property: ElementProperty,
    animation: Animation,
}

/// One in-flight focus change
#[derive(Debug)]
struct FocusChangeBatch {
    has_focus: bool,
    handle: AnimationHandle,
    elements: SmallVec<[ElementAnimation; 6]>,
}

/// How a focus change batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChangeOutcome {
    Finished { has_focus: bool },
    Cancelled { has_focus: bool },
}

/// Values derived from the expansion percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpansionDependents {
    pub expansion_percent: f32,
    pub toolbar_buttons_visible: bool,
    /// Scale applied to the location bar's collapsed-layout translation
    pub location_bar_translation_factor: f32,
    pub ignore_swipe_gestures: bool,
}

#[derive(Debug, Clone, Copy)]
struct FocusTimings {
    focus_ms: f32,
    buttons_ms: f32,
    menu_delay_ms: f32,
    tab_stack_delay_ms: f32,
    button_translation_px: f32,
    hides_buttons_when_expanded: bool,
}

impl From<&ToolbarConfig> for FocusTimings {
    fn from(config: &ToolbarConfig) -> Self {
        let geometry = config.geometry();
        Self {
            focus_ms: config.url_focus_duration_ms,
            buttons_ms: config.toolbar_buttons_duration_ms,
            menu_delay_ms: config.clear_focus_menu_delay_ms,
            tab_stack_delay_ms: config.clear_focus_tab_stack_delay_ms,
            button_translation_px: geometry.focus_button_translation_dp * config.density,
            hides_buttons_when_expanded: geometry.hides_buttons_when_expanded,
        }
    }
}

/// Address field text and its horizontal scroll
#[derive(Debug, Clone, Default)]
struct UrlText {
    displayed: String,
    scroll_x: f32,
    /// Text and scroll recorded when focus was gained
    pre_focus: Option<(String, f32)>,
}

#[derive(Debug)]
pub struct ExpansionCoordinator {
    url_focus: AnimationAxis,
    ntp_scroll: AnimationAxis,
    elements: FxHashMap<ToolbarElement, ElementVisuals>,
    batch: Option<FocusChangeBatch>,
    has_focus: bool,
    text: UrlText,
    timings: FocusTimings,
    rtl: bool,
}

impl ExpansionCoordinator {
    pub fn new(config: &ToolbarConfig) -> Self {
        let elements = ToolbarElement::ALL
            .iter()
            .map(|e| (*e, ElementVisuals::default()))
            .collect();
        Self {
            url_focus: AnimationAxis::new("url_focus_percent", AxisValue::percent(0.0)),
            ntp_scroll: AnimationAxis::new("ntp_scroll_percent", AxisValue::Uninitialized),
            elements,
            batch: None,
            has_focus: false,
            text: UrlText::default(),
            timings: FocusTimings::from(config),
            rtl: false,
        }
    }

    pub fn url_focus_percent(&self) -> f32 {
        self.url_focus.percent()
    }

    pub fn ntp_scroll_percent(&self) -> AxisValue {
        self.ntp_scroll.value()
    }

    /// `max(url focus, ntp scroll)`, ignoring an uninitialized scroll axis
    pub fn expansion_percent(&self) -> f32 {
        match self.ntp_scroll.value().as_percent() {
            Some(scroll) => self.url_focus.percent().max(scroll),
            None => self.url_focus.percent(),
        }
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn focus_change_in_progress(&self) -> bool {
        self.batch.is_some()
    }

    pub fn set_rtl(&mut self, rtl: bool) {
        self.rtl = rtl;
    }

    pub fn element(&self, element: ToolbarElement) -> ElementVisuals {
        self.elements.get(&element).copied().unwrap_or_default()
    }

    pub fn dependents(&self) -> ExpansionDependents {
        let expansion = self.expansion_percent();
        ExpansionDependents {
            expansion_percent: expansion,
            toolbar_buttons_visible: !(self.timings.hides_buttons_when_expanded
                && expansion >= 1.0),
            location_bar_translation_factor: 1.0 - expansion,
            ignore_swipe_gestures: expansion > 0.0,
        }
    }

    /// Set the focus percent directly
    ///
    /// A running focus batch is cancelled: the last writer wins.
    pub fn set_url_focus_percent(&mut self, p: f32) -> ExpansionDependents {
        self.cancel_batch();
        self.url_focus.set(AxisValue::percent(p));
        self.dependents()
    }

    /// Set the scroll-linked percent, or detach it with `Uninitialized`
    pub fn set_ntp_scroll_percent(&mut self, value: AxisValue) -> ExpansionDependents {
        self.ntp_scroll.set(value);
        log::trace!("Expansion now {:.3}", self.expansion_percent());
        self.dependents()
    }

    /// Text currently shown in the address field
    pub fn set_displayed_text(&mut self, text: &str) {
        if self.text.displayed != text {
            self.text.displayed = text.to_string();
        }
    }

    pub fn displayed_text(&self) -> &str {
        &self.text.displayed
    }

    pub fn set_url_scroll_x(&mut self, scroll_x: f32) {
        self.text.scroll_x = scroll_x;
    }

    pub fn url_scroll_x(&self) -> f32 {
        self.text.scroll_x
    }

    /// Start the animations for a focus change
    ///
    /// A batch already running is cancelled first; batches never overlap.
    pub fn begin_focus_change_animation(&mut self, has_focus: bool) -> AnimationHandle {
        self.cancel_batch();
        self.has_focus = has_focus;

        if has_focus {
            self.text.pre_focus = Some((self.text.displayed.clone(), self.text.scroll_x));
        }

        let t = self.timings;
        let translation = if self.rtl {
            -t.button_translation_px
        } else {
            t.button_translation_px
        };

        let mut elements = SmallVec::new();
        if has_focus {
            self.url_focus.animate_to(1.0, t.focus_ms, Easing::Transform);
            self.push_element(
                &mut elements,
                ToolbarElement::StatusIcon,
                ElementProperty::Alpha,
                0.0,
                t.focus_ms,
                0.0,
                Easing::Transform,
            );
            for button in [ToolbarElement::MenuButton, ToolbarElement::TabSwitcherButton] {
                self.push_element(
                    &mut elements,
                    button,
                    ElementProperty::TranslationX,
                    translation,
                    t.buttons_ms,
                    0.0,
                    Easing::FadeOut,
                );
                self.push_element(
                    &mut elements,
                    button,
                    ElementProperty::Alpha,
                    0.0,
                    t.buttons_ms,
                    0.0,
                    Easing::FadeOut,
                );
            }
        } else {
            self.url_focus.animate_to(0.0, t.focus_ms, Easing::Transform);
            for (button, delay) in [
                (ToolbarElement::MenuButton, t.menu_delay_ms),
                (ToolbarElement::TabSwitcherButton, t.tab_stack_delay_ms),
            ] {
                self.push_element(
                    &mut elements,
                    button,
                    ElementProperty::TranslationX,
                    0.0,
                    t.buttons_ms,
                    delay,
                    Easing::Transform,
                );
                self.push_element(
                    &mut elements,
                    button,
                    ElementProperty::Alpha,
                    1.0,
                    t.buttons_ms,
                    delay,
                    Easing::Transform,
                );
            }
            // Status icon fades back in over the menu delay, once the buttons have moved
            let status_fade_ms = t.menu_delay_ms;
            let status_delay_ms = t.buttons_ms;
            self.push_element(
                &mut elements,
                ToolbarElement::StatusIcon,
                ElementProperty::Alpha,
                1.0,
                status_fade_ms,
                status_delay_ms,
                Easing::Transform,
            );
        }

        let handle = AnimationHandle::new();
        log::debug!(
            "Focus change animation started (has_focus={}, {} element animations)",
            has_focus,
            elements.len()
        );
        self.batch = Some(FocusChangeBatch {
            has_focus,
            handle: handle.clone(),
            elements,
        });
        handle
    }

    #[allow(clippy::too_many_arguments)]
    fn push_element(
        &self,
        out: &mut SmallVec<[ElementAnimation; 6]>,
        element: ToolbarElement,
        property: ElementProperty,
        target: f32,
        duration_ms: f32,
        delay_ms: f32,
        easing: Easing,
    ) {
        let visuals = self.element(element);
        let from = match property {
            ElementProperty::Alpha => visuals.alpha,
            ElementProperty::TranslationX => visuals.translation_x,
        };
        out.push(ElementAnimation {
            element,
            property,
            animation: Animation::new(from, target, duration_ms, easing).with_delay(delay_ms),
        });
    }

    pub fn tick(&mut self, delta_ms: f32) -> Option<FocusChangeOutcome> {
        let batch = self.batch.as_mut()?;

        if batch.handle.is_cancelled() {
            let has_focus = batch.has_focus;
            self.batch = None;
            self.url_focus.cancel();
            log::debug!("Focus change animation cancelled through its handle");
            return Some(FocusChangeOutcome::Cancelled { has_focus });
        }

        self.url_focus.tick(delta_ms);
        for anim in batch.elements.iter_mut() {
            let value = anim.animation.advance(delta_ms);
            let visuals = self.elements.entry(anim.element).or_default();
            match anim.property {
                ElementProperty::Alpha => visuals.alpha = value,
                ElementProperty::TranslationX => visuals.translation_x = value,
            }
        }
        batch.elements.retain(|a| !a.animation.is_complete());

        if self.url_focus.is_animating() || !batch.elements.is_empty() {
            return None;
        }
        Some(self.complete_batch())
    }

    /// Jump the running focus batch to its end state
    pub fn finish_focus_animation(&mut self) -> Option<FocusChangeOutcome> {
        let batch = self.batch.as_mut()?;
        self.url_focus.finish();
        for anim in batch.elements.iter_mut() {
            let value = anim.animation.finish();
            let visuals = self.elements.entry(anim.element).or_default();
            match anim.property {
                ElementProperty::Alpha => visuals.alpha = value,
                ElementProperty::TranslationX => visuals.translation_x = value,
            }
        }
        batch.elements.clear();
        Some(self.complete_batch())
    }

    fn complete_batch(&mut self) -> FocusChangeOutcome {
        let has_focus = self.batch.take().map(|b| b.has_focus).unwrap_or(self.has_focus);
        if !has_focus {
            self.restore_text_scroll();
        }
        log::debug!("Focus change animation finished (has_focus={})", has_focus);
        FocusChangeOutcome::Finished { has_focus }
    }

    /// Put the text back where it was before focus, if it is the same text
    fn restore_text_scroll(&mut self) {
        self.text.scroll_x = match self.text.pre_focus.take() {
            Some((text, scroll_x)) if text == self.text.displayed => scroll_x,
            _ => 0.0,
        };
    }

    fn cancel_batch(&mut self) {
        if let Some(batch) = self.batch.take() {
            batch.handle.cancel();
            self.url_focus.cancel();
            log::debug!(
                "Focus change animation (has_focus={}) superseded",
                batch.has_focus
            );
        }
    }

    pub fn is_animating(&self) -> bool {
        self.batch.is_some()
    }
}
