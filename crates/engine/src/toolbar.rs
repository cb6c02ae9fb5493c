//! Toolbar facade
//!
//! Single entry point for collaborators: events go in through
//! [`Toolbar::handle_event`], time goes in through [`Toolbar::tick`], and the
//! renderer reads [`Toolbar::frame`] once per frame.

use serde::Serialize;

use chromebar_geometry::{Color, Rect};

use crate::axis::AxisValue;
use crate::brand::BrandChange;
use crate::compositor::{compute_bounds, FrameGeometry};
use crate::config::ToolbarConfig;
use crate::error::{report_violation, EngineError, EngineResult};
use crate::event::{ClickTarget, ToolbarEvent};
use crate::expansion::{ElementVisuals, ExpansionDependents, FocusChangeOutcome, ToolbarElement};
use crate::mode::{ModeChange, ModeChanges, ModePhase};
use crate::state::{NewTabSurface, TextureCapture, ToolbarPresentationState};
use crate::visual_state::VisualState;

/// Host callback for a toolbar button
pub type ClickHandler = Box<dyn FnMut()>;

/// Page load progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressBar {
    pub visible: bool,
    pub progress: f32,
    pub color: Color,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub clock_ms: f64,
    pub phase: ModePhase,
    pub visual_state: VisualState,
    pub toolbar_color: Color,
    pub use_light_drawables: bool,
    pub toolbar_alpha: f32,
    pub tab_switcher_percent: f32,
    pub settle_translation_y: f32,
    pub expansion: ExpansionDependents,
    pub url_has_focus: bool,
    pub url_bar_focusable: bool,
    pub geometry: FrameGeometry,
    pub elements: [(ToolbarElement, ElementVisuals); 3],
    pub progress_bar: ProgressBar,
    pub tab_count: usize,
}

pub struct Toolbar {
    config: ToolbarConfig,
    state: ToolbarPresentationState,
    frame: FrameGeometry,
    tab_switcher_handler: Option<ClickHandler>,
    new_entry_handler: Option<ClickHandler>,
}

impl Toolbar {
    pub fn new(config: ToolbarConfig) -> Self {
        let state = ToolbarPresentationState::new(&config);
        let frame = compute_bounds(&state.compositor_input(&config));
        let mut toolbar = Self {
            config,
            state,
            frame,
            tab_switcher_handler: None,
            new_entry_handler: None,
        };
        toolbar.update_visual_state();
        toolbar.recompute_frame();
        toolbar
    }

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    pub fn state(&self) -> &ToolbarPresentationState {
        &self.state
    }

    /// Apply one collaborator event
    pub fn handle_event(&mut self, event: ToolbarEvent) {
        log::trace!("Toolbar event: {:?}", event);
        match event {
            ToolbarEvent::UrlChanged { url, display_text } => {
                self.state.tab.url = Some(url);
                self.state.expansion.set_displayed_text(&display_text);
            }
            ToolbarEvent::TitleChanged { title } => {
                self.state.tab.title = title;
            }
            ToolbarEvent::LoadProgressChanged { progress } => {
                let progress = progress.clamp(0.0, 1.0);
                self.state.tab.load_progress = progress;
                self.state.tab.loading = progress < 1.0;
            }
            ToolbarEvent::NavigationCommitted {
                url,
                is_native_page,
            } => {
                log::debug!("Navigation committed: {}", url);
                self.state.tab.url = Some(url);
                self.state.tab.is_native_page = is_native_page;
                self.state.tab.last_error = None;
            }
            ToolbarEvent::NavigationFailed { url, error } => {
                log::warn!("Navigation to {} failed: {}", url, error);
                self.state.tab.loading = false;
                self.state.tab.last_error = Some(error);
            }
            ToolbarEvent::ContentSwapped {
                did_start_load,
                did_finish_load,
            } => {
                if did_start_load {
                    self.state.tab.loading = true;
                    self.state.tab.load_progress = 0.0;
                }
                if did_finish_load {
                    self.state.tab.loading = false;
                    self.state.tab.load_progress = 1.0;
                }
            }
            ToolbarEvent::SecurityStateChanged { level } => {
                self.state.tab.security = level;
            }
            ToolbarEvent::TabSwitched {
                incognito,
                brand_color,
                url,
                display_text,
                new_tab_surface,
            } => {
                self.state.brand.cancel();
                self.state.incognito = incognito;
                self.state.brand_color = self.significant_brand_color(brand_color);
                self.state.tab.url = url;
                self.state.tab.title.clear();
                self.state.expansion.set_displayed_text(&display_text);
                match new_tab_surface {
                    Some(search_box) => self.attach_new_tab_surface(search_box),
                    None => self.detach_new_tab_surface(),
                }
                self.update_visual_state();
            }
            ToolbarEvent::TabCountChanged { count } => {
                self.state.tab_count = count;
            }
            ToolbarEvent::BrandColorChanged { color, animate } => {
                self.on_brand_color_changed(color, animate);
            }
            ToolbarEvent::OverviewStartedShowing { show_toolbar } => {
                self.enter_switcher(show_toolbar);
            }
            ToolbarEvent::OverviewStartedHiding {
                show_toolbar,
                delay_settle,
            } => match self.state.mode.request_exit_switcher(show_toolbar, delay_settle) {
                Ok(_) => self.update_visual_state(),
                Err(err) => self.violation(err),
            },
            ToolbarEvent::OverviewFinishedHiding => {
                let result = self.state.mode.on_transition_finished();
                self.apply_mode_result(result);
            }
            ToolbarEvent::UrlFocusChanged { has_focus } => {
                if has_focus && !self.state.mode.url_bar_focusable() {
                    log::debug!(
                        "Focus ignored, url bar not focusable in {:?}",
                        self.state.mode.phase()
                    );
                } else {
                    self.state.expansion.begin_focus_change_animation(has_focus);
                }
            }
            ToolbarEvent::UrlScrolled { scroll_x } => {
                self.state.expansion.set_url_scroll_x(scroll_x);
            }
            ToolbarEvent::NewTabSurfaceAttached { search_box } => {
                self.attach_new_tab_surface(search_box);
                self.update_visual_state();
            }
            ToolbarEvent::NewTabSurfaceScrolled { percent } => {
                if self.state.new_tab_surface.is_some() {
                    self.state
                        .expansion
                        .set_ntp_scroll_percent(AxisValue::percent(percent));
                } else {
                    log::debug!("Scroll of a detached new-tab surface ignored");
                }
            }
            ToolbarEvent::NewTabSurfaceDetached => {
                self.detach_new_tab_surface();
                self.update_visual_state();
            }
            ToolbarEvent::LayoutChanged {
                collapsed,
                expanded,
                siblings,
                rtl,
            } => {
                self.state.layout.collapsed = collapsed;
                self.state.layout.expanded = expanded;
                self.state.layout.siblings = siblings.into_iter().collect();
                self.state.layout.rtl = rtl;
                self.state.expansion.set_rtl(rtl);
            }
        }
        self.recompute_frame();
    }

    /// Advance every running animation by `delta_ms`
    pub fn tick(&mut self, delta_ms: f32) {
        if self.state.texture_capture.is_some() {
            return;
        }
        let delta_ms = delta_ms.max(0.0);
        self.state.clock_ms += f64::from(delta_ms);

        let result = self.state.mode.tick(delta_ms);
        self.apply_mode_result(result);

        if let Some(outcome) = self.state.expansion.tick(delta_ms) {
            log::trace!("Focus change ended: {:?}", outcome);
        }

        if self.state.brand.tick(delta_ms) {
            self.update_visual_state();
        }

        self.recompute_frame();
    }

    /// Jump every animation to its end state
    pub fn finish_animations(&mut self) {
        let result = self.state.mode.finish_all_animations_immediately();
        self.apply_mode_result(result);
        self.state.expansion.finish_focus_animation();
        if self.state.brand.finish() {
            self.update_visual_state();
        }
        self.recompute_frame();
    }

    /// Freeze the toolbar into a fully opaque, settled frame for snapshots
    pub fn set_texture_capture_mode(&mut self, enabled: bool) {
        if enabled == self.state.texture_capture.is_some() {
            self.violation(EngineError::TextureCaptureUnchanged(enabled));
            return;
        }
        if enabled {
            self.state.texture_capture = Some(TextureCapture {
                pre_capture_alpha: self.state.toolbar_alpha,
            });
            self.finish_animations();
            self.state.toolbar_alpha = 1.0;
        } else if let Some(capture) = self.state.texture_capture.take() {
            self.state.toolbar_alpha = capture.pre_capture_alpha;
        }
        log::debug!("Texture capture mode {}", enabled);
    }

    pub fn set_tab_switcher_click_handler<F>(&mut self, handler: F)
    where
        F: FnMut() + 'static,
    {
        self.tab_switcher_handler = Some(Box::new(handler));
    }

    pub fn set_new_entry_click_handler<F>(&mut self, handler: F)
    where
        F: FnMut() + 'static,
    {
        self.new_entry_handler = Some(Box::new(handler));
    }

    /// Dispatch a click; returns whether a handler ran
    pub fn click(&mut self, target: ClickTarget) -> bool {
        let in_switcher = self.state.mode.phase().is_in_switcher_mode();
        let handler = match target {
            ClickTarget::TabSwitcherButton
                if in_switcher || self.state.expansion.dependents().toolbar_buttons_visible =>
            {
                self.tab_switcher_handler.as_mut()
            }
            ClickTarget::NewEntryButton if in_switcher => self.new_entry_handler.as_mut(),
            _ => None,
        };
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => {
                log::debug!("Click on {:?} not handled", target);
                false
            }
        }
    }

    /// On-screen location bar rectangle
    pub fn current_bounds(&self) -> Rect {
        self.frame.location_bar.visible()
    }

    pub fn current_background_alpha(&self) -> u8 {
        self.frame.background_alpha
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    pub fn is_in_switcher_mode(&self) -> bool {
        self.state.mode.phase().is_in_switcher_mode()
    }

    pub fn mode_phase(&self) -> ModePhase {
        self.state.mode.phase()
    }

    pub fn toolbar_color(&self) -> Color {
        self.state.brand.current_color()
    }

    pub fn visual_state(&self) -> VisualState {
        self.state.visual_state
    }

    pub fn url_has_focus(&self) -> bool {
        self.state.expansion.has_focus()
    }

    pub fn frame_geometry(&self) -> &FrameGeometry {
        &self.frame
    }

    pub fn frame(&self) -> FrameSnapshot {
        let expansion = &self.state.expansion;
        FrameSnapshot {
            clock_ms: self.state.clock_ms,
            phase: self.state.mode.phase(),
            visual_state: self.state.visual_state,
            toolbar_color: self.toolbar_color(),
            use_light_drawables: self.use_light_drawables(),
            toolbar_alpha: self.state.toolbar_alpha,
            tab_switcher_percent: self.state.mode.tab_switcher_percent(),
            settle_translation_y: self.state.mode.settle_translation_y(),
            expansion: expansion.dependents(),
            url_has_focus: expansion.has_focus(),
            url_bar_focusable: self.state.mode.url_bar_focusable(),
            geometry: self.frame.clone(),
            elements: ToolbarElement::ALL.map(|element| (element, expansion.element(element))),
            progress_bar: self.progress_bar(),
            tab_count: self.state.tab_count,
        }
    }

    fn enter_switcher(&mut self, show_toolbar: bool) {
        match self.state.mode.request_enter_switcher(show_toolbar) {
            Ok(true) => {
                // A half-finished focus layout would be frozen under the overview
                if let Some(FocusChangeOutcome::Finished { has_focus }) =
                    self.state.expansion.finish_focus_animation()
                {
                    log::debug!("Focus change ended by switcher entry (has_focus={})", has_focus);
                }
                self.update_visual_state();
            }
            Ok(false) => {}
            Err(err) => self.violation(err),
        }
    }

    fn on_brand_color_changed(&mut self, color: Option<Color>, animate: bool) {
        let color = self.significant_brand_color(color);
        self.state.brand_color = color;
        let target = color.unwrap_or(self.config.theme.default_primary);
        let change = self.state.brand.on_brand_color_changed(
            target,
            animate,
            self.state.visual_state,
            self.frame.background_alpha,
            self.state.clock_ms,
        );
        // A running transition re-resolves the visual state when it completes
        if change != BrandChange::Started {
            self.update_visual_state();
        }
    }

    /// Brand colors equal to the theme default count as no brand color
    fn significant_brand_color(&self, color: Option<Color>) -> Option<Color> {
        color.filter(|c| *c != self.config.theme.default_primary)
    }

    fn attach_new_tab_surface(&mut self, search_box: Rect) {
        self.state.new_tab_surface = Some(NewTabSurface { search_box });
        if !self.state.expansion.ntp_scroll_percent().is_initialized() {
            self.state
                .expansion
                .set_ntp_scroll_percent(AxisValue::percent(0.0));
        }
    }

    fn detach_new_tab_surface(&mut self) {
        self.state.new_tab_surface = None;
        self.state
            .expansion
            .set_ntp_scroll_percent(AxisValue::Uninitialized);
    }

    fn apply_mode_result(&mut self, result: EngineResult<ModeChanges>) {
        let changes = match result {
            Ok(changes) => changes,
            Err(err) => {
                self.violation(err);
                return;
            }
        };
        let mut phase_changed = false;
        for change in changes {
            match change {
                ModeChange::PhaseChanged { from, to } => {
                    log::debug!("Toolbar mode {:?} -> {:?}", from, to);
                    phase_changed = true;
                }
                ModeChange::SettleStarted => log::debug!("Settle animation started"),
                ModeChange::SettleFinished => log::debug!("Settle animation finished"),
            }
        }
        if phase_changed {
            self.update_visual_state();
        }
    }

    /// Re-resolve the visual state and write its toolbar color
    fn update_visual_state(&mut self) {
        let previous = self.state.visual_state;
        let next = VisualState::resolve(&self.state.visual_state_inputs());

        if self.state.brand.is_animating() {
            if previous.permits_brand_transition() && next.permits_brand_transition() {
                return;
            }
            self.state.brand.cancel();
        }

        if next != previous {
            log::debug!("Visual state {:?} -> {:?}", previous, next);
        }
        self.state.visual_state = next;
        let color = next.toolbar_color(&self.config.theme, self.state.brand_color);
        self.state.brand.set_color(color);
    }

    fn violation(&mut self, err: EngineError) {
        report_violation(&err);
        self.state.mode.recover();
        self.update_visual_state();
    }

    fn recompute_frame(&mut self) {
        let frame = compute_bounds(&self.state.compositor_input(&self.config));
        if self.state.texture_capture.is_none() {
            let mode = &self.state.mode;
            // Fading toolbar follows the switcher percent until the phase settles
            self.state.toolbar_alpha =
                if mode.show_toolbar_during_animation() || mode.phase().is_stable() {
                    1.0
                } else {
                    mode.tab_switcher_percent()
                };
        }
        self.frame = frame;
    }

    fn use_light_drawables(&self) -> bool {
        match self.state.visual_state {
            VisualState::Normal | VisualState::NewTabSurfaceNormal => false,
            VisualState::Incognito | VisualState::TabSwitcherIncognito => true,
            VisualState::BrandColor | VisualState::TabSwitcherNormal => {
                self.toolbar_color().should_use_light_foreground()
            }
        }
    }

    fn progress_bar(&self) -> ProgressBar {
        let tab = &self.state.tab;
        let theme = &self.config.theme;
        let color = if tab.is_native_page {
            if self.state.incognito {
                theme.incognito_primary
            } else {
                theme.default_primary
            }
        } else {
            self.toolbar_color()
        };
        ProgressBar {
            visible: self.state.mode.phase() == ModePhase::StaticTab && tab.loading,
            progress: tab.load_progress,
            color,
        }
    }
}
