//! Chromebar Engine
//!
//! Presentation engine for a browser toolbar: switcher mode transitions,
//! address field expansion, per-frame bounds and background, and brand color
//! transitions, driven by events and frame ticks.

mod animation;
mod axis;
mod brand;
mod compositor;
mod config;
mod error;
mod event;
mod expansion;
mod mode;
mod state;
mod toolbar;
mod visual_state;

pub use animation::{Animation, AnimationHandle};
pub use axis::{AnimationAxis, AxisTick, AxisValue};
pub use brand::{BrandChange, BrandColorAnimator, BrandColorTransition};
pub use compositor::{
    compute_bounds, ChildClip, CompositorInput, FrameGeometry, LocationBarBounds, Sibling,
    SiblingKind, MAX_INLINE_SIBLINGS,
};
pub use config::{
    DeviceGeometry, FormFactor, ThemeColors, ToolbarConfig,
    LOCATION_BAR_TRANSPARENT_BACKGROUND_ALPHA,
};
pub use error::{report_violation, EngineError, EngineResult};
pub use event::{ClickTarget, SecurityLevel, ToolbarEvent};
pub use expansion::{
    ElementVisuals, ExpansionCoordinator, ExpansionDependents, FocusChangeOutcome, ToolbarElement,
};
pub use mode::{ModeChange, ModeChanges, ModePhase, ModeStateMachine};
pub use state::{HostLayout, NewTabSurface, TabSnapshot, TextureCapture, ToolbarPresentationState};
pub use toolbar::{ClickHandler, FrameSnapshot, ProgressBar, Toolbar};
pub use visual_state::{VisualState, VisualStateInputs};
