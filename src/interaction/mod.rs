//! Pointer, wheel and touch interpretation plus crosshair/tooltip state.

pub mod gesture;
pub mod hit_test;
pub mod tooltip;

pub use gesture::{
    GestureConfig, GestureContext, GestureInterpreter, GestureKind, PointerButton, TouchContact,
    WheelInput,
};
pub use hit_test::{HitTestFrame, nearest_marker_within, nearest_point_index};
pub use tooltip::{
    HideTimer, HoveredMark, TimerHandle, TooltipConfig, TooltipMachine, TooltipPhase, TooltipState,
};
