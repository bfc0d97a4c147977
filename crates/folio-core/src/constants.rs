//! Physics defaults, palettes and fixed copy shared by every effect.
//!
//! Force magnitudes are per 60 Hz frame; the step rescales them by the
//! measured frame delta.

// Time
pub const FRAMES_PER_SEC: f32 = 60.0;
pub const MAX_FRAME_DT: f32 = 0.05; // longer gaps are dropped, not replayed

// Surfaces narrower or shorter than this have no real layout yet
pub const MIN_LAYOUT_PX: f32 = 2.0;

// Integration
pub const DEFAULT_FRICTION: f32 = 0.98;
pub const MAX_SPEED: f32 = 60.0; // px per frame, guards runaway impulses

// Pairwise clustering
pub const CLUSTER_RADIUS: f32 = 32.0;
pub const DISPERSE_RADIUS: f32 = 120.0;

// Pointer
pub const POINTER_RADIUS: f32 = 120.0;

// Collision: fraction of penetration corrected per frame
pub const COLLISION_CORRECTION: f32 = 0.05;

// Drag release
pub const FLICK_GAIN: f32 = 0.2;
pub const RIPPLE_RADIUS: f32 = 200.0;
pub const RIPPLE_IMPULSE: f32 = 2.0;

// Interaction speed boost
pub const BOOST_DRAGGED: f32 = 2.5;
pub const BOOST_HOVERED: f32 = 1.7;
pub const BOOST_RECENT: f32 = 2.2;
pub const BOOST_RECENT_WINDOW_SEC: f64 = 0.6;

// Global speed multiplier (keyboard)
pub const SPEED_DEFAULT: f32 = 1.0;
pub const SPEED_MIN: f32 = 0.2;
pub const SPEED_MAX: f32 = 3.0;
pub const SPEED_STEP: f32 = 0.1;

pub const NEON_PALETTE: [&str; 6] = [
    "#00fff7", "#39ff14", "#fffb00", "#ff00cc", "#00ffea", "#ff6a00",
];

pub const MATRIX_PALETTE: [&str; 6] = [
    "rgba(0,255,128,0.7)",
    "rgba(0,255,200,0.7)",
    "rgba(120,255,255,0.5)",
    "rgba(80,255,80,0.5)",
    "rgba(180,255,220,0.4)",
    "rgba(180,220,200,0.3)",
];

pub const HOLO_CYAN: &str = "#00fff7";
