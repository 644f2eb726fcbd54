//! Timeline: waveform transport, overlays, and gesture input.

pub mod controller;
pub mod headless;
pub mod input;
pub mod overlay;
pub mod surface;

pub use controller::{TimelineController, TimelineEvent};
pub use headless::{HeadlessSurface, HeadlessVideo};
pub use input::{interpret_wheel, register_input_handlers, GestureAction, InputSubscription, WheelGesture};
pub use overlay::{Overlay, OverlayId, OverlaySink, OverlayStyle};
pub use surface::{LoadId, MediaSource, SurfaceEvent, SurfaceId, VideoSink, WaveformSurface};
