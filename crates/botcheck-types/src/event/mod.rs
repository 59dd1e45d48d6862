mod event;
mod payload;

pub use event::Event;
pub use payload::{
    DeviceInfoPayload, EventPayload, FocusPayload, KeystrokePayload, MouseClickPayload,
    MouseMovePayload, Resolution, ScrollPayload, SessionStartPayload, VisibilityPayload,
};
