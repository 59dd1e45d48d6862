use serde::{Deserialize, Serialize};

/// Typed payload per `event_type`. Decoding is schema-checked at the
/// ingest boundary (§9: tagged variant, not a dynamically-typed blob).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    Keystroke(KeystrokePayload),
    MouseClick(MouseClickPayload),
    MouseMove(MouseMovePayload),
    Scroll(ScrollPayload),
    Focus(FocusPayload),
    Blur(FocusPayload),
    DeviceInfo(DeviceInfoPayload),
    VisibilityChange(VisibilityPayload),
    SessionStart(SessionStartPayload),
}

impl EventPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            EventPayload::Keystroke(_) => "keystroke",
            EventPayload::MouseClick(_) => "mouse_click",
            EventPayload::MouseMove(_) => "mouse_move",
            EventPayload::Scroll(_) => "scroll",
            EventPayload::Focus(_) => "focus",
            EventPayload::Blur(_) => "blur",
            EventPayload::DeviceInfo(_) => "device_info",
            EventPayload::VisibilityChange(_) => "visibility_change",
            EventPayload::SessionStart(_) => "session_start",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystrokePayload {
    pub key_code: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MouseClickPayload {
    pub x: f64,
    pub y: f64,
    /// Target element bounds, when known, for precision scoring.
    #[serde(default)]
    pub target_x_min: Option<f64>,
    #[serde(default)]
    pub target_x_max: Option<f64>,
    #[serde(default)]
    pub target_y_min: Option<f64>,
    #[serde(default)]
    pub target_y_max: Option<f64>,
}

impl MouseClickPayload {
    /// Fraction of the click that landed inside the reported target bounds,
    /// 1.0 when no bounds were reported (nothing to penalize).
    pub fn precision(&self) -> f64 {
        match (
            self.target_x_min,
            self.target_x_max,
            self.target_y_min,
            self.target_y_max,
        ) {
            (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) => {
                if self.x >= x_min && self.x <= x_max && self.y >= y_min && self.y <= y_max {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MouseMovePayload {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScrollPayload {
    pub delta_y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusPayload {
    pub element_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfoPayload {
    pub screen: Option<Resolution>,
    pub viewport: Option<Resolution>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisibilityPayload {
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartPayload {
    pub referrer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_is_one_without_bounds() {
        let p = MouseClickPayload {
            x: 10.0,
            y: 10.0,
            target_x_min: None,
            target_x_max: None,
            target_y_min: None,
            target_y_max: None,
        };
        assert_eq!(p.precision(), 1.0);
    }

    #[test]
    fn precision_is_zero_outside_bounds() {
        let p = MouseClickPayload {
            x: 100.0,
            y: 100.0,
            target_x_min: Some(0.0),
            target_x_max: Some(10.0),
            target_y_min: Some(0.0),
            target_y_max: Some(10.0),
        };
        assert_eq!(p.precision(), 0.0);
    }
}
