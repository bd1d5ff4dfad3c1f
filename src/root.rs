//! Open state, origin tracking and the plain-data slots handed to the presentation layer.

use std::rc::{Rc, Weak};

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{GenieError, GenieResult};

/// Anything that can report its viewport rect (typically the trigger element).
pub trait Measure {
    /// `None` while the node is not mounted.
    fn measure(&self) -> Option<Rect>;
}

/// Where the animation emerges from.
#[derive(Clone, Debug)]
pub struct Origin {
    /// Node to re-measure on close. Held weakly so an unmounted trigger is not kept alive.
    pub node: Option<Weak<dyn Measure>>,
    pub rect: Option<Rect>,
    pub point: Point,
}

impl Origin {
    fn from_rect(node: Option<Weak<dyn Measure>>, rect: Option<Rect>) -> Self {
        let point = rect.map(Rect::center).unwrap_or(Point::ZERO);
        Self { node, rect, point }
    }
}

/// `data-state` value for the slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataState {
    Open,
    Closed,
}

impl DataState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Attributes for the trigger element.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TriggerSlot {
    pub id: String,
    pub aria_controls: String,
    pub aria_haspopup: &'static str,
    pub aria_expanded: bool,
    pub data_state: DataState,
}

/// Attributes for the content element.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ContentSlot {
    pub id: String,
    pub role: &'static str,
    pub aria_modal: bool,
    pub aria_labelledby: String,
    pub data_state: DataState,
}

/// Open flag plus origin for one genie instance.
#[derive(Debug)]
pub struct GenieRoot {
    id: String,
    is_open: bool,
    origin: Option<Origin>,
}

impl GenieRoot {
    /// `id` prefixes the trigger and content element ids.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_open: false,
            origin: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn origin_rect(&self) -> Option<Rect> {
        self.origin.as_ref().and_then(|o| o.rect)
    }

    /// Open from `node`, measuring it now.
    pub fn open(&mut self, node: &Rc<dyn Measure>) -> Option<Rect> {
        let rect = node.measure();
        self.origin = Some(Origin::from_rect(Some(Rc::downgrade(node)), rect));
        self.is_open = true;
        rect
    }

    /// Open from a bare point with a nominal origin size.
    pub fn open_at(&mut self, point: Point, width: f64, height: f64) -> Rect {
        let rect = Rect::new(point.x - width / 2.0, point.y - height / 2.0, width, height);
        self.origin = Some(Origin {
            node: None,
            rect: Some(rect),
            point,
        });
        self.is_open = true;
        rect
    }

    /// Close, keeping the origin. Returns the freshly measured origin rect.
    pub fn close(&mut self) -> Option<Rect> {
        self.is_open = false;
        self.measure_origin()
    }

    /// Close when open, otherwise open from `node`.
    pub fn toggle(&mut self, node: &Rc<dyn Measure>) -> Option<Rect> {
        if self.is_open {
            self.close()
        } else {
            self.open(node)
        }
    }

    /// Re-measure the origin node. The stored origin is only replaced when the rect moved.
    pub fn measure_origin(&mut self) -> Option<Rect> {
        let origin = self.origin.as_mut()?;
        let Some(node) = origin.node.as_ref().and_then(Weak::upgrade) else {
            return origin.rect;
        };
        match node.measure() {
            Some(rect) if origin.rect.is_some_and(|r| r.approx_eq(rect, 0.5)) => origin.rect,
            Some(rect) => {
                origin.rect = Some(rect);
                origin.point = rect.center();
                Some(rect)
            }
            None => origin.rect,
        }
    }

    pub fn trigger_id(&self) -> String {
        format!("{}-trigger", self.id)
    }

    pub fn content_id(&self) -> String {
        format!("{}-content", self.id)
    }

    fn data_state(&self) -> DataState {
        if self.is_open {
            DataState::Open
        } else {
            DataState::Closed
        }
    }

    pub fn trigger_slot(&self) -> TriggerSlot {
        TriggerSlot {
            id: self.trigger_id(),
            aria_controls: self.content_id(),
            aria_haspopup: "dialog",
            aria_expanded: self.is_open,
            data_state: self.data_state(),
        }
    }

    pub fn content_slot(&self) -> ContentSlot {
        ContentSlot {
            id: self.content_id(),
            role: "dialog",
            aria_modal: true,
            aria_labelledby: self.trigger_id(),
            data_state: self.data_state(),
        }
    }
}

/// Slot components wrap exactly one child.
pub fn expect_single_child(count: usize, component: &str) -> GenieResult<()> {
    if count == 1 {
        return Ok(());
    }
    Err(GenieError::usage(format!(
        "{component} expects exactly one child element, got {count}"
    )))
}

#[cfg(test)]
#[path = "../tests/unit/root.rs"]
mod tests;
