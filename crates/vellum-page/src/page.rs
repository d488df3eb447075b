//! The page abstraction: geometry state and the `Page` capability trait.
//!
//! A page has a *natural* (unrotated) content size in points at a native
//! resolution, and a *display* geometry (integer position and size) that
//! the layout recomputes on every zoom or rotation change. Rotation is
//! kept in quarter turns; an odd number of quarter turns swaps the display
//! width and height.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use vellum_common::{Color, Point, Rect, Size};

use crate::render::RendererRef;

/// Default natural page size in points (A4 at 72 dpi).
pub const DEFAULT_PAGE_WIDTH: f32 = 595.28;
/// Default natural page height in points (A4 at 72 dpi).
pub const DEFAULT_PAGE_HEIGHT: f32 = 841.89;
/// Default native resolution of page content, in dots per inch.
pub const DEFAULT_DPI: f32 = 72.0;

/// A rotation in quarter turns, applied clockwise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Rotate0,
    /// A quarter turn clockwise.
    Rotate90,
    /// A half turn.
    Rotate180,
    /// Three quarter turns clockwise.
    Rotate270,
}

impl Rotation {
    /// The number of quarter turns (0..=3).
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
        }
    }

    /// Build a rotation from a number of quarter turns (taken mod 4).
    #[must_use]
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns & 3 {
            0 => Self::Rotate0,
            1 => Self::Rotate90,
            2 => Self::Rotate180,
            _ => Self::Rotate270,
        }
    }

    /// The rotation obtained by applying `other` after `self` (mod 4).
    #[must_use]
    pub const fn compose(self, other: Self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Whether this rotation swaps the horizontal and vertical axes.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        self.quarter_turns() & 1 == 1
    }
}

/// The concrete geometry state every page carries.
///
/// `page_width`/`page_height` describe the natural, unrotated content size
/// in points at `dpi`; `width`/`height` and the position are the current
/// display geometry in integer pixels, recomputed by [`update_size`].
///
/// [`update_size`]: PageGeometry::update_size
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Natural (unrotated) content width in points.
    pub page_width: f32,
    /// Natural (unrotated) content height in points.
    pub page_height: f32,
    /// Native resolution of the content, in dots per inch.
    pub dpi: f32,
    /// Horizontal scale applied to the natural size.
    pub scale_x: f32,
    /// Vertical scale applied to the natural size.
    pub scale_y: f32,
    /// The page's own rotation, relative to its container.
    pub rotation: Rotation,
    /// The effective rotation after composing with the container's.
    pub computed_rotation: Rotation,
    /// X position of the display rectangle.
    pub x: i32,
    /// Y position of the display rectangle.
    pub y: i32,
    /// Current display width in pixels.
    pub width: i32,
    /// Current display height in pixels.
    pub height: i32,
    /// Background color behind the content, if this page sets one.
    pub paper_color: Option<Color>,
}

impl PageGeometry {
    /// Create geometry for a natural content size, with everything else
    /// at its defaults.
    #[must_use]
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            ..Self::default()
        }
    }

    /// The current display rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The current display position (top-left corner).
    #[must_use]
    pub const fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The current display size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Move the display rectangle to `pos`.
    pub const fn set_pos(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Replace the display rectangle (position and size).
    pub const fn set_geometry(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// The natural size at scale 1 under the computed rotation: the
    /// scaled content size, with width and height swapped when the
    /// rotation is an odd number of quarter turns.
    #[must_use]
    pub const fn default_size(&self) -> (f32, f32) {
        let w = self.page_width * self.scale_x;
        let h = self.page_height * self.scale_y;
        if self.computed_rotation.swaps_axes() {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Recompute the display size for the given target resolution and
    /// zoom factor. The position is left untouched; placement is the
    /// container's job.
    #[allow(clippy::cast_possible_truncation)]
    pub fn update_size(&mut self, dpi_x: f32, dpi_y: f32, zoom_factor: f32) {
        let w = self.page_width * self.scale_x * zoom_factor * dpi_x / self.dpi;
        let h = self.page_height * self.scale_y * zoom_factor * dpi_y / self.dpi;
        if self.computed_rotation.swaps_axes() {
            self.width = h.round() as i32;
            self.height = w.round() as i32;
        } else {
            self.width = w.round() as i32;
            self.height = h.round() as i32;
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            dpi: DEFAULT_DPI,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: Rotation::Rotate0,
            computed_rotation: Rotation::Rotate0,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            paper_color: None,
        }
    }
}

/// A shared handle to a page, owned by whatever container holds it.
pub type PageRef = Rc<RefCell<dyn Page>>;

/// A non-owning handle to a page.
pub type WeakPageRef = Weak<RefCell<dyn Page>>;

/// The page capability: a positioned, sized, rotatable renderable unit.
///
/// Pages are used polymorphically through [`PageRef`] handles; containers
/// never inspect the concrete type except through [`Page::as_any`].
pub trait Page: Any {
    /// The page's geometry state.
    fn geometry(&self) -> &PageGeometry;

    /// Mutable access to the page's geometry state.
    fn geometry_mut(&mut self) -> &mut PageGeometry;

    /// The renderer responsible for this page's imagery, if any.
    fn renderer(&self) -> Option<RendererRef>;

    /// Recompute the display size for the given resolution and zoom.
    ///
    /// The default implementation delegates to
    /// [`PageGeometry::update_size`]; container pages extend it to also
    /// size and place their children.
    fn update_size(&mut self, dpi_x: f32, dpi_y: f32, zoom_factor: f32) {
        self.geometry_mut().update_size(dpi_x, dpi_y, zoom_factor);
    }

    /// Produce an independent copy of this page.
    ///
    /// The copy shares no mutable state with the original; container
    /// pages copy their children recursively.
    fn copy_page(&self) -> PageRef;

    /// Downcast seam for containers that need the concrete page type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast seam.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
