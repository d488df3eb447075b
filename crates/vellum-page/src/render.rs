//! The renderer capability and its completion-callback type.
//!
//! Rendering may be asynchronous: a renderer is free to schedule work on
//! a background worker and invoke the supplied [`RenderCallback`] later,
//! on the UI loop, when imagery becomes available. None of the trait
//! methods block; `update` reports readiness instead.

use std::rc::{Rc, Weak};

use image::RgbaImage;
use vellum_common::{Color, Painter, Rect};

use crate::page::PageRef;

/// Describes the paint target a page is being rendered for.
#[derive(Copy, Clone, Debug)]
pub struct Device {
    /// Device pixels per logical pixel of the target (backing scale).
    pub pixel_ratio: f32,
}

impl Default for Device {
    fn default() -> Self {
        Self { pixel_ratio: 1.0 }
    }
}

/// A cloneable render-completion callback with pointer identity.
///
/// Clones share the same underlying closure, and [`RenderCallback::ptr_eq`]
/// compares that identity, so a callback handed to a renderer can later be
/// matched when unscheduling. [`RenderCallback::downgrade`] yields a
/// non-owning handle for callback tables that must not keep the callback's
/// captures alive.
#[derive(Clone)]
pub struct RenderCallback(Rc<dyn Fn(&PageRef)>);

impl RenderCallback {
    /// Wrap a closure as a callback handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&PageRef) + 'static,
    {
        Self(Rc::new(callback))
    }

    /// Invoke the callback for `page`.
    pub fn invoke(&self, page: &PageRef) {
        (self.0)(page);
    }

    /// Whether two handles refer to the same underlying callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A non-owning handle to this callback.
    #[must_use]
    pub fn downgrade(&self) -> WeakRenderCallback {
        WeakRenderCallback(Rc::downgrade(&self.0))
    }
}

impl std::fmt::Debug for RenderCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RenderCallback")
            .field(&Rc::as_ptr(&self.0))
            .finish()
    }
}

/// A non-owning handle to a [`RenderCallback`].
#[derive(Clone)]
pub struct WeakRenderCallback(Weak<dyn Fn(&PageRef)>);

impl WeakRenderCallback {
    /// Recover the callback, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<RenderCallback> {
        self.0.upgrade().map(RenderCallback)
    }

    /// Whether the underlying callback has been dropped.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0.strong_count() == 0
    }

    /// Whether this weak handle refers to the given live callback.
    #[must_use]
    pub fn refers_to(&self, callback: &RenderCallback) -> bool {
        Weak::ptr_eq(&self.0, &callback.downgrade().0)
    }
}

/// A shared handle to a renderer.
pub type RendererRef = Rc<dyn Renderer>;

/// The renderer capability surface.
///
/// Both leaf-page renderers and container renderers implement this trait,
/// so a container can delegate to heterogeneous child renderers without
/// type inspection. Renderers own their own caches; the interface carries
/// no cache state.
pub trait Renderer {
    /// Ensure imagery for `rect` (in page-local coordinates) is available
    /// or scheduled for the given device.
    ///
    /// Returns `true` when nothing is pending, `false` when rendering was
    /// scheduled and `callback` will be invoked once it completes. This is
    /// a readiness flag, not an error signal.
    fn update(
        &self,
        page: &PageRef,
        device: &Device,
        rect: Rect,
        callback: Option<&RenderCallback>,
    ) -> bool;

    /// Paint `rect` (in page-local coordinates) onto `painter`, using
    /// whatever imagery is currently available. `callback` is invoked
    /// later for any part that had to be scheduled.
    fn paint(
        &self,
        page: &PageRef,
        painter: &mut Painter<'_>,
        rect: Rect,
        callback: Option<&RenderCallback>,
    );

    /// Render `rect` (in page-local coordinates) to a raster image at the
    /// given resolution, synchronously.
    fn image(&self, page: &PageRef, rect: Rect, dpi_x: f32, dpi_y: f32) -> RgbaImage;

    /// Cancel or detach pending render jobs for the given pages that were
    /// issued with `callback` (all jobs when `callback` is `None`).
    fn unschedule(&self, pages: &[PageRef], callback: Option<&RenderCallback>);

    /// Discard cached imagery for the given pages.
    fn invalidate(&self, pages: &[PageRef]);

    /// The renderer's default background color, if it has one.
    fn paper_color(&self) -> Option<Color> {
        None
    }
}

/// Resolve the background color to paint behind page content: the page's
/// own paper color if set, else the renderer's default, else white.
#[must_use]
pub fn resolve_paper_color(page_color: Option<Color>, renderer_color: Option<Color>) -> Color {
    page_color.or(renderer_color).unwrap_or(Color::WHITE)
}
