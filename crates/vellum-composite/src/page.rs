//! The composite page: an ordered stack of child pages inside one page.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use vellum_common::{Rect, Region};
use vellum_page::{Page, PageGeometry, PageRef, RendererRef};

use crate::render::CompositeRenderer;

/// Positions the children of a composite page inside its rectangle.
///
/// Called at the end of every size update, after all children have been
/// resized. The default policy centers every child; custom policies
/// (side-by-side, grid, ...) only need to move child geometry, never to
/// recompute sizes.
pub trait PagePlacement {
    /// Place `pages` inside `bounds`.
    fn place(&self, bounds: Rect, pages: &[PageRef]);
}

/// The default placement: center every child on the composite's center.
#[derive(Default)]
pub struct CenterPlacement;

impl PagePlacement for CenterPlacement {
    fn place(&self, bounds: Rect, pages: &[PageRef]) {
        let center = bounds.center();
        for page in pages {
            let mut page = page.borrow_mut();
            let rect = page.geometry().rect().centered_on(center);
            page.geometry_mut().set_geometry(rect);
        }
    }
}

/// A page that owns an ordered stack of embedded child pages.
///
/// The children live in [`CompositePage::pages`]; insertion order is paint
/// order and index 0 is the topmost page. Child rotation is relative to
/// the composite, and child zoom is the composite's zoom multiplied by
/// [`CompositePage::scale_pages`].
pub struct CompositePage {
    geometry: PageGeometry,
    /// Child pages, front to back; index 0 is on top.
    pub pages: Vec<PageRef>,
    /// Multiplier applied to the zoom factor of the children.
    pub scale_pages: f32,
    /// When true, children fully hidden below other children are skipped
    /// during visibility scans (occlusion culling).
    pub opaque_pages: bool,
    placement: Rc<dyn PagePlacement>,
    renderer: Option<RendererRef>,
}

impl CompositePage {
    /// Create an empty composite page with the default composite renderer
    /// and centering placement installed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_renderer(Rc::new(CompositeRenderer::new()))
    }

    /// Create an empty composite page using the given renderer.
    #[must_use]
    pub fn with_renderer(renderer: RendererRef) -> Self {
        Self {
            geometry: PageGeometry::default(),
            pages: Vec::new(),
            scale_pages: 1.0,
            opaque_pages: true,
            placement: Rc::new(CenterPlacement),
            renderer: Some(renderer),
        }
    }

    /// Replace the placement policy used by [`update_page_positions`].
    ///
    /// [`update_page_positions`]: CompositePage::update_page_positions
    pub fn set_placement(&mut self, placement: Rc<dyn PagePlacement>) {
        self.placement = placement;
    }

    /// Wrap this page in a shared page handle.
    #[must_use]
    pub fn into_ref(self) -> PageRef {
        Rc::new(RefCell::new(self))
    }

    /// Position the children inside this page's rectangle using the
    /// installed placement policy. Called by `update_size`.
    pub fn update_page_positions(&self) {
        self.placement.place(self.geometry.rect(), &self.pages);
    }

    /// The children intersecting `rect`, front to back, with the part of
    /// `rect` each one covers.
    ///
    /// When [`opaque_pages`] is set, children whose overlap is entirely
    /// hidden below earlier (higher) children are skipped, and the scan
    /// stops as soon as the whole of `rect` is covered. Every call returns
    /// a fresh scan; nothing is cached between calls.
    ///
    /// [`opaque_pages`]: CompositePage::opaque_pages
    #[must_use]
    pub fn visible_pages_at(&self, rect: Rect) -> VisiblePages<'_> {
        VisiblePages {
            pages: self.pages.iter(),
            rect,
            opaque: self.opaque_pages,
            covered: Region::new(),
            exhausted: false,
        }
    }
}

impl Default for CompositePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for CompositePage {
    fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut PageGeometry {
        &mut self.geometry
    }

    fn renderer(&self) -> Option<RendererRef> {
        self.renderer.clone()
    }

    /// Recompute this page's size, then size and place the children: each
    /// child's effective rotation becomes its own rotation composed with
    /// this page's computed rotation, and each child is zoomed at
    /// `zoom_factor * scale_pages`.
    fn update_size(&mut self, dpi_x: f32, dpi_y: f32, zoom_factor: f32) {
        self.geometry.update_size(dpi_x, dpi_y, zoom_factor);

        let child_zoom = zoom_factor * self.scale_pages;
        for child in &self.pages {
            let mut child = child.borrow_mut();
            let rotation = child
                .geometry()
                .rotation
                .compose(self.geometry.computed_rotation);
            child.geometry_mut().computed_rotation = rotation;
            child.update_size(dpi_x, dpi_y, child_zoom);
        }

        self.update_page_positions();
    }

    /// Copy this page and every child recursively; the copy shares no
    /// mutable page state with the original.
    fn copy_page(&self) -> PageRef {
        let pages = self
            .pages
            .iter()
            .map(|child| child.borrow().copy_page())
            .collect();
        Rc::new(RefCell::new(Self {
            geometry: self.geometry.clone(),
            pages,
            scale_pages: self.scale_pages,
            opaque_pages: self.opaque_pages,
            placement: Rc::clone(&self.placement),
            renderer: self.renderer.clone(),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Iterator over `(child, intersection)` pairs produced by
/// [`CompositePage::visible_pages_at`].
pub struct VisiblePages<'a> {
    pages: std::slice::Iter<'a, PageRef>,
    rect: Rect,
    opaque: bool,
    covered: Region,
    exhausted: bool,
}

impl Iterator for VisiblePages<'_> {
    type Item = (PageRef, Rect);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            let page = self.pages.next()?;
            let overlay = self.rect.intersected(page.borrow().geometry().rect());
            if overlay.is_empty() {
                continue;
            }
            // Skip children entirely hidden below the ones already seen.
            if self.opaque && self.covered.covers(overlay) {
                continue;
            }
            self.covered.add(overlay);
            if self.opaque && self.covered.covers(self.rect) {
                self.exhausted = true;
            }
            return Some((Rc::clone(page), overlay));
        }
    }
}
