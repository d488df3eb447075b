//! The composite renderer: visibility-aware dispatch to child renderers.
//!
//! The renderer keeps no cache of its own; every child keeps its own cache
//! via its own renderer. The only persistent state is the forwarding
//! callback table, which holds weak references on every axis and is purged
//! of expired entries before it grows.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use image::RgbaImage;
use vellum_common::warning::warn_once;
use vellum_common::{Color, Painter, Point, Rect, Region, Surface};
use vellum_page::{
    Device, PageRef, RenderCallback, Renderer, WeakPageRef, WeakRenderCallback,
    resolve_paper_color,
};

use crate::page::CompositePage;

/// One live forwarding registration: weak on the composite page and on the
/// original callback, strong only on the generated forwarding callback.
struct ForwardEntry {
    page: WeakPageRef,
    source: WeakRenderCallback,
    forward: RenderCallback,
}

/// A renderer that interfaces with the renderers of the child pages of a
/// [`CompositePage`].
///
/// For every request it queries the page for the children visible in the
/// requested region, translates the region into each child's local
/// coordinates, delegates to that child's own renderer, and merges the
/// results back, bottom first, so the topmost child is drawn last.
pub struct CompositeRenderer {
    paper_color: Option<Color>,
    callbacks: RefCell<Vec<ForwardEntry>>,
}

impl CompositeRenderer {
    /// Create a composite renderer with no default paper color.
    #[must_use]
    pub fn new() -> Self {
        Self {
            paper_color: None,
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// Set the default background color used when neither the page nor a
    /// child provides one.
    pub const fn set_paper_color(&mut self, color: Option<Color>) {
        self.paper_color = color;
    }

    /// Return the forwarding callback for `(callback, page)`, creating it
    /// on first use.
    ///
    /// The forwarding callback, when invoked with a *child* page, looks up
    /// the composite page and the original callback through their weak
    /// references and, only if both are still alive, invokes the original
    /// callback with the *composite* page. Repeated calls with the same
    /// live pair return the identical callback object, so jobs issued with
    /// it can later be unscheduled by identity. Expired entries are purged
    /// before a new one is allocated.
    #[must_use]
    pub fn forwarded_callback(&self, callback: &RenderCallback, page: &PageRef) -> RenderCallback {
        let mut entries = self.callbacks.borrow_mut();

        // Household: drop entries whose page or callback has died.
        entries.retain(|entry| entry.page.strong_count() > 0 && !entry.source.is_expired());

        if let Some(entry) = entries.iter().find(|entry| {
            Weak::ptr_eq(&entry.page, &Rc::downgrade(page)) && entry.source.refers_to(callback)
        }) {
            return entry.forward.clone();
        }

        let page_ref = Rc::downgrade(page);
        let source_ref = callback.downgrade();
        let forward = RenderCallback::new(move |_child: &PageRef| {
            if let (Some(page), Some(callback)) = (page_ref.upgrade(), source_ref.upgrade()) {
                callback.invoke(&page);
            }
        });
        entries.push(ForwardEntry {
            page: Rc::downgrade(page),
            source: callback.downgrade(),
            forward: forward.clone(),
        });
        forward
    }

    /// Number of live entries in the forwarding table (diagnostic).
    #[must_use]
    pub fn forwarding_entries(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Draw `(position, image)` pairs onto `painter`.
    ///
    /// The image on top is listed first, so drawing starts with the last.
    pub fn combine(painter: &mut Painter<'_>, images: &[(Point, RgbaImage)]) {
        for (pos, image) in images.iter().rev() {
            painter.draw_image(*pos, image);
        }
    }

    /// Snapshot the visible children of `page` and its paper color under a
    /// single short-lived borrow. Returns an empty list for pages that are
    /// not composite pages.
    fn visible_children(page: &PageRef, rect: Rect) -> (Vec<(PageRef, Rect)>, Option<Color>) {
        let guard = page.borrow();
        let paper = guard.geometry().paper_color;
        let visible = guard
            .as_any()
            .downcast_ref::<CompositePage>()
            .map(|composite| composite.visible_pages_at(rect).collect::<Vec<_>>())
            .unwrap_or_default();
        (visible, paper)
    }

    /// All children of `page`, visible or not. Empty for non-composite
    /// pages.
    fn all_children(page: &PageRef) -> Vec<PageRef> {
        page.borrow()
            .as_any()
            .downcast_ref::<CompositePage>()
            .map(|composite| composite.pages.clone())
            .unwrap_or_default()
    }
}

impl Default for CompositeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CompositeRenderer {
    /// Check, and schedule rendering for, every child visible in `rect`.
    ///
    /// Returns `true` only when every delegated call reports no pending
    /// work; a single pending child makes the whole composite not ready.
    fn update(
        &self,
        page: &PageRef,
        device: &Device,
        rect: Rect,
        callback: Option<&RenderCallback>,
    ) -> bool {
        if rect.is_empty() {
            return true;
        }
        let forward = callback.map(|cb| self.forwarded_callback(cb, page));
        let (visible, _) = Self::visible_children(page, rect);

        let mut ready = true;
        for (child, overlay) in visible {
            let (pos, renderer) = {
                let child = child.borrow();
                (child.geometry().pos(), child.renderer())
            };
            let Some(renderer) = renderer else {
                warn_once("composite", "child page has no renderer; skipping update");
                continue;
            };
            if !renderer.update(&child, device, overlay.translated(-pos), forward.as_ref()) {
                ready = false;
            }
        }
        ready
    }

    /// Paint all visible children on top of each other.
    ///
    /// Each child is painted onto its own surface, sized to its overlap
    /// with `rect` at the painter's device pixel ratio; any part of `rect`
    /// no child covers is filled with the resolved paper color, and the
    /// staged surfaces are then composited in reverse order so the topmost
    /// child is drawn last.
    fn paint(
        &self,
        page: &PageRef,
        painter: &mut Painter<'_>,
        rect: Rect,
        callback: Option<&RenderCallback>,
    ) {
        if rect.is_empty() {
            return;
        }
        let forward = callback.map(|cb| self.forwarded_callback(cb, page));
        let (visible, paper) = Self::visible_children(page, rect);
        let ratio = painter.device_pixel_ratio();

        let mut staged: Vec<(Point, RgbaImage)> = Vec::new();
        let mut covered = Region::new();
        for (child, overlay) in visible {
            let (pos, renderer) = {
                let child = child.borrow();
                (child.geometry().pos(), child.renderer())
            };
            let Some(renderer) = renderer else {
                warn_once("composite", "child page has no renderer; skipping paint");
                continue;
            };

            let mut surface = Surface::new(overlay.size(), ratio);
            {
                let mut child_painter = surface.painter();
                child_painter.translate(pos - overlay.top_left());
                renderer.paint(
                    &child,
                    &mut child_painter,
                    overlay.translated(-pos),
                    forward.as_ref(),
                );
            }
            staged.push((overlay.top_left(), surface.into_image()));
            covered.add(overlay);
        }

        if !covered.covers(rect) {
            painter.fill_rect(rect, resolve_paper_color(paper, self.paper_color));
        }
        Self::combine(painter, &staged);
    }

    /// Build a single raster of `rect` with all child images combined.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
    fn image(&self, page: &PageRef, rect: Rect, dpi_x: f32, dpi_y: f32) -> RgbaImage {
        // Find the scale used for the target image, to be able to position
        // and size the child images correctly.
        let (hscale, vscale, ourscale, page_dpi, paper) = {
            let guard = page.borrow();
            let geo = guard.geometry();
            if rect.is_empty() || geo.width <= 0 || geo.height <= 0 {
                return RgbaImage::new(0, 0);
            }
            let (dw, dh) = geo.default_size();
            (
                dw * dpi_x / geo.dpi / geo.width as f32,
                dh * dpi_y / geo.dpi / geo.height as f32,
                dw / geo.width as f32,
                geo.dpi,
                geo.paper_color,
            )
        };
        let (visible, _) = Self::visible_children(page, rect);

        let mut overlays: Vec<(Point, RgbaImage)> = Vec::new();
        for (child, overlay) in visible {
            let child_guard = child.borrow();
            let geo = child_guard.geometry();
            // Compute the resolution the child must be rendered at by
            // reconciling our scale with the one the child's own size
            // update used (which may follow a different zoom policy).
            let extent = if geo.computed_rotation.swaps_axes() {
                geo.height
            } else {
                geo.width
            };
            if extent <= 0 {
                continue;
            }
            let overlay_width = geo.page_width * geo.scale_x * page_dpi / geo.dpi;
            let scale = ourscale / (overlay_width / extent as f32);
            let local = overlay.translated(-geo.pos());
            let offset = overlay.top_left() - rect.top_left();
            let renderer = child_guard.renderer();
            drop(child_guard);

            let Some(renderer) = renderer else {
                continue;
            };
            let img = renderer.image(&child, local, dpi_x * scale, dpi_y * scale);
            let pos = Point::new(
                (offset.x as f32 * hscale).round() as i32,
                (offset.y as f32 * vscale).round() as i32,
            );
            overlays.push((pos, img));
        }

        let width = (rect.width as f32 * hscale).round().max(0.0) as u32;
        let height = (rect.height as f32 * vscale).round().max(0.0) as u32;
        let mut image = RgbaImage::from_pixel(
            width,
            height,
            resolve_paper_color(paper, self.paper_color).to_rgba(),
        );
        let mut painter = Painter::new(&mut image, 1.0);
        Self::combine(&mut painter, &overlays);
        image
    }

    /// Unschedule pending jobs for every child of every given composite
    /// page — all children, not only the visible ones, since a job may
    /// have been scheduled while a child was still on screen.
    fn unschedule(&self, pages: &[PageRef], callback: Option<&RenderCallback>) {
        for page in pages {
            let forward = callback.map(|cb| self.forwarded_callback(cb, page));
            for child in Self::all_children(page) {
                let renderer = child.borrow().renderer();
                if let Some(renderer) = renderer {
                    renderer.unschedule(&[Rc::clone(&child)], forward.as_ref());
                }
            }
        }
    }

    /// Invalidate the children of all given composite pages, grouped so
    /// that each distinct child renderer is called exactly once with the
    /// batch of pages it owns.
    fn invalidate(&self, pages: &[PageRef]) {
        let mut groups: Vec<(Rc<dyn Renderer>, Vec<PageRef>)> = Vec::new();
        for page in pages {
            for child in Self::all_children(page) {
                let renderer = child.borrow().renderer();
                let Some(renderer) = renderer else {
                    continue;
                };
                if let Some((_, group)) = groups
                    .iter_mut()
                    .find(|(existing, _)| Rc::ptr_eq(existing, &renderer))
                {
                    group.push(child);
                } else {
                    groups.push((renderer, vec![child]));
                }
            }
        }
        for (renderer, children) in groups {
            renderer.invalidate(&children);
        }
    }

    fn paper_color(&self) -> Option<Color> {
        self.paper_color
    }
}
