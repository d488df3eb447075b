//! Composite pages: a page that renders a stack of embedded sub-pages.
//!
//! A [`CompositePage`] has no content of its own (but it has a size!); it
//! owns an ordered list of child pages, the first one on top, and positions
//! them inside its own rectangle. The matching [`CompositeRenderer`] has
//! the same capability surface as an ordinary renderer, but defers all
//! rendering to the renderers of the child pages: it asks the page which
//! children are visible in a requested region, forwards translated
//! render/paint/image requests to each child's renderer, and merges the
//! results back into the composite's coordinate space in top-to-bottom
//! paint order.
//!
//! # Scope
//!
//! - **Visibility queries** - front-to-back scan with optional occlusion
//!   culling for opaque children
//! - **Delegated rendering** - per-child coordinate translation, isolated
//!   per-child surfaces, reverse-order compositing
//! - **Callback forwarding** - completion callbacks re-dispatched with the
//!   composite page substituted for the child, held in a weak table so the
//!   table never keeps a page or callback alive
//!
//! Children may themselves be composite pages; recursion falls out of the
//! uniform renderer interface. Cyclic composite graphs are a caller error.

pub mod page;
pub mod render;

pub use page::{CenterPlacement, CompositePage, PagePlacement, VisiblePages};
pub use render::CompositeRenderer;
