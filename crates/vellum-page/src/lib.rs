//! Page and renderer abstractions for the Vellum page viewer.
//!
//! # Scope
//!
//! This crate defines the capability interfaces the viewer composes:
//! - **Page** - a positioned, sized, rotatable renderable unit, held
//!   behind a shared [`PageRef`] handle
//! - **PageGeometry** - the concrete position/size/rotation/zoom state
//!   every page carries
//! - **Renderer** - the asynchronous render/paint/image capability a
//!   page delegates its imagery to
//! - **RenderCallback** - a cloneable completion callback with pointer
//!   identity, so pending render jobs can be unscheduled later
//!
//! The whole model is single-threaded and cooperative: pages live in
//! `Rc<RefCell<..>>` handles owned by the UI event loop, and renderers
//! deliver completion callbacks on that same loop.

pub mod page;
pub mod render;

pub use page::{Page, PageGeometry, PageRef, Rotation, WeakPageRef};
pub use render::{
    Device, RenderCallback, Renderer, RendererRef, WeakRenderCallback, resolve_paper_color,
};
