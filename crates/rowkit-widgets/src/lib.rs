#![forbid(unsafe_code)]

//! Widget engines: the virtualized list box and the drill-down menu.
//!
//! # Role in rowkit
//! `rowkit-widgets` owns the stateful widget logic. Nothing in this crate
//! paints or touches a windowing system: the engines consume normalized
//! events from `rowkit-core`, query content through model traits, and hand
//! the host row bindings to paint.
//!
//! # Primary components
//! - [`listbox::ListView`] — row-recycling virtualized list engine:
//!   geometry, viewport windowing, selection, keyboard/pointer
//!   interaction, drag-source support.
//! - [`menu::MenuView`] — hierarchical drill-down menu built on the list
//!   engine, with animated root transitions.
//! - Supporting structures: [`fenwick::FenwickTree`],
//!   [`heights::HeightIndex`], [`pool::RowPool`],
//!   [`selection::SelectionSet`].

pub mod fenwick;
pub mod heights;
pub mod listbox;
pub mod menu;
pub mod pool;
pub mod selection;

pub use listbox::{DragPayload, DragRequest, ListConfig, ListView, RowBinding, RowModel};
pub use menu::{MenuConfig, MenuItem, MenuTree, MenuView};
pub use selection::SelectionSet;
