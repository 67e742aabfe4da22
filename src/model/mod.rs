//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `FleetStore` - ships, child records and cost categories
//! - `SelectionController` / `DetailTabs` - what the detail view shows
//! - `ModalStack` - Modal overlay management
//! - `Form` / `MapView` - editing and map state used by the panels

pub mod details;
pub mod entity;
pub mod form;
pub mod map;
pub mod modal;
pub mod records;
pub mod selection;
pub mod ship;
pub mod store;
pub mod ui;

