//! Page-scoped controller for the upload -> predict -> render workflow.
//!
//! [`controller::PageController`] owns an explicit [`state::ControllerState`]
//! and a [`view::PageView`] view-model. Every user event (file chosen,
//! drag/drop, submit, favorite, feedback, reset) is a method on the
//! controller; the view is re-derived after each transition.

pub mod backend;
pub mod controller;
pub mod error;
pub mod state;
pub mod view;
