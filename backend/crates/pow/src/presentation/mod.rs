//! Presentation Layer
//!
//! Wire DTOs and the interactive solver page.

pub mod dto;
pub mod solver_page;
