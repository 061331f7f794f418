//! Business logic services

pub mod catalog;
pub mod geo;
pub mod ics;
pub mod matrix;
pub mod order;
pub mod routing;
pub mod schedule;
pub mod tour;
