// Path Planning algorithms module

pub mod heuristic;
pub mod a_star;
pub mod driver;

pub use heuristic::*;
pub use a_star::*;
pub use driver::*;
