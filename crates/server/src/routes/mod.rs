pub mod forecast;
pub mod ui;

pub use forecast::*;
pub use ui::*;
