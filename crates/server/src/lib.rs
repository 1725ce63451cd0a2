mod open_meteo;
pub mod routes;
mod startup;
mod store;
pub mod templates;
mod utils;

pub use open_meteo::*;
pub use routes::*;
pub use startup::*;
pub use store::*;
pub use utils::*;
