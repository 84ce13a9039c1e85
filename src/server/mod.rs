pub mod country;
pub mod handlers;
pub mod routes;

pub use country::CountryGate;
pub use routes::create_router;
