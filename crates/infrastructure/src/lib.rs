pub mod fixture_store;
pub mod seed;

pub use fixture_store::FixtureStore;
