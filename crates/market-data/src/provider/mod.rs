//! Price feed providers.

pub mod infina;
pub mod static_feed;
mod traits;

pub use infina::InfinaProvider;
pub use static_feed::StaticPriceFeed;
pub use traits::PriceFeed;
