mod model;
mod repository;

pub use model::{
    NewPortfolioDailyValuationDB, NewValuationPositionDB, PortfolioDailyValuationDB,
    ValuationPositionDB,
};
pub use repository::ValuationRepository;
