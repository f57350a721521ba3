pub mod signals_repo;
pub mod trades_repo;

pub use signals_repo::SignalsRepository;
pub use trades_repo::TradesRepository;
