pub mod app_config;
pub mod basket;
pub mod config;
pub mod error;
pub mod plan;
pub mod product;
pub mod request;
pub mod stores;
pub mod suitability;

pub use app_config::AppConfig;
pub use basket::{ItemMatch, MatchFailure, MatchOutcome, StoreBasket};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use plan::{
    ChosenProduct, ItemRecommendation, PlanFailure, PlanOutcome, Recommendation, StoreCostSummary,
};
pub use product::{ProductRecord, UnitSize};
pub use request::{Budget, RequestedItem, Restriction, ShoppingRequest, UnknownRestriction};
pub use stores::{load_stores, StoreConfig, StoresFile};
pub use suitability::{CheckOutcome, SuitabilityResult};
