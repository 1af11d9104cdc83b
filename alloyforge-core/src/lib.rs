pub mod cost;
pub mod dosing;
pub mod energy;
pub mod error;
pub mod fitness;
pub mod inventory;
pub mod logger;
pub mod optimizer;
pub mod properties;
pub mod services;

pub use cost::PriceTable;
pub use dosing::RecoveryTable;
pub use error::AlloyforgeError;
pub use fitness::{FitnessEvaluator, ObjectiveContext};
pub use inventory::InventoryResolver;
pub use optimizer::{GeneticOptimizer, OptimizerBuilder};
pub use properties::{PropertyModel, SurrogatePropertyModel};
pub use services::{optimize_alloy, optimize_alloy_logged, predict_properties, DosingService};
