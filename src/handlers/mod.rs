pub mod health;
pub mod metrics;
pub mod user_data;

pub use health::health_check;
pub use metrics::metrics_endpoint;
pub use user_data::{get_user_data, save_user_data};
