mod config_gen;
mod links;
mod stats;

pub use config_gen::generate_config;
pub use links::{add_link, delete_link, get_link, link_info, record_hit};
pub use stats::{show_category_series, show_series, show_top};
