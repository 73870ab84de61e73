mod relative;

pub use relative::relative_time;
