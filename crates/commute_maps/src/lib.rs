pub mod distance_matrix_api;
pub mod geocoding_api;
pub mod maps_client;
pub mod maps_error;
pub mod travel_mode;
pub mod travel_time_matrix;
