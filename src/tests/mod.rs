pub mod utils;

mod proptests;
mod scenario;
