pub mod helpers;
pub mod keyed_lock;
