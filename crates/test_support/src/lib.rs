mod test_server;

pub use test_server::{spawn_rps_server, wait_until_ready};
