
mod heartbeat_test;
mod recovery_test;
mod router_test;
mod session_test;
