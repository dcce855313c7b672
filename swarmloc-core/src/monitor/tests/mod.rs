mod device_log_tests;
mod session_tests;
mod view_tests;
