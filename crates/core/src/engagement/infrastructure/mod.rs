pub mod alert_state;
pub mod manual_clock;
pub mod thread_alert_scheduler;
