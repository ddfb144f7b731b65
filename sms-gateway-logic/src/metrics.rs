use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    pub static ref MESSAGE_STATUS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sms_gateway_message_status_total",
        "total number of durable message status transitions",
        &["status"]
    )
    .unwrap();
}
