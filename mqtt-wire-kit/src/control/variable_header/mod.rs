//! Variable header fields specific to MQTT v3.1.1

pub use self::connect_ret_code::ConnectReturnCode;

mod connect_ret_code;
