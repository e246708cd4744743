pub use self::{
    fixed_header::FixedHeader,
    packet_type::{stud, ControlType, PacketType},
    variable_header::*,
};

pub mod fixed_header;
pub mod packet_type;
pub mod variable_header;
