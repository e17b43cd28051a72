// Purpose - external interfaces, event transport

pub mod midi;
