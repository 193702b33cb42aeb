// Domain models: raw metrics document and normalized devices

mod device;
mod snapshot;

pub use device::{Device, DeviceKind, Stat};
pub use snapshot::{
    RawCpu, RawDisk, RawGpu, RawNetwork, RawRam, RawSnapshot, as_number, default_document,
    format_number, format_value, parse_document, parse_int_prefix, parse_snapshot,
};
