//! Services module

pub mod api;
pub mod scan;
pub mod shipment;
pub mod transport;
pub mod wire;

pub use api::{ApiClient, ServiceName, ServiceRequest, DEFAULT_NOT_FOUND_MSG, KOLI_NOT_FOUND_MSG};
pub use scan::{open_koli_by_barcode, ScanOutcome};
pub use shipment::ShipmentBoxTask;
pub use transport::{HttpTransport, RawResponse, Transport};
