pub mod attendance;
pub mod domain;
pub mod memory;
pub mod outcome;
pub mod ports;
pub mod products;
pub mod session;
pub mod views;

pub use attendance::AttendanceStore;
pub use domain::{
    ActivityLog, AttendanceRecord, AttendanceStatus, AuthSession, NewProduct, NewUser, Product,
    ProductPatch, Role, User, UserCredentials,
};
pub use memory::MemoryBackend;
pub use outcome::{MutationOutcome, StoreError};
pub use ports::{BackendService, Clock, PortError, PortResult, SystemClock};
pub use products::ProductStore;
pub use session::Session;
