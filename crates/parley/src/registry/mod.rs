mod registry;
pub mod state;
pub mod store;

pub use registry::DeviceRegistry;
pub use registry::LightOp;
pub use registry::RegistryError;
pub use state::LightState;
pub use state::PowerState;
pub use state::RegistryState;
pub use store::JsonFileStore;
pub use store::MemoryStore;
pub use store::StateStore;
pub use store::StoreError;
