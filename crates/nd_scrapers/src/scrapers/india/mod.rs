use crate::scrapers::AdapterFactory;

pub mod firstpost;
pub mod ndtv;
pub mod thewire;
pub mod wion;

pub use firstpost::FirstpostAdapter;
pub use ndtv::NdtvAdapter;
pub use thewire::TheWireAdapter;
pub use wion::WionAdapter;

/// Returns a factory for every Indian news source adapter
pub fn get_adapter_factories() -> Vec<AdapterFactory> {
    let factories: [AdapterFactory; 4] = [
        || Box::new(WionAdapter::new()),
        || Box::new(FirstpostAdapter::new()),
        || Box::new(NdtvAdapter::new()),
        || Box::new(TheWireAdapter::new()),
    ];
    factories.to_vec()
}
