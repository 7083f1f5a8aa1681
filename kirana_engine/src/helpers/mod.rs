mod reference;

pub use reference::generate_reference;
