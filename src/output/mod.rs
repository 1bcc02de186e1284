pub mod layout;

pub use layout::OutputLayout;
