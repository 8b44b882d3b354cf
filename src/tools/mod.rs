pub mod identifiers;
pub mod instructions;
pub mod reference;
pub mod values;
