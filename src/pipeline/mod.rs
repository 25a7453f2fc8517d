pub mod derivation;
pub mod rules;
pub mod shaping;
pub mod weekly;
