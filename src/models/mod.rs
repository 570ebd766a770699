pub mod lead;
pub mod timestamp;

pub use lead::{Lead, LeadInput, LeadPatch, LeadSource, LeadStatus, NewLead, UnknownVariant};
