pub mod activities;
pub mod corpus;
pub mod models;
pub mod registry;
pub mod vetting;
