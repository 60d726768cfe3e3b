pub mod approvals;
pub mod facebook;
pub mod jarvis;
pub mod logs;
pub mod shopify;
pub mod status;
pub mod whatsapp;
